//! Media server infrastructure.
//!
//! - **`lms`** – Blocking TCP client for the LMS command-line interface.
//! - **`mock`** – In-memory server and players that record every command,
//!   used by unit and integration tests.

pub mod lms;
pub mod mock;

pub use lms::{LmsPlayer, LmsServer, DEFAULT_PORT};
