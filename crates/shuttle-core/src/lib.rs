//! # shuttle-core
//!
//! Shared library for shuttle-lms containing the device event model, the
//! fixed control binding table, and the LMS CLI line codec.
//!
//! It has zero dependencies on OS input APIs or network sockets, so
//! everything here can be unit-tested on any platform.
//!
//! # Architecture overview
//!
//! shuttle-lms turns a jog/shuttle USB controller into a remote control for
//! one player on a Lyrion (Logitech) Media Server.  The controller's buttons
//! and dial produce raw `(type, code, value)` events; each event code is bound
//! to a playback action, and the action is carried out by sending CLI
//! commands to the server.
//!
//! - **`domain`** – The [`DeviceEvent`] record and the [`EventMap`] binding
//!   event codes to [`ControlAction`]s.
//!
//! - **`protocol`** – How CLI commands travel over the wire: percent-encoded,
//!   space-separated terms terminated by a newline.

pub mod domain;
pub mod protocol;

pub use domain::bindings::{ControlAction, EventMap};
pub use domain::event::DeviceEvent;
pub use protocol::cli::{CliError, PlayerEntry};
