//! Application layer use cases for shuttle-lms.
//!
//! Use cases in this layer orchestrate domain types to fulfil the one goal
//! of the program: a button press or dial turn on the shuttle becomes a
//! command on the remote player.  They depend on traits (`MediaServer`,
//! `MediaPlayer`, `InputDevice`) rather than concrete adapters, so they run
//! unchanged against the in-memory mocks in tests.
//!
//! # Sub-modules
//!
//! - **`player_control`** – Owns the binding to the named player, resolves it
//!   lazily, and turns each control action into player commands.  Tracks the
//!   last dial value to derive volume direction.
//!
//! - **`dispatch`** – Discovers and binds the input device, then runs the
//!   blocking read loop that routes each event to its bound action.

pub mod dispatch;
pub mod player_control;
