//! Domain entities for shuttle-lms.
//!
//! This module contains pure data and rules with no infrastructure
//! dependencies: what a device event looks like, and which physical control
//! triggers which playback action.

/// Control bindings: event code → [`bindings::ControlAction`].
pub mod bindings;
/// The raw input event record.
pub mod event;
