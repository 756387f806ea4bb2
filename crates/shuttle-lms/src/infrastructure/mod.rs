//! Infrastructure layer for shuttle-lms.
//!
//! Contains OS- and network-facing adapters: input device access, the LMS
//! CLI connection, and configuration file storage.
//!
//! # Sub-modules
//!
//! - **`input_device`** – The `InputDevice` / `DeviceEnumerator` seam.  On
//!   Linux the production implementation reads `/dev/input/event*` through
//!   `evdev`; a scripted mock is provided for tests.
//!
//! - **`media_server`** – TCP client for the LMS command-line interface
//!   (port 9090), implementing the application's `MediaServer` and
//!   `MediaPlayer` traits, plus an in-memory recording server for tests.
//!
//! - **`storage`** – The TOML configuration file and the log-level set.

pub mod input_device;
pub mod media_server;
pub mod storage;
