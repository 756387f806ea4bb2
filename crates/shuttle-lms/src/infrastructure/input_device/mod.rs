//! Input device infrastructure.
//!
//! On Linux, devices are enumerated from `/dev/input/event*` and read with
//! blocking `read(2)` calls through the `evdev` crate.  Each read returns a
//! batch of events terminated by a `SYN_REPORT`.
//!
//! # Testability
//!
//! The [`InputDevice`] and [`DeviceEnumerator`] traits allow unit tests to
//! feed scripted events without any hardware attached.

use shuttle_core::DeviceEvent;

pub mod mock;

#[cfg(target_os = "linux")]
pub mod linux;

/// Error type for input device operations.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("failed to read events from {device}: {source}")]
    Read {
        device: String,
        #[source]
        source: std::io::Error,
    },
    #[error("device {0} disconnected")]
    Disconnected(String),
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// An opened input device producing a blocking stream of events.
pub trait InputDevice {
    /// The name the kernel reports for the device.
    fn name(&self) -> &str;

    /// Blocks until the device delivers the next batch of events.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError`] when the device is unplugged or the read fails.
    fn fetch_events(&mut self) -> Result<Vec<DeviceEvent>, DeviceError>;
}

/// Lists the input devices currently present on the system.
pub trait DeviceEnumerator {
    type Device: InputDevice;

    /// Opens every device that can be opened.  Devices without read
    /// permission are skipped.
    fn enumerate(&self) -> Vec<Self::Device>;
}
