//! Scripted input devices for unit testing.
//!
//! Allows tests to feed synthetic [`DeviceEvent`] batches without a shuttle
//! plugged in or access to `/dev/input`.

use std::collections::VecDeque;

use shuttle_core::DeviceEvent;

use super::{DeviceEnumerator, DeviceError, InputDevice};

/// A device that replays pre-loaded event batches, then reports a disconnect.
#[derive(Debug, Clone)]
pub struct MockInputDevice {
    name: String,
    batches: VecDeque<Vec<DeviceEvent>>,
}

impl MockInputDevice {
    /// Creates a device with no pending events.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            batches: VecDeque::new(),
        }
    }

    /// Queues one batch, as returned by a single blocking read.
    pub fn with_batch(mut self, batch: Vec<DeviceEvent>) -> Self {
        self.batches.push_back(batch);
        self
    }

    /// Queues each event as its own batch.
    pub fn with_events(mut self, events: impl IntoIterator<Item = DeviceEvent>) -> Self {
        self.batches.extend(events.into_iter().map(|event| vec![event]));
        self
    }

    /// Number of batches not yet read.
    pub fn pending_batches(&self) -> usize {
        self.batches.len()
    }
}

impl InputDevice for MockInputDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_events(&mut self) -> Result<Vec<DeviceEvent>, DeviceError> {
        self.batches
            .pop_front()
            .ok_or_else(|| DeviceError::Disconnected(self.name.clone()))
    }
}

/// Returns a fixed set of devices on every call to `enumerate`.
#[derive(Debug, Clone, Default)]
pub struct MockDeviceEnumerator {
    devices: Vec<MockInputDevice>,
}

impl MockDeviceEnumerator {
    /// Creates an enumerator over `devices`.
    pub fn new(devices: Vec<MockInputDevice>) -> Self {
        Self { devices }
    }

    /// Creates an enumerator over idle devices with the given names.
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(MockInputDevice::new).collect())
    }
}

impl DeviceEnumerator for MockDeviceEnumerator {
    type Device = MockInputDevice;

    fn enumerate(&self) -> Vec<MockInputDevice> {
        self.devices.clone()
    }
}
