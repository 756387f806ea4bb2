//! EventDispatcher: binds the shuttle and routes its events to actions.
//!
//! The dispatcher owns the input device and the fixed [`EventMap`].  It runs
//! a blocking read loop on the calling thread: each event is logged, looked
//! up by code, and handed synchronously to a [`ControlHandler`].  Unbound
//! codes (including the `SYN_REPORT` that ends every batch) are dropped.

use std::convert::Infallible;

use shuttle_core::{ControlAction, DeviceEvent, EventMap};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::infrastructure::input_device::{DeviceEnumerator, DeviceError, InputDevice};

/// Substring identifying Contour ShuttlePRO / ShuttleXpress devices.
pub const DEFAULT_DEVICE_SEARCH: &str = "Shuttle";

/// Error type for device discovery and the read loop.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("could not find device with name {search}")]
    DeviceNotFound { search: String },
    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Receives the action bound to each dispatched event.
pub trait ControlHandler {
    /// Carries out `action` for `event`.  Must not block longer than the
    /// slowest player command.
    fn handle(&mut self, action: ControlAction, event: &DeviceEvent);
}

/// Returns the first device whose name contains `search` (case-sensitive).
///
/// When nothing matches, the names of every discovered device are logged at
/// WARN so a misnamed search string is easy to spot.
///
/// # Errors
///
/// Returns [`DispatchError::DeviceNotFound`] if no device name matches.
pub fn find_device<D: InputDevice>(devices: Vec<D>, search: &str) -> Result<D, DispatchError> {
    let names: Vec<String> = devices.iter().map(|d| d.name().to_string()).collect();

    match devices.into_iter().find(|d| d.name().contains(search)) {
        Some(device) => Ok(device),
        None => {
            warn!("{}", names.join(","));
            Err(DispatchError::DeviceNotFound {
                search: search.to_string(),
            })
        }
    }
}

/// The bound device plus its event-code bindings.
pub struct EventDispatcher<D> {
    event_map: EventMap,
    device: D,
}

impl<D: InputDevice> EventDispatcher<D> {
    /// Enumerates devices and binds the first whose name contains `search`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::DeviceNotFound`] if no device matches.
    pub fn discover<E>(enumerator: &E, event_map: EventMap, search: &str) -> Result<Self, DispatchError>
    where
        E: DeviceEnumerator<Device = D>,
    {
        let device = find_device(enumerator.enumerate(), search)?;
        info!("bound input device {:?}", device.name());
        Ok(Self::new(device, event_map))
    }

    /// Wraps an already-opened device.
    pub fn new(device: D, event_map: EventMap) -> Self {
        Self { event_map, device }
    }

    /// Name of the bound device.
    pub fn device_name(&self) -> &str {
        self.device.name()
    }

    /// Routes one event.  Returns `true` if a handler was invoked.
    pub fn dispatch<H: ControlHandler>(&self, event: &DeviceEvent, handler: &mut H) -> bool {
        debug!(
            "saw event type: {} code: {} value: {}",
            event.event_type, event.code, event.value
        );
        match self.event_map.get(event.code) {
            Some(action) => {
                debug!("dispatching {action}");
                handler.handle(action, event);
                true
            }
            None => false,
        }
    }

    /// Reads and dispatches events until the device fails.
    ///
    /// Only returns on error; there is no retry or re-binding.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Device`] when a read fails or the device
    /// disconnects.
    pub fn run<H: ControlHandler>(&mut self, handler: &mut H) -> Result<Infallible, DispatchError> {
        loop {
            let batch = self.device.fetch_events()?;
            for event in &batch {
                self.dispatch(event, handler);
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
