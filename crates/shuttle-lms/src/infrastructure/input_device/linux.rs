//! evdev-backed input devices (Linux only).

use std::path::PathBuf;

use shuttle_core::DeviceEvent;
use tracing::trace;

use super::{DeviceEnumerator, DeviceError, InputDevice};

/// An input device opened from `/dev/input/event*`.
pub struct EvdevDevice {
    name: String,
    path: PathBuf,
    device: evdev::Device,
}

impl std::fmt::Debug for EvdevDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvdevDevice")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish()
    }
}

impl InputDevice for EvdevDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_events(&mut self) -> Result<Vec<DeviceEvent>, DeviceError> {
        let events = self
            .device
            .fetch_events()
            .map_err(|source| DeviceError::Read {
                device: format!("{} ({})", self.name, self.path.display()),
                source,
            })?;
        Ok(events
            .map(|event| DeviceEvent::new(event.event_type().0, event.code(), event.value()))
            .collect())
    }
}

/// Enumerates devices through `evdev::enumerate()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EvdevEnumerator;

impl DeviceEnumerator for EvdevEnumerator {
    type Device = EvdevDevice;

    fn enumerate(&self) -> Vec<EvdevDevice> {
        evdev::enumerate()
            .map(|(path, device)| {
                let name = device.name().unwrap_or_default().to_string();
                trace!("found input device {name:?} at {}", path.display());
                EvdevDevice { name, path, device }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use shuttle_core::domain::event::{BTN_4, BTN_5, BTN_6, BTN_7, BTN_8, EV_KEY, EV_REL, REL_DIAL};

    // The binding table uses raw numbers; make sure they agree with the kernel
    // constants evdev exposes.
    #[test]
    fn test_event_codes_match_evdev_constants() {
        assert_eq!(evdev::Key::BTN_4.code(), BTN_4);
        assert_eq!(evdev::Key::BTN_5.code(), BTN_5);
        assert_eq!(evdev::Key::BTN_6.code(), BTN_6);
        assert_eq!(evdev::Key::BTN_7.code(), BTN_7);
        assert_eq!(evdev::Key::BTN_8.code(), BTN_8);
        assert_eq!(evdev::RelativeAxisType::REL_DIAL.0, REL_DIAL);
        assert_eq!(evdev::EventType::KEY.0, EV_KEY);
        assert_eq!(evdev::EventType::RELATIVE.0, EV_REL);
    }
}
