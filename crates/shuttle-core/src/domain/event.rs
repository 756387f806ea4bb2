//! Raw input events as delivered by the Linux input subsystem.
//!
//! Codes and types follow `linux/input-event-codes.h`.  Only the values the
//! shuttle bindings need are named here.

use std::fmt;

/// Event type for synchronisation markers (`EV_SYN`).
pub const EV_SYN: u16 = 0x00;
/// Event type for keys and buttons (`EV_KEY`).
pub const EV_KEY: u16 = 0x01;
/// Event type for relative axes (`EV_REL`).
pub const EV_REL: u16 = 0x02;

/// Generic button 4 (`BTN_4`).
pub const BTN_4: u16 = 0x104;
/// Generic button 5 (`BTN_5`).
pub const BTN_5: u16 = 0x105;
/// Generic button 6 (`BTN_6`).
pub const BTN_6: u16 = 0x106;
/// Generic button 7 (`BTN_7`).
pub const BTN_7: u16 = 0x107;
/// Generic button 8 (`BTN_8`).
pub const BTN_8: u16 = 0x108;
/// Relative dial axis (`REL_DIAL`), reported by the shuttle's jog wheel.
pub const REL_DIAL: u16 = 0x07;

/// Button value reported on press.
pub const KEY_PRESSED: i32 = 1;

/// One discrete event from an input device.
///
/// Events are consumed read-only: the dispatcher looks at `code` to find a
/// binding and the handlers look at `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceEvent {
    /// Event type (`EV_KEY`, `EV_REL`, ...).
    pub event_type: u16,
    /// Control identifier within the type.
    pub code: u16,
    /// Button state (0 = release, 1 = press, 2 = autorepeat) or axis value.
    pub value: i32,
}

impl DeviceEvent {
    /// Creates an event from its three raw fields.
    pub const fn new(event_type: u16, code: u16, value: i32) -> Self {
        Self {
            event_type,
            code,
            value,
        }
    }

    /// Shorthand for an `EV_KEY` event.
    pub const fn key(code: u16, value: i32) -> Self {
        Self::new(EV_KEY, code, value)
    }

    /// Shorthand for an `EV_REL` event.
    pub const fn relative(code: u16, value: i32) -> Self {
        Self::new(EV_REL, code, value)
    }

    /// Returns `true` for a button-down transition.
    pub fn is_press(&self) -> bool {
        self.value == KEY_PRESSED
    }
}

impl fmt::Display for DeviceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type: {} -- code: {} -- value: {}",
            self.event_type, self.code, self.value
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_constructor_sets_ev_key_type() {
        let event = DeviceEvent::key(BTN_6, 1);
        assert_eq!(event.event_type, EV_KEY);
        assert_eq!(event.code, BTN_6);
        assert_eq!(event.value, 1);
    }

    #[test]
    fn test_relative_constructor_sets_ev_rel_type() {
        let event = DeviceEvent::relative(REL_DIAL, 42);
        assert_eq!(event.event_type, EV_REL);
        assert_eq!(event.code, REL_DIAL);
    }

    #[test]
    fn test_is_press_only_for_value_one() {
        assert_eq!(KEY_PRESSED, 1);
        assert!(DeviceEvent::key(BTN_5, 1).is_press());
        assert!(!DeviceEvent::key(BTN_5, 0).is_press());
        // Autorepeat is not a new press.
        assert!(!DeviceEvent::key(BTN_5, 2).is_press());
    }

    #[test]
    fn test_display_lists_all_three_fields() {
        let event = DeviceEvent::new(EV_KEY, BTN_4, 0);
        assert_eq!(event.to_string(), "type: 1 -- code: 260 -- value: 0");
    }
}
