//! The fixed binding table between device event codes and playback actions.
//!
//! The layout matches the button row and jog dial of a Contour ShuttlePro /
//! ShuttleXpress.  It is a contract with the physical device and is not
//! configurable at runtime.
//!
//! | Code       | Action                 |
//! |------------|------------------------|
//! | `BTN_4`    | [`ControlAction::Echo`]         |
//! | `BTN_5`    | [`ControlAction::SkipBackward`] |
//! | `BTN_6`    | [`ControlAction::PlayPause`]    |
//! | `BTN_7`    | [`ControlAction::SkipForward`]  |
//! | `BTN_8`    | [`ControlAction::Echo`]         |
//! | `REL_DIAL` | [`ControlAction::Volume`]       |

use std::collections::HashMap;
use std::fmt;

use super::event::{BTN_4, BTN_5, BTN_6, BTN_7, BTN_8, REL_DIAL};

/// A playback action a physical control can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    /// Log the raw event and do nothing else.
    Echo,
    /// Restart the current track from position zero.
    SkipBackward,
    /// Toggle between playing and paused.
    PlayPause,
    /// Advance to the next track.
    SkipForward,
    /// Nudge the volume up or down depending on dial direction.
    Volume,
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlAction::Echo => "echo",
            ControlAction::SkipBackward => "skip-backward",
            ControlAction::PlayPause => "play-pause",
            ControlAction::SkipForward => "skip-forward",
            ControlAction::Volume => "volume",
        };
        f.write_str(name)
    }
}

/// Immutable mapping from event code to [`ControlAction`].
///
/// Built once at startup; lookups are by code only, the event type is not
/// part of the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMap {
    bindings: HashMap<u16, ControlAction>,
}

impl EventMap {
    /// Builds a map from explicit `(code, action)` pairs.
    ///
    /// A code listed twice keeps its last action.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u16, ControlAction)>) -> Self {
        Self {
            bindings: pairs.into_iter().collect(),
        }
    }

    /// Returns the shuttle's fixed button layout.
    pub fn shuttle() -> Self {
        Self::from_pairs([
            (BTN_4, ControlAction::Echo),
            (BTN_5, ControlAction::SkipBackward),
            (BTN_6, ControlAction::PlayPause),
            (BTN_7, ControlAction::SkipForward),
            (BTN_8, ControlAction::Echo),
            (REL_DIAL, ControlAction::Volume),
        ])
    }

    /// Looks up the action bound to `code`.
    pub fn get(&self, code: u16) -> Option<ControlAction> {
        self.bindings.get(&code).copied()
    }

}

impl Default for EventMap {
    fn default() -> Self {
        Self::shuttle()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
