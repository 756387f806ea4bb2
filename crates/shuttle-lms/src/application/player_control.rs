//! PlayerController: turns control actions into commands on one named player.
//!
//! The controller owns the binding to the remote player and the only piece
//! of session state, the last dial value seen.  The player handle is resolved
//! eagerly at construction and lazily again whenever it is missing, so a
//! media server that comes up after the controller is picked up on the next
//! button press.
//!
//! # Failure policy
//!
//! | Situation                                   | At construction | Lazily (in a handler) |
//! |---------------------------------------------|-----------------|-----------------------|
//! | Server unreachable                          | logged          | logged                |
//! | Server reachable, player name not listed    | returned (fatal)| logged                |
//! | Player command fails                        | n/a             | logged, handle dropped|
//!
//! A handler never returns an error: the read loop keeps running and the next
//! event retries resolution.

use std::cmp::Ordering;

use shuttle_core::{CliError, ControlAction, DeviceEvent};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::application::dispatch::ControlHandler;

/// Volume step applied per dial tick.
pub const VOLUME_INCREMENT: u8 = 5;

/// Error type for media server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("could not contact server {address}: {source}")]
    Unreachable {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("not connected to server")]
    NotConnected,
    #[error("server closed the connection")]
    Closed,
    #[error("I/O error talking to server: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected server response: {0}")]
    Protocol(#[from] CliError),
}

/// Error type for player resolution.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("could not find player with name {name}")]
    PlayerNotFound { name: String },
    #[error("failed to list players: {0}")]
    Server(#[from] ServerError),
}

/// A playback endpoint on the media server.
pub trait MediaPlayer {
    /// The player's display name.
    fn name(&self) -> &str;
    /// Raises the volume by `amount` units.
    fn volume_up(&mut self, amount: u8) -> Result<(), ServerError>;
    /// Lowers the volume by `amount` units.
    fn volume_down(&mut self, amount: u8) -> Result<(), ServerError>;
    /// Reads the current volume (0–100, negative when muted).
    fn volume(&mut self) -> Result<i32, ServerError>;
    /// Toggles between playing and paused.
    fn toggle(&mut self) -> Result<(), ServerError>;
    /// Advances to the next track.
    fn next(&mut self) -> Result<(), ServerError>;
    /// Seeks within the current track.
    fn seek_to(&mut self, seconds: u32) -> Result<(), ServerError>;
}

/// Owned reference to a remote player.
pub type PlayerHandle = Box<dyn MediaPlayer>;

/// The media server as seen by the controller.
#[cfg_attr(test, mockall::automock)]
pub trait MediaServer {
    /// Opens (or re-opens) the connection to the server.
    fn connect(&mut self) -> Result<(), ServerError>;
    /// Lists the players the server currently knows.
    fn players(&mut self) -> Result<Vec<PlayerHandle>, ServerError>;
}

/// Stateful handler set for one named player.
pub struct PlayerController<S> {
    server: S,
    target_name: String,
    player: Option<PlayerHandle>,
    last_volume: i32,
}

impl<S: MediaServer> PlayerController<S> {
    /// Creates a controller and attempts to resolve the player immediately.
    ///
    /// An unreachable server is not an error here; the controller starts
    /// without a player and retries on the first handler call.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::PlayerNotFound`] if the server answered but
    /// does not list `target_name`, or [`ControllerError::Server`] if the
    /// listing itself failed.
    pub fn new(server: S, target_name: impl Into<String>) -> Result<Self, ControllerError> {
        let mut controller = Self {
            server,
            target_name: target_name.into(),
            player: None,
            last_volume: 0,
        };
        controller.resolve_player()?;
        Ok(controller)
    }

    /// Connects to the server and binds the first player named exactly
    /// [`target_name`](Self::target_name).
    ///
    /// Connection failure is logged and leaves the handle absent.
    ///
    /// # Errors
    ///
    /// See [`PlayerController::new`].
    pub fn resolve_player(&mut self) -> Result<(), ControllerError> {
        self.player = None;

        if let Err(e) = self.server.connect() {
            error!("could not contact server for player {}: {e}", self.target_name);
            return Ok(());
        }

        let player = self
            .server
            .players()?
            .into_iter()
            .find(|p| p.name() == self.target_name)
            .ok_or_else(|| ControllerError::PlayerNotFound {
                name: self.target_name.clone(),
            })?;

        info!("bound to player {}", player.name());
        self.player = Some(player);
        Ok(())
    }

    /// Returns the cached player, resolving it first if absent.
    ///
    /// The cached handle is not re-validated.  Resolution errors are logged
    /// and yield `None`.
    pub fn current_player(&mut self) -> Option<&mut PlayerHandle> {
        if self.player.is_none() {
            if let Err(e) = self.resolve_player() {
                error!("{e}");
            }
        }
        self.player.as_mut()
    }

    /// Name of the bound player, if any.
    pub fn player_name(&self) -> Option<&str> {
        self.player.as_ref().map(|p| p.name())
    }

    /// Returns `true` if a player handle is cached.
    pub fn has_player(&self) -> bool {
        self.player.is_some()
    }

    /// The configured player name.
    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// The most recent raw dial value.
    pub fn last_volume(&self) -> i32 {
        self.last_volume
    }

    // ── Handlers ──────────────────────────────────────────────────────────────

    /// Steps the volume in the direction the dial moved since the last event.
    ///
    /// The dial value is recorded even when no player is available, so the
    /// next tick computes its direction from the true previous position.
    pub fn handle_volume(&mut self, event: &DeviceEvent) {
        let previous = self.last_volume;
        let value = event.value;

        self.with_player("volume", |player| {
            let ordering = value.cmp(&previous);
            match ordering {
                Ordering::Greater => {
                    info!("volume up");
                    player.volume_up(VOLUME_INCREMENT)?;
                }
                Ordering::Less => {
                    info!("volume down");
                    player.volume_down(VOLUME_INCREMENT)?;
                }
                // Repeated value: nothing to do.
                Ordering::Equal => {}
            }

            let current = player.volume()?;
            if ordering == Ordering::Equal {
                debug!("current volume: {current}");
            } else {
                info!("current volume: {current}");
            }
            Ok(())
        });

        self.last_volume = value;
    }

    /// Toggles play/pause on button press.
    ///
    /// Release and autorepeat still pass through the player guard, so they
    /// retry resolution but send nothing.
    pub fn handle_play_pause(&mut self, event: &DeviceEvent) {
        let pressed = event.is_press();
        self.with_player("toggle", |player| {
            if !pressed {
                return Ok(());
            }
            info!("toggle");
            player.toggle()
        });
    }

    /// Advances to the next track on button press.
    pub fn handle_skip_forward(&mut self, event: &DeviceEvent) {
        let pressed = event.is_press();
        self.with_player("forward", |player| {
            if !pressed {
                return Ok(());
            }
            info!("forward");
            player.next()
        });
    }

    /// Restarts the current track on button press.
    pub fn handle_skip_backward(&mut self, event: &DeviceEvent) {
        let pressed = event.is_press();
        self.with_player("back-to-beginning", |player| {
            if !pressed {
                return Ok(());
            }
            info!("back-to-beginning");
            player.seek_to(0)
        });
    }

    /// Logs the raw event.  Needs no player.
    pub fn handle_echo(&mut self, event: &DeviceEvent) {
        info!("{event}");
    }

    /// Runs `body` against the current player.
    ///
    /// With no player available this logs and returns.  A failed command
    /// drops the cached handle so the next call re-resolves.
    fn with_player<F>(&mut self, command: &str, body: F)
    where
        F: FnOnce(&mut dyn MediaPlayer) -> Result<(), ServerError>,
    {
        let Some(player) = self.current_player() else {
            error!("no player available; cannot run command");
            return;
        };

        if let Err(e) = body(&mut **player) {
            error!("{command} failed on player {}: {e}", self.target_name);
            self.player = None;
        }
    }
}

impl<S: MediaServer> ControlHandler for PlayerController<S> {
    fn handle(&mut self, action: ControlAction, event: &DeviceEvent) {
        match action {
            ControlAction::Echo => self.handle_echo(event),
            ControlAction::SkipBackward => self.handle_skip_backward(event),
            ControlAction::PlayPause => self.handle_play_pause(event),
            ControlAction::SkipForward => self.handle_skip_forward(event),
            ControlAction::Volume => self.handle_volume(event),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
