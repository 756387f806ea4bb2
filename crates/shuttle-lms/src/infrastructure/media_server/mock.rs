//! In-memory media server for tests.
//!
//! [`RecordingMediaServer`] lists one [`RecordingPlayer`] per configured name.
//! Every player shares a single [`CommandLog`] and a single reachability flag
//! with the server, so a test can take the server "offline" mid-session and
//! inspect exactly which commands reached a player.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::application::player_control::{MediaPlayer, MediaServer, PlayerHandle, ServerError};

/// Volume a fresh [`RecordingPlayer`] starts at.
pub const INITIAL_VOLUME: i32 = 50;

/// A command that reached a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    VolumeUp(u8),
    VolumeDown(u8),
    GetVolume,
    Toggle,
    Next,
    SeekTo(u32),
}

/// Shared, ordered record of successful player commands.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    commands: Arc<Mutex<Vec<PlayerCommand>>>,
}

impl CommandLog {
    /// Snapshot of every command recorded so far.
    pub fn commands(&self) -> Vec<PlayerCommand> {
        self.commands.lock().expect("lock poisoned").clone()
    }

    /// Forgets every recorded command.
    pub fn clear(&self) {
        self.commands.lock().expect("lock poisoned").clear();
    }

    fn push(&self, command: PlayerCommand) {
        self.commands.lock().expect("lock poisoned").push(command);
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

/// A player that records commands while its server is reachable and fails
/// them with [`ServerError::Closed`] otherwise.
#[derive(Debug)]
pub struct RecordingPlayer {
    name: String,
    volume: i32,
    log: CommandLog,
    reachable: Arc<AtomicBool>,
}

impl RecordingPlayer {
    /// Creates a reachable player writing to `log`.
    pub fn new(name: impl Into<String>, log: CommandLog) -> Self {
        Self::sharing(name, log, Arc::new(AtomicBool::new(true)))
    }

    fn sharing(name: impl Into<String>, log: CommandLog, reachable: Arc<AtomicBool>) -> Self {
        Self {
            name: name.into(),
            volume: INITIAL_VOLUME,
            log,
            reachable,
        }
    }

    fn record(&self, command: PlayerCommand) -> Result<(), ServerError> {
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(ServerError::Closed);
        }
        self.log.push(command);
        Ok(())
    }
}

impl MediaPlayer for RecordingPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn volume_up(&mut self, amount: u8) -> Result<(), ServerError> {
        self.record(PlayerCommand::VolumeUp(amount))?;
        self.volume = (self.volume + i32::from(amount)).min(100);
        Ok(())
    }

    fn volume_down(&mut self, amount: u8) -> Result<(), ServerError> {
        self.record(PlayerCommand::VolumeDown(amount))?;
        self.volume = (self.volume - i32::from(amount)).max(0);
        Ok(())
    }

    fn volume(&mut self) -> Result<i32, ServerError> {
        self.record(PlayerCommand::GetVolume)?;
        Ok(self.volume)
    }

    fn toggle(&mut self) -> Result<(), ServerError> {
        self.record(PlayerCommand::Toggle)
    }

    fn next(&mut self) -> Result<(), ServerError> {
        self.record(PlayerCommand::Next)
    }

    fn seek_to(&mut self, seconds: u32) -> Result<(), ServerError> {
        self.record(PlayerCommand::SeekTo(seconds))
    }
}

// ── Server ────────────────────────────────────────────────────────────────────

/// Test-side handle onto a [`RecordingMediaServer`] after it has been moved
/// into a controller.
#[derive(Debug, Clone)]
pub struct ServerControl {
    reachable: Arc<AtomicBool>,
    connects: Arc<AtomicUsize>,
    log: CommandLog,
}

impl ServerControl {
    /// Takes the server and all of its players on- or offline.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Number of `connect` calls so far, successful or not.
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// The log every listed player writes to.
    pub fn log(&self) -> CommandLog {
        self.log.clone()
    }
}

/// A media server that lists a fixed set of recording players.
#[derive(Debug)]
pub struct RecordingMediaServer {
    names: Vec<String>,
    control: ServerControl,
    connected: bool,
}

impl RecordingMediaServer {
    /// Creates a reachable server listing `names` in order.
    pub fn new<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            control: ServerControl {
                reachable: Arc::new(AtomicBool::new(true)),
                connects: Arc::new(AtomicUsize::new(0)),
                log: CommandLog::default(),
            },
            connected: false,
        }
    }

    /// Returns a handle that stays valid after the server is moved.
    pub fn control(&self) -> ServerControl {
        self.control.clone()
    }
}

impl MediaServer for RecordingMediaServer {
    fn connect(&mut self) -> Result<(), ServerError> {
        self.control.connects.fetch_add(1, Ordering::SeqCst);
        self.connected = self.control.reachable.load(Ordering::SeqCst);
        if self.connected {
            Ok(())
        } else {
            Err(ServerError::Unreachable {
                address: "recording:9090".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            })
        }
    }

    fn players(&mut self) -> Result<Vec<PlayerHandle>, ServerError> {
        if !self.connected {
            return Err(ServerError::NotConnected);
        }
        if !self.control.reachable.load(Ordering::SeqCst) {
            return Err(ServerError::Closed);
        }
        Ok(self
            .names
            .iter()
            .map(|name| {
                Box::new(RecordingPlayer::sharing(
                    name.as_str(),
                    self.control.log.clone(),
                    Arc::clone(&self.control.reachable),
                )) as PlayerHandle
            })
            .collect())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
