//! shuttle-lms: entry point.
//!
//! Turns a Contour ShuttlePRO / ShuttleXpress into a remote control for one
//! player on a Lyrion (Logitech) Media Server.
//!
//! # Usage
//!
//! ```text
//! shuttle-lms [OPTIONS]
//!
//! Options:
//!       --host <HOST>           LMS server host [default: 192.168.0.100]
//!       --port <PORT>           LMS CLI port [default: 9090]
//!       --name <NAME>           Player to control [default: cube]
//!   -L, --loglevel <LEVEL>      NOTSET, TRACE, DEBUG, INFO, WARN(ING), ERROR, CRITICAL, FATAL [default: INFO]
//!       --device <SUBSTRING>    Input device name to bind [default: Shuttle]
//!       --timeout <SECS>        Timeout for server calls [default: 5]
//!       --config <PATH>         TOML config file
//! ```
//!
//! Every option can also be set through the environment variable shown in
//! `--help`.  Precedence is flag, then environment, then config file, then
//! built-in default.
//!
//! # What happens at startup
//!
//! 1. `--loglevel` is checked first, then flags and the config file are
//!    merged and validated.  An unknown log level exits with status 1 before
//!    anything is opened.
//! 2. Logging is initialised.  An explicit `--loglevel` wins; otherwise
//!    `RUST_LOG` overrides the configured level.
//! 3. The player controller connects to the server and binds the named
//!    player.  An unreachable server is tolerated; a missing player is fatal.
//! 4. The shuttle is located by name and its events are dispatched until the
//!    device fails.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shuttle_lms::application::dispatch::ControlHandler;
use shuttle_lms::application::player_control::PlayerController;
use shuttle_lms::infrastructure::media_server::LmsServer;
use shuttle_lms::infrastructure::storage::config::{load_config, AppConfig, ConfigError, LogLevel};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Control a Lyrion Media Server player with a jog/shuttle controller.
///
/// Unset options fall back to the config file, then to built-in defaults.
#[derive(Debug, Parser)]
#[command(
    name = "shuttle-lms",
    about = "Control a Lyrion Media Server player with a jog/shuttle controller",
    version
)]
struct Cli {
    /// Hostname or IP address of the LMS server [default: 192.168.0.100].
    #[arg(long, env = "SHUTTLE_LMS_HOST")]
    host: Option<String>,

    /// LMS CLI port [default: 9090].
    #[arg(long, env = "SHUTTLE_LMS_PORT")]
    port: Option<u16>,

    /// Display name of the player to control [default: cube].
    #[arg(long, env = "SHUTTLE_LMS_PLAYER")]
    name: Option<String>,

    /// Log level [default: INFO].
    #[arg(short = 'L', long = "loglevel", env = "SHUTTLE_LMS_LOG")]
    loglevel: Option<String>,

    /// Substring of the input device name to bind [default: Shuttle].
    #[arg(long, env = "SHUTTLE_LMS_DEVICE")]
    device: Option<String>,

    /// Timeout for server calls, in seconds [default: 5].
    #[arg(long, env = "SHUTTLE_LMS_TIMEOUT")]
    timeout: Option<u64>,

    /// TOML config file.  Defaults to `~/.config/shuttle-lms/config.toml`
    /// when that file exists.
    #[arg(long, env = "SHUTTLE_LMS_CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Rejects an unknown `--loglevel` before any file is read.
    fn check_log_level(&self) -> Result<(), ConfigError> {
        match self.loglevel.as_deref() {
            Some(name) => name.parse::<LogLevel>().map(|_| ()),
            None => Ok(()),
        }
    }

    /// Overlays every option that was given onto `config`.
    fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(name) = self.name {
            config.server.player = name;
        }
        if let Some(level) = self.loglevel {
            config.log_level = level;
        }
        if let Some(device) = self.device {
            config.device.name_contains = device;
        }
        if let Some(timeout) = self.timeout {
            config.server.timeout_secs = timeout;
        }
        config
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Err(e) = cli.check_log_level() {
        exit_invalid(e);
    }
    let level_given = cli.loglevel.is_some();
    let config_path = cli.config.clone();
    let config = cli.apply(load_config(config_path.as_deref())?);

    let level = config.validate().unwrap_or_else(|e| exit_invalid(e));
    let (directives, source) =
        filter_directives(level, level_given, std::env::var("RUST_LOG").ok());
    init_logging(&directives, level);
    info!("log filter {directives:?} set by {source}");

    info!(
        "shuttle-lms starting: server={}:{}, player={}, device={:?}",
        config.server.host, config.server.port, config.server.player, config.device.name_contains
    );

    let server = LmsServer::new(
        config.server.host.clone(),
        config.server.port,
        config.server.timeout(),
    );
    let mut controller = PlayerController::new(server, config.server.player.clone())
        .context("could not bind media player")?;

    run_input_loop(&config.device.name_contains, &mut controller)
}

fn exit_invalid(e: ConfigError) -> ! {
    eprintln!("{e}");
    std::process::exit(1);
}

/// Picks the tracing filter and names where it came from.
///
/// An explicit `--loglevel` (or `SHUTTLE_LMS_LOG`) wins over `RUST_LOG`,
/// which wins over the config file and built-in default.
fn filter_directives(
    level: LogLevel,
    level_given: bool,
    rust_log: Option<String>,
) -> (String, &'static str) {
    if level_given {
        return (level.as_directive().to_string(), "--loglevel");
    }
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => (directives, "RUST_LOG"),
        _ => (level.as_directive().to_string(), "configuration"),
    }
}

/// Single-line output: timestamp, level, message.
fn init_logging(directives: &str, level: LogLevel) {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(level.as_directive())),
        )
        .init();
}

#[cfg(target_os = "linux")]
fn run_input_loop<H: ControlHandler>(search: &str, handler: &mut H) -> anyhow::Result<()> {
    use shuttle_core::EventMap;
    use shuttle_lms::application::dispatch::EventDispatcher;
    use shuttle_lms::infrastructure::input_device::linux::EvdevEnumerator;

    let mut dispatcher = EventDispatcher::discover(&EvdevEnumerator, EventMap::shuttle(), search)?;
    info!("listening on {}", dispatcher.device_name());

    match dispatcher.run(handler) {
        Ok(never) => match never {},
        Err(e) => Err(e).context("input device stopped"),
    }
}

#[cfg(not(target_os = "linux"))]
fn run_input_loop<H: ControlHandler>(_search: &str, _handler: &mut H) -> anyhow::Result<()> {
    use shuttle_lms::infrastructure::input_device::DeviceError;

    Err(DeviceError::UnsupportedPlatform(std::env::consts::OS.to_string()).into())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
