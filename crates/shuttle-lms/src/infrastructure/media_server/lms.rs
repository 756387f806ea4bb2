//! LMS CLI client: a blocking line-protocol connection to port 9090.
//!
//! One TCP connection is opened per [`MediaServer::connect`] call and shared
//! by every [`LmsPlayer`] listed from it.  Requests are strictly
//! request/response on the calling thread, so sharing is plain
//! `Rc<RefCell<_>>`.
//!
//! Every socket operation is bounded by the configured timeout; a slow server
//! surfaces as a [`ServerError::Io`] instead of stalling the read loop.

use std::cell::RefCell;
use std::fmt;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::rc::Rc;
use std::time::Duration;

use shuttle_core::protocol::cli::{
    decode_response, encode_command, parse_integer, parse_players, query_result, PLAYER_PAGE,
    QUERY,
};
use tracing::{debug, trace};

use crate::application::player_control::{MediaPlayer, MediaServer, PlayerHandle, ServerError};

/// Default LMS CLI port.
pub const DEFAULT_PORT: u16 = 9090;

// ── Connection ────────────────────────────────────────────────────────────────

struct CliConnection {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl CliConnection {
    fn open(host: &str, port: u16, timeout: Duration) -> Result<Self, ServerError> {
        let address = format!("{host}:{port}");
        let unreachable = |source| ServerError::Unreachable {
            address: address.clone(),
            source,
        };

        let mut last_error = None;
        for addr in (host, port).to_socket_addrs().map_err(unreachable)? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(timeout))?;
                    stream.set_write_timeout(Some(timeout))?;
                    stream.set_nodelay(true)?;
                    let writer = stream.try_clone()?;
                    debug!("connected to LMS CLI at {addr}");
                    return Ok(Self {
                        reader: BufReader::new(stream),
                        writer,
                    });
                }
                Err(e) => last_error = Some(e),
            }
        }

        Err(unreachable(last_error.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                "host resolved to no addresses",
            )
        })))
    }

    /// Sends one request line and returns the decoded reply terms.
    fn request<S: AsRef<str>>(&mut self, terms: &[S]) -> Result<Vec<String>, ServerError> {
        let line = encode_command(terms);
        trace!("-> {}", line.trim_end());
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;

        let mut reply = String::new();
        if self.reader.read_line(&mut reply)? == 0 {
            return Err(ServerError::Closed);
        }
        trace!("<- {}", reply.trim_end());
        Ok(decode_response(&reply))
    }

    /// Sends a request ending in `?` and returns the filled-in value.
    fn query<S: AsRef<str>>(&mut self, terms: &[S]) -> Result<String, ServerError> {
        let reply = self.request(terms)?;
        Ok(query_result(terms, &reply)?)
    }
}

type SharedConnection = Rc<RefCell<CliConnection>>;

// ── Server ────────────────────────────────────────────────────────────────────

/// A Lyrion / Logitech Media Server reached over its CLI port.
pub struct LmsServer {
    host: String,
    port: u16,
    timeout: Duration,
    connection: Option<SharedConnection>,
}

impl LmsServer {
    /// Creates an unconnected server handle.
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
            connection: None,
        }
    }

    /// `host:port` of the server.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns `true` once `connect` has succeeded.
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }
}

impl fmt::Debug for LmsServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LmsServer")
            .field("address", &self.address())
            .field("timeout", &self.timeout)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl MediaServer for LmsServer {
    fn connect(&mut self) -> Result<(), ServerError> {
        self.connection = None;
        let connection = CliConnection::open(&self.host, self.port, self.timeout)?;
        self.connection = Some(Rc::new(RefCell::new(connection)));
        Ok(())
    }

    fn players(&mut self) -> Result<Vec<PlayerHandle>, ServerError> {
        let connection = self.connection.as_ref().ok_or(ServerError::NotConnected)?;
        let page = PLAYER_PAGE.to_string();
        let reply = connection
            .borrow_mut()
            .request(&["players", "0", page.as_str()])?;

        let players = parse_players(&reply)?
            .into_iter()
            .map(|entry| {
                Box::new(LmsPlayer {
                    id: entry.id,
                    name: entry.name,
                    connection: Rc::clone(connection),
                }) as PlayerHandle
            })
            .collect::<Vec<_>>();
        debug!("server lists {} player(s)", players.len());
        Ok(players)
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

/// One player on an [`LmsServer`], addressed by its player id.
pub struct LmsPlayer {
    id: String,
    name: String,
    connection: SharedConnection,
}

impl LmsPlayer {
    fn command(&self, terms: &[&str]) -> Result<(), ServerError> {
        let mut request = Vec::with_capacity(terms.len() + 1);
        request.push(self.id.as_str());
        request.extend_from_slice(terms);
        self.connection.borrow_mut().request(&request)?;
        Ok(())
    }
}

impl fmt::Debug for LmsPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LmsPlayer")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl MediaPlayer for LmsPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn volume_up(&mut self, amount: u8) -> Result<(), ServerError> {
        self.command(&["mixer", "volume", &format!("+{amount}")])
    }

    fn volume_down(&mut self, amount: u8) -> Result<(), ServerError> {
        self.command(&["mixer", "volume", &format!("-{amount}")])
    }

    fn volume(&mut self) -> Result<i32, ServerError> {
        let value = self
            .connection
            .borrow_mut()
            .query(&[self.id.as_str(), "mixer", "volume", QUERY])?;
        Ok(parse_integer(&value)?)
    }

    fn toggle(&mut self) -> Result<(), ServerError> {
        self.command(&["pause"])
    }

    fn next(&mut self) -> Result<(), ServerError> {
        self.command(&["playlist", "index", "+1"])
    }

    fn seek_to(&mut self, seconds: u32) -> Result<(), ServerError> {
        self.command(&["time", &seconds.to_string()])
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
