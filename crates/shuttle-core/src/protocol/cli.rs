//! Line codec for the Lyrion / Logitech Media Server command-line interface.
//!
//! Wire format (one request or response per line):
//! ```text
//! <term> SP <term> SP ... LF
//! ```
//! Every term is percent-encoded, so a player called `Living Room` travels as
//! `Living%20Room` and a MAC-style player id `00:04:20:aa:bb:cc` as
//! `00%3A04%3A20%3Aaa%3Abb%3Acc`.  The server answers a request by echoing
//! its terms with any `?` placeholder replaced by the result.  Tagged result
//! terms have the form `key:value` (encoded as `key%3Avalue`).

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use thiserror::Error;

/// Characters that must be escaped inside a single CLI term.
const TERM_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b':')
    .add(b'\\');

/// Placeholder term asking the server to fill in a value.
pub const QUERY: &str = "?";

/// Number of players requested in one `players` page.
pub const PLAYER_PAGE: u32 = 100;

/// Errors raised while interpreting a server response.
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    /// The server sent an empty line.
    #[error("empty response")]
    EmptyResponse,

    /// The response does not echo the request it is supposed to answer.
    #[error("response does not match request: expected prefix {expected:?}, got {got:?}")]
    UnexpectedEcho { expected: String, got: String },

    /// A player entry in a `players` listing lacked an id or a name.
    #[error("player entry {index} is missing its {field}")]
    IncompletePlayer { index: usize, field: &'static str },

    /// A numeric result could not be parsed.
    #[error("invalid number in response: {0:?}")]
    InvalidNumber(String),
}

/// A player as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerEntry {
    /// Stable player id (usually the MAC address).
    pub id: String,
    /// Human-readable player name.
    pub name: String,
}

// ── Encoding ──────────────────────────────────────────────────────────────────

/// Encodes `terms` as one request line, including the trailing newline.
///
/// # Examples
///
/// ```rust
/// use shuttle_core::protocol::encode_command;
///
/// let line = encode_command(&["00:04:20:aa:bb:cc", "mixer", "volume", "+5"]);
/// assert_eq!(line, "00%3A04%3A20%3Aaa%3Abb%3Acc mixer volume +5\n");
/// ```
pub fn encode_command<S: AsRef<str>>(terms: &[S]) -> String {
    let mut line = terms
        .iter()
        .map(|term| utf8_percent_encode(term.as_ref(), TERM_ENCODE_SET).to_string())
        .collect::<Vec<_>>()
        .join(" ");
    line.push('\n');
    line
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Splits a response line into decoded terms.
///
/// Invalid UTF-8 sequences after decoding are replaced rather than rejected;
/// player names are display text and a lossy name still matches nothing.
pub fn decode_response(line: &str) -> Vec<String> {
    line.trim_end_matches(|c| c == '\r' || c == '\n')
        .split(' ')
        .filter(|term| !term.is_empty())
        .map(|term| percent_decode_str(term).decode_utf8_lossy().into_owned())
        .collect()
}

/// Extracts the answer to a query request.
///
/// `request` must end with [`QUERY`]; the response must repeat every term
/// before it and carry exactly one result term in its place.
///
/// # Errors
///
/// Returns [`CliError::EmptyResponse`] for an empty response and
/// [`CliError::UnexpectedEcho`] when the echoed prefix differs.
pub fn query_result<S: AsRef<str>>(request: &[S], response: &[String]) -> Result<String, CliError> {
    let (result, echoed) = response.split_last().ok_or(CliError::EmptyResponse)?;
    let prefix = match request.split_last() {
        Some((last, prefix)) if last.as_ref() == QUERY => prefix,
        _ => request,
    };

    let matches = echoed.len() == prefix.len()
        && echoed
            .iter()
            .zip(prefix)
            .all(|(got, expected)| got == expected.as_ref());
    if !matches {
        return Err(CliError::UnexpectedEcho {
            expected: join_terms(prefix),
            got: join_terms(echoed),
        });
    }
    Ok(result.clone())
}

/// Parses an integer result such as a volume level.
///
/// LMS reports volume as an integer but some firmwares send `35.0`; those are
/// rounded.
///
/// # Errors
///
/// Returns [`CliError::InvalidNumber`] if `value` is not numeric.
pub fn parse_integer(value: &str) -> Result<i32, CliError> {
    if let Ok(n) = value.parse::<i32>() {
        return Ok(n);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(|n| n.round() as i32)
        .ok_or_else(|| CliError::InvalidNumber(value.to_string()))
}

/// Parses the player list out of a decoded `players <start> <count>` response.
///
/// Each `playerindex:N` tag opens a new entry; `playerid` and `name` tags fill
/// it.  Tags before the first `playerindex` (such as `count`) are ignored.
///
/// # Errors
///
/// Returns [`CliError::IncompletePlayer`] if an entry has no id or no name.
pub fn parse_players(response: &[String]) -> Result<Vec<PlayerEntry>, CliError> {
    let mut partial: Vec<(Option<String>, Option<String>)> = Vec::new();

    for (key, value) in response.iter().filter_map(|term| term.split_once(':')) {
        match key {
            "playerindex" => partial.push((None, None)),
            "playerid" => {
                if let Some(entry) = partial.last_mut() {
                    entry.0 = Some(value.to_string());
                }
            }
            "name" => {
                if let Some(entry) = partial.last_mut() {
                    entry.1 = Some(value.to_string());
                }
            }
            _ => {}
        }
    }

    partial
        .into_iter()
        .enumerate()
        .map(|(index, (id, name))| -> Result<PlayerEntry, CliError> {
            Ok(PlayerEntry {
                id: id.ok_or(CliError::IncompletePlayer {
                    index,
                    field: "playerid",
                })?,
                name: name.ok_or(CliError::IncompletePlayer {
                    index,
                    field: "name",
                })?,
            })
        })
        .collect()
}

fn join_terms<S: AsRef<str>>(terms: &[S]) -> String {
    terms
        .iter()
        .map(|term| term.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
