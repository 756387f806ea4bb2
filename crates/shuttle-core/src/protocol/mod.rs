//! Protocol module containing the LMS CLI line codec.

pub mod cli;

pub use cli::{
    decode_response, encode_command, parse_players, query_result, CliError, PlayerEntry,
};
