//! Storage infrastructure: the optional TOML configuration file.
//!
//! The `config` sub-module owns the file schema, its built-in defaults, and
//! the fixed set of accepted log-level names.  Command-line flags are merged
//! on top of it in `main.rs`.

pub mod config;
