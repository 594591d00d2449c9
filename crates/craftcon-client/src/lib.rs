//! High-level console client for Craftcon.
//!
//! This crate is the surface most callers use:
//!
//! 1. **Configuration** ([`ClientConfig`]) — connection parameters,
//!    resolvable from the process environment with sane defaults for
//!    everything except the shared secret.
//! 2. **Execution** ([`RconClient`]) — persistent-connection command
//!    execution with round-trip latency, plus a one-shot convenience
//!    mode that opens, execs, and closes in one call.
//! 3. **Structured queries** ([`PlayerList`]) — parsing the well-known
//!    player-list reply into numbers and names.

mod client;
mod config;
mod error;

pub use client::{CommandReply, PlayerList, RconClient};
pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;
