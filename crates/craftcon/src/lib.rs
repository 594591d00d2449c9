//! # Craftcon
//!
//! Async remote-console client for game servers speaking the classic
//! source-style console protocol: length-prefixed binary frames over
//! TCP, a password handshake, and correlation ids matching replies to
//! commands.
//!
//! This meta-crate re-exports the working set from the sub-crates:
//! the wire codec (`craftcon-protocol`), the connection manager
//! (`craftcon-transport`), the high-level client (`craftcon-client`),
//! semantic command translation (`craftcon-command`), and conservation
//! verification (`craftcon-verify`).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use craftcon::prelude::*;
//!
//! # async fn run() -> Result<(), craftcon::Error> {
//! let config = ClientConfig::from_env()?;
//! let client = RconClient::connect(&config).await?;
//! let reply = client.exec("list").await?;
//! println!("{}", reply.body);
//! client.close().await;
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::Error;

pub use craftcon_client::{
    ClientConfig, ClientError, CommandReply, ConfigError, PlayerList, RconClient,
};
pub use craftcon_command::{translate, Action, CommandError, Position, SemanticCommand};
pub use craftcon_protocol::{Frame, FrameError, FrameKind};
pub use craftcon_transport::{ConnectOptions, RconConnection, TransportError};
pub use craftcon_verify::{
    verify, verify_from_remote, verify_with_tolerance, ConservationReport,
};

/// One-stop imports for typical use.
pub mod prelude {
    pub use crate::error::Error;
    pub use craftcon_client::{ClientConfig, CommandReply, PlayerList, RconClient};
    pub use craftcon_command::{translate, Action, Position, SemanticCommand};
    pub use craftcon_verify::{verify, verify_from_remote, ConservationReport};
}
