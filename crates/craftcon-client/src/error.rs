//! Error type for the client layer.

use craftcon_transport::TransportError;

use crate::ConfigError;

/// Errors surfaced by the high-level client.
///
/// The two sources stay distinguishable (`#[from]` wrapping, not
/// stringification) so callers can tell "fix your environment" apart
/// from "the server/network misbehaved".
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Configuration could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The connection or a command failed at the transport layer.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
