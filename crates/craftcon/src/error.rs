//! Unified error type for the Craftcon client stack.

use craftcon_client::{ClientError, ConfigError};
use craftcon_command::CommandError;
use craftcon_protocol::FrameError;
use craftcon_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `craftcon` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A wire-level error (malformed or oversized frame).
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// A connection-level error (connect, auth, timeout, teardown).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A configuration error (missing password, bad numeric value).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A client-level error.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A semantic-command validation error.
    #[error(transparent)]
    Command(#[from] CommandError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftcon_command::Action;

    #[test]
    fn test_from_transport_error() {
        let err: Error = TransportError::AuthRejected.into();
        assert!(matches!(err, Error::Transport(_)));
        assert!(err.to_string().contains("rejected"));
    }

    #[test]
    fn test_from_frame_error() {
        let err: Error = FrameError::MissingTerminator.into();
        assert!(matches!(err, Error::Frame(_)));
    }

    #[test]
    fn test_from_config_error() {
        let err: Error = ConfigError::MissingPassword.into();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_command_error() {
        let err: Error = CommandError::MissingField {
            action: Action::Spawn,
            field: "position",
        }
        .into();
        assert!(matches!(err, Error::Command(_)));
        assert!(err.to_string().contains("position"));
    }
}
