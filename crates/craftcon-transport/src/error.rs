//! Error types for the transport layer.
//!
//! The variants map one-to-one onto the failure taxonomy callers care
//! about: which errors kill the connection (everything except
//! `CommandTimeout`) and which kill only a single command.

use craftcon_protocol::FrameError;

/// Errors that can occur on a console connection.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Establishing the TCP connection failed (DNS, refusal, unreachable).
    #[error("connect failed: {0}")]
    Connect(#[source] std::io::Error),

    /// A socket read or write failed after the connection was up.
    #[error("socket i/o failed: {0}")]
    Io(#[source] std::io::Error),

    /// The server explicitly rejected the shared secret by echoing the
    /// `-1` correlation id in its auth response.
    #[error("authentication rejected: bad shared secret")]
    AuthRejected,

    /// No auth response arrived within the configured auth timeout.
    /// Distinct from [`Self::AuthRejected`]: the credentials were never
    /// judged, the server just didn't answer.
    #[error("authentication timed out")]
    AuthTimeout,

    /// No response frame for this command arrived within the per-command
    /// timeout. Terminal for the command, not for the connection.
    #[error("command {id} timed out waiting for a response")]
    CommandTimeout {
        /// The correlation id of the abandoned command.
        id: i32,
    },

    /// The peer sent a structurally invalid frame. Framing is lost, so
    /// the connection is torn down.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// The connection is closed (locally or by the peer) and cannot
    /// carry further commands.
    #[error("connection closed")]
    Closed,
}

impl TransportError {
    /// Whether this error ends the connection (as opposed to only the
    /// command that observed it).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::CommandTimeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_timeout_is_not_terminal() {
        assert!(!TransportError::CommandTimeout { id: 3 }.is_terminal());
    }

    #[test]
    fn test_connection_errors_are_terminal() {
        assert!(TransportError::AuthRejected.is_terminal());
        assert!(TransportError::AuthTimeout.is_terminal());
        assert!(TransportError::Closed.is_terminal());
        assert!(
            TransportError::Frame(FrameError::MissingTerminator).is_terminal()
        );
    }

    #[test]
    fn test_display_distinguishes_rejection_from_timeout() {
        let rejected = TransportError::AuthRejected.to_string();
        let timed_out = TransportError::AuthTimeout.to_string();
        assert!(rejected.contains("rejected"));
        assert!(timed_out.contains("timed out"));
        assert_ne!(rejected, timed_out);
    }
}
