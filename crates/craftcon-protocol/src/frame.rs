//! Frame types: the single message structure of the console protocol.
//!
//! Every message in either direction is one [`Frame`]: a correlation id,
//! a type discriminant, and a text body. The protocol has no nesting and
//! no optional fields — all the interesting structure lives in the body
//! string, which this layer treats as opaque.

use std::fmt;

/// The correlation id a server echoes back to signal a failed
/// authentication attempt.
///
/// This is the protocol's only positive bad-credential signal: the server
/// replies with id `-1` regardless of the id the client sent in its Auth
/// frame. The transport layer must check for this before concluding that
/// an auth attempt merely timed out.
pub const AUTH_FAILED_ID: i32 = -1;

/// The type discriminant of a [`Frame`].
///
/// Wire codes are a quirk of this protocol family: `AuthResponse` and
/// `ExecCommand` **share** wire code 2. The two are told apart by
/// direction, not by value — a client only ever *sends* `Auth` and
/// `ExecCommand`, and only ever *receives* `AuthResponse` and
/// `ResponseValue`. [`FrameKind::from_wire_code`] therefore decodes an
/// inbound 2 as `AuthResponse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// Client → Server: "Here is the shared secret." Wire code 3.
    Auth,
    /// Server → Client: auth verdict (id `-1` means rejected). Wire code 2.
    AuthResponse,
    /// Client → Server: "Run this command string." Wire code 2.
    ExecCommand,
    /// Server → Client: the output of an executed command. Wire code 0.
    ResponseValue,
}

impl FrameKind {
    /// Returns the i32 written into the frame's type field.
    pub const fn wire_code(self) -> i32 {
        match self {
            Self::Auth => 3,
            Self::AuthResponse | Self::ExecCommand => 2,
            Self::ResponseValue => 0,
        }
    }

    /// Maps an inbound wire code back to a kind.
    ///
    /// Since we are the client side of the connection, code 2 always
    /// means `AuthResponse` here. Returns `None` for codes the protocol
    /// does not define.
    pub fn from_wire_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::ResponseValue),
            2 => Some(Self::AuthResponse),
            3 => Some(Self::Auth),
            _ => None,
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auth => "auth",
            Self::AuthResponse => "auth-response",
            Self::ExecCommand => "exec-command",
            Self::ResponseValue => "response-value",
        };
        write!(f, "{name}")
    }
}

/// One complete protocol message.
///
/// Wire representation (little-endian i32s):
///
/// ```text
/// [size][id][type][body bytes][0x00][0x00]
/// ```
///
/// where `size` counts everything after itself, so
/// `size == 4 + 4 + body.len() + 2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Correlation id linking a request to its response.
    pub id: i32,
    /// Type discriminant.
    pub kind: FrameKind,
    /// UTF-8 text payload (a password, a command, or command output).
    pub body: String,
}

impl Frame {
    /// Builds an Auth frame carrying the shared secret.
    pub fn auth(id: i32, password: &str) -> Self {
        Self {
            id,
            kind: FrameKind::Auth,
            body: password.to_string(),
        }
    }

    /// Builds an ExecCommand frame carrying a command string.
    pub fn exec(id: i32, command: &str) -> Self {
        Self {
            id,
            kind: FrameKind::ExecCommand,
            body: command.to_string(),
        }
    }

    /// Builds a ResponseValue frame. Used by tests standing in for a
    /// server, and kept symmetric with the other constructors.
    pub fn response(id: i32, body: &str) -> Self {
        Self {
            id,
            kind: FrameKind::ResponseValue,
            body: body.to_string(),
        }
    }

    /// Builds an AuthResponse frame (server side of the handshake).
    pub fn auth_response(id: i32) -> Self {
        Self {
            id,
            kind: FrameKind::AuthResponse,
            body: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_code_matches_protocol_family() {
        assert_eq!(FrameKind::Auth.wire_code(), 3);
        assert_eq!(FrameKind::AuthResponse.wire_code(), 2);
        assert_eq!(FrameKind::ExecCommand.wire_code(), 2);
        assert_eq!(FrameKind::ResponseValue.wire_code(), 0);
    }

    #[test]
    fn test_from_wire_code_decodes_client_receivable_kinds() {
        assert_eq!(FrameKind::from_wire_code(0), Some(FrameKind::ResponseValue));
        assert_eq!(FrameKind::from_wire_code(3), Some(FrameKind::Auth));
    }

    #[test]
    fn test_from_wire_code_two_is_auth_response() {
        // AuthResponse and ExecCommand share code 2; the client never
        // receives ExecCommand, so inbound 2 is always an auth verdict.
        assert_eq!(FrameKind::from_wire_code(2), Some(FrameKind::AuthResponse));
    }

    #[test]
    fn test_from_wire_code_unknown_returns_none() {
        assert_eq!(FrameKind::from_wire_code(1), None);
        assert_eq!(FrameKind::from_wire_code(42), None);
        assert_eq!(FrameKind::from_wire_code(-7), None);
    }

    #[test]
    fn test_frame_kind_display() {
        assert_eq!(FrameKind::Auth.to_string(), "auth");
        assert_eq!(FrameKind::ResponseValue.to_string(), "response-value");
    }

    #[test]
    fn test_constructors_set_expected_kinds() {
        assert_eq!(Frame::auth(0, "secret").kind, FrameKind::Auth);
        assert_eq!(Frame::exec(1, "list").kind, FrameKind::ExecCommand);
        assert_eq!(Frame::response(1, "ok").kind, FrameKind::ResponseValue);
        assert_eq!(Frame::auth_response(0).kind, FrameKind::AuthResponse);
        assert!(Frame::auth_response(0).body.is_empty());
    }
}
