//! Error types for the protocol layer.
//!
//! A `FrameError` always means the peer sent something structurally
//! broken. An *incomplete* buffer is not an error — [`decode`](crate::decode)
//! reports that as `Ok(None)` so the transport can wait for more bytes.

use crate::codec::{MAX_FRAME_SIZE, MIN_FRAME_SIZE};

/// Errors that can occur while decoding a frame.
///
/// `PartialEq` is derived so tests can assert on exact variants.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FrameError {
    /// The declared size can't even hold the fixed fields
    /// (id + type + two NUL terminators).
    #[error("declared frame size {0} is below the protocol minimum of {MIN_FRAME_SIZE}")]
    SizeTooSmall(i32),

    /// The declared size exceeds the hard cap. Without this cap a corrupt
    /// or hostile size field would make the reader buffer without bound.
    #[error("declared frame size {0} exceeds the cap of {MAX_FRAME_SIZE} bytes")]
    SizeTooLarge(i32),

    /// The type field holds a code the protocol does not define.
    #[error("unknown frame type code {0}")]
    UnknownKind(i32),

    /// The frame is not terminated by the required two NUL bytes.
    #[error("frame missing double-NUL terminator")]
    MissingTerminator,
}
