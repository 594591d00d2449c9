//! Wire protocol for Craftcon.
//!
//! This crate defines the binary frame format that the client and the
//! remote console server speak:
//!
//! - **Types** ([`Frame`], [`FrameKind`]) — the one message structure
//!   that travels on the wire, and its type discriminant.
//! - **Codec** ([`encode`], [`decode`]) — how frames are converted
//!   to/from bytes, including partial-buffer handling.
//! - **Errors** ([`FrameError`]) — what can go wrong while decoding.
//!
//! # Architecture
//!
//! The protocol layer is pure transformation: it never touches a socket.
//! The transport layer above feeds it raw bytes and writes out the bytes
//! it produces.
//!
//! ```text
//! Transport (TCP bytes) → Protocol (Frame) → Client (command strings)
//! ```

mod codec;
mod error;
mod frame;

pub use codec::{decode, encode, MAX_FRAME_SIZE, MIN_FRAME_SIZE};
pub use error::FrameError;
pub use frame::{Frame, FrameKind, AUTH_FAILED_ID};
