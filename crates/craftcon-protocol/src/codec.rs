//! Binary encode/decode for the length-prefixed frame format.
//!
//! The codec is pure: it transforms between [`Frame`] values and bytes,
//! and never performs I/O. The decode side is written against a growable
//! [`BytesMut`] so the transport can append whatever the socket produced
//! and drain as many complete frames as happen to be buffered — zero, one,
//! or several — leaving any trailing fragment untouched for the next read.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{Frame, FrameError, FrameKind};

/// Smallest legal value of the size field: id (4) + type (4) + the two
/// NUL terminators (2), i.e. an empty body.
pub const MIN_FRAME_SIZE: i32 = 10;

/// Hard cap on the declared size field (1 MiB).
///
/// The protocol itself does not bound frame sizes, so a corrupted or
/// hostile size field could otherwise demand unbounded buffering before
/// the "frame" ever completes. Real servers in this protocol family cap
/// combined frames at a few KiB; 1 MiB leaves generous headroom while
/// keeping the failure mode a clean decode error.
pub const MAX_FRAME_SIZE: i32 = 1024 * 1024;

/// Encodes a frame to its wire representation.
///
/// The body is written as raw UTF-8. No length limit is enforced on
/// encode — the cap in [`MAX_FRAME_SIZE`] guards the *inbound* path,
/// where the size field arrives from an untrusted peer.
pub fn encode(frame: &Frame) -> Bytes {
    let body = frame.body.as_bytes();
    let size = 4 + 4 + body.len() + 2;

    let mut buf = BytesMut::with_capacity(4 + size);
    buf.put_i32_le(size as i32);
    buf.put_i32_le(frame.id);
    buf.put_i32_le(frame.kind.wire_code());
    buf.put_slice(body);
    // Body NUL plus the empty-string NUL that ends every frame.
    buf.put_u8(0);
    buf.put_u8(0);
    buf.freeze()
}

/// Attempts to decode one frame from the front of `buf`.
///
/// - Returns `Ok(Some(frame))` and consumes exactly the frame's bytes
///   when a complete frame is buffered.
/// - Returns `Ok(None)` without consuming anything when the buffer holds
///   less than one complete frame. This is the "wait for more data"
///   signal, never an error.
/// - Returns `Err` only for a structurally invalid frame: an implausible
///   size field, an unknown type code, or a missing terminator. Such an
///   error is terminal for the byte stream — framing is lost.
///
/// Call in a loop to drain every complete frame from the buffer.
pub fn decode(buf: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
    if buf.len() < 4 {
        return Ok(None);
    }

    // Peek at the size field without consuming it — if the rest of the
    // frame hasn't arrived yet we must leave the buffer intact.
    let size = (&buf[..4]).get_i32_le();
    if size < MIN_FRAME_SIZE {
        return Err(FrameError::SizeTooSmall(size));
    }
    if size > MAX_FRAME_SIZE {
        return Err(FrameError::SizeTooLarge(size));
    }

    let total = 4 + size as usize;
    if buf.len() < total {
        return Ok(None);
    }

    let mut frame = buf.split_to(total);
    frame.advance(4); // size field, already validated
    let id = frame.get_i32_le();
    let code = frame.get_i32_le();
    let kind =
        FrameKind::from_wire_code(code).ok_or(FrameError::UnknownKind(code))?;

    let body_len = frame.len() - 2;
    if frame[body_len..] != [0, 0] {
        return Err(FrameError::MissingTerminator);
    }

    // Lossy conversion mirrors the reference behavior: a server that
    // emits invalid UTF-8 yields replacement characters, not a dead
    // connection.
    let body = String::from_utf8_lossy(&frame[..body_len]).into_owned();

    Ok(Some(Frame { id, kind, body }))
}
