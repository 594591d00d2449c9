//! TCP transport for Craftcon: connection lifecycle, the authentication
//! handshake, and request/response correlation over one shared socket.
//!
//! This crate owns everything stateful about talking to a remote console
//! server:
//!
//! 1. **Connection management** ([`RconConnection`]) — open a TCP socket,
//!    authenticate with the shared secret, and run a single demultiplexing
//!    read task for the connection's lifetime.
//! 2. **Request dispatch** ([`dispatch::Dispatcher`]) — allocate
//!    monotonically increasing correlation ids and route each inbound
//!    response frame to the one caller waiting on it.
//!
//! # How it fits in the stack
//!
//! ```text
//! Client Layer (above)   ← exec / one-shot / structured queries
//!     ↕
//! Transport Layer (this crate)  ← socket, handshake, correlation, timeouts
//!     ↕
//! Protocol Layer (below) ← frame encode/decode
//! ```
//!
//! # Reconnection policy
//!
//! There is none, on purpose. A connection that errors or closes is
//! terminal: callers that want retry/backoff implement it themselves by
//! opening a fresh connection. Hiding a retry loop at this layer would
//! silently mask auth and network problems.

mod connection;
pub mod dispatch;
mod error;

pub use connection::{ConnectOptions, ConnectionState, RconConnection};
pub use error::TransportError;
