//! The console connection: TCP socket, auth handshake, and the
//! demultiplexing read task.
//!
//! One [`RconConnection`] owns one TCP socket for one authenticated
//! session. The flow is:
//!
//!   1. TCP connect (bounded by the auth timeout)
//!   2. Send one Auth frame carrying the shared secret
//!   3. Await exactly one AuthResponse frame (id `-1` means rejected)
//!   4. Spawn the read task; the connection is now `Ready`
//!
//! The read task is the *only* reader of the socket. It owns the byte
//! buffer, drains complete frames, and hands each one to the dispatcher,
//! which wakes the single caller whose correlation id matches. This
//! replaces per-command listener registration with one demultiplexing
//! loop per connection, so no listener can leak on an early return.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::BytesMut;
use craftcon_protocol::{decode, encode, Frame, FrameKind, AUTH_FAILED_ID};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time;

use crate::dispatch::Dispatcher;
use crate::TransportError;

/// The correlation id sent with the Auth frame. The dispatcher hands out
/// ids from 1, so the handshake can never collide with a command.
const AUTH_ID: i32 = 0;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Everything needed to open one authenticated connection.
/// Immutable once the connection is opened.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Server hostname or IP.
    pub host: String,
    /// Server console port.
    pub port: u16,
    /// The shared secret. There is deliberately no default: a missing
    /// secret is a configuration error at the layer above, never a
    /// silent skip.
    pub password: String,
    /// Bound on the whole open sequence: TCP connect plus the wait for
    /// the auth verdict.
    pub auth_timeout: Duration,
    /// Per-command response timeout. Independent of `auth_timeout`.
    pub command_timeout: Duration,
}

impl ConnectOptions {
    /// Creates options with the conventional 10-second timeouts.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            password: password.into(),
            auth_timeout: Duration::from_secs(10),
            command_timeout: Duration::from_secs(10),
        }
    }

    /// The `host:port` string handed to the TCP connector.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ---------------------------------------------------------------------------
// Connection state
// ---------------------------------------------------------------------------

/// Lifecycle of a connection.
///
/// ```text
/// Disconnected → Connecting → Authenticating → Ready → Closed
///                     │             │            │
///                     └─────────────┴────────────┴──(socket error)──→ Closed
/// ```
///
/// Only `Ready` accepts commands. `Closed` is terminal: there is no
/// automatic reconnection, the owner opens a fresh connection instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    /// No socket yet.
    Disconnected = 0,
    /// TCP connect in progress.
    Connecting = 1,
    /// Socket up, awaiting the auth verdict.
    Authenticating = 2,
    /// Authenticated; commands may be sent.
    Ready = 3,
    /// Dead, by error or by explicit close.
    Closed = 4,
}

impl ConnectionState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Disconnected,
            1 => Self::Connecting,
            2 => Self::Authenticating,
            3 => Self::Ready,
            _ => Self::Closed,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared state between the handle and the read task
// ---------------------------------------------------------------------------

/// State shared by the connection handle and its read task.
struct Shared {
    dispatcher: Dispatcher,
    state: AtomicU8,
}

impl Shared {
    fn new() -> Self {
        Self {
            dispatcher: Dispatcher::new(),
            state: AtomicU8::new(ConnectionState::Disconnected as u8),
        }
    }

    fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Marks the connection dead and wakes every pending waiter with a
    /// closed channel. Safe to call more than once.
    fn mark_closed(&self) {
        self.set_state(ConnectionState::Closed);
        self.dispatcher.fail_all();
    }
}

// ---------------------------------------------------------------------------
// RconConnection
// ---------------------------------------------------------------------------

/// One authenticated console connection.
///
/// `exec` may be called concurrently from multiple tasks: writes are
/// serialized behind an async mutex and each call waits on its own
/// correlation id, so completions are independent and may resolve out of
/// order relative to issuance.
pub struct RconConnection {
    shared: Arc<Shared>,
    writer: Mutex<OwnedWriteHalf>,
    read_task: JoinHandle<()>,
    command_timeout: Duration,
}

impl RconConnection {
    /// Opens a TCP connection and performs the auth handshake.
    ///
    /// # Errors
    /// - [`TransportError::Connect`] — TCP connect failed
    /// - [`TransportError::AuthRejected`] — the server echoed id `-1`
    /// - [`TransportError::AuthTimeout`] — no verdict within the timeout
    /// - [`TransportError::Closed`] — the server hung up mid-handshake
    ///
    /// All of these are terminal for the attempt; retry policy belongs
    /// to the caller.
    pub async fn connect(
        options: &ConnectOptions,
    ) -> Result<Self, TransportError> {
        let shared = Arc::new(Shared::new());
        let addr = options.addr();

        shared.set_state(ConnectionState::Connecting);
        tracing::debug!(%addr, "connecting");
        let stream =
            time::timeout(options.auth_timeout, TcpStream::connect(&addr))
                .await
                .map_err(|_| TransportError::AuthTimeout)?
                .map_err(TransportError::Connect)?;
        let (mut reader, mut writer) = stream.into_split();

        shared.set_state(ConnectionState::Authenticating);
        writer
            .write_all(&encode(&Frame::auth(AUTH_ID, &options.password)))
            .await
            .map_err(TransportError::Io)?;

        // Read inline until the verdict arrives; whatever ends up in the
        // buffer beyond it is handed to the read task untouched.
        let mut buf = BytesMut::with_capacity(4096);
        let verdict =
            await_auth_response(&mut reader, &mut buf, options.auth_timeout)
                .await?;

        // The rejection signal is an echoed id of -1, regardless of the
        // id we sent. Check it before anything else — a rejected secret
        // must never be misreported as a timeout.
        if verdict.id == AUTH_FAILED_ID {
            shared.set_state(ConnectionState::Closed);
            tracing::warn!(%addr, "authentication rejected");
            return Err(TransportError::AuthRejected);
        }

        shared.set_state(ConnectionState::Ready);
        tracing::info!(%addr, "authenticated");

        let read_task =
            tokio::spawn(read_loop(reader, buf, Arc::clone(&shared)));

        Ok(Self {
            shared,
            writer: Mutex::new(writer),
            read_task,
            command_timeout: options.command_timeout,
        })
    }

    /// Sends one command and awaits its response body.
    ///
    /// # Errors
    /// - [`TransportError::CommandTimeout`] — no matching response within
    ///   the per-command window. Only this command is abandoned; the
    ///   connection stays usable.
    /// - [`TransportError::Closed`] — the connection died before or
    ///   while waiting.
    /// - [`TransportError::Io`] — the write itself failed.
    pub async fn exec(&self, command: &str) -> Result<String, TransportError> {
        if self.shared.state() != ConnectionState::Ready {
            return Err(TransportError::Closed);
        }

        let (id, rx) = self.shared.dispatcher.register();
        let bytes = encode(&Frame::exec(id, command));

        {
            let mut writer = self.writer.lock().await;
            if let Err(e) = writer.write_all(&bytes).await {
                self.shared.dispatcher.forget(id);
                self.shared.mark_closed();
                return Err(TransportError::Io(e));
            }
        }
        tracing::debug!(id, command, "command sent");

        match time::timeout(self.command_timeout, rx).await {
            Ok(Ok(body)) => Ok(body),
            // Channel closed without a value: the read task tore the
            // pending table down because the connection died.
            Ok(Err(_)) => Err(TransportError::Closed),
            Err(_) => {
                self.shared.dispatcher.forget(id);
                tracing::debug!(id, "command timed out");
                Err(TransportError::CommandTimeout { id })
            }
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.shared.state()
    }

    /// Whether commands can currently be sent.
    pub fn is_ready(&self) -> bool {
        self.state() == ConnectionState::Ready
    }

    /// Number of commands awaiting responses.
    pub fn in_flight(&self) -> usize {
        self.shared.dispatcher.in_flight()
    }

    /// Closes the connection: stops the read task, fails every pending
    /// command, and shuts the socket down. Idempotent.
    pub async fn close(&self) {
        self.shared.mark_closed();
        self.read_task.abort();
        let mut writer = self.writer.lock().await;
        // Best effort — the peer may already be gone.
        let _ = writer.shutdown().await;
        tracing::debug!("connection closed");
    }
}

impl Drop for RconConnection {
    fn drop(&mut self) {
        // The read task borrows nothing from `self`, but it must not
        // outlive the handle that owns the connection.
        self.read_task.abort();
        self.shared.mark_closed();
    }
}

// ---------------------------------------------------------------------------
// Handshake and read loop
// ---------------------------------------------------------------------------

/// Reads frames until the auth verdict (a type-2 frame) arrives.
///
/// Some servers emit a stray ResponseValue before the verdict; those are
/// skipped. The deadline covers the whole wait, not each read.
async fn await_auth_response(
    reader: &mut OwnedReadHalf,
    buf: &mut BytesMut,
    timeout: Duration,
) -> Result<Frame, TransportError> {
    let deadline = Instant::now() + timeout;
    loop {
        while let Some(frame) = decode(buf)? {
            if frame.kind == FrameKind::AuthResponse {
                return Ok(frame);
            }
            tracing::debug!(
                id = frame.id,
                kind = %frame.kind,
                "skipping pre-auth frame"
            );
        }

        let remaining = deadline
            .checked_duration_since(Instant::now())
            .ok_or(TransportError::AuthTimeout)?;
        let n = time::timeout(remaining, reader.read_buf(buf))
            .await
            .map_err(|_| TransportError::AuthTimeout)?
            .map_err(TransportError::Io)?;
        if n == 0 {
            return Err(TransportError::Closed);
        }
    }
}

/// The per-connection read task: drains complete frames from the socket
/// and routes each one through the dispatcher. Exits (and fails all
/// pending commands) on EOF, a socket error, or a malformed frame.
async fn read_loop(
    mut reader: OwnedReadHalf,
    mut buf: BytesMut,
    shared: Arc<Shared>,
) {
    loop {
        loop {
            match decode(&mut buf) {
                Ok(Some(frame)) => {
                    tracing::trace!(
                        id = frame.id,
                        kind = %frame.kind,
                        "frame received"
                    );
                    if !shared.dispatcher.complete(frame.id, frame.body) {
                        // A frame nobody is waiting for is suspicious
                        // (late response after a timeout, or a server
                        // bug) — log it, never drop it silently.
                        tracing::warn!(
                            id = frame.id,
                            "response frame matched no pending request"
                        );
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "malformed frame, closing connection"
                    );
                    shared.mark_closed();
                    return;
                }
            }
        }

        match reader.read_buf(&mut buf).await {
            Ok(0) => {
                tracing::debug!("peer closed the connection");
                shared.mark_closed();
                return;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(error = %e, "socket read failed");
                shared.mark_closed();
                return;
            }
        }
    }
}
