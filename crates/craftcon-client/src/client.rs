//! The high-level client: persistent connections, one-shot execution,
//! and the structured player-list query.

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use craftcon_transport::RconConnection;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{ClientConfig, ClientError};

/// The fixed natural-language shape of the player-list reply:
/// `There are N of a max of M players online: a, b, c`.
static PLAYER_LIST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"There are (\d+) of a max of (\d+) players online:\s*(.*)")
        .expect("player-list pattern is a valid regex")
});

/// The raw outcome of one executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    /// The response body, verbatim.
    pub body: String,
    /// Round-trip time from write to matched response.
    pub latency: Duration,
}

/// The parsed player-list reply.
///
/// `Default` is the zeroed/empty result deliberately returned when the
/// reply doesn't match the expected pattern — the reply format is
/// unstructured prose, so "couldn't parse" degrades softly instead of
/// failing the query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerList {
    /// Players currently online.
    pub num_players: u32,
    /// Server capacity.
    pub max_players: u32,
    /// Player names, in server order.
    pub players: Vec<String>,
}

/// A connected console client.
///
/// Thin on purpose: correlation, timeouts, and the read task all live in
/// the transport layer. This layer adds configuration, latency
/// measurement, scoped one-shot execution, and reply parsing.
pub struct RconClient {
    conn: RconConnection,
}

impl RconClient {
    /// Opens and authenticates a persistent connection.
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let conn = RconConnection::connect(&config.connect_options()).await?;
        Ok(Self { conn })
    }

    /// Executes one command and returns its reply with round-trip latency.
    pub async fn exec(&self, command: &str) -> Result<CommandReply, ClientError> {
        let start = Instant::now();
        let body = self.conn.exec(command).await?;
        let latency = start.elapsed();
        tracing::debug!(command, latency_ms = latency.as_millis() as u64, "command completed");
        Ok(CommandReply { body, latency })
    }

    /// Connects, executes a single command, and closes — unconditionally.
    ///
    /// The close happens on the failure path too: a one-shot caller must
    /// never be left holding (or leaking) a live connection.
    pub async fn one_shot(
        config: &ClientConfig,
        command: &str,
    ) -> Result<CommandReply, ClientError> {
        let client = Self::connect(config).await?;
        let result = client.exec(command).await;
        client.close().await;
        result
    }

    /// Runs the well-known status command and parses the player list.
    ///
    /// Transport failures surface as errors; a reply that merely doesn't
    /// match the expected prose yields the zeroed/empty [`PlayerList`].
    pub async fn player_list(&self) -> Result<PlayerList, ClientError> {
        let reply = self.exec("list").await?;
        Ok(parse_player_list(&reply.body))
    }

    /// Whether the underlying connection can still carry commands.
    pub fn is_ready(&self) -> bool {
        self.conn.is_ready()
    }

    /// Closes the underlying connection. Idempotent.
    pub async fn close(&self) {
        self.conn.close().await;
    }
}

/// Parses the player-list reply, degrading to the zeroed/empty result on
/// any mismatch.
fn parse_player_list(body: &str) -> PlayerList {
    let Some(caps) = PLAYER_LIST_PATTERN.captures(body) else {
        return PlayerList::default();
    };
    let (Ok(num_players), Ok(max_players)) =
        (caps[1].parse::<u32>(), caps[2].parse::<u32>())
    else {
        return PlayerList::default();
    };

    let players = caps[3]
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect();

    PlayerList {
        num_players,
        max_players,
        players,
    }
}
