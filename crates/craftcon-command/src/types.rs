//! The semantic command types.
//!
//! These are the only types in the workspace that routinely cross a JSON
//! boundary (callers hand them over as tool arguments), so their serde
//! shape is part of the contract: camelCase fields, lowercase action
//! names.

use serde::{Deserialize, Serialize};

use crate::CommandError;

/// The capability set a semantic command can express.
///
/// `#[serde(rename_all = "lowercase")]` makes the JSON representation
/// `"spawn"`, `"say"`, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Create an entity at a position. Requires `targetId` (the entity
    /// type) and `position`.
    Spawn,
    /// Remove an entity. Requires `targetId`.
    Despawn,
    /// Teleport an entity. Requires `targetId` and `position`.
    Move,
    /// Broadcast a chat message. Requires `message`.
    Say,
    /// Inspect an entity. Requires `targetId`.
    Interact,
    /// Read server status. No required fields; `data` may carry an
    /// explicit query command to run instead of the default.
    Query,
    /// Set a score. Requires `targetId` (the score holder), `message`
    /// (the objective name), and `data` (the integer value).
    Scoreboard,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Spawn => "spawn",
            Self::Despawn => "despawn",
            Self::Move => "move",
            Self::Say => "say",
            Self::Interact => "interact",
            Self::Query => "query",
            Self::Scoreboard => "scoreboard",
        };
        write!(f, "{name}")
    }
}

/// A world position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    /// The position as command-line arguments (`x y z`). Whole numbers
    /// print without a fractional part, matching what the server's own
    /// command syntax expects.
    pub fn as_args(&self) -> String {
        format!("{} {} {}", self.x, self.y, self.z)
    }
}

/// A typed, validated domain action prior to translation.
///
/// Constructed per call and consumed by
/// [`translate`](crate::translate); never persisted. Which optional
/// fields are actually required depends on the [`Action`] — that
/// contract is enforced by the translator, not by the type shape,
/// because the type mirrors the loosely-structured argument object
/// callers supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticCommand {
    /// What to do.
    pub action: Action,
    /// The entity, player, or score holder acted on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    /// Chat text, or the objective name for scoreboard actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Where, for actions that place or move something.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Free-form extra datum (a query override, a scoreboard value).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl SemanticCommand {
    /// A command with only the action set; callers fill in the fields
    /// their action needs.
    pub fn new(action: Action) -> Self {
        Self {
            action,
            target_id: None,
            message: None,
            position: None,
            data: None,
        }
    }

    pub(crate) fn require_target(&self) -> Result<&str, CommandError> {
        self.target_id
            .as_deref()
            .ok_or(CommandError::MissingField {
                action: self.action,
                field: "targetId",
            })
    }

    pub(crate) fn require_message(&self) -> Result<&str, CommandError> {
        self.message.as_deref().ok_or(CommandError::MissingField {
            action: self.action,
            field: "message",
        })
    }

    pub(crate) fn require_position(&self) -> Result<&Position, CommandError> {
        self.position.as_ref().ok_or(CommandError::MissingField {
            action: self.action,
            field: "position",
        })
    }

    /// The `data` field parsed as an integer (scoreboard values are
    /// integral in this protocol's scoreboard model).
    pub(crate) fn require_numeric_data(&self) -> Result<i64, CommandError> {
        let raw = self.data.as_deref().ok_or(CommandError::MissingField {
            action: self.action,
            field: "data",
        })?;
        raw.trim()
            .parse()
            .map_err(|_| CommandError::InvalidField {
                action: self.action,
                field: "data",
                reason: "expected an integer value",
            })
    }
}
