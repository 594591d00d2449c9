//! Semantic command translation for Craftcon.
//!
//! A [`SemanticCommand`] is a typed, validated domain action — "spawn
//! this entity here", "say this", "set that score" — that exists only
//! between the caller and the translator. [`translate`] turns one
//! validated action into exactly one console command string; it never
//! produces zero or several, and a command missing a required field is
//! rejected here, before anything touches the network.
//!
//! The translator is a pure function: no I/O, no async, no state.

mod error;
mod types;

pub use error::CommandError;
pub use types::{Action, Position, SemanticCommand};

/// Translates one semantic command into its console command string.
///
/// Each action has its own required-field contract (see [`Action`]);
/// the first missing or malformed field produces a [`CommandError`]
/// naming the action and the field.
pub fn translate(command: &SemanticCommand) -> Result<String, CommandError> {
    match command.action {
        Action::Spawn => {
            let entity = command.require_target()?;
            let pos = command.require_position()?;
            Ok(format!("summon {entity} {}", pos.as_args()))
        }
        Action::Despawn => {
            let target = command.require_target()?;
            Ok(format!("kill {target}"))
        }
        Action::Move => {
            let target = command.require_target()?;
            let pos = command.require_position()?;
            Ok(format!("tp {target} {}", pos.as_args()))
        }
        Action::Say => {
            let message = command.require_message()?;
            Ok(format!("say {message}"))
        }
        Action::Interact => {
            let target = command.require_target()?;
            Ok(format!("data get entity {target}"))
        }
        Action::Query => {
            // The one action with no required fields: defaults to the
            // status command, overridable with an explicit query string.
            Ok(command
                .data
                .clone()
                .unwrap_or_else(|| "list".to_string()))
        }
        Action::Scoreboard => {
            let target = command.require_target()?;
            let objective = command.require_message()?;
            let value = command.require_numeric_data()?;
            Ok(format!("scoreboard players set {target} {objective} {value}"))
        }
    }
}
