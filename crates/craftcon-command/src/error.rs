use thiserror::Error;

use crate::Action;

/// Why a semantic command could not be translated.
///
/// `PartialEq` so validation outcomes can be asserted on directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The action needs a field the caller did not supply. `field` is
    /// the caller-facing (camelCase) name.
    #[error("{action} command is missing required field `{field}`")]
    MissingField { action: Action, field: &'static str },

    /// The field was supplied but its value does not fit the action's
    /// contract.
    #[error("{action} command has invalid `{field}`: {reason}")]
    InvalidField {
        action: Action,
        field: &'static str,
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_names_action_and_field() {
        let err = CommandError::MissingField {
            action: Action::Spawn,
            field: "position",
        };
        assert_eq!(
            err.to_string(),
            "spawn command is missing required field `position`"
        );
    }

    #[test]
    fn test_invalid_field_includes_reason() {
        let err = CommandError::InvalidField {
            action: Action::Scoreboard,
            field: "data",
            reason: "expected an integer value",
        };
        assert_eq!(
            err.to_string(),
            "scoreboard command has invalid `data`: expected an integer value"
        );
    }
}
