//! Client configuration, resolvable from the process environment.
//!
//! Everything has a conventional default except the shared secret:
//! a missing `RCON_PASSWORD` is a hard configuration error, because a
//! client that silently skips authentication would fail later with a
//! much more confusing rejection.

use std::time::Duration;

use craftcon_transport::ConnectOptions;

/// Environment variable names.
const ENV_HOST: &str = "RCON_HOST";
const ENV_PORT: &str = "RCON_PORT";
const ENV_PASSWORD: &str = "RCON_PASSWORD";
const ENV_AUTH_TIMEOUT_MS: &str = "RCON_AUTH_TIMEOUT_MS";
const ENV_COMMAND_TIMEOUT_MS: &str = "RCON_COMMAND_TIMEOUT_MS";

/// Defaults for everything that has one.
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 25575;
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Errors produced while resolving configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The shared secret is absent. There is no default secret, ever.
    #[error("{ENV_PASSWORD} is not set and the shared secret has no default")]
    MissingPassword,

    /// A numeric variable held something that isn't a number in range.
    #[error("{key} has invalid value {value:?}: expected an integer")]
    InvalidNumber {
        /// The environment variable at fault.
        key: &'static str,
        /// The raw value found there.
        value: String,
    },
}

/// Connection parameters for the console client.
/// Immutable once a connection is opened from it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server hostname or IP. Default `localhost`.
    pub host: String,
    /// Console port. Default `25575`.
    pub port: u16,
    /// The shared secret. Required; no default.
    pub password: String,
    /// Connection/auth timeout. Default 10 s.
    pub auth_timeout: Duration,
    /// Per-command timeout. Default 10 s.
    pub command_timeout: Duration,
}

impl ClientConfig {
    /// Creates a config with explicit connection parameters and the
    /// default timeouts.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            password: password.into(),
            auth_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            command_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Resolves configuration from the process environment
    /// (`RCON_HOST`, `RCON_PORT`, `RCON_PASSWORD`,
    /// `RCON_AUTH_TIMEOUT_MS`, `RCON_COMMAND_TIMEOUT_MS`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an injected lookup. `from_env`
    /// passes `std::env::var`; tests pass a map, so they never have to
    /// mutate the real (process-global) environment.
    pub fn resolve(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let password =
            lookup(ENV_PASSWORD).ok_or(ConfigError::MissingPassword)?;

        let host =
            lookup(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_number(ENV_PORT, lookup(ENV_PORT), DEFAULT_PORT)?;
        let auth_ms = parse_number(
            ENV_AUTH_TIMEOUT_MS,
            lookup(ENV_AUTH_TIMEOUT_MS),
            DEFAULT_TIMEOUT_MS,
        )?;
        let command_ms = parse_number(
            ENV_COMMAND_TIMEOUT_MS,
            lookup(ENV_COMMAND_TIMEOUT_MS),
            DEFAULT_TIMEOUT_MS,
        )?;

        Ok(Self {
            host,
            port,
            password,
            auth_timeout: Duration::from_millis(auth_ms),
            command_timeout: Duration::from_millis(command_ms),
        })
    }

    /// Lowers the config into transport-level connect options.
    pub(crate) fn connect_options(&self) -> ConnectOptions {
        let mut options =
            ConnectOptions::new(self.host.clone(), self.port, self.password.clone());
        options.auth_timeout = self.auth_timeout;
        options.command_timeout = self.command_timeout;
        options
    }
}

/// Parses an optional numeric variable, keeping the default when unset
/// and erroring (not defaulting) when set to garbage.
fn parse_number<N: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: N,
) -> Result<N, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Builds a lookup closure over a literal list of variables.
    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_resolve_password_only_uses_defaults() {
        let config =
            ClientConfig::resolve(env(&[("RCON_PASSWORD", "sesame")]))
                .expect("password alone is sufficient");

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 25575);
        assert_eq!(config.password, "sesame");
        assert_eq!(config.auth_timeout, Duration::from_secs(10));
        assert_eq!(config.command_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_resolve_missing_password_is_hard_error() {
        let result = ClientConfig::resolve(env(&[("RCON_HOST", "mc.example")]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingPassword);
    }

    #[test]
    fn test_resolve_honors_every_override() {
        let config = ClientConfig::resolve(env(&[
            ("RCON_PASSWORD", "s3cr3t"),
            ("RCON_HOST", "mc.example"),
            ("RCON_PORT", "2600"),
            ("RCON_AUTH_TIMEOUT_MS", "1500"),
            ("RCON_COMMAND_TIMEOUT_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(config.host, "mc.example");
        assert_eq!(config.port, 2600);
        assert_eq!(config.auth_timeout, Duration::from_millis(1500));
        assert_eq!(config.command_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_resolve_garbage_port_is_typed_error() {
        let result = ClientConfig::resolve(env(&[
            ("RCON_PASSWORD", "p"),
            ("RCON_PORT", "not-a-port"),
        ]));

        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidNumber {
                key: "RCON_PORT",
                value: "not-a-port".into(),
            }
        );
    }

    #[test]
    fn test_resolve_garbage_timeout_is_typed_error() {
        let result = ClientConfig::resolve(env(&[
            ("RCON_PASSWORD", "p"),
            ("RCON_COMMAND_TIMEOUT_MS", "soon"),
        ]));

        assert!(matches!(
            result,
            Err(ConfigError::InvalidNumber { key: "RCON_COMMAND_TIMEOUT_MS", .. })
        ));
    }

    #[test]
    fn test_new_uses_default_timeouts() {
        let config = ClientConfig::new("h", 1, "p");
        assert_eq!(config.auth_timeout, Duration::from_secs(10));
        assert_eq!(config.command_timeout, Duration::from_secs(10));
    }
}
