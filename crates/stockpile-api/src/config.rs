//! # Runtime Configuration
//!
//! Reads the service configuration from environment variables. Every
//! variable has a default, so an empty environment yields a development
//! server on `0.0.0.0:3000` backed by the in-memory repository.
//!
//! | Variable             | Default       |
//! |----------------------|---------------|
//! | `HOST`               | `0.0.0.0`     |
//! | `PORT`               | `3000`        |
//! | `APP_ENV`            | `development` (falls back to `NODE_ENV`) |
//! | `DATABASE_URL`       | unset: in-memory repository |
//! | `DB_MAX_CONNECTIONS` | `5`           |
//! | `LOG_FORMAT`         | `pretty`      |

use std::str::FromStr;

use stockpile_core::Environment;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// A variable was set to a value that cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The value did not parse.
    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
        /// What was expected.
        reason: &'static str,
    },
}

/// Log output style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, for terminals.
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers.
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

/// Service configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Deployment environment. Controls fault detail exposure.
    pub environment: Environment,
    /// Postgres connection URL. `None` selects the in-memory repository.
    pub database_url: Option<String>,
    /// Postgres pool size.
    pub db_max_connections: u32,
    /// Log output style.
    pub log_format: LogFormat,
    /// Environment name that was set but not recognised. The service runs
    /// as development and reports it once logging is up.
    pub unrecognized_environment: Option<String>,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through `lookup`, which returns the value of a
    /// variable if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let host = non_empty("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match non_empty("PORT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                value,
                reason: "expected a port number",
            })?,
            None => DEFAULT_PORT,
        };

        let mut unrecognized_environment = None;
        let environment = match non_empty("APP_ENV").or_else(|| non_empty("NODE_ENV")) {
            Some(value) => Environment::parse(&value).unwrap_or_else(|_| {
                unrecognized_environment = Some(value);
                Environment::Development
            }),
            None => Environment::default(),
        };

        let db_max_connections = match non_empty("DB_MAX_CONNECTIONS") {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "DB_MAX_CONNECTIONS",
                        value,
                        reason: "expected a positive integer",
                    })
                }
            },
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        let log_format = match non_empty("LOG_FORMAT") {
            Some(value) => value.parse().map_err(|()| ConfigError::Invalid {
                var: "LOG_FORMAT",
                value,
                reason: "expected \"json\" or \"pretty\"",
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            host,
            port,
            environment,
            database_url: non_empty("DATABASE_URL"),
            db_max_connections,
            log_format,
            unrecognized_environment,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            environment: Environment::default(),
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            log_format: LogFormat::default(),
            unrecognized_environment: None,
        }
    }
}

/// The database URL carries credentials and is never printed.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("log_format", &self.log_format)
            .field("unrecognized_environment", &self.unrecognized_environment)
            .finish()
    }
}
