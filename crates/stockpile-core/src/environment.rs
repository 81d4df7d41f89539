//! # Deployment Environment
//!
//! The environment the service runs in. Production hides internal fault
//! details from clients; every other environment surfaces them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EnvironmentError;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development (default).
    #[default]
    Development,
    /// Quality assurance.
    Qa,
    /// Pre-production staging.
    Staging,
    /// Production.
    Production,
}

impl Environment {
    /// All environments, in promotion order.
    pub const ALL: [Environment; 4] = [
        Self::Development,
        Self::Qa,
        Self::Staging,
        Self::Production,
    ];

    /// Parse an environment name, case-insensitively and ignoring
    /// surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, EnvironmentError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "qa" => Ok(Self::Qa),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            _ => Err(EnvironmentError(s.to_string())),
        }
    }

    /// Return the lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Qa => "qa",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    /// Human-readable name for logs and status pages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::Qa => "QA",
            Self::Staging => "Staging",
            Self::Production => "Production",
        }
    }

    /// Whether this is the production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Whether internal fault details may be shown to clients.
    pub fn exposes_fault_details(&self) -> bool {
        !self.is_production()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = EnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
