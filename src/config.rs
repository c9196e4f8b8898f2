//! Engine configuration.
//!
//! ## Environment
//!
//! - `RECONCILE_SILENT`: `true`/`false` (default: false)
//! - `RECONCILE_GUARD_COLLISIONS`: `true`/`false` (default: true)

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;

/// Environment variable selecting silent mode.
pub const ENV_SILENT: &str = "RECONCILE_SILENT";

/// Environment variable toggling the identity collision guard.
pub const ENV_GUARD_COLLISIONS: &str = "RECONCILE_GUARD_COLLISIONS";

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable holds something other than a boolean.
    #[error("Invalid boolean for {var}: {value:?}")]
    InvalidBool {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Reconciliation engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Resolve every conflict as `KeepExisting` without consulting the provider.
    pub silent: bool,
    /// Downgrade a `UseNew` that would duplicate another entry's identity key.
    pub guard_identity_collisions: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            silent: false,
            guard_identity_collisions: true,
        }
    }
}

impl ReconcileConfig {
    /// Interactive configuration: conflicts go to the provider.
    pub fn interactive() -> Self {
        Self::default()
    }

    /// Silent configuration: conflicts keep existing entries.
    pub fn silent() -> Self {
        Self {
            silent: true,
            ..Self::default()
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            silent: read_bool(&lookup, ENV_SILENT)?.unwrap_or(defaults.silent),
            guard_identity_collisions: read_bool(&lookup, ENV_GUARD_COLLISIONS)?
                .unwrap_or(defaults.guard_identity_collisions),
        })
    }

    /// Stable hash of this configuration, for run provenance.
    pub fn config_hash(&self) -> String {
        canonical_hash_hex(self)
    }
}

fn read_bool<F>(lookup: &F, var: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        "" => Ok(None),
        _ => Err(ConfigError::InvalidBool { var, value }),
    }
}
