//! Decision values returned by a decision provider.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A user decision for one conflict (or for all remaining conflicts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Leave the registry entry as is. Counts as resolved.
    KeepExisting,
    /// Replace the registry entry in place with the incoming record.
    UseNew,
    /// Leave the registry entry as is. Counts as skipped.
    Skip,
    /// Ask for one decision to reuse for every remaining conflict.
    /// Only legal from `decide_one`.
    ApplyToAll,
    /// Back out of this prompt without committing.
    Cancel,
}

impl Decision {
    /// Parse decision from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "keep" | "keep_existing" => Some(Self::KeepExisting),
            "new" | "use_new" => Some(Self::UseNew),
            "skip" => Some(Self::Skip),
            "all" | "apply_to_all" => Some(Self::ApplyToAll),
            "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }

    /// True if this decision may be reused for every remaining conflict.
    pub fn is_global_choice(&self) -> bool {
        matches!(self, Self::KeepExisting | Self::UseNew | Self::Skip)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeepExisting => write!(f, "keep_existing"),
            Self::UseNew => write!(f, "use_new"),
            Self::Skip => write!(f, "skip"),
            Self::ApplyToAll => write!(f, "apply_to_all"),
            Self::Cancel => write!(f, "cancel"),
        }
    }
}
