//! Conflict classification types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::person::Person;

/// Which identity key produced a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Same government ID, different record.
    GovernmentId,
    /// Same student ID, different record.
    StudentId,
    /// Same name and date of birth on two unregistered persons.
    BasicIdentity,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GovernmentId => write!(f, "governmentID"),
            Self::StudentId => write!(f, "studentID"),
            Self::BasicIdentity => write!(f, "basicIdentity"),
        }
    }
}

/// A detected conflict between an incoming record and a registry entry.
///
/// Created during detection and consumed exactly once during resolution.
/// `existing_index` is captured before any mutation and stays valid for the
/// whole run because registry updates never shift other entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictInfo {
    /// The registry entry the incoming record collides with.
    pub existing_record: Person,
    /// The incoming record.
    pub incoming_record: Person,
    /// Index of `existing_record` in the registry.
    pub existing_index: usize,
    /// Which key collided.
    pub kind: ConflictKind,
    /// The shared key value (or name and date of birth for basic identity).
    pub conflicting_value: String,
}

impl fmt::Display for ConflictInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} conflict on {} at index {}: existing [{}] vs incoming [{}]",
            self.kind,
            self.conflicting_value,
            self.existing_index,
            self.existing_record,
            self.incoming_record
        )
    }
}

/// Outcome of classifying one incoming record against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Structurally identical to the entry at `existing_index`.
    Duplicate {
        /// Index of the identical entry.
        existing_index: usize,
    },
    /// Shares an identity key with an entry but differs elsewhere.
    Conflict(ConflictInfo),
    /// Matches nothing.
    Novel,
}

impl Classification {
    /// True if this is a conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// True if this is a novel record.
    pub fn is_novel(&self) -> bool {
        matches!(self, Self::Novel)
    }

    /// Take the conflict, if any.
    pub fn into_conflict(self) -> Option<ConflictInfo> {
        match self {
            Self::Conflict(info) => Some(info),
            _ => None,
        }
    }
}
