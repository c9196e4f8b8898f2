//! Reconciliation results: tally, mutation log and report.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::canonical::canonical_hash_hex;
use crate::RECONCILE_SCHEMA_VERSION;

/// Summary counters for one reconciliation run.
///
/// `imported`, `duplicates_skipped` and `conflicts_resolved` are the counters
/// callers report to users. The remaining fields are informational.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tally {
    /// Novel records added to the registry.
    pub imported: usize,
    /// Incoming records identical to an existing entry.
    pub duplicates_skipped: usize,
    /// Conflicts settled by `KeepExisting` or `UseNew`.
    pub conflicts_resolved: usize,
    /// Conflicts settled by `Skip` (including guarded `UseNew`).
    pub conflicts_skipped: usize,
    /// Conflicts left untouched by a bare `Cancel`.
    pub conflicts_unresolved: usize,
}

impl Tally {
    /// Total number of conflicts that reached the coordinator.
    pub fn conflicts_seen(&self) -> usize {
        self.conflicts_resolved + self.conflicts_skipped + self.conflicts_unresolved
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "imported {}, skipped {} duplicate(s), resolved {} conflict(s)",
            self.imported, self.duplicates_skipped, self.conflicts_resolved
        )?;
        if self.conflicts_skipped > 0 {
            write!(f, ", skipped {} conflict(s)", self.conflicts_skipped)?;
        }
        if self.conflicts_unresolved > 0 {
            write!(f, ", left {} unresolved", self.conflicts_unresolved)?;
        }
        Ok(())
    }
}

/// One registry mutation performed during a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// Entry at `index` replaced in place by an incoming record.
    Replaced {
        /// Registry index that was overwritten.
        index: usize,
    },
    /// Novel record appended at `index`.
    Inserted {
        /// Registry index of the new entry.
        index: usize,
    },
}

/// Full result of a reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// Summary counters.
    pub tally: Tally,
    /// Registry mutations in the order they were applied.
    pub mutations: Vec<Mutation>,
}

impl ReconcileReport {
    /// Deterministic fingerprint of tally and mutation sequence.
    ///
    /// Same registry + same batch + same decisions → same fingerprint.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(&(RECONCILE_SCHEMA_VERSION, &self.tally, &self.mutations))
    }

    /// Indices replaced by `UseNew`, in order.
    pub fn replaced_indices(&self) -> Vec<usize> {
        self.mutations
            .iter()
            .filter_map(|m| match m {
                Mutation::Replaced { index } => Some(*index),
                Mutation::Inserted { .. } => None,
            })
            .collect()
    }
}
