//! Reconciliation engine.
//!
//! Merges an incoming batch into a registry in two passes around the
//! resolution step, so that resolution sees every conflict before any novel
//! record is inserted.

use uuid::Uuid;

use crate::config::ReconcileConfig;
use crate::detector::{detect, is_exact_duplicate};
use crate::resolution::{DecisionProvider, ResolutionCoordinator, SilentProvider};
use crate::store::Registry;
use crate::types::{Classification, ConflictInfo, Mutation, Person, ReconcileReport, Tally};

/// Error type for reconciliation.
///
/// Only registry backend failures surface here. Bad records are dropped and
/// provider failures abandon a single conflict.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// Registry backend error.
    #[error("Registry error: {0}")]
    Store(String),
}

impl ReconcileError {
    /// Create a store error from any error type.
    pub fn from_store<E: std::error::Error>(e: E) -> Self {
        Self::Store(e.to_string())
    }
}

/// Batch import orchestrator.
///
/// ## Algorithm
///
/// 1. Drop `None` entries
/// 2. Classify each record against the registry as it stood before the run:
///    exact duplicates are counted and dropped, conflicts are queued
/// 3. Resolve queued conflicts through the coordinator
/// 4. Re-classify every remaining record against the updated registry and
///    append the ones still novel; anything that now matches is dropped
///
/// Not reentrant: one run at a time per registry.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine {
    config: ReconcileConfig,
}

impl ReconciliationEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Reconcile `batch` into `registry`.
    ///
    /// `provider` is consulted for conflicts unless the engine is silent.
    pub fn reconcile<I, R, P>(
        &self,
        batch: I,
        registry: &mut R,
        provider: &mut P,
    ) -> Result<ReconcileReport, ReconcileError>
    where
        I: IntoIterator,
        I::Item: Into<Option<Person>>,
        R: Registry + ?Sized,
        P: DecisionProvider + ?Sized,
    {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("reconcile", %run_id, silent = self.config.silent);
        let _guard = span.enter();

        let records: Vec<Person> = batch.into_iter().filter_map(|item| item.into()).collect();
        let mut report = ReconcileReport::default();

        if records.is_empty() {
            tracing::debug!("Empty batch");
            return Ok(report);
        }

        let (handled, conflicts) = self.classify(&records, registry, &mut report.tally);

        if !conflicts.is_empty() {
            tracing::debug!(conflicts = conflicts.len(), "Resolving conflicts");
            let mut coordinator = ResolutionCoordinator::new(self.config.guard_identity_collisions);
            let outcome = if self.config.silent {
                coordinator.run(&conflicts, registry, &mut SilentProvider)?
            } else {
                coordinator.run(&conflicts, registry, provider)?
            };

            report.tally.conflicts_resolved = outcome.resolved;
            report.tally.conflicts_skipped = outcome.skipped;
            report.tally.conflicts_unresolved = outcome.unresolved;
            report.mutations = outcome.mutations;
        }

        for (record, _) in records.into_iter().zip(handled).filter(|(_, handled)| !handled) {
            if is_exact_duplicate(&record, registry) {
                tracing::debug!(record = %record, "Record matches an entry written earlier in this run, dropping");
                continue;
            }
            if let Classification::Conflict(info) = detect(&record, registry) {
                tracing::debug!(
                    record = %record,
                    kind = %info.kind,
                    index = info.existing_index,
                    "Record conflicts with an entry written earlier in this run, dropping"
                );
                continue;
            }

            let index = registry.len();
            if registry.add(record).map_err(ReconcileError::from_store)? {
                report.tally.imported += 1;
                report.mutations.push(Mutation::Inserted { index });
            } else {
                tracing::warn!(index, "Registry declined insertion");
            }
        }

        tracing::info!(
            imported = report.tally.imported,
            duplicates_skipped = report.tally.duplicates_skipped,
            conflicts_resolved = report.tally.conflicts_resolved,
            conflicts_skipped = report.tally.conflicts_skipped,
            conflicts_unresolved = report.tally.conflicts_unresolved,
            "Reconciliation complete"
        );

        Ok(report)
    }

    /// First pass: mark duplicates and conflicts against the untouched registry.
    fn classify<R: Registry + ?Sized>(
        &self,
        records: &[Person],
        registry: &R,
        tally: &mut Tally,
    ) -> (Vec<bool>, Vec<ConflictInfo>) {
        let mut handled = vec![false; records.len()];
        let mut conflicts = Vec::new();

        for (position, record) in records.iter().enumerate() {
            if is_exact_duplicate(record, registry) {
                tracing::debug!(position, record = %record, "Exact duplicate");
                handled[position] = true;
                tally.duplicates_skipped += 1;
                continue;
            }

            if let Classification::Conflict(info) = detect(record, registry) {
                tracing::debug!(
                    position,
                    kind = %info.kind,
                    index = info.existing_index,
                    value = %info.conflicting_value,
                    "Conflict detected"
                );
                handled[position] = true;
                conflicts.push(info);
            }
        }

        (handled, conflicts)
    }
}

/// Reconcile with a one-off engine.
///
/// With `silent`, every conflict keeps its existing entry and `provider` is
/// never called.
pub fn reconcile<I, R, P>(
    batch: I,
    registry: &mut R,
    provider: &mut P,
    silent: bool,
) -> Result<Tally, ReconcileError>
where
    I: IntoIterator,
    I::Item: Into<Option<Person>>,
    R: Registry + ?Sized,
    P: DecisionProvider + ?Sized,
{
    let config = ReconcileConfig {
        silent,
        ..ReconcileConfig::default()
    };
    ReconciliationEngine::new(config)
        .reconcile(batch, registry, provider)
        .map(|report| report.tally)
}
