//! Resolution coordinator.
//!
//! Drives the per-conflict decision loop. The "apply to all" mode lives in an
//! explicit [`ApplyToAllState`] so a run can be replayed step by step from a
//! scripted provider.

use crate::engine::ReconcileError;
use crate::store::Registry;
use crate::types::{ConflictInfo, Decision, Mutation, Person};
use super::{DecisionError, DecisionProvider};

/// Bulk-decision state for one coordinator run.
///
/// Starts inactive. Once engaged with a committed decision it stays engaged
/// for the rest of the run and answers every remaining conflict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyToAllState {
    choice: Option<Decision>,
}

impl ApplyToAllState {
    /// True once a global choice has been committed.
    pub fn is_active(&self) -> bool {
        self.choice.is_some()
    }

    /// The committed global choice.
    pub fn choice(&self) -> Option<Decision> {
        self.choice
    }

    /// Commit a global choice. Only `KeepExisting`, `UseNew` and `Skip` engage;
    /// anything else leaves the state unchanged and returns false.
    pub fn engage(&mut self, choice: Decision) -> bool {
        if !choice.is_global_choice() {
            return false;
        }
        self.choice = Some(choice);
        true
    }
}

/// Counters and mutations produced by one coordinator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionOutcome {
    /// Conflicts settled by `KeepExisting` or an applied `UseNew`.
    pub resolved: usize,
    /// Conflicts settled by `Skip` or a guarded `UseNew`.
    pub skipped: usize,
    /// Conflicts left untouched: bare `Cancel`, provider failure, declined write.
    pub unresolved: usize,
    /// Registry updates, in order.
    pub mutations: Vec<Mutation>,
}

/// What one prompt cycle produced for the current conflict.
enum Step {
    Commit(Decision),
    Retry,
    Abandon,
}

/// Stateful decision loop over a list of conflicts.
#[derive(Debug, Clone)]
pub struct ResolutionCoordinator {
    state: ApplyToAllState,
    guard_identity_collisions: bool,
}

impl ResolutionCoordinator {
    /// Create a coordinator.
    ///
    /// With `guard_identity_collisions`, a `UseNew` whose incoming record
    /// would share a government or student ID with any entry other than its
    /// target is downgraded to a skip.
    pub fn new(guard_identity_collisions: bool) -> Self {
        Self {
            state: ApplyToAllState::default(),
            guard_identity_collisions,
        }
    }

    /// Current apply-to-all state.
    pub fn state(&self) -> ApplyToAllState {
        self.state
    }

    /// Resolve `conflicts` in order against `registry`.
    ///
    /// Consumes exactly `conflicts.len()` items. Every `existing_index` must
    /// have been captured before the first mutation; in-place updates keep
    /// them valid throughout. Only registry backend errors abort the run.
    pub fn run<R, P>(
        &mut self,
        conflicts: &[ConflictInfo],
        registry: &mut R,
        provider: &mut P,
    ) -> Result<ResolutionOutcome, ReconcileError>
    where
        R: Registry + ?Sized,
        P: DecisionProvider + ?Sized,
    {
        let total = conflicts.len();
        let mut outcome = ResolutionOutcome::default();
        let mut i = 0;

        while i < total {
            let conflict = &conflicts[i];

            let step = match self.state.choice() {
                Some(choice) => Step::Commit(choice),
                None => self.prompt(conflict, total - i, provider),
            };

            match step {
                Step::Retry => continue,
                Step::Abandon => outcome.unresolved += 1,
                Step::Commit(Decision::Cancel) | Step::Commit(Decision::ApplyToAll) => {
                    tracing::debug!(index = conflict.existing_index, "Conflict left unresolved");
                    outcome.unresolved += 1;
                }
                Step::Commit(Decision::KeepExisting) => outcome.resolved += 1,
                Step::Commit(Decision::Skip) => outcome.skipped += 1,
                Step::Commit(Decision::UseNew) => {
                    self.use_new(conflict, registry, &mut outcome)?;
                }
            }

            i += 1;
        }

        Ok(outcome)
    }

    fn prompt<P: DecisionProvider + ?Sized>(
        &mut self,
        conflict: &ConflictInfo,
        remaining: usize,
        provider: &mut P,
    ) -> Step {
        let choice = match provider.decide_one(conflict, remaining) {
            Ok(choice) => choice,
            Err(e) => return abandon(conflict, e),
        };

        if choice != Decision::ApplyToAll {
            return Step::Commit(choice);
        }

        match provider.decide_global() {
            Ok(Decision::Cancel) => {
                tracing::debug!(index = conflict.existing_index, "Apply-to-all cancelled, re-offering conflict");
                Step::Retry
            }
            Ok(Decision::ApplyToAll) => {
                tracing::warn!(
                    index = conflict.existing_index,
                    "Provider returned apply_to_all as a global choice, treating as cancel"
                );
                Step::Retry
            }
            Ok(global) => {
                self.state.engage(global);
                tracing::info!(choice = %global, remaining, "Applying decision to all remaining conflicts");
                Step::Commit(global)
            }
            Err(e) => abandon(conflict, e),
        }
    }

    fn use_new<R: Registry + ?Sized>(
        &self,
        conflict: &ConflictInfo,
        registry: &mut R,
        outcome: &mut ResolutionOutcome,
    ) -> Result<(), ReconcileError> {
        let index = conflict.existing_index;
        let incoming = &conflict.incoming_record;

        if self.guard_identity_collisions {
            if let Some(other) = colliding_entry(registry, index, incoming) {
                tracing::warn!(
                    index,
                    other,
                    incoming = %incoming,
                    "Replacement would duplicate an identity key, skipping"
                );
                outcome.skipped += 1;
                return Ok(());
            }
        }

        if registry.update(index, incoming.clone()).map_err(ReconcileError::from_store)? {
            outcome.resolved += 1;
            outcome.mutations.push(Mutation::Replaced { index });
        } else {
            tracing::warn!(index, "Registry declined in-place update");
            outcome.unresolved += 1;
        }
        Ok(())
    }
}

impl Default for ResolutionCoordinator {
    /// Guarded, matching [`ReconcileConfig::default`](crate::ReconcileConfig).
    fn default() -> Self {
        Self::new(true)
    }
}

fn abandon(conflict: &ConflictInfo, error: DecisionError) -> Step {
    tracing::warn!(
        index = conflict.existing_index,
        kind = %conflict.kind,
        error = %error,
        "Decision provider failed, leaving conflict unresolved"
    );
    Step::Abandon
}

/// First entry other than `target` sharing an identity key with `incoming`.
fn colliding_entry<R: Registry + ?Sized>(registry: &R, target: usize, incoming: &Person) -> Option<usize> {
    let gov = incoming.government_id();
    let stu = incoming.student_id();

    registry
        .entries()
        .find(|(i, e)| {
            *i != target
                && ((gov.is_some() && e.government_id() == gov)
                    || (stu.is_some() && e.student_id() == stu))
        })
        .map(|(i, _)| i)
}
