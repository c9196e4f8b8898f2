//! Non-interactive decision providers.

use std::collections::VecDeque;

use crate::types::{ConflictInfo, Decision};
use super::{DecisionError, DecisionProvider};

/// Provider used for silent imports: every conflict keeps the existing entry.
///
/// Never returns `Cancel` or `ApplyToAll`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProvider;

impl DecisionProvider for SilentProvider {
    fn decide_one(&mut self, _conflict: &ConflictInfo, _remaining: usize) -> Result<Decision, DecisionError> {
        Ok(Decision::KeepExisting)
    }

    fn decide_global(&mut self) -> Result<Decision, DecisionError> {
        Ok(Decision::KeepExisting)
    }
}

/// Provider that answers every conflict with the same committed decision.
#[derive(Debug, Clone, Copy)]
pub struct FixedProvider {
    decision: Decision,
}

impl FixedProvider {
    /// Keep every existing entry.
    pub fn keep_existing() -> Self {
        Self { decision: Decision::KeepExisting }
    }

    /// Replace every conflicting entry with the incoming record.
    pub fn use_new() -> Self {
        Self { decision: Decision::UseNew }
    }

    /// Skip every conflict.
    pub fn skip() -> Self {
        Self { decision: Decision::Skip }
    }

    /// The decision this provider returns.
    pub fn decision(&self) -> Decision {
        self.decision
    }
}

impl DecisionProvider for FixedProvider {
    fn decide_one(&mut self, _conflict: &ConflictInfo, _remaining: usize) -> Result<Decision, DecisionError> {
        Ok(self.decision)
    }

    fn decide_global(&mut self) -> Result<Decision, DecisionError> {
        Ok(self.decision)
    }
}

/// A call observed by [`ScriptedProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCall {
    /// `decide_one` for the conflict at `existing_index`.
    One {
        /// Registry index of the conflict's existing entry.
        existing_index: usize,
        /// Remaining count passed by the coordinator.
        remaining: usize,
    },
    /// `decide_global`.
    Global,
}

/// Provider that replays scripted answers and records every call.
///
/// Returns [`DecisionError::Exhausted`] once a script runs dry.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProvider {
    one: VecDeque<Decision>,
    global: VecDeque<Decision>,
    calls: Vec<ProviderCall>,
}

impl ScriptedProvider {
    /// Create a provider from per-conflict and global answer scripts.
    pub fn new(
        one: impl IntoIterator<Item = Decision>,
        global: impl IntoIterator<Item = Decision>,
    ) -> Self {
        Self {
            one: one.into_iter().collect(),
            global: global.into_iter().collect(),
            calls: Vec::new(),
        }
    }

    /// Create a provider that only answers `decide_one`.
    pub fn per_item(one: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            one: one.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> &[ProviderCall] {
        &self.calls
    }

    /// Number of `decide_one` calls.
    pub fn one_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ProviderCall::One { .. }))
            .count()
    }

    /// Number of `decide_global` calls.
    pub fn global_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ProviderCall::Global))
            .count()
    }

    /// True once both scripts are used up.
    pub fn is_exhausted(&self) -> bool {
        self.one.is_empty() && self.global.is_empty()
    }
}

impl DecisionProvider for ScriptedProvider {
    fn decide_one(&mut self, conflict: &ConflictInfo, remaining: usize) -> Result<Decision, DecisionError> {
        self.calls.push(ProviderCall::One {
            existing_index: conflict.existing_index,
            remaining,
        });
        self.one.pop_front().ok_or(DecisionError::Exhausted)
    }

    fn decide_global(&mut self) -> Result<Decision, DecisionError> {
        self.calls.push(ProviderCall::Global);
        self.global.pop_front().ok_or(DecisionError::Exhausted)
    }
}
