//! Conflict resolution protocol.
//!
//! The coordinator walks detected conflicts in order and asks a
//! [`DecisionProvider`] what to do with each one. Providers are normally
//! interactive prompts; the ones in [`providers`] cover batch policies and
//! scripted runs.
//!
//! ## Provider contract
//!
//! - `decide_one` may return any [`Decision`].
//! - `decide_global` is only called after `decide_one` returned
//!   [`Decision::ApplyToAll`], and must not return `ApplyToAll` itself.
//!   Doing so is treated as `Cancel`.
//! - Either method may block until the user answers.
//! - An `Err` abandons the current conflict only; the run continues.

pub mod coordinator;
pub mod providers;

#[cfg(feature = "channel")]
pub mod channel;

use crate::types::{ConflictInfo, Decision};

/// Error returned by a decision provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecisionError {
    /// The prompt could not be shown or answered.
    #[error("Decision provider unavailable: {0}")]
    Unavailable(String),
    /// The answering side went away.
    #[error("Decision provider disconnected")]
    Disconnected,
    /// A scripted provider ran out of answers.
    #[error("Decision script exhausted")]
    Exhausted,
}

/// Source of conflict decisions.
pub trait DecisionProvider {
    /// Decide one conflict. `remaining` counts this conflict and every one after it.
    fn decide_one(&mut self, conflict: &ConflictInfo, remaining: usize) -> Result<Decision, DecisionError>;

    /// Pick the decision to apply to every remaining conflict.
    fn decide_global(&mut self) -> Result<Decision, DecisionError>;
}

impl<P: DecisionProvider + ?Sized> DecisionProvider for &mut P {
    fn decide_one(&mut self, conflict: &ConflictInfo, remaining: usize) -> Result<Decision, DecisionError> {
        (**self).decide_one(conflict, remaining)
    }

    fn decide_global(&mut self) -> Result<Decision, DecisionError> {
        (**self).decide_global()
    }
}

impl<P: DecisionProvider + ?Sized> DecisionProvider for Box<P> {
    fn decide_one(&mut self, conflict: &ConflictInfo, remaining: usize) -> Result<Decision, DecisionError> {
        (**self).decide_one(conflict, remaining)
    }

    fn decide_global(&mut self) -> Result<Decision, DecisionError> {
        (**self).decide_global()
    }
}

pub use coordinator::{ApplyToAllState, ResolutionCoordinator, ResolutionOutcome};
pub use providers::{FixedProvider, ProviderCall, ScriptedProvider, SilentProvider};

#[cfg(feature = "channel")]
pub use channel::{ChannelProvider, DecisionRequest, Prompt};
