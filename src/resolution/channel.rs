//! Channel-backed decision provider.
//!
//! Lets an async host (a UI event loop, a websocket session) answer prompts
//! while the coordinator runs synchronously on a blocking thread. Each call
//! sends a [`DecisionRequest`] and parks until the host responds.
//!
//! ```text
//! coordinator thread            host task
//!   decide_one ── request ──▶  rx.recv()
//!        ⋮                      show prompt
//!   blocking_recv ◀── reply ──  request.respond(decision)
//! ```
//!
//! Must not be driven from inside an async context: run the engine under
//! `tokio::task::spawn_blocking` or on a plain thread.

use tokio::sync::{mpsc, oneshot};

use crate::types::{ConflictInfo, Decision};
use super::{DecisionError, DecisionProvider};

/// What the host is being asked.
#[derive(Debug, Clone)]
pub enum Prompt {
    /// Decide a single conflict.
    One {
        /// The conflict.
        conflict: ConflictInfo,
        /// Conflicts left including this one.
        remaining: usize,
    },
    /// Pick a decision for all remaining conflicts.
    Global,
}

/// A pending prompt awaiting the host's answer.
#[derive(Debug)]
pub struct DecisionRequest {
    /// The question.
    pub prompt: Prompt,
    reply: oneshot::Sender<Decision>,
}

impl DecisionRequest {
    /// Answer the prompt. Returns false if the coordinator is gone.
    pub fn respond(self, decision: Decision) -> bool {
        self.reply.send(decision).is_ok()
    }
}

/// Provider that forwards prompts over a tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelProvider {
    tx: mpsc::Sender<DecisionRequest>,
}

impl ChannelProvider {
    /// Create a provider and the receiver the host reads prompts from.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<DecisionRequest>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { tx }, rx)
    }

    fn ask(&self, prompt: Prompt) -> Result<Decision, DecisionError> {
        let (reply, answer) = oneshot::channel();
        self.tx
            .blocking_send(DecisionRequest { prompt, reply })
            .map_err(|_| DecisionError::Disconnected)?;
        // A request dropped without an answer reads as a disconnect.
        answer.blocking_recv().map_err(|_| DecisionError::Disconnected)
    }
}

impl DecisionProvider for ChannelProvider {
    fn decide_one(&mut self, conflict: &ConflictInfo, remaining: usize) -> Result<Decision, DecisionError> {
        self.ask(Prompt::One {
            conflict: conflict.clone(),
            remaining,
        })
    }

    fn decide_global(&mut self) -> Result<Decision, DecisionError> {
        self.ask(Prompt::Global)
    }
}
