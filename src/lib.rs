//! # registry-reconcile
//!
//! Import reconciliation for person registries.
//!
//! The engine answers one question:
//!
//! > Given a batch of incoming person records, which ones may enter the
//! > registry, and what happens to the ones that collide with existing entries?
//!
//! ## Core Contract
//!
//! 1. Exact duplicates are counted and dropped
//! 2. Records sharing an identity key (government ID, student ID) with an
//!    existing entry are conflicts, resolved through a [`DecisionProvider`]
//! 3. Everything else is appended
//! 4. The registry never ends a run holding two entries with the same
//!    government ID or student ID
//!
//! ## Architecture
//!
//! ```text
//! batch → ReconciliationEngine → detect (per record) → ResolutionCoordinator → Registry
//!                                                              ↓
//!                                                      DecisionProvider
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same registry + same batch + same decisions → identical report fingerprint
//! - Conflicts are offered in batch order
//! - Registry indices captured during detection stay valid for the whole run

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod identity;
pub mod detector;
pub mod store;
pub mod resolution;
pub mod engine;
pub mod config;
pub mod canonical;

// Re-exports
pub use types::{Person, PersonKind, Identity, IdentityKey, IdentityError};
pub use types::{PersonRecord, RecordError, parse_batch};
pub use types::{ConflictInfo, ConflictKind, Classification, Decision};
pub use types::{Tally, Mutation, ReconcileReport};
pub use identity::{identical, same_basic_identity};
pub use detector::{detect, is_exact_duplicate};
pub use store::{Registry, InMemoryRegistry, InMemoryRegistryError};
pub use resolution::{
    DecisionProvider, DecisionError, ResolutionCoordinator, ResolutionOutcome, ApplyToAllState,
    SilentProvider, FixedProvider, ScriptedProvider, ProviderCall,
};
#[cfg(feature = "channel")]
pub use resolution::{ChannelProvider, DecisionRequest, Prompt};
pub use engine::{ReconciliationEngine, ReconcileError, reconcile};
pub use config::{ReconcileConfig, ConfigError};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};

/// Schema version for report and record types.
/// Increment on breaking changes to any serialized type.
pub const RECONCILE_SCHEMA_VERSION: &str = "1.0.0";
