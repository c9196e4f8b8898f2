//! Core types for the reconciliation engine.

pub mod person;
pub mod record;
pub mod conflict;
pub mod decision;
pub mod report;

pub use person::{Person, PersonKind, Identity, IdentityKey, IdentityError};
pub use record::{PersonRecord, RecordError, parse_batch, RECORD_DATE_FORMAT};
pub use conflict::{ConflictInfo, ConflictKind, Classification};
pub use decision::Decision;
pub use report::{Tally, Mutation, ReconcileReport};
