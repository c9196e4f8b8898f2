//! Conflict detection.
//!
//! Classifies one incoming record against the registry as duplicate,
//! conflict or novel. Read-only; never mutates the registry and never fails.
//!
//! ## Precedence
//!
//! 1. Government ID match (registered and enrolled incoming records)
//! 2. Student ID match (enrolled incoming records with no government ID match)
//! 3. Name + date of birth match between unregistered persons
//! 4. Novel

use crate::identity::{identical, same_basic_identity};
use crate::store::Registry;
use crate::types::{Classification, ConflictInfo, ConflictKind, Person};

/// True if some registry entry is [`identical`] to `incoming`.
pub fn is_exact_duplicate<R: Registry + ?Sized>(incoming: &Person, registry: &R) -> bool {
    registry.entries().any(|(_, existing)| identical(incoming, existing))
}

/// Classify `incoming` against `registry`.
pub fn detect<R: Registry + ?Sized>(incoming: &Person, registry: &R) -> Classification {
    if let Some(gov) = incoming.government_id() {
        let hit = registry
            .entries()
            .find(|(_, e)| e.government_id() == Some(gov));

        if let Some((index, existing)) = hit {
            return split(incoming, existing, index, ConflictKind::GovernmentId, gov.to_string());
        }

        if let Some(stu) = incoming.student_id() {
            let hit = registry
                .entries()
                .find(|(_, e)| e.student_id() == Some(stu));

            if let Some((index, existing)) = hit {
                return split(incoming, existing, index, ConflictKind::StudentId, stu.to_string());
            }
        }

        return Classification::Novel;
    }

    // Unregistered incoming: only unregistered entries are comparable.
    // Callers check `is_exact_duplicate` first, and `identical` already holds
    // for any two plain persons with equal name and date of birth, so this
    // branch only fires when `detect` is called on its own.
    let hit = registry
        .entries()
        .find(|(_, e)| !e.is_registered() && same_basic_identity(incoming, e));

    match hit {
        Some((index, existing)) => Classification::Conflict(ConflictInfo {
            existing_record: existing.clone(),
            incoming_record: incoming.clone(),
            existing_index: index,
            kind: ConflictKind::BasicIdentity,
            conflicting_value: format!(
                "{} {} {}",
                incoming.first_name,
                incoming.last_name,
                incoming.date_of_birth.format("%m/%d/%Y")
            ),
        }),
        None => Classification::Novel,
    }
}

fn split(
    incoming: &Person,
    existing: &Person,
    index: usize,
    kind: ConflictKind,
    value: String,
) -> Classification {
    if identical(existing, incoming) {
        Classification::Duplicate { existing_index: index }
    } else {
        Classification::Conflict(ConflictInfo {
            existing_record: existing.clone(),
            incoming_record: incoming.clone(),
            existing_index: index,
            kind,
            conflicting_value: value,
        })
    }
}
