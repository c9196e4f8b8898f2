//! In-memory registry.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use crate::types::{ConflictKind, IdentityKey, Person};
use super::Registry;

/// Error type for in-memory registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InMemoryRegistryError {
    /// Write attempted on a frozen registry.
    #[error("Registry is read-only")]
    ReadOnly,
}

/// Vec-backed registry.
///
/// Updates replace in place; additions append. An optional capacity makes
/// `add` decline writes once full, and `freeze` makes every write fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryRegistry {
    /// Entries in registry order.
    entries: Vec<Person>,
    /// Maximum number of entries `add` will accept.
    #[serde(skip)]
    capacity: Option<usize>,
    /// Reject all writes.
    #[serde(skip)]
    frozen: bool,
}

impl InMemoryRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding `entries`.
    pub fn from_entries(entries: Vec<Person>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    /// Limit the number of entries `add` will accept.
    pub fn with_capacity_limit(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Make every subsequent write fail with [`InMemoryRegistryError::ReadOnly`].
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// All entries.
    pub fn as_slice(&self) -> &[Person] {
        &self.entries
    }

    /// Consume into the entry list.
    pub fn into_entries(self) -> Vec<Person> {
        self.entries
    }

    /// Find pairs of entries sharing a government or student ID.
    ///
    /// Returns `(first_index, second_index, kind)` triples sorted by index.
    /// A consistent registry returns an empty list.
    pub fn identity_collisions(&self) -> Vec<(usize, usize, ConflictKind)> {
        let mut seen_gov: HashMap<&IdentityKey, usize> = HashMap::new();
        let mut seen_stu: HashMap<&IdentityKey, usize> = HashMap::new();
        let mut collisions = Vec::new();

        for (index, person) in self.entries.iter().enumerate() {
            if let Some(gov) = person.government_id() {
                match seen_gov.get(gov) {
                    Some(&first) => collisions.push((first, index, ConflictKind::GovernmentId)),
                    None => {
                        seen_gov.insert(gov, index);
                    }
                }
            }
            if let Some(stu) = person.student_id() {
                match seen_stu.get(stu) {
                    Some(&first) => collisions.push((first, index, ConflictKind::StudentId)),
                    None => {
                        seen_stu.insert(stu, index);
                    }
                }
            }
        }

        collisions.sort();
        collisions
    }
}

impl Registry for InMemoryRegistry {
    type Error = InMemoryRegistryError;

    fn get(&self, index: usize) -> Option<&Person> {
        self.entries.get(index)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn index_of(&self, person: &Person) -> Option<usize> {
        self.entries.iter().position(|p| p == person)
    }

    fn add(&mut self, person: Person) -> Result<bool, Self::Error> {
        if self.frozen {
            return Err(InMemoryRegistryError::ReadOnly);
        }
        if self.capacity.is_some_and(|cap| self.entries.len() >= cap) {
            return Ok(false);
        }
        self.entries.push(person);
        Ok(true)
    }

    fn update(&mut self, index: usize, person: Person) -> Result<bool, Self::Error> {
        if self.frozen {
            return Err(InMemoryRegistryError::ReadOnly);
        }
        match self.entries.get_mut(index) {
            Some(slot) => {
                *slot = person;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Identity;
    use chrono::NaiveDate;

    fn make_person(first: &str, gov: Option<&str>) -> Person {
        let person = Person::new(first, "Smith", NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        match gov {
            Some(gov) => person.with_identity(Identity::registered(gov).unwrap()),
            None => person,
        }
    }

    #[test]
    fn test_update_keeps_other_indices() {
        let mut registry = InMemoryRegistry::from_entries(vec![
            make_person("A", Some("G1")),
            make_person("B", Some("G2")),
            make_person("C", Some("G3")),
        ]);

        let replacement = make_person("Bee", Some("G2"));
        assert!(registry.update(1, replacement.clone()).unwrap());

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get(0).unwrap().first_name, "A");
        assert_eq!(registry.get(1), Some(&replacement));
        assert_eq!(registry.get(2).unwrap().first_name, "C");
        assert_eq!(registry.index_of(&replacement), Some(1));
    }

    #[test]
    fn test_update_out_of_range_declines() {
        let mut registry = InMemoryRegistry::new();
        assert!(!registry.update(0, make_person("A", None)).unwrap());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_capacity_limit_declines_add() {
        let mut registry = InMemoryRegistry::new().with_capacity_limit(1);
        assert!(registry.add(make_person("A", None)).unwrap());
        assert!(!registry.add(make_person("B", None)).unwrap());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_frozen_registry_errors() {
        let mut registry = InMemoryRegistry::from_entries(vec![make_person("A", None)]);
        registry.freeze();
        assert_eq!(
            registry.add(make_person("B", None)),
            Err(InMemoryRegistryError::ReadOnly)
        );
        assert_eq!(
            registry.update(0, make_person("B", None)),
            Err(InMemoryRegistryError::ReadOnly)
        );
    }

    #[test]
    fn test_identity_collisions() {
        let mut registry = InMemoryRegistry::from_entries(vec![
            make_person("A", Some("G1")),
            make_person("B", Some("G2")),
        ]);
        assert!(registry.identity_collisions().is_empty());

        registry.add(make_person("C", Some("G1"))).unwrap();
        assert_eq!(
            registry.identity_collisions(),
            vec![(0, 2, ConflictKind::GovernmentId)]
        );
    }

    #[test]
    fn test_identity_collisions_sorted_by_index_then_kind() {
        let enrolled = |first: &str, gov: &str, stu: &str| {
            Person::new(first, "Smith", NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
                .with_identity(Identity::enrolled(gov, stu).unwrap())
        };
        let registry = InMemoryRegistry::from_entries(vec![
            enrolled("A", "G1", "S1"),
            make_person("B", Some("G2")),
            make_person("C", Some("G2")),
            enrolled("D", "G1", "S1"),
        ]);

        assert_eq!(
            registry.identity_collisions(),
            vec![
                (0, 3, ConflictKind::GovernmentId),
                (0, 3, ConflictKind::StudentId),
                (1, 2, ConflictKind::GovernmentId),
            ]
        );
    }

    #[test]
    fn test_entries_iterates_in_order() {
        let registry = InMemoryRegistry::from_entries(vec![
            make_person("A", None),
            make_person("B", None),
        ]);
        let names: Vec<_> = registry
            .entries()
            .map(|(i, p)| format!("{i}:{}", p.first_name))
            .collect();
        assert_eq!(names, vec!["0:A", "1:B"]);
    }
}
