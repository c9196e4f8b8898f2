//! Registry storage backends.

pub mod memory;

use std::convert::Infallible;

use crate::types::Person;

/// Ordered, index-addressed registry of persons.
///
/// Implementations must guarantee that `update(i, p)` replaces the entry at
/// `i` in place and never shifts the index of any other entry, and that
/// `add` only ever appends. The reconciliation engine captures indices before
/// it mutates anything and relies on them staying valid for the whole run.
///
/// `add` and `update` return `Ok(false)` when the backend declines the write
/// and `Err` only for backend failures, which abort the run.
pub trait Registry {
    /// Error type for backend failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the entry at `index`.
    fn get(&self, index: usize) -> Option<&Person>;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Check if the registry is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the first entry equal to `person` (all fields compared).
    fn index_of(&self, person: &Person) -> Option<usize>;

    /// Append a person.
    fn add(&mut self, person: Person) -> Result<bool, Self::Error>;

    /// Replace the entry at `index` in place.
    fn update(&mut self, index: usize, person: Person) -> Result<bool, Self::Error>;

    /// Iterate entries with their indices, in registry order.
    fn entries(&self) -> impl Iterator<Item = (usize, &Person)> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i).map(|p| (i, p)))
    }
}

impl Registry for Vec<Person> {
    type Error = Infallible;

    fn get(&self, index: usize) -> Option<&Person> {
        self.as_slice().get(index)
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn index_of(&self, person: &Person) -> Option<usize> {
        self.iter().position(|p| p == person)
    }

    fn add(&mut self, person: Person) -> Result<bool, Self::Error> {
        self.push(person);
        Ok(true)
    }

    fn update(&mut self, index: usize, person: Person) -> Result<bool, Self::Error> {
        match self.get_mut(index) {
            Some(slot) => {
                *slot = person;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

pub use memory::{InMemoryRegistry, InMemoryRegistryError};
