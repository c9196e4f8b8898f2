//! Person types for the registry.
//!
//! The `Person → RegisteredPerson → EnrolledPerson` hierarchy is modelled as a
//! single struct carrying a tagged [`Identity`]. Identity keys are validated at
//! construction, so an enrolled person without a government ID cannot exist.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error constructing an identity key or identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// Key is empty after normalization.
    #[error("Identity key is empty")]
    Empty,
    /// Key contains characters outside uppercase ASCII alphanumerics.
    #[error("Identity key is not normalized: {0:?}")]
    NotNormalized(String),
}

/// Normalized identity string (uppercase, alphanumeric only).
///
/// Used for both government IDs and student IDs. Two keys are equal iff
/// their normalized strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Create a key from an already-normalized string.
    ///
    /// Rejects empty strings and anything that is not uppercase alphanumeric.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentityError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(IdentityError::Empty);
        }
        if !raw.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
            return Err(IdentityError::NotNormalized(raw));
        }
        Ok(Self(raw))
    }

    /// Normalize arbitrary input into a key.
    ///
    /// Strips everything but ASCII alphanumerics and uppercases the rest.
    /// Returns `None` when nothing remains.
    pub fn normalize(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for IdentityKey {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IdentityKey> for String {
    fn from(key: IdentityKey) -> Self {
        key.0
    }
}

/// Identity tier of a person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum Identity {
    /// No identity keys; matched by name and date of birth only.
    Plain,
    /// Carries a government ID.
    Registered {
        /// Normalized government ID.
        government_id: IdentityKey,
    },
    /// Carries a government ID and a student ID.
    Enrolled {
        /// Normalized government ID.
        government_id: IdentityKey,
        /// Normalized student ID.
        student_id: IdentityKey,
    },
}

impl Identity {
    /// Create a registered identity from a normalized government ID.
    pub fn registered(government_id: impl Into<String>) -> Result<Self, IdentityError> {
        Ok(Self::Registered {
            government_id: IdentityKey::new(government_id)?,
        })
    }

    /// Create an enrolled identity from normalized government and student IDs.
    pub fn enrolled(
        government_id: impl Into<String>,
        student_id: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        Ok(Self::Enrolled {
            government_id: IdentityKey::new(government_id)?,
            student_id: IdentityKey::new(student_id)?,
        })
    }

    /// Government ID, if any.
    pub fn government_id(&self) -> Option<&IdentityKey> {
        match self {
            Self::Plain => None,
            Self::Registered { government_id } | Self::Enrolled { government_id, .. } => {
                Some(government_id)
            }
        }
    }

    /// Student ID, if any.
    pub fn student_id(&self) -> Option<&IdentityKey> {
        match self {
            Self::Enrolled { student_id, .. } => Some(student_id),
            _ => None,
        }
    }

    /// Get the kind label for this identity.
    pub fn kind(&self) -> PersonKind {
        match self {
            Self::Plain => PersonKind::Person,
            Self::Registered { .. } => PersonKind::RegisteredPerson,
            Self::Enrolled { .. } => PersonKind::OCCCPerson,
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::Plain
    }
}

/// Kind label used by import files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum PersonKind {
    /// Plain person.
    Person,
    /// Person with a government ID.
    RegisteredPerson,
    /// Enrolled person with government and student IDs.
    OCCCPerson,
}

impl fmt::Display for PersonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Person => write!(f, "Person"),
            Self::RegisteredPerson => write!(f, "RegisteredPerson"),
            Self::OCCCPerson => write!(f, "OCCCPerson"),
        }
    }
}

/// A person record held in (or offered to) the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
    /// Free-form description.
    pub description: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Identity tier and keys.
    #[serde(default)]
    pub identity: Identity,
}

impl Person {
    /// Create a plain person.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth,
            description: None,
            tags: Vec::new(),
            identity: Identity::Plain,
        }
    }

    /// Attach an identity.
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Government ID, if registered or enrolled.
    pub fn government_id(&self) -> Option<&IdentityKey> {
        self.identity.government_id()
    }

    /// Student ID, if enrolled.
    pub fn student_id(&self) -> Option<&IdentityKey> {
        self.identity.student_id()
    }

    /// True for registered and enrolled persons.
    pub fn is_registered(&self) -> bool {
        !matches!(self.identity, Identity::Plain)
    }

    /// True for enrolled persons only.
    pub fn is_enrolled(&self) -> bool {
        matches!(self.identity, Identity::Enrolled { .. })
    }

    /// Kind label.
    pub fn kind(&self) -> PersonKind {
        self.identity.kind()
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.first_name,
            self.last_name,
            self.date_of_birth.format("%m/%d/%Y")
        )?;
        if let Some(gov) = self.government_id() {
            write!(f, " gov={gov}")?;
        }
        if let Some(stu) = self.student_id() {
            write!(f, " stu={stu}")?;
        }
        Ok(())
    }
}
