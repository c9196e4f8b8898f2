//! Import record shape.
//!
//! File-based sources describe people with flat records:
//!
//! ```json
//! {"firstName": "Alice", "lastName": "Smith", "dob": "01/01/2000",
//!  "governmentID": "GOV1", "type": "RegisteredPerson"}
//! ```
//!
//! Identity keys are normalized on the way in. Records that cannot become a
//! valid [`Person`] are reported as [`RecordError`]; batch parsing turns them
//! into `None` so the engine drops them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::person::{Identity, IdentityKey, Person, PersonKind};

/// Date format used by import files.
pub const RECORD_DATE_FORMAT: &str = "%m/%d/%Y";

/// Error converting a record into a person.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// First or last name is blank.
    #[error("Record is missing a {0}")]
    MissingName(&'static str),
    /// Date of birth does not parse as MM/dd/yyyy.
    #[error("Invalid date of birth: {0:?}")]
    InvalidDate(String),
    /// Enrolled record without a government ID.
    #[error("Enrolled record is missing a governmentID")]
    MissingGovernmentId,
    /// Enrolled record without a student ID.
    #[error("Enrolled record is missing a studentID")]
    MissingStudentId,
}

/// A person as it appears in an import file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Given name.
    #[serde(rename = "firstName")]
    pub first_name: String,
    /// Family name.
    #[serde(rename = "lastName")]
    pub last_name: String,
    /// Date of birth, MM/dd/yyyy.
    pub dob: String,
    /// Government ID (raw, normalized on conversion).
    #[serde(rename = "governmentID", default, skip_serializing_if = "Option::is_none")]
    pub government_id: Option<String>,
    /// Student ID (raw, normalized on conversion).
    #[serde(rename = "studentID", default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Declared kind. Inferred from the present keys when absent.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PersonKind>,
}

impl PersonRecord {
    /// Kind declared by the record, or inferred from which keys are present.
    pub fn effective_kind(&self) -> PersonKind {
        if let Some(kind) = self.kind {
            return kind;
        }
        if present(&self.student_id) {
            PersonKind::OCCCPerson
        } else if present(&self.government_id) {
            PersonKind::RegisteredPerson
        } else {
            PersonKind::Person
        }
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().and_then(IdentityKey::normalize).is_some()
}

impl TryFrom<PersonRecord> for Person {
    type Error = RecordError;

    fn try_from(record: PersonRecord) -> Result<Self, Self::Error> {
        if record.first_name.trim().is_empty() {
            return Err(RecordError::MissingName("firstName"));
        }
        if record.last_name.trim().is_empty() {
            return Err(RecordError::MissingName("lastName"));
        }

        let date_of_birth = NaiveDate::parse_from_str(record.dob.trim(), RECORD_DATE_FORMAT)
            .map_err(|_| RecordError::InvalidDate(record.dob.clone()))?;

        let government_id = record.government_id.as_deref().and_then(IdentityKey::normalize);
        let student_id = record.student_id.as_deref().and_then(IdentityKey::normalize);

        let identity = match (record.effective_kind(), government_id) {
            (PersonKind::Person, _) => Identity::Plain,
            // A registered record with a blank ID is an ordinary person.
            (PersonKind::RegisteredPerson, None) => Identity::Plain,
            (PersonKind::RegisteredPerson, Some(government_id)) => {
                Identity::Registered { government_id }
            }
            (PersonKind::OCCCPerson, None) => return Err(RecordError::MissingGovernmentId),
            (PersonKind::OCCCPerson, Some(government_id)) => Identity::Enrolled {
                government_id,
                student_id: student_id.ok_or(RecordError::MissingStudentId)?,
            },
        };

        Ok(Person {
            first_name: record.first_name,
            last_name: record.last_name,
            date_of_birth,
            description: record.description,
            tags: record.tags,
            identity,
        })
    }
}

impl From<&Person> for PersonRecord {
    fn from(person: &Person) -> Self {
        Self {
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            dob: person.date_of_birth.format(RECORD_DATE_FORMAT).to_string(),
            government_id: person.government_id().map(|k| k.as_str().to_string()),
            student_id: person.student_id().map(|k| k.as_str().to_string()),
            description: person.description.clone(),
            tags: person.tags.clone(),
            kind: Some(person.kind()),
        }
    }
}

/// Parse a JSON array of import records into a batch.
///
/// Entries that are not valid records, or that fail conversion, become `None`.
/// Only a top level that is not a JSON array is an error.
pub fn parse_batch(json: &str) -> Result<Vec<Option<Person>>, serde_json::Error> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;

    Ok(values
        .into_iter()
        .enumerate()
        .map(|(position, value)| {
            let record: PersonRecord = match serde_json::from_value(value) {
                Ok(record) => record,
                Err(e) => {
                    tracing::debug!(position, error = %e, "Dropping unreadable import record");
                    return None;
                }
            };
            match Person::try_from(record) {
                Ok(person) => Some(person),
                Err(e) => {
                    tracing::debug!(position, error = %e, "Dropping malformed import record");
                    None
                }
            }
        })
        .collect())
}
