//! Identity comparison over the person tiers.
//!
//! Pure functions, no registry access. `identical` is symmetric and is the
//! single definition of "exact duplicate" used throughout the crate.

use crate::types::{Identity, Person};

/// True iff first name, last name and date of birth are equal.
///
/// Identity tier, description and tags are ignored.
pub fn same_basic_identity(a: &Person, b: &Person) -> bool {
    a.first_name == b.first_name
        && a.last_name == b.last_name
        && a.date_of_birth == b.date_of_birth
}

/// Structural identity of two persons.
///
/// Requires equal basic identity and matching tiers:
/// - plain vs plain: equal
/// - registered vs registered: government IDs must match
/// - enrolled vs enrolled: government and student IDs must match
/// - any mixed pair: not equal
///
/// Description and tags do not participate.
pub fn identical(a: &Person, b: &Person) -> bool {
    if !same_basic_identity(a, b) {
        return false;
    }

    match (&a.identity, &b.identity) {
        (Identity::Plain, Identity::Plain) => true,
        (
            Identity::Registered { government_id: ga },
            Identity::Registered { government_id: gb },
        ) => ga == gb,
        (
            Identity::Enrolled { government_id: ga, student_id: sa },
            Identity::Enrolled { government_id: gb, student_id: sb },
        ) => ga == gb && sa == sb,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
    }

    fn plain(first: &str) -> Person {
        Person::new(first, "Smith", dob())
    }

    fn registered(first: &str, gov: &str) -> Person {
        plain(first).with_identity(Identity::registered(gov).unwrap())
    }

    fn enrolled(first: &str, gov: &str, stu: &str) -> Person {
        plain(first).with_identity(Identity::enrolled(gov, stu).unwrap())
    }

    #[test]
    fn test_plain_persons_match_on_name_and_dob() {
        assert!(identical(&plain("Alice"), &plain("Alice")));
        assert!(!identical(&plain("Alice"), &plain("Alicia")));

        let mut older = plain("Alice");
        older.date_of_birth = NaiveDate::from_ymd_opt(1999, 1, 1).unwrap();
        assert!(!identical(&plain("Alice"), &older));
    }

    #[test]
    fn test_description_and_tags_ignored() {
        let a = plain("Alice").with_description("transfer").with_tag("x");
        assert!(identical(&a, &plain("Alice")));
    }

    #[test]
    fn test_mixed_tiers_never_identical() {
        let p = plain("Alice");
        let r = registered("Alice", "GOV1");
        let e = enrolled("Alice", "GOV1", "STU1");

        assert!(!identical(&p, &r));
        assert!(!identical(&r, &p));
        assert!(!identical(&r, &e));
        assert!(!identical(&e, &r));
        assert!(!identical(&p, &e));
    }

    #[test]
    fn test_registered_requires_matching_government_id() {
        assert!(identical(&registered("Alice", "GOV1"), &registered("Alice", "GOV1")));
        assert!(!identical(&registered("Alice", "GOV1"), &registered("Alice", "GOV2")));
    }

    #[test]
    fn test_enrolled_requires_both_keys() {
        let a = enrolled("C", "GOV2", "STU9");
        assert!(identical(&a, &enrolled("C", "GOV2", "STU9")));
        assert!(!identical(&a, &enrolled("C", "GOV2", "STU8")));
        assert!(!identical(&a, &enrolled("C", "GOV3", "STU9")));
    }
}
