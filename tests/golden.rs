//! Golden tests for the reconciliation engine.
//!
//! Fixed registries, fixed batches, fixed decisions, exact expected outcomes.

use chrono::NaiveDate;
use registry_reconcile::{
    reconcile, parse_batch, ConflictKind, Decision, FixedProvider, Identity, InMemoryRegistry,
    Mutation, Person, ProviderCall, ReconcileConfig, ReconciliationEngine, Registry,
    ScriptedProvider, SilentProvider, Tally,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Route engine logs to the test harness. Safe to call from every test.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn date(m: u32, d: u32, y: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn registered(first: &str, last: &str, dob: NaiveDate, gov: &str) -> Person {
    Person::new(first, last, dob).with_identity(Identity::registered(gov).unwrap())
}

fn enrolled(first: &str, last: &str, dob: NaiveDate, gov: &str, stu: &str) -> Person {
    Person::new(first, last, dob).with_identity(Identity::enrolled(gov, stu).unwrap())
}

fn alice() -> Person {
    registered("Alice", "Smith", date(1, 1, 2000), "GOV1")
}

fn tally(imported: usize, duplicates_skipped: usize, conflicts_resolved: usize) -> Tally {
    Tally {
        imported,
        duplicates_skipped,
        conflicts_resolved,
        ..Tally::default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Worked scenarios
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn exact_duplicate_is_skipped() {
    let mut registry = InMemoryRegistry::from_entries(vec![alice()]);
    let mut provider = ScriptedProvider::default();

    let result = reconcile(vec![alice()], &mut registry, &mut provider, false).unwrap();

    assert_eq!(result, tally(0, 1, 0));
    assert_eq!(registry.as_slice(), &[alice()]);
    assert!(provider.calls().is_empty());
}

#[test]
fn government_id_conflict_use_new_replaces_in_place() {
    let mut registry = InMemoryRegistry::from_entries(vec![alice()]);
    let smyth = registered("Alice", "Smyth", date(1, 1, 2000), "GOV1");
    let mut provider = ScriptedProvider::per_item([Decision::UseNew]);

    let report = ReconciliationEngine::default()
        .reconcile(vec![smyth.clone()], &mut registry, &mut provider)
        .unwrap();

    assert_eq!(report.tally, tally(0, 0, 1));
    assert_eq!(report.mutations, vec![Mutation::Replaced { index: 0 }]);
    assert_eq!(registry.as_slice(), &[smyth]);
    assert_eq!(provider.calls(), &[ProviderCall::One { existing_index: 0, remaining: 1 }]);
}

#[test]
fn unregistered_record_into_empty_registry() {
    let json = r#"[{"firstName": "Bob", "lastName": "Lee", "dob": "05/05/1999",
                   "governmentID": "", "type": "RegisteredPerson"}]"#;
    let batch = parse_batch(json).unwrap();
    let mut registry = InMemoryRegistry::new();

    let result = reconcile(batch, &mut registry, &mut SilentProvider, false).unwrap();

    assert_eq!(result, tally(1, 0, 0));
    assert_eq!(registry.len(), 1);
    assert!(!registry.get(0).unwrap().is_registered());
}

#[test]
fn government_id_match_shadows_student_id() {
    let existing = enrolled("C", "D", date(1, 1, 1990), "GOV2", "STU9");
    let incoming = enrolled("C", "D", date(1, 1, 1990), "GOV2", "STU8");
    let registry = vec![existing];

    let info = registry_reconcile::detect(&incoming, &registry)
        .into_conflict()
        .unwrap();
    assert_eq!(info.kind, ConflictKind::GovernmentId);
    assert_eq!(info.conflicting_value, "GOV2");

    let mut registry = registry;
    let mut provider = ScriptedProvider::per_item([Decision::KeepExisting]);
    let result = reconcile(vec![incoming], &mut registry, &mut provider, false).unwrap();

    assert_eq!(result, tally(0, 0, 1));
    assert_eq!(provider.one_calls(), 1);
}

#[test]
fn apply_to_all_keep_existing_prompts_once() {
    let originals = vec![
        registered("A", "One", date(1, 1, 2000), "G1"),
        registered("B", "Two", date(2, 2, 2000), "G2"),
        registered("C", "Three", date(3, 3, 2000), "G3"),
    ];
    let mut registry = InMemoryRegistry::from_entries(originals.clone());
    let batch: Vec<_> = originals
        .iter()
        .map(|p| Person { last_name: format!("{}x", p.last_name), ..p.clone() })
        .collect();
    let mut provider = ScriptedProvider::new([Decision::ApplyToAll], [Decision::KeepExisting]);

    let result = reconcile(batch, &mut registry, &mut provider, false).unwrap();

    assert_eq!(result.conflicts_resolved, 3);
    assert_eq!(registry.as_slice(), originals.as_slice());
    assert_eq!(provider.one_calls(), 1);
    assert_eq!(provider.global_calls(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Mixed batches
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn mixed_batch_counts_every_category() {
    init_tracing();
    let mut registry = InMemoryRegistry::from_entries(vec![
        alice(),
        enrolled("C", "D", date(1, 1, 1990), "GOV2", "STU9"),
    ]);
    let batch = vec![
        Some(alice()),                                                  // duplicate
        None,                                                           // dropped
        Some(registered("Alice", "Smyth", date(1, 1, 2000), "GOV1")),   // conflict (gov)
        Some(enrolled("C", "D", date(1, 1, 1990), "GOV3", "STU9")),     // conflict (stu)
        Some(registered("Eve", "Ng", date(7, 4, 1985), "GOV4")),        // novel
        Some(Person::new("Bob", "Lee", date(5, 5, 1999))),              // novel
    ];
    let mut provider = ScriptedProvider::per_item([Decision::UseNew, Decision::Skip]);

    let report = ReconciliationEngine::default()
        .reconcile(batch, &mut registry, &mut provider)
        .unwrap();

    assert_eq!(report.tally.imported, 2);
    assert_eq!(report.tally.duplicates_skipped, 1);
    assert_eq!(report.tally.conflicts_resolved, 1);
    assert_eq!(report.tally.conflicts_skipped, 1);
    assert_eq!(
        report.mutations,
        vec![
            Mutation::Replaced { index: 0 },
            Mutation::Inserted { index: 2 },
            Mutation::Inserted { index: 3 },
        ]
    );
    assert_eq!(registry.get(0).unwrap().last_name, "Smyth");
    assert_eq!(registry.get(1).unwrap().government_id().unwrap().as_str(), "GOV2");
    assert!(registry.identity_collisions().is_empty());
}

#[test]
fn cancel_leaves_conflict_unresolved_and_uncounted() {
    init_tracing();
    let mut registry = InMemoryRegistry::from_entries(vec![alice()]);
    let mut provider = ScriptedProvider::per_item([Decision::Cancel]);

    let report = ReconciliationEngine::default()
        .reconcile(
            vec![registered("Alice", "Smyth", date(1, 1, 2000), "GOV1")],
            &mut registry,
            &mut provider,
        )
        .unwrap();

    assert_eq!(report.tally.conflicts_resolved, 0);
    assert_eq!(report.tally.conflicts_unresolved, 1);
    assert_eq!(report.tally.imported, 0);
    assert_eq!(registry.as_slice(), &[alice()]);
}

#[test]
fn silent_config_keeps_existing_everywhere() {
    let mut registry = InMemoryRegistry::from_entries(vec![alice()]);
    let mut provider = FixedProvider::use_new();

    let report = ReconciliationEngine::new(ReconcileConfig::silent())
        .reconcile(
            vec![
                registered("Alice", "Smyth", date(1, 1, 2000), "GOV1"),
                registered("Zed", "Q", date(9, 9, 1970), "GOV9"),
            ],
            &mut registry,
            &mut provider,
        )
        .unwrap();

    assert_eq!(report.tally, tally(1, 0, 1));
    assert_eq!(registry.get(0), Some(&alice()));
}

#[test]
fn conflicting_record_replaced_then_batch_sibling_dropped() {
    // Two incoming records share GOV1 with the entry; the first replaces it,
    // the second is queued as its own conflict and kept out.
    let mut registry = InMemoryRegistry::from_entries(vec![alice()]);
    let batch = vec![
        registered("Alice", "Smyth", date(1, 1, 2000), "GOV1"),
        registered("Alicia", "Smith", date(1, 1, 2000), "GOV1"),
    ];
    let mut provider = ScriptedProvider::per_item([Decision::UseNew, Decision::KeepExisting]);

    let report = ReconciliationEngine::default()
        .reconcile(batch, &mut registry, &mut provider)
        .unwrap();

    assert_eq!(report.tally.conflicts_resolved, 2);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get(0).unwrap().last_name, "Smyth");
}

#[test]
fn same_inputs_same_fingerprint() {
    let run = || {
        let mut registry = InMemoryRegistry::from_entries(vec![alice()]);
        let batch = vec![
            registered("Alice", "Smyth", date(1, 1, 2000), "GOV1"),
            registered("Eve", "Ng", date(7, 4, 1985), "GOV4"),
        ];
        ReconciliationEngine::default()
            .reconcile(batch, &mut registry, &mut FixedProvider::use_new())
            .unwrap()
    };

    assert_eq!(run().fingerprint(), run().fingerprint());
}
