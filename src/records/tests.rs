#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn new(name: &str, address: &str, support_type: &str, amount: &str, year: &str) -> NewBeneficiary {
    NewBeneficiary::parse(name, address, support_type, amount, year).unwrap()
}

fn setup() -> Database {
    let db = Database::open_in_memory().unwrap();
    for (name, address, kind, amount, year) in [
        ("Alice", "1 Rue A", "Food", "100.50", "2023"),
        ("Bob", "2 Rue B", "Rent", "", "2024"),
        ("Alicia", "", "food", "5", "2021"),
        ("Marc-Alice", "3 Rue C", "Rent", "20", "2020"),
    ] {
        upsert(&db, &new(name, address, kind, amount, year), Resolution::Keep).unwrap();
    }
    db
}

// ── upsert ────────────────────────────────────────────────────

#[test]
fn test_upsert_then_find() {
    let db = Database::open_in_memory().unwrap();
    for (name, year) in [("Alice", "2023"), ("Zoë", "1900"), ("X", "2999")] {
        upsert(&db, &new(name, "", "", "", year), Resolution::Keep).unwrap();
        let found = db.find_by_name_exact(name).unwrap().unwrap();
        assert_eq!(found.name, name);
        assert_eq!(found.year.to_string(), year);
    }
}

#[test]
fn test_upsert_scenario_overwrite() {
    let db = Database::open_in_memory().unwrap();
    let first = upsert(
        &db,
        &new("Alice", "1 Rue A", "Food", "100.50", "2023"),
        Resolution::Overwrite,
    )
    .unwrap();
    assert_eq!(first, UpsertOutcome::Inserted(1));

    let found = db.find_by_name_exact("Alice").unwrap().unwrap();
    assert_eq!(found.id, 1);
    assert_eq!(found.address.as_deref(), Some("1 Rue A"));
    assert_eq!(found.support_type.as_deref(), Some("Food"));
    assert_eq!(found.amount, Some(dec!(100.50)));
    assert_eq!(found.year, 2023);

    let second = upsert(
        &db,
        &new("Alice", "2 Rue B", "Rent", "200.00", "2024"),
        Resolution::Overwrite,
    )
    .unwrap();
    assert_eq!(second, UpsertOutcome::Updated(1));

    let all = list_all(&db).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, 1);
    assert_eq!(all[0].address.as_deref(), Some("2 Rue B"));
    assert_eq!(all[0].support_type.as_deref(), Some("Rent"));
    assert_eq!(all[0].amount, Some(dec!(200.00)));
    assert_eq!(all[0].year, 2024);
}

#[test]
fn test_upsert_keep_leaves_record_unchanged() {
    let db = Database::open_in_memory().unwrap();
    upsert(&db, &new("Alice", "1 Rue A", "Food", "100.50", "2023"), Resolution::Keep).unwrap();
    let before = list_all(&db).unwrap();

    let outcome = upsert(&db, &new("Alice", "2 Rue B", "Rent", "1", "2024"), Resolution::Keep).unwrap();
    assert_eq!(outcome, UpsertOutcome::Kept(1));
    assert_eq!(list_all(&db).unwrap(), before);
}

#[test]
fn test_upsert_name_match_is_exact() {
    let db = Database::open_in_memory().unwrap();
    upsert(&db, &new("Alice", "", "", "", "2023"), Resolution::Overwrite).unwrap();
    let outcome = upsert(&db, &new("alice", "", "", "", "2023"), Resolution::Overwrite).unwrap();
    assert_eq!(outcome, UpsertOutcome::Inserted(2));
    assert_eq!(list_all(&db).unwrap().len(), 2);
}

#[test]
fn test_upsert_outcome_id() {
    assert_eq!(UpsertOutcome::Inserted(3).id(), 3);
    assert_eq!(UpsertOutcome::Updated(4).id(), 4);
    assert_eq!(UpsertOutcome::Kept(5).id(), 5);
}

#[test]
fn test_find_conflict_trims() {
    let db = setup();
    assert_eq!(find_conflict(&db, "  Bob ").unwrap().unwrap().name, "Bob");
    assert!(find_conflict(&db, "Nobody").unwrap().is_none());
}

// ── search ────────────────────────────────────────────────────

#[test]
fn test_search_is_filter_of_list_all() {
    let db = setup();
    let all = list_all(&db).unwrap();
    for fragment in ["Alic", "lice", "Bob", "-", "zzz", "a"] {
        let expected: Vec<_> = all
            .iter()
            .filter(|b| b.name.contains(fragment))
            .cloned()
            .collect();
        assert_eq!(search(&db, fragment).unwrap(), expected, "fragment {fragment:?}");
    }
}

#[test]
fn test_search_empty_returns_all() {
    let db = setup();
    assert_eq!(search(&db, "").unwrap(), list_all(&db).unwrap());
}

// ── Suggestions ───────────────────────────────────────────────

#[test]
fn test_suggestions_reflect_store() {
    let db = setup();
    let s = Suggestions::load(&db).unwrap();
    assert_eq!(s.names, ["Alice", "Alicia", "Bob", "Marc-Alice"]);
    assert_eq!(s.support_types, ["Food", "Rent", "food"]);
    assert_eq!(s.addresses, ["1 Rue A", "2 Rue B", "3 Rue C"]);
}

#[test]
fn test_suggestions_recomputed_after_upsert() {
    let db = setup();
    let before = Suggestions::load(&db).unwrap();
    upsert(&db, &new("Bob", "9 Rue Z", "Clothes", "", "2024"), Resolution::Overwrite).unwrap();
    let after = Suggestions::load(&db).unwrap();
    assert_ne!(before, after);
    assert!(after.addresses.contains(&"9 Rue Z".to_string()));
    assert!(!after.addresses.contains(&"2 Rue B".to_string()));
    assert!(after.support_types.contains(&"Clothes".to_string()));
}

#[test]
fn test_matching_ignores_case() {
    let db = setup();
    let s = Suggestions::load(&db).unwrap();
    assert_eq!(
        s.matching(SuggestionField::Name, "ALI"),
        ["Alice", "Alicia", "Marc-Alice"]
    );
    assert_eq!(s.matching(SuggestionField::SupportType, "FOOD"), ["Food", "food"]);
    assert!(s.matching(SuggestionField::Address, "").is_empty());
}

#[test]
fn test_completion_skips_exact_text() {
    let db = setup();
    let s = Suggestions::load(&db).unwrap();
    assert_eq!(s.completion(SuggestionField::Name, "Alice"), Some("Marc-Alice"));
    assert_eq!(s.completion(SuggestionField::Name, "alic"), Some("Alice"));
    assert_eq!(s.completion(SuggestionField::Address, "rue c"), Some("3 Rue C"));
    assert_eq!(s.completion(SuggestionField::Name, "nobody"), None);
}
