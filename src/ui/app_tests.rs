#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

fn fill(app: &mut App, name: &str, address: &str, support_type: &str, amount: &str, year: &str) {
    app.form.name = name.into();
    app.form.address = address.into();
    app.form.support_type = support_type.into();
    app.form.amount = amount.into();
    app.form.year = year.into();
}

fn setup() -> (Database, App) {
    let db = Database::open_in_memory().unwrap();
    let mut app = App::new();
    app.refresh_all(&db).unwrap();
    (db, app)
}

// ── Form ──────────────────────────────────────────────────────

#[test]
fn test_form_defaults_to_current_year() {
    let form = Form::new();
    assert_eq!(form.year, Local::now().year().to_string());
    assert!(form.name.is_empty());
}

#[test]
fn test_adjust_year_clamps() {
    let mut form = Form::new();
    form.year = "2999".into();
    form.adjust_year(1);
    assert_eq!(form.year, "2999");
    form.year = "1900".into();
    form.adjust_year(-1);
    assert_eq!(form.year, "1900");
    form.adjust_year(5);
    assert_eq!(form.year, "1905");
}

#[test]
fn test_field_cycle() {
    let mut app = App::new();
    assert_eq!(app.form_field, FormField::Name);
    for _ in 0..FormField::all().len() {
        app.next_field();
    }
    assert_eq!(app.form_field, FormField::Name);
    app.prev_field();
    assert_eq!(app.form_field, FormField::Year);
}

#[test]
fn test_field_accepts() {
    assert!(FormField::Amount.accepts('4'));
    assert!(FormField::Amount.accepts(','));
    assert!(!FormField::Amount.accepts('a'));
    assert!(!FormField::Year.accepts('.'));
    assert!(FormField::Name.accepts('é'));
}

// ── Submitting ────────────────────────────────────────────────

#[test]
fn test_submit_new_record() {
    let (db, mut app) = setup();
    fill(&mut app, "Alice", "1 Rue A", "Food", "100.50", "2023");
    app.submit_form(&db).unwrap();

    assert_eq!(app.records.len(), 1);
    assert_eq!(app.record_count, 1);
    assert_eq!(app.status_message, "Added Alice");
    assert!(app.form.name.is_empty());
    assert_eq!(app.suggestions.names, ["Alice"]);
}

#[test]
fn test_submit_invalid_reports_and_writes_nothing() {
    let (db, mut app) = setup();
    fill(&mut app, "", "", "", "", "2023");
    app.submit_form(&db).unwrap();
    assert!(app.status_message.starts_with("Error:"));
    assert_eq!(db.count().unwrap(), 0);
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn test_submit_existing_asks_then_overwrites() {
    let (db, mut app) = setup();
    fill(&mut app, "Alice", "1 Rue A", "Food", "100.50", "2023");
    app.submit_form(&db).unwrap();

    fill(&mut app, "Alice", "2 Rue B", "Rent", "200", "2024");
    app.submit_form(&db).unwrap();
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert!(app.pending_action.is_some());
    // nothing written until the user answers
    assert_eq!(
        db.find_by_name_exact("Alice").unwrap().unwrap().year,
        2023
    );

    app.resolve_pending(&db, Resolution::Overwrite).unwrap();
    assert_eq!(app.input_mode, InputMode::Normal);
    let alice = db.find_by_name_exact("Alice").unwrap().unwrap();
    assert_eq!(alice.id, 1);
    assert_eq!(alice.amount, Some(dec!(200.00)));
    assert_eq!(alice.year, 2024);
    assert_eq!(app.status_message, "Updated Alice");
}

#[test]
fn test_submit_existing_keep() {
    let (db, mut app) = setup();
    fill(&mut app, "Alice", "1 Rue A", "Food", "100.50", "2023");
    app.submit_form(&db).unwrap();
    fill(&mut app, "Alice", "2 Rue B", "Rent", "200", "2024");
    app.submit_form(&db).unwrap();

    app.resolve_pending(&db, Resolution::Keep).unwrap();
    let alice = db.find_by_name_exact("Alice").unwrap().unwrap();
    assert_eq!(alice.address.as_deref(), Some("1 Rue A"));
    assert_eq!(db.count().unwrap(), 1);
    assert!(app.pending_action.is_none());
}

// ── Search / completion ───────────────────────────────────────

#[test]
fn test_search_filters_table() {
    let (db, mut app) = setup();
    for name in ["Alice", "Bob", "Alicia"] {
        fill(&mut app, name, "", "", "", "2023");
        app.submit_form(&db).unwrap();
    }
    app.search_input = "Ali".into();
    app.refresh_records(&db).unwrap();
    assert_eq!(app.records.len(), 2);
    assert_eq!(app.record_count, 3);
}

#[test]
fn test_accept_completion() {
    let (db, mut app) = setup();
    fill(&mut app, "Alice", "12 Rue des Lilas", "Food", "", "2023");
    app.submit_form(&db).unwrap();

    app.form_field = FormField::Address;
    app.form.address = "lilas".into();
    assert_eq!(app.completion(), Some("12 Rue des Lilas"));
    assert!(app.accept_completion());
    assert_eq!(app.form.address, "12 Rue des Lilas");

    app.form_field = FormField::Amount;
    assert!(app.completion().is_none());
}

#[test]
fn test_edit_selected_fills_form() {
    let (db, mut app) = setup();
    fill(&mut app, "Alice", "1 Rue A", "Food", "100.5", "2023");
    app.submit_form(&db).unwrap();
    app.edit_selected();
    assert_eq!(app.form.name, "Alice");
    assert_eq!(app.form.amount, "100.50");
    assert_eq!(app.focus, Focus::Form);
}

// ── Export ────────────────────────────────────────────────────

#[test]
fn test_export_empty_sets_status() {
    let (db, mut app) = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.pdf");
    app.export(&db, &ExportScope::All, &path).unwrap();
    assert_eq!(app.status_message, "No data to export");
    assert!(!path.exists());
}

#[test]
fn test_export_bad_directory_is_not_fatal() {
    let (db, mut app) = setup();
    fill(&mut app, "Alice", "", "", "", "2023");
    app.submit_form(&db).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.csv");
    app.export(&db, &ExportScope::All, &path).unwrap();
    assert!(app.status_message.starts_with("Export failed"));
}
