#![allow(clippy::unwrap_used)]

use crossterm::event::KeyEvent;

use super::*;

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn setup() -> (Database, App) {
    let db = Database::open_in_memory().unwrap();
    let mut app = App::new();
    app.refresh_all(&db).unwrap();
    (db, app)
}

fn type_text(app: &mut App, db: &Database, text: &str) {
    for c in text.chars() {
        handle_editing_input(press(KeyCode::Char(c)), app, db).unwrap();
    }
}

// ── Form editing ──────────────────────────────────────────────

#[test]
fn test_type_and_save_through_keys() {
    let (db, mut app) = setup();
    handle_normal_input(press(KeyCode::Enter), &mut app, &db).unwrap();
    assert_eq!(app.input_mode, InputMode::Editing);

    type_text(&mut app, &db, "Alice");
    handle_editing_input(press(KeyCode::Enter), &mut app, &db).unwrap();
    type_text(&mut app, &db, "1 Rue A");
    handle_editing_input(press(KeyCode::Enter), &mut app, &db).unwrap();
    type_text(&mut app, &db, "Food");
    handle_editing_input(press(KeyCode::Enter), &mut app, &db).unwrap();
    type_text(&mut app, &db, "12x,5");
    assert_eq!(app.form.amount, "12,5");
    handle_editing_input(press(KeyCode::Enter), &mut app, &db).unwrap();
    assert_eq!(app.form_field, FormField::Year);
    handle_editing_input(press(KeyCode::Enter), &mut app, &db).unwrap();

    assert_eq!(app.input_mode, InputMode::Normal);
    let alice = db.find_by_name_exact("Alice").unwrap().unwrap();
    assert_eq!(alice.amount_text(), "12.50");
    assert_eq!(alice.support_type.as_deref(), Some("Food"));
}

#[test]
fn test_tab_accepts_suggestion() {
    let (db, mut app) = setup();
    app.form.name = "Marie Claire".into();
    app.submit_form(&db).unwrap();

    app.input_mode = InputMode::Editing;
    type_text(&mut app, &db, "clai");
    handle_editing_input(press(KeyCode::Tab), &mut app, &db).unwrap();
    assert_eq!(app.form.name, "Marie Claire");
    assert_eq!(app.form_field, FormField::Name);
}

#[test]
fn test_year_keys() {
    let (db, mut app) = setup();
    app.form.year = "2023".into();
    handle_normal_input(press(KeyCode::Char('+')), &mut app, &db).unwrap();
    assert_eq!(app.form.year, "2024");
    handle_normal_input(press(KeyCode::Char('-')), &mut app, &db).unwrap();
    handle_normal_input(press(KeyCode::Char('-')), &mut app, &db).unwrap();
    assert_eq!(app.form.year, "2022");
    assert_eq!(app.form_field, FormField::Year);
}

// ── Confirmation ──────────────────────────────────────────────

fn conflict(db: &Database, app: &mut App) {
    app.form.name = "Alice".into();
    app.form.year = "2023".into();
    app.submit_form(db).unwrap();
    app.form.name = "Alice".into();
    app.form.year = "2024".into();
    app.submit_form(db).unwrap();
    assert_eq!(app.input_mode, InputMode::Confirm);
}

#[test]
fn test_confirm_yes_overwrites() {
    let (db, mut app) = setup();
    conflict(&db, &mut app);
    handle_confirm_input(press(KeyCode::Char('y')), &mut app, &db).unwrap();
    assert_eq!(db.find_by_name_exact("Alice").unwrap().unwrap().year, 2024);
}

#[test]
fn test_confirm_other_key_keeps() {
    let (db, mut app) = setup();
    conflict(&db, &mut app);
    handle_confirm_input(press(KeyCode::Esc), &mut app, &db).unwrap();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(db.find_by_name_exact("Alice").unwrap().unwrap().year, 2023);
}

// ── Search and navigation ─────────────────────────────────────

#[test]
fn test_live_search_and_escape() {
    let (db, mut app) = setup();
    for name in ["Alice", "Bob"] {
        app.form.name = name.into();
        app.submit_form(&db).unwrap();
    }
    handle_normal_input(press(KeyCode::Char('/')), &mut app, &db).unwrap();
    handle_search_input(press(KeyCode::Char('B')), &mut app, &db).unwrap();
    assert_eq!(app.records.len(), 1);
    handle_search_input(press(KeyCode::Enter), &mut app, &db).unwrap();
    assert_eq!(app.focus, Focus::Records);

    handle_normal_input(press(KeyCode::Esc), &mut app, &db).unwrap();
    assert!(app.search_input.is_empty());
    assert_eq!(app.records.len(), 2);
}

#[test]
fn test_records_navigation_and_load() {
    let (db, mut app) = setup();
    for name in ["Alice", "Bob", "Carol"] {
        app.form.name = name.into();
        app.submit_form(&db).unwrap();
    }
    handle_normal_input(press(KeyCode::Tab), &mut app, &db).unwrap();
    assert_eq!(app.focus, Focus::Records);
    handle_normal_input(press(KeyCode::Char('g')), &mut app, &db).unwrap();
    handle_normal_input(press(KeyCode::Char('j')), &mut app, &db).unwrap();
    assert_eq!(app.record_index, 1);
    handle_normal_input(press(KeyCode::Char('G')), &mut app, &db).unwrap();
    assert_eq!(app.record_index, 2);
    handle_normal_input(press(KeyCode::Enter), &mut app, &db).unwrap();
    assert_eq!(app.form.name, "Carol");
    assert_eq!(app.focus, Focus::Form);
}

#[test]
fn test_command_mode_runs_command() {
    let (db, mut app) = setup();
    handle_normal_input(press(KeyCode::Char(':')), &mut app, &db).unwrap();
    for c in "quit".chars() {
        handle_command_input(press(KeyCode::Char(c)), &mut app, &db).unwrap();
    }
    handle_command_input(press(KeyCode::Enter), &mut app, &db).unwrap();
    assert!(!app.running);
}
