use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::db::Database;
use crate::records::Resolution;
use crate::ui::app::{App, Focus, FormField, InputMode};
use crate::ui::commands;
use crate::ui::render;
use crate::ui::util::{clamp_scroll, scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(db: &Database) -> Result<()> {
    let mut app = App::new();
    app.refresh_all(db)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    log::info!("interactive session started with {} records", app.record_count);

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }
    log::info!("interactive session ended");

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            app.visible_rows = render::record_rows(f.area().height);
            clamp_scroll(app.record_index, &mut app.record_scroll, app.visible_rows);
            render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, db)?,
                InputMode::Command => handle_command_input(key, app, db)?,
                InputMode::Search => handle_search_input(key, app, db)?,
                InputMode::Editing => handle_editing_input(key, app, db)?,
                InputMode::Confirm => handle_confirm_input(key, app, db)?,
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.search_input.clear();
            app.focus = Focus::Records;
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Tab | KeyCode::BackTab => {
            app.focus = match app.focus {
                Focus::Form => Focus::Records,
                Focus::Records => Focus::Form,
            };
        }
        KeyCode::Enter => handle_enter(app),
        KeyCode::Esc => handle_escape(app, db)?,
        KeyCode::Char('+') | KeyCode::Char('=') if app.focus == Focus::Form => {
            app.form_field = FormField::Year;
            app.form.adjust_year(1);
        }
        KeyCode::Char('-') if app.focus == Focus::Form => {
            app.form_field = FormField::Year;
            app.form.adjust_year(-1);
        }
        KeyCode::Char('a') => {
            app.focus = Focus::Form;
            app.submit_form(db)?;
        }
        KeyCode::Char('x') if app.focus == Focus::Form => {
            app.clear_form();
            app.set_status("Form cleared");
        }
        KeyCode::Char('g') if app.focus == Focus::Records => {
            scroll_to_top(&mut app.record_index, &mut app.record_scroll);
        }
        KeyCode::Char('G') if app.focus == Focus::Records => {
            scroll_to_bottom(
                &mut app.record_index,
                &mut app.record_scroll,
                app.records.len(),
                app.visible_rows,
            );
        }
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_search_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            app.refresh_records(db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_input.clear();
            app.refresh_records(db)?;
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            scroll_to_top(&mut app.record_index, &mut app.record_scroll);
            app.refresh_records(db)?;
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            scroll_to_top(&mut app.record_index, &mut app.record_scroll);
            app.refresh_records(db)?;
        }
        _ => {}
    }
    Ok(())
}

fn handle_editing_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            if app.form_field == FormField::Year {
                app.input_mode = InputMode::Normal;
                app.submit_form(db)?;
            } else {
                app.next_field();
            }
        }
        KeyCode::Tab => {
            if !app.accept_completion() {
                app.next_field();
            }
        }
        KeyCode::BackTab => app.prev_field(),
        KeyCode::Up => app.prev_field(),
        KeyCode::Down => app.next_field(),
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.form.value_mut(app.form_field).pop();
        }
        KeyCode::Char(c) if app.form_field.accepts(c) => {
            app.form.value_mut(app.form_field).push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    let resolution = match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Resolution::Overwrite,
        _ => Resolution::Keep,
    };
    app.resolve_pending(db, resolution)
}

// ── Navigation helpers ───────────────────────────────────────

fn handle_move_down(app: &mut App) {
    match app.focus {
        Focus::Form => app.next_field(),
        Focus::Records => scroll_down(
            &mut app.record_index,
            &mut app.record_scroll,
            app.records.len(),
            app.visible_rows,
        ),
    }
}

fn handle_move_up(app: &mut App) {
    match app.focus {
        Focus::Form => app.prev_field(),
        Focus::Records => scroll_up(&mut app.record_index, &mut app.record_scroll),
    }
}

fn handle_enter(app: &mut App) {
    match app.focus {
        Focus::Form => app.input_mode = InputMode::Editing,
        Focus::Records => app.edit_selected(),
    }
}

fn handle_escape(app: &mut App, db: &Database) -> Result<()> {
    if !app.search_input.is_empty() {
        app.search_input.clear();
        app.refresh_records(db)?;
        app.set_status("Search cleared");
    } else {
        app.status_message.clear();
    }
    Ok(())
}

#[cfg(test)]
#[path = "tui_tests.rs"]
mod tui_tests;
