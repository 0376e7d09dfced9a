use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::Local;

use super::app::{App, Focus, InputMode};
use crate::config;
use crate::db::Database;
use crate::export::{self, ExportScope};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit", cmd_quit, r);
    register_command!("quit", "Quit", cmd_quit, r);
    register_command!("a", "Save the form", cmd_add, r);
    register_command!("add", "Save the form", cmd_add, r);
    register_command!(
        "search",
        "Filter records by name (e.g. :search Ali)",
        cmd_search,
        r
    );
    register_command!("s", "Filter records by name (e.g. :s Ali)", cmd_search, r);
    register_command!(
        "export",
        "Export all records to .pdf, .csv or .xlsx (e.g. :export ~/list.pdf)",
        cmd_export,
        r
    );
    register_command!("e", "Export all records", cmd_export, r);
    register_command!(
        "export-name",
        "Export matching names (e.g. :export-name Marie Claire ~/mc.xlsx)",
        cmd_export_name,
        r
    );
    register_command!("en", "Export matching names", cmd_export_name, r);
    register_command!("refresh", "Reload records and suggestions", cmd_refresh, r);
    register_command!("r", "Reload records and suggestions", cmd_refresh, r);
    register_command!("clear", "Clear the form and the search", cmd_clear, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 2)
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Where an export goes when the user names no file.
fn default_export_path() -> PathBuf {
    config::default_export_dir().join(export::default_file_name(Local::now().naive_local()))
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_add(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.focus = Focus::Form;
    app.submit_form(db)
}

fn cmd_search(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.search_input = args.to_string();
    app.record_index = 0;
    app.record_scroll = 0;
    app.refresh_records(db)?;
    if args.is_empty() {
        app.set_status("Search cleared");
    } else {
        app.set_status(format!("{} match(es) for '{args}'", app.records.len()));
    }
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        default_export_path()
    } else {
        PathBuf::from(config::shellexpand(args))
    };
    app.export(db, &ExportScope::All, &path)
}

fn cmd_export_name(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let (fragment, path) = split_fragment_and_path(args);
    let fragment = if fragment.is_empty() {
        app.search_input.trim().to_string()
    } else {
        fragment
    };
    if fragment.is_empty() {
        app.set_status("Usage: :export-name <name fragment> [path]");
        return Ok(());
    }
    let path = match path {
        Some(p) => PathBuf::from(config::shellexpand(p)),
        None => default_export_path(),
    };
    app.export(db, &ExportScope::NameContains(fragment), &path)
}

/// Split `:export-name` arguments. The last word is the target when it looks
/// like a file path (a separator, `~` or an extension); the rest, spaces
/// included, is the name fragment.
fn split_fragment_and_path(args: &str) -> (String, Option<&str>) {
    let args = args.trim();
    let (head, last) = match args.rsplit_once(char::is_whitespace) {
        Some((head, last)) => (head.trim_end(), last),
        None => ("", args),
    };
    let looks_like_path = last.contains(std::path::MAIN_SEPARATOR)
        || last.contains('/')
        || last.starts_with('~')
        || Path::new(last)
            .extension()
            .is_some_and(|ext| !ext.is_empty());
    if looks_like_path {
        (head.to_string(), Some(last))
    } else {
        (args.to_string(), None)
    }
}

fn cmd_refresh(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.refresh_all(db)?;
    app.set_status(format!("{} records", app.record_count));
    Ok(())
}

fn cmd_clear(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.clear_form();
    app.search_input.clear();
    app.input_mode = InputMode::Normal;
    app.refresh_records(db)?;
    app.set_status("Cleared");
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod commands_tests;
