use anyhow::{bail, Context, Result};
use chrono::Local;
use std::path::PathBuf;

use crate::config;
use crate::db::Database;
use crate::export::{self, ExportScope};
use crate::models::{Beneficiary, NewBeneficiary};
use crate::records::{self, Resolution, SuggestionField, Suggestions, UpsertOutcome};
use crate::ui::util::truncate;

pub(crate) fn as_cli(args: &[String], db: &Database) -> Result<()> {
    let rest = &args[1..];
    match args[0].as_str() {
        "add" => cli_add(rest, db),
        "list" | "ls" => cli_list(db),
        "search" | "s" => cli_search(rest, db),
        "export" => cli_export(rest, db),
        "suggest" => cli_suggest(db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("beneficiaries {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("beneficiaries: register of aid beneficiaries");
    println!();
    println!("Usage: beneficiaries [--db PATH] [--log PATH] [--log-level LEVEL] [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  add <name> --year <YYYY>      Add a beneficiary or update an existing one");
    println!("    --address <text>            Postal address");
    println!("    --type <text>               Support type");
    println!("    --amount <number>           Amount, up to 2 decimals");
    println!("    --overwrite | --keep        What to do when the name already exists");
    println!("  list                          List all beneficiaries");
    println!("  search <fragment>             List names containing <fragment>");
    println!("  export <path>                 Export to PDF (.pdf), CSV (.csv) or Excel (anything else)");
    println!("    --name <fragment>           Only names containing <fragment>");
    println!("  suggest                       Print known names, support types and addresses");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

/// Value following `name` in `args`, if present.
fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

fn has_switch(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

/// Parse and save the record described by `args`.
fn add_record(args: &[String], db: &Database) -> Result<UpsertOutcome> {
    let name = match args.first() {
        Some(n) if !n.starts_with("--") => n.as_str(),
        _ => bail!("Usage: beneficiaries add <name> --year <YYYY> [options]"),
    };

    let input = NewBeneficiary::parse(
        name,
        flag(args, "--address").unwrap_or(""),
        flag(args, "--type").unwrap_or(""),
        flag(args, "--amount").unwrap_or(""),
        flag(args, "--year").unwrap_or(""),
    )?;

    let resolution = match (has_switch(args, "--overwrite"), has_switch(args, "--keep")) {
        (true, true) => bail!("--overwrite and --keep cannot be combined"),
        (true, false) => Resolution::Overwrite,
        (false, true) => Resolution::Keep,
        (false, false) => {
            if let Some(existing) = records::find_conflict(db, &input.name)? {
                bail!(
                    "'{}' already exists (id {}). Re-run with --overwrite or --keep",
                    existing.name,
                    existing.id
                );
            }
            Resolution::Keep
        }
    };

    Ok(records::upsert(db, &input, resolution)?)
}

fn cli_add(args: &[String], db: &Database) -> Result<()> {
    let outcome = add_record(args, db)?;
    let name = args[0].trim();
    match outcome {
        UpsertOutcome::Inserted(id) => println!("Added {name} (id {id})"),
        UpsertOutcome::Updated(id) => println!("Updated {name} (id {id})"),
        UpsertOutcome::Kept(id) => println!("Kept the existing details of {name} (id {id})"),
    }
    Ok(())
}

fn cli_list(db: &Database) -> Result<()> {
    print_table(&records::list_all(db)?);
    Ok(())
}

fn cli_search(args: &[String], db: &Database) -> Result<()> {
    let fragment = args.first().map(String::as_str).unwrap_or("");
    print_table(&records::search(db, fragment)?);
    Ok(())
}

fn print_table(rows: &[Beneficiary]) {
    if rows.is_empty() {
        println!("No beneficiaries");
        return;
    }

    println!(
        "{:<5} {:<24} {:<30} {:<16} {:>12} {:<4}",
        "ID", "Name", "Address", "Support type", "Amount", "Year"
    );
    println!("{}", "─".repeat(96));
    for b in rows {
        println!(
            "{:<5} {:<24} {:<30} {:<16} {:>12} {:<4}",
            b.id,
            truncate(&b.name, 24),
            truncate(b.address_text(), 30),
            truncate(b.support_type_text(), 16),
            b.amount_text(),
            b.year,
        );
    }
}

fn cli_export(args: &[String], db: &Database) -> Result<()> {
    let path = match args.first() {
        Some(p) if !p.starts_with("--") => PathBuf::from(config::shellexpand(p)),
        _ => bail!("Usage: beneficiaries export <path> [--name <fragment>]"),
    };

    let scope = match flag(args, "--name") {
        Some(fragment) => ExportScope::NameContains(fragment.to_string()),
        None => ExportScope::All,
    };

    let summary = export::export(db, &scope, &path, Local::now().naive_local())
        .with_context(|| format!("Export to {} failed", path.display()))?;
    println!("{summary}");
    Ok(())
}

fn cli_suggest(db: &Database) -> Result<()> {
    let suggestions = Suggestions::load(db)?;
    for (title, field) in [
        ("Names", SuggestionField::Name),
        ("Support types", SuggestionField::SupportType),
        ("Addresses", SuggestionField::Address),
    ] {
        let values = suggestions.values(field);
        println!("{title} ({})", values.len());
        for value in values {
            println!("  {value}");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;
