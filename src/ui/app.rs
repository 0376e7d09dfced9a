use anyhow::Result;
use chrono::{Datelike, Local};
use std::path::Path;

use crate::db::Database;
use crate::error::Error;
use crate::export::{self, ExportScope};
use crate::models::{Beneficiary, NewBeneficiary, YEAR_MAX, YEAR_MIN};
use crate::records::{self, Resolution, SuggestionField, Suggestions, UpsertOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Form,
    Records,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Name,
    Address,
    SupportType,
    Amount,
    Year,
}

impl FormField {
    pub(crate) fn all() -> &'static [FormField] {
        &[
            Self::Name,
            Self::Address,
            Self::SupportType,
            Self::Amount,
            Self::Year,
        ]
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Address => "Address",
            Self::SupportType => "Support type",
            Self::Amount => "Amount",
            Self::Year => "Year",
        }
    }

    /// Fields that offer autocompletion.
    pub(crate) fn suggestion_field(&self) -> Option<SuggestionField> {
        match self {
            Self::Name => Some(SuggestionField::Name),
            Self::Address => Some(SuggestionField::Address),
            Self::SupportType => Some(SuggestionField::SupportType),
            Self::Amount | Self::Year => None,
        }
    }

    /// Whether `c` may be typed into this field.
    pub(crate) fn accepts(&self, c: char) -> bool {
        match self {
            Self::Amount => c.is_ascii_digit() || c == '.' || c == ',',
            Self::Year => c.is_ascii_digit(),
            _ => !c.is_control(),
        }
    }

    fn next(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|f| f == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    fn prev(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|f| f == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Editing,
    Command,
    Search,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Editing => write!(f, "EDIT"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    Overwrite { input: NewBeneficiary },
}

/// Raw text of the add/update form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Form {
    pub(crate) name: String,
    pub(crate) address: String,
    pub(crate) support_type: String,
    pub(crate) amount: String,
    pub(crate) year: String,
}

impl Form {
    pub(crate) fn new() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            support_type: String::new(),
            amount: String::new(),
            year: Local::now().year().to_string(),
        }
    }

    pub(crate) fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Address => &self.address,
            FormField::SupportType => &self.support_type,
            FormField::Amount => &self.amount,
            FormField::Year => &self.year,
        }
    }

    pub(crate) fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Address => &mut self.address,
            FormField::SupportType => &mut self.support_type,
            FormField::Amount => &mut self.amount,
            FormField::Year => &mut self.year,
        }
    }

    pub(crate) fn parse(&self) -> crate::error::Result<NewBeneficiary> {
        NewBeneficiary::parse(
            &self.name,
            &self.address,
            &self.support_type,
            &self.amount,
            &self.year,
        )
    }

    /// Load a stored record so it can be edited and re-submitted.
    pub(crate) fn fill_from(&mut self, b: &Beneficiary) {
        self.name = b.name.clone();
        self.address = b.address_text().to_string();
        self.support_type = b.support_type_text().to_string();
        self.amount = b.amount_text();
        self.year = b.year.to_string();
    }

    /// Step the year by `delta`, staying within the accepted range.
    pub(crate) fn adjust_year(&mut self, delta: i32) {
        let current = self
            .year
            .trim()
            .parse::<i32>()
            .unwrap_or_else(|_| Local::now().year());
        self.year = (current + delta).clamp(YEAR_MIN, YEAR_MAX).to_string();
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) focus: Focus,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    // Form
    pub(crate) form: Form,
    pub(crate) form_field: FormField,
    pub(crate) suggestions: Suggestions,

    // Records table
    pub(crate) records: Vec<Beneficiary>,
    pub(crate) record_index: usize,
    pub(crate) record_scroll: usize,
    pub(crate) record_count: i64,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            focus: Focus::Form,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,

            form: Form::new(),
            form_field: FormField::Name,
            suggestions: Suggestions::default(),

            records: Vec::new(),
            record_index: 0,
            record_scroll: 0,
            record_count: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn refresh_records(&mut self, db: &Database) -> Result<()> {
        self.records = records::search(db, &self.search_input)?;
        self.record_count = db.count()?;
        if self.record_index >= self.records.len() {
            self.record_index = self.records.len().saturating_sub(1);
        }
        if self.record_scroll > self.record_index {
            self.record_scroll = self.record_index;
        }
        Ok(())
    }

    pub(crate) fn refresh_suggestions(&mut self, db: &Database) -> Result<()> {
        self.suggestions = Suggestions::load(db)?;
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.refresh_records(db)?;
        self.refresh_suggestions(db)?;
        Ok(())
    }

    pub(crate) fn next_field(&mut self) {
        self.form_field = self.form_field.next();
    }

    pub(crate) fn prev_field(&mut self) {
        self.form_field = self.form_field.prev();
    }

    /// Suggested completion for the field being edited, if any.
    pub(crate) fn completion(&self) -> Option<&str> {
        let field = self.form_field.suggestion_field()?;
        self.suggestions
            .completion(field, self.form.value(self.form_field))
    }

    pub(crate) fn accept_completion(&mut self) -> bool {
        match self.completion().map(str::to_string) {
            Some(text) => {
                *self.form.value_mut(self.form_field) = text;
                true
            }
            None => false,
        }
    }

    /// Validate the form and save it. A name that already exists asks the
    /// user whether to overwrite before anything is written.
    pub(crate) fn submit_form(&mut self, db: &Database) -> Result<()> {
        let input = match self.form.parse() {
            Ok(input) => input,
            Err(e) => {
                log::warn!("rejected form input: {e}");
                self.set_status(format!("Error: {e}"));
                return Ok(());
            }
        };

        if let Some(existing) = records::find_conflict(db, &input.name)? {
            self.confirm_message = format!(
                "'{}' already exists (id {}). Overwrite its details?",
                existing.name, existing.id
            );
            self.pending_action = Some(PendingAction::Overwrite { input });
            self.input_mode = InputMode::Confirm;
            return Ok(());
        }

        self.save(db, &input, Resolution::Keep)
    }

    /// Apply the user's answer to a pending confirmation.
    pub(crate) fn resolve_pending(&mut self, db: &Database, resolution: Resolution) -> Result<()> {
        let action = self.pending_action.take();
        self.input_mode = InputMode::Normal;
        self.confirm_message.clear();
        match action {
            Some(PendingAction::Overwrite { input }) => self.save(db, &input, resolution),
            None => Ok(()),
        }
    }

    fn save(&mut self, db: &Database, input: &NewBeneficiary, resolution: Resolution) -> Result<()> {
        let outcome = records::upsert(db, input, resolution)?;
        let msg = match outcome {
            UpsertOutcome::Inserted(_) => format!("Added {}", input.name),
            UpsertOutcome::Updated(_) => format!("Updated {}", input.name),
            UpsertOutcome::Kept(_) => format!("Kept the existing details of {}", input.name),
        };
        self.set_status(msg);
        self.clear_form();
        self.refresh_all(db)?;
        if let Some(idx) = self.records.iter().position(|b| b.id == outcome.id()) {
            self.record_index = idx;
        }
        Ok(())
    }

    pub(crate) fn clear_form(&mut self) {
        self.form = Form::new();
        self.form_field = FormField::Name;
    }

    /// Copy the highlighted record into the form.
    pub(crate) fn edit_selected(&mut self) {
        if let Some(b) = self.records.get(self.record_index).cloned() {
            self.form.fill_from(&b);
            self.focus = Focus::Form;
            self.form_field = FormField::Address;
            self.set_status(format!("Editing {}", b.name));
        }
    }

    /// Run an export and report the result. Only storage failures escape.
    pub(crate) fn export(&mut self, db: &Database, scope: &ExportScope, path: &Path) -> Result<()> {
        match export::export(db, scope, path, Local::now().naive_local()) {
            Ok(summary) => self.set_status(summary.to_string()),
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(Error::NothingToExport) => self.set_status("No data to export"),
            Err(e) => {
                log::warn!("export to {} failed: {e}", path.display());
                self.set_status(format!("Export failed: {e}"));
            }
        }
        Ok(())
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod app_tests;
