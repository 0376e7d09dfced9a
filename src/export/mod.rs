mod pdf;
mod spreadsheet;

use chrono::NaiveDateTime;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::Beneficiary;
use crate::records;

/// Which records an export covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ExportScope {
    All,
    NameContains(String),
}

impl ExportScope {
    fn select(&self, db: &Database) -> Result<Vec<Beneficiary>> {
        match self {
            Self::All => records::list_all(db),
            Self::NameContains(fragment) => records::search(db, fragment),
        }
    }
}

impl fmt::Display for ExportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all records"),
            Self::NameContains(fragment) => write!(f, "names containing '{fragment}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExportFormat {
    Pdf,
    Csv,
    Workbook,
}

impl ExportFormat {
    /// `.pdf` selects PDF and `.csv` selects CSV, in any case. Every other
    /// target gets an Excel workbook.
    pub(crate) fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Self::Pdf,
            "csv" => Self::Csv,
            _ => Self::Workbook,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => write!(f, "PDF"),
            Self::Csv => write!(f, "CSV"),
            Self::Workbook => write!(f, "Excel workbook"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExportSummary {
    pub(crate) format: ExportFormat,
    pub(crate) rows: usize,
    pub(crate) pages: Option<usize>,
    pub(crate) path: PathBuf,
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Exported {} records to {} ({})",
            self.rows,
            self.path.display(),
            self.format
        )?;
        if let Some(pages) = self.pages {
            write!(f, ", {pages} page(s)")?;
        }
        Ok(())
    }
}

/// Export the records selected by `scope` to `path`. An empty selection is
/// refused and leaves the file system untouched.
pub(crate) fn export(
    db: &Database,
    scope: &ExportScope,
    path: &Path,
    exported_at: NaiveDateTime,
) -> Result<ExportSummary> {
    let rows = scope.select(db)?;
    if rows.is_empty() {
        log::warn!("export of {scope} refused: no records");
        return Err(Error::NothingToExport);
    }

    let format = ExportFormat::from_path(path);
    let pages = match format {
        ExportFormat::Pdf => {
            let rendered = pdf::render(&rows, exported_at)?;
            std::fs::write(path, &rendered.bytes)?;
            Some(rendered.pages)
        }
        ExportFormat::Csv => {
            spreadsheet::write_csv(&rows, path)?;
            None
        }
        ExportFormat::Workbook => {
            spreadsheet::write_workbook(&rows, path)?;
            None
        }
    };

    log::info!(
        "exported {} records ({scope}) as {format} to {}",
        rows.len(),
        path.display()
    );
    Ok(ExportSummary {
        format,
        rows: rows.len(),
        pages,
        path: path.to_path_buf(),
    })
}

/// File name used when the user does not pick one.
pub(crate) fn default_file_name(now: NaiveDateTime) -> String {
    format!("beneficiaries-export-{}.pdf", now.format("%Y%m%d-%H%M"))
}
