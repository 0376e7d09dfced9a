use anyhow::{bail, Result};
use log::LevelFilter;
use std::path::PathBuf;

pub(crate) const DEFAULT_DB_FILE: &str = "beneficiaries.db";
pub(crate) const DEFAULT_LOG_FILE: &str = "beneficiaries.log";

/// Global flags plus whatever is left for the command.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Settings {
    pub(crate) db_path: PathBuf,
    pub(crate) log_path: PathBuf,
    pub(crate) log_level: LevelFilter,
    pub(crate) command: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            log_path: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: LevelFilter::Info,
            command: Vec::new(),
        }
    }
}

impl Settings {
    /// Parse `args` without the program name. `--db`, `--log` and
    /// `--log-level` may appear anywhere; everything else is the command.
    pub(crate) fn from_args(args: &[String]) -> Result<Self> {
        let mut settings = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--db" | "--log" | "--log-level" => {
                    let Some(value) = iter.next() else {
                        bail!("{arg} needs a value");
                    };
                    match arg.as_str() {
                        "--db" => settings.db_path = PathBuf::from(shellexpand(value)),
                        "--log" => settings.log_path = PathBuf::from(shellexpand(value)),
                        _ => {
                            settings.log_level = crate::logging::parse_level(value)
                                .ok_or_else(|| anyhow::anyhow!("Unknown log level: {value}"))?;
                        }
                    }
                }
                _ => settings.command.push(arg.clone()),
            }
        }
        Ok(settings)
    }
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = directories::UserDirs::new()
            .map(|d| d.home_dir().display().to_string())
            .unwrap_or_else(|| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

/// Directory for exports when the user gives no path.
pub(crate) fn default_export_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
