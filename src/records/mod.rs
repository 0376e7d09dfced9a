mod suggest;

pub(crate) use suggest::{SuggestionField, Suggestions};

use crate::db::Database;
use crate::error::Result;
use crate::models::{Beneficiary, NewBeneficiary};

/// What to do when an upsert meets a record with the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    Overwrite,
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UpsertOutcome {
    Inserted(i64),
    Updated(i64),
    Kept(i64),
}

impl UpsertOutcome {
    pub(crate) fn id(&self) -> i64 {
        match *self {
            Self::Inserted(id) | Self::Updated(id) | Self::Kept(id) => id,
        }
    }
}

/// Insert `new`, or resolve against the existing record with the same name.
/// Lookup and write share one transaction.
pub(crate) fn upsert(
    db: &Database,
    new: &NewBeneficiary,
    resolution: Resolution,
) -> Result<UpsertOutcome> {
    let outcome = db.atomically(|db| match db.find_by_name_exact(&new.name)? {
        Some(existing) => match resolution {
            Resolution::Overwrite => {
                db.update(existing.id, new)?;
                Ok(UpsertOutcome::Updated(existing.id))
            }
            Resolution::Keep => Ok(UpsertOutcome::Kept(existing.id)),
        },
        None => db.insert(new).map(UpsertOutcome::Inserted),
    })?;

    match outcome {
        UpsertOutcome::Inserted(id) => log::info!("added beneficiary '{}' (id {id})", new.name),
        UpsertOutcome::Updated(id) => log::info!("updated beneficiary '{}' (id {id})", new.name),
        UpsertOutcome::Kept(id) => {
            log::info!("kept existing beneficiary '{}' (id {id})", new.name)
        }
    }
    Ok(outcome)
}

/// The record an upsert of `name` would collide with, if any.
pub(crate) fn find_conflict(db: &Database, name: &str) -> Result<Option<Beneficiary>> {
    db.find_by_name_exact(name.trim())
}

/// Records whose name contains `fragment`; an empty fragment returns all.
pub(crate) fn search(db: &Database, fragment: &str) -> Result<Vec<Beneficiary>> {
    log::debug!("search '{fragment}'");
    db.find_by_name_substring(fragment)
}

pub(crate) fn list_all(db: &Database) -> Result<Vec<Beneficiary>> {
    db.list_all()
}

#[cfg(test)]
mod tests;
