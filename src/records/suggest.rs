use crate::db::Database;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SuggestionField {
    Name,
    SupportType,
    Address,
}

/// Autocomplete candidates, recomputed from the store on every load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Suggestions {
    pub(crate) names: Vec<String>,
    pub(crate) support_types: Vec<String>,
    pub(crate) addresses: Vec<String>,
}

impl Suggestions {
    pub(crate) fn load(db: &Database) -> Result<Self> {
        Ok(Self {
            names: db.distinct_names()?,
            support_types: db.distinct_support_types()?,
            addresses: db.distinct_addresses()?,
        })
    }

    pub(crate) fn values(&self, field: SuggestionField) -> &[String] {
        match field {
            SuggestionField::Name => &self.names,
            SuggestionField::SupportType => &self.support_types,
            SuggestionField::Address => &self.addresses,
        }
    }

    /// Candidates containing `typed`, ignoring case. Empty input matches nothing.
    pub(crate) fn matching(&self, field: SuggestionField, typed: &str) -> Vec<&str> {
        let needle = typed.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.values(field)
            .iter()
            .filter(|v| v.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    /// First candidate that would change what was typed.
    pub(crate) fn completion(&self, field: SuggestionField, typed: &str) -> Option<&str> {
        self.matching(field, typed)
            .into_iter()
            .find(|candidate| *candidate != typed.trim())
    }
}
