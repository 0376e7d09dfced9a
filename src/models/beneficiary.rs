use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{Error, Result};

pub const YEAR_MIN: i32 = 1900;
pub const YEAR_MAX: i32 = 2999;

/// Largest accepted amount: 99,999,999.99
pub fn amount_max() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

/// A stored beneficiary row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beneficiary {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub support_type: Option<String>,
    pub amount: Option<Decimal>,
    pub year: i32,
}

impl Beneficiary {
    pub fn address_text(&self) -> &str {
        self.address.as_deref().unwrap_or("")
    }

    pub fn support_type_text(&self) -> &str {
        self.support_type.as_deref().unwrap_or("")
    }

    /// Amount with two decimals, or an empty string when absent.
    pub fn amount_text(&self) -> String {
        self.amount.map(format_amount).unwrap_or_default()
    }
}

/// Validated input for inserting or overwriting a beneficiary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBeneficiary {
    pub name: String,
    pub address: Option<String>,
    pub support_type: Option<String>,
    pub amount: Option<Decimal>,
    pub year: i32,
}

impl NewBeneficiary {
    /// Build from raw form text. Every field is trimmed; blank optional
    /// fields become `None`.
    pub fn parse(
        name: &str,
        address: &str,
        support_type: &str,
        amount: &str,
        year: &str,
    ) -> Result<Self> {
        let name = name.trim();
        let year = year.trim();
        if name.is_empty() || year.is_empty() {
            return Err(Error::validation("Name and year are required"));
        }

        Ok(Self {
            name: name.to_string(),
            address: optional_text(address),
            support_type: optional_text(support_type),
            amount: parse_amount(amount)?,
            year: parse_year(year)?,
        })
    }

    #[cfg(test)]
    pub fn into_beneficiary(self, id: i64) -> Beneficiary {
        Beneficiary {
            id,
            name: self.name,
            address: self.address,
            support_type: self.support_type,
            amount: self.amount,
            year: self.year,
        }
    }
}

fn optional_text(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse an optional amount. A lone comma is read as the decimal separator.
pub fn parse_amount(s: &str) -> Result<Option<Decimal>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let normalized = if trimmed.contains('.') {
        trimmed.to_string()
    } else {
        trimmed.replacen(',', ".", 1)
    };

    let value = Decimal::from_str(&normalized)
        .map_err(|_| Error::validation(format!("Invalid amount: '{trimmed}'")))?;

    if value < Decimal::ZERO {
        return Err(Error::validation("Amount cannot be negative"));
    }
    if value > amount_max() {
        return Err(Error::validation(format!(
            "Amount cannot exceed {}",
            format_amount(amount_max())
        )));
    }
    if value.normalize().scale() > 2 {
        return Err(Error::validation(
            "Amount cannot have more than 2 decimal places",
        ));
    }

    let mut value = value.normalize();
    value.rescale(2);
    Ok(Some(value))
}

pub fn parse_year(s: &str) -> Result<i32> {
    let trimmed = s.trim();
    let year: i32 = trimmed
        .parse()
        .map_err(|_| Error::validation(format!("Invalid year: '{trimmed}'")))?;
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(Error::validation(format!(
            "Year must be between {YEAR_MIN} and {YEAR_MAX}"
        )));
    }
    Ok(year)
}

/// Format an amount with exactly two decimal places, e.g. `100.5` -> `"100.50"`.
pub fn format_amount(val: Decimal) -> String {
    format!("{val:.2}")
}
