use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

use crate::error::Result;
use crate::models::Beneficiary;

pub(crate) const HEADERS: [&str; 6] = ["ID", "Name", "Address", "SupportType", "Amount", "Year"];
pub(crate) const SHEET_NAME: &str = "Beneficiaries";

const COLUMN_WIDTHS: [f64; 6] = [6.0, 28.0, 36.0, 20.0, 14.0, 8.0];

/// Write `rows` as CSV: one header row, then every column of every record.
pub(crate) fn write_csv(rows: &[Beneficiary], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(HEADERS)?;
    for b in rows {
        wtr.write_record([
            b.id.to_string(),
            b.name.clone(),
            b.address_text().to_string(),
            b.support_type_text().to_string(),
            b.amount_text(),
            b.year.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `rows` to a single-sheet `.xlsx` workbook. Absent values stay blank.
pub(crate) fn write_workbook(rows: &[Beneficiary], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let money = Format::new().set_num_format("0.00");

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    for (col, (title, width)) in HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *title, &header)?;
        sheet.set_column_width(col, width)?;
    }

    for (i, b) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_number(row, 0, b.id as f64)?;
        sheet.write_string(row, 1, b.name.as_str())?;
        if let Some(address) = &b.address {
            sheet.write_string(row, 2, address.as_str())?;
        }
        if let Some(kind) = &b.support_type {
            sheet.write_string(row, 3, kind.as_str())?;
        }
        if let Some(amount) = b.amount.and_then(|a| a.to_f64()) {
            sheet.write_number_with_format(row, 4, amount, &money)?;
        }
        sheet.write_number(row, 5, b.year)?;
    }

    workbook.save(path)?;
    Ok(())
}
