mod schema;

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::error::Result;
use crate::models::{format_amount, Beneficiary, NewBeneficiary};

const COLUMNS: &str = "id, name, address, support_type, amount, year";

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let mut db = Self { conn };
        db.migrate()?;
        log::debug!("opened store at {}", path.display());
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    /// Run `f` inside a single transaction. Commits when `f` succeeds and
    /// rolls back when it fails.
    pub(crate) fn atomically<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }

    // ── Beneficiaries ─────────────────────────────────────────

    pub(crate) fn insert(&self, new: &NewBeneficiary) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO beneficiaries (name, address, support_type, amount, year)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new.name,
                new.address,
                new.support_type,
                new.amount.map(format_amount),
                new.year,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Overwrite everything but `id` and `name`.
    pub(crate) fn update(&self, id: i64, new: &NewBeneficiary) -> Result<()> {
        self.conn.execute(
            "UPDATE beneficiaries SET address = ?1, support_type = ?2, amount = ?3, year = ?4
             WHERE id = ?5",
            params![
                new.address,
                new.support_type,
                new.amount.map(format_amount),
                new.year,
                id,
            ],
        )?;
        Ok(())
    }

    pub(crate) fn list_all(&self) -> Result<Vec<Beneficiary>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {COLUMNS} FROM beneficiaries ORDER BY id"))?;
        let rows = stmt.query_map([], row_to_beneficiary)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn find_by_name_exact(&self, name: &str) -> Result<Option<Beneficiary>> {
        let result = self.conn.query_row(
            &format!("SELECT {COLUMNS} FROM beneficiaries WHERE name = ?1 ORDER BY id LIMIT 1"),
            params![name],
            row_to_beneficiary,
        );
        match result {
            Ok(b) => Ok(Some(b)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Case-sensitive match anywhere in `name`. `instr` treats `%` and `_`
    /// literally, and an empty fragment matches every row.
    pub(crate) fn find_by_name_substring(&self, fragment: &str) -> Result<Vec<Beneficiary>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM beneficiaries WHERE instr(name, ?1) > 0 ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![fragment], row_to_beneficiary)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM beneficiaries", [], |row| row.get(0))?)
    }

    // ── Suggestions ───────────────────────────────────────────

    pub(crate) fn distinct_names(&self) -> Result<Vec<String>> {
        self.distinct_values("name")
    }

    pub(crate) fn distinct_support_types(&self) -> Result<Vec<String>> {
        self.distinct_values("support_type")
    }

    pub(crate) fn distinct_addresses(&self) -> Result<Vec<String>> {
        self.distinct_values("address")
    }

    /// `column` is always one of the fixed names above, never user input.
    fn distinct_values(&self, column: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT DISTINCT {column} FROM beneficiaries
             WHERE {column} IS NOT NULL AND {column} != ''
             ORDER BY {column}"
        ))?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<String>, _>>()?)
    }
}

fn row_to_beneficiary(row: &Row<'_>) -> rusqlite::Result<Beneficiary> {
    let amount = row
        .get::<_, Option<String>>(4)?
        .map(|s| {
            Decimal::from_str(&s)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))
        })
        .transpose()?;
    Ok(Beneficiary {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        support_type: row.get(3)?,
        amount,
        year: row.get(5)?,
    })
}
