//! SQLite implementation of [`BillStore`].
//!
//! [`SqliteStore`] persists saved bills and owner settings in a SQLite
//! database with WAL mode and automatic schema migrations. Line items are
//! stored as a JSON TEXT column via serde_json; ids and timestamps as TEXT.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use vbill_core::{BillId, LineItem, SavedBill};

use crate::error::StorageError;
use crate::traits::BillStore;
use crate::types::{enrollment_key, PersistedState};

const OWNER_LABEL_KEY: &str = "owner_label";

/// SQLite-backed implementation of [`BillStore`].
///
/// Multi-row writes are wrapped in a transaction.
pub struct SqliteStore {
    conn: Connection,
}

/// Raw column values of one `saved_bills` row.
struct BillRow {
    id: String,
    owner_label: String,
    total_amount: f64,
    created_at: String,
    items_json: String,
}

impl BillRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(BillRow {
            id: row.get(0)?,
            owner_label: row.get(1)?,
            total_amount: row.get(2)?,
            created_at: row.get(3)?,
            items_json: row.get(4)?,
        })
    }

    /// Decodes the row. Line totals are recomputed from the items and the
    /// bill total must agree with the `total_amount` column to the cent.
    fn into_bill(self) -> Result<SavedBill, StorageError> {
        let id: BillId = self.id.parse().map_err(|e| StorageError::IntegrityError {
            reason: format!("bad bill id '{}': {}", self.id, e),
        })?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| StorageError::IntegrityError {
                reason: format!("bad timestamp '{}' on bill {}: {}", self.created_at, id, e),
            })?
            .with_timezone(&Utc);
        let items: Vec<LineItem> = serde_json::from_str(&self.items_json)?;

        let bill = SavedBill {
            id,
            owner_label: self.owner_label,
            items,
            total_amount: 0.0,
            created_at,
        }
        .hydrated();

        if (bill.total_amount - self.total_amount).abs() >= 0.005 {
            return Err(StorageError::IntegrityError {
                reason: format!(
                    "bill {} stores total {} but its items sum to {}",
                    bill.id, self.total_amount, bill.total_amount
                ),
            });
        }
        Ok(bill)
    }
}

const SELECT_BILL: &str =
    "SELECT id, owner_label, total_amount, created_at, items_json FROM saved_bills";

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    /// Inserts `bill` with its totals re-derived, so the stored total always
    /// matches the stored items.
    fn insert_bill(conn: &Connection, bill: &SavedBill) -> Result<(), StorageError> {
        let bill = bill.clone().hydrated();
        if !bill.total_amount.is_finite() {
            return Err(StorageError::IntegrityError {
                reason: format!("bill {} has a non-finite total", bill.id),
            });
        }
        let items_json = serde_json::to_string(&bill.items)?;
        conn.execute(
            "INSERT INTO saved_bills (id, owner_label, total_amount, created_at, items_json) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                bill.id.to_string(),
                bill.owner_label,
                bill.total_amount,
                bill.created_at.to_rfc3339(),
                items_json,
            ],
        )?;
        Ok(())
    }

    fn bill_exists(&self, id: BillId) -> Result<bool, StorageError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM saved_bills WHERE id = ?1)",
            params![id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

impl BillStore for SqliteStore {
    fn owner_label(&self) -> Result<String, StorageError> {
        let label: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![OWNER_LABEL_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(label.unwrap_or_default())
    }

    fn set_owner_label(&mut self, label: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![OWNER_LABEL_KEY, label.trim()],
        )?;
        Ok(())
    }

    fn enrollment_flags(&self) -> Result<BTreeMap<String, bool>, StorageError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT owner, enrolled FROM enrollment")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?))
        })?;
        let mut flags = BTreeMap::new();
        for row in rows {
            let (owner, enrolled) = row?;
            flags.insert(owner, enrolled);
        }
        Ok(flags)
    }

    fn set_enrollment(&mut self, owner: &str, enrolled: bool) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO enrollment (owner, enrolled) VALUES (?1, ?2) ON CONFLICT(owner) DO UPDATE SET enrolled = excluded.enrolled",
            params![enrollment_key(owner), enrolled],
        )?;
        Ok(())
    }

    fn append_bill(&mut self, bill: &SavedBill) -> Result<(), StorageError> {
        if self.bill_exists(bill.id)? {
            return Err(StorageError::DuplicateBill(bill.id));
        }
        Self::insert_bill(&self.conn, bill)
    }

    fn get_bill(&self, id: BillId) -> Result<SavedBill, StorageError> {
        let row = self
            .conn
            .query_row(
                &format!("{SELECT_BILL} WHERE id = ?1"),
                params![id.to_string()],
                BillRow::from_row,
            )
            .optional()?
            .ok_or(StorageError::BillNotFound(id))?;
        row.into_bill()
    }

    fn delete_bill(&mut self, id: BillId) -> Result<(), StorageError> {
        let deleted = self.conn.execute(
            "DELETE FROM saved_bills WHERE id = ?1",
            params![id.to_string()],
        )?;
        if deleted == 0 {
            return Err(StorageError::BillNotFound(id));
        }
        Ok(())
    }

    fn list_bills(&self) -> Result<Vec<SavedBill>, StorageError> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{SELECT_BILL} ORDER BY seq DESC"))?;
        let rows = stmt.query_map([], BillRow::from_row)?;
        let mut bills = Vec::new();
        for row in rows {
            bills.push(row?.into_bill()?);
        }
        Ok(bills)
    }

    fn save_state(&mut self, state: &PersistedState) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM saved_bills", [])?;
        tx.execute("DELETE FROM enrollment", [])?;
        tx.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![OWNER_LABEL_KEY, state.owner_label.trim()],
        )?;

        // Oldest first so that `seq DESC` reads back most recent first.
        for bill in state.history.iter().rev() {
            Self::insert_bill(&tx, bill)?;
        }
        for (owner, enrolled) in &state.enrollment_flags {
            tx.execute(
                "INSERT INTO enrollment (owner, enrolled) VALUES (?1, ?2)",
                params![enrollment_key(owner), enrolled],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}
