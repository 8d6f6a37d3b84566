use std::path::Path;

use log::info;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Connection;

use crate::categories::{seeded_categories, CategoryStore, SqliteCategories};
use crate::error::Result;
use crate::importer::ImportBatch;
use crate::models::{Transaction, TxnType};

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    category_type TEXT NOT NULL,
    is_default INTEGER DEFAULT 0,
    created_at TEXT DEFAULT (datetime('now')),
    UNIQUE (name, category_type)
);

CREATE TABLE IF NOT EXISTS imports (
    id INTEGER PRIMARY KEY,
    filename TEXT NOT NULL,
    import_date TEXT DEFAULT (datetime('now')),
    record_count INTEGER,
    date_range_start TEXT,
    date_range_end TEXT
);

CREATE TABLE IF NOT EXISTS transactions (
    seq INTEGER PRIMARY KEY,
    id TEXT NOT NULL UNIQUE,
    txn_type TEXT NOT NULL,
    category TEXT NOT NULL,
    date TEXT NOT NULL,
    amount REAL NOT NULL,
    note TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    import_id INTEGER,
    FOREIGN KEY (import_id) REFERENCES imports(id)
);
";

impl ToSql for TxnType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TxnType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    let count: i64 = conn.query_row("SELECT count(*) FROM categories", [], |row| row.get(0))?;
    if count == 0 {
        for kind in TxnType::ALL {
            for name in seeded_categories(kind) {
                conn.execute(
                    "INSERT INTO categories (name, category_type, is_default) VALUES (?1, ?2, 1)",
                    rusqlite::params![name, kind],
                )?;
            }
        }
        info!("Seeded default categories");
    }
    Ok(())
}

pub fn list_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, txn_type, category, amount, note, created_at \
         FROM transactions ORDER BY seq ASC",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Transaction {
                id: row.get(0)?,
                date: row.get(1)?,
                kind: row.get(2)?,
                category: row.get(3)?,
                amount: row.get(4)?,
                note: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Write a converted batch in one SQLite transaction: new categories, the
/// transactions themselves and an `imports` record. Returns the import id.
pub fn commit_batch(conn: &mut Connection, batch: &ImportBatch, filename: &str) -> Result<i64> {
    let tx = conn.transaction()?;
    {
        let mut categories = SqliteCategories::new(&tx);
        for addition in &batch.category_additions {
            categories.add(addition.kind, &addition.name)?;
        }
    }

    let (start, end) = batch.date_range().unzip();
    tx.execute(
        "INSERT INTO imports (filename, record_count, date_range_start, date_range_end) \
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![filename, batch.accepted.len() as i64, start, end],
    )?;
    let import_id = tx.last_insert_rowid();

    {
        let mut stmt = tx.prepare(
            "INSERT INTO transactions (id, txn_type, category, date, amount, note, created_at, import_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for txn in &batch.accepted {
            stmt.execute(rusqlite::params![
                txn.id,
                txn.kind,
                txn.category,
                txn.date,
                txn.amount,
                txn.note,
                txn.created_at,
                import_id,
            ])?;
        }
    }
    tx.commit()?;

    info!(
        "Committed import {import_id} from {filename}: {} transactions, {} new categories",
        batch.accepted.len(),
        batch.category_additions.len()
    );
    Ok(import_id)
}
