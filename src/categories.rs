use rusqlite::{Connection, OptionalExtension};

use crate::error::{Result, TallyError};
use crate::models::{Category, TxnType};

pub const DEFAULT_INCOME_CATEGORIES: &[&str] = &[
    "Salary",
    "Business",
    "Interest",
    "Investment",
    "Gift",
    "Rental Income",
    "Bonus",
    "Refund",
    "Other Income",
];

pub const DEFAULT_EXPENSE_CATEGORIES: &[&str] = &[
    "Food & Dining",
    "Groceries",
    "Transport",
    "Fuel",
    "Rent",
    "Utilities",
    "Shopping",
    "Health",
    "Insurance",
    "Education",
    "Entertainment",
    "Travel",
    "Housing",
    "Taxes",
    "Loan",
    "Subscriptions",
    "Gifts",
    "Personal Care",
    "Repairs",
    "Other Expense",
];

pub fn seeded_categories(kind: TxnType) -> &'static [&'static str] {
    match kind {
        TxnType::Income => DEFAULT_INCOME_CATEGORIES,
        TxnType::Expense => DEFAULT_EXPENSE_CATEGORIES,
    }
}

/// Known category names per transaction type.
pub trait CategoryStore {
    fn contains(&self, kind: TxnType, name: &str) -> Result<bool>;
    fn add(&mut self, kind: TxnType, name: &str) -> Result<()>;
}

/// Category substituted when a row has no category cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDefaults {
    pub income: String,
    pub expense: String,
}

impl CategoryDefaults {
    /// First category of each list, or the type's fallback name when a list is empty.
    pub fn from_lists(income: &[String], expense: &[String]) -> Self {
        Self {
            income: income
                .first()
                .cloned()
                .unwrap_or_else(|| TxnType::Income.fallback_category().to_string()),
            expense: expense
                .first()
                .cloned()
                .unwrap_or_else(|| TxnType::Expense.fallback_category().to_string()),
        }
    }

    pub fn for_type(&self, kind: TxnType) -> &str {
        match kind {
            TxnType::Income => &self.income,
            TxnType::Expense => &self.expense,
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryCategoryStore {
    income: Vec<String>,
    expense: Vec<String>,
}

#[cfg(test)]
impl MemoryCategoryStore {
    pub fn new(income: &[&str], expense: &[&str]) -> Self {
        Self {
            income: income.iter().map(|s| s.to_string()).collect(),
            expense: expense.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_INCOME_CATEGORIES, DEFAULT_EXPENSE_CATEGORIES)
    }

    pub fn names(&self, kind: TxnType) -> &[String] {
        match kind {
            TxnType::Income => &self.income,
            TxnType::Expense => &self.expense,
        }
    }

    pub fn defaults(&self) -> CategoryDefaults {
        CategoryDefaults::from_lists(&self.income, &self.expense)
    }
}

#[cfg(test)]
impl CategoryStore for MemoryCategoryStore {
    fn contains(&self, kind: TxnType, name: &str) -> Result<bool> {
        Ok(self.names(kind).iter().any(|n| n == name))
    }

    fn add(&mut self, kind: TxnType, name: &str) -> Result<()> {
        if !self.contains(kind, name)? {
            match kind {
                TxnType::Income => self.income.push(name.to_string()),
                TxnType::Expense => self.expense.push(name.to_string()),
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SQLite-backed store
// ---------------------------------------------------------------------------

pub struct SqliteCategories<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteCategories<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl CategoryStore for SqliteCategories<'_> {
    fn contains(&self, kind: TxnType, name: &str) -> Result<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE name = ?1 AND category_type = ?2)",
            rusqlite::params![name, kind],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn add(&mut self, kind: TxnType, name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO categories (name, category_type) VALUES (?1, ?2)",
            rusqlite::params![name, kind],
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Data-layer functions for category management
// ---------------------------------------------------------------------------

pub fn list_categories(conn: &Connection, kind: TxnType) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT name, category_type, is_default FROM categories \
         WHERE category_type = ?1 ORDER BY id ASC",
    )?;
    let categories = stmt
        .query_map([kind], |row| {
            Ok(Category {
                name: row.get(0)?,
                kind: row.get(1)?,
                is_default: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(categories)
}

pub fn category_defaults(conn: &Connection) -> Result<CategoryDefaults> {
    let names = |kind| -> Result<Vec<String>> {
        Ok(list_categories(conn, kind)?.into_iter().map(|c| c.name).collect())
    };
    Ok(CategoryDefaults::from_lists(
        &names(TxnType::Income)?,
        &names(TxnType::Expense)?,
    ))
}

pub fn add_category(conn: &Connection, kind: TxnType, name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TallyError::Other("Name is required".into()));
    }
    let mut store = SqliteCategories::new(conn);
    if store.contains(kind, name)? {
        return Err(TallyError::CategoryExists(name.to_string()));
    }
    store.add(kind, name)
}

/// Number of transactions filed under a category name.
pub fn usage_count(conn: &Connection, name: &str) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM transactions WHERE category = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn delete_category(conn: &Connection, kind: TxnType, name: &str) -> Result<()> {
    let row: Option<bool> = conn
        .query_row(
            "SELECT is_default FROM categories WHERE name = ?1 AND category_type = ?2",
            rusqlite::params![name, kind],
            |row| row.get(0),
        )
        .optional()?;
    match row {
        None => Err(TallyError::UnknownCategory {
            kind,
            name: name.to_string(),
        }),
        Some(true) => Err(TallyError::CategoryProtected(name.to_string())),
        Some(false) => {
            let count = usage_count(conn, name)?;
            if count > 0 {
                return Err(TallyError::CategoryInUse {
                    name: name.to_string(),
                    count,
                });
            }
            conn.execute(
                "DELETE FROM categories WHERE name = ?1 AND category_type = ?2",
                rusqlite::params![name, kind],
            )?;
            Ok(())
        }
    }
}
