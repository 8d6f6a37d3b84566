use thiserror::Error;

use crate::importer::Field;
use crate::models::TxnType;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Prompt failed: {0} (stdin is not a terminal? pass --yes)")]
    Prompt(#[from] dialoguer::Error),

    #[error("No rows found in CSV input")]
    EmptyInput,

    #[error("Please map the required fields: {}", join_fields(.missing))]
    MappingIncomplete { missing: Vec<Field> },

    #[error("No valid rows found to import. Check mapping and CSV content.")]
    NoValidRows,

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Category already exists: {0}")]
    CategoryExists(String),

    #[error("Default categories cannot be deleted: {0}")]
    CategoryProtected(String),

    #[error("Category is used by {count} transaction(s): {name}")]
    CategoryInUse { name: String, count: i64 },

    #[error("Unknown {kind} category: {name}")]
    UnknownCategory { kind: TxnType, name: String },

    #[error("Invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid type: {0} (must be 'income' or 'expense')")]
    InvalidType(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.key())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, TallyError>;
