use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Result, TallyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Type,
    Category,
    Amount,
    Note,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Date,
        Field::Type,
        Field::Category,
        Field::Amount,
        Field::Note,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Type => "type",
            Self::Category => "category",
            Self::Amount => "amount",
            Self::Note => "note",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Self::Date | Self::Type | Self::Amount)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

lazy_static! {
    // Evaluated in header order; the first header matching a field's pattern wins.
    static ref FIELD_PATTERNS: Vec<(Field, Regex)> = vec![
        (Field::Date, Regex::new(r"(?i)date|day|transaction_date|txn_date").unwrap()),
        (Field::Type, Regex::new(r"(?i)type|kind|txn_type").unwrap()),
        (Field::Category, Regex::new(r"(?i)category|cat|expense_category").unwrap()),
        (Field::Amount, Regex::new(r"(?i)amount|amt|value|transaction_amount").unwrap()),
        (Field::Note, Regex::new(r"(?i)note|description|memo").unwrap()),
    ];
}

/// Semantic field → source column index. Unset fields are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldMapping {
    pub date: Option<usize>,
    pub kind: Option<usize>,
    pub category: Option<usize>,
    pub amount: Option<usize>,
    pub note: Option<usize>,
}

impl FieldMapping {
    pub fn get(&self, field: Field) -> Option<usize> {
        match field {
            Field::Date => self.date,
            Field::Type => self.kind,
            Field::Category => self.category,
            Field::Amount => self.amount,
            Field::Note => self.note,
        }
    }

    pub fn set(&mut self, field: Field, column: Option<usize>) {
        let slot = match field {
            Field::Date => &mut self.date,
            Field::Type => &mut self.kind,
            Field::Category => &mut self.category,
            Field::Amount => &mut self.amount,
            Field::Note => &mut self.note,
        };
        *slot = column;
    }

    /// Gate before conversion: `date`, `type` and `amount` must be mapped.
    pub fn validate(&self) -> Result<ResolvedMapping> {
        let missing: Vec<Field> = Field::ALL
            .into_iter()
            .filter(|f| f.is_required() && self.get(*f).is_none())
            .collect();
        match (self.date, self.kind, self.amount) {
            (Some(date), Some(kind), Some(amount)) => Ok(ResolvedMapping {
                date,
                kind,
                amount,
                category: self.category,
                note: self.note,
            }),
            _ => Err(TallyError::MappingIncomplete { missing }),
        }
    }
}

/// A mapping that has passed [`FieldMapping::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMapping {
    pub date: usize,
    pub kind: usize,
    pub amount: usize,
    pub category: Option<usize>,
    pub note: Option<usize>,
}

/// Best-effort mapping from header names, for the operator to confirm.
pub fn suggest_mapping(headers: &[String]) -> FieldMapping {
    let mut mapping = FieldMapping::default();
    for (field, pattern) in FIELD_PATTERNS.iter() {
        let column = headers.iter().position(|h| pattern.is_match(h));
        mapping.set(*field, column);
    }
    mapping
}

/// Resolve an operator-supplied column reference: a header name
/// (case-insensitive) or a 0-based column index.
pub fn resolve_column(headers: &[String], column: &str) -> Result<usize> {
    let column = column.trim();
    if let Some(idx) = headers.iter().position(|h| h.eq_ignore_ascii_case(column)) {
        return Ok(idx);
    }
    match column.parse::<usize>() {
        Ok(idx) if idx < headers.len() => Ok(idx),
        _ => Err(TallyError::UnknownColumn(column.to_string())),
    }
}
