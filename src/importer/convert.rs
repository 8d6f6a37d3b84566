use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;

use crate::categories::{CategoryDefaults, CategoryStore};
use crate::error::{Result, TallyError};
use crate::importer::mapping::{Field, ResolvedMapping};
use crate::importer::tokenizer::ParsedTable;
use crate::models::{Transaction, TxnType};

lazy_static! {
    static ref ISO_DATE: Regex = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap();
    static ref ISO_SLASH_DATE: Regex = Regex::new(r"^(\d{4})/(\d{2})/(\d{2})$").unwrap();
    static ref DAY_FIRST_DATE: Regex = Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{4})$").unwrap();
    static ref NON_NUMERIC: Regex = Regex::new(r"[^0-9.\-]+").unwrap();
    static ref LEADING_NUMBER: Regex = Regex::new(r"^-?(\d+\.?\d*|\.\d+)").unwrap();
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%a, %d %b %Y",
    "%a %b %d %Y",
];

// ---------------------------------------------------------------------------
// Field normalization
// ---------------------------------------------------------------------------

fn ymd(year: &str, month: &str, day: &str) -> Option<String> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
        .map(|d| d.format("%Y-%m-%d").to_string())
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Normalize a date cell to `YYYY-MM-DD`.
///
/// Numeric `D/M/YYYY` and `D-M-YYYY` dates are always read day-first, even when
/// both leading groups are 12 or less. Dates already in `YYYY-MM-DD` shape are
/// still checked against the calendar, so `2023-02-30` is rejected rather than
/// passed through.
pub fn normalize_date(raw: &str) -> Option<String> {
    let s = raw.trim();
    if let Some(c) = ISO_DATE.captures(s).or_else(|| ISO_SLASH_DATE.captures(s)) {
        return ymd(&c[1], &c[2], &c[3]);
    }
    if let Some(c) = DAY_FIRST_DATE.captures(s) {
        return ymd(&c[3], &c[2], &c[1]);
    }
    parse_date_text(s).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Strip everything but digits, `.` and `-`, then read the leading number.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = NON_NUMERIC.replace_all(raw, "");
    LEADING_NUMBER
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Anything that does not look like income is an expense.
pub fn resolve_type(raw: &str) -> TxnType {
    let lower = raw.trim().to_lowercase();
    if lower.contains("inc") || lower == "in" {
        TxnType::Income
    } else {
        TxnType::Expense
    }
}

// ---------------------------------------------------------------------------
// Row conversion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryAddition {
    pub kind: TxnType,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct ImportBatch {
    pub accepted: Vec<Transaction>,
    pub category_additions: Vec<CategoryAddition>,
    pub total_rows: usize,
}

impl ImportBatch {
    pub fn skipped(&self) -> usize {
        self.total_rows - self.accepted.len()
    }

    /// Earliest and latest accepted dates.
    pub fn date_range(&self) -> Option<(&str, &str)> {
        let min = self.accepted.iter().map(|t| t.date.as_str()).min()?;
        let max = self.accepted.iter().map(|t| t.date.as_str()).max()?;
        Some((min, max))
    }
}

#[derive(Debug)]
enum Skip {
    Missing(Field),
    BadDate(String),
    BadAmount(String),
    NotPositive(f64),
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(field) => write!(f, "empty {field}"),
            Self::BadDate(s) => write!(f, "unparseable date {s:?}"),
            Self::BadAmount(s) => write!(f, "unparseable amount {s:?}"),
            Self::NotPositive(v) => write!(f, "amount {v} is not positive"),
        }
    }
}

struct Candidate {
    kind: TxnType,
    date: String,
    amount: f64,
    category: String,
    note: String,
}

fn read_row(row: &[String], mapping: &ResolvedMapping) -> std::result::Result<Candidate, Skip> {
    let cell = |col: usize| ParsedTable::cell(row, col).trim();
    let optional = |col: Option<usize>| col.map(cell).unwrap_or("").to_string();

    let date_raw = cell(mapping.date);
    let amount_raw = cell(mapping.amount);
    let type_raw = cell(mapping.kind);
    for (field, value) in [
        (Field::Date, date_raw),
        (Field::Amount, amount_raw),
        (Field::Type, type_raw),
    ] {
        if value.is_empty() {
            return Err(Skip::Missing(field));
        }
    }

    let date = normalize_date(date_raw).ok_or_else(|| Skip::BadDate(date_raw.to_string()))?;
    let amount = parse_amount(amount_raw).ok_or_else(|| Skip::BadAmount(amount_raw.to_string()))?;
    if amount <= 0.0 {
        return Err(Skip::NotPositive(amount));
    }

    Ok(Candidate {
        kind: resolve_type(type_raw),
        date,
        amount,
        category: optional(mapping.category),
        note: optional(mapping.note),
    })
}

/// Convert every data row of `table` into a transaction candidate.
///
/// Malformed rows are skipped and only show up in the skipped count. Category
/// names not yet known for their type are reported once each in
/// `category_additions`; nothing is written to `categories`.
pub fn convert(
    table: &ParsedTable,
    mapping: &ResolvedMapping,
    defaults: &CategoryDefaults,
    categories: &dyn CategoryStore,
) -> Result<ImportBatch> {
    let mut batch = ImportBatch {
        total_rows: table.rows.len(),
        ..Default::default()
    };
    let mut seen: HashSet<CategoryAddition> = HashSet::new();

    for (idx, row) in table.rows.iter().enumerate() {
        let candidate = match read_row(row, mapping) {
            Ok(c) => c,
            Err(skip) => {
                // +2: 1-based, after the header line
                debug!("Skipping row {}: {skip}", idx + 2);
                continue;
            }
        };

        let category = if candidate.category.is_empty() {
            defaults.for_type(candidate.kind).to_string()
        } else {
            let addition = CategoryAddition {
                kind: candidate.kind,
                name: candidate.category.clone(),
            };
            if !seen.contains(&addition) && !categories.contains(addition.kind, &addition.name)? {
                seen.insert(addition.clone());
                batch.category_additions.push(addition);
            }
            candidate.category
        };

        batch.accepted.push(Transaction::new(
            candidate.kind,
            category,
            candidate.date,
            candidate.amount,
            candidate.note,
        ));
    }

    if batch.accepted.is_empty() {
        return Err(TallyError::NoValidRows);
    }
    info!(
        "Converted {} of {} rows ({} new categories)",
        batch.accepted.len(),
        batch.total_rows,
        batch.category_additions.len()
    );
    Ok(batch)
}
