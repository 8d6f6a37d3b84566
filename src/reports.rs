use std::collections::HashMap;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::error::TallyError;
use crate::models::{Transaction, TxnType};

// ---------------------------------------------------------------------------
// Range filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Range {
    All,
    Month,
    Year,
}

impl FromStr for Range {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(TallyError::Other(format!(
                "Invalid range: {s} (must be 'all', 'month' or 'year')"
            ))),
        }
    }
}

impl Range {
    pub fn contains(&self, date: &str, today: NaiveDate) -> bool {
        let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
            return matches!(self, Self::All);
        };
        match self {
            Self::All => true,
            Self::Month => d.year() == today.year() && d.month() == today.month(),
            Self::Year => d.year() == today.year(),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

pub struct CategoryTotal {
    pub name: String,
    pub total: f64,
}

pub struct MonthTotals {
    /// `YYYY-MM`
    pub key: String,
    /// `Jan 2023`
    pub label: String,
    pub income: f64,
    pub expense: f64,
}

pub struct Summary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub income_count: usize,
    pub expense_count: usize,
    pub by_category: Vec<CategoryTotal>,
    pub monthly: Vec<MonthTotals>,
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// First days of the twelve months ending with `today`'s month, oldest first.
fn last_twelve_months(today: NaiveDate) -> Vec<NaiveDate> {
    let current = today.year() * 12 + today.month0() as i32;
    (0..12)
        .rev()
        .filter_map(|back| {
            let m = current - back;
            NaiveDate::from_ymd_opt(m.div_euclid(12), m.rem_euclid(12) as u32 + 1, 1)
        })
        .collect()
}

pub fn summarize(txns: &[&Transaction], today: NaiveDate) -> Summary {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    let mut income_count = 0;
    let mut expense_count = 0;
    for t in txns {
        match t.kind {
            TxnType::Income => {
                total_income += t.amount;
                income_count += 1;
            }
            TxnType::Expense => {
                total_expense += t.amount;
                expense_count += 1;
            }
        }
    }

    // income and expense share one breakdown, in first-seen order
    let mut by_category: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for t in txns {
        let name = if t.category.is_empty() { "Uncategorized" } else { t.category.as_str() };
        let slot = *index.entry(name).or_insert_with(|| {
            by_category.push(CategoryTotal {
                name: name.to_string(),
                total: 0.0,
            });
            by_category.len() - 1
        });
        by_category[slot].total += t.amount;
    }
    for c in &mut by_category {
        c.total = round_cents(c.total);
    }

    let mut monthly: Vec<MonthTotals> = last_twelve_months(today)
        .into_iter()
        .map(|d| MonthTotals {
            key: d.format("%Y-%m").to_string(),
            label: d.format("%b %Y").to_string(),
            income: 0.0,
            expense: 0.0,
        })
        .collect();
    for t in txns {
        let Some(key) = t.date.get(..7) else { continue };
        if let Some(bucket) = monthly.iter_mut().find(|m| m.key == key) {
            match t.kind {
                TxnType::Income => bucket.income += t.amount,
                TxnType::Expense => bucket.expense += t.amount,
            }
        }
    }
    for m in &mut monthly {
        m.income = round_cents(m.income);
        m.expense = round_cents(m.expense);
    }

    Summary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        income_count,
        expense_count,
        by_category,
        monthly,
    }
}
