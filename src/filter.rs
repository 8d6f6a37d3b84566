use chrono::NaiveDate;

use crate::error::{Result, TallyError};
use crate::models::{Transaction, TxnType};

/// Optional constraints applied to the transaction list; unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub kind: Option<TxnType>,
    pub category: Option<String>,
    pub search: Option<String>,
}

pub fn parse_date_arg(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| TallyError::InvalidDate(raw.to_string()))
}

impl TransactionFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        if self.from.is_some() || self.to.is_some() {
            let Ok(date) = NaiveDate::parse_from_str(&txn.date, "%Y-%m-%d") else {
                return false;
            };
            if self.from.is_some_and(|from| date < from) {
                return false;
            }
            if self.to.is_some_and(|to| date > to) {
                return false;
            }
        }
        if self.kind.is_some_and(|kind| txn.kind != kind) {
            return false;
        }
        if let Some(category) = &self.category {
            if &txn.category != category {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.trim().to_lowercase();
            // note and amount are searched together, as "<note> <amount>"
            let haystack = format!("{} {}", txn.note, txn.amount).to_lowercase();
            if !needle.is_empty() && !haystack.contains(&needle) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, txns: &'a [Transaction]) -> Vec<&'a Transaction> {
        txns.iter().filter(|t| self.matches(t)).collect()
    }
}
