use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::Serialize;

use crate::error::TallyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnType {
    Income,
    Expense,
}

impl TxnType {
    pub const ALL: [TxnType; 2] = [TxnType::Income, TxnType::Expense];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Fallback category name when a type has no categories at all.
    pub fn fallback_category(&self) -> &'static str {
        match self {
            Self::Income => "Other Income",
            Self::Expense => "Other Expense",
        }
    }
}

impl fmt::Display for TxnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxnType {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(TallyError::InvalidType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: TxnType,
    pub category: String,
    pub amount: f64,
    pub note: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl Transaction {
    /// Builds a new record with a fresh id and creation stamp.
    pub fn new(kind: TxnType, category: String, date: String, amount: f64, note: String) -> Self {
        Self {
            id: generate_id(),
            date,
            kind,
            category,
            amount,
            note,
            created_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Category {
    pub name: String,
    pub kind: TxnType,
    pub is_default: bool,
}

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Millisecond timestamp in base 36 followed by six random base-36 characters.
pub fn generate_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}{suffix}", to_base36(millis))
}
