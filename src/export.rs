use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::Transaction;

pub const EXPORT_HEADER: [&str; 7] = ["id", "date", "type", "category", "amount", "note", "createdAt"];

/// Write transactions as CSV with every field quoted. The header row is
/// always written, even for an empty list.
pub fn write_csv<W: Write>(writer: W, txns: &[&Transaction]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);
    wtr.write_record(EXPORT_HEADER)?;
    for txn in txns {
        wtr.serialize(txn)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_to_file(path: &Path, txns: &[&Transaction]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_csv(std::io::BufWriter::new(file), txns)
}

/// `<data_dir>/exports/transactions_YYYY-MM-DD.csv`
pub fn default_export_path(data_dir: &Path, today: chrono::NaiveDate) -> PathBuf {
    data_dir
        .join("exports")
        .join(format!("transactions_{}.csv", today.format("%Y-%m-%d")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::MemoryCategoryStore;
    use crate::importer::{convert, read_table, suggest_mapping};
    use crate::models::TxnType;

    fn export_string(txns: &[&Transaction]) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, txns).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_empty_export_has_header() {
        let out = export_string(&[]);
        assert_eq!(
            out.trim_end(),
            "\"id\",\"date\",\"type\",\"category\",\"amount\",\"note\",\"createdAt\""
        );
    }

    #[test]
    fn test_fields_are_quoted_in_header_order() {
        let mut txn = Transaction::new(
            TxnType::Expense,
            "Food & Dining".to_string(),
            "2023-01-15".to_string(),
            12.5,
            "lunch, with \"Sam\"".to_string(),
        );
        txn.id = "abc123".to_string();
        txn.created_at = "2023-01-15T12:00:00.000Z".to_string();
        let out = export_string(&[&txn]);
        let line = out.lines().nth(1).unwrap();
        assert_eq!(
            line,
            "\"abc123\",\"2023-01-15\",\"expense\",\"Food & Dining\",\"12.5\",\"lunch, with \"\"Sam\"\"\",\"2023-01-15T12:00:00.000Z\""
        );
    }

    #[test]
    fn test_export_reimports_cleanly() {
        let txn = Transaction::new(
            TxnType::Income,
            "Bonus".to_string(),
            "2023-06-30".to_string(),
            750.0,
            "Q2, team".to_string(),
        );
        let out = export_string(&[&txn]);

        let table = read_table(&out).unwrap();
        let mapping = suggest_mapping(&table.headers).validate().unwrap();
        let store = MemoryCategoryStore::with_defaults();
        let batch = convert(&table, &mapping, &store.defaults(), &store).unwrap();
        let back = &batch.accepted[0];
        assert_eq!(back.date, "2023-06-30");
        assert_eq!(back.kind, TxnType::Income);
        assert_eq!(back.category, "Bonus");
        assert_eq!(back.amount, 750.0);
        assert_eq!(back.note, "Q2, team");
    }

    #[test]
    fn test_default_export_path() {
        let today = chrono::NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
        let path = default_export_path(Path::new("/data"), today);
        assert_eq!(path, PathBuf::from("/data/exports/transactions_2023-04-01.csv"));
    }
}
