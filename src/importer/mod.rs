//! CSV import pipeline: tokenize → map columns → convert rows.
//!
//! Everything here is pure; reading the file and committing the resulting
//! [`ImportBatch`] is left to the caller.

mod convert;
mod mapping;
mod tokenizer;

pub use convert::{convert, ImportBatch};
pub use mapping::{resolve_column, suggest_mapping, Field, FieldMapping, ResolvedMapping};
pub use tokenizer::ParsedTable;

use crate::error::{Result, TallyError};

/// Tokenize raw CSV text, failing with `EmptyInput` when it holds no rows.
pub fn read_table(text: &str) -> Result<ParsedTable> {
    tokenizer::parse(text).ok_or(TallyError::EmptyInput)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::MemoryCategoryStore;

    #[test]
    fn test_read_table_empty_input() {
        assert!(matches!(read_table("  \n\r\n"), Err(TallyError::EmptyInput)));
    }

    #[test]
    fn test_pipeline_with_suggested_mapping() {
        let text = "\
Transaction Date,Description,Category,Type,Amount
15/01/2023,Coffee beans,Groceries,Expense,$12.40
16/01/2023,Refund from shop,,Income,$5.00
";
        let table = read_table(text).unwrap();
        let mapping = suggest_mapping(&table.headers).validate().unwrap();
        let store = MemoryCategoryStore::with_defaults();
        let batch = convert(&table, &mapping, &store.defaults(), &store).unwrap();
        assert_eq!(batch.accepted.len(), 2);
        assert_eq!(batch.accepted[0].date, "2023-01-15");
        assert_eq!(batch.accepted[0].note, "Coffee beans");
        assert_eq!(batch.accepted[0].amount, 12.4);
        assert_eq!(batch.accepted[1].category, "Salary");
    }

    #[test]
    fn test_pipeline_rejects_incomplete_mapping() {
        let table = read_table("When,How much\n2023-01-01,5\n").unwrap();
        assert!(matches!(
            suggest_mapping(&table.headers).validate(),
            Err(TallyError::MappingIncomplete { .. })
        ));
    }
}
