pub mod categories;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod summary;

use clap::{Args, Parser, Subcommand};
use rusqlite::Connection;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::filter::{parse_date_arg, TransactionFilter};
use crate::models::TxnType;
use crate::settings::db_path;

/// Open the configured database, creating the schema if needed.
pub(crate) fn open_ledger() -> Result<Connection> {
    let conn = get_connection(&db_path())?;
    init_db(&conn)?;
    Ok(conn)
}

#[derive(Parser)]
#[command(name = "tally", about = "Track income and expenses; import them from CSV.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the database.
    Init {
        /// Path for tally data (default: ~/Documents/tally)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Import transactions from a CSV file.
    Import {
        /// Path to the CSV file
        file: String,
        #[command(flatten)]
        columns: ColumnArgs,
        /// Accept the column mapping and the import without prompting
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// List transactions, newest first.
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Export transactions to CSV.
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        /// Output path (default: <data_dir>/exports/transactions_YYYY-MM-DD.csv)
        #[arg(long)]
        output: Option<String>,
    },
    /// Totals, category breakdown and the last twelve months.
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
        /// all, month or year (default from settings)
        #[arg(long)]
        range: Option<String>,
    },
    /// Manage income and expense categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
}

/// Column overrides for the import mapping: a header name or 0-based index.
#[derive(Args, Debug, Default)]
pub struct ColumnArgs {
    /// Column holding the transaction date
    #[arg(long)]
    pub date: Option<String>,
    /// Column holding income/expense
    #[arg(long = "type")]
    pub kind: Option<String>,
    /// Column holding the amount
    #[arg(long)]
    pub amount: Option<String>,
    /// Column holding the category
    #[arg(long)]
    pub category: Option<String>,
    /// Column holding the note
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Start date: YYYY-MM-DD
    #[arg(long = "from")]
    pub from_date: Option<String>,
    /// End date: YYYY-MM-DD
    #[arg(long = "to")]
    pub to_date: Option<String>,
    /// income or expense
    #[arg(long = "type")]
    pub kind: Option<String>,
    /// Exact category name
    #[arg(long)]
    pub category: Option<String>,
    /// Search note and amount
    #[arg(long)]
    pub search: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> Result<TransactionFilter> {
        Ok(TransactionFilter {
            from: self.from_date.as_deref().map(parse_date_arg).transpose()?,
            to: self.to_date.as_deref().map(parse_date_arg).transpose()?,
            kind: self.kind.as_deref().map(|k| k.parse::<TxnType>()).transpose()?,
            category: self.category.clone(),
            search: self.search.clone(),
        })
    }
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// List categories by type.
    List,
    /// Add a category.
    Add {
        /// Category name
        name: String,
        /// income or expense
        #[arg(long = "type")]
        kind: String,
    },
    /// Delete a category that is neither a default nor in use.
    Delete {
        /// Category name
        name: String,
        /// income or expense
        #[arg(long = "type")]
        kind: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_import_overrides() {
        let cli = Cli::try_parse_from([
            "tally", "import", "bank.csv", "--date", "Posted", "--type", "2", "--yes",
        ])
        .unwrap();
        match cli.command {
            Commands::Import { file, columns, yes } => {
                assert_eq!(file, "bank.csv");
                assert_eq!(columns.date.as_deref(), Some("Posted"));
                assert_eq!(columns.kind.as_deref(), Some("2"));
                assert!(columns.amount.is_none());
                assert!(yes);
            }
            _ => panic!("expected import"),
        }
    }

    #[test]
    fn test_filter_args_to_filter() {
        let args = FilterArgs {
            from_date: Some("2023-01-01".to_string()),
            kind: Some("income".to_string()),
            ..Default::default()
        };
        let f = args.to_filter().unwrap();
        assert_eq!(f.kind, Some(TxnType::Income));
        assert!(f.from.is_some());
        assert!(f.to.is_none());
    }

    #[test]
    fn test_filter_args_reject_bad_values() {
        let bad_date = FilterArgs {
            to_date: Some("31/01/2023".to_string()),
            ..Default::default()
        };
        assert!(bad_date.to_filter().is_err());
        let bad_type = FilterArgs {
            kind: Some("transfer".to_string()),
            ..Default::default()
        };
        assert!(bad_type.to_filter().is_err());
    }

    #[test]
    fn test_cli_parses_summary_filters() {
        let cli = Cli::try_parse_from(["tally", "summary", "--type", "expense", "--range", "year"])
            .unwrap();
        match cli.command {
            Commands::Summary { filter, range } => {
                assert_eq!(filter.kind.as_deref(), Some("expense"));
                assert_eq!(range.as_deref(), Some("year"));
            }
            _ => panic!("expected summary"),
        }
    }
}
