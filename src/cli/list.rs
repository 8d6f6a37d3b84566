use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::cli::{open_ledger, FilterArgs};
use crate::db::list_transactions;
use crate::error::Result;
use crate::models::{Transaction, TxnType};

/// Newest first; transactions sharing a date keep their stored order.
pub fn sort_newest_first(txns: &mut [&Transaction]) {
    txns.sort_by(|a, b| b.date.cmp(&a.date));
}

pub fn run(args: &FilterArgs) -> Result<()> {
    let filter = args.to_filter()?;
    let conn = open_ledger()?;
    let all = list_transactions(&conn)?;
    let mut txns = filter.apply(&all);

    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }
    sort_newest_first(&mut txns);

    let mut table = Table::new();
    table.set_header(vec!["Date", "Type", "Category", "Amount", "Note"]);
    for t in &txns {
        let kind = match t.kind {
            TxnType::Income => t.kind.as_str().green(),
            TxnType::Expense => t.kind.as_str().red(),
        };
        table.add_row(vec![
            Cell::new(&t.date),
            Cell::new(kind),
            Cell::new(&t.category),
            Cell::new(format!("{:.2}", t.amount)).set_alignment(CellAlignment::Right),
            Cell::new(&t.note),
        ]);
    }
    println!("Transactions ({})\n{table}", txns.len());
    Ok(())
}
