use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::cli::{open_ledger, FilterArgs};
use crate::db::list_transactions;
use crate::error::Result;
use crate::models::Transaction;
use crate::reports::{summarize, Range, Summary};
use crate::settings::load_settings;

fn amount_cell(v: f64) -> Cell {
    Cell::new(format!("{v:.2}")).set_alignment(CellAlignment::Right)
}

fn print_totals(range: Range, s: &Summary) {
    let label = match range {
        Range::All => "All time",
        Range::Month => "This month",
        Range::Year => "This year",
    };
    println!("{}", label.bold());
    println!(
        "  Income:   {} ({} transactions)",
        format!("{:.2}", s.total_income).green(),
        s.income_count
    );
    println!(
        "  Expenses: {} ({} transactions)",
        format!("{:.2}", s.total_expense).red(),
        s.expense_count
    );
    let balance = format!("{:.2}", s.balance);
    let balance = if s.balance < 0.0 { balance.red() } else { balance.green() };
    println!("  Balance:  {}", balance.bold());
}

pub fn run(args: &FilterArgs, range: Option<String>) -> Result<()> {
    let filter = args.to_filter()?;
    let range: Range = match range {
        Some(r) => r.parse()?,
        None => load_settings().summary_range.parse()?,
    };
    let today = chrono::Local::now().date_naive();

    let conn = open_ledger()?;
    let all = list_transactions(&conn)?;
    let txns: Vec<&Transaction> = filter
        .apply(&all)
        .into_iter()
        .filter(|t| range.contains(&t.date, today))
        .collect();
    let s = summarize(&txns, today);

    print_totals(range, &s);

    if !s.by_category.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Category", "Total"]);
        for c in &s.by_category {
            table.add_row(vec![Cell::new(&c.name), amount_cell(c.total)]);
        }
        println!("\nBy category\n{table}");
    }

    let mut table = Table::new();
    table.set_header(vec!["Month", "Income", "Expenses"]);
    for m in &s.monthly {
        table.add_row(vec![Cell::new(&m.label), amount_cell(m.income), amount_cell(m.expense)]);
    }
    println!("\nLast 12 months\n{table}");
    Ok(())
}
