use comfy_table::{Cell, Table};

use crate::categories::{add_category, delete_category, list_categories, usage_count};
use crate::cli::open_ledger;
use crate::error::Result;
use crate::models::TxnType;

pub fn list() -> Result<()> {
    let conn = open_ledger()?;
    let mut table = Table::new();
    table.set_header(vec!["Name", "Type", "Status"]);
    for kind in TxnType::ALL {
        for cat in list_categories(&conn, kind)? {
            let status = if cat.is_default {
                "default".to_string()
            } else {
                match usage_count(&conn, &cat.name)? {
                    0 => String::new(),
                    n => format!("in use ({n})"),
                }
            };
            table.add_row(vec![
                Cell::new(&cat.name),
                Cell::new(cat.kind),
                Cell::new(status),
            ]);
        }
    }
    println!("Categories\n{table}");
    Ok(())
}

pub fn add(name: &str, kind: &str) -> Result<()> {
    let kind: TxnType = kind.parse()?;
    let conn = open_ledger()?;
    add_category(&conn, kind, name)?;
    println!("Added {kind} category: {}", name.trim());
    Ok(())
}

pub fn delete(name: &str, kind: &str) -> Result<()> {
    let kind: TxnType = kind.parse()?;
    let conn = open_ledger()?;
    delete_category(&conn, kind, name)?;
    println!("Deleted {kind} category: {name}");
    Ok(())
}
