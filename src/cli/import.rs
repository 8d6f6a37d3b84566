use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};
use dialoguer::{Confirm, Select};

use crate::categories::{category_defaults, SqliteCategories};
use crate::cli::{open_ledger, ColumnArgs};
use crate::db::commit_batch;
use crate::error::{Result, TallyError};
use crate::importer::{
    convert, read_table, resolve_column, suggest_mapping, Field, FieldMapping, ParsedTable,
    ResolvedMapping,
};

const PREVIEW_ROWS: usize = 6;

fn override_for(columns: &ColumnArgs, field: Field) -> Option<&str> {
    match field {
        Field::Date => columns.date.as_deref(),
        Field::Type => columns.kind.as_deref(),
        Field::Category => columns.category.as_deref(),
        Field::Amount => columns.amount.as_deref(),
        Field::Note => columns.note.as_deref(),
    }
}

/// Start from the header heuristic and apply any command-line overrides.
pub fn initial_mapping(table: &ParsedTable, columns: &ColumnArgs) -> Result<FieldMapping> {
    let mut mapping = suggest_mapping(&table.headers);
    for field in Field::ALL {
        if let Some(column) = override_for(columns, field) {
            mapping.set(field, Some(resolve_column(&table.headers, column)?));
        }
    }
    Ok(mapping)
}

fn print_preview(table: &ParsedTable) {
    let mut preview = Table::new();
    preview.set_header(table.headers.iter().map(Cell::new));
    for row in table.rows.iter().take(PREVIEW_ROWS) {
        preview.add_row(
            (0..table.headers.len()).map(|col| Cell::new(ParsedTable::cell(row, col))),
        );
    }
    println!("Preview ({} rows)\n{preview}", table.rows.len());
}

fn print_mapping(table: &ParsedTable, mapping: &FieldMapping) {
    let mut t = Table::new();
    t.set_header(vec!["Field", "Column"]);
    for field in Field::ALL {
        let column = match mapping.get(field) {
            Some(idx) => table.headers[idx].clone(),
            None if field.is_required() => "-- (none) --".red().to_string(),
            None => "-- (none) --".to_string(),
        };
        let name = if field.is_required() {
            format!("{field} *")
        } else {
            field.to_string()
        };
        t.add_row(vec![Cell::new(name), Cell::new(column)]);
    }
    println!("Column mapping (* required)\n{t}");
}

fn prompt_mapping(table: &ParsedTable, current: &FieldMapping) -> Result<FieldMapping> {
    let mut items = vec!["-- (none) --".to_string()];
    items.extend(table.headers.iter().cloned());

    let mut mapping = *current;
    for field in Field::ALL {
        let default = current.get(field).map_or(0, |idx| idx + 1);
        let choice = Select::new()
            .with_prompt(format!("Map \"{field}\""))
            .items(&items)
            .default(default)
            .interact()?;
        mapping.set(field, choice.checked_sub(1));
    }
    Ok(mapping)
}

/// What to do with the current mapping before conversion.
pub enum MappingStep {
    Ready(ResolvedMapping),
    /// Required fields are unset; show the error and ask again.
    Reprompt(TallyError),
}

/// An incomplete mapping is a hard error under `--yes`, otherwise the
/// operator is asked to fix it.
pub fn next_step(mapping: &FieldMapping, yes: bool) -> Result<MappingStep> {
    match mapping.validate() {
        Ok(resolved) => Ok(MappingStep::Ready(resolved)),
        Err(e) if yes => Err(e),
        Err(e) => Ok(MappingStep::Reprompt(e)),
    }
}

fn confirm_mapping(table: &ParsedTable, columns: &ColumnArgs, yes: bool) -> Result<ResolvedMapping> {
    let mut mapping = initial_mapping(table, columns)?;
    print_mapping(table, &mapping);

    if !yes {
        let accept = Confirm::new()
            .with_prompt("Use this mapping?")
            .default(mapping.validate().is_ok())
            .interact()?;
        if !accept {
            mapping = prompt_mapping(table, &mapping)?;
        }
    }

    loop {
        match next_step(&mapping, yes)? {
            MappingStep::Ready(resolved) => return Ok(resolved),
            MappingStep::Reprompt(e) => {
                println!("{}", e.to_string().red());
                mapping = prompt_mapping(table, &mapping)?;
                print_mapping(table, &mapping);
            }
        }
    }
}

pub fn run(file: &str, columns: &ColumnArgs, yes: bool) -> Result<()> {
    let path = Path::new(file);
    let text = std::fs::read_to_string(path)?;
    let table = read_table(&text)?;

    print_preview(&table);
    let mapping = confirm_mapping(&table, columns, yes)?;

    let mut conn = open_ledger()?;
    let defaults = category_defaults(&conn)?;
    let batch = convert(&table, &mapping, &defaults, &SqliteCategories::new(&conn))?;

    println!(
        "{} valid, {} skipped",
        batch.accepted.len().to_string().green(),
        batch.skipped()
    );

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Import {} transactions into your data?", batch.accepted.len()))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", "Import cancelled.".yellow());
            return Ok(());
        }
    }

    let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    commit_batch(&mut conn, &batch, filename)?;

    println!("Imported {} transactions.", batch.accepted.len());
    for addition in &batch.category_additions {
        println!("  new {} category: {}", addition.kind, addition.name);
    }
    Ok(())
}
