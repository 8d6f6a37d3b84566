use std::path::PathBuf;

use crate::cli::{open_ledger, FilterArgs};
use crate::db::list_transactions;
use crate::error::Result;
use crate::export::{default_export_path, export_to_file};
use crate::settings::{get_data_dir, shellexpand_path};

pub fn run(args: &FilterArgs, output: Option<String>) -> Result<()> {
    let filter = args.to_filter()?;
    let conn = open_ledger()?;
    let all = list_transactions(&conn)?;
    let txns = filter.apply(&all);

    let path = match output {
        Some(p) => PathBuf::from(shellexpand_path(&p)),
        None => default_export_path(&get_data_dir(), chrono::Local::now().date_naive()),
    };
    export_to_file(&path, &txns)?;

    log::info!("exported {} transactions to {}", txns.len(), path.display());
    println!("Exported {} transactions to {}", txns.len(), path.display());
    Ok(())
}
