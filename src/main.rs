mod categories;
mod cli;
mod db;
mod error;
mod export;
mod filter;
mod importer;
mod models;
mod reports;
mod settings;

use clap::Parser;

use cli::{CategoriesCommands, Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Import { file, columns, yes } => cli::import::run(&file, &columns, yes),
        Commands::List { filter } => cli::list::run(&filter),
        Commands::Export { filter, output } => cli::export::run(&filter, output),
        Commands::Summary { filter, range } => cli::summary::run(&filter, range),
        Commands::Categories { command } => match command {
            CategoriesCommands::List => cli::categories::list(),
            CategoriesCommands::Add { name, kind } => cli::categories::add(&name, &kind),
            CategoriesCommands::Delete { name, kind } => cli::categories::delete(&name, &kind),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
