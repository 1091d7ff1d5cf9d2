mod cli;
mod error;
mod extractor;
mod fmt;
mod models;
mod normalizer;
mod rate_store;
mod rates;
mod report;
mod settings;
mod sources;
mod tracker;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let base_dir = cli.base_dir.as_deref();

    let result = match cli.command {
        None => cli::generate::run(base_dir, cli.offline, None),
        Some(Commands::Generate { output }) => {
            cli::generate::run(base_dir, cli.offline, output.as_deref())
        }
        Some(Commands::List { archived, active }) => {
            cli::list::run(base_dir, cli.offline, archived, active)
        }
        Some(Commands::Rates { refresh }) => cli::rates::run(base_dir, cli.offline, refresh),
        Some(Commands::Status) => cli::status::run(base_dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
