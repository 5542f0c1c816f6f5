mod batch;
mod cli;
mod commands;
mod error;
mod files;
mod pdf;
mod roster;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Prepare {
            group,
            source,
            dest,
            exclude,
            json,
        } => {
            let options = commands::prepare::PrepareOptions {
                roster: group,
                source,
                dest,
                exclude,
                json,
            };
            commands::prepare::run(&options)?;
        }
        Commands::Pack {
            source,
            dest,
            roster,
            delimiter,
            max_batch_mb,
            json,
        } => {
            let options = commands::pack::PackOptions {
                source,
                dest,
                roster,
                delimiter,
                max_batch_mb,
                json,
            };
            commands::pack::run(&options)?;
        }
        Commands::Split { path, output } => {
            commands::split::run(&path, &output)?;
        }
    }

    Ok(())
}
