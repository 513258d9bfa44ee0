use std::{
    fs::File,
    io::{BufRead, BufReader},
};

use clap::{Parser, Subcommand};
use pqueue::{
    errors::wrap_file_error,
    options::CommonOptions,
    script::{run_script, sort_numbers},
};

/// Indexed priority queue tools
#[derive(Debug, Parser)]
#[command(name = "pqueue")]
#[command(about = "Replay operations against an indexed priority queue.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a script of queue commands (insert, change, remove, peek, pop, size, check, print, dump)
    Run {
        /// Script to replay (standard input if absent)
        script: Option<String>,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Sort whitespace separated integers, largest first
    Sort {
        /// File with the integers (standard input if absent)
        input: Option<String>,

        #[command(flatten)]
        common: CommonOptions,
    },
}

fn open_input(name: &Option<String>) -> std::io::Result<Box<dyn BufRead>> {
    match name {
        Some(filename) => {
            log::info!("reading {}", filename);
            let file = File::open(filename).map_err(|e| wrap_file_error(e, filename))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(std::io::stdin().lock())),
    }
}

fn main() -> std::io::Result<()> {
    env_logger::builder().filter_level(log::LevelFilter::Info).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { script, common } => {
            let reader = open_input(&script)?;
            run_script(reader, std::io::stdout().lock(), &common)?;
        }
        Commands::Sort { input, common } => {
            let reader = open_input(&input)?;
            sort_numbers(reader, std::io::stdout().lock(), &common)?;
        }
    }
    Ok(())
}
