//! CLI entry point for the docfetch tool.

use std::process::ExitCode;

use clap::Parser;
use docfetch_logging::{docfetch_debug, docfetch_error, LogDestination};
use log::LevelFilter;

mod cli;
mod config;
mod run;

use cli::{Args, Command};

fn main() -> ExitCode {
    // Parse CLI arguments first (before logging, so --help works without logs)
    let args = Args::parse();

    let level = if args.quiet {
        LevelFilter::Error
    } else {
        match args.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    let logging = docfetch_logging::initialize(
        LogDestination::terminal_and(args.log_file.clone()),
        level,
    );
    docfetch_debug!("CLI arguments parsed: {:?}", args);

    let result = match &args.command {
        Command::Fetch(fetch) => run::run_fetch(fetch).map(|_| ()),
        Command::Check(check) => run::run_check(check).map(|_| ()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if logging {
                docfetch_error!("{:#}", err);
            } else {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
