mod cli;
mod commands;
mod generator;
mod paths;
mod settings;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command, PathArgs};
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub paths: PathArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        paths: cli.paths,
    };

    match cli.command {
        Command::Check(args) => commands::check::run(&ctx, args),
        Command::Revisions(args) => commands::revisions::run(&ctx, args),
        Command::Verify(args) => commands::verify::run(&ctx, args),
        Command::Freeze(args) => commands::freeze::freeze(&ctx, args),
        Command::Unfreeze(args) => commands::freeze::unfreeze(&ctx, args),
        Command::Rebuild => commands::rebuild::run(&ctx),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "plugsync", &mut io::stdout());
            Ok(())
        }
    }
}
