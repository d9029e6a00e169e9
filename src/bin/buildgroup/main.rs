//! buildgroup CLI - conditional source-group assembly for native C builds

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use buildgroup::builder::AssemblyError;
use buildgroup::util::diagnostic::emit;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli, color) {
        match e.downcast_ref::<AssemblyError>() {
            Some(err) => {
                let mut diag = err.to_diagnostic();
                let chain = format!("{:#}", e);
                if chain != err.to_string() {
                    diag = diag.with_context(chain);
                }
                emit(&diag, color);
            }
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("buildgroup=debug")
    } else {
        EnvFilter::new("buildgroup=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Plan(args) => commands::plan::execute(args, color),
        Commands::Relpath(args) => commands::relpath::execute(args),
        Commands::Depend(args) => commands::depend::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
