//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// buildgroup - conditional source-group assembly for native C builds
#[derive(Parser)]
#[command(name = "buildgroup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Prepare a session from Groups.toml and print the assembly plan
    Plan(PlanArgs),

    /// Print the relative path from one location to another
    Relpath(RelpathArgs),

    /// Check whether a dependency expression is supported
    Depend(DependArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct PlanArgs {
    /// Path to the manifest (defaults to Groups.toml in the current directory)
    #[arg(long, env = "BUILDGROUP_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Remove the first object whose path contains FRAGMENT (repeatable)
    #[arg(long = "prune", value_name = "FRAGMENT")]
    pub prune: Vec<String>,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,

    /// Emit compile_commands.json into the session root
    #[arg(long)]
    pub emit_compile_commands: bool,
}

#[derive(Args)]
pub struct RelpathArgs {
    /// Location to start from
    pub origin: String,

    /// Location to reach
    pub dest: String,
}

#[derive(Args)]
pub struct DependArgs {
    /// Feature tokens; more than one is treated as a list
    #[arg(required = true)]
    pub tokens: Vec<String>,

    /// Directory whose .buildgroup/config.toml should be read
    #[arg(long)]
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
