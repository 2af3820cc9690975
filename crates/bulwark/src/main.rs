//! Bulwark - middleware settings inspector
//!
//! Main entry point for the Bulwark CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{env, headers, show};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Bulwark - inspect the CORS, security header, rate limit and cookie settings
/// resolved from the current environment
#[derive(Parser)]
#[command(name = "bulwark")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the resolved settings bundle
    Show(show::ShowArgs),

    /// Show which environment variables were used and where each value came from
    Env,

    /// Print the HTTP headers and cookies the middleware stack will emit
    Headers,
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let filter = if cli.verbose {
        "bulwark=debug,bulwark_config=debug,bulwark_server=debug,info"
    } else {
        "bulwark=info,bulwark_config=info,bulwark_server=warn,warn"
    };

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    // Resolved exactly once; every command reads the same bundle
    let loaded = bulwark_config::load_from_env();

    let ctx = commands::Context {
        json_output: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Show(args) => show::run(args, &loaded, &ctx),
        Commands::Env => env::run(&loaded, &ctx),
        Commands::Headers => headers::run(&loaded, &ctx),
    }
}
