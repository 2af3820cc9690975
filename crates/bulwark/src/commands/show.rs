//! Show command - print the resolved settings bundle.

use anyhow::Result;
use clap::{Args, ValueEnum};

use bulwark_config::LoadedConfig;

use super::Context;

/// Output format for the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Toml,
    Json,
}

/// Arguments for the show command.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Output format (`--json` implies json)
    #[arg(long, value_enum, default_value_t = Format::Toml)]
    pub format: Format,
}

/// Run the show command.
pub fn run(args: ShowArgs, loaded: &LoadedConfig, ctx: &Context) -> Result<()> {
    let format = if ctx.json_output {
        Format::Json
    } else {
        args.format
    };

    match format {
        Format::Json => println!("{}", loaded.config.to_json_pretty()?),
        Format::Toml => {
            if ctx.verbose {
                println!("# cors.origin from {}", loaded.origin_source);
                println!("# cookie secure flags from {}", loaded.secure_source);
                println!();
            }
            print!("{}", loaded.config.to_toml()?);
        }
    }

    Ok(())
}
