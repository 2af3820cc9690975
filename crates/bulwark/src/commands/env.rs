//! Env command - show consumed environment variables and provenance.

use anyhow::Result;
use serde_json::json;

use bulwark_config::{FRONTEND_URL_ENV, LoadedConfig, NODE_ENV_ENV};

use super::Context;

/// Run the env command.
pub fn run(loaded: &LoadedConfig, ctx: &Context) -> Result<()> {
    let inputs = &loaded.inputs;
    let config = &loaded.config;

    if ctx.json_output {
        let output = json!({
            "variables": {
                FRONTEND_URL_ENV: inputs.frontend_url,
                NODE_ENV_ENV: inputs.node_env,
            },
            "resolved": {
                "corsOrigin": { "value": config.cors.origin, "source": loaded.origin_source.to_string() },
                "secureCookies": { "value": config.is_production(), "source": loaded.secure_source.to_string() },
            },
            "warnings": loaded.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Environment:");
    println!("  {:<14} {}", FRONTEND_URL_ENV, display_var(&inputs.frontend_url));
    println!("  {:<14} {}", NODE_ENV_ENV, display_var(&inputs.node_env));
    println!();
    println!("Resolved:");
    println!(
        "  cors.origin    {} ({})",
        config.cors.origin, loaded.origin_source
    );
    println!(
        "  cookie.secure  {} ({})",
        config.is_production(),
        loaded.secure_source
    );

    if !loaded.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &loaded.warnings {
            println!("  - {}", warning);
        }
    }

    Ok(())
}

fn display_var(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("\"{}\"", v),
        None => "(unset)".to_string(),
    }
}
