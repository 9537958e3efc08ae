use std::io::Read;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use clubhouse_core::{ValidationConfig, Validator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod args;
mod run;

use args::Cli;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clubhouse_cli=info,clubhouse_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match execute(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "Validation run failed");
            ExitCode::from(2)
        }
    }
}

/// Returns whether the record was valid.
fn execute(cli: &Cli) -> anyhow::Result<bool> {
    // --- Configuration ---
    let config = ValidationConfig::from_env().context("failed to load configuration")?;
    let validator = Validator::with_system_clock(run::effective_config(cli, config))
        .context("invalid validation configuration")?;
    tracing::debug!(
        unknown_keys = ?validator.config().unknown_keys,
        empty_items = ?validator.config().empty_items,
        "Loaded validation configuration"
    );

    // --- Input ---
    let input = read_input(cli)?;

    let outcome = run::run(&validator, cli, &input)?;
    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&outcome.body)?
    } else {
        serde_json::to_string(&outcome.body)?
    };
    println!("{rendered}");
    Ok(outcome.valid)
}

fn read_input(cli: &Cli) -> anyhow::Result<String> {
    match &cli.input {
        Some(path) if !cli.reads_stdin() => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}
