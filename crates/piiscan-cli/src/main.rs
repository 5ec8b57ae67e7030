//! piiscan - scan text files for personally identifiable information.
//!
//! ```bash
//! piiscan search notes.txt
//! piiscan --json search --find-matches --recursive ./exports
//! piiscan search --rules ssn,credit_card -f customers.csv
//! piiscan rules
//! ```

mod cli;
mod output;

use anyhow::{bail, Context};
use clap::Parser;
use cli::{Cli, Command, SearchArgs};
use piiscan_core::{AppConfig, LoggingConfig};
use piiscan_rules::DEFAULT_RULE_SET;
use piiscan_scanner::{LogProgress, RuleSummary, Tester};
use std::io::{self, Write};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::load_with_env().context("failed to load config")?,
    };
    init_tracing(&config.logging);

    match cli.command {
        Command::Search(args) => search(args, config, cli.json).await,
        Command::Rules => list_rules(cli.json),
    }
}

/// Logs go to stderr so stdout carries only results.
fn init_tracing(logging: &LoggingConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(logging.with_target)
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}

async fn search(args: SearchArgs, config: AppConfig, json: bool) -> anyhow::Result<()> {
    let mut scanning = config.scanning;
    if args.find_matches {
        scanning.find_enabled = true;
    }
    if args.no_detect {
        scanning.detect_enabled = false;
    }
    if !args.rules.is_empty() {
        scanning.rules = args.rules;
    }

    let mut tester = Tester::from_config(&scanning).context("invalid scan settings")?;

    for path in &args.paths {
        if path.is_dir() {
            if !args.recursive {
                bail!("{} is a directory (use --recursive)", path.display());
            }
            tester
                .add_directory(path)
                .await
                .with_context(|| format!("failed to add {}", path.display()))?;
        } else {
            tester
                .add_file(path)
                .with_context(|| format!("failed to add {}", path.display()))?;
        }
    }

    let errors = tester.run(&LogProgress::new()).await;
    for error in &errors {
        tracing::error!("{}", error);
    }

    let report = tester.report();
    let mut stdout = io::stdout().lock();
    if json {
        writeln!(stdout, "{}", report.to_json()?)?;
    } else {
        output::write_report(&mut stdout, &report)?;
    }

    Ok(())
}

fn list_rules(json: bool) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    if json {
        let rules: Vec<RuleSummary> = DEFAULT_RULE_SET.iter().map(RuleSummary::from).collect();
        writeln!(stdout, "{}", serde_json::to_string_pretty(&rules)?)?;
    } else {
        output::write_rules(&mut stdout, DEFAULT_RULE_SET.iter())?;
    }
    Ok(())
}
