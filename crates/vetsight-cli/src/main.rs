//! VetSight — command-line harness for the report analyzer.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vetsight_analyze::Analyzer;
use vetsight_behavior::parse_behavior_report;
use vetsight_core::AnalyzerConfig;

mod args;

use args::{parse_args, Command, USAGE};

fn read_input(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AnalyzerConfig> {
    let config = match path {
        Some(path) => AnalyzerConfig::load(path),
        None => AnalyzerConfig::from_env(),
    };
    config.context("Failed to load analyzer config")
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}. Use 'vetsight help' for usage.", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Command::Help => {
            println!("{}", USAGE);
        }
        Command::Analyze {
            mode,
            subject,
            trace,
            input,
        } => {
            let analyzer = Analyzer::new(load_config(cli.config.as_deref())?)?;
            let text = read_input(input.as_deref())?;
            info!("Analyzing {} chars in {} mode", text.chars().count(), mode);

            let (record, provenance) = analyzer.analyze_traced(&text, mode, subject.as_deref());
            let output = if trace {
                serde_json::json!({ "record": record, "trace": provenance })
            } else {
                serde_json::to_value(&record)?
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Behavior { animal, input } => {
            let config = load_config(cli.config.as_deref())?;
            let text = read_input(input.as_deref())?;

            let parsed = parse_behavior_report(&text, &animal, &config.behavior);
            info!("Behavior report for {}: {:?}", animal, parsed.outcome);
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
    }

    Ok(())
}
