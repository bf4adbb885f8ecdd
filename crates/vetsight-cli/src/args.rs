//! Command-line argument parsing.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};

use vetsight_core::AnalysisMode;

#[derive(Debug, PartialEq)]
pub struct Cli {
    /// Explicit configuration file; `VETSIGHT_CONFIG` is used otherwise.
    pub config: Option<PathBuf>,
    pub command: Command,
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Analyze {
        mode: AnalysisMode,
        subject: Option<String>,
        trace: bool,
        input: Option<PathBuf>,
    },
    Behavior {
        animal: String,
        input: Option<PathBuf>,
    },
    Help,
}

pub const USAGE: &str = "\
VetSight — structured analysis of veterinary diagnostic reports

Usage: vetsight [--config <file>] <command> [options] [file]

Commands:
  analyze [--detailed] [--subject <tag>] [--trace] [file]
                           Analyze a diagnostic report (stdin if no file)
  behavior [--animal <tag>] [file]
                           Parse a video behavior report (stdin if no file)
  help                     Show this help message";

fn value<'a>(flag: &str, rest: &mut impl Iterator<Item = &'a String>) -> Result<String> {
    rest.next()
        .cloned()
        .ok_or_else(|| anyhow!("{} requires a value", flag))
}

/// Parse arguments, excluding the program name.
pub fn parse_args(args: &[String]) -> Result<Cli> {
    let mut config = None;
    let mut iter = args.iter();

    let name = loop {
        match iter.next().map(String::as_str) {
            Some("--config") => config = Some(PathBuf::from(value("--config", &mut iter)?)),
            Some(name) => break name,
            None => bail!("missing command"),
        }
    };

    let command = match name {
        "analyze" => {
            let mut mode = AnalysisMode::Basic;
            let mut subject = None;
            let mut trace = false;
            let mut input = None;
            while let Some(arg) = iter.next() {
                match arg.as_str() {
                    "--detailed" => mode = AnalysisMode::Detailed,
                    "--mode" => mode = value("--mode", &mut iter)?.parse()?,
                    "--subject" => subject = Some(value("--subject", &mut iter)?),
                    "--trace" => trace = true,
                    flag if flag.starts_with("--") => bail!("unknown option for analyze: {}", flag),
                    path if input.is_none() => input = Some(PathBuf::from(path)),
                    extra => bail!("unexpected argument: {}", extra),
                }
            }
            Command::Analyze {
                mode,
                subject,
                trace,
                input,
            }
        }
        "behavior" => {
            let mut animal = "unknown".to_string();
            let mut input = None;
            while let Some(arg) = iter.next() {
                match arg.as_str() {
                    "--animal" => animal = value("--animal", &mut iter)?,
                    flag if flag.starts_with("--") => {
                        bail!("unknown option for behavior: {}", flag)
                    }
                    path if input.is_none() => input = Some(PathBuf::from(path)),
                    extra => bail!("unexpected argument: {}", extra),
                }
            }
            Command::Behavior { animal, input }
        }
        "help" | "--help" | "-h" => Command::Help,
        other => bail!("unknown command: {}", other),
    };

    Ok(Cli { config, command })
}
