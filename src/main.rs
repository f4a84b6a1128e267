//! Command-line entry point: load a level export, analyze it, print the
//! report.
//!
//! ```text
//! pumpmon_service --input data/RawData.csv --format json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use pumpmon_service::analysis::analyze_with;
use pumpmon_service::config::Config;
use pumpmon_service::ingest::load_series;
use pumpmon_service::logging::{init_logger, parse_level};
use pumpmon_service::report::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "pumpmon_service", version, about = "Pump cycle and water-level analytics")]
struct Args {
    /// Config file (defaults to $PUMPMON_CONFIG, then ./pumpmon.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input file path or HTTP(S) URL; overrides config and $PUMPMON_INPUT
    #[arg(short, long)]
    input: Option<String>,

    /// Output format: summary or json
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,

    /// Unit label for level values
    #[arg(long)]
    unit: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!(target: "report", "{}", e);
            // The logger may not be installed yet if configuration failed.
            if log::max_level() == log::LevelFilter::Off {
                eprintln!("error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<String, Box<dyn std::error::Error>> {
    let mut config = Config::resolve(args.config.as_deref())?;

    if let Some(input) = args.input {
        config.input.source = input;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if let Some(unit) = args.unit {
        config.output.unit = unit;
    }
    config.validate()?;

    let level = parse_level(&config.logging.level).unwrap_or(log::LevelFilter::Info);
    init_logger(level, config.logging.file.clone(), config.logging.timestamps)?;

    let series = load_series(&config.input.source, &config.input_options()?)?;
    let report = analyze_with(&series, &config.analysis_options()?)?;

    let rendered = config.output.format.render(&report, &config.output.unit)?;
    log::debug!(target: "report", "Rendered {:?} report", config.output.format);
    Ok(rendered)
}
