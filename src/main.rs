// Loganizer - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading (platform config dir or --config-dir)
// 3. Logging initialisation (debug mode support)
// 4. Dispatch of the `analyze` subcommand and exit-code mapping

use clap::{Args, Parser, Subcommand};
use loganizer::app::dispatch::EngineConfig;
use loganizer::app::run::{self, RunOptions};
use loganizer::core::inspector::{DelayRange, InspectConfig};
use loganizer::platform::config::{self, AppConfig, PlatformPaths};
use loganizer::util::{constants, logging};
use std::path::PathBuf;
use std::process::ExitCode;

/// Loganizer - concurrent log file analyser.
///
/// Checks every log file named in a descriptor list in parallel and reports
/// which ones are present, readable and non-empty.
#[derive(Parser, Debug)]
#[command(name = "loganizer", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Directory containing config.toml (defaults to the platform config dir).
    #[arg(long = "config-dir", global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse the log files listed in a descriptor file, in parallel.
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Descriptor list: JSON array of {id, path, type}, or TOML [[logs]] tables.
    #[arg(short = 'c', long = "config")]
    descriptors: PathBuf,

    /// Write the results as JSON. `report.json` gets a YYMMDD_ date prefix.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Write the results as CSV.
    #[arg(long = "csv")]
    csv: Option<PathBuf>,

    /// Worker threads (0 = one per CPU core). Overrides config.toml.
    #[arg(short = 't', long = "threads")]
    threads: Option<usize>,

    /// Exit with status 2 if any file failed analysis.
    #[arg(long = "strict")]
    strict: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_dir);
    let (app_config, config_errors) = config::load_config(&config_dir);

    logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "Loganizer starting"
    );

    for err in &config_errors {
        tracing::warn!(error = %err, "config.toml problem; default kept");
    }

    match cli.command {
        Command::Analyze(args) => analyze(args, &app_config),
    }
}

fn analyze(args: AnalyzeArgs, app_config: &AppConfig) -> ExitCode {
    let options = RunOptions {
        descriptors_path: args.descriptors.clone(),
        json_output: args.output,
        csv_output: args.csv,
        engine: EngineConfig {
            worker_threads: args.threads.unwrap_or(app_config.worker_threads),
            inspect: InspectConfig {
                delay: DelayRange::new(app_config.min_delay_ms, app_config.max_delay_ms),
            },
        },
    };

    println!("Starting analysis with: {}", args.descriptors.display());

    let report = match run::run(&options, std::io::stdout().lock()) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "Analysis run failed");
            eprintln!("Error: {e}");
            return ExitCode::from(constants::EXIT_FATAL);
        }
    };

    for path in &report.written {
        println!("Report written: {}", path.display());
    }
    println!("Analysis finished in {} ms", report.elapsed.as_millis());

    if args.strict && report.summary.has_failures() {
        return ExitCode::from(constants::EXIT_FAILED_FILES);
    }
    ExitCode::SUCCESS
}
