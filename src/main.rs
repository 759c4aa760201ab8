// SeedScore - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading (explicit path or platform default)
// 3. Logging initialisation (debug mode support)
// 4. The report run and exit status

use clap::Parser;
use seedscore::app::report::{self, RunOptions};
use seedscore::core::model::MalformedPolicy;
use seedscore::platform::config::{load_config, PlatformPaths};
use seedscore::util;
use std::io::Write;
use std::path::PathBuf;

/// SeedScore - mean score of an experiment runner's result log.
///
/// Reads `result.txt` in the working directory (or --input), reports
/// `Seed N is over` / `Seed N is zero` for sentinel scores as they are
/// found, then prints the mean score.
#[derive(Parser, Debug)]
#[command(name = "seedscore", version, about)]
struct Cli {
    /// Record limit. Accepted for compatibility; has no effect.
    #[arg(value_name = "NUM")]
    num: Option<u64>,

    /// Report file to scan (default: ./result.txt).
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// config.toml to load instead of the platform default.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Warn and skip marker lines whose value cannot be parsed.
    #[arg(long = "skip-malformed")]
    skip_malformed: bool,

    /// Print the undersized run list after the mean.
    #[arg(short = 'u', long = "show-undersized")]
    show_undersized: bool,

    /// Write the summary to this file (.csv for CSV, otherwise JSON).
    #[arg(short = 'e', long = "export")]
    export: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Config is read before logging exists, so both steps hand their
    // warnings back and they are logged once the subscriber is installed.
    let (config_path, required, platform_warning) = match cli.config {
        Some(ref path) => (path.clone(), true, None),
        None => {
            let (paths, warning) = PlatformPaths::resolve();
            (paths.config_file(), false, warning)
        }
    };
    let loaded = load_config(&config_path, required);

    let config_level = loaded
        .as_ref()
        .ok()
        .and_then(|(config, _)| config.log_level.clone());
    util::logging::init(cli.debug, config_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "SeedScore starting"
    );

    if let Some(warning) = platform_warning {
        tracing::warn!("{warning}");
    }
    tracing::debug!(path = %config_path.display(), required, "Config location resolved");

    let config = match loaded {
        Ok((config, warnings)) => {
            for warning in &warnings {
                tracing::warn!(path = %config_path.display(), "{warning}");
            }
            config
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load config");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let input = match report::resolve_input(cli.input.as_deref(), config.input_path.as_deref()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let options = RunOptions {
        input,
        policy: if cli.skip_malformed {
            MalformedPolicy::Skip
        } else {
            config.malformed_policy
        },
        show_undersized: cli.show_undersized || config.show_undersized,
        export: cli.export.or(config.export_path),
        record_limit: cli.num.unwrap_or(util::constants::DEFAULT_RECORD_LIMIT),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = report::run(&options, &mut out);

    if let Err(e) = result {
        // Success already flushed in write_summary; push out any diagnostics
        // written before the failure.
        if let Err(flush_err) = out.flush() {
            tracing::debug!(error = %flush_err, "Failed to flush stdout");
        }
        tracing::error!(error = %e, "Report failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
