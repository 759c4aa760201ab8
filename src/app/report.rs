// SeedScore - app/report.rs
//
// One invocation: open the report, aggregate it while streaming seed
// diagnostics, print the mean, and optionally the undersized list and an
// export file.

use crate::core::aggregator::aggregate;
use crate::core::export::{export_to_path, format_score};
use crate::core::model::{MalformedPolicy, Summary};
use crate::platform::fs::{default_report_path, open_report};
use crate::util::constants::DEFAULT_RECORD_LIMIT;
use crate::util::error::{Result, SeedScoreError};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Everything a run needs, already resolved from CLI and config.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Report file to scan.
    pub input: PathBuf,
    pub policy: MalformedPolicy,
    /// Print the undersized run list after the mean.
    pub show_undersized: bool,
    /// Export destination; format follows the extension.
    pub export: Option<PathBuf>,
    /// Accepted for command-line compatibility. Never consulted.
    pub record_limit: u64,
}

impl RunOptions {
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            policy: MalformedPolicy::default(),
            show_undersized: false,
            export: None,
            record_limit: DEFAULT_RECORD_LIMIT,
        }
    }
}

/// Pick the report path: CLI override > config > `<cwd>/result.txt`.
pub fn resolve_input(cli: Option<&Path>, config: Option<&Path>) -> Result<PathBuf> {
    match cli.or(config) {
        Some(path) => Ok(path.to_path_buf()),
        None => default_report_path(),
    }
}

/// Run the full report against `out`.
pub fn run<W: Write>(options: &RunOptions, out: &mut W) -> Result<Summary> {
    tracing::debug!(
        record_limit = options.record_limit,
        "Record limit accepted but not applied"
    );
    tracing::info!(input = %options.input.display(), "Scanning report");

    let reader = open_report(&options.input)?;
    let summary = aggregate(reader, &options.input, options.policy, out)?;

    write_summary(&summary, options.show_undersized, out)?;

    if let Some(ref export_path) = options.export {
        export_to_path(&summary, &options.input, export_path)?;
    }

    Ok(summary)
}

/// Print the mean, then the undersized list when requested.
pub fn write_summary<W: Write>(summary: &Summary, show_undersized: bool, out: &mut W) -> Result<()> {
    let write_err = |e: std::io::Error| SeedScoreError::Io {
        path: PathBuf::from("<output>"),
        operation: "write summary",
        source: e,
    };
    writeln!(out, "{}", format_score(summary.mean)).map_err(write_err)?;
    if show_undersized {
        writeln!(out, "{:?}", summary.undersized_runs).map_err(write_err)?;
    }
    out.flush().map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_with(mean: f64, undersized: Vec<u64>) -> Summary {
        Summary {
            sum: 0.0,
            count: 0,
            mean,
            undersized_runs: undersized,
            records: Vec::new(),
            skipped_lines: 0,
        }
    }

    #[test]
    fn test_write_summary_mean_only() {
        let mut out = Vec::new();
        write_summary(&summary_with(5.0, vec![1]), false, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "5.0\n");
    }

    #[test]
    fn test_write_summary_with_undersized() {
        let mut out = Vec::new();
        write_summary(&summary_with(f64::INFINITY, vec![1, 3]), true, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "inf\n[1, 3]\n");
    }

    #[test]
    fn test_write_summary_nan() {
        let mut out = Vec::new();
        write_summary(&summary_with(f64::NAN, vec![]), true, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "NaN\n[]\n");
    }

    #[test]
    fn test_resolve_input_priority() {
        let cli = Path::new("cli.txt");
        let cfg = Path::new("cfg.txt");
        assert_eq!(resolve_input(Some(cli), Some(cfg)).unwrap(), cli);
        assert_eq!(resolve_input(None, Some(cfg)).unwrap(), cfg);
        let fallback = resolve_input(None, None).unwrap();
        assert!(fallback.ends_with("result.txt"));
    }

    #[test]
    fn test_record_limit_has_no_effect() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("result.txt");
        std::fs::write(&input, "Score = 1\nScore = 2\nScore = 3\n").unwrap();

        let mut options = RunOptions::new(input);
        options.record_limit = 1;
        let mut out = Vec::new();
        let summary = run(&options, &mut out).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(String::from_utf8(out).unwrap(), "2.0\n");
    }
}
