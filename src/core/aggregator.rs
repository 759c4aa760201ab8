// SeedScore - core/aggregator.rs
//
// Single-pass record aggregation over a result report.
// Core layer: accepts BufRead/Write trait objects, never touches the
// filesystem directly.

use crate::core::model::{
    classify_line, seed_for, LineKind, MalformedPolicy, RecordSummary, ScoreOutcome, Summary,
};
use crate::util::constants::{
    OVER_SENTINEL, SCORE_MARKER, SIZE_MARKER, UNDERSIZED_THRESHOLD, VALUE_TOKEN_INDEX,
    ZERO_SENTINEL,
};
use crate::util::error::{ParseError, Result, SeedScoreError};
use crate::util::logging::preview;
use std::io::{BufRead, Write};
use std::num::IntErrorKind;
use std::path::{Path, PathBuf};

// =============================================================================
// Aggregation state
// =============================================================================

/// Running totals for one pass.
///
/// `count` is the number of score lines seen so far. It advances by exactly
/// one per score line whatever the sentinel handling, and is the only link
/// between a size line and the record it belongs to.
#[derive(Debug, Default)]
pub struct AggregationState {
    count: u64,
    sum: f64,
    undersized_runs: Vec<u64>,
    pending_size: Option<i64>,
    records: Vec<RecordSummary>,
}

impl AggregationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn undersized_runs(&self) -> &[u64] {
        &self.undersized_runs
    }

    /// Handle a parsed size line.
    ///
    /// An undersized size records `count + 1` using the count as it stands
    /// now, before the score line that closes this record is seen.
    pub fn on_size_line(&mut self, size: i64) {
        if size <= UNDERSIZED_THRESHOLD {
            self.undersized_runs.push(self.count + 1);
        }
        self.pending_size = Some(size);
    }

    /// Handle a parsed score line, closing the current record.
    ///
    /// Returns the outcome so the caller can emit its diagnostic.
    pub fn on_score_line(&mut self, raw_score: f64) -> ScoreOutcome {
        let seed = seed_for(self.count);
        let (score, outcome) = if raw_score == OVER_SENTINEL {
            (f64::INFINITY, ScoreOutcome::Over { seed })
        } else if raw_score == ZERO_SENTINEL {
            (raw_score, ScoreOutcome::Zero { seed })
        } else {
            (raw_score, ScoreOutcome::Counted)
        };

        self.sum += score;
        self.records.push(RecordSummary {
            ordinal: self.count,
            seed,
            size: self.pending_size.take(),
            raw_score,
            score,
            outcome,
        });
        self.count += 1;
        outcome
    }

    /// Consume the state and compute the mean.
    ///
    /// No guard on `count == 0`: the division follows IEEE 754 and yields NaN.
    pub fn finish(self, skipped_lines: u64) -> Summary {
        let mean = self.sum / self.count as f64;
        Summary {
            sum: self.sum,
            count: self.count,
            mean,
            undersized_runs: self.undersized_runs,
            records: self.records,
            skipped_lines,
        }
    }
}

// =============================================================================
// Line-level driver
// =============================================================================

/// Classifies and parses report lines, feeding an [`AggregationState`] and
/// writing sentinel diagnostics as soon as they occur.
#[derive(Debug)]
pub struct Aggregator {
    state: AggregationState,
    policy: MalformedPolicy,
    source: PathBuf,
    skipped_lines: u64,
}

impl Aggregator {
    /// `source` is used only for error and log context.
    pub fn new(source: &Path, policy: MalformedPolicy) -> Self {
        Self {
            state: AggregationState::new(),
            policy,
            source: source.to_path_buf(),
            skipped_lines: 0,
        }
    }

    /// Process one line. `line_number` is 1-based.
    pub fn feed_line<W: Write>(
        &mut self,
        line: &str,
        line_number: u64,
        out: &mut W,
    ) -> Result<LineKind> {
        let kind = classify_line(line);
        match kind {
            LineKind::Size => match self.parse_size(line, line_number) {
                Ok(size) => self.state.on_size_line(size),
                Err(e) => self.reject(e, line)?,
            },
            LineKind::Score => match self.parse_score(line, line_number) {
                Ok(score) => {
                    let outcome = self.state.on_score_line(score);
                    if outcome.is_diagnostic() {
                        tracing::debug!(line_number, %outcome, "Sentinel score");
                        writeln!(out, "{outcome}").map_err(|e| SeedScoreError::Io {
                            path: PathBuf::from("<output>"),
                            operation: "write diagnostic",
                            source: e,
                        })?;
                    }
                }
                Err(e) => self.reject(e, line)?,
            },
            LineKind::Other => {}
        }
        Ok(kind)
    }

    /// Finish the pass.
    pub fn finish(self) -> Summary {
        self.state.finish(self.skipped_lines)
    }

    fn value_token<'l>(
        &self,
        line: &'l str,
        line_number: u64,
        marker: &'static str,
    ) -> std::result::Result<&'l str, ParseError> {
        line.split_whitespace()
            .nth(VALUE_TOKEN_INDEX)
            .ok_or_else(|| ParseError::MissingValue {
                file: self.source.clone(),
                line_number,
                marker,
            })
    }

    fn parse_size(&self, line: &str, line_number: u64) -> std::result::Result<i64, ParseError> {
        let token = self.value_token(line, line_number, SIZE_MARKER)?;
        // Out-of-range integers saturate; only non-integer tokens are malformed.
        match token.parse::<i64>() {
            Ok(size) => Ok(size),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => Ok(i64::MAX),
                IntErrorKind::NegOverflow => Ok(i64::MIN),
                _ => Err(ParseError::InvalidNumber {
                    file: self.source.clone(),
                    line_number,
                    field: "size",
                    raw: token.to_string(),
                }),
            },
        }
    }

    fn parse_score(&self, line: &str, line_number: u64) -> std::result::Result<f64, ParseError> {
        let token = self.value_token(line, line_number, SCORE_MARKER)?;
        // `inf` and `NaN` spellings are rejected: only the over sentinel may
        // put a non-finite value into the sum.
        match token.parse::<f64>() {
            Ok(score) if score.is_finite() => Ok(score),
            _ => Err(ParseError::InvalidNumber {
                file: self.source.clone(),
                line_number,
                field: "score",
                raw: token.to_string(),
            }),
        }
    }

    fn reject(&mut self, error: ParseError, line: &str) -> Result<()> {
        match self.policy {
            MalformedPolicy::Fatal => Err(error.into()),
            MalformedPolicy::Skip => {
                tracing::warn!(error = %error, line = preview(line), "Skipping malformed line");
                self.skipped_lines += 1;
                Ok(())
            }
        }
    }
}

/// Scan a whole report in one forward pass.
///
/// Diagnostics go to `out` interleaved with the scan. Bytes that are not
/// valid UTF-8 are replaced rather than rejected.
pub fn aggregate<R: BufRead, W: Write>(
    mut reader: R,
    source: &Path,
    policy: MalformedPolicy,
    out: &mut W,
) -> Result<Summary> {
    tracing::debug!(file = %source.display(), ?policy, "Aggregation started");

    let mut aggregator = Aggregator::new(source, policy);
    let mut buf = Vec::new();
    let mut line_number: u64 = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| ParseError::Io {
                file: source.to_path_buf(),
                source: e,
            })?;
        if read == 0 {
            break;
        }
        line_number += 1;
        let line = String::from_utf8_lossy(&buf);
        aggregator.feed_line(&line, line_number, out)?;
    }

    let summary = aggregator.finish();
    tracing::info!(
        file = %source.display(),
        lines = line_number,
        records = summary.count,
        undersized = summary.undersized_runs.len(),
        skipped = summary.skipped_lines,
        "Aggregation complete"
    );
    Ok(summary)
}
