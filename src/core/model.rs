// SeedScore - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.

use crate::util::constants::{SCORE_MARKER, SEED_OFFSET, SIZE_MARKER};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Line classification
// =============================================================================

/// What a single report line announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Contains the size marker (`N =`).
    Size,
    /// Contains the score marker (`Score`).
    Score,
    /// Neither marker; ignored.
    Other,
}

/// Classify a line by substring match.
///
/// The size marker is checked first, so a line carrying both markers is a
/// size line and never closes a record.
pub fn classify_line(line: &str) -> LineKind {
    if line.contains(SIZE_MARKER) {
        LineKind::Size
    } else if line.contains(SCORE_MARKER) {
        LineKind::Score
    } else {
        LineKind::Other
    }
}

/// Seed number displayed for a record at 0-based `ordinal`.
pub fn seed_for(ordinal: u64) -> u64 {
    ordinal + SEED_OFFSET
}

// =============================================================================
// Score outcome
// =============================================================================

/// How a score line was accounted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScoreOutcome {
    /// Ordinary score, accumulated as parsed.
    Counted,
    /// Over sentinel: accumulated as positive infinity.
    Over { seed: u64 },
    /// Zero sentinel: accumulated as zero.
    Zero { seed: u64 },
}

impl ScoreOutcome {
    /// Whether this outcome produces a stdout diagnostic.
    pub fn is_diagnostic(&self) -> bool {
        !matches!(self, Self::Counted)
    }

    /// Short label used in CSV export.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Counted => "counted",
            Self::Over { .. } => "over",
            Self::Zero { .. } => "zero",
        }
    }
}

impl fmt::Display for ScoreOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Counted => write!(f, "counted"),
            Self::Over { seed } => write!(f, "Seed {seed} is over"),
            Self::Zero { seed } => write!(f, "Seed {seed} is zero"),
        }
    }
}

// =============================================================================
// Records and summary
// =============================================================================

/// One closed record: a score line plus the size line that preceded it
/// since the previous score line, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSummary {
    /// 0-based ordinal among score lines.
    pub ordinal: u64,
    /// Displayed seed number.
    pub seed: u64,
    /// Size announced for this record.
    pub size: Option<i64>,
    /// Score exactly as parsed.
    pub raw_score: f64,
    /// Score as accumulated (over sentinel replaced by infinity).
    pub score: f64,
    pub outcome: ScoreOutcome,
}

/// Final result of one pass over a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Sentinel-adjusted sum of scores.
    pub sum: f64,
    /// Number of score lines seen.
    pub count: u64,
    /// `sum / count` with IEEE semantics; NaN when `count == 0`.
    pub mean: f64,
    /// Values of `count + 1` captured at each undersized size line.
    pub undersized_runs: Vec<u64>,
    pub records: Vec<RecordSummary>,
    /// Marker lines skipped under [`MalformedPolicy::Skip`].
    pub skipped_lines: u64,
}

// =============================================================================
// Malformed line policy
// =============================================================================

/// What to do with a marker line whose value token is absent or non-numeric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Abort the scan with a parse error.
    #[default]
    Fatal,
    /// Warn, skip the line, and continue.
    Skip,
}

impl MalformedPolicy {
    /// Parse a config value, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "fatal" => Some(Self::Fatal),
            "skip" => Some(Self::Skip),
            _ => None,
        }
    }
}
