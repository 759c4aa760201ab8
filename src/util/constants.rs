// SeedScore - util/constants.rs
//
// Single source of truth for all named constants, markers, and defaults.
// Sentinels and the undersized threshold are fixed here and are never
// exposed through configuration.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "SeedScore";

/// Application identifier used for config directories.
pub const APP_ID: &str = "seedscore";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Line markers
// =============================================================================

/// Substring that identifies a size announcement line.
pub const SIZE_MARKER: &str = "N =";

/// Substring that identifies a score announcement line.
pub const SCORE_MARKER: &str = "Score";

/// 0-based position of the value among the whitespace-separated tokens of a
/// marker line (`N = 10` -> `10`, `Score = 5.0` -> `5.0`).
pub const VALUE_TOKEN_INDEX: usize = 2;

// =============================================================================
// Sentinels and thresholds
// =============================================================================

/// Score reported by the runner when a seed did not complete.
/// Replaced by positive infinity before accumulation.
pub const OVER_SENTINEL: f64 = -1.0;

/// Score reported by the runner for a zero result. Diagnosed, then
/// accumulated as a literal zero.
pub const ZERO_SENTINEL: f64 = 0.0;

/// Records whose size is at or below this value are undersized.
pub const UNDERSIZED_THRESHOLD: i64 = 14;

/// Seeds are numbered from this value: the record at 0-based ordinal `n`
/// is seed `n + SEED_OFFSET`.
pub const SEED_OFFSET: u64 = 1001;

// =============================================================================
// Input
// =============================================================================

/// Report file name, resolved against the current working directory.
pub const DEFAULT_RESULT_FILE: &str = "result.txt";

/// Default of the numeric invocation argument. Accepted, never consulted.
pub const DEFAULT_RECORD_LIMIT: u64 = 100;

// =============================================================================
// Logging
// =============================================================================

/// Default log level. Log output goes to stderr only.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Maximum length of a report line included in debug output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
