// SeedScore - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all SeedScore operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum SeedScoreError {
    /// Report file parsing failed.
    Parse(ParseError),

    /// Configuration loading failed.
    Config(ConfigError),

    /// Export operation failed.
    Export(ExportError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for SeedScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for SeedScoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Errors raised while scanning a report file.
#[derive(Debug)]
pub enum ParseError {
    /// A marker line has no token at the value position.
    MissingValue {
        file: PathBuf,
        line_number: u64,
        marker: &'static str,
    },

    /// The token at the value position is not a number of the expected kind.
    InvalidNumber {
        file: PathBuf,
        line_number: u64,
        field: &'static str,
        raw: String,
    },

    /// I/O error while reading the report.
    Io { file: PathBuf, source: io::Error },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingValue {
                file,
                line_number,
                marker,
            } => write!(
                f,
                "'{}' line {line_number}: '{marker}' line has no value token",
                file.display()
            ),
            Self::InvalidNumber {
                file,
                line_number,
                field,
                raw,
            } => write!(
                f,
                "'{}' line {line_number}: cannot parse {field} from '{raw}'",
                file.display()
            ),
            Self::Io { file, source } => {
                write!(f, "'{}': I/O error: {source}", file.display())
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ParseError> for SeedScoreError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to summary export.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for SeedScoreError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is not one of the accepted values.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for SeedScoreError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for SeedScore results.
pub type Result<T> = std::result::Result<T, SeedScoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_open_failure_names_path() {
        let err = SeedScoreError::Io {
            path: PathBuf::from("/tmp/missing/result.txt"),
            operation: "open",
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("open"), "{msg}");
        assert!(msg.contains("/tmp/missing/result.txt"), "{msg}");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_parse_error_wraps_into_top_level() {
        let err: SeedScoreError = ParseError::InvalidNumber {
            file: PathBuf::from("result.txt"),
            line_number: 4,
            field: "score",
            raw: "abc".to_string(),
        }
        .into();
        assert!(matches!(err, SeedScoreError::Parse(_)));
        assert_eq!(
            err.to_string(),
            "Parse error: 'result.txt' line 4: cannot parse score from 'abc'"
        );
    }

    #[test]
    fn test_missing_value_has_no_source() {
        let err = ParseError::MissingValue {
            file: PathBuf::from("result.txt"),
            line_number: 1,
            marker: "N =",
        };
        assert!(err.source().is_none());
        assert!(err.to_string().contains("'N ='"));
    }
}
