// SeedScore - platform/config.rs
//
// Platform config directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::MalformedPolicy;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::io;
use std::path::{Path, PathBuf};

/// Resolved platform paths for SeedScore configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/seedscore/ or %APPDATA%\seedscore\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined,
    /// returning a warning for the caller to log. Runs before logging is
    /// initialised, so nothing is logged here.
    pub fn resolve() -> (Self, Option<String>) {
        Self::from_project_dirs(ProjectDirs::from("", "", constants::APP_ID))
    }

    fn from_project_dirs(proj_dirs: Option<ProjectDirs>) -> (Self, Option<String>) {
        match proj_dirs {
            Some(proj_dirs) => (
                Self {
                    config_dir: proj_dirs.config_dir().to_path_buf(),
                },
                None,
            ),
            None => (
                Self {
                    config_dir: PathBuf::from("."),
                },
                Some(
                    "Could not determine platform directories, using current directory"
                        .to_string(),
                ),
            ),
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[input]` section.
    pub input: InputSection,
    /// `[parsing]` section.
    pub parsing: ParsingSection,
    /// `[report]` section.
    pub report: ReportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[input]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct InputSection {
    /// Report file path. Relative paths resolve against the working directory.
    pub path: Option<String>,
}

/// `[parsing]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ParsingSection {
    /// "fatal" or "skip".
    pub on_malformed: Option<String>,
}

/// `[report]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// Print the undersized run list after the mean.
    pub show_undersized: Option<bool>,
    /// Write a JSON/CSV export of the summary here.
    pub export: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated configuration derived from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub input_path: Option<PathBuf>,
    pub malformed_policy: MalformedPolicy,
    pub show_undersized: bool,
    pub export_path: Option<PathBuf>,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

/// Parse config.toml content.
pub fn parse_config_toml(content: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Validate a raw config, collecting a warning for every rejected value.
/// Rejected values keep their defaults.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    if let Some(path) = raw.input.path.filter(|p| !p.is_empty()) {
        config.input_path = Some(PathBuf::from(path));
    }

    if let Some(ref policy) = raw.parsing.on_malformed {
        match MalformedPolicy::from_name(policy) {
            Some(p) => config.malformed_policy = p,
            None => warnings.push(
                ConfigError::ValueOutOfRange {
                    field: "parsing.on_malformed".to_string(),
                    value: policy.clone(),
                    expected: "\"fatal\" or \"skip\" (using fatal)".to_string(),
                }
                .to_string(),
            ),
        }
    }

    if let Some(show) = raw.report.show_undersized {
        config.show_undersized = show;
    }

    if let Some(export) = raw.report.export.filter(|p| !p.is_empty()) {
        config.export_path = Some(PathBuf::from(export));
    }

    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(
                ConfigError::ValueOutOfRange {
                    field: "logging.level".to_string(),
                    value: level.clone(),
                    expected: format!(
                        "error, warn, info, debug, trace (using {})",
                        constants::DEFAULT_LOG_LEVEL
                    ),
                }
                .to_string(),
            );
        }
    }

    (config, warnings)
}

/// Load and validate config.toml at `path`.
///
/// Nothing is logged here: every problem comes back in the warning list,
/// since this runs before logging is initialised.
///
/// With `required == false` (the platform default location) a missing file
/// yields defaults, and an unreadable or unparseable file yields defaults
/// plus a warning. With `required == true` (an explicit `--config`) both
/// are errors.
pub fn load_config(path: &Path, required: bool) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if !required && e.kind() == io::ErrorKind::NotFound => {
            return Ok((AppConfig::default(), Vec::new()));
        }
        Err(e) => {
            let err = ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            };
            if required {
                return Err(err);
            }
            return Ok((AppConfig::default(), vec![format!("{err}. Using defaults.")]));
        }
    };

    let raw = match parse_config_toml(&content, path) {
        Ok(raw) => raw,
        Err(err) if !required => {
            return Ok((AppConfig::default(), vec![format!("{err}. Using defaults.")]));
        }
        Err(err) => return Err(err),
    };

    Ok(validate(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_platform_fallback_returns_warning() {
        let (paths, warning) = PlatformPaths::from_project_dirs(None);
        assert_eq!(paths.config_dir, PathBuf::from("."));
        assert!(warning.unwrap().contains("platform directories"));
        assert_eq!(paths.config_file(), PathBuf::from(".").join("config.toml"));
    }

    #[test]
    fn test_resolve_points_at_config_toml() {
        let (paths, _) = PlatformPaths::resolve();
        assert_eq!(paths.config_file().file_name().unwrap(), "config.toml");
    }

    #[test]
    fn test_validation_warnings_returned_from_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[logging]\nlevel = \"loud\"\n").unwrap();
        let (config, warnings) = load_config(&path, false).unwrap();
        assert_eq!(config.log_level, None);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("logging.level"));
    }

    #[test]
    fn test_full_config_parses() {
        let toml = r#"
[input]
path = "runs/result.txt"

[parsing]
on_malformed = "skip"

[report]
show_undersized = true
export = "summary.csv"

[logging]
level = "DEBUG"
"#;
        let raw = parse_config_toml(toml, Path::new("config.toml")).unwrap();
        let (config, warnings) = validate(raw);
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.input_path, Some(PathBuf::from("runs/result.txt")));
        assert_eq!(config.malformed_policy, MalformedPolicy::Skip);
        assert!(config.show_undersized);
        assert_eq!(config.export_path, Some(PathBuf::from("summary.csv")));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_values_warn_and_keep_defaults() {
        let toml = r#"
[parsing]
on_malformed = "retry"

[logging]
level = "loud"
"#;
        let raw = parse_config_toml(toml, Path::new("config.toml")).unwrap();
        let (config, warnings) = validate(raw);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("parsing.on_malformed"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let raw = parse_config_toml("[future]\nknob = 1\n", Path::new("c.toml")).unwrap();
        let (config, warnings) = validate(raw);
        assert!(warnings.is_empty());
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_missing_default_config_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"), false).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(&dir.path().join("config.toml"), true);
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_unparseable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[report\nshow_undersized = ").unwrap();

        let (config, warnings) = load_config(&path, false).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);

        assert!(matches!(
            load_config(&path, true),
            Err(ConfigError::TomlParse { .. })
        ));
    }
}
