// SeedScore - platform/fs.rs
//
// Filesystem access for the report file.

use crate::util::constants::DEFAULT_RESULT_FILE;
use crate::util::error::{Result, SeedScoreError};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Open the report for buffered reading.
///
/// The handle is released when the reader is dropped, on success and on
/// every error path of the scan.
pub fn open_report(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| SeedScoreError::Io {
        path: path.to_path_buf(),
        operation: "open",
        source: e,
    })?;
    tracing::debug!(path = %path.display(), "Report opened");
    Ok(BufReader::new(file))
}

/// `<cwd>/result.txt`.
pub fn default_report_path() -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(|e| SeedScoreError::Io {
        path: PathBuf::from("."),
        operation: "resolve working directory",
        source: e,
    })?;
    Ok(cwd.join(DEFAULT_RESULT_FILE))
}
