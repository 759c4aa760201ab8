// SeedScore - core/export.rs
//
// CSV and JSON export of a finished summary.
// Core layer: writes to any Write trait object.

use crate::core::model::{RecordSummary, Summary};
use crate::util::error::ExportError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// `.csv` (any case) selects CSV; everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

/// Text form of a score as printed on stdout (`5.0`, `inf`, `NaN`).
pub fn format_score(value: f64) -> String {
    format!("{value:?}")
}

/// JSON document wrapping a summary.
///
/// serde_json writes non-finite floats as `null`, so the mean and each
/// record's accumulated score are carried a second time as text.
#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    generated_at: DateTime<Utc>,
    source: &'a Path,
    sum: f64,
    count: u64,
    mean: f64,
    mean_text: String,
    undersized_runs: &'a [u64],
    skipped_lines: u64,
    records: Vec<ExportRecord<'a>>,
}

#[derive(Debug, Serialize)]
struct ExportRecord<'a> {
    #[serde(flatten)]
    record: &'a RecordSummary,
    score_text: String,
}

/// Export the summary to JSON.
pub fn export_json<W: Write>(
    summary: &Summary,
    source: &Path,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let doc = ExportDocument {
        generated_at: Utc::now(),
        source,
        sum: summary.sum,
        count: summary.count,
        mean: summary.mean,
        mean_text: format_score(summary.mean),
        undersized_runs: &summary.undersized_runs,
        skipped_lines: summary.skipped_lines,
        records: summary
            .records
            .iter()
            .map(|record| ExportRecord {
                record,
                score_text: format_score(record.score),
            })
            .collect(),
    };
    serde_json::to_writer_pretty(writer, &doc).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(summary.records.len())
}

/// Export one row per record to CSV.
///
/// Writes: seed, size, raw_score, score, outcome
pub fn export_csv<W: Write>(
    records: &[RecordSummary],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["seed", "size", "raw_score", "score", "outcome"])
        .map_err(csv_err)?;

    let mut count = 0;
    for record in records {
        let seed = record.seed.to_string();
        let size = record.size.map(|s| s.to_string()).unwrap_or_default();
        let raw_score = format_score(record.raw_score);
        let score = format_score(record.score);
        csv_writer
            .write_record([
                seed.as_str(),
                size.as_str(),
                raw_score.as_str(),
                score.as_str(),
                record.outcome.label(),
            ])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Create `export_path` and write the summary in the format its extension
/// selects. Returns the number of records written.
pub fn export_to_path(
    summary: &Summary,
    source: &Path,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let file = std::fs::File::create(export_path).map_err(|e| ExportError::Io {
        path: PathBuf::from(export_path),
        source: e,
    })?;
    let writer = std::io::BufWriter::new(file);
    let format = ExportFormat::from_path(export_path);
    let count = match format {
        ExportFormat::Csv => export_csv(&summary.records, writer, export_path)?,
        ExportFormat::Json => export_json(summary, source, writer, export_path)?,
    };
    tracing::info!(path = %export_path.display(), ?format, records = count, "Export written");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::aggregate;
    use crate::core::model::MalformedPolicy;

    fn sample_summary() -> Summary {
        let content = "N = 10\nScore = 5.0\nN = 20\nScore = -1\nScore = 0\n";
        let mut sink = Vec::new();
        aggregate(
            content.as_bytes(),
            Path::new("result.txt"),
            MalformedPolicy::Fatal,
            &mut sink,
        )
        .unwrap()
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("out.csv")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("OUT.CSV")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("out.json")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("out")), ExportFormat::Json);
    }

    #[test]
    fn test_format_score_text() {
        assert_eq!(format_score(5.0), "5.0");
        assert_eq!(format_score(f64::INFINITY), "inf");
        assert_eq!(format_score(f64::NAN), "NaN");
    }

    #[test]
    fn test_export_csv() {
        let summary = sample_summary();
        let mut buf = Vec::new();
        let count = export_csv(&summary.records, &mut buf, Path::new("test.csv")).unwrap();
        assert_eq!(count, 3);
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "seed,size,raw_score,score,outcome");
        assert_eq!(lines[1], "1001,10,5.0,5.0,counted");
        assert_eq!(lines[2], "1002,20,-1.0,inf,over");
        assert_eq!(lines[3], "1003,,0.0,0.0,zero");
    }

    #[test]
    fn test_export_json_keeps_non_finite_mean_as_text() {
        let summary = sample_summary();
        let mut buf = Vec::new();
        export_json(&summary, Path::new("result.txt"), &mut buf, Path::new("t.json")).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["mean_text"], "inf");
        assert!(value["mean"].is_null());
        assert_eq!(value["count"], 3);
        assert_eq!(value["undersized_runs"], serde_json::json!([1]));
        assert_eq!(value["records"][1]["outcome"]["kind"], "over");
        assert_eq!(value["records"][1]["outcome"]["seed"], 1002);
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn test_export_json_keeps_infinite_record_score_as_text() {
        let summary = sample_summary();
        let mut buf = Vec::new();
        export_json(&summary, Path::new("result.txt"), &mut buf, Path::new("t.json")).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let over = &value["records"][1];
        assert!(over["score"].is_null());
        assert_eq!(over["score_text"], "inf");
        assert_eq!(over["raw_score"], -1.0);
        assert_eq!(value["records"][0]["score_text"], "5.0");
        assert_eq!(value["records"][0]["seed"], 1001);
    }
}
