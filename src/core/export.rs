// Loganizer - core/export.rs
//
// CSV and JSON export of analysis results.
// Serialisers write to any Write trait object; `write_report_file` owns the
// on-disk side (parent directory creation, file creation).

use crate::core::model::AnalysisResult;
use crate::util::constants;
use crate::util::error::ExportError;
use chrono::NaiveDate;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Export results to CSV.
///
/// Writes: log_id, file_path, status, message, error_details
pub fn export_csv<W: Write>(
    results: &[AnalysisResult],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: export_path.to_path_buf(),
        source,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["log_id", "file_path", "status", "message", "error_details"])
        .map_err(csv_err)?;

    for result in results {
        csv_writer
            .write_record([
                result.log_id.as_str(),
                result.file_path.as_str(),
                result.status.label(),
                result.message.as_str(),
                result.error_details.as_str(),
            ])
            .map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(results.len())
}

/// Export results to JSON (pretty-printed array of objects).
pub fn export_json<W: Write>(
    results: &[AnalysisResult],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, results).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(results.len())
}

/// Output format for [`write_report_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Csv,
}

/// Write a report to `path`, creating missing parent directories first.
pub fn write_report_file(
    results: &[AnalysisResult],
    path: &Path,
    format: ReportFormat,
) -> Result<usize, ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = fs::File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    let count = match format {
        ReportFormat::Json => export_json(results, &mut writer, path)?,
        ReportFormat::Csv => export_csv(results, &mut writer, path)?,
    };

    writer.flush().map_err(io_err)?;

    tracing::info!(path = %path.display(), results = count, ?format, "Report written");
    Ok(count)
}

/// Prefix the file name of `base` with `date` as `YYMMDD_`, keeping the
/// directory and extension.
///
/// `reports/report.json` on 2025-06-03 becomes `reports/250603_report.json`.
pub fn timestamped_filename(base: &Path, date: NaiveDate) -> PathBuf {
    let prefix = date.format(constants::REPORT_DATE_FORMAT);
    let name = base
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    base.with_file_name(format!("{prefix}_{name}"))
}

/// True if `path` names one of the generic report files that get a date
/// prefix on export.
pub fn is_generic_report_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| constants::GENERIC_REPORT_NAMES.contains(&n))
}
