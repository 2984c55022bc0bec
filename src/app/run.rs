// Loganizer - app/run.rs
//
// One `analyze` invocation end to end: load descriptors, dispatch the
// batch, render the console report, export files on request.
//
// Only descriptor loading and export can fail the run. Per-file failures
// are part of the report; whether they change the exit code is the
// caller's decision (see `RunReport::summary`).

use crate::app::dispatch::{self, EngineConfig};
use crate::core::export::{self, ReportFormat};
use crate::core::model::BatchSummary;
use crate::core::report;
use crate::platform::descriptors;
use crate::util::error::{LoganizerError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything one run needs, already resolved from CLI and config.toml.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Descriptor list (JSON or TOML).
    pub descriptors_path: PathBuf,
    /// JSON report destination. Generic names get a date prefix.
    pub json_output: Option<PathBuf>,
    /// CSV report destination, written as given.
    pub csv_output: Option<PathBuf>,
    pub engine: EngineConfig,
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: BatchSummary,
    pub elapsed: Duration,
    /// Report files written, in the order they were written.
    pub written: Vec<PathBuf>,
    /// Non-fatal descriptor list warnings.
    pub warnings: Vec<String>,
}

/// Execute one analysis run, writing the console report to `out`.
pub fn run<W: Write>(options: &RunOptions, mut out: W) -> Result<RunReport> {
    let (descriptors, warnings) = descriptors::load_descriptors(&options.descriptors_path)?;
    for warning in &warnings {
        tracing::warn!(warning = %warning, "Descriptor list warning");
    }

    let outcome = dispatch::analyze_with_progress(
        &descriptors,
        &options.engine,
        |result, completed, total| {
            tracing::debug!(
                id = %result.log_id,
                status = %result.status,
                completed,
                total,
                "Result received"
            );
        },
    );

    let summary = report::render_results(&outcome.results, &mut out).map_err(|source| {
        LoganizerError::Io {
            operation: "write console report",
            source,
        }
    })?;

    let mut written = Vec::new();

    if let Some(ref requested) = options.json_output {
        let path = resolve_json_output(requested, chrono::Local::now().date_naive());
        export::write_report_file(&outcome.results, &path, ReportFormat::Json)?;
        written.push(path);
    }

    if let Some(ref path) = options.csv_output {
        export::write_report_file(&outcome.results, path, ReportFormat::Csv)?;
        written.push(path.clone());
    }

    Ok(RunReport {
        summary,
        elapsed: outcome.elapsed,
        written,
        warnings,
    })
}

/// Apply the date prefix to generic report names; leave others alone.
fn resolve_json_output(requested: &Path, today: chrono::NaiveDate) -> PathBuf {
    if export::is_generic_report_name(requested) {
        export::timestamped_filename(requested, today)
    } else {
        requested.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::inspector::{DelayRange, InspectConfig};
    use crate::util::error::is_not_found;
    use chrono::NaiveDate;
    use std::fs;

    fn options(descriptors_path: PathBuf) -> RunOptions {
        RunOptions {
            descriptors_path,
            json_output: None,
            csv_output: None,
            engine: EngineConfig {
                worker_threads: 2,
                inspect: InspectConfig {
                    delay: DelayRange::none(),
                },
            },
        }
    }

    #[test]
    fn test_resolve_json_output() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(
            resolve_json_output(Path::new("out/report.json"), date),
            PathBuf::from("out/241231_report.json")
        );
        assert_eq!(
            resolve_json_output(Path::new("out/nightly.json"), date),
            PathBuf::from("out/nightly.json")
        );
    }

    #[test]
    fn test_missing_descriptor_list_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = run(&options(dir.path().join("absent.json")), Vec::new()).unwrap_err();
        assert!(matches!(err, LoganizerError::Descriptor(_)));
        assert!(is_not_found(&err));
    }

    #[test]
    fn test_run_writes_console_and_exports() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = dir.path().join("app.log");
        fs::write(&log, "hello\n").unwrap();
        let list = dir.path().join("logs.json");
        fs::write(
            &list,
            serde_json::json!([
                {"id": "app", "path": log.to_string_lossy(), "type": "app"},
                {"id": "gone", "path": dir.path().join("gone.log").to_string_lossy(), "type": "app"}
            ])
            .to_string(),
        )
        .unwrap();

        let mut opts = options(list);
        opts.json_output = Some(dir.path().join("out").join("results.json"));
        opts.csv_output = Some(dir.path().join("out").join("results.csv"));

        let mut console = Vec::new();
        let report = run(&opts, &mut console).unwrap();

        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.ok, 1);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.written.len(), 2);
        assert!(report.written.iter().all(|p| p.is_file()));
        assert!(String::from_utf8(console).unwrap().contains("OK: 1 | FAILED: 1"));
    }
}
