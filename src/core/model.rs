// Loganizer - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Log descriptor (input)
// =============================================================================

/// One log file to analyse, as supplied by a descriptor list.
///
/// Fields default to empty on deserialisation so that a missing key is
/// reported by the loader's validation pass, with the entry index, rather
/// than as an opaque decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDescriptor {
    /// Caller-chosen identifier. Should be unique within a batch.
    #[serde(default)]
    pub id: String,

    /// Filesystem path of the log file.
    #[serde(default)]
    pub path: String,

    /// Free-form tag describing the log source (e.g. "nginx-access").
    #[serde(default, rename = "type", alias = "kind")]
    pub kind: String,
}

impl LogDescriptor {
    pub fn new(id: impl Into<String>, path: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            kind: kind.into(),
        }
    }
}

// =============================================================================
// Analysis status
// =============================================================================

/// Terminal classification of a single file. There are no intermediate
/// states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnalysisStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "FAILED")]
    Failed,
}

impl AnalysisStatus {
    /// Label used in console output and CSV export.
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisStatus::Ok => "OK",
            AnalysisStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Analysis result (output)
// =============================================================================

/// Outcome of analysing one descriptor.
///
/// Serialised field names are part of the report format and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub log_id: String,
    pub file_path: String,
    pub status: AnalysisStatus,
    /// Human-readable summary.
    pub message: String,
    /// Underlying cause; empty for `OK` results.
    pub error_details: String,
}

impl AnalysisResult {
    pub fn ok(descriptor: &LogDescriptor, message: impl Into<String>) -> Self {
        Self {
            log_id: descriptor.id.clone(),
            file_path: descriptor.path.clone(),
            status: AnalysisStatus::Ok,
            message: message.into(),
            error_details: String::new(),
        }
    }

    pub fn failed(
        descriptor: &LogDescriptor,
        message: impl Into<String>,
        error_details: impl Into<String>,
    ) -> Self {
        Self {
            log_id: descriptor.id.clone(),
            file_path: descriptor.path.clone(),
            status: AnalysisStatus::Failed,
            message: message.into(),
            error_details: error_details.into(),
        }
    }

    /// Fold a typed analysis failure into a `FAILED` result.
    pub fn from_error(descriptor: &LogDescriptor, err: &AnalysisError) -> Self {
        Self::failed(descriptor, err.summary(), err.detail())
    }

    pub fn is_ok(&self) -> bool {
        self.status == AnalysisStatus::Ok
    }
}

// =============================================================================
// Batch summary
// =============================================================================

/// Counts of OK vs FAILED results for a completed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub ok: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[AnalysisResult]) -> Self {
        let ok = results.iter().filter(|r| r.is_ok()).count();
        Self {
            total: results.len(),
            ok,
            failed: results.len() - ok,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_reads_type_key_and_kind_alias() {
        let d: LogDescriptor =
            serde_json::from_str(r#"{"id":"web","path":"/var/log/a.log","type":"nginx"}"#)
                .unwrap();
        assert_eq!(d.kind, "nginx");

        let d: LogDescriptor =
            serde_json::from_str(r#"{"id":"web","path":"/var/log/a.log","kind":"nginx"}"#)
                .unwrap();
        assert_eq!(d.kind, "nginx");
    }

    #[test]
    fn test_descriptor_missing_fields_default_to_empty() {
        let d: LogDescriptor = serde_json::from_str(r#"{"id":"web"}"#).unwrap();
        assert!(d.path.is_empty());
        assert!(d.kind.is_empty());
    }

    #[test]
    fn test_result_serialises_with_report_field_names() {
        let d = LogDescriptor::new("db", "/var/log/db.log", "postgres");
        let r = AnalysisResult::failed(&d, "file not found", "No such file or directory");
        let value = serde_json::to_value(&r).unwrap();

        assert_eq!(value["log_id"], "db");
        assert_eq!(value["file_path"], "/var/log/db.log");
        assert_eq!(value["status"], "FAILED");
        assert_eq!(value["message"], "file not found");
        assert_eq!(value["error_details"], "No such file or directory");
    }

    #[test]
    fn test_summary_counts() {
        let d = LogDescriptor::new("a", "a.log", "app");
        let results = vec![
            AnalysisResult::ok(&d, "fine"),
            AnalysisResult::failed(&d, "bad", "x"),
            AnalysisResult::ok(&d, "fine"),
        ];
        let s = BatchSummary::from_results(&results);
        assert_eq!(s, BatchSummary { total: 3, ok: 2, failed: 1 });
        assert!(s.has_failures());
        assert!(!BatchSummary::from_results(&[]).has_failures());
    }
}
