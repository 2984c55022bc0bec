// Loganizer - core/inspector.rs
//
// Single-file classification. Given one descriptor, decide OK or FAILED
// from filesystem metadata and one full read of the content.
//
// Checks run in strict precedence and the first match wins:
//   stat not-found > stat other failure > directory > zero length >
//   (simulated analysis delay) > read failure > success.
//
// The content is read only to prove it is readable; nothing here looks
// inside it. No state is shared between calls, so `inspect` is safe to run
// from any number of worker threads at once.

use crate::core::model::{AnalysisResult, LogDescriptor};
use crate::util::constants;
use crate::util::error::AnalysisError;
use rand::Rng;
use std::path::Path;
use std::time::Duration;

// =============================================================================
// Configuration
// =============================================================================

/// Inclusive range for the simulated per-file analysis delay.
///
/// The delay models variable per-file work. Batch timing depends on it: a
/// parallel batch should take roughly `max_ms`, a sequential one the sum of
/// all delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    /// Build a range, swapping the bounds if they are given in reverse.
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        if min_ms <= max_ms {
            Self { min_ms, max_ms }
        } else {
            Self {
                min_ms: max_ms,
                max_ms: min_ms,
            }
        }
    }

    /// No delay at all.
    pub fn none() -> Self {
        Self { min_ms: 0, max_ms: 0 }
    }

    /// Draw one delay uniformly from `[min_ms, max_ms]`.
    pub fn sample(&self) -> Duration {
        let (lo, hi) = (self.min_ms.min(self.max_ms), self.min_ms.max(self.max_ms));
        if hi == 0 {
            return Duration::ZERO;
        }
        let ms = rand::thread_rng().gen_range(lo..=hi);
        Duration::from_millis(ms)
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min_ms: constants::DEFAULT_MIN_DELAY_MS,
            max_ms: constants::DEFAULT_MAX_DELAY_MS,
        }
    }
}

/// Per-file inspection settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InspectConfig {
    pub delay: DelayRange,
}

// =============================================================================
// Inspection
// =============================================================================

/// Successful classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Empty,
    Analysed { size: u64 },
}

/// Classify one descriptor. Never fails: every error becomes a `FAILED`
/// result carrying the error's summary and detail.
pub fn inspect(descriptor: &LogDescriptor, config: &InspectConfig) -> AnalysisResult {
    let path = Path::new(&descriptor.path);

    match classify(path, config) {
        Ok(Outcome::Empty) => {
            tracing::debug!(id = %descriptor.id, file = %path.display(), "Empty file");
            AnalysisResult::ok(descriptor, constants::MSG_EMPTY_FILE)
        }
        Ok(Outcome::Analysed { size }) => {
            tracing::debug!(id = %descriptor.id, file = %path.display(), size, "File analysed");
            AnalysisResult::ok(descriptor, success_message(size))
        }
        Err(e) => {
            tracing::debug!(
                id = %descriptor.id,
                kind = ?e.kind(),
                error = %e,
                "File analysis failed"
            );
            AnalysisResult::from_error(descriptor, &e)
        }
    }
}

fn classify(path: &Path, config: &InspectConfig) -> Result<Outcome, AnalysisError> {
    let metadata = std::fs::metadata(path).map_err(|e| AnalysisError::from_stat(path, e))?;

    if metadata.is_dir() {
        return Err(AnalysisError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let size = metadata.len();
    if size == 0 {
        return Ok(Outcome::Empty);
    }

    std::thread::sleep(config.delay.sample());

    std::fs::read(path).map_err(|source| AnalysisError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Outcome::Analysed { size })
}

fn success_message(size: u64) -> String {
    format!("analysis completed successfully, size: {size} bytes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::AnalysisStatus;
    use std::fs;
    use std::time::Instant;

    fn no_delay() -> InspectConfig {
        InspectConfig {
            delay: DelayRange::none(),
        }
    }

    fn descriptor_for(path: &Path) -> LogDescriptor {
        LogDescriptor::new("test", path.to_string_lossy(), "app")
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let d = descriptor_for(&dir.path().join("absent.log"));

        let r = inspect(&d, &no_delay());
        assert_eq!(r.status, AnalysisStatus::Failed);
        assert_eq!(r.message, constants::MSG_NOT_FOUND);
        assert!(!r.error_details.is_empty());
        assert_eq!(r.log_id, "test");
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let d = descriptor_for(dir.path());

        let r = inspect(&d, &no_delay());
        assert_eq!(r.status, AnalysisStatus::Failed);
        assert_eq!(r.message, constants::MSG_IS_DIRECTORY);
        assert_eq!(r.error_details, constants::DETAIL_IS_DIRECTORY);
    }

    #[test]
    fn test_empty_file_is_ok_without_delay() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.log");
        fs::write(&path, "").expect("write empty.log");

        // Default delay: the empty path must short-circuit before sleeping.
        let start = Instant::now();
        let r = inspect(&descriptor_for(&path), &InspectConfig::default());
        assert!(start.elapsed() < Duration::from_millis(constants::DEFAULT_MIN_DELAY_MS));

        assert_eq!(r.status, AnalysisStatus::Ok);
        assert_eq!(r.message, constants::MSG_EMPTY_FILE);
        assert!(r.error_details.is_empty());
    }

    #[test]
    fn test_readable_file_reports_size() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("app.log");
        fs::write(&path, "2024-01-01 INFO started\n").expect("write app.log");

        let r = inspect(&descriptor_for(&path), &no_delay());
        assert_eq!(r.status, AnalysisStatus::Ok);
        assert!(r.message.contains("24 bytes"), "message was {:?}", r.message);
        assert!(r.error_details.is_empty());
    }

    #[test]
    fn test_default_delay_is_applied_to_non_empty_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("app.log");
        fs::write(&path, "x").expect("write app.log");

        let start = Instant::now();
        let r = inspect(&descriptor_for(&path), &InspectConfig::default());
        assert!(r.is_ok());
        assert!(start.elapsed() >= Duration::from_millis(constants::DEFAULT_MIN_DELAY_MS));
    }

    #[test]
    fn test_delay_sample_stays_in_range() {
        let range = DelayRange::default();
        for _ in 0..200 {
            let d = range.sample().as_millis() as u64;
            assert!((range.min_ms..=range.max_ms).contains(&d), "{d} out of range");
        }
        assert_eq!(DelayRange::none().sample(), Duration::ZERO);
    }

    #[test]
    fn test_delay_range_swaps_reversed_bounds() {
        assert_eq!(DelayRange::new(200, 50), DelayRange::new(50, 200));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_is_read_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("locked.log");
        fs::write(&path, "secret").expect("write locked.log");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).expect("chmod");

        // Root ignores file modes; nothing to assert in that case.
        if fs::read(&path).is_ok() {
            return;
        }

        let r = inspect(&descriptor_for(&path), &no_delay());
        assert_eq!(r.status, AnalysisStatus::Failed);
        assert_eq!(r.message, constants::MSG_READ_ERROR);
        assert!(!r.error_details.is_empty());

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod back");
    }

    #[cfg(unix)]
    #[test]
    fn test_unsearchable_parent_is_access_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).expect("mkdir locked");
        let path = locked.join("app.log");
        fs::write(&path, "data").expect("write app.log");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");

        if fs::metadata(&path).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod back");
            return;
        }

        let r = inspect(&descriptor_for(&path), &no_delay());
        assert_eq!(r.status, AnalysisStatus::Failed);
        assert_eq!(r.message, constants::MSG_ACCESS_DENIED);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod back");
    }
}
