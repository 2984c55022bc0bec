// Loganizer - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "Loganizer";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "Loganizer";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Analysis engine
// =============================================================================

/// Lower bound (inclusive) of the simulated per-file analysis delay, in ms.
pub const DEFAULT_MIN_DELAY_MS: u64 = 50;

/// Upper bound (inclusive) of the simulated per-file analysis delay, in ms.
pub const DEFAULT_MAX_DELAY_MS: u64 = 200;

/// Hard upper bound on a configured delay bound. Keeps a typo in config.toml
/// from turning a batch into a multi-minute wait.
pub const ABSOLUTE_MAX_DELAY_MS: u64 = 10_000;

/// Default number of worker threads for the dispatcher pool.
/// 0 means auto-detect (use available CPU cores).
pub const DEFAULT_WORKER_THREADS: usize = 0;

/// Hard upper bound on the dispatcher pool size.
pub const ABSOLUTE_MAX_WORKER_THREADS: usize = 256;

/// Thread name prefix for dispatcher pool workers.
pub const WORKER_THREAD_PREFIX: &str = "loganizer-worker";

// =============================================================================
// Result messages
// =============================================================================

pub const MSG_NOT_FOUND: &str = "file not found";
pub const MSG_ACCESS_DENIED: &str = "cannot access file";
pub const MSG_IS_DIRECTORY: &str = "path is a directory, not a file";
pub const MSG_EMPTY_FILE: &str = "empty file — analysis complete";
pub const MSG_READ_ERROR: &str = "error reading file";
pub const MSG_INSPECTION_ABORTED: &str = "inspection aborted";

/// Fixed diagnostic placed in `error_details` for directory paths.
pub const DETAIL_IS_DIRECTORY: &str = "path is a directory";

// =============================================================================
// Descriptor lists
// =============================================================================

/// Maximum size of a descriptor list file in bytes.
pub const MAX_DESCRIPTOR_FILE_SIZE: u64 = 4 * 1024 * 1024; // 4 MB

// =============================================================================
// Export
// =============================================================================

/// Default JSON report file name.
pub const DEFAULT_REPORT_NAME: &str = "report.json";

/// Report names considered generic enough to get a date prefix on export.
pub const GENERIC_REPORT_NAMES: &[&str] = &["report.json", "rapport.json"];

/// Date prefix format for timestamped report names (YYMMDD).
pub const REPORT_DATE_FORMAT: &str = "%y%m%d";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted from config.toml.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

// =============================================================================
// Process exit codes
// =============================================================================

/// Descriptor list or export failure.
pub const EXIT_FATAL: u8 = 1;

/// `--strict` was given and at least one file failed analysis.
pub const EXIT_FAILED_FILES: u8 = 2;
