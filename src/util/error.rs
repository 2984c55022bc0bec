// Loganizer - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation: callers discriminate on variants and
// kinds, never on message text. All errors preserve the causal chain via
// `std::error::Error::source` for diagnostic logging.

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::util::constants;

/// Top-level error type for batch-level Loganizer operations.
///
/// Per-file analysis failures never appear here; they are folded into
/// `FAILED` results by the inspector.
#[derive(Debug)]
pub enum LoganizerError {
    /// The descriptor list could not be loaded or validated.
    Descriptor(DescriptorError),

    /// Writing a report failed.
    Export(ExportError),

    /// I/O error outside of any specific file (e.g. writing to stdout).
    Io {
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for LoganizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Descriptor(e) => write!(f, "Descriptor error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Io { operation, source } => write!(f, "I/O error during {operation}: {source}"),
        }
    }
}

impl StdError for LoganizerError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Descriptor(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Analysis errors
// ---------------------------------------------------------------------------

/// Discriminant for [`AnalysisError`], usable in `match` without borrowing
/// the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisErrorKind {
    NotFound,
    Access,
    NotAFile,
    Read,
    Parse,
}

/// Per-file analysis failure.
///
/// The inspector converts every variant into a `FAILED` result; the type is
/// also reused by the descriptor loader so that a missing list file or an
/// undecodable list can be recognised with [`is_not_found`] /
/// [`is_parse_error`] anywhere up the chain.
#[derive(Debug)]
pub enum AnalysisError {
    /// The path does not resolve.
    NotFound { path: PathBuf, source: io::Error },

    /// Stat failed for a reason other than not-found (e.g. permission denied).
    Access { path: PathBuf, source: io::Error },

    /// The path resolves to a directory.
    NotAFile { path: PathBuf },

    /// Stat succeeded but reading the content failed.
    Read { path: PathBuf, source: io::Error },

    /// A parsing step failed. `operation` names the step.
    Parse {
        operation: String,
        source: Box<dyn StdError + Send + Sync + 'static>,
    },
}

impl AnalysisError {
    pub fn not_found(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::NotFound {
            path: path.into(),
            source,
        }
    }

    pub fn parse(
        operation: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
    ) -> Self {
        Self::Parse {
            operation: operation.into(),
            source: source.into(),
        }
    }

    /// Classify a failed `metadata()` call: NotFound when the OS says so,
    /// Access for everything else.
    pub fn from_stat(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
                source,
            }
        } else {
            Self::Access {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn kind(&self) -> AnalysisErrorKind {
        match self {
            Self::NotFound { .. } => AnalysisErrorKind::NotFound,
            Self::Access { .. } => AnalysisErrorKind::Access,
            Self::NotAFile { .. } => AnalysisErrorKind::NotAFile,
            Self::Read { .. } => AnalysisErrorKind::Read,
            Self::Parse { .. } => AnalysisErrorKind::Parse,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == AnalysisErrorKind::NotFound
    }

    pub fn is_parse(&self) -> bool {
        self.kind() == AnalysisErrorKind::Parse
    }

    /// Short human-readable summary used as the result `message`.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => constants::MSG_NOT_FOUND,
            Self::Access { .. } => constants::MSG_ACCESS_DENIED,
            Self::NotAFile { .. } => constants::MSG_IS_DIRECTORY,
            Self::Read { .. } => constants::MSG_READ_ERROR,
            Self::Parse { .. } => "error parsing file",
        }
    }

    /// Diagnostic text used as the result `error_details`: the underlying
    /// cause where one exists, a fixed string otherwise.
    pub fn detail(&self) -> String {
        match self {
            Self::NotFound { source, .. }
            | Self::Access { source, .. }
            | Self::Read { source, .. } => source.to_string(),
            Self::NotAFile { .. } => constants::DETAIL_IS_DIRECTORY.to_string(),
            Self::Parse { source, .. } => source.to_string(),
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path, .. } => write!(f, "file not found: '{}'", path.display()),
            Self::Access { path, source } => {
                write!(f, "cannot access '{}': {source}", path.display())
            }
            Self::NotAFile { path } => {
                write!(f, "'{}' is a directory, not a file", path.display())
            }
            Self::Read { path, source } => {
                write!(f, "error reading '{}': {source}", path.display())
            }
            Self::Parse { operation, source } => write!(f, "parse error in {operation}: {source}"),
        }
    }
}

impl StdError for AnalysisError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::NotFound { source, .. }
            | Self::Access { source, .. }
            | Self::Read { source, .. } => Some(source),
            Self::NotAFile { .. } => None,
            Self::Parse { source, .. } => Some(source.as_ref()),
        }
    }
}

/// Walk `err` and its `source()` chain, returning true if any link is an
/// [`AnalysisError`] satisfying `pred`.
fn chain_contains(err: &(dyn StdError + 'static), pred: fn(&AnalysisError) -> bool) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(analysis) = e.downcast_ref::<AnalysisError>() {
            if pred(analysis) {
                return true;
            }
        }
        current = e.source();
    }
    false
}

/// True if `err`, or anything in its cause chain, is a not-found error.
pub fn is_not_found(err: &(dyn StdError + 'static)) -> bool {
    chain_contains(err, AnalysisError::is_not_found)
}

/// True if `err`, or anything in its cause chain, is a parse error.
pub fn is_parse_error(err: &(dyn StdError + 'static)) -> bool {
    chain_contains(err, AnalysisError::is_parse)
}

// ---------------------------------------------------------------------------
// Descriptor errors
// ---------------------------------------------------------------------------

/// Errors loading or validating a descriptor list. All of them are fatal
/// for the batch and surface before any analysis begins.
#[derive(Debug)]
pub enum DescriptorError {
    /// The descriptor list file does not exist.
    Missing { source: AnalysisError },

    /// The descriptor list file exceeds the maximum allowed size.
    FileTooLarge { path: PathBuf, size: u64, max_size: u64 },

    /// The descriptor list file could not be read.
    Io { path: PathBuf, source: io::Error },

    /// The descriptor list file has no content.
    EmptyFile { path: PathBuf },

    /// The content could not be decoded as a descriptor list.
    Decode { path: PathBuf, source: AnalysisError },

    /// The list decoded but contains no entries.
    NoEntries { path: PathBuf },

    /// Entry `index` (0-based) has an empty required field.
    MissingField { index: usize, field: &'static str },
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { source } => write!(f, "descriptor list not found: {source}"),
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Descriptor list '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "Cannot read descriptor list '{}': {source}", path.display())
            }
            Self::EmptyFile { path } => {
                write!(f, "Descriptor list '{}' is empty", path.display())
            }
            Self::Decode { path, source } => {
                write!(f, "Descriptor list '{}': {source}", path.display())
            }
            Self::NoEntries { path } => {
                write!(f, "Descriptor list '{}' contains no entries", path.display())
            }
            Self::MissingField { index, field } => {
                write!(f, "entry {index}: missing required field '{field}'")
            }
        }
    }
}

impl StdError for DescriptorError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Missing { source } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DescriptorError> for LoganizerError {
    fn from(e: DescriptorError) -> Self {
        Self::Descriptor(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to report export.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error creating directories or writing the export file.
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

impl StdError for ExportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for LoganizerError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Problems found while loading `config.toml`.
///
/// These are never fatal: the loader falls back to defaults and returns
/// them as warnings.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
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

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for Loganizer results.
pub type Result<T> = std::result::Result<T, LoganizerError>;
