// Loganizer - platform/config.rs
//
// Platform config directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for Loganizer configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/loganizer/ or %APPDATA%\Loganizer\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
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
    /// `[engine]` section.
    pub engine: EngineSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[engine]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct EngineSection {
    /// Dispatcher pool size (0 = auto).
    pub worker_threads: Option<usize>,
    /// Lower bound of the simulated analysis delay in ms.
    pub min_delay_ms: Option<u64>,
    /// Upper bound of the simulated analysis delay in ms.
    pub max_delay_ms: Option<u64>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Dispatcher pool size; 0 means one worker per available core.
    pub worker_threads: usize,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            worker_threads: constants::DEFAULT_WORKER_THREADS,
            min_delay_ms: constants::DEFAULT_MIN_DELAY_MS,
            max_delay_ms: constants::DEFAULT_MAX_DELAY_MS,
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from `config_dir`.
///
/// Returns the validated config and every problem found. Nothing here is
/// fatal: a missing file yields defaults silently, an unreadable or
/// unparseable file yields defaults plus one error, and each out-of-range
/// value keeps its default and adds one error.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<ConfigError>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(source) => {
            return (
                AppConfig::default(),
                vec![ConfigError::Io {
                    path: config_path,
                    source,
                }],
            );
        }
    };

    match toml::from_str::<RawConfig>(&content) {
        Ok(raw) => {
            tracing::info!(path = %config_path.display(), "Loaded config.toml");
            validate(raw)
        }
        Err(source) => (
            AppConfig::default(),
            vec![ConfigError::TomlParse {
                path: config_path,
                source,
            }],
        ),
    }
}

/// Check every raw value against the named bounds.
fn validate(raw: RawConfig) -> (AppConfig, Vec<ConfigError>) {
    let mut config = AppConfig::default();
    let mut errors = Vec::new();

    if let Some(threads) = raw.engine.worker_threads {
        if threads <= constants::ABSOLUTE_MAX_WORKER_THREADS {
            config.worker_threads = threads;
        } else {
            errors.push(ConfigError::ValueOutOfRange {
                field: "engine.worker_threads".to_string(),
                value: threads.to_string(),
                expected: format!("0-{}", constants::ABSOLUTE_MAX_WORKER_THREADS),
            });
        }
    }

    for (field, value, slot) in [
        ("engine.min_delay_ms", raw.engine.min_delay_ms, &mut config.min_delay_ms),
        ("engine.max_delay_ms", raw.engine.max_delay_ms, &mut config.max_delay_ms),
    ] {
        let Some(ms) = value else { continue };
        if ms <= constants::ABSOLUTE_MAX_DELAY_MS {
            *slot = ms;
        } else {
            errors.push(ConfigError::ValueOutOfRange {
                field: field.to_string(),
                value: ms.to_string(),
                expected: format!("0-{}", constants::ABSOLUTE_MAX_DELAY_MS),
            });
        }
    }

    if config.min_delay_ms > config.max_delay_ms {
        errors.push(ConfigError::ValueOutOfRange {
            field: "engine.min_delay_ms".to_string(),
            value: config.min_delay_ms.to_string(),
            expected: format!("<= engine.max_delay_ms ({})", config.max_delay_ms),
        });
        config.min_delay_ms = constants::DEFAULT_MIN_DELAY_MS;
        config.max_delay_ms = constants::DEFAULT_MAX_DELAY_MS;
    }

    if let Some(level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level);
        } else {
            errors.push(ConfigError::ValueOutOfRange {
                field: "logging.level".to_string(),
                value: level,
                expected: constants::VALID_LOG_LEVELS.join(", "),
            });
        }
    }

    (config, errors)
}
