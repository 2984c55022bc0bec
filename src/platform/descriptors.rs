// Loganizer - platform/descriptors.rs
//
// Descriptor list loading and validation: the only batch-level fatal path.
// Everything that reaches the engine has passed through here, so the engine
// can assume non-empty id/path/type on every descriptor.
//
// Accepted formats, chosen by extension:
//   - `.toml`: `[[logs]]` tables with id / path / type keys
//   - anything else: a JSON array of {"id", "path", "type"} objects

use crate::core::model::LogDescriptor;
use crate::util::constants;
use crate::util::error::{AnalysisError, DescriptorError};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// TOML shape: a top-level `logs` array of tables.
#[derive(Debug, Default, Deserialize)]
struct TomlDescriptorList {
    #[serde(default)]
    logs: Vec<LogDescriptor>,
}

/// Load and validate a descriptor list.
///
/// Returns the descriptors in file order plus non-fatal warnings (currently
/// duplicate ids). Any structural problem is a `DescriptorError`.
pub fn load_descriptors(
    path: &Path,
) -> Result<(Vec<LogDescriptor>, Vec<String>), DescriptorError> {
    let metadata = std::fs::metadata(path).map_err(|e| match AnalysisError::from_stat(path, e) {
        AnalysisError::Access { source, .. } => DescriptorError::Io {
            path: path.to_path_buf(),
            source,
        },
        err => DescriptorError::Missing { source: err },
    })?;

    if metadata.len() > constants::MAX_DESCRIPTOR_FILE_SIZE {
        return Err(DescriptorError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: constants::MAX_DESCRIPTOR_FILE_SIZE,
        });
    }

    let bytes = std::fs::read(path).map_err(|source| DescriptorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|e| DescriptorError::Decode {
        path: path.to_path_buf(),
        source: AnalysisError::parse("UTF-8 descriptor list", e),
    })?;

    if content.trim().is_empty() {
        return Err(DescriptorError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    let descriptors = if has_toml_extension(path) {
        parse_toml(&content)
    } else {
        parse_json(&content)
    }
    .map_err(|source| DescriptorError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    if descriptors.is_empty() {
        return Err(DescriptorError::NoEntries {
            path: path.to_path_buf(),
        });
    }

    validate(&descriptors)?;
    let warnings = duplicate_id_warnings(&descriptors);

    tracing::info!(
        path = %path.display(),
        descriptors = descriptors.len(),
        warnings = warnings.len(),
        "Descriptor list loaded"
    );

    Ok((descriptors, warnings))
}

/// Decode a JSON descriptor array.
pub fn parse_json(content: &str) -> Result<Vec<LogDescriptor>, AnalysisError> {
    serde_json::from_str(content).map_err(|e| AnalysisError::parse("JSON descriptor list", e))
}

/// Decode a TOML document of `[[logs]]` tables.
pub fn parse_toml(content: &str) -> Result<Vec<LogDescriptor>, AnalysisError> {
    toml::from_str::<TomlDescriptorList>(content)
        .map(|list| list.logs)
        .map_err(|e| AnalysisError::parse("TOML descriptor list", e))
}

/// Reject the first entry with an empty required field.
pub fn validate(descriptors: &[LogDescriptor]) -> Result<(), DescriptorError> {
    for (index, d) in descriptors.iter().enumerate() {
        let missing = if d.id.trim().is_empty() {
            Some("id")
        } else if d.path.trim().is_empty() {
            Some("path")
        } else if d.kind.trim().is_empty() {
            Some("type")
        } else {
            None
        };

        if let Some(field) = missing {
            return Err(DescriptorError::MissingField { index, field });
        }
    }
    Ok(())
}

fn duplicate_id_warnings(descriptors: &[LogDescriptor]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut warnings = Vec::new();
    for (index, d) in descriptors.iter().enumerate() {
        if !seen.insert(d.id.as_str()) {
            warnings.push(format!(
                "entry {index}: duplicate id '{}'; results for this id will be ambiguous",
                d.id
            ));
        }
    }
    warnings
}

fn has_toml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"))
}
