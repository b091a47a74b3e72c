//! Specification files: the nested `task → variable → phase → range` mapping
//! as JSON or YAML. Writing then reading reproduces the same mapping.

use std::path::Path;

use gait_core::errors::StorageError;
use gait_validation::spec::{NestedSpecification, ValidationSpecification};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Yaml,
}

impl SpecFormat {
    /// Pick a format from the file extension: `.json`, `.yaml` or `.yml`.
    pub fn from_path(path: &Path) -> Result<Self, StorageError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(StorageError::UnsupportedFormat { extension: ext }),
        }
    }
}

pub fn encode(spec: &ValidationSpecification, format: SpecFormat) -> Result<String, StorageError> {
    let nested = spec.to_nested();
    let encoded = match format {
        SpecFormat::Json => serde_json::to_string_pretty(&nested).map_err(|e| e.to_string()),
        SpecFormat::Yaml => serde_yaml::to_string(&nested).map_err(|e| e.to_string()),
    };
    encoded.map_err(|message| StorageError::Serialization { message })
}

/// Parse and validate. Unknown labels and invalid ranges are rejected.
pub fn decode(text: &str, format: SpecFormat) -> Result<ValidationSpecification, StorageError> {
    let nested: NestedSpecification = match format {
        SpecFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        SpecFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
    }
    .map_err(|message| StorageError::Serialization { message })?;
    Ok(ValidationSpecification::from_nested(&nested)?)
}

pub fn read_specification(path: &Path) -> Result<ValidationSpecification, StorageError> {
    let format = SpecFormat::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|e| StorageError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let spec = decode(&text, format)?;
    tracing::info!(
        path = %path.display(),
        ranges = spec.range_count(),
        "specification file loaded"
    );
    Ok(spec)
}

pub fn write_specification(
    path: &Path,
    spec: &ValidationSpecification,
) -> Result<(), StorageError> {
    let format = SpecFormat::from_path(path)?;
    let text = encode(spec, format)?;
    std::fs::write(path, text).map_err(|e| StorageError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
