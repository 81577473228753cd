//! Error types for issue records and their loading

use std::path::PathBuf;

/// Errors raised while building or loading issue records
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Priority outside `[1, 10]`
    #[error("priority must be within 1..=10, got {0}")]
    InvalidPriority(i64),

    /// Blank title on an issue or entry
    #[error("empty title on {context}")]
    EmptyTitle { context: String },

    /// Reference entry without a target
    #[error("empty reference in issue '{issue}'")]
    EmptyReference { issue: String },

    /// Two issues share a name
    #[error("duplicate issue name '{0}'")]
    DuplicateIssue(String),

    /// Required field absent from a record
    #[error("missing field '{field}' in {context}")]
    MissingField { field: &'static str, context: String },

    /// Malformed YAML
    #[error("yaml error in {source_id}: {source}")]
    Yaml {
        source_id: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// IO error while reading records
    #[error("io error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ModelError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create YAML error for a record
    pub fn yaml_error(source_id: impl Into<String>, source: serde_yaml::Error) -> Self {
        Self::Yaml {
            source_id: source_id.into(),
            source,
        }
    }
}

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_error_display() {
        assert_eq!(
            ModelError::InvalidPriority(12).to_string(),
            "priority must be within 1..=10, got 12"
        );
        assert_eq!(
            ModelError::DuplicateIssue("A".into()).to_string(),
            "duplicate issue name 'A'"
        );
    }
}
