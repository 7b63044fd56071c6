use crate::foundation::core::{Category, VersionId};

/// Convenience result type used across the crate.
pub type MigrateResult<T> = Result<T, MigrateError>;

/// Top-level error taxonomy for detection and migration.
///
/// "Not this format" inside a single detector is never an error; only the manager turns
/// a complete miss into [`MigrateError::UnrecognizedFormat`].
#[derive(thiserror::Error, Debug)]
pub enum MigrateError {
    /// No detector in the category accepted the input.
    #[error("unrecognized {category} data{} (requested target '{target}')", origin_suffix(.origin))]
    UnrecognizedFormat {
        category: Category,
        origin: Option<String>,
        target: String,
    },

    /// The detected version has no layer chain reaching the target.
    #[error("no {category} migration path from '{from}' to '{to}'{}", origin_suffix(.origin))]
    NoMigrationPath {
        category: Category,
        origin: Option<String>,
        from: VersionId,
        to: String,
    },

    /// A value that must be an image reference could not be parsed.
    #[error("malformed image reference '{value}' in {context}")]
    MalformedReference { value: String, context: String },

    /// The document could not be parsed or written.
    #[error("xml error: {0}")]
    Xml(String),

    /// Invalid caller-provided options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MigrateError {
    pub fn xml(msg: impl Into<String>) -> Self {
        Self::Xml(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn malformed_reference(value: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MalformedReference {
            value: value.into(),
            context: context.into(),
        }
    }

    /// Attach the input's identity (usually a file path) to manager-level failures.
    pub fn with_origin(self, name: impl Into<String>) -> Self {
        match self {
            Self::UnrecognizedFormat {
                category,
                origin: None,
                target,
            } => Self::UnrecognizedFormat {
                category,
                origin: Some(name.into()),
                target,
            },
            Self::NoMigrationPath {
                category,
                origin: None,
                from,
                to,
            } => Self::NoMigrationPath {
                category,
                origin: Some(name.into()),
                from,
                to,
            },
            other => other,
        }
    }
}

fn origin_suffix(origin: &Option<String>) -> String {
    match origin {
        Some(name) => format!(" in '{name}'"),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
