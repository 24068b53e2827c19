use thiserror::Error;

/// A description document the gate refuses to serve.
///
/// Every variant is fatal at startup: routes are only registered once the
/// whole document has been resolved, enumerated and compiled without one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// A `$ref` pointer that does not start with `#`.
    #[error("unsupported reference '{pointer}': only local '#/...' pointers can be resolved")]
    UnsupportedReferenceKind { pointer: String },

    /// A local `$ref` pointer whose target does not exist.
    #[error("reference '{pointer}' does not resolve: no value at segment '{segment}'")]
    UnresolvedReference { pointer: String, segment: String },

    /// A path item field that is neither an operation nor known metadata.
    #[error("unsupported field '{field}' in path item '{path}'")]
    UnsupportedField { path: String, field: String },

    /// The document does not have the shape of a description document.
    #[error("malformed document at {location}: {message}")]
    MalformedDocument { location: String, message: String },

    /// A schema node that cannot be compiled into a validator.
    #[error("malformed schema at {location}: {message}")]
    MalformedSchema { location: String, message: String },
}

impl SpecError {
    pub fn malformed_document(location: impl Into<String>, message: impl Into<String>) -> Self {
        SpecError::MalformedDocument {
            location: location.into(),
            message: message.into(),
        }
    }

    pub fn malformed_schema(location: impl Into<String>, message: impl Into<String>) -> Self {
        SpecError::MalformedSchema {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Short machine-readable kind, used when printing startup issues.
    pub fn kind(&self) -> &'static str {
        match self {
            SpecError::UnsupportedReferenceKind { .. } => "UnsupportedReferenceKind",
            SpecError::UnresolvedReference { .. } => "UnresolvedReference",
            SpecError::UnsupportedField { .. } => "UnsupportedField",
            SpecError::MalformedDocument { .. } => "MalformedDocument",
            SpecError::MalformedSchema { .. } => "MalformedSchema",
        }
    }
}
