use thiserror::Error;

/// Every way a compile can fail. All variants are terminal: the pipeline
/// stops at the first one and returns no partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The declaration does not have the shape its class requires.
    #[error("malformed declaration at '{key}': {reason}")]
    MalformedDeclaration { key: String, reason: String },
    /// A node carries a discriminator no stage knows how to handle.
    #[error("unknown class '{class}' for '{key}'")]
    UnknownClass { key: String, class: String },
    /// A resource path names a namespace or subtype that cannot be converted.
    #[error("unknown resource type '{kind}' for '{name}'")]
    UnknownResourceType { kind: String, name: String },
    /// A value points at content that must be fetched (url/copyFrom).
    #[error("unsupported reference '{reference}' in field '{field}'")]
    UnsupportedReference { field: String, reference: String },
    /// A secret is neither a plain string nor a recognized protected value.
    #[error("unsupported secret format in '{key}': {reason}")]
    UnsupportedSecretFormat { key: String, reason: String },
    /// A field the target object cannot exist without is absent.
    #[error("'{name}' ({kind}) is missing required field '{field}'")]
    MissingRequiredField {
        kind: String,
        name: String,
        field: String,
    },
    /// The defaulting authority refused, failed, or answered asynchronously.
    #[error("defaulting authority failed ({status}): {message}")]
    UpstreamDefaultingFailure { status: String, message: String },
}

impl ConvertError {
    pub(crate) fn malformed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDeclaration {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(
        kind: impl Into<String>,
        name: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self::MissingRequiredField {
            kind: kind.into(),
            name: name.into(),
            field: field.into(),
        }
    }

    pub(crate) fn secret(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedSecretFormat {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
