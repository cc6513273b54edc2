//! Error types for dispatcher operations

use thiserror::Error;

/// Failures reported by the HTTP client collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request failed with status code {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request could not be completed: {message}")]
    Network { message: String },

    #[error("Malformed response: {message}")]
    Decode { message: String },
}

/// Failure of a single input record.
///
/// The `Display` text is what ends up in `{"error": ...}` output records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Internal consistency fault: unrecognized operation '{operation}'")]
    InternalConsistency { operation: String },

    #[error("Invalid value for parameter {name}: '{value}'")]
    InvalidParameter { name: &'static str, value: String },
}

/// Credential resolution errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Missing required credential field: apiKey")]
    MissingApiKey,
}

/// Master error type for a batch invocation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Credential error: {0}")]
    Credentials(#[from] CredentialError),

    #[error("Item {index} failed: {source}")]
    Record {
        index: usize,
        #[source]
        source: RecordError,
    },
}

impl DispatchError {
    /// Index of the input record that aborted the batch, if any.
    pub fn item_index(&self) -> Option<usize> {
        match self {
            DispatchError::Record { index, .. } => Some(*index),
            DispatchError::Credentials(_) => None,
        }
    }
}

/// Result type alias for dispatcher operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

// =============================================================================
// TESTS
// =============================================================================
