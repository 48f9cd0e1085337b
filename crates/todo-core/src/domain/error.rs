//! Domain Layer - Storage Errors

/// Common result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors reported by a task storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    NotFound(String),
    /// No credential, or the credential was rejected
    Unauthorized(String),
    /// Credential accepted but the operation is not allowed for it
    Forbidden(String),
    InvalidInput(String),
    /// Unexpected HTTP status from the remote collection
    Status(u16, String),
    Transport(String),
    Decode(String),
    Internal(String),
}

impl StorageError {
    /// True for the two rejections an authorization check produces
    pub fn is_access_denied(&self) -> bool {
        matches!(self, StorageError::Unauthorized(_) | StorageError::Forbidden(_))
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::NotFound(msg) => write!(f, "Not found: {}", msg),
            StorageError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            StorageError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            StorageError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            StorageError::Status(code, msg) => write!(f, "Unexpected status {}: {}", code, msg),
            StorageError::Transport(msg) => write!(f, "Transport error: {}", msg),
            StorageError::Decode(msg) => write!(f, "Decode error: {}", msg),
            StorageError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}
