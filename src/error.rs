//! Error types for pdakit

use thiserror::Error;

/// Main error type for pdakit operations
#[derive(Debug, Error)]
pub enum PdakitError {
    /// IDL is missing a type definition or declares something malformed
    #[error("Schema error: {0}")]
    Schema(String),

    /// A required argument or account value was not supplied
    #[error("Missing input at '{path}': {message}")]
    MissingInput { path: String, message: String },

    /// A value does not match its declared IDL type
    #[error("Type mismatch at '{path}': {message}")]
    TypeMismatch { path: String, message: String },

    /// A single seed buffer exceeds the 32-byte limit
    #[error("Seed {index} is {len} bytes, max is {max}")]
    SeedSize { index: usize, len: usize, max: usize },

    /// On-chain fetch, decode or field lookup failed
    #[error("Resolution error: {0}")]
    Resolution(String),

    #[error("Program {0} does not have an IDL account")]
    IdlNotFound(String),

    #[error("Failed to decompress IDL data: {0}")]
    DecompressionError(String),

    #[error("Failed to parse IDL JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("RPC error: {0}")]
    RpcError(#[from] solana_client::client_error::ClientError),

    #[error("Invalid program ID: {0}")]
    InvalidProgramId(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP error {status}: {url}")]
    HttpError { status: u16, url: String },
}

impl PdakitError {
    pub fn missing(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MissingInput {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn mismatch(message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            path: String::new(),
            message: message.into(),
        }
    }

    /// Prefix one path segment onto a path-carrying error.
    ///
    /// Segments starting with `[` attach without a dot, so `items` then `[2]`
    /// then `amount` reads `items[2].amount`.
    pub fn at(self, segment: &str) -> Self {
        match self {
            Self::MissingInput { path, message } => Self::MissingInput {
                path: join_path(segment, &path),
                message,
            },
            Self::TypeMismatch { path, message } => Self::TypeMismatch {
                path: join_path(segment, &path),
                message,
            },
            other => other,
        }
    }

    /// Whether the caller can fix this by changing input or waiting for chain state.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MissingInput { .. }
                | Self::TypeMismatch { .. }
                | Self::SeedSize { .. }
                | Self::Resolution(_)
        )
    }

    /// Field path for `MissingInput` and `TypeMismatch`
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MissingInput { path, .. } | Self::TypeMismatch { path, .. } => Some(path),
            _ => None,
        }
    }
}

fn join_path(segment: &str, rest: &str) -> String {
    if rest.is_empty() {
        segment.to_string()
    } else if rest.starts_with('[') {
        format!("{}{}", segment, rest)
    } else {
        format!("{}.{}", segment, rest)
    }
}

/// Result type alias for pdakit operations
pub type PdakitResult<T> = Result<T, PdakitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_prefixing() {
        let err = PdakitError::mismatch("expected u8")
            .at("amount")
            .at("[2]")
            .at("items")
            .at("config");
        assert_eq!(err.path(), Some("config.items[2].amount"));
        assert!(err.to_string().contains("config.items[2].amount"));
    }

    #[test]
    fn test_non_path_errors_untouched() {
        let err = PdakitError::Schema("no type Foo".into()).at("field");
        assert!(matches!(err, PdakitError::Schema(ref msg) if msg == "no type Foo"));
        assert_eq!(err.path(), None);
    }

    #[test]
    fn test_recoverable_kinds() {
        assert!(PdakitError::missing("x", "absent").is_recoverable());
        assert!(PdakitError::SeedSize { index: 0, len: 50, max: 32 }.is_recoverable());
        assert!(!PdakitError::Schema("bad".into()).is_recoverable());
    }
}
