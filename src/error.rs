use std::fmt;

/// Why a write against the study store did not land.
///
/// Reads never produce this type; they degrade to empty results instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store refused the value because it would exceed its size limit.
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },
    /// A value could not be encoded or decoded as JSON.
    Serialization(String),
    /// The backing store cannot be accessed at all (permissions, I/O, poisoned lock).
    Unavailable(String),
    /// Any other failure reported by a backend.
    Unknown(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::QuotaExceeded { key, needed, limit } => write!(
                f,
                "storage quota exceeded writing {} ({} bytes needed, limit {})",
                key, needed, limit
            ),
            StoreError::Serialization(msg) => write!(f, "study set serialization error: {}", msg),
            StoreError::Unavailable(msg) => write!(f, "storage unavailable: {}", msg),
            StoreError::Unknown(msg) => write!(f, "storage error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Error type for loading a [`StoreConfig`](crate::StoreConfig).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid TOML or has unexpected fields.
    Parse(String),
    /// The document parsed but describes an unusable configuration.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "config parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
