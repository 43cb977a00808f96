//! Error types for loadplan.

use thiserror::Error;

/// Result type alias for loadplan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while planning a load.
///
/// Items that cannot be placed are not errors: they are reported through the
/// arrangement's unplaced list. Degenerate cargo is filtered silently.
#[derive(Debug, Error)]
pub enum Error {
    /// Container has a non-positive or non-finite dimension.
    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    /// Engine configuration is inconsistent.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization error.
    #[cfg(feature = "serde")]
    #[error("Serialization error: {0}")]
    Serialization(String),
}
