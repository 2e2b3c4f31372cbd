//! Error types for the Lightcalc library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`LightcalcError`] enum. Note that a search which finds no admissible
//! combination is *not* an error: it succeeds with an empty result.
//!
//! # Examples
//!
//! ```
//! use lightcalc::error::{LightcalcError, Result};
//!
//! fn check_target(target: i64) -> Result<i64> {
//!     if target <= 0 {
//!         return Err(LightcalcError::invalid_input("target must be positive"));
//!     }
//!     Ok(target)
//! }
//!
//! assert!(check_target(0).is_err());
//! assert_eq!(check_target(620).unwrap(), 620);
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Lightcalc operations.
#[derive(Error, Debug)]
pub enum LightcalcError {
    /// Caller supplied a value the engine refuses to search with
    /// (non-positive target, blank name, zero result limit, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Catalog is malformed or does not know a segment label.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// A stored calculation could not be found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with LightcalcError.
pub type Result<T> = std::result::Result<T, LightcalcError>;

impl LightcalcError {
    /// Create a new invalid input error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        LightcalcError::InvalidInput(msg.into())
    }

    /// Create a new catalog error.
    pub fn catalog<S: Into<String>>(msg: S) -> Self {
        LightcalcError::Catalog(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        LightcalcError::Storage(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        LightcalcError::NotFound(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LightcalcError::Other(msg.into())
    }

    /// Whether this error is the invalid-input signal.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, LightcalcError::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = LightcalcError::invalid_input("target must be positive");
        assert_eq!(error.to_string(), "Invalid input: target must be positive");
        assert!(error.is_invalid_input());

        let error = LightcalcError::catalog("unknown segment '700'");
        assert_eq!(error.to_string(), "Catalog error: unknown segment '700'");
        assert!(!error.is_invalid_input());

        let error = LightcalcError::not_found("calculation abc");
        assert_eq!(error.to_string(), "Not found: calculation abc");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let lightcalc_error = LightcalcError::from(io_error);

        match lightcalc_error {
            LightcalcError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let lightcalc_error: LightcalcError = json_error.into();
        assert!(matches!(lightcalc_error, LightcalcError::Json(_)));
    }
}
