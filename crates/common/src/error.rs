//! Common error types shared across crates.

use std::fmt;

use thiserror::Error;

/// The provider operation that was running when a failure occurred.
///
/// Carried for diagnostics only; callers never branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Drawing bytes from the CSPRNG.
    Random,
    /// Importing raw password bytes as a base key.
    Import,
    /// Running PBKDF2 over a base key.
    Derive,
    /// Exporting the raw bytes of a key handle.
    Export,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Random => "random",
            Operation::Import => "import",
            Operation::Derive => "derive",
            Operation::Export => "export",
        };
        f.write_str(name)
    }
}

/// The single error kind produced by a cryptography provider.
///
/// Unsupported algorithms, malformed parameters, refused capabilities and
/// backend failures are all reported the same way.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cryptography provider failure during {operation}: {message}")]
pub struct ProviderError {
    /// Operation that failed.
    pub operation: Operation,
    /// Human-readable description. Never contains key material.
    pub message: String,
}

impl ProviderError {
    /// Construct a [`ProviderError`] for `operation`.
    pub fn new(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}
