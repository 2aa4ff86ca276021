//! Common algorithm descriptors and errors shared across `keyderiver` crates.

pub mod algorithm;
pub mod error;

pub use algorithm::{HashAlgorithm, KeyAlgorithm, KeyUsage, KeyUsages, Pbkdf2Params};
pub use error::{Operation, ProviderError};
