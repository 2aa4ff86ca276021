//! Platform cryptography seam: key handles, the provider trait, and the
//! in-process software provider.
//!
//! The key deriver never touches key bytes itself. It asks a
//! [`CryptoProvider`] to import the password as a derive-only handle and to run
//! PBKDF2 over it, receiving opaque [`CryptoKey`] handles back.
//!
//! # Security invariants
//!
//! - Key material is zeroized when its handle is dropped.
//! - Key material, passwords and salts never appear in `Debug` output or logs.

pub mod key;
pub mod provider;
pub mod software;

pub use key::CryptoKey;
pub use provider::CryptoProvider;
#[cfg(test)]
pub use provider::MockCryptoProvider;
pub use software::SoftwareProvider;
