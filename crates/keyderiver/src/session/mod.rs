//! Per-session state shared by every submission.
//!
//! # Lifecycle
//!
//! 1. At startup, [`Session::begin`] draws the salt from the provider's CSPRNG.
//!    This is the only place a salt is generated.
//! 2. The salt is immutable afterwards and shared by every derivation in the
//!    session; cloning a [`Session`] clones a reference, not the bytes.
//! 3. The salt is dropped with the last `Session` clone at shutdown.
//!
//! A [`KeyDeriver`](crate::deriver::KeyDeriver) can only be built from a
//! `Session`, so no derivation can run before the salt exists.

pub mod salt;

pub use salt::{SessionSalt, SALT_LEN};

use std::sync::Arc;

use common::ProviderError;
use tracing::debug;

use crate::crypto::CryptoProvider;

/// A key-derivation session.
#[derive(Clone, Debug)]
pub struct Session {
    salt: Arc<SessionSalt>,
}

impl Session {
    /// Start a session with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the provider cannot produce random bytes,
    /// or produces the wrong number of them.
    pub fn begin(provider: &dyn CryptoProvider) -> Result<Self, ProviderError> {
        let bytes = provider.random_bytes(SALT_LEN)?;
        let salt = SessionSalt::from_slice(&bytes)?;
        debug!(salt_len = SALT_LEN, "session salt generated");
        Ok(Self {
            salt: Arc::new(salt),
        })
    }

    /// Start a session with a caller-chosen salt.
    #[cfg(test)]
    pub fn with_salt(salt: [u8; SALT_LEN]) -> Self {
        Self {
            salt: Arc::new(SessionSalt::new(salt)),
        }
    }

    pub fn salt(&self) -> &SessionSalt {
        &self.salt
    }
}
