//! [`SessionSalt`]: the fixed-length random salt of a session.

use common::{Operation, ProviderError};

/// Salt length in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Exactly [`SALT_LEN`] bytes of salt.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionSalt([u8; SALT_LEN]);

impl SessionSalt {
    pub fn new(bytes: [u8; SALT_LEN]) -> Self {
        Self(bytes)
    }

    /// Copy a salt out of a provider-supplied buffer.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if `bytes` is not exactly [`SALT_LEN`] long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ProviderError> {
        <[u8; SALT_LEN]>::try_from(bytes).map(Self::new).map_err(|_| {
            ProviderError::new(
                Operation::Random,
                format!("expected {SALT_LEN} salt bytes, got {}", bytes.len()),
            )
        })
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for SessionSalt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionSalt([REDACTED])")
    }
}
