//! The [`CryptoProvider`] trait: the capability contract the key deriver consumes.

use async_trait::async_trait;
use common::{KeyAlgorithm, KeyUsages, Pbkdf2Params, ProviderError};
use zeroize::Zeroizing;

use super::CryptoKey;

/// A source of randomness, key import and PBKDF2 derivation.
///
/// Implementations may fail on any call. Every failure is reported as a
/// [`ProviderError`]; the deriver does not distinguish causes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CryptoProvider: Send + Sync {
    /// Fill a fresh buffer of `len` bytes from a cryptographically secure RNG.
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>, ProviderError>;

    /// Wrap raw bytes in a key handle bound to `algorithm`.
    async fn import_key(
        &self,
        raw: Zeroizing<Vec<u8>>,
        algorithm: KeyAlgorithm,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<CryptoKey, ProviderError>;

    /// Run PBKDF2 over `base` and return a new handle bound to `target`.
    async fn derive_key(
        &self,
        params: Pbkdf2Params,
        base: &CryptoKey,
        target: KeyAlgorithm,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<CryptoKey, ProviderError>;
}
