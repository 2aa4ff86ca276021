//! [`CryptoKey`]: opaque key handle issued by a [`CryptoProvider`](super::CryptoProvider).

use common::{KeyAlgorithm, KeyUsages, Operation, ProviderError};
use zeroize::Zeroizing;

/// An opaque key handle.
///
/// A handle pairs key material with the algorithm it is bound to, the usages
/// it permits and whether its raw bytes may be exported. Handles are only ever
/// created by a provider; holders cannot reach the material except through
/// [`CryptoKey::export_raw`], and only when the handle is extractable.
///
/// The material is zeroized when the handle is dropped.
pub struct CryptoKey {
    algorithm: KeyAlgorithm,
    extractable: bool,
    usages: KeyUsages,
    material: Zeroizing<Vec<u8>>,
}

impl CryptoKey {
    pub(crate) fn new(
        algorithm: KeyAlgorithm,
        extractable: bool,
        usages: KeyUsages,
        material: Zeroizing<Vec<u8>>,
    ) -> Self {
        Self {
            algorithm,
            extractable,
            usages,
            material,
        }
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub fn extractable(&self) -> bool {
        self.extractable
    }

    pub fn usages(&self) -> KeyUsages {
        self.usages
    }

    /// Export the raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the handle was created non-extractable.
    pub fn export_raw(&self) -> Result<Zeroizing<Vec<u8>>, ProviderError> {
        if !self.extractable {
            return Err(ProviderError::new(
                Operation::Export,
                "key is not extractable",
            ));
        }
        Ok(self.material.clone())
    }

    /// Key material for use inside a provider implementation.
    pub(crate) fn material(&self) -> &[u8] {
        &self.material
    }
}

impl std::fmt::Debug for CryptoKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("CryptoKey")
            .field("algorithm", &self.algorithm)
            .field("extractable", &self.extractable)
            .field("usages", &self.usages)
            .field("material", &"[REDACTED]")
            .finish()
    }
}
