//! Software [`CryptoProvider`] backed by RustCrypto PBKDF2 and the OS CSPRNG.

use async_trait::async_trait;
use common::{
    HashAlgorithm, KeyAlgorithm, KeyUsage, KeyUsages, Operation, Pbkdf2Params, ProviderError,
};
use hmac::Hmac;
use rand_core::{OsRng, RngCore};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::{CryptoKey, CryptoProvider};

/// AES key lengths (bits) a derivation may target.
const AES_KEY_LENGTHS: [u16; 3] = [128, 192, 256];

/// In-process provider. Stateless; PBKDF2 runs on Tokio's blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareProvider;

impl SoftwareProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CryptoProvider for SoftwareProvider {
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>, ProviderError> {
        let mut buf = vec![0u8; len];
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|e| ProviderError::new(Operation::Random, format!("OS RNG failed: {e}")))?;
        Ok(buf)
    }

    async fn import_key(
        &self,
        raw: Zeroizing<Vec<u8>>,
        algorithm: KeyAlgorithm,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<CryptoKey, ProviderError> {
        if algorithm != KeyAlgorithm::Pbkdf2 {
            return Err(ProviderError::new(
                Operation::Import,
                format!("raw import of {algorithm} keys is not supported"),
            ));
        }
        if extractable {
            return Err(ProviderError::new(
                Operation::Import,
                "PBKDF2 keys cannot be extractable",
            ));
        }
        let allowed = KeyUsages::from_slice(&[KeyUsage::DeriveKey, KeyUsage::DeriveBits]);
        if usages.is_empty() || !usages.is_subset_of(allowed) {
            return Err(ProviderError::new(
                Operation::Import,
                format!("invalid usages {usages} for PBKDF2 key"),
            ));
        }
        Ok(CryptoKey::new(algorithm, extractable, usages, raw))
    }

    async fn derive_key(
        &self,
        params: Pbkdf2Params,
        base: &CryptoKey,
        target: KeyAlgorithm,
        extractable: bool,
        usages: KeyUsages,
    ) -> Result<CryptoKey, ProviderError> {
        if base.algorithm() != KeyAlgorithm::Pbkdf2 {
            return Err(ProviderError::new(
                Operation::Derive,
                format!("base key is bound to {}, not PBKDF2", base.algorithm()),
            ));
        }
        if !base.usages().contains(KeyUsage::DeriveKey) {
            return Err(ProviderError::new(
                Operation::Derive,
                "base key does not permit deriveKey",
            ));
        }
        if params.iterations == 0 {
            return Err(ProviderError::new(
                Operation::Derive,
                "iteration count must be at least 1",
            ));
        }
        let length = match target {
            KeyAlgorithm::AesGcm { length } if AES_KEY_LENGTHS.contains(&length) => length,
            other => {
                return Err(ProviderError::new(
                    Operation::Derive,
                    format!("cannot derive a {other} key"),
                ))
            }
        };
        let allowed = KeyUsages::from_slice(&[
            KeyUsage::Encrypt,
            KeyUsage::Decrypt,
            KeyUsage::WrapKey,
            KeyUsage::UnwrapKey,
        ]);
        if usages.is_empty() || !usages.is_subset_of(allowed) {
            return Err(ProviderError::new(
                Operation::Derive,
                format!("invalid usages {usages} for {target} key"),
            ));
        }

        let password = Zeroizing::new(base.material().to_vec());
        let key_len = usize::from(length / 8);
        let material = tokio::task::spawn_blocking(move || {
            pbkdf2_derive(&password, &params.salt, params.iterations, params.hash, key_len)
        })
        .await
        .map_err(|e| {
            ProviderError::new(Operation::Derive, format!("derivation worker failed: {e}"))
        })??;

        Ok(CryptoKey::new(target, extractable, usages, material))
    }
}

/// PBKDF2 with HMAC over `hash`, producing `key_len` bytes.
fn pbkdf2_derive(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    hash: HashAlgorithm,
    key_len: usize,
) -> Result<Zeroizing<Vec<u8>>, ProviderError> {
    let mut out = Zeroizing::new(vec![0u8; key_len]);
    match hash {
        HashAlgorithm::Sha256 => {
            pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, iterations, &mut out)
                .map_err(|e| ProviderError::new(Operation::Derive, format!("PBKDF2 failed: {e}")))?
        }
    }
    Ok(out)
}
