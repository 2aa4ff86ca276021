//! Algorithm descriptors passed between the key deriver and a crypto provider.
//!
//! These mirror the shape of a platform crypto API: an algorithm tag on every
//! key handle, a set of permitted usages, and a parameter block for PBKDF2.

use std::fmt;

// ---------------------------------------------------------------------------
// Hash
// ---------------------------------------------------------------------------

/// Hash function used as the PBKDF2 PRF (via HMAC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Sha256 => f.write_str("SHA-256"),
        }
    }
}

// ---------------------------------------------------------------------------
// Key algorithm tags
// ---------------------------------------------------------------------------

/// Algorithm a key handle is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    /// Raw password material usable only as PBKDF2 input.
    Pbkdf2,
    /// AES in Galois/Counter Mode with a key of `length` bits.
    AesGcm { length: u16 },
}

impl KeyAlgorithm {
    /// AES-256-GCM.
    pub const AES_256_GCM: KeyAlgorithm = KeyAlgorithm::AesGcm { length: 256 };
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAlgorithm::Pbkdf2 => f.write_str("PBKDF2"),
            KeyAlgorithm::AesGcm { length } => write!(f, "AES-GCM/{length}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Usages
// ---------------------------------------------------------------------------

/// A single capability a key handle may grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyUsage {
    Encrypt,
    Decrypt,
    WrapKey,
    UnwrapKey,
    DeriveKey,
    DeriveBits,
}

impl KeyUsage {
    const ALL: [KeyUsage; 6] = [
        KeyUsage::Encrypt,
        KeyUsage::Decrypt,
        KeyUsage::WrapKey,
        KeyUsage::UnwrapKey,
        KeyUsage::DeriveKey,
        KeyUsage::DeriveBits,
    ];

    fn bit(self) -> u8 {
        match self {
            KeyUsage::Encrypt => 1 << 0,
            KeyUsage::Decrypt => 1 << 1,
            KeyUsage::WrapKey => 1 << 2,
            KeyUsage::UnwrapKey => 1 << 3,
            KeyUsage::DeriveKey => 1 << 4,
            KeyUsage::DeriveBits => 1 << 5,
        }
    }

    fn name(self) -> &'static str {
        match self {
            KeyUsage::Encrypt => "encrypt",
            KeyUsage::Decrypt => "decrypt",
            KeyUsage::WrapKey => "wrapKey",
            KeyUsage::UnwrapKey => "unwrapKey",
            KeyUsage::DeriveKey => "deriveKey",
            KeyUsage::DeriveBits => "deriveBits",
        }
    }
}

/// Set of [`KeyUsage`]s granted to a key handle.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyUsages(u8);

impl KeyUsages {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build a set from a list of usages. Duplicates are ignored.
    pub fn from_slice(usages: &[KeyUsage]) -> Self {
        Self(usages.iter().fold(0, |acc, u| acc | u.bit()))
    }

    /// `{deriveKey}`, the only capability a PBKDF2 base key needs.
    pub fn derive_only() -> Self {
        Self::from_slice(&[KeyUsage::DeriveKey])
    }

    /// `{encrypt, decrypt}`, the usages of an AES-GCM data key.
    pub fn encrypt_decrypt() -> Self {
        Self::from_slice(&[KeyUsage::Encrypt, KeyUsage::Decrypt])
    }

    pub fn contains(&self, usage: KeyUsage) -> bool {
        self.0 & usage.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every usage in `self` also appears in `allowed`.
    pub fn is_subset_of(&self, allowed: KeyUsages) -> bool {
        self.0 & !allowed.0 == 0
    }

    /// Iterate the usages in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = KeyUsage> + '_ {
        KeyUsage::ALL.into_iter().filter(move |u| self.contains(*u))
    }
}

impl fmt::Debug for KeyUsages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(KeyUsage::name)).finish()
    }
}

impl fmt::Display for KeyUsages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(KeyUsage::name).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

// ---------------------------------------------------------------------------
// PBKDF2 parameters
// ---------------------------------------------------------------------------

/// Parameter block for a PBKDF2 derivation.
///
/// The salt is not secret, but `Debug` only reports its length so that it
/// stays out of logs alongside everything else.
#[derive(Clone, PartialEq, Eq)]
pub struct Pbkdf2Params {
    pub salt: Vec<u8>,
    pub iterations: u32,
    pub hash: HashAlgorithm,
}

impl Pbkdf2Params {
    pub fn new(salt: impl Into<Vec<u8>>, iterations: u32, hash: HashAlgorithm) -> Self {
        Self {
            salt: salt.into(),
            iterations,
            hash,
        }
    }
}

impl fmt::Debug for Pbkdf2Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pbkdf2Params")
            .field("salt_len", &self.salt.len())
            .field("iterations", &self.iterations)
            .field("hash", &self.hash)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usages_from_slice_dedupes() {
        let u = KeyUsages::from_slice(&[KeyUsage::Encrypt, KeyUsage::Encrypt]);
        assert_eq!(u, KeyUsages::from_slice(&[KeyUsage::Encrypt]));
        assert_eq!(u.iter().count(), 1);
    }

    #[test]
    fn usages_subset() {
        let ed = KeyUsages::encrypt_decrypt();
        assert!(KeyUsages::from_slice(&[KeyUsage::Decrypt]).is_subset_of(ed));
        assert!(!KeyUsages::derive_only().is_subset_of(ed));
        assert!(KeyUsages::empty().is_subset_of(ed));
    }

    #[test]
    fn usages_display_in_stable_order() {
        let u = KeyUsages::from_slice(&[KeyUsage::Decrypt, KeyUsage::Encrypt]);
        assert_eq!(u.to_string(), "[encrypt, decrypt]");
        assert_eq!(format!("{u:?}"), r#"["encrypt", "decrypt"]"#);
    }

    #[test]
    fn algorithm_display() {
        assert_eq!(KeyAlgorithm::AES_256_GCM.to_string(), "AES-GCM/256");
        assert_eq!(KeyAlgorithm::Pbkdf2.to_string(), "PBKDF2");
        assert_eq!(HashAlgorithm::Sha256.to_string(), "SHA-256");
    }

    #[test]
    fn params_debug_hides_salt_bytes() {
        let p = Pbkdf2Params::new(vec![0xAB; 16], 600_000, HashAlgorithm::Sha256);
        let s = format!("{p:?}");
        assert!(s.contains("salt_len: 16"));
        assert!(!s.contains("171"));
    }
}
