//! [`KeyDeriver`]: turns a form submission into an AES-256-GCM key.
//!
//! # Submission sequence
//!
//! 1. Suppress the submit event's default action, before anything can fail.
//! 2. Read the password field and encode it as UTF-8. Any value is accepted,
//!    including the empty string.
//! 3. Import the bytes as a non-extractable, derive-only PBKDF2 base key.
//! 4. Run PBKDF2-HMAC-SHA256 (600,000 rounds, session salt) into an
//!    extractable AES-256-GCM key.
//!
//! Steps 3 and 4 run in a spawned task returned to the caller as a
//! [`DerivationTask`]. Provider failures are logged and the task resolves to
//! `None`; nothing propagates to the caller.
//!
//! Overlapping submissions each start their own derivation. There is no
//! queueing, de-duplication or in-flight guard.

pub mod task;

pub use task::DerivationTask;

use std::sync::Arc;

use common::{HashAlgorithm, KeyAlgorithm, KeyUsages, Pbkdf2Params};
use tracing::{debug, error, info, Instrument};
use zeroize::Zeroizing;

use crate::crypto::{CryptoKey, CryptoProvider};
use crate::page::{Page, PageError, SubmitEvent};
use crate::session::Session;

/// PBKDF2 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 600_000;

/// PBKDF2 PRF hash.
pub const PBKDF2_HASH: HashAlgorithm = HashAlgorithm::Sha256;

/// Algorithm of the derived key.
pub const DERIVED_KEY_ALGORITHM: KeyAlgorithm = KeyAlgorithm::AES_256_GCM;

/// Handles submissions of one form by deriving a key from one password field.
#[derive(Clone)]
pub struct KeyDeriver {
    provider: Arc<dyn CryptoProvider>,
    session: Session,
    form_id: String,
    password_field_id: String,
}

impl KeyDeriver {
    /// Bind a deriver to a form and its password field.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::ElementNotFound`] if the page lacks either element.
    pub fn attach(
        page: &Page,
        form_id: impl Into<String>,
        password_field_id: impl Into<String>,
        session: Session,
        provider: Arc<dyn CryptoProvider>,
    ) -> Result<Self, PageError> {
        let form_id = form_id.into();
        let password_field_id = password_field_id.into();

        if page.form(&form_id).is_none() {
            return Err(PageError::ElementNotFound(form_id));
        }
        if page.input(&password_field_id).is_none() {
            return Err(PageError::ElementNotFound(password_field_id));
        }

        Ok(Self {
            provider,
            session,
            form_id,
            password_field_id,
        })
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn password_field_id(&self) -> &str {
        &self.password_field_id
    }

    /// Handle one submission of the bound form.
    ///
    /// Always suppresses the event's default action. Never fails; see the
    /// module docs for what the returned task resolves to.
    pub fn handle_submit(&self, event: &mut SubmitEvent, page: &Page) -> DerivationTask {
        event.prevent_default();
        debug!(form_id = %event.form_id(), "submit intercepted");

        let password = match page.input(&self.password_field_id) {
            Some(field) => Zeroizing::new(field.value().as_bytes().to_vec()),
            None => {
                error!(
                    field = %self.password_field_id,
                    "password field missing at submit time"
                );
                return DerivationTask::settled();
            }
        };

        let provider = Arc::clone(&self.provider);
        let salt = self.session.salt().as_bytes().to_vec();
        DerivationTask::spawn(derive(provider, password, salt).in_current_span())
    }
}

impl std::fmt::Debug for KeyDeriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyDeriver")
            .field("form_id", &self.form_id)
            .field("password_field_id", &self.password_field_id)
            .finish_non_exhaustive()
    }
}

async fn derive(
    provider: Arc<dyn CryptoProvider>,
    password: Zeroizing<Vec<u8>>,
    salt: Vec<u8>,
) -> Option<CryptoKey> {
    let base = match provider
        .import_key(password, KeyAlgorithm::Pbkdf2, false, KeyUsages::derive_only())
        .await
    {
        Ok(key) => key,
        Err(e) => {
            error!(error = %e, "key derivation failed");
            return None;
        }
    };
    info!("base key successfully created");

    let params = Pbkdf2Params::new(salt, PBKDF2_ITERATIONS, PBKDF2_HASH);
    match provider
        .derive_key(
            params,
            &base,
            DERIVED_KEY_ALGORITHM,
            true,
            KeyUsages::encrypt_decrypt(),
        )
        .await
    {
        Ok(key) => {
            debug!(algorithm = %key.algorithm(), "derived key ready");
            Some(key)
        }
        Err(e) => {
            error!(error = %e, "key derivation failed");
            None
        }
    }
}
