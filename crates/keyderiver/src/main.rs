//! `keyderiver` — headless form host entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise telemetry (JSON logs on stderr, optional OTLP).
//! 3. Start a [`Session`]: generate the salt once.
//! 4. Build the page and attach the [`KeyDeriver`] to its form.
//! 5. Treat each stdin line as a form submission until end of input.

mod config;
mod crypto;
mod deriver;
mod host;
mod page;
mod session;
mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing::info;

use config::Config;
use crypto::{CryptoProvider, SoftwareProvider};
use deriver::KeyDeriver;
use page::Page;
use session::Session;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        form_id = %cfg.form_id,
        password_field_id = %cfg.password_field_id,
        "keyderiver starting"
    );

    // -----------------------------------------------------------------------
    // 3. Session
    // -----------------------------------------------------------------------
    let provider: Arc<dyn CryptoProvider> = Arc::new(SoftwareProvider::new());
    let session = Session::begin(provider.as_ref()).context("failed to generate session salt")?;

    // -----------------------------------------------------------------------
    // 4. Page + deriver
    // -----------------------------------------------------------------------
    let page = Page::new()
        .with_form(cfg.form_id.clone())
        .with_input(cfg.password_field_id.clone(), "");
    let deriver = KeyDeriver::attach(
        &page,
        cfg.form_id.clone(),
        cfg.password_field_id.clone(),
        session,
        provider,
    )
    .context("failed to attach key deriver")?;

    // -----------------------------------------------------------------------
    // 5. Submissions
    // -----------------------------------------------------------------------
    let stdin = BufReader::new(tokio::io::stdin());
    let result = host::run(page, &deriver, stdin).await;

    telemetry::shutdown_telemetry();
    result.map(|_| ())
}
