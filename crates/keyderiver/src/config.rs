//! Configuration loading and validation for the key deriver host.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is present but invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated host configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Element id of the form whose submissions trigger derivation.
    #[serde(default = "default_form_id")]
    pub form_id: String,

    /// Element id of the password input read at submission time.
    #[serde(default = "default_password_field_id")]
    pub password_field_id: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP endpoint for span export. Logs only when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,
}

fn default_form_id() -> String {
    "myFormId".into()
}
fn default_password_field_id() -> String {
    "password".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_element_id(&self.form_id, "FORM_ID")?;
        ensure_element_id(&self.password_field_id, "PASSWORD_FIELD_ID")?;
        if self.form_id == self.password_field_id {
            anyhow::bail!("FORM_ID and PASSWORD_FIELD_ID must name different elements");
        }
        if let Some(endpoint) = &self.otel_exporter_otlp_endpoint {
            if endpoint.trim().is_empty() {
                anyhow::bail!("OTEL_EXPORTER_OTLP_ENDPOINT must not be empty when set");
            }
        }
        Ok(())
    }
}

fn ensure_element_id(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} must not be empty");
    }
    if value.chars().any(char::is_whitespace) {
        anyhow::bail!("{name} must not contain whitespace");
    }
    Ok(())
}
