//! Diagnostics: structured JSON logs on stderr, optionally exported over OTLP.
//!
//! Derivation failures are reported here and nowhere else; the page shows the
//! user nothing.
//!
//! # Telemetry invariants
//!
//! - **No password, salt or key material** may appear in any span attribute or
//!   log field.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`).

pub mod init;

pub use init::{init_telemetry, shutdown_telemetry};
