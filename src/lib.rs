//! Kanplan — single-session nursing assessment / care-plan assistant.
//!
//! Free-text patient information is sent to an external language model,
//! which returns a SOAP excerpt (A/P only), a NANDA-I/NIC/NOC plan table,
//! and a reasoning summary. Follow-up questions are answered using only
//! the most recent result as context, behind a keyword relevance gate.
//! All state is session-scoped and in-memory; nothing is persisted.

pub mod careplan;
pub mod config;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binary entry points.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
