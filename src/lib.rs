pub mod config;
pub mod engine;
pub mod knowledge;
pub mod models;
pub mod pipeline;

pub use engine::{TriageEngine, TriageError};

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// Filter comes from `RUST_LOG`, falling back to `config::default_log_filter()`.
/// Calling it again once a subscriber is set is a no-op.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} triage core v{}", config::APP_NAME, config::APP_VERSION);
    }
}
