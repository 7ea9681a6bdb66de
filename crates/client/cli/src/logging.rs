//! Tracing setup for the console client.
//!
//! Logs go to stderr so they never interleave with the duel transcript on
//! stdout. Filter with `RUST_LOG` (e.g. `RUST_LOG=duel_runtime=debug`).
use tracing_subscriber::EnvFilter;

pub fn setup_logging() {
    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
