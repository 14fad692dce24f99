#![deny(clippy::all)]

/**
 * JSX Localizer CLI
 *
 * File boundary of the localizer: parses JS/JSX sources, runs the passes and
 * writes catalogs.
 */
// Re-export the core for convenience
pub use jsx_localizer as localizer;

pub mod bridge;
pub mod config;
pub mod export;
pub mod transform;

pub use bridge::parse_document;
pub use config::load_config;
pub use export::{export_catalog, ExportSummary};
pub use transform::{extract_strings, inject_localization, Injected};

/// CLI version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Install the `tracing` subscriber used by the binaries. `RUST_LOG` overrides the
/// default `info` level.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
