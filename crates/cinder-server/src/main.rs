//! # Cinder
//!
//! World server entry point. Loads configuration, starts logging and
//! registers every custom particle found on disk.
//!
//! The binary has no network front end: it loads the particle directory,
//! reports the resulting catalog and exits, which makes it usable as a
//! check of a particle directory before deployment. Hosts embed
//! [`cinder_server::Server`] and feed it players through `join`/`leave`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use cinder_server::{config::CONFIG_FILE, logging, Server, ServerConfig};

/// Main entry point.
fn main() -> Result<()> {
    let (subscriber, filter_handle) = logging::subscriber(logging::bootstrap_filter(), std::io::stdout);
    subscriber.init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_FILE.to_string());
    let config = ServerConfig::load_from(&config_path);

    // RUST_LOG wins over the configured filter
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_none() {
        if let Err(e) = logging::apply_config_filter(&filter_handle, &config) {
            warn!("Keeping default log filter: {e}");
        }
    }

    info!("Cinder starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let (server, summary) = Server::start(config).context("failed to load particle catalog")?;

    {
        let catalog = server.catalog();
        for definition in catalog.iter() {
            if let Some(id) = definition.effect_id() {
                debug!("  {} -> {}", id, definition.name);
            }
        }
        info!(
            "Catalog checked: {} of {} particle slots in use ({} records skipped)",
            summary.loaded,
            catalog.capacity(),
            summary.failed + summary.rejected
        );
    }

    info!("Cinder shutdown complete");
    Ok(())
}
