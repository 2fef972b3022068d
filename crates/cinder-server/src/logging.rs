//! Logging setup.
//!
//! The subscriber is installed before the configuration is read, using
//! `RUST_LOG` or [`DEFAULT_LOG_FILTER`]. Once the configuration is loaded
//! its `log_filter` is swapped in through a reload handle.

use tracing::Subscriber;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter, Registry};

use cinder_common::{CinderError, CinderResult};

use crate::config::{ServerConfig, DEFAULT_LOG_FILTER};

/// Handle for replacing the active filter after startup.
pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Filter used until the configuration is known.
#[must_use]
pub fn bootstrap_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Builds a formatted subscriber writing to `writer` with a reloadable filter.
pub fn subscriber<W>(filter: EnvFilter, writer: W) -> (impl Subscriber + Send + Sync + 'static, FilterHandle)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let (filter, handle) = reload::Layer::new(filter);
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer));
    (subscriber, handle)
}

/// Replaces the active filter with the configured one.
pub fn apply_config_filter(handle: &FilterHandle, config: &ServerConfig) -> CinderResult<()> {
    let filter = EnvFilter::try_new(&config.log_filter)
        .map_err(|e| CinderError::Config(format!("invalid log filter {:?}: {e}", config.log_filter)))?;
    handle
        .reload(filter)
        .map_err(|e| CinderError::Config(e.to_string()))
}
