//! Log output for the command-line driver.
//!
//! Logs go to stderr so stdout carries only the run summary.

use anyhow::{anyhow, Result};
use tracing::{info, Subscriber};
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,lifeplus_engine=debug";

fn subscriber<W>(json: bool, filter: EnvFilter, writer: W) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        Box::new(registry.with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(writer),
        ))
    } else {
        Box::new(registry.with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(writer),
        ))
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_telemetry(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    tracing::subscriber::set_global_default(subscriber(json, filter, std::io::stderr))
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;

    info!(format = if json { "json" } else { "pretty" }, "Logging initialized");
    Ok(())
}
