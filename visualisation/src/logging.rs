//! Logging setup for the visualisation binary.

use std::{ env, panic };

use anyhow::Result;
use tracing::{ error, info, trace };
use tracing_subscriber::{
    fmt::{ self, time::uptime },
    prelude::*,
    EnvFilter,
    Registry,
};

/// Our crates are debug, everything else is warn.
const DEFAULT_FILTER: &str = "warn,collision_engine=debug,visualisation=debug";

/// Installs a compact stdout `tracing` subscriber. `RUST_LOG` directives are
/// appended to [DEFAULT_FILTER] so they can override it.
pub fn init_logging() -> Result<()> {
    let format = fmt::format()
        .compact()
        .with_timer(uptime())
        .with_line_number(true);
    let stdout_log = fmt::layer()
        .event_format(format);

    let mut filter = DEFAULT_FILTER.to_owned();
    if let Ok(env_filter) = env::var(EnvFilter::DEFAULT_ENV) {
        filter.push(',');
        filter.push_str(&env_filter);
    }

    let subscriber = Registry::default()
        .with(EnvFilter::new(filter))
        .with(stdout_log);
    tracing::subscriber::set_global_default(subscriber)?;
    info!("starting visualisation");

    // make panic messages go through logging system
    panic::set_hook(Box::new(|info| {
        error!("{}", info);
    }));
    trace!("installed custom panic hook");
    Ok(())
}
