//! Waypost Core
//!
//! Entry point for applications: configuration, logging and ready-made
//! history instances, plus re-exports of the query and history crates.

mod config;
mod error;

pub use config::Config;
pub use error::CoreError;

pub use waypost_history::{
    Callback, History, HostListener, HostLocation, Location, MemoryHost, MemoryHostOptions,
    Navigation, NavigationError, NavigationHost, NavigationMode, Search, Subscription,
};
#[cfg(feature = "browser")]
pub use waypost_history::BrowserHost;
pub use waypost_query::{parse, stringify, ParamValue, Params};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// `RUST_LOG` takes precedence over `config.log_filter`. Does nothing if a
/// global subscriber is already installed.
pub fn init_logging(config: &Config) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    if fmt().with_env_filter(filter).with_target(true).try_init().is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}

/// Build a history over a fresh in-memory host
pub fn memory_history(config: &Config) -> Result<History<MemoryHost>> {
    config.validate()?;

    let host = MemoryHost::with_options(&config.initial_url, config.memory_host_options())?;
    let history = History::new(host);

    tracing::info!(
        initial_url = %config.initial_url,
        max_entries = ?config.max_entries,
        "Created in-memory history"
    );

    Ok(history)
}

/// Build a history over the page's `window.history`
#[cfg(feature = "browser")]
pub fn browser_history() -> History<BrowserHost> {
    History::new(BrowserHost::new())
}
