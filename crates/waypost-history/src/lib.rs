//! Waypost History
//!
//! Session-history facade over an injected host:
//! - `navigate` / `push` / `replace` update the host, then notify
//!   subscribers synchronously
//! - `go_back` / `go_forward` only ask the host; subscribers hear about the
//!   traversal when the host fires its change event
//! - hosts: [`MemoryHost`] everywhere, [`BrowserHost`] with the `browser`
//!   feature

#[cfg(feature = "browser")]
mod browser;
mod error;
mod history;
mod host;
mod location;
mod memory;
mod navigation;
mod subscribers;

#[cfg(feature = "browser")]
pub use browser::BrowserHost;
pub use error::NavigationError;
pub use history::History;
pub use host::{HostListener, HostLocation, NavigationHost};
pub use location::Location;
pub use memory::{MemoryHost, MemoryHostOptions};
pub use navigation::{Navigation, NavigationMode, Search};
pub use subscribers::{Callback, Subscription};

pub type Result<T> = std::result::Result<T, NavigationError>;
