//! Host navigation state
//!
//! The facade never touches a global history stack directly. Anything that
//! can hold a stack of entries and announce traversals implements
//! [`NavigationHost`]: the browser's `window.history` ([`crate::BrowserHost`]
//! behind the `browser` feature) or the in-memory [`crate::MemoryHost`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::Result;

/// Callback fired by a host when its active entry changes through traversal
pub type HostListener = Arc<dyn Fn() + Send + Sync>;

/// Raw path and query of the host's active entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostLocation {
    /// Path component, e.g. `/users/42`
    pub pathname: String,
    /// Query component including its `?`, or `""` when there is none
    pub search: String,
}

impl HostLocation {
    pub fn new(pathname: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            search: search.into(),
        }
    }
}

pub trait NavigationHost {
    /// Path and query of the active entry
    fn location(&self) -> HostLocation;

    /// Add a new entry after the active one, discarding any forward entries
    fn push_entry(&self, url: &str) -> Result<()>;

    /// Overwrite the active entry
    fn replace_entry(&self, url: &str) -> Result<()>;

    /// Step `delta` entries through the stack.
    ///
    /// The step completes asynchronously; the host reports it through the
    /// listeners registered with [`NavigationHost::on_change`].
    fn go(&self, delta: isize);

    /// Register a listener for traversals (back/forward, `go`).
    ///
    /// Must not fire for [`push_entry`](NavigationHost::push_entry) or
    /// [`replace_entry`](NavigationHost::replace_entry); callers announce
    /// those changes themselves.
    fn on_change(&self, listener: HostListener);
}

impl<H: NavigationHost + ?Sized> NavigationHost for Arc<H> {
    fn location(&self) -> HostLocation {
        (**self).location()
    }

    fn push_entry(&self, url: &str) -> Result<()> {
        (**self).push_entry(url)
    }

    fn replace_entry(&self, url: &str) -> Result<()> {
        (**self).replace_entry(url)
    }

    fn go(&self, delta: isize) {
        (**self).go(delta)
    }

    fn on_change(&self, listener: HostListener) {
        (**self).on_change(listener)
    }
}
