//! In-memory navigation host
//!
//! Keeps a stack of entries the way a browser tab does:
//! ```text
//! push    /a  /b  [/c]        forward entries are discarded
//! go(-1)  /a [/b]  /c         queued until process_traversals()
//! replace /a [/x]  /c         active entry overwritten in place
//! ```

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use url::Url;

use crate::error::NavigationError;
use crate::host::{HostListener, HostLocation, NavigationHost};
use crate::Result;

/// Origin every entry lives under
const BASE_URL: &str = "http://localhost/";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryHostOptions {
    /// Oldest entries are dropped once the stack grows past this size
    pub max_entries: Option<usize>,
    /// Apply `go` immediately instead of queueing it
    pub immediate_traversal: bool,
}

struct MemoryState {
    entries: Vec<Url>,
    index: usize,
    pending: VecDeque<isize>,
}

impl MemoryState {
    fn current(&self) -> &Url {
        &self.entries[self.index]
    }

    /// Move the active index; false when the step leaves the stack
    fn traverse(&mut self, delta: isize) -> bool {
        if delta == 0 {
            return false;
        }

        match self.index.checked_add_signed(delta) {
            Some(target) if target < self.entries.len() => {
                self.index = target;
                true
            }
            _ => {
                tracing::warn!(
                    delta,
                    index = self.index,
                    len = self.entries.len(),
                    "Ignoring traversal outside of history"
                );
                false
            }
        }
    }
}

/// Navigation host backed by a plain vector of URLs
pub struct MemoryHost {
    state: Mutex<MemoryState>,
    listeners: RwLock<Vec<HostListener>>,
    options: MemoryHostOptions,
}

impl MemoryHost {
    pub fn new(initial_url: &str) -> Result<Self> {
        Self::with_options(initial_url, MemoryHostOptions::default())
    }

    pub fn with_options(initial_url: &str, options: MemoryHostOptions) -> Result<Self> {
        let base = Url::parse(BASE_URL)
            .map_err(|e| NavigationError::InvalidUrl(format!("{}: {}", BASE_URL, e)))?;
        let initial = resolve(&base, initial_url)?;

        Ok(Self {
            state: Mutex::new(MemoryState {
                entries: vec![initial],
                index: 0,
                pending: VecDeque::new(),
            }),
            listeners: RwLock::new(Vec::new()),
            options,
        })
    }

    pub fn options(&self) -> &MemoryHostOptions {
        &self.options
    }

    /// Every entry as `path?query`, oldest first
    pub fn entries(&self) -> Vec<String> {
        self.state.lock().entries.iter().map(render).collect()
    }

    /// Position of the active entry
    pub fn index(&self) -> usize {
        self.state.lock().index
    }

    pub fn entry_count(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn can_go_back(&self) -> bool {
        self.state.lock().index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        let state = self.state.lock();
        state.index + 1 < state.entries.len()
    }

    /// Traversals queued by `go` and not yet applied
    pub fn pending_traversals(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Apply queued traversals in order, firing listeners after each one that
    /// moved the active entry. Steps queued by listeners run in the same call.
    ///
    /// Returns how many traversals changed the active entry.
    pub fn process_traversals(&self) -> usize {
        let mut changed = 0;

        loop {
            let moved = {
                let mut state = self.state.lock();
                match state.pending.pop_front() {
                    Some(delta) => state.traverse(delta),
                    None => break,
                }
            };

            if moved {
                changed += 1;
                self.fire_change();
            }
        }

        changed
    }

    fn fire_change(&self) {
        let listeners: Vec<HostListener> = self.listeners.read().clone();
        for listener in listeners {
            listener();
        }
    }
}

impl NavigationHost for MemoryHost {
    fn location(&self) -> HostLocation {
        entry_location(self.state.lock().current())
    }

    fn push_entry(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock();
        let target = resolve(state.current(), url)?;

        let keep = state.index + 1;
        state.entries.truncate(keep);
        state.entries.push(target);
        state.index = state.entries.len() - 1;

        if let Some(max) = self.options.max_entries.filter(|max| *max > 0) {
            let excess = state.entries.len().saturating_sub(max);
            if excess > 0 {
                state.entries.drain(..excess);
                state.index -= excess;
            }
        }

        tracing::debug!(url = %url, index = state.index, "Pushed history entry");
        Ok(())
    }

    fn replace_entry(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock();
        let target = resolve(state.current(), url)?;

        let index = state.index;
        state.entries[index] = target;

        tracing::debug!(url = %url, index, "Replaced history entry");
        Ok(())
    }

    fn go(&self, delta: isize) {
        if self.options.immediate_traversal {
            let moved = self.state.lock().traverse(delta);
            if moved {
                self.fire_change();
            }
        } else {
            self.state.lock().pending.push_back(delta);
        }
    }

    fn on_change(&self, listener: HostListener) {
        self.listeners.write().push(listener);
    }
}

impl std::fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MemoryHost")
            .field(
                "entries",
                &state.entries.iter().map(render).collect::<Vec<_>>(),
            )
            .field("index", &state.index)
            .field("pending", &state.pending)
            .field("listeners", &self.listeners.read().len())
            .field("options", &self.options)
            .finish()
    }
}

/// Resolve `target` against `current`, staying on the same origin
fn resolve(current: &Url, target: &str) -> Result<Url> {
    let url = current
        .join(target)
        .map_err(|e| NavigationError::InvalidUrl(format!("{}: {}", target, e)))?;

    if url.origin() != current.origin() {
        return Err(NavigationError::CrossOrigin(target.to_string()));
    }

    Ok(url)
}

fn entry_location(url: &Url) -> HostLocation {
    let search = match url.query() {
        Some(query) if !query.is_empty() => format!("?{}", query),
        _ => String::new(),
    };

    HostLocation::new(url.path(), search)
}

fn render(url: &Url) -> String {
    let location = entry_location(url);
    format!("{}{}", location.pathname, location.search)
}
