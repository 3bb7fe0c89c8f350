//! `window.history` host for wasm builds

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::error::NavigationError;
use crate::host::{HostListener, HostLocation, NavigationHost};
use crate::Result;

/// Navigation host backed by the page's session history.
///
/// Holds no state of its own; every call goes to the current `window`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHost;

impl BrowserHost {
    pub fn new() -> Self {
        Self
    }
}

fn history() -> Result<web_sys::History> {
    let window = web_sys::window().ok_or_else(|| NavigationError::Host("no window".to_string()))?;
    window.history().map_err(js_error)
}

fn js_error(value: JsValue) -> NavigationError {
    NavigationError::Host(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}

impl NavigationHost for BrowserHost {
    fn location(&self) -> HostLocation {
        let Some(window) = web_sys::window() else {
            return HostLocation::default();
        };
        let location = window.location();

        HostLocation::new(
            location.pathname().unwrap_or_default(),
            location.search().unwrap_or_default(),
        )
    }

    fn push_entry(&self, url: &str) -> Result<()> {
        history()?
            .push_state_with_url(&JsValue::NULL, "", Some(url))
            .map_err(js_error)
    }

    fn replace_entry(&self, url: &str) -> Result<()> {
        history()?
            .replace_state_with_url(&JsValue::NULL, "", Some(url))
            .map_err(js_error)
    }

    fn go(&self, delta: isize) {
        let result = history().and_then(|history| {
            history
                .go_with_delta(delta as i32)
                .map_err(js_error)
        });

        if let Err(e) = result {
            tracing::warn!(delta, error = %e, "History traversal failed");
        }
    }

    fn on_change(&self, listener: HostListener) {
        let Some(window) = web_sys::window() else {
            tracing::warn!("No window available, popstate listener not registered");
            return;
        };

        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            listener();
        });

        if let Err(e) =
            window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
        {
            tracing::warn!(error = %js_error(e), "Failed to register popstate listener");
            return;
        }

        // Lives as long as the page
        closure.forget();
    }
}
