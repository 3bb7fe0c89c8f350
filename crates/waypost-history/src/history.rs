//! History facade

use std::sync::{Arc, Weak};

use waypost_query::Params;

use crate::host::NavigationHost;
use crate::location::Location;
use crate::navigation::{Navigation, NavigationMode};
use crate::subscribers::{Subscribers, Subscription};
use crate::Result;

struct Inner<H> {
    host: H,
    subscribers: Arc<Subscribers>,
}

impl<H: NavigationHost> Inner<H> {
    fn location(&self) -> Location {
        Location::from(self.host.location())
    }

    fn notify(&self) {
        let callbacks = self.subscribers.snapshot();
        let location = self.location();

        tracing::debug!(
            location = %location,
            subscribers = callbacks.len(),
            "Notifying location subscribers"
        );

        for callback in callbacks {
            callback(&location);
        }
    }
}

/// Programmatic navigation over a [`NavigationHost`] with change
/// subscriptions.
///
/// Cloning is cheap and every clone shares the same host and subscribers.
pub struct History<H: NavigationHost> {
    inner: Arc<Inner<H>>,
}

impl<H> History<H>
where
    H: NavigationHost + Send + Sync + 'static,
{
    /// Wrap `host` and start listening for its traversal events
    pub fn new(host: H) -> Self {
        let inner = Arc::new(Inner {
            host,
            subscribers: Arc::new(Subscribers::default()),
        });

        let weak: Weak<Inner<H>> = Arc::downgrade(&inner);
        inner.host.on_change(Arc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.notify();
            }
        }));

        Self { inner }
    }
}

impl<H: NavigationHost> History<H> {
    pub fn host(&self) -> &H {
        &self.inner.host
    }

    /// Snapshot of the active entry
    pub fn current_location(&self) -> Location {
        self.inner.location()
    }

    /// Parsed query of the active entry
    pub fn params(&self) -> Params {
        self.inner.location().params
    }

    /// Call `callback` after every location change until unsubscribed
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Location) + Send + Sync + 'static,
    {
        self.inner.subscribers.add(Arc::new(callback))
    }

    /// Alias for [`History::subscribe`]
    pub fn listen<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Location) + Send + Sync + 'static,
    {
        self.subscribe(callback)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    /// Update the host and notify every subscriber before returning.
    ///
    /// A missing or empty pathname keeps the current one; a missing search
    /// clears the query. Host errors are returned as-is and nobody is
    /// notified.
    pub fn navigate(&self, navigation: impl Into<Navigation>) -> Result<()> {
        let Navigation {
            pathname,
            search,
            mode,
        } = navigation.into();

        let pathname = match pathname {
            Some(pathname) if !pathname.is_empty() => pathname,
            _ => self.inner.host.location().pathname,
        };
        let search = search
            .map(|search| search.to_query_string())
            .unwrap_or_default();
        let url = format!("{}{}", pathname, search);

        match mode {
            NavigationMode::Push => self.inner.host.push_entry(&url)?,
            NavigationMode::Replace => self.inner.host.replace_entry(&url)?,
        }

        tracing::debug!(url = %url, mode = %mode, "Navigated");

        self.inner.notify();
        Ok(())
    }

    /// Navigate with a new entry
    pub fn push(&self, navigation: impl Into<Navigation>) -> Result<()> {
        self.navigate(navigation.into().mode(NavigationMode::Push))
    }

    /// Alias for [`History::push`]
    pub fn go_to(&self, navigation: impl Into<Navigation>) -> Result<()> {
        self.push(navigation)
    }

    /// Navigate by overwriting the active entry
    pub fn replace(&self, navigation: impl Into<Navigation>) -> Result<()> {
        self.navigate(navigation.into().mode(NavigationMode::Replace))
    }

    /// Ask the host to step back one entry.
    ///
    /// Subscribers hear about it when the host reports the traversal, not
    /// from this call.
    pub fn go_back(&self) {
        self.inner.host.go(-1);
    }

    /// Ask the host to step forward one entry; see [`History::go_back`]
    pub fn go_forward(&self) {
        self.inner.host.go(1);
    }
}

impl<H: NavigationHost> Clone for History<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: NavigationHost> std::fmt::Debug for History<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("History")
            .field("location", &self.current_location().to_string())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NavigationError;
    use crate::memory::{MemoryHost, MemoryHostOptions};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn history_at(initial: &str) -> (History<Arc<MemoryHost>>, Arc<MemoryHost>) {
        let host = Arc::new(MemoryHost::new(initial).unwrap());
        (History::new(Arc::clone(&host)), host)
    }

    fn recorder<H: NavigationHost>(
        history: &History<H>,
    ) -> (Subscription, Arc<Mutex<Vec<Location>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = history.subscribe(move |location| sink.lock().push(location.clone()));
        (subscription, seen)
    }

    #[test]
    fn test_current_location() {
        let (history, _host) = history_at("/start?id=3&tag=a&tag=b");
        let location = history.current_location();

        assert_eq!(location.pathname, "/start");
        assert_eq!(location.search, "?id=3&tag=a&tag=b");
        assert_eq!(location.params.get("id").unwrap(), "3");
        assert_eq!(location.params.get_all("tag"), ["a", "b"]);
        assert_eq!(history.params(), location.params);
    }

    #[test]
    fn test_navigate_notifies_once() {
        let (history, _host) = history_at("/");
        let (_subscription, seen) = recorder(&history);

        history.navigate("/a").unwrap();

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].pathname, "/a");
        assert_eq!(seen[0].search, "");
    }

    #[test]
    fn test_navigate_object_form() {
        let (history, _host) = history_at("/");
        let (_subscription, seen) = recorder(&history);

        let params: Params = [("id", "3")].into_iter().collect();
        history.navigate(Navigation::to("/x").search(params)).unwrap();

        let location = history.current_location();
        assert_eq!(location.pathname, "/x");
        assert_eq!(location.search, "?id=3");
        assert_eq!(location.params.get("id").unwrap(), "3");
        assert_eq!(seen.lock()[0], location);
    }

    #[test]
    fn test_navigate_defaults() {
        let (history, host) = history_at("/keep?old=1");

        // No pathname keeps the current one, no search clears it
        history.navigate(Navigation::new()).unwrap();
        assert_eq!(history.current_location().to_string(), "/keep");

        history
            .navigate(Navigation::new().search("?q=rust"))
            .unwrap();
        assert_eq!(history.current_location().to_string(), "/keep?q=rust");

        history.navigate(("", "?q=again")).unwrap();
        assert_eq!(history.current_location().to_string(), "/keep?q=again");

        assert_eq!(host.entry_count(), 4);
    }

    #[test]
    fn test_raw_search_is_used_as_is() {
        let (history, _host) = history_at("/");
        history.go_to(("/list", "?page=2&sort=asc")).unwrap();

        let location = history.current_location();
        assert_eq!(location.search, "?page=2&sort=asc");
        assert_eq!(location.params.get_first("sort"), Some("asc"));
    }

    #[test]
    fn test_unsubscribe() {
        let (history, _host) = history_at("/");
        let (subscription, seen) = recorder(&history);
        let (_other, other_seen) = recorder(&history);

        history.push("/a").unwrap();
        subscription.unsubscribe();
        history.push("/b").unwrap();

        // Second unsubscribe is a no-op
        subscription.unsubscribe();
        history.push("/c").unwrap();

        assert_eq!(seen.lock().len(), 1);
        assert_eq!(other_seen.lock().len(), 3);
        assert_eq!(history.subscriber_count(), 1);
    }

    #[test]
    fn test_subscribe_during_notification() {
        let (history, _host) = history_at("/");
        let late_calls = Arc::new(AtomicUsize::new(0));

        let inner_history = history.clone();
        let counter = Arc::clone(&late_calls);
        let subscribed = Arc::new(AtomicUsize::new(0));
        let once = Arc::clone(&subscribed);
        history.subscribe(move |_| {
            if once.fetch_add(1, Ordering::SeqCst) == 0 {
                let counter = Arc::clone(&counter);
                inner_history.subscribe(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
        });

        history.navigate("/a").unwrap();
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);
        assert_eq!(history.subscriber_count(), 2);

        history.navigate("/b").unwrap();
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_during_notification() {
        let (history, _host) = history_at("/");
        let calls = Arc::new(Mutex::new(Vec::new()));

        let later: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let log = Arc::clone(&calls);
        let target = Arc::clone(&later);
        let first = history.subscribe(move |_| {
            log.lock().push("first");
            if let Some(subscription) = target.lock().as_ref() {
                subscription.unsubscribe();
            }
        });

        let log = Arc::clone(&calls);
        let second = history.subscribe(move |_| log.lock().push("second"));
        *later.lock() = Some(second);

        let log = Arc::clone(&calls);
        history.subscribe(move |_| log.lock().push("third"));

        // The pass already in progress still reaches everyone it started with
        history.navigate("/a").unwrap();
        assert_eq!(*calls.lock(), ["first", "second", "third"]);

        calls.lock().clear();
        history.navigate("/b").unwrap();
        assert_eq!(*calls.lock(), ["first", "third"]);

        first.unsubscribe();
        assert_eq!(history.subscriber_count(), 1);
    }

    #[test]
    fn test_navigate_from_subscriber() {
        let (history, _host) = history_at("/");
        let (_subscription, seen) = recorder(&history);

        let redirect = history.clone();
        history.subscribe(move |location| {
            if location.pathname == "/old" {
                redirect.replace("/new").unwrap();
            }
        });

        history.navigate("/old").unwrap();

        let paths: Vec<String> = seen.lock().iter().map(|l| l.pathname.clone()).collect();
        assert_eq!(paths, ["/old", "/new"]);
        assert_eq!(history.current_location().pathname, "/new");
    }

    #[test]
    fn test_replace_does_not_add_entry() {
        let (history, host) = history_at("/");
        history.push("/x").unwrap();
        history.replace("/y").unwrap();

        assert_eq!(host.entries(), ["/", "/y"]);

        history.go_back();
        host.process_traversals();
        assert_eq!(history.current_location().pathname, "/");
        assert_ne!(history.current_location().pathname, "/x");
    }

    #[test]
    fn test_back_and_forward_notify_through_host_event() {
        let (history, host) = history_at("/");
        history.push("/a").unwrap();
        history.push("/b").unwrap();
        let (_subscription, seen) = recorder(&history);

        history.go_back();
        assert!(seen.lock().is_empty());
        assert_eq!(history.current_location().pathname, "/b");

        assert_eq!(host.process_traversals(), 1);
        assert_eq!(seen.lock().len(), 1);
        assert_eq!(seen.lock()[0].pathname, "/a");

        history.go_forward();
        host.process_traversals();
        assert_eq!(seen.lock().len(), 2);
        assert_eq!(seen.lock()[1].pathname, "/b");
    }

    #[test]
    fn test_immediate_traversal() {
        let host = MemoryHost::with_options(
            "/",
            MemoryHostOptions {
                immediate_traversal: true,
                ..Default::default()
            },
        )
        .unwrap();
        let history = History::new(host);
        history.push("/a").unwrap();
        let (_subscription, seen) = recorder(&history);

        history.go_back();
        assert_eq!(seen.lock().len(), 1);
        assert_eq!(seen.lock()[0].pathname, "/");

        // Nothing before the first entry: no event, no notification
        history.go_back();
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_host_error_propagates_without_notifying() {
        let (history, host) = history_at("/");
        let (_subscription, seen) = recorder(&history);

        let err = history.push("https://example.com/elsewhere").unwrap_err();
        assert_eq!(
            err,
            NavigationError::CrossOrigin("https://example.com/elsewhere".to_string())
        );
        assert!(seen.lock().is_empty());
        assert_eq!(host.entries(), ["/"]);
    }

    #[test]
    fn test_dropped_history_detaches_from_host() {
        let (history, host) = history_at("/");
        history.push("/a").unwrap();
        drop(history);

        host.go(-1);
        assert_eq!(host.process_traversals(), 1);
        assert_eq!(host.location().pathname, "/");
    }
}
