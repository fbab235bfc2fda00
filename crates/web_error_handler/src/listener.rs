use std::borrow::Cow;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::Request;
use crate::error::HandlerError;

/// Side-effect hook run for every intercepted failure, before the error
/// response is generated.
pub trait ErrorListener: Send + Sync + 'static {
    fn trigger(&self, error: &HandlerError, request: &Request);
}

impl<F> ErrorListener for F
where
    F: Fn(&HandlerError, &Request) + Send + Sync + 'static,
{
    fn trigger(&self, error: &HandlerError, request: &Request) {
        (self)(error, request)
    }
}

/// Registration key. One listener per key.
pub type ListenerKey = Cow<'static, str>;

/// Keyed, ordered set of error listeners.
#[derive(Default)]
pub struct ListenerRegistry {
    entries: RwLock<Vec<(ListenerKey, Arc<dyn ErrorListener>)>>,
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.read();
        f.debug_list()
            .entries(entries.iter().map(|(key, _)| key))
            .finish()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener under `key`. An existing listener with the same key is
    /// replaced and keeps its position; the replaced listener is returned.
    pub fn register<K, L>(&self, key: K, listener: L) -> Option<Arc<dyn ErrorListener>>
    where
        K: Into<ListenerKey>,
        L: ErrorListener,
    {
        let key = key.into();
        let listener: Arc<dyn ErrorListener> = Arc::new(listener);
        let mut entries = self.entries.write();
        match entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => {
                tracing::debug!(listener = %key, "replacing error listener");
                Some(std::mem::replace(slot, listener))
            }
            None => {
                entries.push((key, listener));
                None
            }
        }
    }

    pub fn remove(&self, key: &str) -> Option<Arc<dyn ErrorListener>> {
        let mut entries = self.entries.write();
        let index = entries.iter().position(|(existing, _)| existing == key)?;
        Some(entries.remove(index).1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().iter().any(|(existing, _)| existing == key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Trigger every listener in registration order.
    ///
    /// Listeners run on a snapshot taken under the read lock, so a listener
    /// may register or remove listeners without deadlocking.
    pub fn notify_all(&self, error: &HandlerError, request: &Request) {
        let snapshot: Vec<Arc<dyn ErrorListener>> = self
            .entries
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener.trigger(error, request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use std::sync::Mutex;

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl ErrorListener for Recorder {
        fn trigger(&self, error: &HandlerError, request: &Request) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}:{}", self.name, request.path(), error.message()));
        }
    }

    fn recorder(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Recorder {
        Recorder {
            name,
            log: log.clone(),
        }
    }

    #[test]
    fn notifies_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = ListenerRegistry::new();
        registry.register("first", recorder("first", &log));
        registry.register("second", recorder("second", &log));

        registry.notify_all(&HandlerError::new("boom"), &Request::new(Method::GET, "/x"));
        assert_eq!(*log.lock().unwrap(), vec!["first:/x:boom", "second:/x:boom"]);
    }

    #[test]
    fn same_key_replaces_in_place() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = ListenerRegistry::new();
        assert!(registry.register("audit", recorder("old", &log)).is_none());
        registry.register("metrics", recorder("metrics", &log));
        assert!(registry.register(String::from("audit"), recorder("new", &log)).is_some());
        assert_eq!(registry.len(), 2);

        registry.notify_all(&HandlerError::new("e"), &Request::new(Method::GET, "/"));
        assert_eq!(*log.lock().unwrap(), vec!["new:/:e", "metrics:/:e"]);
    }

    #[test]
    fn remove_and_contains() {
        let registry = ListenerRegistry::new();
        assert!(registry.is_empty());
        registry.register("noop", |_: &HandlerError, _: &Request| {});
        assert!(registry.contains("noop"));
        assert!(registry.remove("noop").is_some());
        assert!(registry.remove("noop").is_none());
        assert!(!registry.contains("noop"));
    }

    #[test]
    fn listener_may_touch_registry_while_notified() {
        let registry = Arc::new(ListenerRegistry::new());
        let inner = Arc::clone(&registry);
        registry.register("self-removing", move |_: &HandlerError, _: &Request| {
            inner.remove("self-removing");
        });
        registry.notify_all(&HandlerError::new("e"), &Request::new(Method::GET, "/"));
        assert!(registry.is_empty());
    }
}
