use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::trace;

use crate::pattern;
use crate::value::{StateValue, SubscriptionId};

/// Callback type for state change notifications.
pub type ChangeHandler = Arc<dyn Fn(&str, &StateValue) + Send + Sync>;

/// Path-addressed state with pattern subscriptions.
///
/// - `set(path, value)` stores a value and notifies matching subscribers.
/// - `update(path, f)` runs a read-modify-write under a single write lock,
///   so an optimistic mutation can never interleave with another writer.
/// - `get` / `get_as` read the current value.
/// - `subscribe(pattern, handler)` observes changes (`+` / `#` wildcards).
///
/// Handlers run synchronously on the writing thread, after the value lock
/// has been released, so a handler may read the store freely.
pub struct StateStore {
    values: RwLock<BTreeMap<String, StateValue>>,
    subscribers: RwLock<Vec<Subscriber>>,
    next_id: AtomicU64,
}

#[derive(Clone)]
struct Subscriber {
    id: SubscriptionId,
    pattern: String,
    handler: ChangeHandler,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    // ====================================================================
    // Write
    // ====================================================================

    /// Store a typed value at `path` and notify subscribers.
    pub fn set<T: Any + Send + Sync>(&self, path: &str, value: T) {
        self.set_value(path, StateValue::new(value));
    }

    /// Store a pre-built value at `path` and notify subscribers.
    pub fn set_value(&self, path: &str, value: StateValue) {
        {
            let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
            values.insert(path.to_string(), value.clone());
        }
        self.notify(path, &value);
    }

    /// Atomically modify the `T` stored at `path`.
    ///
    /// The current value is cloned, mutated by `f`, and written back while
    /// the write lock is held. Returns `None` without calling `f` when the
    /// path is empty or holds a different type; subscribers are notified
    /// only when a write happened.
    pub fn update<T, R, F>(&self, path: &str, f: F) -> Option<R>
    where
        T: Any + Clone + Send + Sync,
        F: FnOnce(&mut T) -> R,
    {
        let (result, value) = {
            let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
            let mut current = values.get(path)?.cloned::<T>()?;
            let result = f(&mut current);
            let value = StateValue::new(current);
            values.insert(path.to_string(), value.clone());
            (result, value)
        };
        self.notify(path, &value);
        Some(result)
    }

    /// Remove the value at `path`. Does not notify subscribers.
    pub fn remove(&self, path: &str) -> Option<StateValue> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.remove(path)
    }

    /// Drop every value under `prefix/` (the prefix itself is kept).
    pub fn remove_prefix(&self, prefix: &str) -> usize {
        let scan_prefix = format!("{}/", prefix);
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        let before = values.len();
        values.retain(|k, _| !k.starts_with(&scan_prefix));
        before - values.len()
    }

    /// Drop all values. Subscriptions are kept.
    pub fn clear(&self) {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.clear();
    }

    // ====================================================================
    // Read
    // ====================================================================

    pub fn get(&self, path: &str) -> Option<StateValue> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.get(path).cloned()
    }

    /// Read and clone the `T` stored at `path`.
    pub fn get_as<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.get(path).and_then(|v| v.cloned::<T>())
    }

    /// Entries strictly below `prefix/`, ordered by path.
    pub fn scan(&self, prefix: &str) -> Vec<(String, StateValue)> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        let scan_prefix = format!("{}/", prefix);
        values
            .range(scan_prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&scan_prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn contains(&self, path: &str) -> bool {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.contains_key(path)
    }

    pub fn len(&self) -> usize {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ====================================================================
    // Subscriptions
    // ====================================================================

    /// Observe writes to paths matching `pattern`.
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut subs = self.subscribers.write().unwrap_or_else(PoisonError::into_inner);
        subs.push(Subscriber {
            id,
            pattern: pattern.to_string(),
            handler: Arc::new(handler),
        });
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut subs = self.subscribers.write().unwrap_or_else(PoisonError::into_inner);
        subs.retain(|s| s.id != id);
    }

    fn notify(&self, path: &str, value: &StateValue) {
        let matched: Vec<ChangeHandler> = {
            let subs = self.subscribers.read().unwrap_or_else(PoisonError::into_inner);
            subs.iter()
                .filter(|s| pattern::matches(&s.pattern, path))
                .map(|s| s.handler.clone())
                .collect()
        };
        trace!(path, subscribers = matched.len(), "state changed");
        for handler in matched {
            handler(path, value);
        }
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
