use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// handle returned by [`Listeners::subscribe`], used to unsubscribe again
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct SubscriptionId(u64);

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Ordered list of subscribers for one kind of notification.
///
/// Subscribers are invoked in registration order. An empty list makes
/// `notify` a no-op. Subscribers run outside of the internal lock, so a
/// subscriber may subscribe or unsubscribe others while being notified.
pub struct Listeners<T> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(SubscriptionId, Listener<T>)>>,
}

impl<T> Listeners<T> {
    pub fn new() -> Listeners<T> {
        Listeners {
            next_id: AtomicU64::new(0),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((id, Arc::new(listener)));
        id
    }

    /// returns false if `id` was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.lock();
        let len_before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != len_before
    }

    pub fn notify(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = self
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in snapshot {
            listener(value);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Listener<T>)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("subscribers", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifies_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let listeners: Listeners<u32> = Listeners::new();
        for tag in 0..3 {
            let seen = seen.clone();
            listeners.subscribe(move |v: &u32| seen.lock().unwrap().push((tag, *v)));
        }
        listeners.notify(&7);
        assert_eq!(*seen.lock().unwrap(), vec![(0, 7), (1, 7), (2, 7)]);
    }

    #[test]
    fn unsubscribe_removes_only_that_listener() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let listeners: Listeners<&'static str> = Listeners::new();
        let a = {
            let seen = seen.clone();
            listeners.subscribe(move |v: &&str| seen.lock().unwrap().push(format!("a{}", v)))
        };
        {
            let seen = seen.clone();
            listeners.subscribe(move |v: &&str| seen.lock().unwrap().push(format!("b{}", v)));
        }
        assert!(listeners.unsubscribe(a));
        assert!(!listeners.unsubscribe(a));
        listeners.notify(&"!");
        assert_eq!(*seen.lock().unwrap(), vec!["b!".to_string()]);
        assert_eq!(listeners.len(), 1);
    }

    #[test]
    fn empty_list_is_a_noop() {
        let listeners: Listeners<u8> = Listeners::default();
        assert!(listeners.is_empty());
        listeners.notify(&1);
    }

    #[test]
    fn listener_may_subscribe_while_notified() {
        let listeners: Arc<Listeners<u8>> = Arc::new(Listeners::new());
        let inner = listeners.clone();
        listeners.subscribe(move |_| {
            inner.subscribe(|_| {});
        });
        listeners.notify(&0);
        assert_eq!(listeners.len(), 2);
    }
}
