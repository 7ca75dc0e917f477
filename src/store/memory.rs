use super::{DraftStore, Listener, SubscriptionId};
use crate::core::error::StoreError;
use crate::core::value::{Draft, Value};
use tracing::trace;

#[derive(Default)]
pub struct MemoryStore {
    values: Draft,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: SubscriptionId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_draft(values: Draft) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn notify(&mut self, key: &str) {
        let Some(value) = self.values.get(key) else {
            return;
        };
        for (_, listener) in &mut self.listeners {
            listener(key, value);
        }
    }
}

impl DraftStore for MemoryStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        if self.values.get(key) == Some(&value) {
            return Ok(());
        }
        trace!(key, "draft value set");
        self.values.insert(key.to_string(), value);
        self.notify(key);
        Ok(())
    }

    fn snapshot(&self) -> Draft {
        self.values.clone()
    }

    fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::core::value::{Draft, Value};
    use crate::store::DraftStore;
    use std::sync::{Arc, Mutex};

    #[test]
    fn listeners_see_changed_keys_only() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut store = MemoryStore::new();
        store.subscribe(Box::new(move |key, value| {
            sink.lock()
                .expect("lock")
                .push((key.to_string(), value.to_text()));
        }));

        store.set("city", Value::text("Austin")).expect("set");
        store.set("city", Value::text("Austin")).expect("set");
        store.set("state", Value::text("TX")).expect("set");

        let seen = seen.lock().expect("lock");
        assert_eq!(
            *seen,
            vec![
                ("city".to_string(), "Austin".to_string()),
                ("state".to_string(), "TX".to_string()),
            ]
        );
    }

    #[test]
    fn unsubscribed_listener_stops_receiving() {
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        let mut store = MemoryStore::new();
        let id = store.subscribe(Box::new(move |_, _| *sink.lock().expect("lock") += 1));

        store.set("a", Value::text("1")).expect("set");
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set("a", Value::text("2")).expect("set");

        assert_eq!(*count.lock().expect("lock"), 1);
    }

    #[test]
    fn merge_keeps_existing_keys() {
        let mut initial = Draft::new();
        initial.insert("a".to_string(), Value::text("1"));
        let mut store = MemoryStore::from_draft(initial);

        let mut update = Draft::new();
        update.insert("b".to_string(), Value::text("2"));
        store.merge(update).expect("merge");

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a"), Some(&Value::text("1")));
        assert_eq!(store.snapshot().get("b"), Some(&Value::text("2")));
    }
}
