mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::core::error::StoreError;
use crate::core::value::{Draft, Value};

pub type SubscriptionId = u64;
pub type Listener = Box<dyn FnMut(&str, &Value) + Send>;

/// Explicit home for draft answers. Components receive a store by reference
/// instead of reaching for ambient state.
pub trait DraftStore {
    fn get(&self, key: &str) -> Option<&Value>;

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;

    fn merge(&mut self, values: Draft) -> Result<(), StoreError> {
        for (key, value) in values {
            self.set(&key, value)?;
        }
        Ok(())
    }

    fn snapshot(&self) -> Draft;

    /// Listeners run synchronously after every write with the changed key.
    fn subscribe(&mut self, listener: Listener) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}
