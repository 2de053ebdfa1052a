pub mod json_store;
pub mod memory;
pub mod progress;
pub mod schema;

use anyhow::Result;

/// String key-value storage for session progress.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}
