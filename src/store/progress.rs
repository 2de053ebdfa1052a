use tracing::{debug, warn};

use crate::store::KeyValueStore;
use crate::store::schema::{PROGRESS_KEY, ProgressSnapshot};

/// Best-effort persistence of the progress snapshot. Reads and writes never
/// fail outward: problems are logged and treated as "no saved progress".
pub struct ProgressKeeper {
    store: Box<dyn KeyValueStore>,
}

impl ProgressKeeper {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Option<ProgressSnapshot> {
        let raw = match self.store.get(PROGRESS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(?err, "Reading saved progress failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                warn!(%err, "Saved progress is malformed, starting fresh");
                None
            }
        }
    }

    pub fn save(&mut self, snapshot: &ProgressSnapshot) {
        let json = match serde_json::to_string(snapshot) {
            Ok(json) => json,
            Err(err) => {
                warn!(%err, "Serializing progress failed");
                return;
            }
        };
        match self.store.set(PROGRESS_KEY, &json) {
            Ok(()) => debug!(
                position = snapshot.current_position,
                score = snapshot.score,
                "Progress saved"
            ),
            Err(err) => warn!(?err, "Saving progress failed"),
        }
    }

    pub fn clear(&mut self) {
        match self.store.remove(PROGRESS_KEY) {
            Ok(()) => debug!("Saved progress cleared"),
            Err(err) => warn!(?err, "Clearing saved progress failed"),
        }
    }
}
