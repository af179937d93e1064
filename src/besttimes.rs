//! Best time records per level
//!
//! Persisted to LocalStorage. Storage may be unavailable (private browsing,
//! quota), so every read and write degrades to "no record" instead of failing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Minimal key-value storage the records are kept in
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    /// Returns false when the write did not stick
    fn set(&mut self, key: &str, value: &str) -> bool;
}

/// In-memory store (native builds, tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        self.entries.insert(key.to_string(), value.to_string());
        true
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        Self::storage()
            .map(|s| s.set_item(key, value).is_ok())
            .unwrap_or(false)
    }
}

/// Best elapsed time (ms) keyed by level id
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BestTimes {
    pub entries: BTreeMap<String, f64>,
}

impl BestTimes {
    /// Storage key
    const STORAGE_KEY: &'static str = "marble_rush_best_times";

    /// Create empty record book
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Best time for a level, 0.0 meaning "no record"
    pub fn best(&self, level_id: &str) -> f64 {
        self.entries.get(level_id).copied().unwrap_or(0.0)
    }

    /// Check if a time would beat the current record
    pub fn qualifies(&self, level_id: &str, elapsed_ms: f64) -> bool {
        if !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
            return false;
        }
        let best = self.best(level_id);
        best <= 0.0 || elapsed_ms < best
    }

    /// Record a finish time. Returns true if it is a new record.
    pub fn record(&mut self, level_id: &str, elapsed_ms: f64) -> bool {
        if !self.qualifies(level_id, elapsed_ms) {
            return false;
        }
        self.entries.insert(level_id.to_string(), elapsed_ms);
        true
    }

    /// Check if no level has a record yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load records from a store, starting fresh on any failure
    pub fn load_from(store: &dyn KeyValueStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            if let Ok(times) = serde_json::from_str::<BestTimes>(&json) {
                log::info!("Loaded {} best times", times.entries.len());
                return times;
            }
            log::warn!("Best times unreadable, starting fresh");
        }

        log::info!("No best times found, starting fresh");
        Self::new()
    }

    /// Save records to a store (failures are swallowed)
    pub fn save_to(&self, store: &mut dyn KeyValueStore) {
        if let Ok(json) = serde_json::to_string(self) {
            if store.set(Self::STORAGE_KEY, &json) {
                log::info!("Best times saved ({} levels)", self.entries.len());
            } else {
                log::warn!("Best times could not be saved");
            }
        }
    }

    /// Load records from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::load_from(&LocalStore)
    }

    /// Save records to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        self.save_to(&mut LocalStore);
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Format elapsed milliseconds as `m:ss.cc`
pub fn format_time(ms: f64) -> String {
    if !ms.is_finite() || ms < 0.0 {
        return "0:00.00".to_string();
    }
    let total_centis = (ms / 10.0).floor() as u64;
    let minutes = total_centis / 6000;
    let seconds = (total_centis / 100) % 60;
    let centis = total_centis % 100;
    format!("{}:{:02}.{:02}", minutes, seconds, centis)
}
