//! Durable storage of settings and presets.
//!
//! `KeyValueStore` is the raw string store (browser `localStorage` in the app, a map in
//! tests). `Persistence` layers the two JSON records on top of it and never fails a load:
//! missing or malformed records come back as defaults.

use crate::config::{PRESETS_STORAGE_KEY, SETTINGS_STORAGE_KEY};
use crate::settings::{builtin_presets, is_custom_preset_id, TimerPreset, TimerSettings};
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No storage backend is reachable (private browsing, sandboxed iframe, ...).
    Unavailable,
    Read(String),
    Write(String),
    Serialize(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "Local storage is not available"),
            StorageError::Read(msg) => write!(f, "Failed to read from storage: {}", msg),
            StorageError::Write(msg) => write!(f, "Failed to write to storage: {}", msg),
            StorageError::Serialize(msg) => write!(f, "Failed to serialize record: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store for tests and headless use.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// `window.localStorage`, scoped to the page origin.
pub struct BrowserStorage {
    storage: Option<web_sys::Storage>,
}

impl BrowserStorage {
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|window| window.local_storage().ok())
            .flatten();
        if storage.is_none() {
            warn!("localStorage unavailable, settings will not survive a reload");
        }
        Self { storage }
    }
}

fn js_error_message(e: wasm_bindgen::JsValue) -> String {
    e.as_string().unwrap_or_else(|| "Storage error".to_string())
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .get_item(key)
            .map_err(|e| StorageError::Read(js_error_message(e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write(js_error_message(e)))
    }
}

/// The settings and preset records over a `KeyValueStore`.
pub struct Persistence<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored settings merged onto the defaults, or the defaults alone.
    pub fn load_settings(&self) -> TimerSettings {
        let raw = match self.store.get(SETTINGS_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return TimerSettings::default(),
            Err(e) => {
                warn!("{}; using default settings", e);
                return TimerSettings::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Discarding malformed {} record: {}", SETTINGS_STORAGE_KEY, e);
            TimerSettings::default()
        })
    }

    pub fn save_settings(&mut self, settings: &TimerSettings) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(settings).map_err(|e| StorageError::Serialize(e.to_string()))?;
        self.store.set(SETTINGS_STORAGE_KEY, &json)
    }

    /// The built-in presets followed by every stored custom preset, in stored order.
    ///
    /// Stored built-ins are dropped and re-derived, so their contents always follow the
    /// current defaults. Entries that fail to parse are skipped one by one.
    pub fn load_presets(&self) -> Vec<TimerPreset> {
        let mut presets = builtin_presets();

        let raw = match self.store.get(PRESETS_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return presets,
            Err(e) => {
                warn!("{}; using built-in presets only", e);
                return presets;
            }
        };

        let entries: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Discarding malformed {} record: {}", PRESETS_STORAGE_KEY, e);
                return presets;
            }
        };

        let custom = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<TimerPreset>(entry) {
                Ok(preset) => Some(preset),
                Err(e) => {
                    warn!("Skipping unreadable stored preset: {}", e);
                    None
                }
            })
            .filter(|preset| is_custom_preset_id(&preset.id));
        presets.extend(custom);

        debug!("Loaded {} presets", presets.len());
        presets
    }

    pub fn save_presets(&mut self, presets: &[TimerPreset]) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(presets).map_err(|e| StorageError::Serialize(e.to_string()))?;
        self.store.set(PRESETS_STORAGE_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStorage;

    impl KeyValueStore for FailingStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_missing_records_load_defaults() {
        let persistence = Persistence::new(MemoryStorage::new());
        assert_eq!(persistence.load_settings(), TimerSettings::default());
        assert_eq!(persistence.load_presets(), builtin_presets());
    }

    #[test]
    fn test_settings_round_trip() {
        let mut persistence = Persistence::new(MemoryStorage::new());
        let settings = TimerSettings {
            duration: 3,
            text: "BRB".to_string(),
            loop_timer: true,
            ..TimerSettings::default()
        };
        persistence.save_settings(&settings).unwrap();
        assert_eq!(persistence.load_settings(), settings);
    }

    #[test]
    fn test_partial_settings_record_merges_onto_defaults() {
        let storage =
            MemoryStorage::new().with_entry(SETTINGS_STORAGE_KEY, r##"{"textColor":"#000000"}"##);
        let settings = Persistence::new(storage).load_settings();
        assert_eq!(settings.text_color, "#000000");
        assert_eq!(settings.duration, 10);
    }

    #[test]
    fn test_malformed_settings_record_loads_defaults() {
        let storage = MemoryStorage::new().with_entry(SETTINGS_STORAGE_KEY, "{not json");
        assert_eq!(Persistence::new(storage).load_settings(), TimerSettings::default());

        let storage = MemoryStorage::new().with_entry(SETTINGS_STORAGE_KEY, r#"{"duration":"ten"}"#);
        assert_eq!(Persistence::new(storage).load_settings(), TimerSettings::default());
    }

    #[test]
    fn test_load_presets_keeps_only_custom_entries() {
        let stored = r#"[
            {"id":"1","name":"Tampered","settings":{"duration":99}},
            {"id":"10","name":"Standard copy","settings":{}},
            {"id":"1718000000000","name":"Intro","settings":{"duration":2,"text":"INTRO"}},
            {"id":"oops","name":"Bad id","settings":{}},
            {"name":"No id"},
            {"id":"1718000000001","name":"Outro","settings":{"duration":4}}
        ]"#;
        let storage = MemoryStorage::new().with_entry(PRESETS_STORAGE_KEY, stored);
        let presets = Persistence::new(storage).load_presets();

        let ids: Vec<&str> = presets.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "5", "10", "15", "30", "1718000000000", "1718000000001"]);
        assert_eq!(presets[0].name, "Quick Start (1 min)");
        assert_eq!(presets[0].settings.duration, 1);
        assert_eq!(presets[5].settings.text, "INTRO");
        assert_eq!(presets[6].settings.font_size, 72);
    }

    #[test]
    fn test_malformed_presets_record_loads_builtins() {
        let storage = MemoryStorage::new().with_entry(PRESETS_STORAGE_KEY, r#"{"id":"7"}"#);
        assert_eq!(Persistence::new(storage).load_presets(), builtin_presets());
    }

    #[test]
    fn test_failing_backend_never_blocks_loading() {
        let mut persistence = Persistence::new(FailingStorage);
        assert_eq!(persistence.load_settings(), TimerSettings::default());
        assert_eq!(persistence.load_presets(), builtin_presets());
        assert_eq!(
            persistence.save_settings(&TimerSettings::default()),
            Err(StorageError::Write("quota exceeded".to_string()))
        );
    }

    #[test]
    fn test_storage_error_display() {
        assert_eq!(StorageError::Unavailable.to_string(), "Local storage is not available");
        assert_eq!(
            StorageError::Write("full".to_string()).to_string(),
            "Failed to write to storage: full"
        );
    }
}
