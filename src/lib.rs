//! Core of the stream countdown overlay: the timer/settings store and the two
//! serialization boundaries it owns (browser-source URLs and local storage).
//!
//! Everything here is platform-neutral except the `Browser*` collaborators, so the state
//! machine can be driven and tested natively with in-memory fakes.

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

pub mod config;
pub mod logging;
pub mod notify;
pub mod route;
pub mod scheduler;
pub mod settings;
pub mod storage;
pub mod store;
pub mod url_codec;
pub mod utils;

pub use notify::Notifier;
pub use route::Route;
pub use scheduler::{BrowserScheduler, BrowserTask, Scheduler, TimerEvent};
pub use settings::{builtin_presets, SettingsPatch, TimerPreset, TimerSettings};
pub use storage::{BrowserStorage, KeyValueStore, MemoryStorage, Persistence, StorageError};
pub use store::{CountdownState, LoadSource, TimerPhase, TimerStore};

/// Milliseconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}
