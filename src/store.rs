//! The timer/settings state manager.
//!
//! `TimerStore` owns the countdown, the current settings and the preset list for the life
//! of the page. Every mutating action writes its record through to storage before
//! returning; the countdown itself is never persisted.

use crate::config::{AUTO_START_DELAY_MS, MAX_RESERVED_PRESET_ID, TICK_MS};
use crate::notify::Notifier;
use crate::scheduler::{Scheduler, TimerEvent};
use crate::settings::{is_custom_preset_id, SettingsPatch, TimerPreset, TimerSettings};
use crate::storage::{KeyValueStore, Persistence};
use crate::utils::format_clock;
use crate::{now_ms, url_codec};
use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountdownState {
    pub is_running: bool,
    pub is_paused: bool,
    /// Seconds left; zero or below means finished.
    pub time_remaining: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Finished,
}

impl TimerPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::Finished => "finished",
        }
    }
}

/// Where the display surface took its configuration from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Settings came from URL parameters; storage was not read.
    Url { fields: usize, auto_start: bool },
    Storage,
}

pub struct TimerStore<S: KeyValueStore, N: Notifier, K: Scheduler> {
    settings: TimerSettings,
    presets: Vec<TimerPreset>,
    countdown: CountdownState,
    /// Present iff the countdown is running.
    ticker: Option<K::Handle>,
    pending_start: Option<K::Handle>,
    persistence: Persistence<S>,
    notifier: N,
    scheduler: K,
    clock: fn() -> u64,
    last_preset_id: u64,
}

impl<S: KeyValueStore, N: Notifier, K: Scheduler> TimerStore<S, N, K> {
    /// A store holding defaults. Nothing is read from storage until `initialize`.
    pub fn new(storage: S, notifier: N, scheduler: K) -> Self {
        let settings = TimerSettings::default();
        let countdown = CountdownState {
            time_remaining: settings.total_seconds(),
            ..CountdownState::default()
        };
        Self {
            settings,
            presets: crate::settings::builtin_presets(),
            countdown,
            ticker: None,
            pending_start: None,
            persistence: Persistence::new(storage),
            notifier,
            scheduler,
            clock: now_ms,
            last_preset_id: MAX_RESERVED_PRESET_ID as u64,
        }
    }

    /// Replace the wall clock used to mint preset ids.
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    // ── reads ────────────────────────────────────────────────────────────────

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn presets(&self) -> &[TimerPreset] {
        &self.presets
    }

    pub fn countdown(&self) -> CountdownState {
        self.countdown
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_running
    }

    pub fn is_paused(&self) -> bool {
        self.countdown.is_paused
    }

    pub fn time_remaining(&self) -> i64 {
        self.countdown.time_remaining
    }

    pub fn is_finished(&self) -> bool {
        self.countdown.time_remaining <= 0
    }

    pub fn phase(&self) -> TimerPhase {
        if self.countdown.is_running {
            TimerPhase::Running
        } else if self.countdown.is_paused {
            TimerPhase::Paused
        } else if self.is_finished() {
            TimerPhase::Finished
        } else {
            TimerPhase::Idle
        }
    }

    /// Remaining time as `MM:SS`.
    pub fn formatted_time(&self) -> String {
        format_clock(self.countdown.time_remaining)
    }

    /// Elapsed share of the full duration, 0..=100. Not finite for a zero duration.
    pub fn progress_percentage(&self) -> f64 {
        let total = self.settings.total_seconds() as f64;
        (total - self.countdown.time_remaining as f64) / total * 100.0
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    // ── lifecycle ────────────────────────────────────────────────────────────

    /// Load both records from storage and reset the countdown to the stored duration.
    pub fn initialize(&mut self) {
        self.load_from_storage();
        self.reset();
    }

    /// Configure the display surface from `current_url`, or from storage when the URL
    /// carries no settings. The two sources are never merged.
    pub fn apply_url_or_storage_on_load(&mut self, current_url: &str) -> LoadSource {
        let patch = url_codec::decode(current_url);
        if patch.is_empty() {
            info!("No URL settings found, loading from storage");
            self.load_from_storage();
            // A countdown started on the setup surface keeps running.
            if !self.countdown.is_running {
                self.reset();
            }
            return LoadSource::Storage;
        }

        let fields = patch.field_count();
        let auto_start = patch.auto_start == Some(true);
        info!("Applying {} settings from URL", fields);
        self.update_settings(patch);

        if auto_start {
            debug!("Auto-start in {} ms", AUTO_START_DELAY_MS);
            self.pending_start = Some(
                self.scheduler
                    .after(AUTO_START_DELAY_MS, TimerEvent::DelayedStart),
            );
        }
        LoadSource::Url { fields, auto_start }
    }

    /// Release every scheduled task. The countdown stops where it is.
    pub fn teardown(&mut self) {
        self.pending_start = None;
        self.stop();
        debug!("Timer store torn down");
    }

    /// Route a fired scheduler task to its action.
    pub fn handle_event(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::Tick => self.tick(),
            TimerEvent::DelayedStart => {
                if self.pending_start.take().is_some() {
                    self.start();
                }
            }
        }
    }

    // ── countdown ────────────────────────────────────────────────────────────

    pub fn start(&mut self) {
        if self.countdown.is_running {
            debug!("start ignored, countdown already running");
            return;
        }
        if self.countdown.time_remaining <= 0 {
            self.reset();
        }

        self.countdown.is_running = true;
        self.countdown.is_paused = false;
        // Drop any previous handle before registering the new one.
        self.ticker = None;
        self.ticker = Some(self.scheduler.every(TICK_MS, TimerEvent::Tick));
        debug!("Countdown started at {}s", self.countdown.time_remaining);
    }

    /// One second elapsed.
    pub fn tick(&mut self) {
        if !self.countdown.is_running {
            return;
        }
        if self.countdown.time_remaining > 0 {
            self.countdown.time_remaining -= 1;
            return;
        }

        self.stop();
        info!("Countdown finished");
        if self.settings.play_sound {
            self.notifier.emit_notification();
        }
        if self.settings.loop_timer {
            debug!("Looping countdown");
            self.reset();
            self.start();
        }
    }

    pub fn pause(&mut self) {
        if !self.countdown.is_running {
            return;
        }
        self.countdown.is_running = false;
        self.countdown.is_paused = true;
        self.ticker = None;
        debug!("Countdown paused at {}s", self.countdown.time_remaining);
    }

    /// Halt the countdown, keeping the remaining time.
    pub fn stop(&mut self) {
        self.countdown.is_running = false;
        self.countdown.is_paused = false;
        self.ticker = None;
    }

    /// Halt the countdown and rewind it to the full duration.
    pub fn reset(&mut self) {
        self.stop();
        self.countdown.time_remaining = self.settings.total_seconds();
    }

    // ── settings & presets ───────────────────────────────────────────────────

    /// Merge `patch` into the settings and persist them. A new duration rewinds the
    /// countdown unless it is running.
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.settings.apply(&patch);
        self.persist_settings();

        if patch.duration.is_some() && !self.countdown.is_running {
            self.countdown.time_remaining = self.settings.total_seconds();
        }
    }

    /// Switch to the preset with `id`. Returns whether it existed.
    pub fn load_preset(&mut self, id: &str) -> bool {
        let Some(preset) = self.presets.iter().find(|p| p.id == id) else {
            debug!("No preset with id {:?}", id);
            return false;
        };

        self.settings = preset.settings.clone();
        info!("Loaded preset {:?}", preset.name);
        self.reset();
        self.persist_settings();
        true
    }

    /// Save `settings` as a new preset and return its id.
    pub fn add_custom_preset(&mut self, name: &str, settings: TimerSettings) -> String {
        let id = self.next_preset_id().to_string();
        self.presets.push(TimerPreset {
            id: id.clone(),
            name: name.to_string(),
            settings,
        });
        info!("Added preset {:?} ({})", name, id);
        self.persist_presets();
        id
    }

    /// Remove a custom preset. Built-ins and unknown ids are left alone.
    pub fn delete_preset(&mut self, id: &str) -> bool {
        if !is_custom_preset_id(id) {
            debug!("Refusing to delete preset {:?}", id);
            return false;
        }
        let Some(index) = self.presets.iter().position(|p| p.id == id) else {
            return false;
        };

        let removed = self.presets.remove(index);
        info!("Deleted preset {:?}", removed.name);
        self.persist_presets();
        true
    }

    /// URL that reproduces the current settings on the display surface of `page_url`.
    pub fn shareable_url(&self, page_url: &str) -> Result<String, url::ParseError> {
        url_codec::encode(&self.settings, page_url)
    }

    // ── internals ────────────────────────────────────────────────────────────

    fn load_from_storage(&mut self) {
        self.settings = self.persistence.load_settings();
        self.presets = self.persistence.load_presets();
        self.last_preset_id = self
            .presets
            .iter()
            .filter(|p| is_custom_preset_id(&p.id))
            .filter_map(|p| p.id.parse::<u64>().ok())
            .fold(self.last_preset_id, u64::max);
        info!(
            "Loaded from storage: {} min, {} presets",
            self.settings.duration,
            self.presets.len()
        );
    }

    /// Timestamp-derived, strictly increasing within this store.
    fn next_preset_id(&mut self) -> u64 {
        let id = (self.clock)().max(self.last_preset_id + 1);
        self.last_preset_id = id;
        id
    }

    fn persist_settings(&mut self) {
        if let Err(e) = self.persistence.save_settings(&self.settings) {
            warn!("Could not save settings: {}", e);
        }
    }

    fn persist_presets(&mut self) {
        if let Err(e) = self.persistence.save_presets(&self.presets) {
            warn!("Could not save presets: {}", e);
        }
    }
}

impl<S: KeyValueStore, N: Notifier, K: Scheduler> Drop for TimerStore<S, N, K> {
    fn drop(&mut self) {
        self.teardown();
    }
}
