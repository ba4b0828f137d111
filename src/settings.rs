//! Settings and preset data model.
//!
//! `TimerSettings` is the full record the overlay is rendered from. Its JSON form uses the
//! camelCase field names the `timerSettings` storage record has always used, and every
//! field falls back to its default when missing, so older stored records keep loading
//! after new fields are added.

use crate::config::{
    BUILTIN_PRESET_IDS, DEFAULT_BACKGROUND, DEFAULT_DURATION_MIN, DEFAULT_FONT_FAMILY,
    DEFAULT_FONT_SIZE_PX, DEFAULT_TEXT, DEFAULT_TEXT_COLOR, MAX_RESERVED_PRESET_ID,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimerSettings {
    /// Countdown length in minutes.
    pub duration: i32,
    pub text: String,
    pub background_color: String,
    pub text_color: String,
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: i32,
    pub show_progress_bar: bool,
    pub auto_start: bool,
    pub loop_timer: bool,
    pub play_sound: bool,
    pub transparent_background: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION_MIN,
            text: DEFAULT_TEXT.to_string(),
            background_color: DEFAULT_BACKGROUND.to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE_PX,
            show_progress_bar: true,
            auto_start: false,
            loop_timer: false,
            play_sound: true,
            transparent_background: false,
        }
    }
}

impl TimerSettings {
    /// Full countdown length in seconds. Non-positive durations give a non-positive total.
    pub fn total_seconds(&self) -> i64 {
        i64::from(self.duration) * 60
    }

    /// Shallow-merge `patch` into these settings.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(v) = patch.duration {
            self.duration = v;
        }
        if let Some(v) = &patch.text {
            self.text = v.clone();
        }
        if let Some(v) = &patch.background_color {
            self.background_color = v.clone();
        }
        if let Some(v) = &patch.text_color {
            self.text_color = v.clone();
        }
        if let Some(v) = &patch.font_family {
            self.font_family = v.clone();
        }
        if let Some(v) = patch.font_size {
            self.font_size = v;
        }
        if let Some(v) = patch.show_progress_bar {
            self.show_progress_bar = v;
        }
        if let Some(v) = patch.auto_start {
            self.auto_start = v;
        }
        if let Some(v) = patch.loop_timer {
            self.loop_timer = v;
        }
        if let Some(v) = patch.play_sound {
            self.play_sound = v;
        }
        if let Some(v) = patch.transparent_background {
            self.transparent_background = v;
        }
    }

    /// Copy of these settings with `patch` merged in.
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        let mut out = self.clone();
        out.apply(patch);
        out
    }
}

/// A partial `TimerSettings`: only the `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub duration: Option<i32>,
    pub text: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<i32>,
    pub show_progress_bar: Option<bool>,
    pub auto_start: Option<bool>,
    pub loop_timer: Option<bool>,
    pub play_sound: Option<bool>,
    pub transparent_background: Option<bool>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }

    /// Number of fields this patch sets.
    pub fn field_count(&self) -> usize {
        [
            self.duration.is_some(),
            self.text.is_some(),
            self.background_color.is_some(),
            self.text_color.is_some(),
            self.font_family.is_some(),
            self.font_size.is_some(),
            self.show_progress_bar.is_some(),
            self.auto_start.is_some(),
            self.loop_timer.is_some(),
            self.play_sound.is_some(),
            self.transparent_background.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    pub fn duration(minutes: i32) -> Self {
        Self {
            duration: Some(minutes),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerPreset {
    pub id: String,
    pub name: String,
    pub settings: TimerSettings,
}

impl TimerPreset {
    pub fn is_builtin(&self) -> bool {
        is_builtin_preset_id(&self.id)
    }
}

/// The five presets shipped with the app, derived from the default settings.
pub fn builtin_presets() -> Vec<TimerPreset> {
    let base = TimerSettings::default();
    let make = |id: &str, name: &str, duration: i32, text: &str| TimerPreset {
        id: id.to_string(),
        name: name.to_string(),
        settings: TimerSettings {
            duration,
            text: text.to_string(),
            ..base.clone()
        },
    };

    vec![
        make("1", "Quick Start (1 min)", 1, "STARTING SOON"),
        make("5", "Short Break (5 min)", 5, "BE RIGHT BACK"),
        make("10", "Standard (10 min)", 10, DEFAULT_TEXT),
        make("15", "Extended (15 min)", 15, DEFAULT_TEXT),
        make("30", "Long Break (30 min)", 30, "BACK SOON"),
    ]
}

pub fn is_builtin_preset_id(id: &str) -> bool {
    BUILTIN_PRESET_IDS.contains(&id)
}

/// Whether a preset with this id belongs to the user.
///
/// Custom ids are millisecond timestamps, so they always parse as large integers. Built-in
/// ids and anything at or below the reserved range never qualify, nor do non-numeric ids.
pub fn is_custom_preset_id(id: &str) -> bool {
    if is_builtin_preset_id(id) {
        return false;
    }
    id.trim()
        .parse::<i64>()
        .map(|n| n > MAX_RESERVED_PRESET_ID)
        .unwrap_or(false)
}
