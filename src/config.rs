//! Application-level configuration constants.

// Storage
pub const SETTINGS_STORAGE_KEY: &str = "timerSettings";
pub const PRESETS_STORAGE_KEY: &str = "timerPresets";

// Timing
pub const TICK_MS: u32 = 1_000;
pub const AUTO_START_DELAY_MS: u32 = 100;

// Routing
pub const DISPLAY_ROUTE: &str = "/display";
pub const SETUP_TITLE: &str = "Timer Setup";
pub const DISPLAY_TITLE: &str = "Countdown Timer";

// Presets: ids "1".."5" and anything at or below this value are reserved.
pub const BUILTIN_PRESET_IDS: [&str; 5] = ["1", "5", "10", "15", "30"];
pub const MAX_RESERVED_PRESET_ID: i64 = 5;

// Default values for settings
pub const DEFAULT_DURATION_MIN: i32 = 10;
pub const DEFAULT_TEXT: &str = "STREAM STARTING SOON";
pub const DEFAULT_BACKGROUND: &str = "linear-gradient(135deg, #667eea 0%, #764ba2 100%)";
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_FONT_FAMILY: &str = "Arial, sans-serif";
pub const DEFAULT_FONT_SIZE_PX: i32 = 72;

// Min/Max limits for setup input fields
pub const MIN_DURATION_MIN: i32 = 1;
pub const MAX_DURATION_MIN: i32 = 999;
pub const MIN_FONT_SIZE_PX: i32 = 8;
pub const MAX_FONT_SIZE_PX: i32 = 500;

// Logging
pub const LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
