use crate::config::{MAX_DURATION_MIN, MAX_FONT_SIZE_PX, MIN_DURATION_MIN, MIN_FONT_SIZE_PX};
use once_cell::sync::Lazy;
use regex::Regex;

// Compiled regexes for duration parsing
static DURATION_HOUR_MIN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)h\s*(\d+)m$").unwrap());
static DURATION_COLON_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+):(\d{1,2})$").unwrap());
static DURATION_HOUR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)h$").unwrap());
static DURATION_MIN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)m$").unwrap());

/// Format a second count as `MM:SS`. Minutes grow past two digits as needed; negative
/// counts show as `00:00`.
pub fn format_clock(total_seconds: i64) -> String {
    let secs = total_seconds.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Setup-field input error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    EmptyInput(String),
    NotANumber(String),
    TooSmall(String, i32),
    TooLarge(String, i32),
    InvalidDuration(String),
    InvalidMinutes(u32),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::EmptyInput(field) => write!(f, "{} cannot be empty", field),
            InputError::NotANumber(field) => write!(f, "{} must be a valid number", field),
            InputError::TooSmall(field, min) => write!(f, "{} must be at least {}", field, min),
            InputError::TooLarge(field, max) => write!(f, "{} cannot exceed {}", field, max),
            InputError::InvalidDuration(hint) => write!(f, "Invalid duration. {}", hint),
            InputError::InvalidMinutes(m) => write!(f, "Invalid minutes: {} (must be 0-59)", m),
        }
    }
}

impl std::error::Error for InputError {}

/// Parse a duration string into whole minutes.
///
/// Supported formats:
/// - Pure number: "90" (minutes)
/// - Hours:minutes: "1:30"
/// - Hours and minutes: "1h 30m" or "1h30m"
/// - Hours only: "2h"
/// - Minutes only: "45m"
///
/// # Examples
/// ```
/// use stream_countdown::utils::parse_minutes_input;
/// assert_eq!(parse_minutes_input("1:30"), Ok(90));
/// assert_eq!(parse_minutes_input("1h30m"), Ok(90));
/// assert_eq!(parse_minutes_input("45m"), Ok(45));
/// assert_eq!(parse_minutes_input("90"), Ok(90));
/// ```
pub fn parse_minutes_input(input: &str) -> Result<i32, InputError> {
    let trimmed = input.trim().to_ascii_lowercase();
    if trimmed.is_empty() {
        return Err(InputError::EmptyInput("Duration".to_string()));
    }

    let minutes = if let Ok(m) = trimmed.parse::<u32>() {
        m
    } else if let Some(captures) = DURATION_COLON_REGEX.captures(&trimmed) {
        hours_and_minutes(&captures[1], &captures[2])?
    } else if let Some(captures) = DURATION_HOUR_MIN_REGEX.captures(&trimmed) {
        hours_and_minutes(&captures[1], &captures[2])?
    } else if let Some(captures) = DURATION_HOUR_REGEX.captures(&trimmed) {
        hours_and_minutes(&captures[1], "0")?
    } else if let Some(captures) = DURATION_MIN_REGEX.captures(&trimmed) {
        captures[1]
            .parse()
            .map_err(|_| InputError::NotANumber("Duration".to_string()))?
    } else {
        return Err(InputError::InvalidDuration(
            "Use: 90, 1:30, 1h30m, 2h or 45m".to_string(),
        ));
    };

    let minutes =
        i32::try_from(minutes).map_err(|_| InputError::TooLarge("Duration".to_string(), MAX_DURATION_MIN))?;
    check_range(minutes, Some(MIN_DURATION_MIN), Some(MAX_DURATION_MIN), "Duration")
}

fn hours_and_minutes(hours: &str, minutes: &str) -> Result<u32, InputError> {
    let hours: u32 = hours
        .parse()
        .map_err(|_| InputError::NotANumber("Duration".to_string()))?;
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| InputError::NotANumber("Duration".to_string()))?;
    if minutes > 59 {
        return Err(InputError::InvalidMinutes(minutes));
    }
    hours
        .checked_mul(60)
        .and_then(|h| h.checked_add(minutes))
        .ok_or_else(|| InputError::TooLarge("Duration".to_string(), MAX_DURATION_MIN))
}

fn check_range(
    value: i32,
    min: Option<i32>,
    max: Option<i32>,
    field_name: &str,
) -> Result<i32, InputError> {
    if let Some(min_val) = min {
        if value < min_val {
            return Err(InputError::TooSmall(field_name.to_string(), min_val));
        }
    }
    if let Some(max_val) = max {
        if value > max_val {
            return Err(InputError::TooLarge(field_name.to_string(), max_val));
        }
    }
    Ok(value)
}

/// Generic integer input validation
pub fn validate_numeric_input(
    input: &str,
    min: Option<i32>,
    max: Option<i32>,
    field_name: &str,
) -> Result<i32, InputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InputError::EmptyInput(field_name.to_string()));
    }

    match trimmed.parse::<i32>() {
        Ok(val) => check_range(val, min, max, field_name),
        Err(_) => Err(InputError::NotANumber(field_name.to_string())),
    }
}

/// Validate font size input
pub fn validate_font_size(input: &str) -> Result<i32, InputError> {
    validate_numeric_input(input, Some(MIN_FONT_SIZE_PX), Some(MAX_FONT_SIZE_PX), "Font size")
}
