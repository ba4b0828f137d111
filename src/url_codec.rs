//! Browser-source URL encoding and decoding.
//!
//! Encoded URLs carry every setting as a real query parameter placed before the `#/display`
//! route, because broadcasting software treats the fragment as an opaque route. Decoding is
//! more lenient: hash routing may have moved the query behind the fragment at runtime, so a
//! `?` inside the fragment wins over the standard query string.

use crate::config::DISPLAY_ROUTE;
use crate::settings::{SettingsPatch, TimerSettings};
use log::{debug, warn};
use url::{form_urlencoded, Url};

pub mod keys {
    pub const MINUTES: &str = "minutes";
    pub const TEXT: &str = "text";
    pub const BACKGROUND_COLOR: &str = "backgroundColor";
    pub const TEXT_COLOR: &str = "textColor";
    pub const FONT_SIZE: &str = "fontSize";
    pub const FONT_FAMILY: &str = "fontFamily";
    pub const SHOW_PROGRESS_BAR: &str = "showProgressBar";
    pub const PLAY_SOUND: &str = "playSound";
    pub const LOOP_TIMER: &str = "loopTimer";
    pub const AUTO_START: &str = "autoStart";
    pub const TRANSPARENT: &str = "transparent";
}

/// Flat parameter list for `settings`, in the order the URL carries them.
pub fn encode_params(settings: &TimerSettings) -> Vec<(&'static str, String)> {
    vec![
        (keys::MINUTES, settings.duration.to_string()),
        (keys::TEXT, settings.text.clone()),
        (keys::BACKGROUND_COLOR, settings.background_color.clone()),
        (keys::TEXT_COLOR, settings.text_color.clone()),
        (keys::FONT_SIZE, settings.font_size.to_string()),
        (keys::FONT_FAMILY, settings.font_family.clone()),
        (keys::SHOW_PROGRESS_BAR, settings.show_progress_bar.to_string()),
        (keys::PLAY_SOUND, settings.play_sound.to_string()),
        (keys::LOOP_TIMER, settings.loop_timer.to_string()),
        (keys::AUTO_START, settings.auto_start.to_string()),
        (keys::TRANSPARENT, settings.transparent_background.to_string()),
    ]
}

/// Build a self-describing display URL for `settings` on the page at `page_url`.
///
/// Only the origin and path of `page_url` are kept; its query and fragment are replaced.
pub fn encode(settings: &TimerSettings, page_url: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(page_url)?;
    url.set_fragment(None);
    url.set_query(None);
    url.query_pairs_mut()
        .extend_pairs(encode_params(settings));
    url.set_fragment(Some(DISPLAY_ROUTE));
    Ok(url.into())
}

/// Read the recognized settings parameters out of `current_url`.
///
/// Missing and empty parameters are left out of the patch. A location that is not an
/// absolute URL yields an empty patch.
pub fn decode(current_url: &str) -> SettingsPatch {
    let url = match Url::parse(current_url) {
        Ok(url) => url,
        Err(e) => {
            warn!("Ignoring unparseable location {:?}: {}", current_url, e);
            return SettingsPatch::default();
        }
    };

    let from_fragment = url
        .fragment()
        .and_then(|fragment| fragment.find('?').map(|i| &fragment[i + 1..]));

    let pairs: Vec<(String, String)> = match from_fragment {
        Some(query) => {
            debug!("Reading parameters from fragment query {:?}", query);
            form_urlencoded::parse(query.as_bytes()).into_owned().collect()
        }
        None => url.query_pairs().into_owned().collect(),
    };

    decode_pairs(&pairs)
}

/// Build a patch from already-split query pairs. The first occurrence of a key wins.
pub fn decode_pairs(pairs: &[(String, String)]) -> SettingsPatch {
    let get = |key: &str| -> Option<&str> {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    };
    let int = |key: &str| -> Option<i32> {
        let raw = get(key)?;
        match raw.trim().parse::<i32>() {
            Ok(n) => Some(n),
            Err(_) => {
                warn!("Ignoring non-numeric URL parameter {}={:?}", key, raw);
                None
            }
        }
    };
    let flag = |key: &str| get(key).map(|v| v == "true");
    let string = |key: &str| get(key).map(str::to_string);

    let patch = SettingsPatch {
        duration: int(keys::MINUTES),
        text: string(keys::TEXT),
        background_color: string(keys::BACKGROUND_COLOR),
        text_color: string(keys::TEXT_COLOR),
        font_size: int(keys::FONT_SIZE),
        font_family: string(keys::FONT_FAMILY),
        show_progress_bar: flag(keys::SHOW_PROGRESS_BAR),
        play_sound: flag(keys::PLAY_SOUND),
        loop_timer: flag(keys::LOOP_TIMER),
        auto_start: flag(keys::AUTO_START),
        transparent_background: flag(keys::TRANSPARENT),
    };
    debug!("Decoded {} settings from URL", patch.field_count());
    patch
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://overlay.example.com/timer/";

    fn sample_settings() -> TimerSettings {
        TimerSettings {
            duration: 7,
            text: "BE RIGHT BACK & stay tuned?".to_string(),
            background_color: "linear-gradient(135deg, #667eea 0%, #764ba2 100%)".to_string(),
            text_color: "#ff00aa".to_string(),
            font_family: "'Fira Sans', sans-serif".to_string(),
            font_size: 96,
            show_progress_bar: false,
            auto_start: true,
            loop_timer: true,
            play_sound: false,
            transparent_background: true,
        }
    }

    fn full_patch(settings: &TimerSettings) -> SettingsPatch {
        SettingsPatch {
            duration: Some(settings.duration),
            text: Some(settings.text.clone()),
            background_color: Some(settings.background_color.clone()),
            text_color: Some(settings.text_color.clone()),
            font_family: Some(settings.font_family.clone()),
            font_size: Some(settings.font_size),
            show_progress_bar: Some(settings.show_progress_bar),
            auto_start: Some(settings.auto_start),
            loop_timer: Some(settings.loop_timer),
            play_sound: Some(settings.play_sound),
            transparent_background: Some(settings.transparent_background),
        }
    }

    #[test]
    fn test_encode_places_query_before_display_route() {
        let url = encode(&TimerSettings::default(), "https://overlay.example.com/timer/?old=1#/").unwrap();
        assert!(url.starts_with("https://overlay.example.com/timer/?minutes=10&text="));
        assert!(url.ends_with("#/display"));
        assert!(!url.contains("old=1"));
        assert!(url.contains("transparent=false"));
        assert!(!url.contains("transparentBackground"));
    }

    #[test]
    fn test_encode_rejects_relative_page_url() {
        assert!(encode(&TimerSettings::default(), "/timer/").is_err());
    }

    #[test]
    fn test_round_trip_standard_query() {
        let settings = sample_settings();
        let url = encode(&settings, PAGE).unwrap();
        let patch = decode(&url);
        assert_eq!(patch, full_patch(&settings));
        assert_eq!(TimerSettings::default().merged(&patch), settings);
    }

    #[test]
    fn test_round_trip_query_moved_behind_fragment() {
        let settings = sample_settings();
        let url = encode(&settings, PAGE).unwrap();
        let (base, rest) = url.split_once('?').unwrap();
        let (query, route) = rest.split_once('#').unwrap();
        let relocated = format!("{}#{}?{}", base, route, query);

        let patch = decode(&relocated);
        assert_eq!(TimerSettings::default().merged(&patch), settings);
    }

    #[test]
    fn test_fragment_query_takes_precedence() {
        let patch = decode("https://x.test/?minutes=3&text=OUTER#/display?minutes=9");
        assert_eq!(patch.duration, Some(9));
        assert_eq!(patch.text, None);
    }

    #[test]
    fn test_no_recognized_params_gives_empty_patch() {
        assert!(decode("https://x.test/#/display").is_empty());
        assert!(decode("https://x.test/?utm_source=obs#/display").is_empty());
        assert!(decode("not a url").is_empty());
    }

    #[test]
    fn test_empty_values_are_omitted() {
        let patch = decode("https://x.test/?text=&minutes=&playSound=true");
        assert_eq!(patch.text, None);
        assert_eq!(patch.duration, None);
        assert_eq!(patch.play_sound, Some(true));
        assert_eq!(patch.field_count(), 1);
    }

    #[test]
    fn test_booleans_require_literal_true() {
        let patch = decode("https://x.test/?loopTimer=TRUE&autoStart=1&transparent=true&showProgressBar=no");
        assert_eq!(patch.loop_timer, Some(false));
        assert_eq!(patch.auto_start, Some(false));
        assert_eq!(patch.transparent_background, Some(true));
        assert_eq!(patch.show_progress_bar, Some(false));
    }

    #[test]
    fn test_non_numeric_values_are_rejected() {
        let patch = decode("https://x.test/?minutes=ten&fontSize=12px&text=Hi");
        assert_eq!(patch.duration, None);
        assert_eq!(patch.font_size, None);
        assert_eq!(patch.text.as_deref(), Some("Hi"));
    }

    #[test]
    fn test_only_invalid_numbers_gives_empty_patch() {
        assert!(decode("https://x.test/?minutes=abc").is_empty());
    }

    #[test]
    fn test_first_occurrence_wins() {
        let patch = decode("https://x.test/?minutes=4&minutes=8");
        assert_eq!(patch.duration, Some(4));
    }

    #[test]
    fn test_plus_decodes_to_space() {
        let patch = decode("https://x.test/#/display?text=STARTING+SOON&fontFamily=Comic%20Sans");
        assert_eq!(patch.text.as_deref(), Some("STARTING SOON"));
        assert_eq!(patch.font_family.as_deref(), Some("Comic Sans"));
    }
}
