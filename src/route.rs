//! Hash routes of the two surfaces.

use crate::config::{DISPLAY_ROUTE, DISPLAY_TITLE, SETUP_TITLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Setup,
    Display,
}

impl Route {
    /// Route for a `location.hash` value such as `#/display?minutes=5`. Anything that is
    /// not the display route, including an empty hash, is the setup surface.
    pub fn from_hash(hash: &str) -> Self {
        let path = hash.trim_start_matches('#');
        let path = path.split('?').next().unwrap_or_default();
        if path.trim_end_matches('/') == DISPLAY_ROUTE {
            Route::Display
        } else {
            Route::Setup
        }
    }

    pub fn hash(&self) -> String {
        match self {
            Route::Setup => "#/".to_string(),
            Route::Display => format!("#{}", DISPLAY_ROUTE),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Setup => SETUP_TITLE,
            Route::Display => DISPLAY_TITLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hash() {
        assert_eq!(Route::from_hash(""), Route::Setup);
        assert_eq!(Route::from_hash("#/"), Route::Setup);
        assert_eq!(Route::from_hash("#/display"), Route::Display);
        assert_eq!(Route::from_hash("#/display/"), Route::Display);
        assert_eq!(Route::from_hash("#/display?minutes=5&autoStart=true"), Route::Display);
        assert_eq!(Route::from_hash("#/displays"), Route::Setup);
    }

    #[test]
    fn test_hash_and_title() {
        assert_eq!(Route::Display.hash(), "#/display");
        assert_eq!(Route::from_hash(&Route::Display.hash()), Route::Display);
        assert_eq!(Route::Setup.title(), "Timer Setup");
        assert_eq!(Route::Display.title(), "Countdown Timer");
    }
}
