//! Session-scoped toggle flags.
//!
//! These are the only values that outlive a single update cycle. They are
//! owned by the caller and passed explicitly to anything that needs them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Color theme chosen by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Theme {
    /// Light text on a dark background (default).
    #[default]
    Dark,
    /// Dark text on a light background.
    Light,
}

impl Theme {
    /// Returns the theme name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Toggle state for one session. Both flags start out `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct SessionFlags {
    /// Show every ranked letter instead of the top five.
    pub show_all_letters: bool,
    /// Use the light theme.
    pub light_theme: bool,
}

impl SessionFlags {
    /// Flip [`SessionFlags::show_all_letters`] and return the new value.
    pub const fn toggle_show_all_letters(&mut self) -> bool {
        self.show_all_letters = !self.show_all_letters;
        self.show_all_letters
    }

    /// Flip between dark and light and return the new theme.
    pub const fn toggle_theme(&mut self) -> Theme {
        self.light_theme = !self.light_theme;
        self.theme()
    }

    /// The active theme.
    pub const fn theme(&self) -> Theme {
        if self.light_theme {
            Theme::Light
        } else {
            Theme::Dark
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_false() {
        let flags = SessionFlags::default();
        assert!(!flags.show_all_letters);
        assert!(!flags.light_theme);
        assert_eq!(flags.theme(), Theme::Dark);
    }

    #[test]
    fn toggles_flip_back_and_forth() {
        let mut flags = SessionFlags::default();
        assert!(flags.toggle_show_all_letters());
        assert!(!flags.toggle_show_all_letters());
        assert_eq!(flags.toggle_theme(), Theme::Light);
        assert_eq!(flags.toggle_theme(), Theme::Dark);
    }

    #[test]
    fn missing_fields_deserialize_to_false() {
        let flags: SessionFlags = serde_json::from_str(r#"{"light_theme": true}"#).unwrap();
        assert!(!flags.show_all_letters);
        assert!(flags.light_theme);
    }
}
