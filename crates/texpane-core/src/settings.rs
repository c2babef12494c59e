//! Settings-channel types.
//!
//! The settings surface itself (popup UI, persistence) lives outside this
//! pipeline; these are only the values it hands us at startup and the
//! messages it sends afterwards.

use serde::{Deserialize, Serialize};

/// Preview surface color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Silver,
    Ocean,
    Forest,
    Sky,
    Night,
}

impl Theme {
    /// Parse a theme identifier leniently: unknown identifiers fall back
    /// to the default rather than failing, since the value crosses an
    /// extension-messaging boundary we do not control.
    pub fn parse(id: &str) -> Theme {
        match id {
            "ocean" => Theme::Ocean,
            "forest" => Theme::Forest,
            "sky" => Theme::Sky,
            "night" => Theme::Night,
            _ => Theme::Silver,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Silver => "silver",
            Theme::Ocean => "ocean",
            Theme::Forest => "forest",
            Theme::Sky => "sky",
            Theme::Night => "night",
        }
    }

    /// CSS class carried by the preview surface root.
    pub fn css_class(&self) -> String {
        format!("texpane-theme-{}", self.as_str())
    }
}

/// The two persisted values, as read at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub enabled: bool,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            enabled: true,
            theme: Theme::Silver,
        }
    }
}

/// A notification from the settings surface.
///
/// The theme travels as a raw string and is parsed leniently on receipt;
/// a message that does not decode at all is logged and dropped by the
/// binding layer, never surfaced to the host page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum SettingsMessage {
    #[serde(rename = "toggleExtension")]
    Toggle { enabled: bool },
    #[serde(rename = "changeTheme")]
    ChangeTheme { theme: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_enabled_silver() {
        let settings = Settings::default();
        assert!(settings.enabled);
        assert_eq!(settings.theme, Theme::Silver);
    }

    #[test]
    fn theme_parse_is_lenient() {
        assert_eq!(Theme::parse("ocean"), Theme::Ocean);
        assert_eq!(Theme::parse("night"), Theme::Night);
        assert_eq!(Theme::parse("lava"), Theme::Silver);
        assert_eq!(Theme::parse(""), Theme::Silver);
    }

    #[test]
    fn theme_css_class() {
        assert_eq!(Theme::Forest.css_class(), "texpane-theme-forest");
    }

    #[test]
    fn decodes_toggle_message() {
        let message: SettingsMessage =
            serde_json::from_str(r#"{"action":"toggleExtension","enabled":false}"#).unwrap();
        assert_eq!(message, SettingsMessage::Toggle { enabled: false });
    }

    #[test]
    fn decodes_theme_message() {
        let message: SettingsMessage =
            serde_json::from_str(r#"{"action":"changeTheme","theme":"sky"}"#).unwrap();
        assert_eq!(
            message,
            SettingsMessage::ChangeTheme {
                theme: "sky".into()
            }
        );
    }

    #[test]
    fn unknown_action_fails_to_decode() {
        let result = serde_json::from_str::<SettingsMessage>(r#"{"action":"selfDestruct"}"#);
        assert!(result.is_err());
    }
}
