use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Screen position of a window. A missing component lets the window system
/// pick that coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPosition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
}

impl WindowPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }
}

/// Logical size of a window. A missing component falls back to the window
/// system's default for that dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl WindowSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }
}

/// Everything persisted between runs: the last channel, both windows'
/// geometry, and the chat window's opacity and click-through state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub last_user: String,
    pub chat_position: WindowPosition,
    pub chat_window_size: WindowSize,
    /// Chat window opacity in percent (0-100).
    pub transparency: u8,
    pub is_click_through: bool,
    pub main_window_size: WindowSize,
    pub main_window_position: WindowPosition,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            last_user: String::new(),
            chat_position: WindowPosition::new(100, 100),
            chat_window_size: WindowSize::new(400, 600),
            transparency: 100,
            is_click_through: false,
            main_window_size: WindowSize::new(447, 309),
            main_window_position: WindowPosition::default(),
        }
    }
}

impl Configuration {
    /// Parse a stored document and reconcile it with the defaults.
    ///
    /// Only top-level keys are merged: a nested object such as
    /// `chatPosition` replaces the default wholesale, even when it is only
    /// partially specified. A key holding a value of the wrong type keeps its
    /// default. Unknown keys are ignored. `transparency` is clamped to 100.
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        let stored: Map<String, Value> = serde_json::from_str(content)?;
        Ok(Self::merged_with_defaults(stored))
    }

    pub fn merged_with_defaults(stored: Map<String, Value>) -> Self {
        let defaults = Self::default();

        Self {
            last_user: field(&stored, "lastUser").unwrap_or(defaults.last_user),
            chat_position: field(&stored, "chatPosition").unwrap_or(defaults.chat_position),
            chat_window_size: field(&stored, "chatWindowSize")
                .unwrap_or(defaults.chat_window_size),
            transparency: field::<u8>(&stored, "transparency")
                .map_or(defaults.transparency, |percent| percent.min(100)),
            is_click_through: field(&stored, "isClickThrough")
                .unwrap_or(defaults.is_click_through),
            main_window_size: field(&stored, "mainWindowSize")
                .unwrap_or(defaults.main_window_size),
            main_window_position: field(&stored, "mainWindowPosition")
                .unwrap_or(defaults.main_window_position),
        }
    }

    /// Pretty-printed JSON, two-space indented.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Opacity to hand to the window system for the chat window.
    pub fn chat_opacity(&self) -> f64 {
        opacity_from_percent(self.transparency)
    }
}

fn field<T: DeserializeOwned>(stored: &Map<String, Value>, key: &str) -> Option<T> {
    let value = stored.get(key)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!("Ignoring stored {}: {}", key, e);
            None
        }
    }
}

/// Convert an opacity percentage to the 0.0-1.0 range used by windows.
/// Values above 100 are treated as fully opaque.
pub fn opacity_from_percent(percent: u8) -> f64 {
    f64::from(percent.min(100)) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Configuration::default();
        assert_eq!(config.last_user, "");
        assert_eq!(config.chat_position, WindowPosition::new(100, 100));
        assert_eq!(config.chat_window_size, WindowSize::new(400, 600));
        assert_eq!(config.transparency, 100);
        assert!(!config.is_click_through);
        assert_eq!(config.main_window_size, WindowSize::new(447, 309));
        assert_eq!(config.main_window_position.x, None);
        assert_eq!(config.main_window_position.y, None);
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let config = Configuration::from_json_str(r#"{"lastUser":"foo"}"#).unwrap();
        assert_eq!(
            config,
            Configuration {
                last_user: "foo".to_string(),
                ..Configuration::default()
            }
        );
    }

    #[test]
    fn test_nested_objects_are_not_field_merged() {
        let config = Configuration::from_json_str(r#"{"chatPosition":{"x":5}}"#).unwrap();
        assert_eq!(config.chat_position.x, Some(5));
        assert_eq!(config.chat_position.y, None);
    }

    #[test]
    fn test_wrongly_typed_field_falls_back_alone() {
        let config =
            Configuration::from_json_str(r#"{"transparency":"abc","isClickThrough":true}"#)
                .unwrap();
        assert_eq!(config.transparency, 100);
        assert!(config.is_click_through);
    }

    #[test]
    fn test_stored_transparency_is_clamped() {
        let config = Configuration::from_json_str(r#"{"transparency":250}"#).unwrap();
        assert_eq!(config.transparency, 100);

        let config = Configuration::from_json_str(r#"{"transparency":55}"#).unwrap();
        assert_eq!(config.transparency, 55);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config = Configuration::from_json_str(r#"{"theme":"dark","lastUser":"x"}"#).unwrap();
        assert_eq!(config.last_user, "x");
        assert!(!config.to_json_string().unwrap().contains("theme"));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Configuration::from_json_str("{not json").is_err());
        assert!(Configuration::from_json_str("[1, 2]").is_err());
    }

    #[test]
    fn test_serialized_keys_are_camel_case() {
        let json = Configuration::default().to_json_string().unwrap();
        for key in [
            "lastUser",
            "chatPosition",
            "chatWindowSize",
            "transparency",
            "isClickThrough",
            "mainWindowSize",
            "mainWindowPosition",
        ] {
            assert!(json.contains(&format!("\"{}\"", key)), "missing {}", key);
        }
        // unset coordinates are dropped, not written as null
        assert!(json.contains("\"mainWindowPosition\": {}"));
    }

    #[test]
    fn test_opacity_from_percent() {
        assert_eq!(opacity_from_percent(0), 0.0);
        assert_eq!(opacity_from_percent(100), 1.0);
        assert_eq!(opacity_from_percent(55), 0.55);
        assert_eq!(opacity_from_percent(250), 1.0);
    }
}
