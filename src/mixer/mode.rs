//! # Process Modes
//!
//! The closed set of mixing modes an operator can select.
//!
//! | Mode | Name | Behaviour |
//! |------|------|-----------|
//! | Default | `default_process` | Direct mapping on all channels |
//! | Keyboard | `keyboard_process` | Trim keys on CH1/CH2, direct CH3-CH6, CH7/CH8 centered |
//! | Custom | `custom_process` | Direct mapping, reserved for user tuning |

use serde::Deserialize;
use std::fmt;
use tracing::warn;

/// Selectable mixing mode.
///
/// Deserializes from its boundary name; unknown names fall back to
/// [`ProcessMode::Default`].
///
/// # Examples
///
/// ```
/// use anyrc_bridge::mixer::mode::ProcessMode;
///
/// assert_eq!(ProcessMode::from_name("keyboard_process"), ProcessMode::Keyboard);
/// assert_eq!(ProcessMode::from_name("turbo"), ProcessMode::Default);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "String")]
pub enum ProcessMode {
    #[default]
    Default,
    Keyboard,
    Custom,
}

impl ProcessMode {
    /// All modes, in menu order.
    pub const ALL: [ProcessMode; 3] = [ProcessMode::Default, ProcessMode::Keyboard, ProcessMode::Custom];

    /// Looks up a mode by its boundary name, returning `None` if unknown.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.name() == name.trim())
    }

    /// Looks up a mode by its boundary name, mapping unknown names to `Default`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            warn!("Unknown process mode '{}', using {}", name, ProcessMode::Default);
            ProcessMode::Default
        })
    }

    /// Boundary name of the mode.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ProcessMode::Default => "default_process",
            ProcessMode::Keyboard => "keyboard_process",
            ProcessMode::Custom => "custom_process",
        }
    }
}

impl From<String> for ProcessMode {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl fmt::Display for ProcessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode() {
        assert_eq!(ProcessMode::default(), ProcessMode::Default);
    }

    #[test]
    fn test_names_round_trip() {
        for mode in ProcessMode::ALL {
            assert_eq!(ProcessMode::parse(mode.name()), Some(mode));
        }
    }

    #[test]
    fn test_parse_unknown_is_none() {
        assert_eq!(ProcessMode::parse("keyboard"), None);
        assert_eq!(ProcessMode::parse(""), None);
    }

    #[test]
    fn test_from_name_falls_back_to_default() {
        assert_eq!(ProcessMode::from_name("Keyboard_Process"), ProcessMode::Default);
        assert_eq!(ProcessMode::from_name(""), ProcessMode::Default);
    }

    #[test]
    fn test_from_name_trims_whitespace() {
        assert_eq!(ProcessMode::from_name(" custom_process\n"), ProcessMode::Custom);
    }

    #[test]
    fn test_display() {
        assert_eq!(ProcessMode::Keyboard.to_string(), "keyboard_process");
    }

    #[test]
    fn test_deserialize_from_string() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: ProcessMode,
        }

        let known: Wrapper = toml::from_str("mode = \"custom_process\"").unwrap();
        assert_eq!(known.mode, ProcessMode::Custom);

        let unknown: Wrapper = toml::from_str("mode = \"something_else\"").unwrap();
        assert_eq!(unknown.mode, ProcessMode::Default);
    }
}
