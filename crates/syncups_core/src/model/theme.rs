//! Presentation palette attached to a sync-up.
//!
//! The theme round-trips through persistence, so it lives in the model even
//! though colors are a rendering concern.

use serde::{Deserialize, Serialize};

/// Foreground color drawn on top of a theme's main color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccentColor {
    Black,
    White,
}

/// Closed set of named palette variants.
///
/// Serialized as the lowercase variant name (`"bubblegum"`, `"navy"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Bubblegum,
    Buttercup,
    Indigo,
    Lavender,
    Magenta,
    Navy,
    Orange,
    Oxblood,
    Periwinkle,
    Poppy,
    Purple,
    Seafoam,
    Sky,
    Tan,
    Teal,
    Yellow,
}

impl Theme {
    /// Every theme in declaration order.
    pub const ALL: [Theme; 16] = [
        Theme::Bubblegum,
        Theme::Buttercup,
        Theme::Indigo,
        Theme::Lavender,
        Theme::Magenta,
        Theme::Navy,
        Theme::Orange,
        Theme::Oxblood,
        Theme::Periwinkle,
        Theme::Poppy,
        Theme::Purple,
        Theme::Seafoam,
        Theme::Sky,
        Theme::Tan,
        Theme::Teal,
        Theme::Yellow,
    ];

    /// Stable lowercase key, identical to the serialized form.
    pub fn key(self) -> &'static str {
        match self {
            Self::Bubblegum => "bubblegum",
            Self::Buttercup => "buttercup",
            Self::Indigo => "indigo",
            Self::Lavender => "lavender",
            Self::Magenta => "magenta",
            Self::Navy => "navy",
            Self::Orange => "orange",
            Self::Oxblood => "oxblood",
            Self::Periwinkle => "periwinkle",
            Self::Poppy => "poppy",
            Self::Purple => "purple",
            Self::Seafoam => "seafoam",
            Self::Sky => "sky",
            Self::Tan => "tan",
            Self::Teal => "teal",
            Self::Yellow => "yellow",
        }
    }

    /// Parses a theme key case-insensitively.
    pub fn from_key(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|theme| theme.key() == normalized)
    }

    /// Human-readable name (`"Bubblegum"`).
    pub fn name(self) -> String {
        let key = self.key();
        let mut chars = key.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }

    /// Accent color drawn over the theme's main color.
    pub fn accent(self) -> AccentColor {
        match self {
            Self::Indigo | Self::Magenta | Self::Navy | Self::Oxblood | Self::Purple => {
                AccentColor::White
            }
            _ => AccentColor::Black,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AccentColor, Theme};

    #[test]
    fn keys_round_trip_through_from_key() {
        for theme in Theme::ALL {
            assert_eq!(Theme::from_key(theme.key()), Some(theme));
        }
        assert_eq!(Theme::from_key(" NAVY "), Some(Theme::Navy));
        assert_eq!(Theme::from_key("chartreuse"), None);
    }

    #[test]
    fn dark_palettes_use_white_accent() {
        assert_eq!(Theme::Oxblood.accent(), AccentColor::White);
        assert_eq!(Theme::Seafoam.accent(), AccentColor::Black);
        assert_eq!(Theme::Periwinkle.name(), "Periwinkle");
    }

    #[test]
    fn serializes_as_lowercase_key() {
        let json = serde_json::to_string(&Theme::Buttercup).expect("theme should serialize");
        assert_eq!(json, "\"buttercup\"");
    }
}
