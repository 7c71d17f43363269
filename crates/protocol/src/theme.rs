use serde::{Deserialize, Serialize};

/// Color scheme persisted under the `theme` key in local storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// Parse a stored value. Anything other than `dark` or `light` is unknown.
    pub fn from_stored(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(ThemeMode::Dark),
            "light" => Some(ThemeMode::Light),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_values() {
        assert_eq!(ThemeMode::from_stored("dark"), Some(ThemeMode::Dark));
        assert_eq!(ThemeMode::from_stored("light"), Some(ThemeMode::Light));
        assert_eq!(ThemeMode::from_stored("Dark"), None);
        assert_eq!(ThemeMode::Dark.toggled().as_str(), "light");
    }
}
