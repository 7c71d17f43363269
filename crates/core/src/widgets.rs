//! Option objects handed to the third-party page widgets.
//!
//! Field names serialize to the camelCase keys each library expects, so the
//! bridge can pass `serde_json` output straight through `JSON.parse`.

use serde::{Deserialize, Serialize};

/// Typed.js hero effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypedOptions {
    pub strings: Vec<String>,
    #[serde(rename = "loop")]
    pub looped: bool,
    pub type_speed: u32,
    pub back_speed: u32,
    pub back_delay: u32,
    pub show_cursor: bool,
    pub cursor_char: String,
}

impl Default for TypedOptions {
    fn default() -> Self {
        Self {
            strings: Vec::new(),
            looped: true,
            type_speed: 100,
            back_speed: 50,
            back_delay: 2000,
            show_cursor: true,
            cursor_char: "|".to_string(),
        }
    }
}

impl TypedOptions {
    /// Fill `strings` from a comma-separated `data-typed-items` value. Items
    /// are kept exactly as written, spaces and empty entries included.
    pub fn with_items(&self, items: &str) -> Self {
        Self {
            strings: items.split(',').map(str::to_string).collect(),
            ..self.clone()
        }
    }
}

/// GLightbox certificate viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LightboxOptions {
    pub selector: String,
    pub touch_navigation: bool,
    #[serde(rename = "loop")]
    pub looped: bool,
    pub autoplay_videos: bool,
}

impl Default for LightboxOptions {
    fn default() -> Self {
        Self {
            selector: ".certificate-lightbox".to_string(),
            touch_navigation: true,
            looped: true,
            autoplay_videos: false,
        }
    }
}

/// AOS animate-on-scroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevealOptions {
    pub duration: u32,
    pub easing: String,
    pub once: bool,
    pub mirror: bool,
    pub offset: u32,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            duration: 1000,
            easing: "ease-in-out".to_string(),
            once: true,
            mirror: false,
            offset: 100,
        }
    }
}

/// `IntersectionObserver` init for the fade-in cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collaborators {
    pub typed: TypedOptions,
    pub lightbox: LightboxOptions,
    pub reveal: RevealOptions,
    pub observer: ObserverOptions,
}
