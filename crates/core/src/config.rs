use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::widgets::Collaborators;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// CSS selectors for every element category the page script touches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub body: String,
    pub header: String,
    pub nav_links: String,
    pub progress_bars: String,
    pub stat_counters: String,
    pub lazy_images: String,
    pub reveal_cards: String,
    pub back_to_top: String,
    pub hero: String,
    pub loader: String,
    pub typed: String,
    pub contact_form: String,
    pub mobile_nav_toggle: String,
    /// In-page anchors that get smooth scrolling.
    pub anchors: String,
    /// Links that also collapse the mobile navigation.
    pub scrollto: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            body: "body".to_string(),
            header: "#header".to_string(),
            nav_links: "#navbar .nav-link".to_string(),
            progress_bars: ".skill-progress".to_string(),
            stat_counters: ".stat-number".to_string(),
            lazy_images: "img[data-src]".to_string(),
            reveal_cards: ".course-card, .certificate-card, .timeline-item, .skill-category"
                .to_string(),
            back_to_top: ".back-to-top".to_string(),
            hero: ".hero-section".to_string(),
            loader: ".loader".to_string(),
            typed: ".typed-text".to_string(),
            contact_form: ".contact-form .form".to_string(),
            mobile_nav_toggle: ".mobile-nav-toggle".to_string(),
            anchors: r##"a[href^="#"]"##.to_string(),
            scrollto: ".scrollto".to_string(),
        }
    }
}

/// Tunables for the page controller.
///
/// Every field has a default, so a JSON override only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub selectors: Selectors,
    /// Added to `scrollY` before testing which section a nav link covers.
    pub nav_probe_offset: f64,
    pub ramp_steps: u32,
    pub ramp_period_ms: u32,
    pub back_to_top_threshold: f64,
    pub parallax_factor: f64,
    pub submit_delay_ms: u32,
    pub loader_fade_ms: u32,
    pub mobile_focus_delay_ms: u32,
    pub theme_toggle: bool,
    /// Script registered as the service worker on load; `None` disables it.
    pub service_worker: Option<String>,
    /// Images fetched eagerly at start.
    pub critical_images: Vec<String>,
    pub collaborators: Collaborators,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            nav_probe_offset: 200.0,
            ramp_steps: 50,
            ramp_period_ms: 30,
            back_to_top_threshold: 100.0,
            parallax_factor: 0.5,
            submit_delay_ms: 2000,
            loader_fade_ms: 500,
            mobile_focus_delay_ms: 100,
            theme_toggle: false,
            service_worker: Some("/sw.js".to_string()),
            critical_images: vec![
                "assets/img/profile-img.png".to_string(),
                "assets/img/hero-bg.jpg".to_string(),
            ],
            collaborators: Collaborators::default(),
        }
    }
}

impl ControllerConfig {
    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(data)?)
    }

    /// Selector for the submit button inside the contact form.
    pub fn submit_button_selector(&self) -> String {
        format!("{} {}", self.selectors.contact_form, crate::form::SUBMIT_BUTTON)
    }
}
