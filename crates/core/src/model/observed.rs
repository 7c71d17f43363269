use folio_protocol::ElementId;
use thiserror::Error;

use crate::counter::CounterText;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WidthParseError {
    #[error("data-width {0:?} is not a finite number")]
    NotANumber(String),
}

/// Parse a `data-width` attribute (a percentage without the `%` sign).
pub fn parse_width(raw: &str) -> Result<f64, WidthParseError> {
    let raw = raw.trim();
    let raw = raw.strip_suffix('%').unwrap_or(raw).trim_end();
    match raw.parse::<f64>() {
        Ok(width) if width.is_finite() => Ok(width),
        _ => Err(WidthParseError::NotANumber(raw.to_string())),
    }
}

/// Navigation link highlighted while its section is under the scroll probe.
#[derive(Debug, Clone, PartialEq)]
pub struct NavLink {
    pub link: ElementId,
    /// Section the link's `#hash` resolves to, if any.
    pub section: Option<ElementId>,
    /// Last state written to the DOM. `None` until the first tick so that
    /// stale `active` classes from the markup get corrected.
    pub active: Option<bool>,
}

/// Skill bar that grows to `width` percent when first seen.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressBar {
    pub bar: ElementId,
    /// `None` when the element carries no `data-width`.
    pub width: Option<f64>,
}

/// Statistic whose number ramps up from zero when first seen.
#[derive(Debug, Clone, PartialEq)]
pub struct StatCounter {
    pub stat: ElementId,
    pub text: CounterText,
}

/// Image whose real source is deferred in `data-src`.
#[derive(Debug, Clone, PartialEq)]
pub struct LazyImage {
    pub image: ElementId,
    /// `None` when `data-src` is empty.
    pub source: Option<String>,
}

/// An element the controller watches, tagged by category.
#[derive(Debug, Clone, PartialEq)]
pub enum Observed {
    NavLink(NavLink),
    ProgressBar(ProgressBar),
    StatCounter(StatCounter),
    LazyImage(LazyImage),
}

impl Observed {
    pub fn element(&self) -> ElementId {
        match self {
            Observed::NavLink(link) => link.link,
            Observed::ProgressBar(bar) => bar.bar,
            Observed::StatCounter(stat) => stat.stat,
            Observed::LazyImage(image) => image.image,
        }
    }

    /// Whether the category fires once and then stays in its terminal state.
    /// Navigation links are re-evaluated on every tick instead.
    pub fn is_fire_once(&self) -> bool {
        !matches!(self, Observed::NavLink(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriggerState {
    #[default]
    Pending,
    Triggered,
}

/// Registry entry: a categorized element plus its trigger flag.
///
/// The flag only ever moves from `Pending` to `Triggered`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedElement {
    pub kind: Observed,
    pub state: TriggerState,
}

impl ObservedElement {
    pub fn new(kind: Observed) -> Self {
        Self {
            kind,
            state: TriggerState::Pending,
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.state == TriggerState::Triggered
    }
}
