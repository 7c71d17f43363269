use serde::{Deserialize, Serialize};

/// Handle to a DOM element registered by the host page.
///
/// The core never holds DOM nodes; it refers to them by the index the host
/// assigned when the element was first queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u32);

/// An axis-aligned rectangle in CSS pixels, relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Whether any part of the rectangle lies inside a viewport of the given
    /// height: `top < viewport_height && bottom > 0`.
    pub fn is_partially_visible(&self, viewport_height: f64) -> bool {
        self.top() < viewport_height && self.bottom() > 0.0
    }
}

/// Vertical extent of an element in document coordinates
/// (`offsetTop` / `offsetHeight`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionSpan {
    pub top: f64,
    pub height: f64,
}

impl SectionSpan {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, position: f64) -> bool {
        position >= self.top && position <= self.top + self.height
    }
}

/// Page-level signal sources the controller subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    Scroll,
    Resize,
    Load,
}

impl Signal {
    /// DOM event name fired on `window`.
    pub fn event_name(self) -> &'static str {
        match self {
            Signal::Scroll => "scroll",
            Signal::Resize => "resize",
            Signal::Load => "load",
        }
    }
}

/// Identifies a timer the host schedules on behalf of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimerId {
    /// Recurring step of a stat counter ramp.
    CounterRamp(ElementId),
    /// Simulated contact-form round trip.
    SubmitReset,
    /// Hide the loader after its fade-out.
    LoaderHide,
    /// Move focus into the mobile navigation after it opens.
    FocusNavLink,
}
