//! Page access seams.
//!
//! The controller reads the document through two traits: [`DomSource`] for
//! the one-off queries made at initialization, and [`ViewportProbe`] for the
//! geometry sampled on every tick. The web bridge implements both against the
//! live DOM; [`StaticPage`] implements both in memory and can apply the
//! controller's [`DomCommand`]s back onto itself, which makes it a headless
//! page for tests and offline runs.

use std::collections::{BTreeMap, BTreeSet};

use folio_protocol::{DomCommand, ElementId, LogLevel, Rect, SectionSpan, TimerId};

/// Element queries, made once at initialization (and for hash lookups).
pub trait DomSource {
    /// All elements matching a CSS selector, in document order.
    fn query_all(&mut self, selector: &str) -> Vec<ElementId>;

    /// First element matching a CSS selector.
    fn query(&mut self, selector: &str) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    fn attribute(&self, id: ElementId, name: &str) -> Option<String>;

    fn text_content(&self, id: ElementId) -> Option<String>;
}

/// Geometry sampled on every tick.
pub trait ViewportProbe {
    /// Vertical scroll offset of the window (`scrollY`).
    fn scroll_y(&self) -> f64;

    /// Height of the viewport (`innerHeight`).
    fn inner_height(&self) -> f64;

    /// Viewport-relative bounding box (`getBoundingClientRect`), or `None`
    /// when the element is gone or has no layout.
    fn bounding_rect(&self, id: ElementId) -> Option<Rect>;

    /// Document-relative extent (`offsetTop` / `offsetHeight`).
    fn offset_span(&self, id: ElementId) -> Option<SectionSpan>;
}

/// An element in a [`StaticPage`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticElement {
    selectors: Vec<String>,
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    styles: BTreeMap<String, String>,
    text: Option<String>,
    html: Option<String>,
    value: String,
    disabled: bool,
    layout: Option<SectionSpan>,
    parent: Option<ElementId>,
}

impl StaticElement {
    /// An element matched by the given selector string.
    pub fn new(selector: &str) -> Self {
        Self {
            selectors: vec![selector.to_string()],
            ..Self::default()
        }
    }

    /// Also match another selector string.
    pub fn matching(mut self, selector: &str) -> Self {
        self.selectors.push(selector.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    /// Lay the element out at a document offset with the given height.
    pub fn at(mut self, top: f64, height: f64) -> Self {
        self.layout = Some(SectionSpan::new(top, height));
        self
    }

    /// Nest the element inside a form (for `ResetForm`).
    pub fn inside(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn inner_html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    pub fn current_value(&self) -> &str {
        &self.value
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn matches(&self, selector: &str) -> bool {
        if self.selectors.iter().any(|s| s == selector) {
            return true;
        }
        // `#id` selectors resolve against the id attribute.
        selector
            .strip_prefix('#')
            .is_some_and(|id| self.attributes.get("id").is_some_and(|v| v == id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Interval,
    Timeout,
}

/// In-memory page: a flat list of elements laid out in document coordinates,
/// a scroll offset, and a viewport height.
#[derive(Debug, Clone, Default)]
pub struct StaticPage {
    elements: Vec<StaticElement>,
    scroll_y: f64,
    inner_height: f64,
    width: f64,
    timers: Vec<(TimerId, TimerKind)>,
    alerts: Vec<String>,
    focused: Option<ElementId>,
    storage: BTreeMap<String, String>,
    unobserved: BTreeSet<ElementId>,
    logs: Vec<(LogLevel, String)>,
}

impl StaticPage {
    pub fn new(inner_height: f64) -> Self {
        Self {
            inner_height,
            width: 1280.0,
            ..Self::default()
        }
    }

    pub fn add(&mut self, element: StaticElement) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(element);
        id
    }

    pub fn element(&self, id: ElementId) -> Option<&StaticElement> {
        self.elements.get(id.0 as usize)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut StaticElement> {
        self.elements.get_mut(id.0 as usize)
    }

    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y.max(0.0);
    }

    pub fn set_inner_height(&mut self, height: f64) {
        self.inner_height = height;
    }

    /// Type into a form control.
    pub fn set_value(&mut self, id: ElementId, value: &str) {
        if let Some(element) = self.element_mut(id) {
            element.value = value.to_string();
        }
    }

    /// Timers started and not yet cancelled or fired, in start order.
    pub fn active_timers(&self) -> &[(TimerId, TimerKind)] {
        &self.timers
    }

    pub fn has_timer(&self, timer: TimerId) -> bool {
        self.timers.iter().any(|(t, _)| *t == timer)
    }

    /// Record that a timeout fired; intervals keep running.
    pub fn fire_timer(&mut self, timer: TimerId) {
        self.timers
            .retain(|(t, kind)| !(*t == timer && *kind == TimerKind::Timeout));
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    pub fn stored(&self, key: &str) -> Option<&str> {
        self.storage.get(key).map(String::as_str)
    }

    pub fn is_unobserved(&self, id: ElementId) -> bool {
        self.unobserved.contains(&id)
    }

    pub fn logs(&self) -> &[(LogLevel, String)] {
        &self.logs
    }

    /// Apply controller output to the page, in order.
    pub fn apply(&mut self, commands: &[DomCommand]) {
        for command in commands {
            self.apply_one(command);
        }
    }

    fn apply_one(&mut self, command: &DomCommand) {
        match command {
            DomCommand::AddClass { target, class } => {
                if let Some(el) = self.element_mut(*target) {
                    el.classes.insert(class.clone());
                }
            }
            DomCommand::RemoveClass { target, class } => {
                if let Some(el) = self.element_mut(*target) {
                    el.classes.remove(class);
                }
            }
            DomCommand::SetStyle {
                target,
                property,
                value,
            } => {
                if let Some(el) = self.element_mut(*target) {
                    el.styles.insert(property.clone(), value.clone());
                }
            }
            DomCommand::SetText { target, text } => {
                if let Some(el) = self.element_mut(*target) {
                    el.text = Some(text.clone());
                }
            }
            DomCommand::SetHtml { target, html } => {
                if let Some(el) = self.element_mut(*target) {
                    el.html = Some(html.clone());
                }
            }
            DomCommand::SetAttribute {
                target,
                name,
                value,
            } => {
                if let Some(el) = self.element_mut(*target) {
                    el.attributes.insert(name.clone(), value.clone());
                }
            }
            DomCommand::SetDisabled { target, disabled } => {
                if let Some(el) = self.element_mut(*target) {
                    el.disabled = *disabled;
                }
            }
            DomCommand::Focus { target } => self.focused = Some(*target),
            DomCommand::ResetForm { target } => {
                let form = *target;
                for el in self.elements.iter_mut().filter(|e| e.parent == Some(form)) {
                    el.value.clear();
                }
            }
            DomCommand::Unobserve { target } => {
                self.unobserved.insert(*target);
            }
            DomCommand::ScrollTo { top } => self.scroll_to(*top),
            DomCommand::Alert { message } => self.alerts.push(message.clone()),
            DomCommand::StartInterval { timer, .. } => {
                self.timers.retain(|(t, _)| t != timer);
                self.timers.push((*timer, TimerKind::Interval));
            }
            DomCommand::StartTimeout { timer, .. } => {
                self.timers.retain(|(t, _)| t != timer);
                self.timers.push((*timer, TimerKind::Timeout));
            }
            DomCommand::CancelTimer { timer } => self.timers.retain(|(t, _)| t != timer),
            DomCommand::StoreSetting { key, value } => {
                self.storage.insert(key.clone(), value.clone());
            }
            DomCommand::Log { level, message } => self.logs.push((*level, message.clone())),
        }
    }
}

impl DomSource for StaticPage {
    fn query_all(&mut self, selector: &str) -> Vec<ElementId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.matches(selector))
            .map(|(i, _)| ElementId(i as u32))
            .collect()
    }

    fn attribute(&self, id: ElementId, name: &str) -> Option<String> {
        self.element(id)?.attributes.get(name).cloned()
    }

    fn text_content(&self, id: ElementId) -> Option<String> {
        self.element(id)?.text.clone()
    }
}

impl ViewportProbe for StaticPage {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn inner_height(&self) -> f64 {
        self.inner_height
    }

    fn bounding_rect(&self, id: ElementId) -> Option<Rect> {
        let span = self.element(id)?.layout?;
        Some(Rect::new(0.0, span.top - self.scroll_y, self.width, span.height))
    }

    fn offset_span(&self, id: ElementId) -> Option<SectionSpan> {
        self.element(id)?.layout
    }
}
