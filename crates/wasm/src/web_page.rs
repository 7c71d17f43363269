//! The live document behind the controller's page traits.
//!
//! Elements are registered the first time a query returns them and keep
//! their index for the lifetime of the page, so an [`ElementId`] handed to
//! the controller always resolves to the same node.

use folio_core::form::{self, ContactFields};
use folio_core::{DomSource, ViewportProbe};
use folio_protocol::{ElementId, LogLevel, Rect, SectionSpan};
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement, Node, Window,
};

use crate::apply::console;

pub struct WebPage {
    window: Window,
    document: Document,
    elements: Vec<Element>,
}

impl WebPage {
    pub fn new(window: Window, document: Document) -> Self {
        Self {
            window,
            document,
            elements: Vec::new(),
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0 as usize)
    }

    /// Id of an element already handed to the controller.
    pub fn find(&self, element: &Element) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|known| known.is_same_node(Some::<&Node>(element)))
            .map(|i| ElementId(i as u32))
    }

    /// Id of an element, registering it if it is new.
    pub fn register(&mut self, element: Element) -> ElementId {
        if let Some(id) = self.find(&element) {
            return id;
        }
        self.elements.push(element);
        ElementId(self.elements.len() as u32 - 1)
    }

    /// Current values of the contact form's controls.
    pub fn contact_fields(&self, form: ElementId) -> ContactFields {
        let value = |selector: &str| -> String {
            let Some(control) = self
                .element(form)
                .and_then(|f| f.query_selector(selector).ok().flatten())
            else {
                return String::new();
            };
            if let Some(input) = control.dyn_ref::<HtmlInputElement>() {
                input.value()
            } else if let Some(area) = control.dyn_ref::<HtmlTextAreaElement>() {
                area.value()
            } else {
                String::new()
            }
        };
        ContactFields {
            name: value(form::NAME_INPUT),
            email: value(form::EMAIL_INPUT),
            subject: value(form::SUBJECT_INPUT),
            message: value(form::MESSAGE_INPUT),
        }
    }

    /// `location.hash`, if there is one.
    pub fn location_hash(&self) -> Option<String> {
        self.window
            .location()
            .hash()
            .ok()
            .filter(|hash| !hash.is_empty())
    }
}

impl DomSource for WebPage {
    fn query_all(&mut self, selector: &str) -> Vec<ElementId> {
        let nodes = match select_all(&self.document, selector) {
            Ok(nodes) => nodes,
            Err(message) => {
                console(LogLevel::Warn, &message);
                return Vec::new();
            }
        };
        nodes
            .into_iter()
            .map(|element| self.register(element))
            .collect()
    }

    fn attribute(&self, id: ElementId, name: &str) -> Option<String> {
        self.element(id)?.get_attribute(name)
    }

    fn text_content(&self, id: ElementId) -> Option<String> {
        self.element(id)?.text_content()
    }
}

impl ViewportProbe for WebPage {
    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn inner_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }

    fn bounding_rect(&self, id: ElementId) -> Option<Rect> {
        let rect = self.element(id)?.get_bounding_client_rect();
        Some(Rect::new(rect.x(), rect.y(), rect.width(), rect.height()))
    }

    fn offset_span(&self, id: ElementId) -> Option<SectionSpan> {
        let element = self.element(id)?.dyn_ref::<HtmlElement>()?;
        Some(SectionSpan::new(
            f64::from(element.offset_top()),
            f64::from(element.offset_height()),
        ))
    }
}

/// `querySelectorAll` collected into elements. An invalid selector comes back
/// as a message instead of an exception.
fn select_all(document: &Document, selector: &str) -> Result<Vec<Element>, String> {
    let list = document
        .query_selector_all(selector)
        .map_err(|e| format!("invalid selector {selector:?}: {e:?}"))?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}
