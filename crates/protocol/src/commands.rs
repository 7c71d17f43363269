use serde::{Deserialize, Serialize};

use crate::types::{ElementId, TimerId};

/// A single, stateless DOM instruction.
///
/// The core emits a `Vec<DomCommand>` in response to every page signal. The
/// host applies the list in order; each command carries all the data it
/// needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DomCommand {
    /// Add a class to the element's class list.
    AddClass { target: ElementId, class: String },

    /// Remove a class from the element's class list.
    RemoveClass { target: ElementId, class: String },

    /// Set an inline style property (`element.style.setProperty`).
    SetStyle {
        target: ElementId,
        property: String,
        value: String,
    },

    /// Replace the element's text content.
    SetText { target: ElementId, text: String },

    /// Replace the element's inner HTML.
    SetHtml { target: ElementId, html: String },

    /// Set an attribute on the element.
    SetAttribute {
        target: ElementId,
        name: String,
        value: String,
    },

    /// Enable or disable a form control.
    SetDisabled { target: ElementId, disabled: bool },

    /// Move keyboard focus to the element.
    Focus { target: ElementId },

    /// Reset a form to its initial values.
    ResetForm { target: ElementId },

    /// Stop delivering intersection entries for a reveal card.
    Unobserve { target: ElementId },

    /// Smoothly scroll the window to a document offset.
    ScrollTo { top: f64 },

    /// Show a blocking alert dialog.
    Alert { message: String },

    /// Start a recurring timer; the host calls back with the id every period.
    StartInterval { timer: TimerId, period_ms: u32 },

    /// Start a one-shot timer.
    StartTimeout { timer: TimerId, delay_ms: u32 },

    /// Cancel a running timer. Cancelling an unknown timer is a no-op.
    CancelTimer { timer: TimerId },

    /// Persist a key/value pair in local storage.
    StoreSetting { key: String, value: String },

    /// Forward a diagnostic to the host's console.
    Log { level: LogLevel, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl DomCommand {
    pub fn add_class(target: ElementId, class: &str) -> Self {
        Self::AddClass {
            target,
            class: class.to_string(),
        }
    }

    pub fn remove_class(target: ElementId, class: &str) -> Self {
        Self::RemoveClass {
            target,
            class: class.to_string(),
        }
    }

    pub fn set_style(target: ElementId, property: &str, value: impl Into<String>) -> Self {
        Self::SetStyle {
            target,
            property: property.to_string(),
            value: value.into(),
        }
    }

    pub fn set_attribute(target: ElementId, name: &str, value: impl Into<String>) -> Self {
        Self::SetAttribute {
            target,
            name: name.to_string(),
            value: value.into(),
        }
    }

    pub fn alert(message: impl Into<String>) -> Self {
        Self::Alert {
            message: message.into(),
        }
    }

    pub fn log(level: LogLevel, message: impl Into<String>) -> Self {
        Self::Log {
            level,
            message: message.into(),
        }
    }

    /// The element this command mutates, if any.
    pub fn target(&self) -> Option<ElementId> {
        match self {
            Self::AddClass { target, .. }
            | Self::RemoveClass { target, .. }
            | Self::SetStyle { target, .. }
            | Self::SetText { target, .. }
            | Self::SetHtml { target, .. }
            | Self::SetAttribute { target, .. }
            | Self::SetDisabled { target, .. }
            | Self::Focus { target }
            | Self::ResetForm { target }
            | Self::Unobserve { target } => Some(*target),
            Self::ScrollTo { .. }
            | Self::Alert { .. }
            | Self::StartInterval { .. }
            | Self::StartTimeout { .. }
            | Self::CancelTimer { .. }
            | Self::StoreSetting { .. }
            | Self::Log { .. } => None,
        }
    }
}
