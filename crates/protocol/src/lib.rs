pub mod commands;
pub mod theme;
pub mod types;

pub use commands::{DomCommand, LogLevel};
pub use theme::ThemeMode;
pub use types::{ElementId, Rect, SectionSpan, Signal, TimerId};
