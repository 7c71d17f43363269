pub mod chrome;
pub mod config;
pub mod controller;
pub mod counter;
pub mod form;
pub mod model;
pub mod nav;
pub mod page;
pub mod theme;
pub mod widgets;

pub use config::ControllerConfig;
pub use controller::Controller;
pub use page::{DomSource, StaticElement, StaticPage, TimerKind, ViewportProbe};
