//! Executes [`DomCommand`]s against the live document.

use std::collections::HashMap;

use folio_core::TimerKind;
use folio_protocol::{DomCommand, LogLevel, TimerId};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, HtmlElement, HtmlFormElement, ScrollBehavior, ScrollToOptions, Window,
};

use crate::collaborators::RevealObserver;
use crate::web_page::WebPage;

/// Write to the browser console with the `folio:` prefix.
pub fn console(level: LogLevel, message: &str) {
    let line = JsValue::from_str(&format!("folio: {message}"));
    match level {
        LogLevel::Info => web_sys::console::log_1(&line),
        LogLevel::Warn => web_sys::console::warn_1(&line),
        LogLevel::Error => web_sys::console::error_1(&line),
    }
}

struct HostTimer {
    handle: i32,
    kind: TimerKind,
    _callback: Closure<dyn FnMut()>,
}

/// Host timers started on the controller's behalf.
///
/// A callback is never dropped while it may be running: finished and
/// cancelled timers are parked in `retired` and released at the start of the
/// next dispatch.
#[derive(Default)]
pub struct Timers {
    live: HashMap<TimerId, HostTimer>,
    retired: Vec<HostTimer>,
}

impl Timers {
    fn start(
        &mut self,
        window: &Window,
        timer: TimerId,
        kind: TimerKind,
        ms: u32,
    ) -> Result<(), JsValue> {
        self.cancel(window, timer);

        let callback = Closure::<dyn FnMut()>::new(move || crate::fire_timer(timer));
        let function = callback.as_ref().unchecked_ref();
        let ms = i32::try_from(ms).unwrap_or(i32::MAX);
        let handle = match kind {
            TimerKind::Interval => {
                window.set_interval_with_callback_and_timeout_and_arguments_0(function, ms)?
            }
            TimerKind::Timeout => {
                window.set_timeout_with_callback_and_timeout_and_arguments_0(function, ms)?
            }
        };
        self.live.insert(
            timer,
            HostTimer {
                handle,
                kind,
                _callback: callback,
            },
        );
        Ok(())
    }

    fn cancel(&mut self, window: &Window, timer: TimerId) {
        if let Some(host) = self.live.remove(&timer) {
            match host.kind {
                TimerKind::Interval => window.clear_interval_with_handle(host.handle),
                TimerKind::Timeout => window.clear_timeout_with_handle(host.handle),
            }
            self.retired.push(host);
        }
    }

    /// A timer's callback ran. Timeouts are done; intervals keep going.
    pub fn fired(&mut self, timer: TimerId) {
        if self
            .live
            .get(&timer)
            .is_some_and(|host| host.kind == TimerKind::Timeout)
            && let Some(host) = self.live.remove(&timer)
        {
            self.retired.push(host);
        }
    }

    /// Release callbacks of timers that can no longer fire.
    pub fn sweep(&mut self) {
        self.retired.clear();
    }

    pub fn clear_all(&mut self, window: &Window) {
        let timers: Vec<TimerId> = self.live.keys().copied().collect();
        for timer in timers {
            self.cancel(window, timer);
        }
    }
}

/// Everything a command may touch besides the controller.
pub struct Host {
    pub page: WebPage,
    pub timers: Timers,
    pub reveal: Option<RevealObserver>,
}

impl Host {
    pub fn apply(&mut self, commands: &[DomCommand]) {
        for command in commands {
            if let Err(err) = self.apply_one(command) {
                console(LogLevel::Error, &format!("{command:?} failed: {err:?}"));
            }
        }
    }

    fn target(&self, command: &DomCommand) -> Option<&Element> {
        let id = command.target()?;
        let element = self.page.element(id);
        if element.is_none() {
            console(LogLevel::Warn, &format!("no element #{} for {command:?}", id.0));
        }
        element
    }

    fn apply_one(&mut self, command: &DomCommand) -> Result<(), JsValue> {
        let window = self.page.window().clone();
        match command {
            DomCommand::AddClass { class, .. } => {
                if let Some(el) = self.target(command) {
                    el.class_list().add_1(class)?;
                }
            }
            DomCommand::RemoveClass { class, .. } => {
                if let Some(el) = self.target(command) {
                    el.class_list().remove_1(class)?;
                }
            }
            DomCommand::SetStyle {
                property, value, ..
            } => {
                if let Some(el) = self.target(command).and_then(|e| e.dyn_ref::<HtmlElement>()) {
                    el.style().set_property(property, value)?;
                }
            }
            DomCommand::SetText { text, .. } => {
                if let Some(el) = self.target(command) {
                    el.set_text_content(Some(text));
                }
            }
            DomCommand::SetHtml { html, .. } => {
                if let Some(el) = self.target(command) {
                    el.set_inner_html(html);
                }
            }
            DomCommand::SetAttribute { name, value, .. } => {
                if let Some(el) = self.target(command) {
                    el.set_attribute(name, value)?;
                }
            }
            DomCommand::SetDisabled { disabled, .. } => {
                if let Some(el) = self.target(command) {
                    if *disabled {
                        el.set_attribute("disabled", "")?;
                    } else {
                        el.remove_attribute("disabled")?;
                    }
                }
            }
            DomCommand::Focus { .. } => {
                if let Some(el) = self.target(command).and_then(|e| e.dyn_ref::<HtmlElement>()) {
                    el.focus()?;
                }
            }
            DomCommand::ResetForm { .. } => {
                if let Some(form) = self
                    .target(command)
                    .and_then(|e| e.dyn_ref::<HtmlFormElement>())
                {
                    form.reset();
                }
            }
            DomCommand::Unobserve { .. } => {
                if let (Some(el), Some(observer)) = (self.target(command), &self.reveal) {
                    observer.unobserve(el);
                }
            }
            DomCommand::ScrollTo { top } => {
                let options = ScrollToOptions::new();
                options.set_top(*top);
                options.set_behavior(ScrollBehavior::Smooth);
                window.scroll_to_with_scroll_to_options(&options);
            }
            DomCommand::Alert { message } => window.alert_with_message(message)?,
            DomCommand::StartInterval { timer, period_ms } => {
                self.timers
                    .start(&window, *timer, TimerKind::Interval, *period_ms)?;
            }
            DomCommand::StartTimeout { timer, delay_ms } => {
                self.timers
                    .start(&window, *timer, TimerKind::Timeout, *delay_ms)?;
            }
            DomCommand::CancelTimer { timer } => self.timers.cancel(&window, *timer),
            DomCommand::StoreSetting { key, value } => {
                if let Some(storage) = window.local_storage()? {
                    storage.set_item(key, value)?;
                }
            }
            DomCommand::Log { level, message } => console(*level, message),
        }
        Ok(())
    }
}
