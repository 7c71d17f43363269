mod apply;
mod collaborators;
mod listeners;
mod web_page;

use std::cell::RefCell;

use folio_core::config::Selectors;
use folio_core::theme::THEME_KEY;
use folio_core::{Controller, ControllerConfig, DomSource};
use folio_protocol::{DomCommand, LogLevel, Signal, TimerId};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, KeyboardEvent, Window};

use crate::apply::{Host, Timers, console};
use crate::collaborators::RevealObserver;
use crate::listeners::Listeners;
use crate::web_page::WebPage;

/// Id of the optional `<script type="application/json">` holding a config
/// override.
const CONFIG_ELEMENT_ID: &str = "folio-config";

struct Portfolio {
    controller: Controller,
    host: Host,
    listeners: Listeners,
}

impl Portfolio {
    fn apply(&mut self, commands: &[DomCommand]) {
        self.host.apply(commands);
    }

    fn tick(&mut self) {
        let commands = self.controller.on_tick(&self.host.page);
        self.apply(&commands);
    }

    fn load(&mut self) {
        let hash = self.host.page.location_hash();
        let commands = self
            .controller
            .on_load(&mut self.host.page, hash.as_deref());
        self.apply(&commands);
        report(
            "AOS",
            collaborators::start_reveal_library(&self.controller.config().collaborators.reveal),
        );
        if let Some(script) = &self.controller.config().service_worker {
            collaborators::register_service_worker(self.host.page.window(), script);
        }
    }
}

thread_local! {
    static PORTFOLIO: RefCell<Option<Portfolio>> = const { RefCell::new(None) };
}

/// Run `f` against the running page, if any.
///
/// Callbacks reach the state through here rather than capturing it, so no
/// closure owns the state that owns the closure. A callback arriving while
/// another is still running is dropped.
fn with_portfolio<R>(f: impl FnOnce(&mut Portfolio) -> R) -> Option<R> {
    PORTFOLIO.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            console(LogLevel::Warn, "event arrived during another handler; ignored");
            return None;
        };
        let portfolio = slot.as_mut()?;
        portfolio.host.timers.sweep();
        Some(f(portfolio))
    })
}

pub(crate) fn fire_timer(timer: TimerId) {
    with_portfolio(|p| {
        p.host.timers.fired(timer);
        let commands = p.controller.on_timer(timer);
        p.apply(&commands);
    });
}

pub(crate) fn on_intersection(entries: &[(Element, bool)]) {
    with_portfolio(|p| {
        for (element, is_intersecting) in entries {
            if let Some(id) = p.host.page.find(element) {
                let commands = p.controller.on_intersection(id, *is_intersecting);
                p.apply(&commands);
            }
        }
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() == "loading" {
        let target = document.clone();
        let boot_later = Closure::once_into_js(move || boot(window, document));
        target.add_event_listener_with_callback("DOMContentLoaded", boot_later.unchecked_ref())?;
        return Ok(());
    }
    boot(window, document);
    Ok(())
}

/// Detach from the page: stop every timer and remove every listener.
#[wasm_bindgen]
pub fn teardown() {
    let detached = with_portfolio(|p| {
        let commands = p.controller.teardown();
        p.apply(&commands);
        p.host.timers.clear_all(p.host.page.window());
        p.listeners.remove_all();
        if let Some(reveal) = p.host.reveal.take() {
            reveal.disconnect();
        }
    });
    if detached.is_some() {
        PORTFOLIO.with(|cell| {
            if let Ok(mut slot) = cell.try_borrow_mut() {
                slot.take();
            }
        });
    }
}

fn read_config(document: &Document) -> ControllerConfig {
    let Some(raw) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return ControllerConfig::default();
    };
    match ControllerConfig::from_json(&raw) {
        Ok(config) => config,
        Err(err) => {
            console(LogLevel::Warn, &format!("{err}; using defaults"));
            ControllerConfig::default()
        }
    }
}

/// A page script failing to start leaves the rest of the page working.
fn report(what: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        console(LogLevel::Error, &format!("{what} failed to start: {err:?}"));
    }
}

/// Each feature is set up on its own; one that fails is logged and the
/// others still start.
fn boot(window: Window, document: Document) {
    let config = read_config(&document);
    let mut page = WebPage::new(window.clone(), document.clone());
    let controller = Controller::initialize(&mut page, config.clone());

    let reveal = start_reveal_observer(&controller, &page, &config);

    if let Some(typed) = controller.typed_options() {
        report("Typed", collaborators::start_typed(&config.selectors.typed, typed));
    }
    report(
        "GLightbox",
        collaborators::start_lightbox(&config.collaborators.lightbox),
    );
    report(
        "image preload",
        collaborators::preload_images(&config.critical_images),
    );

    let mut portfolio = Portfolio {
        controller,
        host: Host {
            page,
            timers: Timers::default(),
            reveal,
        },
        listeners: Listeners::default(),
    };

    if config.theme_toggle {
        report(
            "theme toggle",
            attach_theme_toggle(&mut portfolio, &window, &document),
        );
    }
    install_listeners(&mut portfolio, &window, &document, &config);

    PORTFOLIO.with(|cell| *cell.borrow_mut() = Some(portfolio));

    // The load event has already fired when the module starts late.
    if document.ready_state() == "complete" {
        with_portfolio(Portfolio::load);
    }
}

/// `None` when there are no cards or the browser has no IntersectionObserver.
fn start_reveal_observer(
    controller: &Controller,
    page: &WebPage,
    config: &ControllerConfig,
) -> Option<RevealObserver> {
    if controller.reveal_targets().is_empty() {
        return None;
    }
    let reveal = match RevealObserver::new(&config.collaborators.observer) {
        Ok(reveal) => reveal,
        Err(err) => {
            report("reveal observer", Err(err));
            return None;
        }
    };
    for card in controller.reveal_targets() {
        if let Some(el) = page.element(card) {
            reveal.observe(el);
        }
    }
    Some(reveal)
}

fn attach_theme_toggle(
    portfolio: &mut Portfolio,
    window: &Window,
    document: &Document,
) -> Result<(), JsValue> {
    let Some(body) = document.body() else {
        return Ok(());
    };
    let button = document.create_element("button")?;
    button.set_class_name("theme-toggle");
    button.set_attribute("aria-label", "Toggle theme")?;
    body.append_child(&button)?;

    // Blocked storage reads as no saved preference.
    let saved = window
        .local_storage()
        .ok()
        .flatten()
        .and_then(|storage| storage.get_item(THEME_KEY).ok().flatten());
    let id = portfolio.host.page.register(button.clone());
    let commands = portfolio.controller.attach_theme_toggle(id, saved.as_deref());
    portfolio.apply(&commands);

    portfolio.listeners.add(&button, "click", |_| {
        with_portfolio(|p| {
            let commands = p.controller.on_theme_toggle();
            p.apply(&commands);
        });
    })
}

fn install_listeners(
    portfolio: &mut Portfolio,
    window: &Window,
    document: &Document,
    config: &ControllerConfig,
) {
    let selectors = &config.selectors;
    let signals = portfolio.controller.subscriptions().to_vec();
    let listeners = &mut portfolio.listeners;
    let page = &mut portfolio.host.page;

    report("scroll tracking", listen_for_signals(listeners, window, &signals));
    report("error handler", listen_for_errors(listeners, window));
    report("contact form", listen_for_submit(listeners, page, config));
    report(
        "mobile navigation",
        listen_for_mobile_nav(listeners, page, document, selectors),
    );
    report("anchor links", listen_for_anchors(listeners, page, selectors));
}

fn listen_for_signals(
    listeners: &mut Listeners,
    window: &Window,
    signals: &[Signal],
) -> Result<(), JsValue> {
    for signal in signals {
        let handler: fn(&mut Portfolio) = match signal {
            Signal::Scroll | Signal::Resize => Portfolio::tick,
            Signal::Load => Portfolio::load,
        };
        listeners.add(window, signal.event_name(), move |_| {
            with_portfolio(handler);
        })?;
    }
    Ok(())
}

fn listen_for_errors(listeners: &mut Listeners, window: &Window) -> Result<(), JsValue> {
    listeners.add(window, "error", |event: Event| {
        let message = event
            .dyn_ref::<web_sys::ErrorEvent>()
            .map(web_sys::ErrorEvent::message)
            .unwrap_or_else(|| event.type_());
        console(LogLevel::Error, &format!("page error: {message}"));
    })
}

fn listen_for_submit(
    listeners: &mut Listeners,
    page: &mut WebPage,
    config: &ControllerConfig,
) -> Result<(), JsValue> {
    let Some(form) = page.query(&config.selectors.contact_form) else {
        return Ok(());
    };
    let Some(target) = page.element(form).cloned() else {
        return Ok(());
    };
    let submit_selector = config.submit_button_selector();
    listeners.add(&target, "submit", move |event: Event| {
        event.prevent_default();
        with_portfolio(|p| {
            let fields = p.host.page.contact_fields(form);
            let label = p
                .host
                .page
                .query(&submit_selector)
                .and_then(|button| p.host.page.text_content(button))
                .unwrap_or_default();
            let commands = p.controller.on_submit(&fields, &label);
            p.apply(&commands);
        });
    })
}

fn listen_for_mobile_nav(
    listeners: &mut Listeners,
    page: &mut WebPage,
    document: &Document,
    selectors: &Selectors,
) -> Result<(), JsValue> {
    let Some(toggle) = page
        .query(&selectors.mobile_nav_toggle)
        .and_then(|id| page.element(id).cloned())
    else {
        return Ok(());
    };
    listeners.add(&toggle, "click", |_| {
        with_portfolio(|p| {
            let commands = p.controller.on_mobile_nav_toggle();
            p.apply(&commands);
        });
    })?;
    listeners.add(&toggle, "keydown", |event: Event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
            return;
        };
        let handled = with_portfolio(|p| {
            let commands = p.controller.on_mobile_nav_key(&key)?;
            p.apply(&commands);
            Some(())
        });
        if handled.flatten().is_some() {
            event.prevent_default();
        }
    })?;

    let nav_areas = format!("{}, {}", selectors.header, selectors.mobile_nav_toggle);
    listeners.add(document, "click", move |event: Event| {
        let inside_nav = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(&nav_areas).ok().flatten())
            .is_some();
        with_portfolio(|p| {
            let commands = p.controller.on_body_click(inside_nav);
            p.apply(&commands);
        });
    })
}

fn listen_for_anchors(
    listeners: &mut Listeners,
    page: &mut WebPage,
    selectors: &Selectors,
) -> Result<(), JsValue> {
    let links = format!("{}, {}", selectors.anchors, selectors.scrollto);
    for id in page.query_all(&links) {
        let Some(link) = page.element(id).cloned() else {
            continue;
        };
        let scrollto = selectors.scrollto.clone();
        let el = link.clone();
        listeners.add(&link, "click", move |event: Event| {
            let href = el.get_attribute("href").unwrap_or_default();
            let closes_nav = el.matches(&scrollto).unwrap_or(false);
            let handled = with_portfolio(|p| {
                let commands = p
                    .controller
                    .on_anchor_click(&href, closes_nav, &mut p.host.page)?;
                p.apply(&commands);
                Some(())
            });
            if handled.flatten().is_some() {
                event.prevent_default();
            }
        })?;
    }
    Ok(())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use folio_core::theme::DARK_CLASS;
    use js_sys::{Function, Object, Reflect};
    use wasm_bindgen_test::*;
    use web_sys::HtmlElement;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const QUIET_CONFIG: &str = r#"{ "service_worker": null, "critical_images": [] }"#;

    fn page() -> (Window, Document) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();
        (window, document)
    }

    fn append(document: &Document, tag: &str, class: &str, text: &str) -> Element {
        let element = document.create_element(tag).unwrap();
        element.set_class_name(class);
        element.set_text_content(Some(text));
        element
            .set_attribute("style", "position: fixed; top: 0; left: 0")
            .unwrap();
        document.body().unwrap().append_child(&element).unwrap();
        element
    }

    fn use_config(document: &Document, json: &str) -> Element {
        let script = document.create_element("script").unwrap();
        script.set_id(CONFIG_ELEMENT_ID);
        script.set_attribute("type", "application/json").unwrap();
        script.set_text_content(Some(json));
        document.body().unwrap().append_child(&script).unwrap();
        script
    }

    fn running() -> bool {
        with_portfolio(|_| ()).is_some()
    }

    #[wasm_bindgen_test]
    fn missing_intersection_observer_keeps_counters_running() {
        let (window, document) = page();
        teardown();
        let config = use_config(&document, QUIET_CONFIG);
        let card = append(&document, "div", "course-card", "card");
        let stat = append(&document, "span", "stat-number", "42+");

        let global = js_sys::global();
        let name = JsValue::from_str("IntersectionObserver");
        let constructor = Reflect::get(&global, &name).unwrap();
        Reflect::delete_property(&global, &name).unwrap();
        boot(window.clone(), document.clone());
        Reflect::set(&global, &name, &constructor).unwrap();

        assert!(running());
        window.dispatch_event(&Event::new("scroll").unwrap()).unwrap();
        assert!(stat.class_list().contains("animated"));

        teardown();
        for element in [config, card, stat] {
            element.remove();
        }
    }

    #[wasm_bindgen_test]
    fn blocked_storage_keeps_theme_toggle_and_listeners() {
        let (window, document) = page();
        teardown();
        let config = use_config(
            &document,
            r#"{ "theme_toggle": true, "service_worker": null, "critical_images": [] }"#,
        );
        let stat = append(&document, "span", "stat-number", "7");

        let target: &Object = window.unchecked_ref();
        let name = JsValue::from_str("localStorage");
        let original = Object::get_own_property_descriptor(target, &name);
        let blocked = Object::new();
        let getter = Function::new_no_args("throw new DOMException('blocked', 'SecurityError');");
        Reflect::set(&blocked, &JsValue::from_str("get"), &getter).unwrap();
        Reflect::set(&blocked, &JsValue::from_str("configurable"), &JsValue::TRUE).unwrap();
        Object::define_property(target, &name, &blocked);
        boot(window.clone(), document.clone());

        assert!(running());
        let button = document
            .query_selector(".theme-toggle")
            .unwrap()
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap();
        button.click();
        let body = document.body().unwrap();
        assert!(body.class_list().contains(DARK_CLASS));
        window.dispatch_event(&Event::new("scroll").unwrap()).unwrap();
        assert!(stat.class_list().contains("animated"));

        if let Some(original) = original.dyn_ref::<Object>() {
            Object::define_property(target, &name, original);
        }
        teardown();
        body.class_list().remove_1(DARK_CLASS).unwrap();
        for element in [config, stat, button.into()] {
            element.remove();
        }
    }
}
