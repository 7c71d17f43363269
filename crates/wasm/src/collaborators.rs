//! Third-party page scripts and browser services started alongside the
//! controller. Each is optional: a missing global or API is logged and
//! skipped.

use folio_core::widgets::{LightboxOptions, ObserverOptions, RevealOptions, TypedOptions};
use folio_protocol::LogLevel;
use js_sys::{Array, Function, Reflect};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Element, HtmlImageElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Window,
};

use crate::apply::console;

/// Serialize through JSON so the options keep their camelCase field names.
fn to_js<T: Serialize>(options: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(options).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}

fn global(name: &str) -> Option<JsValue> {
    Reflect::get(&js_sys::global(), &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn global_function(name: &str) -> Option<Function> {
    global(name)?.dyn_into::<Function>().ok()
}

/// `new Typed(selector, options)`.
pub fn start_typed(selector: &str, options: &TypedOptions) -> Result<(), JsValue> {
    let Some(typed) = global_function("Typed") else {
        console(LogLevel::Info, "Typed is not loaded; typed text stays static");
        return Ok(());
    };
    let args = Array::of2(&JsValue::from_str(selector), &to_js(options)?);
    Reflect::construct(&typed, &args)?;
    Ok(())
}

/// `GLightbox(options)`.
pub fn start_lightbox(options: &LightboxOptions) -> Result<(), JsValue> {
    let Some(lightbox) = global_function("GLightbox") else {
        console(LogLevel::Info, "GLightbox is not loaded; certificates open as links");
        return Ok(());
    };
    lightbox.call1(&JsValue::NULL, &to_js(options)?)?;
    Ok(())
}

/// `AOS.init(options)`.
pub fn start_reveal_library(options: &RevealOptions) -> Result<(), JsValue> {
    let Some(aos) = global("AOS") else {
        console(LogLevel::Info, "AOS is not loaded; scroll reveals are off");
        return Ok(());
    };
    let init = Reflect::get(&aos, &JsValue::from_str("init"))?.dyn_into::<Function>()?;
    init.call1(&aos, &to_js(options)?)?;
    Ok(())
}

/// Intersection observer for the fade-in cards, kept together with the
/// callback it calls so both are released on teardown.
pub struct RevealObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl RevealObserver {
    /// Entries are forwarded to [`crate::on_intersection`].
    pub fn new(options: &ObserverOptions) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            |entries: Array, _observer: IntersectionObserver| {
                let entries = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| (entry.target(), entry.is_intersecting()))
                    .collect::<Vec<_>>();
                crate::on_intersection(&entries);
            },
        );
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn observe(&self, element: &Element) {
        self.observer.observe(element);
    }

    pub fn unobserve(&self, element: &Element) {
        self.observer.unobserve(element);
    }

    /// Stop delivering entries. The callback must outlive any entry already
    /// queued, so call this before dropping.
    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}

/// Fetch images needed above the fold before they are laid out.
pub fn preload_images(sources: &[String]) -> Result<(), JsValue> {
    for source in sources {
        HtmlImageElement::new()?.set_src(source);
    }
    Ok(())
}

/// Register the service worker script, if the browser has the API.
pub fn register_service_worker(window: &Window, script: &str) {
    let navigator = window.navigator();
    if !Reflect::has(&navigator, &JsValue::from_str("serviceWorker")).unwrap_or(false) {
        return;
    }
    let registration = navigator.service_worker().register(script);
    let script = script.to_string();
    wasm_bindgen_futures::spawn_local(async move {
        match JsFuture::from(registration).await {
            Ok(_) => console(LogLevel::Info, &format!("service worker {script} registered")),
            Err(err) => console(
                LogLevel::Warn,
                &format!("service worker {script} registration failed: {err:?}"),
            ),
        }
    });
}
