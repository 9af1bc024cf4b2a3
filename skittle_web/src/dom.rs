// Copyright 2026 the Skittle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small DOM helpers shared by the views and the demo.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, Window};

use skittle_core::Error;

/// Returns the global `window`.
pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

/// Returns the page's `document`.
pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))
}

/// Looks up an element by id and casts it to `T`.
///
/// Returns `None` if the element is absent or of a different type.
#[must_use]
pub fn by_id<T: JsCast>(doc: &Document, id: &str) -> Option<T> {
    doc.get_element_by_id(id)?.dyn_into::<T>().ok()
}

/// Like [`by_id`], but logs and returns [`Error::MissingElement`] when the
/// element is absent.
pub fn require<T: JsCast>(doc: &Document, id: &str) -> Result<T, Error> {
    by_id(doc, id).ok_or_else(|| {
        tracing::error!(id, "element not found");
        Error::MissingElement(id.to_owned())
    })
}

/// Adds or removes a class.
pub fn set_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

/// Registers `handler` for `event` on `target` for the lifetime of the page.
pub fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
    // Page-lifetime listener; there is no teardown on the web.
    cb.forget();
    Ok(())
}
