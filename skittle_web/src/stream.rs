// Copyright 2026 the Skittle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `EventSource` status stream.
//!
//! [`StatusStream`] forwards each `message` event's `data` string to a
//! callback until it is closed. Transport errors are logged only: the browser
//! may retry on its own, but nothing here reconnects or times out.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use skittle_core::processing::StatusChannel;
use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventSource, MessageEvent};

type MessageClosure = Closure<dyn FnMut(MessageEvent)>;
type ErrorClosure = Closure<dyn FnMut(Event)>;

/// A server-push channel delivering status payloads.
///
/// Dropping the stream closes it.
pub struct StatusStream {
    inner: Rc<StreamInner>,
}

struct StreamInner {
    source: EventSource,
    url: String,

    /// Handlers registered on `source`. Kept here so they live exactly as
    /// long as the stream is open.
    on_message: RefCell<Option<MessageClosure>>,
    on_error: RefCell<Option<ErrorClosure>>,

    open: Cell<bool>,
}

impl StatusStream {
    /// Opens a stream to `url`. `callback` receives each message's data.
    pub fn open(url: &str, mut callback: impl FnMut(String) + 'static) -> Result<Self, JsValue> {
        let source = EventSource::new(url)?;
        let inner = Rc::new(StreamInner {
            source,
            url: url.to_owned(),
            on_message: RefCell::new(None),
            on_error: RefCell::new(None),
            open: Cell::new(true),
        });

        let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
            match event.data().as_string() {
                Some(data) => callback(data),
                None => warn!("status message without text data"),
            }
        }) as Box<dyn FnMut(MessageEvent)>);

        let error_url = inner.url.clone();
        let on_error = Closure::wrap(Box::new(move |_event: Event| {
            warn!(url = %error_url, "status stream error");
        }) as Box<dyn FnMut(Event)>);

        inner
            .source
            .set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        inner
            .source
            .set_onerror(Some(on_error.as_ref().unchecked_ref()));
        *inner.on_message.borrow_mut() = Some(on_message);
        *inner.on_error.borrow_mut() = Some(on_error);

        debug!(url, "status stream opened");
        Ok(Self { inner })
    }

    fn shutdown(&self) {
        if !self.inner.open.replace(false) {
            return;
        }
        self.inner.source.close();
        self.inner.source.set_onmessage(None);
        self.inner.source.set_onerror(None);
        // Drop the JS closures so they don't leak.
        self.inner.on_message.borrow_mut().take();
        self.inner.on_error.borrow_mut().take();
        debug!(url = %self.inner.url, "status stream closed");
    }
}

impl StatusChannel for StatusStream {
    fn close(&mut self) {
        self.shutdown();
    }
}

impl Drop for StatusStream {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl core::fmt::Debug for StatusStream {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StatusStream")
            .field("url", &self.inner.url)
            .field("open", &self.inner.open.get())
            .finish()
    }
}
