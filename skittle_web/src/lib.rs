// Copyright 2026 the Skittle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for skittle.
//!
//! This crate implements the `skittle_core` seams on top of browser APIs:
//!
//! - [`DomGallery`]: [`GalleryView`] over the thumbnail, title and video
//!   elements
//! - [`DomSearchFeed`]: [`SearchView`] rendering skittle rows
//! - [`DomProcessing`]: [`ProcessingView`] for group notices and the status log
//! - [`StatusStream`]: `EventSource`-backed [`StatusChannel`]
//! - [`http`]: `fetch` helpers for blob downloads and form posts
//!
//! [`GalleryView`]: skittle_core::gallery::GalleryView
//! [`SearchView`]: skittle_core::search::SearchView
//! [`ProcessingView`]: skittle_core::processing::ProcessingView
//! [`StatusChannel`]: skittle_core::processing::StatusChannel

mod config;
pub mod dom;
mod gallery;
pub mod http;
mod processing;
mod search;
mod stream;

pub use config::{config_from_json, page_config};
pub use gallery::{DomGallery, MAIN_PLAYER_ID, thumbnail_id, title_id};
pub use processing::DomProcessing;
pub use search::{DomSearchFeed, RowRef};
pub use stream::StatusStream;

use std::sync::Once;

use skittle_core::Error;
use wasm_bindgen::JsValue;

/// Installs the panic hook and the `tracing` subscriber that writes to the
/// browser console. Safe to call more than once.
pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    });
}

/// Converts a core error into a value that can be thrown to JavaScript.
#[must_use]
pub fn js_error(err: &Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}
