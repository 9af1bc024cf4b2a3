// Copyright 2026 the Skittle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot model, wire formats and view-agnostic controllers for a three-video
//! gallery.
//!
//! `skittle_core` holds everything about the gallery that does not touch the
//! browser. It is `no_std` compatible (with `alloc`) so the controllers can be
//! driven by test doubles on the host and by DOM-backed views in `wasm32`.
//!
//! # Architecture
//!
//! ```text
//!   DOM event / fetch completion / SSE message
//!       │
//!       ▼
//!   Gallery / SearchController / ProcessingController
//!       │            │                     │
//!       ▼            ▼                     ▼
//!   GalleryView   SearchView   ProcessingView + StatusChannel
//! ```
//!
//! **[`slot`]**: The three fixed slots, their titles and loaded media, and
//! the single highlighted slot.
//!
//! **[`gallery`]**: Thumbnail selection, hover synchronization, playback
//! toggling and media binding behind the [`GalleryView`](gallery::GalleryView)
//! trait.
//!
//! **[`search`]**: Search request construction, response decoding into
//! sorted [`SearchResultRow`](search::SearchResultRow)s, and the keyboard
//! trigger.
//!
//! **[`processing`]**: Processing sessions, the streamed status log and
//! reply handling behind [`ProcessingView`](processing::ProcessingView) and
//! [`StatusChannel`](processing::StatusChannel).
//!
//! **[`api`]**: Endpoint paths and serde wire types.
//!
//! **[`config`]**: [`GalleryConfig`](config::GalleryConfig): source names,
//! asset locations and the endpoint prefix.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod api;
pub mod config;
mod error;
pub mod gallery;
pub mod processing;
pub mod search;
pub mod slot;

pub use error::Error;
