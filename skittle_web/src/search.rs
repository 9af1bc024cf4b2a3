// Copyright 2026 the Skittle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM-backed [`SearchView`].
//!
//! Rows carry their slot and offset in `data-vid` / `data-sec` attributes.
//! Click and hover handling is delegated to the feed container, and
//! [`RowRef::from_event`] recovers the row under the pointer.

use skittle_core::search::{RowKind, SearchResultRow, SearchView};
use skittle_core::slot::SlotIndex;
use tracing::warn;
use wasm_bindgen::JsCast as _;
use web_sys::{Document, Element, Event, HtmlElement};

/// Id of the result feed container.
pub(crate) const FEED_ID: &str = "search-feed";
const ROW_SELECTOR: &str = ".btn-skittle";

/// Renders skittle rows into the result feed.
pub struct DomSearchFeed {
    document: Document,
    feed: HtmlElement,
}

impl core::fmt::Debug for DomSearchFeed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomSearchFeed")
            .field("feed", &FEED_ID)
            .field("rows", &self.feed.child_element_count())
            .finish_non_exhaustive()
    }
}

impl DomSearchFeed {
    /// Creates a view over the page's result feed.
    pub fn new(document: Document) -> Result<Self, skittle_core::Error> {
        let feed = crate::dom::require(&document, FEED_ID)?;
        Ok(Self { document, feed })
    }

    /// Returns the feed container, for attaching delegated listeners.
    #[must_use]
    pub fn feed(&self) -> &HtmlElement {
        &self.feed
    }

    fn render_row(&self, row: &SearchResultRow) -> Result<Element, wasm_bindgen::JsValue> {
        let el = self.document.create_element("div")?;
        el.set_class_name(&row_classes(row.kind));
        el.set_attribute("data-vid", &row.slot.to_string())?;
        el.set_attribute("data-sec", &row.offset_label)?;

        let glyph = self.document.create_element("span")?;
        glyph.set_class_name(&glyph_classes(row.kind));

        let label = self.document.create_element("span")?;
        label.set_class_name("col-xs-10 link-text-body");
        label.set_text_content(Some(&row.label));

        let offset = self.document.create_element("span")?;
        offset.set_class_name("col-xs-1 btn-span");
        offset.set_text_content(Some(&format!("{} s", row.offset_label)));

        el.append_child(&glyph)?;
        el.append_child(&label)?;
        el.append_child(&offset)?;
        Ok(el)
    }
}

impl SearchView for DomSearchFeed {
    fn clear_results(&mut self) {
        self.feed.set_text_content(None);
    }

    fn render_results(&mut self, rows: &[SearchResultRow]) {
        self.feed.set_text_content(None);
        for row in rows {
            match self.render_row(row) {
                Ok(el) => {
                    let _ = self.feed.append_child(&el);
                }
                Err(err) => warn!(error = ?err, "failed to render search row"),
            }
        }
    }

    fn report_failure(&mut self, message: &str) {
        if let Some(window) = self.document.default_view() {
            let _ = window.alert_with_message(message);
        }
    }
}

/// The slot and offset of a rendered row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowRef {
    /// Slot the row points at.
    pub slot: SlotIndex,
    /// Offset in seconds.
    pub seconds: f64,
}

impl RowRef {
    /// Returns the row under an event delegated from the feed, if any.
    #[must_use]
    pub fn from_event(event: &Event) -> Option<Self> {
        let target: Element = event.target()?.dyn_into().ok()?;
        let row = target.closest(ROW_SELECTOR).ok()??;
        Self::from_attributes(
            row.get_attribute("data-vid").as_deref(),
            row.get_attribute("data-sec").as_deref(),
        )
    }

    fn from_attributes(vid: Option<&str>, sec: Option<&str>) -> Option<Self> {
        let slot = SlotIndex::new(vid?.trim().parse().ok()?)?;
        let seconds: f64 = sec?.trim().parse().ok()?;
        seconds.is_finite().then_some(Self { slot, seconds })
    }
}

fn row_classes(kind: RowKind) -> String {
    format!("row btn-skittle btn-{}", kind.as_str())
}

fn glyph_classes(kind: RowKind) -> String {
    let glyph = kind.as_str();
    format!("col-xs-1 glyphicon glyphicon-{glyph} glyph-{glyph}")
}
