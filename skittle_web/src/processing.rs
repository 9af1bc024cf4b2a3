// Copyright 2026 the Skittle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM-backed [`ProcessingView`].
//!
//! Each slot has a `.group-N` container holding a trigger `button` and a
//! `span.not-loading` status area. The running log lives in
//! `#serverDataSpeech`, the last transcription in
//! `#serverDataSpeechPlaceholder`.

use skittle_core::processing::{Notice, NoticeKind, ProcessingView};
use skittle_core::slot::SlotIndex;
use tracing::warn;
use wasm_bindgen::JsCast as _;
use web_sys::{Document, Element, HtmlElement};

const LOG_ID: &str = "serverDataSpeech";
const PLACEHOLDER_ID: &str = "serverDataSpeechPlaceholder";
const LOADING: &str = "loading";

/// Renders processing state into the slot groups and the status log.
pub struct DomProcessing {
    document: Document,
}

impl core::fmt::Debug for DomProcessing {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomProcessing")
            .field("log", &LOG_ID)
            .finish_non_exhaustive()
    }
}

impl DomProcessing {
    /// Creates a view over `document`.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Returns the trigger buttons in a slot's group.
    #[must_use]
    pub fn triggers(&self, slot: SlotIndex) -> Vec<Element> {
        let selector = format!(".{} button", group_class(slot));
        let Ok(buttons) = self.document.query_selector_all(&selector) else {
            return Vec::new();
        };
        (0..buttons.length())
            .filter_map(|i| buttons.item(i)?.dyn_into::<Element>().ok())
            .collect()
    }

    fn status_area(&self, slot: SlotIndex) -> Option<HtmlElement> {
        let selector = format!(".{} span.not-loading", group_class(slot));
        let found = self.document.query_selector(&selector).ok().flatten();
        if found.is_none() {
            warn!(%slot, selector = %selector, "status area not found");
        }
        found.and_then(|el| el.dyn_into().ok())
    }

    fn notice_span(&self, classes: &str, text: &str) -> Option<Element> {
        let span = self.document.create_element("span").ok()?;
        span.set_class_name(classes);
        span.set_text_content(Some(text));
        Some(span)
    }
}

impl ProcessingView for DomProcessing {
    fn show_loading(&mut self, slot: SlotIndex) {
        if let Some(area) = self.status_area(slot) {
            let _ = area.style().remove_property("display");
            crate::dom::set_class(&area, LOADING, true);
        }
    }

    fn remove_trigger(&mut self, slot: SlotIndex) {
        for button in self.triggers(slot) {
            button.remove();
        }
    }

    fn show_notice(&mut self, slot: SlotIndex, notice: &Notice) {
        let Some(area) = self.status_area(slot) else {
            return;
        };
        let Some(span) = self.notice_span(notice_classes(notice.kind), &notice.text) else {
            return;
        };
        match notice.kind {
            NoticeKind::Pending => {}
            NoticeKind::Success | NoticeKind::Danger => {
                crate::dom::set_class(&area, LOADING, false);
                area.set_text_content(None);
            }
        }
        let _ = area.append_child(&span);
    }

    fn prepend_status(&mut self, line: &str) {
        let Some(log) = self.document.get_element_by_id(LOG_ID) else {
            warn!(id = LOG_ID, "status log not found");
            return;
        };
        let text = self.document.create_text_node(line);
        let Ok(br) = self.document.create_element("br") else {
            return;
        };
        let first = log.first_child();
        let _ = log.insert_before(&br, first.as_ref());
        let _ = log.insert_before(&text, Some(&br));
    }

    fn set_placeholder(&mut self, line: &str) {
        match self.document.get_element_by_id(PLACEHOLDER_ID) {
            Some(el) => el.set_text_content(Some(line)),
            None => warn!(id = PLACEHOLDER_ID, "status placeholder not found"),
        }
    }
}

/// Class of a slot's processing group.
#[must_use]
pub(crate) fn group_class(slot: SlotIndex) -> String {
    format!("group-{slot}")
}

fn notice_classes(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Success => "btn-notice btn-success",
        NoticeKind::Pending => "loaded-two btn-notice",
        NoticeKind::Danger => "btn-notice btn-danger",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_class_uses_slot_number() {
        assert_eq!(group_class(SlotIndex::ALL[2]), "group-3");
    }

    #[test]
    fn only_pending_notice_is_styled_as_follow_up() {
        assert_eq!(notice_classes(NoticeKind::Pending), "loaded-two btn-notice");
        assert!(notice_classes(NoticeKind::Danger).ends_with("btn-danger"));
        assert!(notice_classes(NoticeKind::Success).ends_with("btn-success"));
    }
}
