// Copyright 2026 the Skittle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Word search over the loaded videos.
//!
//! The server answers with a flat object mapping `"{title}-{offset}"` to
//! `"{label}-{kind}"`. [`decode_results`] turns that into
//! [`SearchResultRow`]s restricted to the titles currently in the gallery and
//! sorted by offset; [`SearchController`] drives a [`SearchView`] through one
//! search round trip.

use alloc::string::{String, ToString as _};
use alloc::vec::Vec;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::Error;
use crate::api::SearchRequest;
use crate::slot::{SlotIndex, SlotSet};

/// Text shown when a search request fails.
pub const SEARCH_FAILED: &str = "Search failed!";

/// What a result row represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    /// A visual tag detected in the clip.
    Tag,
    /// Something said by a speaker.
    User,
}

impl RowKind {
    /// Maps the server's kind suffix. Only `tag` is a tag; every other kind
    /// renders as a speaker row.
    #[must_use]
    pub fn from_wire(kind: &str) -> Self {
        if kind == "tag" { Self::Tag } else { Self::User }
    }

    /// Returns the name used for CSS classes and glyphs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::User => "user",
        }
    }
}

/// A tagged moment: one skittle in the result feed.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResultRow {
    /// Slot whose video contains the moment.
    pub slot: SlotIndex,
    /// Offset into the video, in seconds.
    pub offset_seconds: f64,
    /// Offset exactly as the server wrote it, for display.
    pub offset_label: String,
    /// Matched word or tag.
    pub label: String,
    /// Row kind.
    pub kind: RowKind,
}

/// Presentation surface for search results.
pub trait SearchView {
    /// Removes every rendered row.
    fn clear_results(&mut self);

    /// Replaces any rendered rows with `rows`, in the given order.
    fn render_results(&mut self, rows: &[SearchResultRow]);

    /// Tells the user the search failed. The browser shows a blocking alert.
    fn report_failure(&mut self, message: &str);
}

/// Returns `true` if a key release should re-run the search: Enter, Delete,
/// Backspace, or an ASCII letter.
#[must_use]
pub fn triggers_search(key: &str) -> bool {
    match key {
        "Enter" | "Delete" | "Backspace" => true,
        _ => {
            let mut chars = key.chars();
            matches!(
                (chars.next(), chars.next()),
                (Some(c), None) if c.is_ascii_alphabetic()
            )
        }
    }
}

/// Decodes a search response body into rows for the loaded slots, sorted by
/// ascending offset.
///
/// The body may be the result object itself or a JSON string containing it.
/// Entries whose key or value lacks a `-`, whose offset is not a number, or
/// whose title is not loaded are skipped.
pub fn decode_results(body: &str, slots: &SlotSet) -> Result<Vec<SearchResultRow>, Error> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| Error::decode("search response", &e))?;
    let map: Map<String, Value> = match value {
        Value::Object(map) => map,
        Value::String(inner) => serde_json::from_str(&inner)
            .map_err(|e| Error::decode("nested search response", &e))?,
        Value::Null => Map::new(),
        _ => {
            return Err(Error::Decode {
                what: "search response",
                reason: "expected an object".to_string(),
            });
        }
    };

    let mut rows = Vec::with_capacity(map.len());
    for (key, value) in &map {
        let Some(text) = value.as_str() else {
            warn!(key = %key, "search entry value is not a string");
            continue;
        };
        let Some(entry) = Entry::parse(key, text) else {
            warn!(key = %key, value = %text, "malformed search entry skipped");
            continue;
        };
        match slots.slot_for_title(entry.title) {
            Some(slot) => rows.push(entry.into_row(slot)),
            None => debug!(title = entry.title, "search entry for unloaded title dropped"),
        }
    }
    rows.sort_by(|a, b| a.offset_seconds.total_cmp(&b.offset_seconds));
    Ok(rows)
}

/// A response entry with its key and value split apart.
struct Entry<'a> {
    title: &'a str,
    offset_seconds: f64,
    offset_label: &'a str,
    label: &'a str,
    kind: RowKind,
}

impl<'a> Entry<'a> {
    fn parse(key: &'a str, value: &'a str) -> Option<Self> {
        let (title, offset) = key.rsplit_once('-')?;
        let (label, kind) = value.rsplit_once('-')?;
        let offset_label = offset.trim();
        let offset_seconds: f64 = offset_label.parse().ok()?;
        offset_seconds.is_finite().then_some(Self {
            title,
            offset_seconds,
            offset_label,
            label,
            kind: RowKind::from_wire(kind),
        })
    }

    fn into_row(self, slot: SlotIndex) -> SearchResultRow {
        SearchResultRow {
            slot,
            offset_seconds: self.offset_seconds,
            offset_label: self.offset_label.to_string(),
            label: self.label.to_string(),
            kind: self.kind,
        }
    }
}

/// Identifies one search round trip.
///
/// Only the most recently started search may render; replies carrying an
/// older generation are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchGeneration(u32);

/// Drives a [`SearchView`] through search round trips.
#[derive(Debug)]
pub struct SearchController<V> {
    view: V,
    generation: SearchGeneration,
}

impl<V: SearchView> SearchController<V> {
    /// Creates a controller rendering into `view`.
    #[must_use]
    pub fn new(view: V) -> Self {
        Self {
            view,
            generation: SearchGeneration(0),
        }
    }

    /// Returns the view.
    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Starts a search: clears prior results, supersedes any search still in
    /// flight, and returns the request to send tagged with its generation.
    /// An empty query returns `None`.
    pub fn begin(
        &mut self,
        query: &str,
        slots: &SlotSet,
    ) -> Option<(SearchGeneration, SearchRequest)> {
        self.generation = SearchGeneration(self.generation.0.wrapping_add(1));
        self.view.clear_results();
        if query.is_empty() {
            return None;
        }
        Some((
            self.generation,
            SearchRequest {
                query: query.to_string(),
                titles: slots.titles().map(str::to_string),
            },
        ))
    }

    /// Renders a successful response, returning the number of rows shown, or
    /// `None` if a newer search has started since.
    ///
    /// A body that cannot be decoded is reported like a failed request.
    pub fn complete(
        &mut self,
        generation: SearchGeneration,
        body: &str,
        slots: &SlotSet,
    ) -> Result<Option<usize>, Error> {
        if self.is_stale(generation) {
            return Ok(None);
        }
        match decode_results(body, slots) {
            Ok(rows) => {
                self.view.render_results(&rows);
                debug!(rows = rows.len(), "search results rendered");
                Ok(Some(rows.len()))
            }
            Err(err) => {
                warn!(error = %err, "search response rejected");
                self.view.report_failure(SEARCH_FAILED);
                Err(err)
            }
        }
    }

    /// Reports a failed request, unless a newer search has started since.
    pub fn fail(&mut self, generation: SearchGeneration, err: &Error) {
        if self.is_stale(generation) {
            return;
        }
        warn!(error = %err, "search request failed");
        self.view.report_failure(SEARCH_FAILED);
    }

    fn is_stale(&self, generation: SearchGeneration) -> bool {
        let stale = generation != self.generation;
        if stale {
            debug!(
                reply = generation.0,
                current = self.generation.0,
                "superseded search reply dropped"
            );
        }
        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct RecordingView {
        clears: usize,
        rows: Vec<SearchResultRow>,
        failures: Vec<String>,
    }

    impl SearchView for RecordingView {
        fn clear_results(&mut self) {
            self.clears += 1;
            self.rows.clear();
        }

        fn render_results(&mut self, rows: &[SearchResultRow]) {
            self.rows = rows.to_vec();
        }

        fn report_failure(&mut self, message: &str) {
            self.failures.push(message.to_string());
        }
    }

    fn slots() -> SlotSet {
        SlotSet::new([
            "harbor".to_string(),
            "city".to_string(),
            "forest".to_string(),
        ])
    }

    fn offsets(rows: &[SearchResultRow]) -> Vec<f64> {
        rows.iter().map(|r| r.offset_seconds).collect()
    }

    #[test]
    fn key_trigger_matches_letters_and_editing_keys() {
        for key in ["Enter", "Delete", "Backspace", "a", "Z"] {
            assert!(triggers_search(key), "{key} should trigger");
        }
        for key in ["1", "Shift", "ArrowLeft", " ", "é", ""] {
            assert!(!triggers_search(key), "{key} should not trigger");
        }
    }

    #[test]
    fn empty_query_clears_and_sends_nothing() {
        let mut search = SearchController::new(RecordingView::default());
        let (generation, _) = search.begin("boat", &slots()).expect("request");
        search
            .complete(generation, r#"{"harbor-10":"boat-word"}"#, &slots())
            .expect("render");
        assert_eq!(search.view().rows.len(), 1);

        assert_eq!(search.begin("", &slots()), None);
        assert!(search.view().rows.is_empty());
        assert_eq!(search.view().clears, 2);
    }

    #[test]
    fn request_carries_current_titles() {
        let mut search = SearchController::new(RecordingView::default());
        let (_, req) = search.begin("boat", &slots()).expect("request");
        assert_eq!(req.query, "boat");
        assert_eq!(req.titles, ["harbor", "city", "forest"]);
    }

    #[test]
    fn rows_are_sorted_by_offset() {
        let body = r#"{
            "city-120": "car-tag",
            "harbor-30": "boat-word",
            "forest-5": "tree-tag",
            "harbor-7.5": "gull-word"
        }"#;
        let rows = decode_results(body, &slots()).expect("decode");
        assert_eq!(offsets(&rows), [5.0, 7.5, 30.0, 120.0]);
        assert_eq!(rows[0].slot, SlotIndex::ALL[2]);
        assert_eq!(rows[0].kind, RowKind::Tag);
        assert_eq!(rows[1].kind, RowKind::User);
        assert_eq!(rows[1].offset_label, "7.5");
    }

    #[test]
    fn rows_for_unloaded_titles_are_dropped() {
        let body = r#"{"desert-10":"sand-tag","city-20":"bus-tag"}"#;
        let rows = decode_results(body, &slots()).expect("decode");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "bus");
    }

    #[test]
    fn titles_with_dashes_split_at_last_dash() {
        let slots = SlotSet::new([
            "old-harbor".to_string(),
            "city".to_string(),
            "forest".to_string(),
        ]);
        let rows = decode_results(r#"{"old-harbor-40":"rope-tag"}"#, &slots).expect("decode");
        assert_eq!(rows[0].slot, SlotIndex::ALL[0]);
        assert_eq!(rows[0].offset_seconds, 40.0);
    }

    #[test]
    fn nested_string_body_is_decoded() {
        let body = r#""{\"harbor-10\": \"boat-word\"}""#;
        let rows = decode_results(body, &slots()).expect("decode");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "boat");
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let body = r#"{"harbor":"boat-word","city-abc":"car-tag","forest-3":"tree","forest-4":7,"forest-9":"fern-tag"}"#;
        let rows = decode_results(body, &slots()).expect("decode");
        assert_eq!(offsets(&rows), [9.0]);
    }

    #[test]
    fn undecodable_body_reports_failure() {
        let mut search = SearchController::new(RecordingView::default());
        let (generation, _) = search.begin("boat", &slots()).expect("request");
        let err = search
            .complete(generation, "[1,2]", &slots())
            .expect_err("array body");
        assert!(matches!(err, Error::Decode { .. }));
        assert_eq!(search.view().failures, [SEARCH_FAILED]);
    }

    #[test]
    fn request_failure_reports_alert() {
        let mut search = SearchController::new(RecordingView::default());
        let (generation, _) = search.begin("boat", &slots()).expect("request");
        search.fail(
            generation,
            &Error::Request {
                url: "/api/Words".to_string(),
                reason: "500".to_string(),
            },
        );
        assert_eq!(search.view().failures, [SEARCH_FAILED]);
    }

    #[test]
    fn superseded_reply_is_not_rendered() {
        let mut search = SearchController::new(RecordingView::default());
        let (older, _) = search.begin("b", &slots()).expect("request");
        let (newer, _) = search.begin("bo", &slots()).expect("request");

        let shown = search
            .complete(
                newer,
                r#"{"harbor-50":"boat-word","city-5":"bollard-tag"}"#,
                &slots(),
            )
            .expect("render");
        assert_eq!(shown, Some(2));

        let late = search
            .complete(
                older,
                r#"{"harbor-1":"bay-word","forest-30":"birch-tag"}"#,
                &slots(),
            )
            .expect("stale reply");
        assert_eq!(late, None);
        assert_eq!(offsets(&search.view().rows), [5.0, 50.0]);
    }

    #[test]
    fn reply_after_empty_query_stays_cleared() {
        let mut search = SearchController::new(RecordingView::default());
        let (in_flight, _) = search.begin("boa", &slots()).expect("request");
        assert_eq!(search.begin("", &slots()), None);

        let late = search
            .complete(in_flight, r#"{"harbor-10":"boat-word"}"#, &slots())
            .expect("stale reply");
        assert_eq!(late, None);
        assert!(search.view().rows.is_empty());

        search.fail(
            in_flight,
            &Error::Request {
                url: "/api/Words".to_string(),
                reason: "timeout".to_string(),
            },
        );
        assert!(search.view().failures.is_empty());
    }

    #[test]
    fn repeated_render_replaces_rows() {
        let mut search = SearchController::new(RecordingView::default());
        let (generation, _) = search.begin("boat", &slots()).expect("request");
        search
            .complete(generation, r#"{"harbor-10":"boat-word"}"#, &slots())
            .expect("render");
        search
            .complete(generation, r#"{"city-3":"boat-tag"}"#, &slots())
            .expect("render");
        assert_eq!(offsets(&search.view().rows), [3.0]);
    }
}
