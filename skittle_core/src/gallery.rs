// Copyright 2026 the Skittle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gallery controller.
//!
//! [`Gallery`] owns the [`SlotSet`] and drives a [`GalleryView`]: it moves the
//! highlight between slots, swaps slot media into the main player, toggles
//! playback and native controls, and binds media as blobs arrive.
//!
//! Highlight changes always clear all three slots before setting one, so a
//! view never shows more than one highlighted thumbnail or title.

use alloc::string::String;

use tracing::{debug, error, warn};

use crate::Error;
use crate::slot::{MediaBinding, SlotIndex, SlotSet};

/// A player element that can be hovered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerTarget {
    /// The main player.
    Main,
    /// One of the slot preview videos.
    Slot(SlotIndex),
}

/// Presentation surface for the gallery.
///
/// The DOM implementation maps each call to element ids; test doubles record
/// the calls. Writes are infallible: a view that cannot find an element logs
/// and skips it.
pub trait GalleryView {
    /// Returns `true` if the slot's preview video element exists.
    fn has_slot(&self, slot: SlotIndex) -> bool;

    /// Adds or removes the highlight on a slot's thumbnail and title.
    fn set_highlight(&mut self, slot: SlotIndex, highlighted: bool);

    /// Sets the displayed title of a slot.
    fn set_title(&mut self, slot: SlotIndex, title: &str);

    /// Binds loaded media to the slot's preview video and thumbnail.
    fn bind_media(&mut self, slot: SlotIndex, media: &MediaBinding);

    /// Loads `media_url` into the main player, tags it with `slot`, seeks to
    /// `start_at` seconds if given, and starts playback.
    fn load_main(&mut self, slot: SlotIndex, media_url: &str, start_at: Option<f64>);

    /// Returns `true` if the main player is paused.
    fn is_paused(&self) -> bool;

    /// Starts main player playback.
    fn play(&mut self);

    /// Pauses the main player.
    fn pause(&mut self);

    /// Flips the native `controls` attribute on a player element.
    fn toggle_controls(&mut self, target: PlayerTarget);
}

/// The gallery controller.
#[derive(Debug)]
pub struct Gallery<V> {
    slots: SlotSet,
    view: V,
    main_slot: Option<SlotIndex>,
}

impl<V: GalleryView> Gallery<V> {
    /// Creates a controller for the given slots and view.
    #[must_use]
    pub fn new(slots: SlotSet, view: V) -> Self {
        Self {
            slots,
            view,
            main_slot: None,
        }
    }

    /// Returns the slot state.
    #[must_use]
    pub fn slots(&self) -> &SlotSet {
        &self.slots
    }

    /// Returns the view.
    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Returns the slot last loaded into the main player.
    #[must_use]
    pub fn main_slot(&self) -> Option<SlotIndex> {
        self.main_slot
    }

    /// Writes every slot's title to the view.
    pub fn show_titles(&mut self) {
        for slot in self.slots.iter() {
            self.view.set_title(slot.index(), slot.title());
        }
    }

    /// Highlights `slot` and plays its media in the main player from the
    /// start.
    pub fn select_video(&mut self, slot: SlotIndex) -> Result<(), Error> {
        self.load_into_main(slot, None)
    }

    /// Highlights `slot` and plays its media in the main player from
    /// `seconds`.
    pub fn seek_to(&mut self, slot: SlotIndex, seconds: f64) -> Result<(), Error> {
        self.load_into_main(slot, Some(seconds))
    }

    fn load_into_main(&mut self, slot: SlotIndex, start_at: Option<f64>) -> Result<(), Error> {
        if !self.view.has_slot(slot) {
            let err = Error::MissingElement(slot_video_id(slot));
            error!(%slot, "{err}");
            return Err(err);
        }

        self.highlight_only(Some(slot));

        let Some(media_url) = self.slots.get(slot).media_url() else {
            debug!(%slot, "slot media not loaded yet; player left unchanged");
            return Err(Error::MediaUnavailable(slot));
        };
        self.view.load_main(slot, media_url, start_at);
        self.main_slot = Some(slot);
        debug!(%slot, ?start_at, "main player loaded");
        Ok(())
    }

    /// Pauses the main player if playing, else plays.
    pub fn toggle_playback(&mut self) {
        if self.view.is_paused() {
            self.view.play();
        } else {
            self.view.pause();
        }
    }

    /// Handles the pointer entering or leaving a player element.
    pub fn hover_player(&mut self, target: PlayerTarget) {
        self.view.toggle_controls(target);
        let slot = match target {
            PlayerTarget::Main => self.main_slot,
            PlayerTarget::Slot(slot) => Some(slot),
        };
        self.highlight_only(slot);
    }

    /// Handles the pointer entering a search result row.
    pub fn hover_row(&mut self, slot: SlotIndex) {
        self.highlight_only(Some(slot));
    }

    /// Binds a slot's freshly loaded media.
    pub fn bind_media(&mut self, slot: SlotIndex, media: MediaBinding) {
        self.view.bind_media(slot, &media);
        self.slots.bind_media(slot, media);
        debug!(%slot, "slot media bound");
    }

    /// Records that a slot's media could not be fetched.
    ///
    /// The slot stays unloaded; other slots are unaffected.
    pub fn media_failed(&mut self, slot: SlotIndex, reason: &str) {
        warn!(%slot, reason, "slot media unavailable");
    }

    fn highlight_only(&mut self, slot: Option<SlotIndex>) {
        for other in SlotIndex::ALL {
            self.view.set_highlight(other, false);
        }
        if let Some(slot) = slot {
            self.view.set_highlight(slot, true);
        }
        self.slots.set_highlighted(slot);
    }
}

/// Element id of a slot's preview video.
#[must_use]
pub fn slot_video_id(slot: SlotIndex) -> String {
    alloc::format!("my-video-{slot}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString as _;
    use alloc::vec::Vec;

    use crate::slot::SLOT_COUNT;

    #[derive(Debug, Default)]
    struct RecordingView {
        missing: Option<SlotIndex>,
        thumbnails: [bool; SLOT_COUNT],
        titles: [bool; SLOT_COUNT],
        title_text: [String; SLOT_COUNT],
        bound: Vec<SlotIndex>,
        loads: Vec<(SlotIndex, String, Option<f64>)>,
        paused: bool,
        controls: Vec<PlayerTarget>,
    }

    impl GalleryView for RecordingView {
        fn has_slot(&self, slot: SlotIndex) -> bool {
            self.missing != Some(slot)
        }

        fn set_highlight(&mut self, slot: SlotIndex, highlighted: bool) {
            self.thumbnails[slot.position()] = highlighted;
            self.titles[slot.position()] = highlighted;
        }

        fn set_title(&mut self, slot: SlotIndex, title: &str) {
            self.title_text[slot.position()] = title.to_string();
        }

        fn bind_media(&mut self, slot: SlotIndex, _media: &MediaBinding) {
            self.bound.push(slot);
        }

        fn load_main(&mut self, slot: SlotIndex, media_url: &str, start_at: Option<f64>) {
            self.loads.push((slot, media_url.to_string(), start_at));
            self.paused = false;
        }

        fn is_paused(&self) -> bool {
            self.paused
        }

        fn play(&mut self) {
            self.paused = false;
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn toggle_controls(&mut self, target: PlayerTarget) {
            self.controls.push(target);
        }
    }

    fn slot(n: u32) -> SlotIndex {
        SlotIndex::new(n).expect("valid slot")
    }

    fn loaded_gallery() -> Gallery<RecordingView> {
        let slots = SlotSet::new(["a".to_string(), "b".to_string(), "c".to_string()]);
        let mut gallery = Gallery::new(slots, RecordingView::default());
        for s in SlotIndex::ALL {
            gallery.bind_media(
                s,
                MediaBinding {
                    media_url: alloc::format!("blob:{s}"),
                    poster_url: alloc::format!("img/{s}.png"),
                },
            );
        }
        gallery
    }

    fn highlighted_count(view: &RecordingView) -> (usize, usize) {
        (
            view.thumbnails.iter().filter(|h| **h).count(),
            view.titles.iter().filter(|h| **h).count(),
        )
    }

    #[test]
    fn selecting_leaves_exactly_one_highlight() {
        let mut gallery = loaded_gallery();
        for n in [1, 3, 2, 2, 1] {
            gallery.select_video(slot(n)).expect("select");
            assert_eq!(highlighted_count(gallery.view()), (1, 1));
            assert!(gallery.view().thumbnails[slot(n).position()]);
            assert_eq!(gallery.slots().highlighted(), Some(slot(n)));
        }
    }

    #[test]
    fn selecting_loads_main_player() {
        let mut gallery = loaded_gallery();
        gallery.select_video(slot(2)).expect("select");
        assert_eq!(
            gallery.view().loads,
            [(slot(2), "blob:2".to_string(), None)]
        );
        assert_eq!(gallery.main_slot(), Some(slot(2)));
    }

    #[test]
    fn seek_passes_offset() {
        let mut gallery = loaded_gallery();
        gallery.seek_to(slot(3), 40.0).expect("seek");
        assert_eq!(
            gallery.view().loads,
            [(slot(3), "blob:3".to_string(), Some(40.0))]
        );
        assert_eq!(highlighted_count(gallery.view()), (1, 1));
    }

    #[test]
    fn missing_element_aborts_without_touching_highlight() {
        let mut gallery = loaded_gallery();
        gallery.select_video(slot(1)).expect("select");
        gallery.view.missing = Some(slot(2));

        let err = gallery.select_video(slot(2)).expect_err("missing element");
        assert_eq!(err, Error::MissingElement("my-video-2".to_string()));
        assert_eq!(gallery.slots().highlighted(), Some(slot(1)));
        assert_eq!(gallery.view().loads.len(), 1);
    }

    #[test]
    fn unloaded_slot_highlights_but_keeps_player() {
        let slots = SlotSet::new(["a".to_string(), "b".to_string(), "c".to_string()]);
        let mut gallery = Gallery::new(slots, RecordingView::default());

        let err = gallery.select_video(slot(1)).expect_err("not loaded");
        assert_eq!(err, Error::MediaUnavailable(slot(1)));
        assert_eq!(highlighted_count(gallery.view()), (1, 1));
        assert!(gallery.view().loads.is_empty());
        assert_eq!(gallery.main_slot(), None);
    }

    #[test]
    fn toggle_playback_flips_state() {
        let mut gallery = loaded_gallery();
        gallery.select_video(slot(1)).expect("select");
        gallery.toggle_playback();
        assert!(gallery.view().is_paused());
        gallery.toggle_playback();
        assert!(!gallery.view().is_paused());
    }

    #[test]
    fn hovering_main_player_highlights_its_slot() {
        let mut gallery = loaded_gallery();
        gallery.select_video(slot(3)).expect("select");
        gallery.hover_row(slot(1));

        gallery.hover_player(PlayerTarget::Main);
        assert_eq!(gallery.slots().highlighted(), Some(slot(3)));
        assert_eq!(highlighted_count(gallery.view()), (1, 1));
        assert_eq!(gallery.view().controls, [PlayerTarget::Main]);
    }

    #[test]
    fn hovering_unloaded_main_player_clears_highlight() {
        let mut gallery = loaded_gallery();
        gallery.hover_row(slot(2));
        gallery.hover_player(PlayerTarget::Main);
        assert_eq!(gallery.slots().highlighted(), None);
        assert_eq!(highlighted_count(gallery.view()), (0, 0));
    }

    #[test]
    fn hovering_slot_video_highlights_that_slot() {
        let mut gallery = loaded_gallery();
        gallery.hover_player(PlayerTarget::Slot(slot(2)));
        assert_eq!(gallery.slots().highlighted(), Some(slot(2)));
        assert_eq!(gallery.view().controls, [PlayerTarget::Slot(slot(2))]);
    }

    #[test]
    fn failed_media_leaves_other_slots_loaded() {
        let slots = SlotSet::new(["a".to_string(), "b".to_string(), "c".to_string()]);
        let mut gallery = Gallery::new(slots, RecordingView::default());

        gallery.bind_media(
            slot(1),
            MediaBinding {
                media_url: "blob:1".to_string(),
                poster_url: "img/a.png".to_string(),
            },
        );
        gallery.media_failed(slot(2), "404 Not Found");
        gallery.bind_media(
            slot(3),
            MediaBinding {
                media_url: "blob:3".to_string(),
                poster_url: "img/c.png".to_string(),
            },
        );

        assert!(gallery.slots().get(slot(1)).is_loaded());
        assert!(!gallery.slots().get(slot(2)).is_loaded());
        assert!(gallery.slots().get(slot(3)).is_loaded());
        assert_eq!(gallery.view().bound, [slot(1), slot(3)]);
        gallery.select_video(slot(3)).expect("slot 3 still plays");
    }

    #[test]
    fn titles_are_written_to_view() {
        let mut gallery = loaded_gallery();
        gallery.show_titles();
        assert_eq!(gallery.view().title_text, ["a", "b", "c"]);
    }
}
