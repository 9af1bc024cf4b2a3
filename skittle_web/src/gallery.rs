// Copyright 2026 the Skittle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM-backed [`GalleryView`].
//!
//! Elements are looked up by id on every call, so the view tolerates markup
//! that is added or removed after start-up.

use skittle_core::gallery::{GalleryView, PlayerTarget, slot_video_id};
use skittle_core::slot::{MediaBinding, SlotIndex};
use tracing::{error, warn};
use web_sys::{Document, Element, HtmlImageElement, HtmlVideoElement};

use crate::dom::{by_id, set_class};

/// Id of the main player element.
pub const MAIN_PLAYER_ID: &str = "my-video";
/// Class marking the highlighted thumbnail.
const THUMBNAIL_HIGHLIGHT: &str = "box";
/// Class marking the highlighted title.
const TITLE_HIGHLIGHT: &str = "box-title";

/// Maps gallery operations to the page's thumbnail, title and video elements.
pub struct DomGallery {
    document: Document,
    main: HtmlVideoElement,
}

impl core::fmt::Debug for DomGallery {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomGallery")
            .field("document", &"Document")
            .field("main", &MAIN_PLAYER_ID)
            .finish()
    }
}

impl DomGallery {
    /// Creates a view over `document`. Fails if the main player is missing.
    pub fn new(document: Document) -> Result<Self, skittle_core::Error> {
        let main = crate::dom::require(&document, MAIN_PLAYER_ID)?;
        Ok(Self { document, main })
    }

    /// Returns the main player element.
    #[must_use]
    pub fn main_player(&self) -> &HtmlVideoElement {
        &self.main
    }

    fn thumbnail(&self, slot: SlotIndex) -> Option<HtmlImageElement> {
        by_id(&self.document, &thumbnail_id(slot))
    }

    fn title(&self, slot: SlotIndex) -> Option<Element> {
        self.document.get_element_by_id(&title_id(slot))
    }

    fn slot_video(&self, slot: SlotIndex) -> Option<HtmlVideoElement> {
        by_id(&self.document, &slot_video_id(slot))
    }
}

impl GalleryView for DomGallery {
    fn has_slot(&self, slot: SlotIndex) -> bool {
        self.slot_video(slot).is_some()
    }

    fn set_highlight(&mut self, slot: SlotIndex, highlighted: bool) {
        if let Some(thumb) = self.thumbnail(slot) {
            set_class(&thumb, THUMBNAIL_HIGHLIGHT, highlighted);
        }
        if let Some(title) = self.title(slot) {
            set_class(&title, TITLE_HIGHLIGHT, highlighted);
        }
    }

    fn set_title(&mut self, slot: SlotIndex, title: &str) {
        match self.title(slot) {
            Some(el) => el.set_text_content(Some(title)),
            None => warn!(%slot, "title element missing"),
        }
    }

    fn bind_media(&mut self, slot: SlotIndex, media: &MediaBinding) {
        match self.slot_video(slot) {
            Some(video) => {
                video.set_src(&media.media_url);
                video.set_poster(&media.poster_url);
            }
            None => error!(id = %slot_video_id(slot), "video element not found"),
        }
        match self.thumbnail(slot) {
            Some(image) => image.set_src(&media.poster_url),
            None => error!(id = %thumbnail_id(slot), "image element not found"),
        }
    }

    fn load_main(&mut self, slot: SlotIndex, media_url: &str, start_at: Option<f64>) {
        self.main.set_src(media_url);
        let _ = self.main.set_attribute("data-vid", &slot.to_string());
        self.main.load();
        if let Some(seconds) = start_at {
            self.main.set_current_time(seconds);
        }
        if let Err(err) = self.main.play() {
            warn!(error = ?err, "main player refused to play");
        }
    }

    fn is_paused(&self) -> bool {
        self.main.paused()
    }

    fn play(&mut self) {
        if let Err(err) = self.main.play() {
            warn!(error = ?err, "main player refused to play");
        }
    }

    fn pause(&mut self) {
        let _ = self.main.pause();
    }

    fn toggle_controls(&mut self, target: PlayerTarget) {
        let video = match target {
            PlayerTarget::Main => Some(self.main.clone()),
            PlayerTarget::Slot(slot) => self.slot_video(slot),
        };
        if let Some(video) = video {
            video.set_controls(!video.controls());
        }
    }
}

/// Element id of a slot's thumbnail image.
#[must_use]
pub fn thumbnail_id(slot: SlotIndex) -> String {
    format!("myimage-{slot}")
}

/// Element id of a slot's title.
#[must_use]
pub fn title_id(slot: SlotIndex) -> String {
    format!("video-title-{slot}")
}
