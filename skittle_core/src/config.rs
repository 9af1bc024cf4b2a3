// Copyright 2026 the Skittle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gallery configuration.
//!
//! The page names its three sources; everything else (file names, poster
//! paths, endpoint URLs, titles) is derived from those names.

use alloc::format;
use alloc::string::{String, ToString as _};

use serde::Deserialize;

use crate::api;
use crate::slot::{SLOT_COUNT, SlotIndex};

/// Source names and asset locations for the gallery.
///
/// Deserializes from a partial object; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Base names of the three sources, in slot order.
    pub videos: [String; SLOT_COUNT],
    /// Directory holding poster/thumbnail images, with trailing slash.
    pub image_dir: String,
    /// Prefix prepended to every endpoint path. Empty means same origin.
    pub api_base: String,
    /// Extension of the media files.
    pub media_extension: String,
    /// Extension of the poster images.
    pub poster_extension: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            videos: [
                "video1".to_string(),
                "video2".to_string(),
                "video3".to_string(),
            ],
            image_dir: "img/".to_string(),
            api_base: String::new(),
            media_extension: "mp4".to_string(),
            poster_extension: "png".to_string(),
        }
    }
}

impl GalleryConfig {
    /// Returns a default config with the given source names.
    #[must_use]
    pub fn with_videos(videos: [String; SLOT_COUNT]) -> Self {
        Self {
            videos,
            ..Self::default()
        }
    }

    /// Returns the media file name for `slot`, e.g. `intro.mp4`.
    #[must_use]
    pub fn media_file(&self, slot: SlotIndex) -> String {
        format!("{}.{}", self.videos[slot.position()], self.media_extension)
    }

    /// Returns the poster image URL for `slot`, e.g. `img/intro.png`.
    #[must_use]
    pub fn poster_url(&self, slot: SlotIndex) -> String {
        format!(
            "{}{}.{}",
            self.image_dir,
            self.videos[slot.position()],
            self.poster_extension
        )
    }

    /// Returns the URL the slot's media blob is fetched from.
    #[must_use]
    pub fn media_url(&self, slot: SlotIndex) -> String {
        self.endpoint(&format!("{}{}", api::MEDIA_PATH, self.media_file(slot)))
    }

    /// Returns the displayed title for `slot`: the media file name up to its
    /// first `.`.
    #[must_use]
    pub fn title(&self, slot: SlotIndex) -> String {
        let file = self.media_file(slot);
        match file.split_once('.') {
            Some((stem, _)) => stem.to_string(),
            None => file,
        }
    }

    /// Returns the titles of all slots in order.
    #[must_use]
    pub fn titles(&self) -> [String; SLOT_COUNT] {
        SlotIndex::ALL.map(|slot| self.title(slot))
    }

    /// Prefixes `path` with [`api_base`](Self::api_base).
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }
}
