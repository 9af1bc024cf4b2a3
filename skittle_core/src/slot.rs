// Copyright 2026 the Skittle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The three fixed gallery slots.
//!
//! A slot pairs a thumbnail, a title and a preview video. [`SlotSet`] owns all
//! three and tracks which one is highlighted; at most one slot is highlighted
//! at any time.

use alloc::string::String;
use core::fmt;

use crate::Error;

/// Number of slots in the gallery.
pub const SLOT_COUNT: usize = 3;

/// A validated, 1-based slot number.
///
/// Only `1`, `2` and `3` can be constructed, which matches the numeric suffix
/// of the page's element ids (`myimage-1`, `video-title-1`, ...).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex(u8);

impl SlotIndex {
    /// All slots in display order.
    pub const ALL: [Self; SLOT_COUNT] = [Self(1), Self(2), Self(3)];

    /// Returns the slot with the given 1-based number.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "number is matched to 1..=3 before the cast"
    )]
    pub const fn new(number: u32) -> Option<Self> {
        match number {
            1..=3 => Some(Self(number as u8)),
            _ => None,
        }
    }

    /// Returns the 1-based slot number.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0 as u32
    }

    /// Returns the 0-based position, for array indexing.
    #[inline]
    #[must_use]
    pub const fn position(self) -> usize {
        self.0 as usize - 1
    }
}

impl TryFrom<u32> for SlotIndex {
    type Error = Error;

    fn try_from(number: u32) -> Result<Self, Error> {
        Self::new(number).ok_or(Error::InvalidSlot(number))
    }
}

impl fmt::Debug for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotIndex({})", self.0)
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Media URLs bound to a slot once its blob has arrived.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaBinding {
    /// Playable source (an object URL in the browser).
    pub media_url: String,
    /// Poster/thumbnail image URL.
    pub poster_url: String,
}

/// One of the three video/thumbnail pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoSlot {
    index: SlotIndex,
    title: String,
    media: Option<MediaBinding>,
}

impl VideoSlot {
    /// Creates an unloaded slot.
    #[must_use]
    pub fn new(index: SlotIndex, title: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            media: None,
        }
    }

    /// Returns the slot number.
    #[must_use]
    pub fn index(&self) -> SlotIndex {
        self.index
    }

    /// Returns the displayed title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the playable source, if the blob has arrived.
    #[must_use]
    pub fn media_url(&self) -> Option<&str> {
        self.media.as_ref().map(|m| m.media_url.as_str())
    }

    /// Returns the poster URL, if the blob has arrived.
    #[must_use]
    pub fn poster_url(&self) -> Option<&str> {
        self.media.as_ref().map(|m| m.poster_url.as_str())
    }

    /// Returns `true` once media has been bound.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.media.is_some()
    }
}

/// The three slots and the highlighted one.
#[derive(Clone, Debug)]
pub struct SlotSet {
    slots: [VideoSlot; SLOT_COUNT],
    highlighted: Option<SlotIndex>,
}

impl SlotSet {
    /// Creates a set of unloaded slots with the given titles.
    #[must_use]
    pub fn new(titles: [String; SLOT_COUNT]) -> Self {
        let [t1, t2, t3] = titles;
        Self {
            slots: [
                VideoSlot::new(SlotIndex(1), t1),
                VideoSlot::new(SlotIndex(2), t2),
                VideoSlot::new(SlotIndex(3), t3),
            ],
            highlighted: None,
        }
    }

    /// Returns the slot at `index`.
    #[must_use]
    pub fn get(&self, index: SlotIndex) -> &VideoSlot {
        &self.slots[index.position()]
    }

    /// Iterates over the slots in display order.
    pub fn iter(&self) -> impl Iterator<Item = &VideoSlot> {
        self.slots.iter()
    }

    /// Returns the current titles in display order.
    #[must_use]
    pub fn titles(&self) -> [&str; SLOT_COUNT] {
        [
            self.slots[0].title(),
            self.slots[1].title(),
            self.slots[2].title(),
        ]
    }

    /// Returns the first slot whose title equals `title`.
    #[must_use]
    pub fn slot_for_title(&self, title: &str) -> Option<SlotIndex> {
        self.slots
            .iter()
            .find(|slot| slot.title == title)
            .map(VideoSlot::index)
    }

    /// Binds loaded media to a slot, replacing any earlier binding.
    pub fn bind_media(&mut self, index: SlotIndex, media: MediaBinding) {
        self.slots[index.position()].media = Some(media);
    }

    /// Returns the highlighted slot.
    #[must_use]
    pub fn highlighted(&self) -> Option<SlotIndex> {
        self.highlighted
    }

    /// Highlights `index` (or nothing), returning the previously highlighted
    /// slot.
    pub fn set_highlighted(&mut self, index: Option<SlotIndex>) -> Option<SlotIndex> {
        core::mem::replace(&mut self.highlighted, index)
    }
}
