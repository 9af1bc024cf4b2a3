// Copyright 2026 the Skittle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use crate::slot::SlotIndex;

/// Errors produced by the gallery controllers.
///
/// Every variant is display-only: the controllers log it or surface it as a
/// notice, and nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A required page element is missing.
    #[error("element with id '{0}' not found")]
    MissingElement(String),

    /// A slot number outside `1..=3`.
    #[error("slot {0} does not exist")]
    InvalidSlot(u32),

    /// The slot's media blob has not been bound yet.
    #[error("media for slot {0} is not loaded")]
    MediaUnavailable(SlotIndex),

    /// A response or stream payload could not be decoded.
    #[error("failed to decode {what}: {reason}")]
    Decode {
        /// Which payload was being decoded.
        what: &'static str,
        /// Decoder message.
        reason: String,
    },

    /// A request failed at the transport level or returned a non-success
    /// status.
    #[error("request to {url} failed: {reason}")]
    Request {
        /// The endpoint that was called.
        url: String,
        /// Status text or transport error.
        reason: String,
    },
}

impl Error {
    pub(crate) fn decode(what: &'static str, err: &serde_json::Error) -> Self {
        use alloc::string::ToString as _;
        Self::Decode {
            what,
            reason: err.to_string(),
        }
    }
}
