// Copyright 2026 the Skittle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Endpoint paths and wire types.
//!
//! The server owns these schemas; the types here accept what it actually
//! sends, including a couple of shapes that are looser than documented.

use alloc::string::{String, ToString as _};
use alloc::vec::Vec;

use serde::Deserialize;
use serde_json::Value;

use crate::Error;
use crate::slot::SLOT_COUNT;

/// Blob endpoint prefix; the media file name is appended.
pub const MEDIA_PATH: &str = "/api/Video/starter/";
/// Processing trigger.
pub const PROCESS_PATH: &str = "/api/Process";
/// Server-Sent Events status stream.
pub const STREAM_PATH: &str = "/stream";
/// Word search.
pub const SEARCH_PATH: &str = "/api/Words";

/// `POST /api/Process` body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessRequest {
    /// Name of the video to process.
    pub video_name: String,
}

impl ProcessRequest {
    /// Returns the form fields in wire order.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        alloc::vec![("videoName", self.video_name.as_str())]
    }
}

/// `POST /api/Words` body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    /// The raw query text.
    pub query: String,
    /// Current slot titles, in slot order.
    pub titles: [String; SLOT_COUNT],
}

impl SearchRequest {
    /// Returns the form fields in wire order: `word1`, `v1`, `v2`, `v3`.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        alloc::vec![
            ("word1", self.query.as_str()),
            ("v1", self.titles[0].as_str()),
            ("v2", self.titles[1].as_str()),
            ("v3", self.titles[2].as_str()),
        ]
    }
}

/// Successful `POST /api/Process` reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessReply {
    /// `completed` when the server finished synchronously.
    pub status: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl ProcessReply {
    /// Returns `true` if the server reported completion.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status.as_deref() == Some("completed")
    }

    /// Decodes a reply body.
    ///
    /// Accepts `{status, message}` as well as a bare JSON string, which is
    /// treated as a message without a status.
    pub fn from_json(body: &str) -> Result<Self, Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Object {
                #[serde(default)]
                status: Option<String>,
                #[serde(default)]
                message: Option<String>,
            },
            Bare(String),
        }

        match serde_json::from_str(body).map_err(|e| Error::decode("process reply", &e))? {
            Wire::Object { status, message } => Ok(Self {
                status,
                message: message.unwrap_or_default(),
            }),
            Wire::Bare(message) => Ok(Self {
                status: None,
                message,
            }),
        }
    }
}

/// Failure body carried by non-success replies.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorReply {
    /// Server-provided error text.
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorReply {
    /// Fallback text when the server gave none.
    pub const FALLBACK: &'static str = "An error occurred.";

    /// Extracts the error text from a failure body, falling back to
    /// [`FALLBACK`](Self::FALLBACK) when the body is empty or not JSON.
    #[must_use]
    pub fn message_from(body: &str) -> String {
        serde_json::from_str::<Self>(body)
            .ok()
            .and_then(|reply| reply.error)
            .unwrap_or_else(|| Self::FALLBACK.to_string())
    }
}

/// One Server-Sent Events payload.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StreamMessage {
    /// `transcription`, `info`, `error` or something newer.
    #[serde(rename = "type")]
    pub kind: String,
    /// Clip identifier; the server sends strings or numbers.
    #[serde(default)]
    pub clip: Option<Value>,
    /// Message text.
    #[serde(default)]
    pub text: Option<String>,
}

impl StreamMessage {
    /// Decodes one `data:` payload.
    pub fn from_json(data: &str) -> Result<Self, Error> {
        serde_json::from_str(data).map_err(|e| Error::decode("stream message", &e))
    }

    /// Returns the clip id as display text.
    #[must_use]
    pub fn clip_label(&self) -> String {
        match &self.clip {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}
