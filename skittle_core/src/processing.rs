// Copyright 2026 the Skittle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Server-side processing trigger and live status log.
//!
//! Starting a session opens a [`StatusChannel`] (an `EventSource` in the
//! browser) and posts a [`ProcessRequest`]. Stream messages from any open
//! channel are rendered into one running log, newest line first. The
//! session's reply decides whether its channel closes: completion and failure
//! close it, anything else leaves it streaming.
//!
//! There is no timeout and no reconnection. A dropped channel simply stops
//! producing messages, and starting a new session never closes an older one.

use alloc::format;
use alloc::string::{String, ToString as _};
use alloc::vec::Vec;

use tracing::{debug, error, info, warn};

use crate::Error;
use crate::api::{ErrorReply, ProcessReply, ProcessRequest, StreamMessage};
use crate::slot::SlotIndex;

/// A server-push channel that can be closed.
pub trait StatusChannel {
    /// Closes the channel; no further messages are delivered.
    fn close(&mut self);
}

/// Kind of a streamed status message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusKind {
    /// A transcribed clip.
    Transcription,
    /// Progress information.
    Info,
    /// A per-clip failure.
    Error,
    /// A kind this client does not render.
    Other(String),
}

impl StatusKind {
    fn from_wire(kind: &str) -> Self {
        match kind {
            "transcription" => Self::Transcription,
            "info" => Self::Info,
            "error" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One streamed status message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessingStatus {
    /// Message kind.
    pub kind: StatusKind,
    /// Clip identifier, empty if the server sent none.
    pub clip: String,
    /// Message text.
    pub text: String,
}

impl ProcessingStatus {
    /// Decodes one stream payload.
    pub fn from_json(data: &str) -> Result<Self, Error> {
        Ok(StreamMessage::from_json(data)?.into())
    }

    /// Returns the log line for this message, or `None` for kinds that are
    /// not rendered.
    #[must_use]
    pub fn line(&self) -> Option<String> {
        match &self.kind {
            StatusKind::Transcription => Some(format!("[{}] {}", self.clip, self.text)),
            StatusKind::Info => Some(format!("INFO: {}", self.text)),
            StatusKind::Error => Some(format!("ERROR: [{}] {}", self.clip, self.text)),
            StatusKind::Other(_) => None,
        }
    }
}

impl From<StreamMessage> for ProcessingStatus {
    fn from(msg: StreamMessage) -> Self {
        Self {
            clip: msg.clip_label(),
            kind: StatusKind::from_wire(&msg.kind),
            text: msg.text.unwrap_or_default(),
        }
    }
}

/// Formatting state for the running status log.
///
/// The rendered lines live in the view; only the last transcription is kept
/// here, for deduplication.
#[derive(Clone, Debug, Default)]
pub struct StatusLog {
    placeholder: String,
}

impl StatusLog {
    /// Returns the last transcription line shown.
    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Applies a status, returning the line to prepend, if any.
    ///
    /// A transcription identical to the previous one is not repeated, but
    /// always becomes the new placeholder.
    pub fn apply(&mut self, status: &ProcessingStatus) -> Option<String> {
        let line = status.line()?;
        if status.kind == StatusKind::Transcription {
            let repeated = self.placeholder == line;
            self.placeholder.clone_from(&line);
            if repeated {
                return None;
            }
        }
        Some(line)
    }
}

/// Style of a per-slot notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    /// Processing finished; replaces the loading indicator.
    Success,
    /// Server accepted the request and is still working; appended.
    Pending,
    /// Processing failed; replaces the loading indicator.
    Danger,
}

/// A notice shown next to a slot's processing trigger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Style.
    pub kind: NoticeKind,
    /// Text.
    pub text: String,
}

/// Presentation surface for processing.
pub trait ProcessingView {
    /// Shows the loading indicator for a slot's group.
    fn show_loading(&mut self, slot: SlotIndex);

    /// Removes the slot's trigger button.
    fn remove_trigger(&mut self, slot: SlotIndex);

    /// Shows a notice in the slot's group. [`NoticeKind::Success`] and
    /// [`NoticeKind::Danger`] also clear the loading indicator.
    fn show_notice(&mut self, slot: SlotIndex, notice: &Notice);

    /// Prepends a line to the status log.
    fn prepend_status(&mut self, line: &str);

    /// Replaces the last-transcription placeholder.
    fn set_placeholder(&mut self, line: &str);
}

/// Identifies one processing session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u32);

#[derive(Debug)]
struct Session<C> {
    id: SessionId,
    slot: SlotIndex,
    video_name: String,
    channel: C,
}

/// Drives processing sessions and the shared status log.
#[derive(Debug)]
pub struct ProcessingController<V, C> {
    view: V,
    log: StatusLog,
    sessions: Vec<Session<C>>,
    next_id: u32,
}

impl<V: ProcessingView, C: StatusChannel> ProcessingController<V, C> {
    /// Creates a controller rendering into `view`.
    #[must_use]
    pub fn new(view: V) -> Self {
        Self {
            view,
            log: StatusLog::default(),
            sessions: Vec::new(),
            next_id: 0,
        }
    }

    /// Returns the view.
    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Returns the status log.
    #[must_use]
    pub fn log(&self) -> &StatusLog {
        &self.log
    }

    /// Returns `true` while the session's channel is open.
    #[must_use]
    pub fn is_open(&self, id: SessionId) -> bool {
        self.sessions.iter().any(|s| s.id == id)
    }

    /// Returns the number of open channels.
    #[must_use]
    pub fn open_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Starts processing `video_name` for `slot` over an already opened
    /// `channel`, returning the session id and the request to post.
    pub fn start(
        &mut self,
        slot: SlotIndex,
        video_name: &str,
        channel: C,
    ) -> (SessionId, ProcessRequest) {
        let id = SessionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        self.view.show_loading(slot);
        self.view.remove_trigger(slot);
        self.sessions.push(Session {
            id,
            slot,
            video_name: video_name.to_string(),
            channel,
        });
        info!(%slot, video = video_name, "processing started");

        (
            id,
            ProcessRequest {
                video_name: video_name.to_string(),
            },
        )
    }

    /// Renders one stream payload.
    ///
    /// Unknown kinds are logged and skipped; undecodable payloads are logged
    /// with the raw data and returned as errors.
    pub fn on_stream_message(&mut self, data: &str) -> Result<(), Error> {
        let status = match ProcessingStatus::from_json(data) {
            Ok(status) => status,
            Err(err) => {
                error!(error = %err, data, "failed to parse status message");
                return Err(err);
            }
        };

        if let StatusKind::Other(kind) = &status.kind {
            warn!(kind = %kind, "unknown status message type");
            return Ok(());
        }

        if let Some(line) = self.log.apply(&status) {
            self.view.prepend_status(&line);
        }
        if status.kind == StatusKind::Transcription {
            self.view.set_placeholder(self.log.placeholder());
        }
        Ok(())
    }

    /// Handles a successful reply to a session's request.
    pub fn on_reply(&mut self, id: SessionId, reply: ProcessReply) {
        let Some(slot) = self.session_slot(id) else {
            debug!(?id, "reply for closed session ignored");
            return;
        };
        if reply.is_completed() {
            self.view.show_notice(
                slot,
                &Notice {
                    kind: NoticeKind::Success,
                    text: reply.message,
                },
            );
            self.close(id);
        } else {
            self.view.show_notice(
                slot,
                &Notice {
                    kind: NoticeKind::Pending,
                    text: reply.message,
                },
            );
        }
    }

    /// Handles a failed request. `body` is the failure response body, empty
    /// for transport errors.
    pub fn on_failure(&mut self, id: SessionId, body: &str) {
        let Some(slot) = self.session_slot(id) else {
            debug!(?id, "failure for closed session ignored");
            return;
        };
        let text = ErrorReply::message_from(body);
        warn!(%slot, error = %text, "processing failed");
        self.view.show_notice(
            slot,
            &Notice {
                kind: NoticeKind::Danger,
                text,
            },
        );
        self.close(id);
    }

    fn session_slot(&self, id: SessionId) -> Option<SlotIndex> {
        self.sessions.iter().find(|s| s.id == id).map(|s| s.slot)
    }

    fn close(&mut self, id: SessionId) {
        if let Some(pos) = self.sessions.iter().position(|s| s.id == id) {
            let mut session = self.sessions.remove(pos);
            session.channel.close();
            info!(slot = %session.slot, video = %session.video_name, "status channel closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;

    #[derive(Debug, Default)]
    struct RecordingView {
        loading: Vec<SlotIndex>,
        triggers_removed: Vec<SlotIndex>,
        notices: Vec<(SlotIndex, Notice)>,
        log: Vec<String>,
        placeholder: String,
    }

    impl ProcessingView for RecordingView {
        fn show_loading(&mut self, slot: SlotIndex) {
            self.loading.push(slot);
        }

        fn remove_trigger(&mut self, slot: SlotIndex) {
            self.triggers_removed.push(slot);
        }

        fn show_notice(&mut self, slot: SlotIndex, notice: &Notice) {
            self.notices.push((slot, notice.clone()));
        }

        fn prepend_status(&mut self, line: &str) {
            self.log.insert(0, line.to_string());
        }

        fn set_placeholder(&mut self, line: &str) {
            self.placeholder = line.to_string();
        }
    }

    #[derive(Debug, Clone, Default)]
    struct FlagChannel(Rc<Cell<bool>>);

    impl StatusChannel for FlagChannel {
        fn close(&mut self) {
            self.0.set(true);
        }
    }

    fn slot(n: u32) -> SlotIndex {
        SlotIndex::new(n).expect("valid slot")
    }

    fn controller() -> ProcessingController<RecordingView, FlagChannel> {
        ProcessingController::new(RecordingView::default())
    }

    #[test]
    fn start_marks_group_and_builds_request() {
        let mut ctl = controller();
        let (id, req) = ctl.start(slot(2), "harbor", FlagChannel::default());
        assert_eq!(req.video_name, "harbor");
        assert_eq!(ctl.view().loading, [slot(2)]);
        assert_eq!(ctl.view().triggers_removed, [slot(2)]);
        assert!(ctl.is_open(id));
    }

    #[test]
    fn message_kinds_render_distinctly() {
        let mut ctl = controller();
        ctl.on_stream_message(r#"{"type":"info","text":"extracting audio"}"#)
            .expect("info");
        ctl.on_stream_message(r#"{"type":"transcription","clip":"harbor-0","text":"hello"}"#)
            .expect("transcription");
        ctl.on_stream_message(r#"{"type":"error","clip":"harbor-1","text":"no audio"}"#)
            .expect("error");

        assert_eq!(
            ctl.view().log,
            [
                "ERROR: [harbor-1] no audio",
                "[harbor-0] hello",
                "INFO: extracting audio",
            ]
        );
        assert_eq!(ctl.view().placeholder, "[harbor-0] hello");
        assert_eq!(ctl.log().placeholder(), "[harbor-0] hello");
    }

    #[test]
    fn repeated_transcription_is_not_duplicated() {
        let mut ctl = controller();
        let msg = r#"{"type":"transcription","clip":3,"text":"same words"}"#;
        ctl.on_stream_message(msg).expect("first");
        ctl.on_stream_message(msg).expect("second");
        assert_eq!(ctl.view().log, ["[3] same words"]);
        assert_eq!(ctl.view().placeholder, "[3] same words");
    }

    #[test]
    fn unknown_kind_is_skipped() {
        let mut ctl = controller();
        ctl.on_stream_message(r#"{"type":"warning","clip":"x","text":"slow"}"#)
            .expect("warning is tolerated");
        assert!(ctl.view().log.is_empty());
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let mut ctl = controller();
        let err = ctl.on_stream_message("not json").expect_err("malformed");
        assert!(matches!(err, Error::Decode { .. }));
        assert!(ctl.view().log.is_empty());
    }

    #[test]
    fn completed_reply_closes_channel() {
        let mut ctl = controller();
        let channel = FlagChannel::default();
        let closed = Rc::clone(&channel.0);
        let (id, _) = ctl.start(slot(1), "harbor", channel);

        ctl.on_reply(
            id,
            ProcessReply {
                status: Some("completed".to_string()),
                message: "done".to_string(),
            },
        );

        assert!(closed.get());
        assert!(!ctl.is_open(id));
        assert_eq!(
            ctl.view().notices,
            [(
                slot(1),
                Notice {
                    kind: NoticeKind::Success,
                    text: "done".to_string(),
                }
            )]
        );
    }

    #[test]
    fn pending_reply_keeps_channel_open() {
        let mut ctl = controller();
        let channel = FlagChannel::default();
        let closed = Rc::clone(&channel.0);
        let (id, _) = ctl.start(slot(3), "forest", channel);

        ctl.on_reply(
            id,
            ProcessReply {
                status: None,
                message: "forest speech processed".to_string(),
            },
        );

        assert!(!closed.get());
        assert!(ctl.is_open(id));
        assert_eq!(ctl.view().notices[0].1.kind, NoticeKind::Pending);
    }

    #[test]
    fn failure_shows_server_error_and_closes() {
        let mut ctl = controller();
        let channel = FlagChannel::default();
        let closed = Rc::clone(&channel.0);
        let (id, _) = ctl.start(slot(2), "city", channel);

        ctl.on_failure(id, r#"{"error":"ffmpeg missing"}"#);

        assert!(closed.get());
        assert_eq!(
            ctl.view().notices[0].1,
            Notice {
                kind: NoticeKind::Danger,
                text: "ffmpeg missing".to_string(),
            }
        );
    }

    #[test]
    fn transport_failure_uses_fallback_text() {
        let mut ctl = controller();
        let (id, _) = ctl.start(slot(2), "city", FlagChannel::default());
        ctl.on_failure(id, "");
        assert_eq!(ctl.view().notices[0].1.text, ErrorReply::FALLBACK);
    }

    #[test]
    fn retrigger_leaves_earlier_channel_open() {
        let mut ctl = controller();
        let first = FlagChannel::default();
        let first_closed = Rc::clone(&first.0);
        let (a, _) = ctl.start(slot(1), "harbor", first);
        let (b, _) = ctl.start(slot(1), "harbor", FlagChannel::default());

        assert_ne!(a, b);
        assert_eq!(ctl.open_sessions(), 2);

        ctl.on_failure(b, "");
        assert!(!first_closed.get());
        assert!(ctl.is_open(a));
    }

    #[test]
    fn late_reply_after_close_is_ignored() {
        let mut ctl = controller();
        let (id, _) = ctl.start(slot(1), "harbor", FlagChannel::default());
        ctl.on_failure(id, "");
        ctl.on_reply(
            id,
            ProcessReply {
                status: Some("completed".to_string()),
                message: "late".to_string(),
            },
        );
        assert_eq!(ctl.view().notices.len(), 1);
    }

    #[test]
    fn status_log_tracks_only_last_transcription() {
        let status = |kind, text: &str| ProcessingStatus {
            kind,
            clip: "7".to_string(),
            text: text.to_string(),
        };
        let mut log = StatusLog::default();

        assert_eq!(
            log.apply(&status(StatusKind::Transcription, "one")),
            Some("[7] one".to_string())
        );
        assert_eq!(log.apply(&status(StatusKind::Transcription, "one")), None);
        assert_eq!(
            log.apply(&status(StatusKind::Info, "halfway")),
            Some("INFO: halfway".to_string())
        );
        assert_eq!(
            log.apply(&status(StatusKind::Other("warning".to_string()), "x")),
            None
        );
        assert_eq!(log.placeholder(), "[7] one");
    }
}
