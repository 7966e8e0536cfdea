// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps every event as an
//! owned [`RecordedEvent`] for later inspection or export.

use canvas_layer_core::LayerError;
use canvas_layer_core::host::FrameHandle;
use canvas_layer_core::trace::{
    BufferResizeEvent, DetachedEvent, FrameDispatchEvent, RepositionEvent, TraceSink,
};
use kurbo::Size;

/// One recorded trace event.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// See [`TraceSink::on_attached`].
    Attached {
        /// Pane the canvas was mounted into.
        pane: String,
    },
    /// See [`TraceSink::on_detached`].
    Detached(DetachedEvent),
    /// See [`TraceSink::on_pane_changed`].
    PaneChanged {
        /// Pane the canvas moved into.
        pane: String,
    },
    /// See [`TraceSink::on_buffer_resized`].
    BufferResized(BufferResizeEvent),
    /// See [`TraceSink::on_css_resized`].
    CssResized(Size),
    /// See [`TraceSink::on_repositioned`].
    Repositioned(RepositionEvent),
    /// See [`TraceSink::on_frame_requested`].
    FrameRequested(FrameHandle),
    /// See [`TraceSink::on_frame_cancelled`].
    FrameCancelled(FrameHandle),
    /// See [`TraceSink::on_frame_dispatched`].
    FrameDispatched(FrameDispatchEvent),
    /// See [`TraceSink::on_configuration_error`].
    ConfigurationError(LayerError),
}

impl RecordedEvent {
    /// Short event name used by the exporters.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Attached { .. } => "Attached",
            Self::Detached(_) => "Detached",
            Self::PaneChanged { .. } => "PaneChanged",
            Self::BufferResized(_) => "BufferResized",
            Self::CssResized(_) => "CssResized",
            Self::Repositioned(_) => "Repositioned",
            Self::FrameRequested(_) => "FrameRequested",
            Self::FrameCancelled(_) => "FrameCancelled",
            Self::FrameDispatched(_) => "FrameDispatched",
            Self::ConfigurationError(_) => "ConfigurationError",
        }
    }
}

/// A [`TraceSink`] that appends every event to a `Vec`.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Number of frames dispatched so far.
    #[must_use]
    pub fn dispatched_frames(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, RecordedEvent::FrameDispatched(_)))
            .count()
    }
}

impl TraceSink for RecorderSink {
    fn on_attached(&mut self, pane: &str) {
        self.events.push(RecordedEvent::Attached {
            pane: pane.to_owned(),
        });
    }

    fn on_detached(&mut self, e: &DetachedEvent) {
        self.events.push(RecordedEvent::Detached(*e));
    }

    fn on_pane_changed(&mut self, pane: &str) {
        self.events.push(RecordedEvent::PaneChanged {
            pane: pane.to_owned(),
        });
    }

    fn on_buffer_resized(&mut self, e: &BufferResizeEvent) {
        self.events.push(RecordedEvent::BufferResized(*e));
    }

    fn on_css_resized(&mut self, size: Size) {
        self.events.push(RecordedEvent::CssResized(size));
    }

    fn on_repositioned(&mut self, e: &RepositionEvent) {
        self.events.push(RecordedEvent::Repositioned(*e));
    }

    fn on_frame_requested(&mut self, handle: FrameHandle) {
        self.events.push(RecordedEvent::FrameRequested(handle));
    }

    fn on_frame_cancelled(&mut self, handle: FrameHandle) {
        self.events.push(RecordedEvent::FrameCancelled(handle));
    }

    fn on_frame_dispatched(&mut self, e: &FrameDispatchEvent) {
        self.events.push(RecordedEvent::FrameDispatched(*e));
    }

    fn on_configuration_error(&mut self, err: &LayerError) {
        self.events
            .push(RecordedEvent::ConfigurationError(err.clone()));
    }
}
