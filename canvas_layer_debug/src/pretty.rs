// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use canvas_layer_core::LayerError;
use canvas_layer_core::host::FrameHandle;
use canvas_layer_core::trace::{
    BufferResizeEvent, DetachedEvent, FrameDispatchEvent, RepositionEvent, TraceSink,
};
use kurbo::Size;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn flag(set: bool, name: &'static str) -> &'static str {
    if set { name } else { "-" }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_attached(&mut self, pane: &str) {
        let _ = writeln!(self.writer, "[attach] pane={pane}");
    }

    fn on_detached(&mut self, e: &DetachedEvent) {
        match e.cancelled_frame {
            Some(handle) => {
                let _ = writeln!(self.writer, "[detach] cancelled={}", handle.0);
            }
            None => {
                let _ = writeln!(self.writer, "[detach]");
            }
        }
    }

    fn on_pane_changed(&mut self, pane: &str) {
        let _ = writeln!(self.writer, "[pane] pane={pane}");
    }

    fn on_buffer_resized(&mut self, e: &BufferResizeEvent) {
        let _ = writeln!(
            self.writer,
            "[buffer] {}x{} -> {}x{} scale={}",
            e.previous.width, e.previous.height, e.current.width, e.current.height, e.scale,
        );
    }

    fn on_css_resized(&mut self, size: Size) {
        let _ = writeln!(self.writer, "[css] {}x{}", size.width, size.height);
    }

    fn on_repositioned(&mut self, e: &RepositionEvent) {
        let _ = writeln!(
            self.writer,
            "[reposition] top_left={} offset=({}, {})",
            e.top_left, e.offset.x, e.offset.y,
        );
    }

    fn on_frame_requested(&mut self, handle: FrameHandle) {
        let _ = writeln!(self.writer, "[request] frame={}", handle.0);
    }

    fn on_frame_cancelled(&mut self, handle: FrameHandle) {
        let _ = writeln!(self.writer, "[cancel] frame={}", handle.0);
    }

    fn on_frame_dispatched(&mut self, e: &FrameDispatchEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] {} {} {}",
            flag(e.resized, "resized"),
            flag(e.updated, "updated"),
            flag(e.rescheduled, "rescheduled"),
        );
    }

    fn on_configuration_error(&mut self, err: &LayerError) {
        let _ = writeln!(self.writer, "[error] {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_layer_core::geo::LatLng;
    use kurbo::Vec2;

    #[test]
    fn pretty_print_frame() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_dispatched(&FrameDispatchEvent {
            resized: true,
            updated: true,
            rescheduled: false,
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert_eq!(output, "[frame] resized updated -\n");
    }

    #[test]
    fn pretty_print_reposition_and_error() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_repositioned(&RepositionEvent {
            top_left: LatLng::new(1.5, -180.0),
            offset: Vec2::new(-3.0, 4.0),
        });
        sink.on_configuration_error(&LayerError::PaneNotFound {
            pane: "nope".into(),
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert!(output.contains("[reposition]"), "got: {output}");
        assert!(output.contains("offset=(-3, 4)"), "got: {output}");
        assert!(
            output.contains("[error] \"nope\" is not a valid MapPane name."),
            "got: {output}"
        );
    }
}
