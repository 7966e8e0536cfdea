// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recorded events.
//!
//! [`export`] turns the events held by a
//! [`RecorderSink`](super::recorder::RecorderSink) into a JSON array of
//! `{ "seq", "name", "args" }` objects, handy for attaching to bug reports.

use std::io::{self, Write};

use serde_json::{Value, json};

use canvas_layer_core::geo::PixelSize;

use crate::recorder::RecordedEvent;

/// Writes `events` as a pretty-printed JSON array.
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let values: Vec<Value> = events
        .iter()
        .enumerate()
        .map(|(seq, event)| {
            json!({
                "seq": seq,
                "name": event.name(),
                "args": args(event),
            })
        })
        .collect();

    serde_json::to_writer_pretty(writer, &values)?;
    Ok(())
}

fn args(event: &RecordedEvent) -> Value {
    match event {
        RecordedEvent::Attached { pane } | RecordedEvent::PaneChanged { pane } => {
            json!({ "pane": pane })
        }
        RecordedEvent::Detached(e) => json!({
            "cancelled_frame": e.cancelled_frame.map(|h| h.0),
        }),
        RecordedEvent::BufferResized(e) => json!({
            "previous": size(e.previous),
            "current": size(e.current),
            "scale": e.scale,
        }),
        RecordedEvent::CssResized(s) => json!({
            "width": s.width,
            "height": s.height,
        }),
        RecordedEvent::Repositioned(e) => json!({
            "top_left": { "lat": e.top_left.lat, "lng": e.top_left.lng },
            "offset": [e.offset.x, e.offset.y],
        }),
        RecordedEvent::FrameRequested(h) | RecordedEvent::FrameCancelled(h) => {
            json!({ "frame": h.0 })
        }
        RecordedEvent::FrameDispatched(e) => json!({
            "resized": e.resized,
            "updated": e.updated,
            "rescheduled": e.rescheduled,
        }),
        RecordedEvent::ConfigurationError(err) => json!({ "message": err.to_string() }),
    }
}

fn size(s: PixelSize) -> Value {
    json!([s.width, s.height])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use canvas_layer_core::host::FrameHandle;
    use canvas_layer_core::trace::{BufferResizeEvent, TraceSink};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_attached("overlayLayer");
        rec.on_buffer_resized(&BufferResizeEvent {
            previous: PixelSize::new(300, 150),
            current: PixelSize::new(1600, 1200),
            scale: 2.0,
        });
        rec.on_frame_requested(FrameHandle(9));

        let mut out = Vec::new();
        export(rec.events(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["name"], "Attached");
        assert_eq!(parsed[0]["args"]["pane"], "overlayLayer");

        assert_eq!(parsed[1]["seq"], 1);
        assert_eq!(parsed[1]["args"]["current"], json!([1600, 1200]));

        assert_eq!(parsed[2]["args"]["frame"], 9);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty());
    }
}
