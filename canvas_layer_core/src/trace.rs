// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the layer lifecycle.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! layer calls as it attaches, resizes, repositions and dispatches frames.
//! All method bodies default to no-ops, so implementing only the events you
//! care about is fine.
//!
//! [`Tracer`] owns an optional boxed sink. When the `trace` feature is
//! **off**, every `Tracer` method compiles to nothing and installed sinks are
//! dropped immediately. When **on**, each method performs a single `Option`
//! branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;

use kurbo::{Size, Vec2};

use crate::error::LayerError;
use crate::geo::{LatLng, PixelSize};
use crate::host::FrameHandle;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the layer leaves the attached state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetachedEvent {
    /// The frame request cancelled by the detach, if one was pending.
    pub cancelled_frame: Option<FrameHandle>,
}

/// Emitted when the backing buffer is reassigned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BufferResizeEvent {
    /// Buffer size before the change.
    pub previous: PixelSize,
    /// Buffer size after the change.
    pub current: PixelSize,
    /// Resolution scale used for the computation.
    pub scale: f64,
}

/// Emitted after the canvas is re-anchored to the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RepositionEvent {
    /// Geographic coordinate under the canvas's top-left corner.
    pub top_left: LatLng,
    /// CSS translation applied to the canvas.
    pub offset: Vec2,
}

/// Emitted at the end of each dispatched frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameDispatchEvent {
    /// The resize handler was notified in this frame.
    pub resized: bool,
    /// The update handler ran in this frame.
    pub updated: bool,
    /// Another frame was requested before the dispatch returned.
    pub rescheduled: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from a layer.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after the canvas is mounted and listeners are live.
    fn on_attached(&mut self, pane: &str) {
        _ = pane;
    }

    /// Called after listeners are torn down and scheduling is cancelled.
    fn on_detached(&mut self, e: &DetachedEvent) {
        _ = e;
    }

    /// Called when the canvas moves to a different pane while attached.
    fn on_pane_changed(&mut self, pane: &str) {
        _ = pane;
    }

    /// Called when the backing buffer is reassigned.
    fn on_buffer_resized(&mut self, e: &BufferResizeEvent) {
        _ = e;
    }

    /// Called when the canvas layout size follows the viewport.
    fn on_css_resized(&mut self, size: Size) {
        _ = size;
    }

    /// Called after each reposition.
    fn on_repositioned(&mut self, e: &RepositionEvent) {
        _ = e;
    }

    /// Called when a frame is requested from the scheduler.
    fn on_frame_requested(&mut self, handle: FrameHandle) {
        _ = handle;
    }

    /// Called when a pending frame request is cancelled.
    fn on_frame_cancelled(&mut self, handle: FrameHandle) {
        _ = handle;
    }

    /// Called at the end of each dispatched frame.
    fn on_frame_dispatched(&mut self, e: &FrameDispatchEvent) {
        _ = e;
    }

    /// Called when a configuration call is rejected.
    fn on_configuration_error(&mut self, err: &LayerError) {
        _ = err;
    }
}

impl<T: TraceSink + ?Sized> TraceSink for Rc<RefCell<T>> {
    fn on_attached(&mut self, pane: &str) {
        self.borrow_mut().on_attached(pane);
    }

    fn on_detached(&mut self, e: &DetachedEvent) {
        self.borrow_mut().on_detached(e);
    }

    fn on_pane_changed(&mut self, pane: &str) {
        self.borrow_mut().on_pane_changed(pane);
    }

    fn on_buffer_resized(&mut self, e: &BufferResizeEvent) {
        self.borrow_mut().on_buffer_resized(e);
    }

    fn on_css_resized(&mut self, size: Size) {
        self.borrow_mut().on_css_resized(size);
    }

    fn on_repositioned(&mut self, e: &RepositionEvent) {
        self.borrow_mut().on_repositioned(e);
    }

    fn on_frame_requested(&mut self, handle: FrameHandle) {
        self.borrow_mut().on_frame_requested(handle);
    }

    fn on_frame_cancelled(&mut self, handle: FrameHandle) {
        self.borrow_mut().on_frame_cancelled(handle);
    }

    fn on_frame_dispatched(&mut self, e: &FrameDispatchEvent) {
        self.borrow_mut().on_frame_dispatched(e);
    }

    fn on_configuration_error(&mut self, err: &LayerError) {
        self.borrow_mut().on_configuration_error(err);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Owning wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            drop(sink);
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns `true` if events reach a sink.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    /// Emits an attach.
    #[inline]
    pub fn attached(&mut self, pane: &str) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_attached(pane);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = pane;
        }
    }

    /// Emits a [`DetachedEvent`].
    #[inline]
    pub fn detached(&mut self, e: &DetachedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_detached(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a pane change.
    #[inline]
    pub fn pane_changed(&mut self, pane: &str) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pane_changed(pane);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = pane;
        }
    }

    /// Emits a [`BufferResizeEvent`].
    #[inline]
    pub fn buffer_resized(&mut self, e: &BufferResizeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_buffer_resized(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a layout resize.
    #[inline]
    pub fn css_resized(&mut self, size: Size) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_css_resized(size);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = size;
        }
    }

    /// Emits a [`RepositionEvent`].
    #[inline]
    pub fn repositioned(&mut self, e: &RepositionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_repositioned(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a frame request.
    #[inline]
    pub fn frame_requested(&mut self, handle: FrameHandle) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_requested(handle);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = handle;
        }
    }

    /// Emits a frame cancellation.
    #[inline]
    pub fn frame_cancelled(&mut self, handle: FrameHandle) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_cancelled(handle);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = handle;
        }
    }

    /// Emits a [`FrameDispatchEvent`].
    #[inline]
    pub fn frame_dispatched(&mut self, e: &FrameDispatchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_dispatched(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a rejected configuration call.
    #[inline]
    pub fn configuration_error(&mut self, err: &LayerError) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_configuration_error(err);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = err;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
