// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The map-synchronized canvas layer.
//!
//! [`CanvasLayer`] is a two-state machine:
//!
//! | State    | Entered via                    | Exit via          |
//! |----------|--------------------------------|-------------------|
//! | Detached | construction, [`detach`]       | [`attach`]        |
//! | Attached | [`attach`]                     | [`detach`]        |
//!
//! While detached the layer holds no host map, no listeners and no pending
//! frame. While attached it owns the host map handle, keeps two event
//! subscriptions alive and may have at most one frame request outstanding.
//!
//! All redraw work funnels through [`schedule_update`], so any number of
//! resizes and repositions between two display refreshes collapse into one
//! [`on_frame`] dispatch.
//!
//! [`attach`]: CanvasLayer::attach
//! [`detach`]: CanvasLayer::detach
//! [`schedule_update`]: CanvasLayer::schedule_update
//! [`on_frame`]: CanvasLayer::on_frame

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use kurbo::Size;

use crate::error::LayerError;
use crate::geo::{self, LatLng, PixelSize};
use crate::host::{FrameHandle, FrameScheduler, HostMap, ListenerHandle, MapEvent, Surface};
use crate::trace::{
    BufferResizeEvent, DetachedEvent, FrameDispatchEvent, RepositionEvent, TraceSink, Tracer,
};

/// Pane the canvas is mounted into unless configured otherwise.
pub const DEFAULT_PANE_NAME: &str = "overlayLayer";

/// Resolution scale used unless configured otherwise.
pub const DEFAULT_RESOLUTION_SCALE: f64 = 1.0;

/// A user callback invoked from [`CanvasLayer::on_frame`].
pub type FrameHandler<S> = Box<dyn FnMut(&mut FrameContext<'_, S>)>;

/// What a handler sees during a dispatched frame.
pub struct FrameContext<'a, S> {
    surface: &'a mut S,
    buffer_size: PixelSize,
    css_size: Size,
    top_left: Option<LatLng>,
    update_requested: bool,
}

impl<S> FrameContext<'_, S> {
    /// The canvas, for drawing.
    pub fn surface(&mut self) -> &mut S {
        self.surface
    }

    /// Backing-buffer size at dispatch time.
    #[must_use]
    pub fn buffer_size(&self) -> PixelSize {
        self.buffer_size
    }

    /// Layout size at dispatch time.
    #[must_use]
    pub fn css_size(&self) -> Size {
        self.css_size
    }

    /// Geographic coordinate under the canvas's top-left corner.
    #[must_use]
    pub fn top_left(&self) -> Option<LatLng> {
        self.top_left
    }

    /// Asks for another frame once this dispatch returns.
    pub fn request_update(&mut self) {
        self.update_requested = true;
    }
}

impl<S> fmt::Debug for FrameContext<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameContext")
            .field("buffer_size", &self.buffer_size)
            .field("css_size", &self.css_size)
            .field("top_left", &self.top_left)
            .field("update_requested", &self.update_requested)
            .finish_non_exhaustive()
    }
}

/// Construction-time configuration for a [`CanvasLayer`].
///
/// Every field is optional; absent fields keep the layer's defaults.
pub struct LayerOptions<M: HostMap> {
    /// Continuously redraw every frame.
    pub animate: Option<bool>,
    /// Host map to attach to once everything else is applied.
    pub map: Option<M>,
    /// Host pane to mount the canvas into.
    pub pane_name: Option<String>,
    /// Called when the backing buffer changes size.
    pub resize_handler: Option<FrameHandler<M::Surface>>,
    /// Multiplier from layout pixels to backing-buffer pixels.
    pub resolution_scale: Option<f64>,
    /// Called on every dispatched frame.
    pub update_handler: Option<FrameHandler<M::Surface>>,
}

impl<M: HostMap> Default for LayerOptions<M> {
    fn default() -> Self {
        Self {
            animate: None,
            map: None,
            pane_name: None,
            resize_handler: None,
            resolution_scale: None,
            update_handler: None,
        }
    }
}

impl<M: HostMap> LayerOptions<M> {
    /// Sets [`animate`](Self::animate).
    #[must_use]
    pub fn with_animate(mut self, animate: bool) -> Self {
        self.animate = Some(animate);
        self
    }

    /// Sets [`map`](Self::map).
    #[must_use]
    pub fn with_map(mut self, map: M) -> Self {
        self.map = Some(map);
        self
    }

    /// Sets [`pane_name`](Self::pane_name).
    #[must_use]
    pub fn with_pane_name(mut self, pane: impl Into<String>) -> Self {
        self.pane_name = Some(pane.into());
        self
    }

    /// Sets [`resize_handler`](Self::resize_handler).
    #[must_use]
    pub fn with_resize_handler(
        mut self,
        handler: impl FnMut(&mut FrameContext<'_, M::Surface>) + 'static,
    ) -> Self {
        self.resize_handler = Some(Box::new(handler));
        self
    }

    /// Sets [`resolution_scale`](Self::resolution_scale).
    #[must_use]
    pub fn with_resolution_scale(mut self, scale: f64) -> Self {
        self.resolution_scale = Some(scale);
        self
    }

    /// Sets [`update_handler`](Self::update_handler).
    #[must_use]
    pub fn with_update_handler(
        mut self,
        handler: impl FnMut(&mut FrameContext<'_, M::Surface>) + 'static,
    ) -> Self {
        self.update_handler = Some(Box::new(handler));
        self
    }
}

impl<M: HostMap> fmt::Debug for LayerOptions<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerOptions")
            .field("animate", &self.animate)
            .field("map", &self.map.is_some())
            .field("pane_name", &self.pane_name)
            .field("resize_handler", &self.resize_handler.is_some())
            .field("resolution_scale", &self.resolution_scale)
            .field("update_handler", &self.update_handler.is_some())
            .finish()
    }
}

/// A canvas kept in sync with a host map's viewport.
///
/// The layer owns its [`Surface`] for its whole life and drives redraws
/// through an injected [`FrameScheduler`]. The backend forwards host
/// callbacks to it:
///
/// - overlay add/remove → [`attach`](Self::attach) / [`detach`](Self::detach)
/// - overlay draw and [`MapEvent::CenterChanged`] → [`reposition`](Self::reposition)
/// - [`MapEvent::Resize`] → [`resize`](Self::resize)
/// - scheduled frame → [`on_frame`](Self::on_frame)
pub struct CanvasLayer<M: HostMap, F> {
    surface: M::Surface,
    scheduler: F,
    map: Option<M>,
    animated: bool,
    pane_name: String,
    resolution_scale: f64,
    css_size: Size,
    needs_resize: bool,
    top_left: Option<LatLng>,
    pending_frame: Option<FrameHandle>,
    resize_handler: Option<FrameHandler<M::Surface>>,
    update_handler: Option<FrameHandler<M::Surface>>,
    center_listener: Option<ListenerHandle>,
    resize_listener: Option<ListenerHandle>,
    tracer: Tracer,
}

impl<M: HostMap, F: FrameScheduler> CanvasLayer<M, F> {
    /// Creates a detached layer with default configuration.
    #[must_use]
    pub fn new(surface: M::Surface, scheduler: F) -> Self {
        Self {
            surface,
            scheduler,
            map: None,
            animated: false,
            pane_name: String::from(DEFAULT_PANE_NAME),
            resolution_scale: DEFAULT_RESOLUTION_SCALE,
            css_size: Size::ZERO,
            // The first dispatched frame always announces the buffer size.
            needs_resize: true,
            top_left: None,
            pending_frame: None,
            resize_handler: None,
            update_handler: None,
            center_listener: None,
            resize_listener: None,
            tracer: Tracer::none(),
        }
    }

    /// Creates a layer and applies `options`, attaching last if a map is
    /// given.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::InvalidResolutionScale`] for a rejected scale
    /// and [`LayerError::PaneNotFound`] if the map has no such pane.
    pub fn with_options(
        surface: M::Surface,
        scheduler: F,
        options: LayerOptions<M>,
    ) -> Result<Self, LayerError> {
        let mut layer = Self::new(surface, scheduler);
        layer.apply(options)?;
        Ok(layer)
    }

    /// Applies every present field of `options`, attaching last.
    ///
    /// # Errors
    ///
    /// See [`with_options`](Self::with_options). Fields applied before the
    /// failing one stay applied.
    pub fn apply(&mut self, options: LayerOptions<M>) -> Result<(), LayerError> {
        let LayerOptions {
            animate,
            map,
            pane_name,
            resize_handler,
            resolution_scale,
            update_handler,
        } = options;

        if let Some(animate) = animate {
            self.set_animate(animate);
        }
        if let Some(pane) = pane_name {
            self.set_pane_name(pane)?;
        }
        if let Some(handler) = resize_handler {
            self.resize_handler = Some(handler);
        }
        if let Some(scale) = resolution_scale {
            self.set_resolution_scale(scale)?;
        }
        if let Some(handler) = update_handler {
            self.update_handler = Some(handler);
        }
        if let Some(map) = map {
            self.attach(map)?;
        }
        Ok(())
    }

    // -- configuration ------------------------------------------------------

    /// Turns continuous animation on or off.
    ///
    /// Turning it on requests a frame immediately.
    pub fn set_animate(&mut self, animate: bool) {
        self.animated = animate;
        if animate {
            self.schedule_update();
        }
    }

    /// Selects the host pane the canvas lives in.
    ///
    /// While attached the canvas moves to the new pane immediately.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::PaneNotFound`] if attached and the host has no
    /// such pane. The previous pane name and placement are kept.
    pub fn set_pane_name(&mut self, pane: impl Into<String>) -> Result<(), LayerError> {
        let pane = pane.into();
        if let Some(map) = self.map.as_mut() {
            if let Err(err) = map.mount(&pane, &mut self.surface) {
                self.tracer.configuration_error(&err);
                return Err(err);
            }
            self.tracer.pane_changed(&pane);
        }
        self.pane_name = pane;
        Ok(())
    }

    /// Replaces the resize handler. Pass `None` to clear it.
    pub fn set_resize_handler(&mut self, handler: Option<FrameHandler<M::Surface>>) {
        self.resize_handler = handler;
    }

    /// Replaces the update handler. Pass `None` to clear it.
    pub fn set_update_handler(&mut self, handler: Option<FrameHandler<M::Surface>>) {
        self.update_handler = handler;
    }

    /// Sets the layout-to-buffer pixel multiplier and resizes to match.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::InvalidResolutionScale`] unless `scale` is
    /// finite and positive; the previous scale is kept.
    pub fn set_resolution_scale(&mut self, scale: f64) -> Result<(), LayerError> {
        if !scale.is_finite() || scale <= 0.0 {
            let err = LayerError::InvalidResolutionScale(scale);
            self.tracer.configuration_error(&err);
            return Err(err);
        }
        self.resolution_scale = scale;
        self.resize();
        Ok(())
    }

    /// Installs a diagnostics sink.
    ///
    /// Events are only delivered when the `trace` feature is enabled.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.tracer = Tracer::new(sink);
    }

    // -- lifecycle ----------------------------------------------------------

    /// Mounts the canvas into `map` and starts following its viewport.
    ///
    /// Does nothing if already attached; `map` is dropped in that case.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::PaneNotFound`] if `map` has no pane named
    /// [`pane_name`](Self::pane_name). The layer stays detached.
    pub fn attach(&mut self, mut map: M) -> Result<(), LayerError> {
        if self.map.is_some() {
            return Ok(());
        }
        if let Err(err) = map.mount(&self.pane_name, &mut self.surface) {
            self.tracer.configuration_error(&err);
            return Err(err);
        }
        self.resize_listener = Some(map.subscribe(MapEvent::Resize));
        self.center_listener = Some(map.subscribe(MapEvent::CenterChanged));
        self.map = Some(map);
        self.tracer.attached(&self.pane_name);

        self.resize();
        self.reposition();
        Ok(())
    }

    /// Unmounts the canvas, drops the subscriptions and cancels any pending
    /// frame.
    ///
    /// Returns the host map, or `None` if the layer was not attached.
    pub fn detach(&mut self) -> Option<M> {
        let mut map = self.map.take()?;
        self.top_left = None;
        self.surface.unmount();

        if let Some(handle) = self.center_listener.take() {
            map.unsubscribe(handle);
        }
        if let Some(handle) = self.resize_listener.take() {
            map.unsubscribe(handle);
        }
        let cancelled_frame = self.pending_frame.take();
        if let Some(handle) = cancelled_frame {
            self.scheduler.cancel_frame(handle);
            self.tracer.frame_cancelled(handle);
        }

        self.tracer.detached(&DetachedEvent { cancelled_frame });
        Some(map)
    }

    // -- viewport tracking --------------------------------------------------

    /// Matches the canvas to the current viewport size.
    ///
    /// The backing buffer and the layout size are compared separately: they
    /// diverge whenever the resolution scale is not 1. Only a buffer change
    /// needs a redraw.
    pub fn resize(&mut self) {
        let Some(map) = self.map.as_ref() else {
            return;
        };
        let viewport = map.viewport_size();

        let target = PixelSize::scaled(viewport, self.resolution_scale);
        let previous = self.surface.buffer_size();
        if target != previous {
            self.surface.set_buffer_size(target);
            self.needs_resize = true;
            self.tracer.buffer_resized(&BufferResizeEvent {
                previous,
                current: target,
                scale: self.resolution_scale,
            });
            self.schedule_update();
        }

        if viewport != self.css_size {
            self.css_size = viewport;
            self.surface.set_css_size(viewport);
            self.tracer.css_resized(viewport);
        }
    }

    /// Re-anchors the canvas to the viewport after a pan or zoom.
    pub fn reposition(&mut self) {
        let Some(map) = self.map.as_ref() else {
            return;
        };

        let center = map.center();
        let top_left = geo::canvas_top_left(&map.bounds(), center, map.zoom(), self.css_size.width);
        let offset = geo::canvas_offset(map.lat_lng_to_div_pixel(center), self.css_size);

        self.top_left = Some(top_left);
        self.surface.set_translation(offset);
        self.tracer
            .repositioned(&RepositionEvent { top_left, offset });

        self.schedule_update();
    }

    // -- frame scheduling ---------------------------------------------------

    /// Requests a frame unless one is already pending.
    ///
    /// Does nothing while detached.
    pub fn schedule_update(&mut self) {
        if self.map.is_none() || self.pending_frame.is_some() {
            return;
        }
        let handle = self.scheduler.request_frame();
        self.pending_frame = Some(handle);
        self.tracer.frame_requested(handle);
    }

    /// Runs a scheduled frame: resize notification first, then the update.
    ///
    /// The backend calls this when the handle returned by the scheduler
    /// fires.
    pub fn on_frame(&mut self) {
        self.pending_frame = None;
        if self.map.is_none() {
            return;
        }

        if self.animated {
            self.schedule_update();
        }

        let mut cx = FrameContext {
            buffer_size: self.surface.buffer_size(),
            surface: &mut self.surface,
            css_size: self.css_size,
            top_left: self.top_left,
            update_requested: false,
        };

        let resized = self.needs_resize;
        if resized {
            self.needs_resize = false;
            if let Some(handler) = self.resize_handler.as_mut() {
                handler(&mut cx);
            }
        }

        let updated = if let Some(handler) = self.update_handler.as_mut() {
            handler(&mut cx);
            true
        } else {
            false
        };

        if cx.update_requested {
            self.schedule_update();
        }

        self.tracer.frame_dispatched(&FrameDispatchEvent {
            resized,
            updated,
            rescheduled: self.pending_frame.is_some(),
        });
    }

    // -- accessors ----------------------------------------------------------

    /// Returns `true` while mounted in a host map.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.map.is_some()
    }

    /// Returns `true` if every frame schedules the next one.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.animated
    }

    /// The configured pane name.
    #[must_use]
    pub fn pane_name(&self) -> &str {
        &self.pane_name
    }

    /// The layout-to-buffer pixel multiplier.
    #[must_use]
    pub fn resolution_scale(&self) -> f64 {
        self.resolution_scale
    }

    /// Last viewport layout size seen by [`resize`](Self::resize).
    #[must_use]
    pub fn css_size(&self) -> Size {
        self.css_size
    }

    /// Returns `true` if the next frame will notify the resize handler.
    #[must_use]
    pub fn needs_resize(&self) -> bool {
        self.needs_resize
    }

    /// Geographic coordinate under the canvas's top-left corner, computed by
    /// the last reposition. `None` while detached.
    #[must_use]
    pub fn top_left(&self) -> Option<LatLng> {
        self.top_left
    }

    /// The outstanding frame request, if any.
    #[must_use]
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    /// The active event subscriptions as `(resize, center)`.
    #[must_use]
    pub fn listeners(&self) -> (Option<ListenerHandle>, Option<ListenerHandle>) {
        (self.resize_listener, self.center_listener)
    }

    /// The attached host map.
    #[must_use]
    pub fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }

    /// Mutable access to the attached host map.
    pub fn map_mut(&mut self) -> Option<&mut M> {
        self.map.as_mut()
    }

    /// The owned canvas.
    #[must_use]
    pub fn surface(&self) -> &M::Surface {
        &self.surface
    }

    /// Mutable access to the owned canvas.
    pub fn surface_mut(&mut self) -> &mut M::Surface {
        &mut self.surface
    }

    /// The injected frame scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }
}

impl<M: HostMap, F> fmt::Debug for CanvasLayer<M, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasLayer")
            .field("attached", &self.map.is_some())
            .field("animated", &self.animated)
            .field("pane_name", &self.pane_name)
            .field("resolution_scale", &self.resolution_scale)
            .field("css_size", &self.css_size)
            .field("needs_resize", &self.needs_resize)
            .field("top_left", &self.top_left)
            .field("pending_frame", &self.pending_frame)
            .field("tracer", &self.tracer)
            .finish_non_exhaustive()
    }
}
