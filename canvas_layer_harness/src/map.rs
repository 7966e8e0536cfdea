// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use canvas_layer_core::LayerError;
use canvas_layer_core::geo::{self, LatLng, LatLngBounds};
use canvas_layer_core::host::{HostMap, ListenerHandle, MapEvent};
use kurbo::{Point, Size, Vec2};

use crate::surface::FakeSurface;

/// Pane names every Google-style map provides.
pub const STANDARD_PANES: [&str; 5] = [
    "floatPane",
    "mapPane",
    "markerLayer",
    "overlayLayer",
    "overlayMouseTarget",
];

/// A [`HostMap`] backed by plain fields.
///
/// The projection is linear around the center: one layout pixel covers
/// [`geo::pixels_to_longitude`]`(1.0, zoom)` degrees on both axes. Dragging
/// the map is simulated with [`set_drag_offset`](Self::set_drag_offset),
/// which moves the projected center away from the middle of the viewport.
#[derive(Clone, Debug)]
pub struct FakeMap {
    viewport: Size,
    center: LatLng,
    zoom: f64,
    drag_offset: Vec2,
    panes: Vec<String>,
    listeners: Vec<(ListenerHandle, MapEvent)>,
    next_listener: u32,
    unsubscribed: u32,
}

impl FakeMap {
    /// Creates a map centered on (0, 0) at zoom 0 with the standard panes.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            center: LatLng::default(),
            zoom: 0.0,
            drag_offset: Vec2::ZERO,
            panes: STANDARD_PANES.iter().map(ToString::to_string).collect(),
            listeners: Vec::new(),
            next_listener: 1,
            unsubscribed: 0,
        }
    }

    /// Moves the view.
    #[must_use]
    pub fn with_view(mut self, center: LatLng, zoom: f64) -> Self {
        self.set_view(center, zoom);
        self
    }

    /// Replaces the pane registry.
    #[must_use]
    pub fn with_panes(mut self, panes: &[&str]) -> Self {
        self.panes = panes.iter().map(ToString::to_string).collect();
        self
    }

    /// Resizes the viewport element.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Moves the view.
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
    }

    /// Offsets the draggable container, as a pan in progress would.
    pub fn set_drag_offset(&mut self, offset: Vec2) {
        self.drag_offset = offset;
    }

    /// Currently live subscriptions.
    #[must_use]
    pub fn listeners(&self) -> &[(ListenerHandle, MapEvent)] {
        &self.listeners
    }

    /// Returns `true` if someone listens for `event`.
    #[must_use]
    pub fn is_listening(&self, event: MapEvent) -> bool {
        self.listeners.iter().any(|&(_, e)| e == event)
    }

    /// Total successful unsubscriptions.
    #[must_use]
    pub fn unsubscribe_count(&self) -> u32 {
        self.unsubscribed
    }

    fn degrees_per_pixel(&self) -> f64 {
        geo::pixels_to_longitude(1.0, self.zoom)
    }
}

impl HostMap for FakeMap {
    type Surface = FakeSurface;

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn bounds(&self) -> LatLngBounds {
        let half_w = self.viewport.width / 2.0 * self.degrees_per_pixel();
        let half_h = self.viewport.height / 2.0 * self.degrees_per_pixel();
        LatLngBounds::new(
            LatLng::new(self.center.lat - half_h, self.center.lng - half_w),
            LatLng::new(self.center.lat + half_h, self.center.lng + half_w),
        )
    }

    fn center(&self) -> LatLng {
        self.center
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn lat_lng_to_div_pixel(&self, coord: LatLng) -> Point {
        let dpp = self.degrees_per_pixel();
        Point::new(
            self.viewport.width / 2.0 + (coord.lng - self.center.lng) / dpp,
            self.viewport.height / 2.0 - (coord.lat - self.center.lat) / dpp,
        ) + self.drag_offset
    }

    fn mount(&mut self, pane: &str, surface: &mut FakeSurface) -> Result<(), LayerError> {
        if !self.panes.iter().any(|p| p == pane) {
            return Err(LayerError::PaneNotFound {
                pane: String::from(pane),
            });
        }
        surface.set_parent(pane);
        Ok(())
    }

    fn subscribe(&mut self, event: MapEvent) -> ListenerHandle {
        let handle = ListenerHandle(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((handle, event));
        handle
    }

    fn unsubscribe(&mut self, handle: ListenerHandle) {
        let before = self.listeners.len();
        self.listeners.retain(|&(h, _)| h != handle);
        if self.listeners.len() != before {
            self.unsubscribed += 1;
        }
    }
}
