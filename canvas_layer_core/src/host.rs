// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability contract between the layer and its host.
//!
//! The layer never talks to a mapping library or a browser directly. A
//! backend provides three pieces:
//!
//! - **Host map**: Implements [`HostMap`]: viewport size, geographic
//!   reference points, the div-pixel projection, event subscriptions and the
//!   named-pane registry the canvas is mounted into.
//!
//! - **Surface**: Implements [`Surface`] for the drawing element the layer
//!   owns: backing-buffer size, layout size, translation and unmounting.
//!
//! - **Frame scheduler**: Implements [`FrameScheduler`] to request and
//!   cancel a single display-refresh callback. When the frame arrives the
//!   backend calls [`CanvasLayer::on_frame`](crate::layer::CanvasLayer::on_frame).
//!
//! Host events flow the same way: the backend's listener for
//! [`MapEvent::Resize`] calls [`CanvasLayer::resize`] and the one for
//! [`MapEvent::CenterChanged`] calls [`CanvasLayer::reposition`].
//!
//! # Crate boundaries
//!
//! `canvas_layer_core` owns the state machine, the geometry and this
//! contract module. Backend crates depend on it and provide platform glue;
//! test doubles live in `canvas_layer_harness`.
//!
//! [`CanvasLayer::resize`]: crate::layer::CanvasLayer::resize
//! [`CanvasLayer::reposition`]: crate::layer::CanvasLayer::reposition

use core::fmt;

use kurbo::{Point, Size, Vec2};

use crate::error::LayerError;
use crate::geo::{LatLng, LatLngBounds, PixelSize};

/// Host map notifications the layer subscribes to while attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapEvent {
    /// The map's viewport element changed size.
    Resize,
    /// The map center moved (pan or zoom).
    CenterChanged,
}

impl MapEvent {
    /// Returns the host event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resize => "resize",
            Self::CenterChanged => "center_changed",
        }
    }
}

/// Opaque handle for a host event subscription.
///
/// Hosts assign these; the layer only hands them back to
/// [`HostMap::unsubscribe`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerHandle(pub u32);

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListenerHandle({})", self.0)
    }
}

/// Opaque handle for an outstanding frame request.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(pub u32);

impl fmt::Debug for FrameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameHandle({})", self.0)
    }
}

/// The drawing element owned by a layer.
pub trait Surface {
    /// Current backing-buffer dimensions.
    fn buffer_size(&self) -> PixelSize;

    /// Reassigns the backing buffer. Previously drawn content is discarded.
    fn set_buffer_size(&mut self, size: PixelSize);

    /// Sets the element's layout (CSS) size in layout pixels.
    fn set_css_size(&mut self, size: Size);

    /// Translates the element within its pane by whole layout pixels.
    fn set_translation(&mut self, offset: Vec2);

    /// Removes the element from whatever parent currently holds it.
    ///
    /// Must be a no-op when the element has no parent.
    fn unmount(&mut self);
}

/// Services a host mapping library provides to an attached layer.
pub trait HostMap {
    /// The drawing element type this host can mount into its panes.
    type Surface: Surface;

    /// Layout size of the map's viewport element.
    fn viewport_size(&self) -> Size;

    /// Geographic bounds of the visible viewport.
    fn bounds(&self) -> LatLngBounds;

    /// Current map center.
    fn center(&self) -> LatLng;

    /// Current zoom level.
    fn zoom(&self) -> f64;

    /// Projects a coordinate into pixels relative to the draggable map
    /// container.
    fn lat_lng_to_div_pixel(&self, coord: LatLng) -> Point;

    /// Appends `surface` to the pane called `pane`, moving it out of any
    /// previous parent.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::PaneNotFound`] if the host has no such pane. The
    /// surface must be left untouched in that case.
    fn mount(&mut self, pane: &str, surface: &mut Self::Surface) -> Result<(), LayerError>;

    /// Starts delivering `event` notifications to the backend.
    fn subscribe(&mut self, event: MapEvent) -> ListenerHandle;

    /// Stops a subscription made with [`subscribe`](Self::subscribe).
    fn unsubscribe(&mut self, handle: ListenerHandle);
}

/// Requests display-refresh callbacks from the host environment.
///
/// Implementations deliver at most one callback per returned handle and must
/// not deliver it after [`cancel_frame`](Self::cancel_frame).
pub trait FrameScheduler {
    /// Requests one callback on the next display refresh.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancels a request made with [`request_frame`](Self::request_frame).
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names_match_host_library() {
        assert_eq!(MapEvent::Resize.as_str(), "resize");
        assert_eq!(MapEvent::CenterChanged.as_str(), "center_changed");
    }

    #[test]
    fn handles_debug_format() {
        assert_eq!(alloc::format!("{:?}", FrameHandle(7)), "FrameHandle(7)");
        assert_eq!(alloc::format!("{:?}", ListenerHandle(2)), "ListenerHandle(2)");
    }
}
