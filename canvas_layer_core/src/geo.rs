// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geographic coordinates and the canvas placement math.
//!
//! The host map works in two coordinate systems: geographic [`LatLng`]
//! values and layout pixels relative to the map's draggable container
//! ("div pixels"). The canvas is positioned in div pixels but its content is
//! anchored to a geographic top-left corner, so both conversions live here.
//!
//! Pixel-space values reuse [`kurbo`] types: [`Size`] for layout dimensions,
//! [`Point`] for projected positions and [`Vec2`] for the CSS translation.
//! Backing-buffer dimensions are integral and use [`PixelSize`].

use core::fmt;

use kurbo::{Point, Size, Vec2};

/// Edge length of a Web Mercator tile in pixels at zoom level 0.
pub const TILE_SIZE: f64 = 256.0;

/// A geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct LatLng {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lng: f64,
}

impl LatLng {
    /// Creates a coordinate from latitude and longitude in degrees.
    #[inline]
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// The geographic rectangle currently visible in the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct LatLngBounds {
    /// South-west corner.
    pub south_west: LatLng,
    /// North-east corner.
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// Creates bounds from the south-west and north-east corners.
    #[inline]
    #[must_use]
    pub const fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }
}

/// Integral dimensions of a canvas backing buffer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelSize {
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
}

impl PixelSize {
    /// Zero-sized buffer.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a size from width and height.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Scales a layout size into backing-buffer pixels.
    ///
    /// Fractional results are truncated, matching how a canvas element
    /// stores an assigned `width`/`height`. Negative and non-finite inputs
    /// clamp to zero.
    #[must_use]
    pub fn scaled(layout: Size, scale: f64) -> Self {
        Self {
            width: truncate_to_u32(layout.width * scale),
            height: truncate_to_u32(layout.height * scale),
        }
    }
}

impl fmt::Debug for PixelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is truncated and clamped into u32 range first"
)]
fn truncate_to_u32(v: f64) -> u32 {
    if !v.is_finite() || v <= 0.0 {
        return 0;
    }
    libm::trunc(v).min(f64::from(u32::MAX)) as u32
}

/// Degrees of longitude covered by `pixels` layout pixels at `zoom`.
///
/// At zoom 0 the whole world (360°) spans one [`TILE_SIZE`] tile, and each
/// zoom level doubles the pixel width of the world.
#[must_use]
pub fn pixels_to_longitude(pixels: f64, zoom: f64) -> f64 {
    pixels * 360.0 / (TILE_SIZE * libm::exp2(zoom))
}

/// Computes the geographic coordinate under the canvas's top-left corner.
///
/// The latitude is taken straight from the north-east bound. The longitude
/// is offset west from the map center by half the canvas width, which keeps
/// it aligned with the tile grid even when the bounds wrap the antimeridian.
#[must_use]
pub fn canvas_top_left(bounds: &LatLngBounds, center: LatLng, zoom: f64, css_width: f64) -> LatLng {
    LatLng {
        lat: bounds.north_east.lat,
        lng: center.lng - pixels_to_longitude(css_width / 2.0, zoom),
    }
}

/// Computes the CSS translation that centers a canvas of `css_size` on the
/// projected map center.
///
/// Components are whole pixels, rounded half toward positive infinity so
/// sub-pixel drift never accumulates between repositions.
#[must_use]
pub fn canvas_offset(projected_center: Point, css_size: Size) -> Vec2 {
    // `+ 0.0` folds the negated zero back into positive zero.
    Vec2::new(
        -round_half_up(css_size.width / 2.0 - projected_center.x) + 0.0,
        -round_half_up(css_size.height / 2.0 - projected_center.y) + 0.0,
    )
}

fn round_half_up(v: f64) -> f64 {
    libm::floor(v + 0.5)
}
