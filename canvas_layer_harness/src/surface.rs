// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use canvas_layer_core::geo::PixelSize;
use canvas_layer_core::host::Surface;
use kurbo::{Size, Vec2};

/// Backing-buffer size of a freshly created HTML canvas.
const INITIAL_BUFFER: PixelSize = PixelSize::new(300, 150);

/// A [`Surface`] that stores its state in plain fields.
#[derive(Clone, Debug, PartialEq)]
pub struct FakeSurface {
    buffer: PixelSize,
    css_size: Option<Size>,
    translation: Vec2,
    parent: Option<String>,
    buffer_writes: u32,
    /// Free-form counter for handlers that "draw".
    pub draw_calls: u32,
}

impl Default for FakeSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSurface {
    /// Creates an unmounted surface with the HTML canvas default buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: INITIAL_BUFFER,
            css_size: None,
            translation: Vec2::ZERO,
            parent: None,
            buffer_writes: 0,
            draw_calls: 0,
        }
    }

    /// Layout size last written, if any.
    #[must_use]
    pub fn css_size(&self) -> Option<Size> {
        self.css_size
    }

    /// Translation last written.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    /// Pane currently holding the surface.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Number of backing-buffer reassignments.
    #[must_use]
    pub fn buffer_writes(&self) -> u32 {
        self.buffer_writes
    }

    pub(crate) fn set_parent(&mut self, pane: &str) {
        self.parent = Some(String::from(pane));
    }
}

impl Surface for FakeSurface {
    fn buffer_size(&self) -> PixelSize {
        self.buffer
    }

    fn set_buffer_size(&mut self, size: PixelSize) {
        self.buffer = size;
        self.buffer_writes += 1;
    }

    fn set_css_size(&mut self, size: Size) {
        self.css_size = Some(size);
    }

    fn set_translation(&mut self, offset: Vec2) {
        self.translation = offset;
    }

    fn unmount(&mut self) {
        self.parent = None;
    }
}
