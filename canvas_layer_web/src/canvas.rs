// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `<canvas>` element a web layer draws into.

use canvas_layer_core::geo::PixelSize;
use canvas_layer_core::host::Surface;
use kurbo::{Size, Vec2};
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{Document, HtmlCanvasElement};

use crate::css;

/// An absolutely positioned, click-through `HtmlCanvasElement`.
///
/// The backing buffer is set through the element's `width`/`height`
/// attributes and the layout size through its inline style, so the two can
/// differ by the layer's resolution scale.
pub struct DomCanvas {
    element: HtmlCanvasElement,
    transform_property: &'static str,
}

impl core::fmt::Debug for DomCanvas {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomCanvas")
            .field("element", &"HtmlCanvasElement")
            .field("transform_property", &self.transform_property)
            .finish()
    }
}

impl DomCanvas {
    /// Creates a new canvas element in `document`.
    ///
    /// # Errors
    ///
    /// Returns the DOM exception if the element cannot be created.
    pub fn new(document: &Document) -> Result<Self, JsValue> {
        let element: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(JsValue::from)?;
        css::apply_canvas_style(&element.style());
        Ok(Self {
            element,
            transform_property: css::transform_property(document),
        })
    }

    /// Returns the underlying element, for obtaining a drawing context.
    #[must_use]
    pub fn element(&self) -> &HtmlCanvasElement {
        &self.element
    }
}

impl Surface for DomCanvas {
    fn buffer_size(&self) -> PixelSize {
        PixelSize::new(self.element.width(), self.element.height())
    }

    fn set_buffer_size(&mut self, size: PixelSize) {
        self.element.set_width(size.width);
        self.element.set_height(size.height);
    }

    fn set_css_size(&mut self, size: Size) {
        let style = self.element.style();
        let _ = style.set_property("width", &css::px(size.width));
        let _ = style.set_property("height", &css::px(size.height));
    }

    fn set_translation(&mut self, offset: Vec2) {
        let _ = self
            .element
            .style()
            .set_property(self.transform_property, &css::translate(offset));
    }

    fn unmount(&mut self) {
        self.element.remove();
    }
}
