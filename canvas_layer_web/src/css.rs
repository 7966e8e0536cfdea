// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style helpers for the canvas element.

use std::sync::OnceLock;

use js_sys::Reflect;
use kurbo::Vec2;
use wasm_bindgen::JsValue;
use web_sys::{CssStyleDeclaration, Document};

/// Transform property candidates as `(style object key, CSS property name)`,
/// unprefixed first.
pub(crate) const TRANSFORM_PROPERTIES: [(&str, &str); 5] = [
    ("transform", "transform"),
    ("WebkitTransform", "-webkit-transform"),
    ("MozTransform", "-moz-transform"),
    ("msTransform", "-ms-transform"),
    ("OTransform", "-o-transform"),
];

/// Returns the CSS transform property this browser understands.
///
/// Probed once against a scratch element; later calls reuse the answer.
pub(crate) fn transform_property(document: &Document) -> &'static str {
    static PROPERTY: OnceLock<&'static str> = OnceLock::new();
    PROPERTY.get_or_init(|| {
        let style = document
            .create_element("div")
            .ok()
            .and_then(|el| Reflect::get(&el, &JsValue::from_str("style")).ok());
        let supported = |key: &str| {
            style
                .as_ref()
                .is_some_and(|s| Reflect::has(s, &JsValue::from_str(key)).unwrap_or(false))
        };
        pick_transform_property(supported)
    })
}

/// Chooses the first candidate `supported` accepts, or the unprefixed name.
pub(crate) fn pick_transform_property(mut supported: impl FnMut(&str) -> bool) -> &'static str {
    TRANSFORM_PROPERTIES
        .iter()
        .find(|(key, _)| supported(key))
        .map_or(TRANSFORM_PROPERTIES[0].1, |&(_, css)| css)
}

/// Formats a whole-pixel translation as a CSS transform value.
pub(crate) fn translate(offset: Vec2) -> String {
    format!("translate({}px,{}px)", offset.x, offset.y)
}

/// Formats a layout length in CSS pixels.
pub(crate) fn px(value: f64) -> String {
    format!("{value}px")
}

/// Applies the fixed overlay styles every layer canvas starts with.
pub(crate) fn apply_canvas_style(style: &CssStyleDeclaration) {
    let _ = style.set_property("position", "absolute");
    let _ = style.set_property("top", "0");
    let _ = style.set_property("left", "0");
    let _ = style.set_property("pointer-events", "none");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_formats_whole_pixels() {
        assert_eq!(translate(Vec2::new(30.0, 12.0)), "translate(30px,12px)");
        assert_eq!(translate(Vec2::new(-30.0, -13.0)), "translate(-30px,-13px)");
        assert_eq!(translate(Vec2::ZERO), "translate(0px,0px)");
    }

    #[test]
    fn px_formats_lengths() {
        assert_eq!(px(800.0), "800px");
        assert_eq!(px(312.5), "312.5px");
    }

    #[test]
    fn unprefixed_transform_wins() {
        assert_eq!(pick_transform_property(|_| true), "transform");
    }

    #[test]
    fn prefixed_transform_is_used_when_alone() {
        assert_eq!(
            pick_transform_property(|key| key == "msTransform"),
            "-ms-transform"
        );
        assert_eq!(
            pick_transform_property(|key| key.starts_with("Webkit")),
            "-webkit-transform"
        );
    }

    #[test]
    fn falls_back_to_unprefixed_name() {
        assert_eq!(pick_transform_property(|_| false), "transform");
    }
}
