// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Google Maps backend for `canvas_layer_core`.
//!
//! This crate wires a [`CanvasLayer`](canvas_layer_core::CanvasLayer) to the
//! browser:
//!
//! - [`WebCanvasLayer`]: registers a `google.maps.OverlayView` and forwards
//!   its callbacks and map events to the layer.
//! - [`GoogleMap`]: [`HostMap`](canvas_layer_core::host::HostMap) over a
//!   `google.maps.Map`.
//! - [`DomCanvas`]: the positioned `<canvas>` element.
//! - [`RafScheduler`]: `requestAnimationFrame` frames, with a `setTimeout`
//!   fallback.
//!
//! With the `trace` feature, `console_sink()` returns a sink that logs
//! layer events to the browser console.
//!
//! ```no_run
//! use canvas_layer_core::LayerOptions;
//! use canvas_layer_web::{GoogleMap, Map, WebCanvasLayer};
//!
//! fn install(map: &Map) -> Result<WebCanvasLayer, wasm_bindgen::JsValue> {
//!     let options = LayerOptions::<GoogleMap>::default()
//!         .with_animate(true)
//!         .with_resolution_scale(2.0)
//!         .with_update_handler(|cx| {
//!             let size = cx.buffer_size();
//!             cx.surface().element().set_title(&format!("{size:?}"));
//!         });
//!     WebCanvasLayer::new(Some(map), options)
//! }
//! ```

mod canvas;
#[cfg(feature = "trace")]
mod console;
mod css;
mod maps;
mod overlay;
mod raf;

pub use canvas::DomCanvas;
#[cfg(feature = "trace")]
pub use console::{ConsoleSink, ConsoleWriter, console_sink};
pub use maps::{GoogleMap, Map};
pub use overlay::{WebCanvasLayer, WebLayer};
pub use raf::{FALLBACK_INTERVAL_MS, FrameSource, RafScheduler, frame_source};
