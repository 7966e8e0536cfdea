// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The Google Maps overlay that drives a [`CanvasLayer`].
//!
//! A plain `google.maps.OverlayView` is created and its `onAdd`, `onRemove`
//! and `draw` hooks are pointed at the layer:
//!
//! | Host callback            | Layer operation                     |
//! |--------------------------|-------------------------------------|
//! | `onAdd`                  | [`CanvasLayer::attach`]             |
//! | `onRemove`               | [`CanvasLayer::detach`]             |
//! | `draw`, `center_changed` | [`CanvasLayer::reposition`]         |
//! | `resize`                 | [`CanvasLayer::resize`]             |
//! | scheduled frame          | [`CanvasLayer::on_frame`]           |
//!
//! Callbacks hold only weak references and skip the call when the layer is
//! already borrowed (a handler re-entering the host).

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use canvas_layer_core::geo::LatLng;
use canvas_layer_core::host::MapEvent;
use canvas_layer_core::{CanvasLayer, LayerError, LayerOptions};
use js_sys::{Function, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};

use crate::canvas::DomCanvas;
use crate::maps::{GoogleMap, Map, OverlayView};
use crate::raf::RafScheduler;

/// The layer type a [`WebCanvasLayer`] drives.
pub type WebLayer = CanvasLayer<GoogleMap, RafScheduler>;

const HOOKS: [&str; 3] = ["onAdd", "onRemove", "draw"];

struct Shared {
    layer: RefCell<WebLayer>,
    overlay: OverlayView,
    dispatch: Rc<dyn Fn(MapEvent)>,
}

/// Runs `f` on the layer behind `weak` unless it is gone or busy.
fn with_weak<R>(weak: &Weak<Shared>, f: impl FnOnce(&mut WebLayer) -> R) -> Option<R> {
    let shared = weak.upgrade()?;
    let mut layer = shared.layer.try_borrow_mut().ok()?;
    Some(f(&mut layer))
}

fn js_error(err: &LayerError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// A canvas layer registered with Google Maps through an `OverlayView`.
///
/// Dropping it detaches the canvas and unregisters the overlay.
pub struct WebCanvasLayer {
    shared: Rc<Shared>,
    _hooks: [Closure<dyn FnMut()>; 3],
}

impl core::fmt::Debug for WebCanvasLayer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebCanvasLayer")
            .field("layer", &self.shared.layer)
            .finish_non_exhaustive()
    }
}

impl WebCanvasLayer {
    /// Creates a layer, applies `options` and, if `map` is given, registers
    /// the overlay with it.
    ///
    /// The canvas is mounted when the map calls the overlay's `onAdd`. An
    /// unknown pane at that point is rethrown as a JS exception.
    ///
    /// # Errors
    ///
    /// Returns a JS error if there is no document, the canvas cannot be
    /// created, or `options` is rejected.
    pub fn new(map: Option<&Map>, options: LayerOptions<GoogleMap>) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let surface = DomCanvas::new(&document)?;
        let overlay = OverlayView::new();

        let shared = Rc::new_cyclic(|weak: &Weak<Shared>| {
            let frame_weak = weak.clone();
            let scheduler = RafScheduler::new(move || {
                with_weak(&frame_weak, WebLayer::on_frame);
            });

            let event_weak = weak.clone();
            let dispatch: Rc<dyn Fn(MapEvent)> = Rc::new(move |event| {
                with_weak(&event_weak, |layer| match event {
                    MapEvent::Resize => layer.resize(),
                    MapEvent::CenterChanged => layer.reposition(),
                });
            });

            Shared {
                layer: RefCell::new(CanvasLayer::new(surface, scheduler)),
                overlay: overlay.clone(),
                dispatch,
            }
        });

        shared
            .layer
            .borrow_mut()
            .apply(options)
            .map_err(|err| js_error(&err))?;

        let hooks = [
            on_add(Rc::downgrade(&shared)),
            Closure::<dyn FnMut()>::new({
                let weak = Rc::downgrade(&shared);
                move || {
                    with_weak(&weak, WebLayer::detach);
                }
            }),
            Closure::<dyn FnMut()>::new({
                let weak = Rc::downgrade(&shared);
                move || {
                    with_weak(&weak, WebLayer::reposition);
                }
            }),
        ];
        for (name, hook) in HOOKS.iter().zip(&hooks) {
            Reflect::set(&overlay, &JsValue::from_str(name), hook.as_ref())?;
        }

        if let Some(map) = map {
            overlay.set_map(Some(map));
        }

        Ok(Self {
            shared,
            _hooks: hooks,
        })
    }

    /// Registers the overlay with `map`, or unregisters it with `None`.
    ///
    /// The host calls back into the layer asynchronously.
    pub fn set_map(&self, map: Option<&Map>) {
        self.shared.overlay.set_map(map);
    }

    /// Top-left coordinate of the canvas, or `None` while detached.
    #[must_use]
    pub fn top_left(&self) -> Option<LatLng> {
        self.shared.layer.try_borrow().ok()?.top_left()
    }

    /// Runs `f` with mutable access to the layer.
    ///
    /// Returns `None` when called from inside one of the layer's own
    /// handlers.
    pub fn with_layer<R>(&self, f: impl FnOnce(&mut WebLayer) -> R) -> Option<R> {
        let mut layer = self.shared.layer.try_borrow_mut().ok()?;
        Some(f(&mut layer))
    }
}

fn on_add(weak: Weak<Shared>) -> Closure<dyn FnMut()> {
    Closure::<dyn FnMut()>::new(move || {
        let result = {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let Ok(map) = shared.overlay.get_map().dyn_into::<Map>() else {
                return;
            };
            let host = GoogleMap::new(map, shared.overlay.clone(), Rc::clone(&shared.dispatch));
            match shared.layer.try_borrow_mut() {
                Ok(mut layer) => layer.attach(host),
                Err(_) => Ok(()),
            }
        };
        // Throwing skips destructors, so every borrow is released above.
        if let Err(err) = result {
            wasm_bindgen::throw_str(&err.to_string());
        }
    })
}

impl Drop for WebCanvasLayer {
    fn drop(&mut self) {
        if let Ok(mut layer) = self.shared.layer.try_borrow_mut() {
            layer.detach();
        }
        let noop = Function::new_no_args("");
        for name in HOOKS {
            let _ = Reflect::set(&self.shared.overlay, &JsValue::from_str(name), &noop);
        }
        self.shared.overlay.set_map(None);
    }
}
