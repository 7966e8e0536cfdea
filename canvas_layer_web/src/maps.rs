// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Google Maps bindings and the [`HostMap`] implementation over them.

use std::rc::Rc;

use canvas_layer_core::LayerError;
use canvas_layer_core::geo::{LatLng, LatLngBounds};
use canvas_layer_core::host::{HostMap, ListenerHandle, MapEvent};
use js_sys::{Function, Reflect};
use kurbo::{Point, Size};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, Node};

use crate::canvas::DomCanvas;

#[wasm_bindgen]
extern "C" {
    /// `google.maps.Map`.
    #[wasm_bindgen(js_namespace = ["google", "maps"], js_name = Map)]
    #[derive(Clone, Debug)]
    pub type Map;

    #[wasm_bindgen(method, js_name = getDiv)]
    fn get_div(this: &Map) -> HtmlElement;

    #[wasm_bindgen(method, js_name = getBounds)]
    fn get_bounds(this: &Map) -> Option<JsLatLngBounds>;

    #[wasm_bindgen(method, js_name = getCenter)]
    fn get_center(this: &Map) -> Option<JsLatLng>;

    #[wasm_bindgen(method, js_name = getZoom)]
    fn get_zoom(this: &Map) -> Option<f64>;

    #[wasm_bindgen(js_namespace = ["google", "maps"], js_name = LatLng)]
    type JsLatLng;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps"], js_class = "LatLng")]
    fn new(lat: f64, lng: f64) -> JsLatLng;

    #[wasm_bindgen(method)]
    fn lat(this: &JsLatLng) -> f64;

    #[wasm_bindgen(method)]
    fn lng(this: &JsLatLng) -> f64;

    #[wasm_bindgen(js_namespace = ["google", "maps"], js_name = LatLngBounds)]
    type JsLatLngBounds;

    #[wasm_bindgen(method, js_name = getNorthEast)]
    fn get_north_east(this: &JsLatLngBounds) -> JsLatLng;

    #[wasm_bindgen(method, js_name = getSouthWest)]
    fn get_south_west(this: &JsLatLngBounds) -> JsLatLng;

    #[wasm_bindgen(js_namespace = ["google", "maps"], js_name = Point)]
    type JsPoint;

    #[wasm_bindgen(method, getter)]
    fn x(this: &JsPoint) -> f64;

    #[wasm_bindgen(method, getter)]
    fn y(this: &JsPoint) -> f64;

    /// `google.maps.OverlayView`.
    #[wasm_bindgen(js_namespace = ["google", "maps"], js_name = OverlayView)]
    #[derive(Clone, Debug)]
    pub(crate) type OverlayView;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps"], js_class = "OverlayView")]
    pub(crate) fn new() -> OverlayView;

    #[wasm_bindgen(method, js_name = getMap)]
    pub(crate) fn get_map(this: &OverlayView) -> JsValue;

    #[wasm_bindgen(method, js_name = setMap)]
    pub(crate) fn set_map(this: &OverlayView, map: Option<&Map>);

    #[wasm_bindgen(method, js_name = getPanes)]
    fn get_panes(this: &OverlayView) -> Option<js_sys::Object>;

    #[wasm_bindgen(method, js_name = getProjection)]
    fn get_projection(this: &OverlayView) -> Option<MapCanvasProjection>;

    type MapCanvasProjection;

    #[wasm_bindgen(method, js_name = fromLatLngToDivPixel)]
    fn from_lat_lng_to_div_pixel(this: &MapCanvasProjection, coord: &JsLatLng) -> Option<JsPoint>;

    type MapsEventListener;

    #[wasm_bindgen(method)]
    fn remove(this: &MapsEventListener);

    #[wasm_bindgen(js_namespace = ["google", "maps", "event"], js_name = addListener)]
    fn add_listener(instance: &Map, event: &str, handler: &Function) -> MapsEventListener;
}

fn to_lat_lng(value: &JsLatLng) -> LatLng {
    LatLng::new(value.lat(), value.lng())
}

struct Subscription {
    handle: ListenerHandle,
    listener: MapsEventListener,
    _closure: Closure<dyn FnMut()>,
}

/// A Google Maps `Map` seen through the overlay a layer is registered with.
///
/// Created by [`WebCanvasLayer`](crate::WebCanvasLayer) when the overlay is
/// added to a map. Event notifications are routed to the owning layer.
pub struct GoogleMap {
    map: Map,
    overlay: OverlayView,
    dispatch: Rc<dyn Fn(MapEvent)>,
    subscriptions: Vec<Subscription>,
    next_listener: u32,
}

impl core::fmt::Debug for GoogleMap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GoogleMap")
            .field("map", &self.map)
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}

impl GoogleMap {
    pub(crate) fn new(map: Map, overlay: OverlayView, dispatch: Rc<dyn Fn(MapEvent)>) -> Self {
        Self {
            map,
            overlay,
            dispatch,
            subscriptions: Vec::new(),
            next_listener: 0,
        }
    }

    /// Returns the underlying `google.maps.Map`.
    #[must_use]
    pub fn map(&self) -> &Map {
        &self.map
    }
}

impl HostMap for GoogleMap {
    type Surface = DomCanvas;

    fn viewport_size(&self) -> Size {
        let div = self.map.get_div();
        Size::new(f64::from(div.offset_width()), f64::from(div.offset_height()))
    }

    fn bounds(&self) -> LatLngBounds {
        match self.map.get_bounds() {
            Some(bounds) => LatLngBounds::new(
                to_lat_lng(&bounds.get_south_west()),
                to_lat_lng(&bounds.get_north_east()),
            ),
            // Not yet laid out: collapse onto the center.
            None => {
                let center = self.center();
                LatLngBounds::new(center, center)
            }
        }
    }

    fn center(&self) -> LatLng {
        self.map
            .get_center()
            .map_or(LatLng::new(0.0, 0.0), |c| to_lat_lng(&c))
    }

    fn zoom(&self) -> f64 {
        self.map.get_zoom().unwrap_or(0.0)
    }

    fn lat_lng_to_div_pixel(&self, coord: LatLng) -> Point {
        self.overlay
            .get_projection()
            .and_then(|p| p.from_lat_lng_to_div_pixel(&JsLatLng::new(coord.lat, coord.lng)))
            .map_or(Point::ORIGIN, |p| Point::new(p.x(), p.y()))
    }

    fn mount(&mut self, pane: &str, surface: &mut DomCanvas) -> Result<(), LayerError> {
        let not_found = || LayerError::PaneNotFound {
            pane: pane.to_owned(),
        };
        let panes = self.overlay.get_panes().ok_or_else(not_found)?;
        let node: Node = Reflect::get(&panes, &JsValue::from_str(pane))
            .ok()
            .and_then(|value| value.dyn_into().ok())
            .ok_or_else(not_found)?;
        node.append_child(surface.element())
            .map(drop)
            .map_err(|_| not_found())
    }

    fn subscribe(&mut self, event: MapEvent) -> ListenerHandle {
        let handle = ListenerHandle(self.next_listener);
        self.next_listener += 1;

        let dispatch = Rc::clone(&self.dispatch);
        let closure = Closure::<dyn FnMut()>::new(move || dispatch(event));
        let listener = add_listener(&self.map, event.as_str(), closure.as_ref().unchecked_ref());
        self.subscriptions.push(Subscription {
            handle,
            listener,
            _closure: closure,
        });
        handle
    }

    fn unsubscribe(&mut self, handle: ListenerHandle) {
        if let Some(idx) = self.subscriptions.iter().position(|s| s.handle == handle) {
            self.subscriptions.swap_remove(idx).listener.remove();
        }
    }
}

impl Drop for GoogleMap {
    fn drop(&mut self) {
        for sub in self.subscriptions.drain(..) {
            sub.listener.remove();
        }
    }
}
