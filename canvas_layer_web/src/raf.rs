// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` frame scheduler.
//!
//! [`RafScheduler`] implements [`FrameScheduler`] with the browser's
//! `requestAnimationFrame`, or with `setTimeout` at a fixed ~60 Hz cadence in
//! environments that lack it. Which one is used is decided once per process
//! by [`frame_source`].

use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::sync::OnceLock;

use canvas_layer_core::host::{FrameHandle, FrameScheduler};
use js_sys::Reflect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

/// Delay between timeout-driven frames, in milliseconds.
pub const FALLBACK_INTERVAL_MS: i32 = 16;

// Direct global bindings instead of `web_sys::Window` methods, so workers
// and other window-less globals work too.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);

    #[wasm_bindgen(js_name = "setTimeout")]
    fn set_timeout(callback: &JsValue, delay_ms: i32) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    fn clear_timeout(id: i32);
}

/// The host facility frames are requested from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameSource {
    /// `requestAnimationFrame` / `cancelAnimationFrame`.
    AnimationFrame,
    /// `setTimeout` / `clearTimeout` every [`FALLBACK_INTERVAL_MS`].
    Timeout,
}

/// Returns the frame source for this environment.
///
/// The global object is probed for `requestAnimationFrame` on first use.
#[must_use]
pub fn frame_source() -> FrameSource {
    static SOURCE: OnceLock<FrameSource> = OnceLock::new();
    *SOURCE.get_or_init(|| {
        let has_raf = Reflect::has(
            &js_sys::global(),
            &JsValue::from_str("requestAnimationFrame"),
        )
        .unwrap_or(false);
        if has_raf {
            FrameSource::AnimationFrame
        } else {
            FrameSource::Timeout
        }
    })
}

/// A [`FrameScheduler`] backed by browser timers.
///
/// At most one request is outstanding at a time; the layer never asks for
/// more. Dropping the scheduler cancels it.
pub struct RafScheduler {
    inner: Rc<RafInner>,
}

#[derive(Clone, Copy)]
struct Pending {
    handle: FrameHandle,
    id: i32,
}

struct RafInner {
    /// The JS closure registered with the host for every request.
    closure: Closure<dyn FnMut()>,

    source: FrameSource,

    /// The outstanding request, cleared just before the callback runs.
    pending: Cell<Option<Pending>>,

    next_handle: Cell<u32>,
}

impl RafScheduler {
    /// Creates a scheduler that calls `on_frame` for every delivered frame.
    pub fn new(on_frame: impl FnMut() + 'static) -> Self {
        Self::with_source(frame_source(), on_frame)
    }

    /// Creates a scheduler using a specific frame source.
    pub fn with_source(source: FrameSource, mut on_frame: impl FnMut() + 'static) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<RafInner>| {
            let weak = weak.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.pending.set(None);
                }
                on_frame();
            });
            RafInner {
                closure,
                source,
                pending: Cell::new(None),
                next_handle: Cell::new(0),
            }
        });
        Self { inner }
    }

    /// Returns the frame source in use.
    #[must_use]
    pub fn source(&self) -> FrameSource {
        self.inner.source
    }

    /// Returns the outstanding request, if any.
    #[must_use]
    pub fn pending(&self) -> Option<FrameHandle> {
        self.inner.pending.get().map(|p| p.handle)
    }

    fn cancel_pending(&self) {
        if let Some(pending) = self.inner.pending.take() {
            match self.inner.source {
                FrameSource::AnimationFrame => cancel_animation_frame(pending.id),
                FrameSource::Timeout => clear_timeout(pending.id),
            }
        }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        // Replacing an outstanding request keeps delivery at one callback.
        self.cancel_pending();

        let callback = self.inner.closure.as_ref();
        let id = match self.inner.source {
            FrameSource::AnimationFrame => request_animation_frame(callback),
            FrameSource::Timeout => set_timeout(callback, FALLBACK_INTERVAL_MS),
        };
        let handle = FrameHandle(self.inner.next_handle.get());
        self.inner.next_handle.set(handle.0.wrapping_add(1));
        self.inner.pending.set(Some(Pending { handle, id }));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending() == Some(handle) {
            self.cancel_pending();
        }
    }
}

impl Drop for RafScheduler {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

impl core::fmt::Debug for RafScheduler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafScheduler")
            .field("source", &self.inner.source)
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_cadence_is_about_60hz() {
        let hz = 1000 / FALLBACK_INTERVAL_MS;
        assert!((59..=63).contains(&hz), "got {hz} Hz");
    }
}
