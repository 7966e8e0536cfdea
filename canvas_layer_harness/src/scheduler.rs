// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use canvas_layer_core::host::{FrameHandle, FrameScheduler};

use crate::FakeLayer;

#[derive(Debug, Default)]
struct State {
    next: u32,
    pending: Vec<FrameHandle>,
    requested: u32,
    cancelled: Vec<FrameHandle>,
}

/// A [`FrameScheduler`] that never fires on its own.
///
/// Clones share state, so a test keeps one clone while the layer owns the
/// other, then calls [`deliver`](Self::deliver) to play the role of the
/// display refresh.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<State>>,
}

impl ManualScheduler {
    /// Creates a scheduler with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that have been neither delivered nor cancelled.
    #[must_use]
    pub fn pending(&self) -> Vec<FrameHandle> {
        self.state.borrow().pending.clone()
    }

    /// Total requests ever made.
    #[must_use]
    pub fn request_count(&self) -> u32 {
        self.state.borrow().requested
    }

    /// Requests cancelled so far, oldest first.
    #[must_use]
    pub fn cancelled(&self) -> Vec<FrameHandle> {
        self.state.borrow().cancelled.clone()
    }

    /// Removes the oldest pending request, as the host does right before it
    /// runs the callback.
    pub fn deliver(&self) -> Option<FrameHandle> {
        let mut state = self.state.borrow_mut();
        if state.pending.is_empty() {
            None
        } else {
            Some(state.pending.remove(0))
        }
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let mut state = self.state.borrow_mut();
        let handle = FrameHandle(state.next);
        state.next += 1;
        state.requested += 1;
        state.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut state = self.state.borrow_mut();
        state.pending.retain(|&h| h != handle);
        state.cancelled.push(handle);
    }
}

/// Delivers up to `max_frames` pending frames to `layer`, one at a time.
///
/// Returns how many frames ran. An animated layer always has another frame
/// pending, so the bound is what stops the loop.
pub fn run_pending(layer: &mut FakeLayer, scheduler: &ManualScheduler, max_frames: usize) -> usize {
    let mut ran = 0;
    while ran < max_frames && scheduler.deliver().is_some() {
        layer.on_frame();
        ran += 1;
    }
    ran
}
