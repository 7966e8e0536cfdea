// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic doubles for driving a [`CanvasLayer`] without a browser.
//!
//! - [`FakeMap`]: a [`HostMap`] with a settable viewport, a linear
//!   projection, the standard pane names and a listener registry.
//! - [`FakeSurface`]: a [`Surface`] that records every write.
//! - [`ManualScheduler`]: a [`FrameScheduler`] whose frames only fire when
//!   the test delivers them.
//!
//! [`CanvasLayer`]: canvas_layer_core::CanvasLayer
//! [`HostMap`]: canvas_layer_core::host::HostMap
//! [`Surface`]: canvas_layer_core::host::Surface
//! [`FrameScheduler`]: canvas_layer_core::host::FrameScheduler

#![no_std]

extern crate alloc;

mod map;
mod scheduler;
mod surface;

#[cfg(test)]
mod scenarios;

pub use map::{FakeMap, STANDARD_PANES};
pub use scheduler::{ManualScheduler, run_pending};
pub use surface::FakeSurface;

/// A layer wired to the fakes in this crate.
pub type FakeLayer = canvas_layer_core::CanvasLayer<FakeMap, ManualScheduler>;
