// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A canvas kept geometrically and temporally in sync with a host map.
//!
//! `canvas_layer_core` holds everything that does not touch a real map or a
//! real browser. It is `no_std` compatible (with `alloc`), and every platform
//! service reaches it through a small trait so the whole state machine can be
//! driven deterministically in tests.
//!
//! # Architecture
//!
//! ```text
//!   Host map (add / remove / draw, resize, center_changed)
//!       │
//!       ▼
//!   CanvasLayer::attach / detach / resize / reposition
//!       │                    │
//!       │                    └──► Surface (buffer size, css size, translate)
//!       ▼
//!   schedule_update ──► FrameScheduler::request_frame
//!                                 │
//!                 ┌───────────────┘
//!                 ▼
//!   CanvasLayer::on_frame ──► resize handler ──► update handler
//! ```
//!
//! **[`layer`]**: [`CanvasLayer`](layer::CanvasLayer), its options record
//! and the frame context handed to user handlers.
//!
//! **[`host`]**: The [`HostMap`](host::HostMap),
//! [`Surface`](host::Surface) and [`FrameScheduler`](host::FrameScheduler)
//! traits backends implement.
//!
//! **[`geo`]**: Coordinates plus the top-left and CSS offset computations.
//!
//! **[`error`]**: [`LayerError`](error::LayerError) configuration errors.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! lifecycle instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod error;
pub mod geo;
pub mod host;
pub mod layer;
pub mod trace;

pub use error::LayerError;
pub use layer::{CanvasLayer, FrameContext, LayerOptions};
