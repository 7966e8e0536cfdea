// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end lifecycle scenarios against the fakes.

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;

use canvas_layer_core::geo::{LatLng, PixelSize};
use canvas_layer_core::host::{FrameHandle, MapEvent, Surface as _};
use canvas_layer_core::layer::DEFAULT_PANE_NAME;
use canvas_layer_core::{FrameContext, LayerError, LayerOptions};
use canvas_layer_debug::recorder::{RecordedEvent, RecorderSink};
use kurbo::{Size, Vec2};

use crate::{FakeLayer, FakeMap, FakeSurface, ManualScheduler, run_pending};

type Log = Rc<RefCell<Vec<String>>>;

fn detached() -> (FakeLayer, ManualScheduler) {
    let scheduler = ManualScheduler::new();
    let layer = FakeLayer::new(FakeSurface::new(), scheduler.clone());
    (layer, scheduler)
}

fn attached(viewport: Size) -> (FakeLayer, ManualScheduler) {
    let (mut layer, scheduler) = detached();
    layer.attach(FakeMap::new(viewport)).unwrap();
    (layer, scheduler)
}

/// Installs handlers that append `"resize WxH"` / `"update"` to the log.
fn log_handlers(layer: &mut FakeLayer) -> Log {
    let log = Log::default();
    let resize_log = Rc::clone(&log);
    layer.set_resize_handler(Some(Box::new(move |cx: &mut FrameContext<'_, FakeSurface>| {
        let size = cx.buffer_size();
        resize_log
            .borrow_mut()
            .push(format!("resize {}x{}", size.width, size.height));
    })));
    let update_log = Rc::clone(&log);
    layer.set_update_handler(Some(Box::new(move |cx: &mut FrameContext<'_, FakeSurface>| {
        cx.surface().draw_calls += 1;
        update_log.borrow_mut().push(String::from("update"));
    })));
    log
}

// -- lifecycle --------------------------------------------------------------

#[test]
fn attach_and_detach_are_idempotent() {
    let (mut layer, _scheduler) = detached();
    assert!(!layer.is_attached());
    assert!(layer.detach().is_none());

    layer.attach(FakeMap::new(Size::new(100.0, 100.0))).unwrap();
    assert!(layer.is_attached());
    let listeners = layer.listeners();

    // A second attach keeps the first map and its subscriptions.
    layer
        .attach(FakeMap::new(Size::new(5.0, 5.0)).with_panes(&[]))
        .unwrap();
    assert!(layer.is_attached());
    assert_eq!(layer.listeners(), listeners);
    assert_eq!(layer.css_size(), Size::new(100.0, 100.0));

    assert!(layer.detach().is_some());
    assert!(!layer.is_attached());
    assert!(layer.detach().is_none());
    assert!(!layer.is_attached());
}

#[test]
fn attach_mounts_subscribes_and_positions() {
    let (layer, scheduler) = attached(Size::new(800.0, 600.0));

    assert_eq!(layer.surface().parent(), Some(DEFAULT_PANE_NAME));
    let map = layer.map().unwrap();
    assert!(map.is_listening(MapEvent::Resize));
    assert!(map.is_listening(MapEvent::CenterChanged));
    let (resize, center) = layer.listeners();
    assert!(resize.is_some() && center.is_some());

    assert_eq!(layer.surface().buffer_size(), PixelSize::new(800, 600));
    assert_eq!(layer.surface().css_size(), Some(Size::new(800.0, 600.0)));
    assert!(layer.top_left().is_some());
    assert_eq!(scheduler.pending().len(), 1);
}

#[test]
fn detach_clears_handles_and_cancels_the_frame() {
    let (mut layer, scheduler) = attached(Size::new(800.0, 600.0));
    let pending = layer.pending_frame().unwrap();

    let map = layer.detach().unwrap();
    assert_eq!(layer.pending_frame(), None);
    assert_eq!(layer.listeners(), (None, None));
    assert_eq!(layer.top_left(), None);
    assert_eq!(layer.surface().parent(), None);
    assert!(map.listeners().is_empty());
    assert_eq!(map.unsubscribe_count(), 2);
    assert_eq!(scheduler.cancelled(), [pending]);
    assert!(scheduler.pending().is_empty());
}

#[test]
fn detach_without_pending_frame_cancels_nothing() {
    let (mut layer, scheduler) = attached(Size::new(64.0, 64.0));
    assert_eq!(run_pending(&mut layer, &scheduler, 1), 1);
    assert_eq!(layer.pending_frame(), None);

    layer.detach().unwrap();
    assert!(scheduler.cancelled().is_empty());
    assert_eq!(layer.listeners(), (None, None));
}

#[test]
fn no_update_fires_after_detach() {
    let (mut layer, scheduler) = attached(Size::new(64.0, 64.0));
    let log = log_handlers(&mut layer);
    layer.detach();

    // Even if the host ran the callback anyway, nothing is dispatched.
    layer.on_frame();
    assert!(log.borrow().is_empty());
    assert_eq!(scheduler.deliver(), None);

    // And nothing can be scheduled while detached.
    layer.schedule_update();
    layer.set_animate(true);
    assert_eq!(layer.pending_frame(), None);
}

#[test]
fn reattach_after_detach_starts_clean() {
    let (mut layer, scheduler) = attached(Size::new(200.0, 100.0));
    let map = layer.detach().unwrap();

    layer.attach(map).unwrap();
    assert!(layer.is_attached());
    assert_eq!(layer.map().unwrap().listeners().len(), 2);
    assert_eq!(layer.surface().parent(), Some(DEFAULT_PANE_NAME));
    assert_eq!(scheduler.pending().len(), 1);
    assert_eq!(layer.pending_frame(), scheduler.pending().first().copied());
}

// -- configuration ----------------------------------------------------------

#[test]
fn nonexistent_pane_fails_attach_and_leaves_layer_detached() {
    let scheduler = ManualScheduler::new();
    let options = LayerOptions::default()
        .with_pane_name("nonexistent")
        .with_map(FakeMap::new(Size::new(100.0, 100.0)));
    let err = FakeLayer::with_options(FakeSurface::new(), scheduler.clone(), options).unwrap_err();
    assert_eq!(
        err,
        LayerError::PaneNotFound {
            pane: "nonexistent".into()
        }
    );

    let (mut layer, scheduler) = detached();
    layer.set_pane_name("nonexistent").unwrap();
    let err = layer
        .attach(FakeMap::new(Size::new(100.0, 100.0)))
        .unwrap_err();
    assert!(matches!(err, LayerError::PaneNotFound { .. }));
    assert!(!layer.is_attached());
    assert_eq!(layer.listeners(), (None, None));
    assert_eq!(layer.surface().parent(), None);
    assert_eq!(scheduler.request_count(), 0);
}

#[test]
fn pane_change_while_attached_moves_the_canvas() {
    let (mut layer, _scheduler) = attached(Size::new(100.0, 100.0));
    layer.set_pane_name("floatPane").unwrap();
    assert_eq!(layer.pane_name(), "floatPane");
    assert_eq!(layer.surface().parent(), Some("floatPane"));

    let err = layer.set_pane_name("bogus").unwrap_err();
    assert!(matches!(err, LayerError::PaneNotFound { .. }));
    assert_eq!(layer.pane_name(), "floatPane");
    assert_eq!(layer.surface().parent(), Some("floatPane"));
}

#[test]
fn options_apply_in_order_with_map_last() {
    let scheduler = ManualScheduler::new();
    let options = LayerOptions::default()
        .with_map(FakeMap::new(Size::new(400.0, 300.0)))
        .with_pane_name("mapPane")
        .with_resolution_scale(2.0)
        .with_animate(true)
        .with_update_handler(|cx| cx.surface().draw_calls += 1);
    let mut layer = FakeLayer::with_options(FakeSurface::new(), scheduler.clone(), options).unwrap();

    // Pane and scale were in place before the attach-time resize.
    assert_eq!(layer.surface().parent(), Some("mapPane"));
    assert_eq!(layer.surface().buffer_size(), PixelSize::new(800, 600));
    assert!(layer.is_animated());

    assert_eq!(run_pending(&mut layer, &scheduler, 3), 3);
    assert_eq!(layer.surface().draw_calls, 3);
}

#[test]
fn invalid_resolution_scale_is_rejected() {
    let (mut layer, _scheduler) = attached(Size::new(100.0, 100.0));
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = layer.set_resolution_scale(bad).unwrap_err();
        assert!(matches!(err, LayerError::InvalidResolutionScale(_)));
    }
    assert_eq!(layer.resolution_scale(), 1.0);
    assert_eq!(layer.surface().buffer_size(), PixelSize::new(100, 100));
}

// -- resize -----------------------------------------------------------------

#[test]
fn double_scale_doubles_the_buffer_once() {
    let (mut layer, scheduler) = detached();
    layer.set_resolution_scale(2.0).unwrap();
    layer.attach(FakeMap::new(Size::new(320.0, 240.0))).unwrap();

    assert_eq!(layer.surface().buffer_size(), PixelSize::new(640, 480));
    assert!(layer.needs_resize());
    let writes = layer.surface().buffer_writes();

    run_pending(&mut layer, &scheduler, 1);
    assert!(!layer.needs_resize());

    layer.resize();
    assert_eq!(layer.surface().buffer_writes(), writes);
    assert_eq!(layer.surface().buffer_size(), PixelSize::new(640, 480));
    assert!(!layer.needs_resize());
    assert_eq!(layer.pending_frame(), None);
}

#[test]
fn scale_change_while_attached_resizes_immediately() {
    let (mut layer, scheduler) = attached(Size::new(100.0, 50.0));
    run_pending(&mut layer, &scheduler, 1);

    layer.set_resolution_scale(3.0).unwrap();
    assert_eq!(layer.surface().buffer_size(), PixelSize::new(300, 150));
    assert!(layer.needs_resize());
    assert!(layer.pending_frame().is_some());
    // Layout size is unaffected by the scale.
    assert_eq!(layer.surface().css_size(), Some(Size::new(100.0, 50.0)));
}

#[test]
fn layout_change_without_buffer_change_skips_redraw() {
    let (mut layer, scheduler) = detached();
    layer.set_resolution_scale(0.5).unwrap();
    layer
        .attach(FakeMap::new(Size::new(100.0, 100.0)))
        .unwrap();
    run_pending(&mut layer, &scheduler, 1);
    assert_eq!(layer.surface().buffer_size(), PixelSize::new(50, 50));

    // 101 * 0.5 truncates to the same 50px buffer.
    layer
        .map_mut()
        .unwrap()
        .set_viewport(Size::new(101.0, 101.0));
    layer.resize();
    assert_eq!(layer.surface().buffer_size(), PixelSize::new(50, 50));
    assert_eq!(layer.surface().css_size(), Some(Size::new(101.0, 101.0)));
    assert_eq!(layer.css_size(), Size::new(101.0, 101.0));
    assert!(!layer.needs_resize());
    assert_eq!(layer.pending_frame(), None);
}

#[test]
fn resize_is_a_no_op_while_detached() {
    let (mut layer, scheduler) = detached();
    layer.resize();
    layer.reposition();
    assert_eq!(layer.surface().buffer_writes(), 0);
    assert_eq!(layer.top_left(), None);
    assert_eq!(scheduler.request_count(), 0);
}

// -- reposition -------------------------------------------------------------

#[test]
fn top_left_at_zoom_zero() {
    let (layer, _scheduler) = attached(Size::new(256.0, 256.0));
    let tl = layer.top_left().unwrap();
    assert_eq!(tl.lng, -180.0);
    // North edge of a 256px viewport at zoom 0 in the linear fake.
    assert_eq!(tl.lat, 180.0);
}

#[test]
fn reposition_follows_the_center() {
    let map = FakeMap::new(Size::new(512.0, 512.0)).with_view(LatLng::new(10.0, 30.0), 1.0);
    let (mut layer, _scheduler) = detached();
    layer.attach(map).unwrap();
    let tl = layer.top_left().unwrap();
    assert!((tl.lng - (30.0 - 180.0)).abs() < 1e-9);
    assert_eq!(layer.surface().translation(), Vec2::ZERO);

    let map = layer.map_mut().unwrap();
    map.set_view(LatLng::new(10.0, 40.0), 2.0);
    map.set_drag_offset(Vec2::new(-17.0, 8.5));
    layer.reposition();

    let tl = layer.top_left().unwrap();
    assert!((tl.lng - (40.0 - 90.0)).abs() < 1e-9);
    assert_eq!(layer.surface().translation(), Vec2::new(-17.0, 8.0));
}

// -- scheduling -------------------------------------------------------------

#[test]
fn schedule_update_coalesces() {
    let (mut layer, scheduler) = attached(Size::new(100.0, 100.0));
    run_pending(&mut layer, &scheduler, 1);
    let before = scheduler.request_count();

    for _ in 0..10 {
        layer.schedule_update();
        layer.reposition();
        layer.resize();
    }
    assert_eq!(scheduler.pending().len(), 1);
    assert_eq!(scheduler.request_count(), before + 1);
}

#[test]
fn resize_notification_precedes_update() {
    let (mut layer, scheduler) = attached(Size::new(640.0, 480.0));
    let log = log_handlers(&mut layer);

    run_pending(&mut layer, &scheduler, 1);
    assert_eq!(*log.borrow(), vec!["resize 640x480", "update"]);
    assert!(!layer.needs_resize());

    layer.schedule_update();
    run_pending(&mut layer, &scheduler, 1);
    assert_eq!(*log.borrow(), vec!["resize 640x480", "update", "update"]);
    assert_eq!(layer.surface().draw_calls, 2);
}

#[test]
fn resize_flag_clears_without_a_resize_handler() {
    let (mut layer, scheduler) = attached(Size::new(64.0, 32.0));
    run_pending(&mut layer, &scheduler, 1);
    assert!(!layer.needs_resize());
}

#[test]
fn animation_reschedules_until_turned_off() {
    let (mut layer, scheduler) = attached(Size::new(100.0, 100.0));
    layer.set_animate(true);
    assert_eq!(scheduler.pending().len(), 1);

    assert_eq!(run_pending(&mut layer, &scheduler, 5), 5);
    assert_eq!(scheduler.pending().len(), 1);

    layer.set_animate(false);
    assert_eq!(run_pending(&mut layer, &scheduler, 5), 1);
    assert!(scheduler.pending().is_empty());
}

#[test]
fn animation_stops_on_detach() {
    let (mut layer, scheduler) = attached(Size::new(100.0, 100.0));
    layer.set_animate(true);
    run_pending(&mut layer, &scheduler, 3);
    layer.detach();
    assert!(scheduler.pending().is_empty());
    assert_eq!(run_pending(&mut layer, &scheduler, 5), 0);
}

#[test]
fn set_animate_schedules_immediately() {
    let (mut layer, scheduler) = attached(Size::new(100.0, 100.0));
    run_pending(&mut layer, &scheduler, 1);
    assert!(scheduler.pending().is_empty());
    layer.set_animate(true);
    assert_eq!(scheduler.pending().len(), 1);
}

#[test]
fn handler_can_request_the_next_frame() {
    let (mut layer, scheduler) = attached(Size::new(100.0, 100.0));
    let remaining = Rc::new(RefCell::new(3_u32));
    let counter = Rc::clone(&remaining);
    layer.set_update_handler(Some(Box::new(move |cx: &mut FrameContext<'_, FakeSurface>| {
        let mut left = counter.borrow_mut();
        if *left > 0 {
            *left -= 1;
            cx.request_update();
        }
    })));

    assert_eq!(run_pending(&mut layer, &scheduler, 10), 4);
    assert_eq!(*remaining.borrow(), 0);
    assert!(scheduler.pending().is_empty());
}

#[test]
fn handlers_see_top_left_and_sizes() {
    let (mut layer, scheduler) = detached();
    layer.set_resolution_scale(2.0).unwrap();
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    layer.set_update_handler(Some(Box::new(move |cx: &mut FrameContext<'_, FakeSurface>| {
        *sink.borrow_mut() = Some((cx.buffer_size(), cx.css_size(), cx.top_left()));
    })));
    layer.attach(FakeMap::new(Size::new(256.0, 128.0))).unwrap();
    run_pending(&mut layer, &scheduler, 1);

    let (buffer, css, top_left) = seen.borrow().unwrap();
    assert_eq!(buffer, PixelSize::new(512, 256));
    assert_eq!(css, Size::new(256.0, 128.0));
    assert_eq!(top_left.unwrap().lng, -180.0);
}

// -- diagnostics ------------------------------------------------------------

#[test]
fn trace_sink_sees_the_lifecycle() {
    let recorder = Rc::new(RefCell::new(RecorderSink::new()));
    let (mut layer, scheduler) = detached();
    layer.set_trace_sink(Box::new(Rc::clone(&recorder)));

    layer.attach(FakeMap::new(Size::new(10.0, 10.0))).unwrap();
    run_pending(&mut layer, &scheduler, 1);
    layer.schedule_update();
    layer.detach();

    let events = recorder.borrow().events().to_vec();
    assert!(matches!(events[0], RecordedEvent::Attached { .. }));
    assert!(matches!(events[1], RecordedEvent::BufferResized(_)));
    assert!(matches!(events[2], RecordedEvent::FrameRequested(FrameHandle(0))));
    assert!(matches!(events[3], RecordedEvent::CssResized(_)));
    assert!(matches!(events[4], RecordedEvent::Repositioned(_)));
    assert!(matches!(events[5], RecordedEvent::FrameDispatched(e) if e.resized && !e.updated));
    assert!(matches!(events[6], RecordedEvent::FrameRequested(FrameHandle(1))));
    assert!(matches!(events[7], RecordedEvent::FrameCancelled(FrameHandle(1))));
    assert!(matches!(events.last(), Some(RecordedEvent::Detached(_))));
}
