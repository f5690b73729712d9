//! Integration tests for onsat-core.
//!
//! These tests drive the frame clock and the visibility observer together
//! through the public API, the way a host page does.

use onsat_core::{
    FrameClock, FrameScheduler, ObserverOptions, Rect, VisibilityEdge, VisibilityObserver,
    WidgetId,
};
use proptest::prelude::*;

#[test]
fn test_scroll_script_starts_frames_once() {
    let element = Rect::new(0.0, 1500.0, 300.0, 120.0);
    let mut observer = VisibilityObserver::default();
    let mut clock = FrameClock::new(60);
    let owner = WidgetId::new(1);

    let mut requests = 0;
    for step in 0..200 {
        let viewport = Rect::new(0.0, step as f32 * 10.0, 1280.0, 800.0);
        if observer.observe(&element, &viewport) == Some(VisibilityEdge::Entered) {
            clock.request_frame(owner);
            requests += 1;
        }
        let _ = clock.tick();
    }

    assert_eq!(requests, 1);
    assert_eq!(clock.frames_fired(), 1);
}

#[test]
fn test_independent_owners_interleave() {
    let mut clock = FrameClock::with_interval(16.0);
    clock.request_frame(WidgetId::new(1));
    clock.request_frame(WidgetId::new(2));

    let mut order = Vec::new();
    clock.run_until(48.0, |frame, clock| {
        order.push(frame.owner.0);
        clock.request_frame(frame.owner);
    });

    assert_eq!(order, vec![1, 2, 1, 2, 1, 2]);
}

proptest! {
    #[test]
    fn prop_trigger_once_never_fires_twice(scrolls in prop::collection::vec(0.0f32..4000.0, 1..64)) {
        let element = Rect::new(0.0, 2000.0, 200.0, 200.0);
        let mut observer = VisibilityObserver::new(ObserverOptions::default());
        let fired = scrolls
            .iter()
            .filter(|&&s| observer.observe(&element, &Rect::new(0.0, s, 1280.0, 800.0)).is_some())
            .count();
        prop_assert!(fired <= 1);
    }

    #[test]
    fn prop_visible_fraction_in_unit_range(
        x in -500.0f32..1500.0,
        y in -500.0f32..1500.0,
        w in 0.0f32..800.0,
        h in 0.0f32..800.0,
    ) {
        let fraction = Rect::new(x, y, w, h).visible_fraction(&Rect::new(0.0, 0.0, 1024.0, 768.0));
        prop_assert!((0.0..=1.0).contains(&fraction));
    }
}
