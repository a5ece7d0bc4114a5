//! Property-based tests for gesture dispatch invariants.
//!
//! 1. **Swipe fires at most once**: a 3-finger sequence shows the action bar
//!    or the keyboard exactly when its vertical travel first passes the
//!    threshold, and never a second time.
//! 2. **Scroll xor zoom**: within one two-finger phase, remote scrolling and
//!    local zooming never both happen.
//! 3. **Image boundary**: a direct-mode tap is accepted exactly when it lands
//!    on the displayed image.
//! 4. **Mapping stays invertible**: after arbitrary pans, screen→image→screen
//!    returns the original point.
//! 5. **Down aborts flings**: whatever the previous sequence left running,
//!    a new `Down` stops it.

use proptest::prelude::*;
use rdtouch_core::Point;
use rdtouch_harness::{RecordingStrategy, RecordingView, TouchScript, ViewEvent, feed};
use rdtouch_input::{TouchConfig, TouchInputHandler};

fn sized_handler(
    image: (u32, u32),
    strategy: RecordingStrategy,
) -> TouchInputHandler<RecordingView> {
    let mut h = TouchInputHandler::new(RecordingView::new(), TouchConfig::default());
    h.handle_client_size_changed(800, 600);
    h.handle_host_size_changed(image.0, image.1);
    h.set_input_strategy(Box::new(strategy));
    h
}

proptest! {
    #[test]
    fn swipe_fires_once_when_threshold_first_crossed(
        steps in prop::collection::vec(-30i32..=30, 1..16),
    ) {
        let mut h = sized_handler((1600, 1200), RecordingStrategy::direct());
        let mut script = TouchScript::new()
            .down(300.0, 300.0)
            .pointer_down(350.0, 300.0)
            .pointer_down(400.0, 300.0);
        for dy in &steps {
            script = script.move_by(0.0, f64::from(*dy));
        }
        feed(&mut h, &script.build());

        let threshold = TouchConfig::default().swipe_threshold();
        let mut travel = 0.0;
        let mut expected = None;
        for dy in &steps {
            travel += f64::from(*dy);
            if travel > threshold {
                expected = Some(ViewEvent::ShowActionBar);
                break;
            }
            if travel < -threshold {
                expected = Some(ViewEvent::ShowKeyboard);
                break;
            }
        }

        let bar = h.view().count(&ViewEvent::ShowActionBar);
        let keyboard = h.view().count(&ViewEvent::ShowKeyboard);
        prop_assert!(bar + keyboard <= 1);
        match expected {
            Some(ViewEvent::ShowActionBar) => prop_assert_eq!((bar, keyboard), (1, 0)),
            Some(_) => prop_assert_eq!((bar, keyboard), (0, 1)),
            None => prop_assert_eq!((bar, keyboard), (0, 0)),
        }
    }

    #[test]
    fn two_finger_phase_scrolls_or_zooms_never_both(
        moves in prop::collection::vec(((-20.0f64..20.0, -20.0f64..20.0), (-20.0f64..20.0, -20.0f64..20.0)), 1..12),
    ) {
        let strategy = RecordingStrategy::direct();
        let log = strategy.log();
        let mut h = sized_handler((1600, 1200), strategy);
        let scale = h.render_data().scale();

        let mut a = (300.0, 300.0);
        let mut b = (500.0, 300.0);
        let mut script = TouchScript::new().down(a.0, a.1).pointer_down(b.0, b.1);
        for ((ax, ay), (bx, by)) in &moves {
            a = (a.0 + ax, a.1 + ay);
            b = (b.0 + bx, b.1 + by);
            script = script.move_to(&[a, b]);
        }
        feed(&mut h, &script.build());

        let scrolled = !log.scrolls().is_empty();
        let zoomed = (h.render_data().scale() - scale).abs() > 1e-12;
        prop_assert!(!(scrolled && zoomed), "scrolled and zoomed in one phase");
    }

    #[test]
    fn direct_tap_accepted_only_on_image(x in 0u32..800) {
        // 400x400 desktop on 800x600: displayed at 1.5x spanning x = 100..=700.
        let strategy = RecordingStrategy::direct();
        let log = strategy.log();
        let mut h = sized_handler((400, 400), strategy);
        let x = f64::from(x);
        feed(&mut h, &TouchScript::new().down(x, 300.0).up().build());

        let on_image = (100.0..=700.0).contains(&x);
        prop_assert_eq!(log.taps().len(), usize::from(on_image));
    }

    #[test]
    fn mapping_round_trips_after_pans(
        drags in prop::collection::vec((-200.0f64..200.0, -200.0f64..200.0), 1..6),
        px in 0.0f64..800.0,
        py in 0.0f64..600.0,
    ) {
        let mut h = sized_handler((3000, 2000), RecordingStrategy::direct());
        let mut t = std::time::Duration::ZERO;
        for (dx, dy) in &drags {
            let script = TouchScript::new()
                .starting_at(t)
                .down(400.0, 300.0)
                .drag_by(*dx, *dy, 4)
                .up();
            t = script.now() + std::time::Duration::from_secs(1);
            feed(&mut h, &script.build());
        }

        let rd = h.render_data();
        let screen = Point::new(px, py);
        let back = rd.map_image_point_to_screen_point(rd.map_screen_point_to_image_point(screen));
        prop_assert!((back - screen).hypot() < 1e-6);
    }

    #[test]
    fn down_leaves_no_fling_running(
        dx in -300.0f64..300.0,
        dy in -200.0f64..200.0,
        two_fingers in any::<bool>(),
    ) {
        let mut h = sized_handler((3000, 2000), RecordingStrategy::direct());
        let mut script = TouchScript::new().down(400.0, 300.0);
        if two_fingers {
            script = script.pointer_down(450.0, 300.0);
        }
        script = script.drag_by(dx, dy, 3);
        if two_fingers {
            script = script.pointer_up(1);
        }
        let script = script.up();
        let next = script.now();
        feed(&mut h, &script.build());

        feed(&mut h, &TouchScript::new().starting_at(next).down(400.0, 300.0).build());
        prop_assert!(!h.is_cursor_fling_active());
        prop_assert!(!h.is_scroll_fling_active());
    }
}
