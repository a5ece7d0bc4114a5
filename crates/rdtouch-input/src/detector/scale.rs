#![forbid(unsafe_code)]

//! Pinch (scale) detection.
//!
//! The *span* of a touch is twice the average distance of the pointers from
//! their focus point, measured per axis and combined. A scale gesture begins
//! once at least two pointers are down and the span has changed by more than
//! the span slop; from then on every move reports `current / previous` span.
//!
//! Any change to the set of pointers ends an in-progress gesture and
//! re-bases the span, so a finger landing or lifting never registers as zoom.
//!
//! Spans below the minimum span never scale: a gesture does not begin there,
//! and an in-progress gesture whose span collapses below it ends. Every
//! reported factor is therefore finite and positive.

use rdtouch_core::{Point, TouchAction, TouchEvent};

use crate::config::TouchConfig;

/// Focus and factor of a scale step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleInfo {
    /// Multiplicative change since the previous step (`1.0` = no change).
    pub scale_factor: f64,
    /// Average pointer position, screen pixels.
    pub focus: Point,
}

/// Output of the [`ScaleDetector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleGesture {
    Begin(ScaleInfo),
    Scale(ScaleInfo),
    End(ScaleInfo),
}

/// Two-or-more-finger span tracker.
#[derive(Debug, Clone)]
pub struct ScaleDetector {
    span_slop: f64,
    min_span: f64,
    in_progress: bool,
    initial_span: f64,
    prev_span: f64,
    focus: Point,
}

impl ScaleDetector {
    #[must_use]
    pub fn new(config: &TouchConfig) -> Self {
        Self {
            span_slop: config.touch_slop() * 2.0,
            min_span: config.min_span().max(f64::EPSILON),
            in_progress: false,
            initial_span: 0.0,
            prev_span: 0.0,
            focus: Point::ORIGIN,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    /// Feed one raw event; returns the gesture step it produced, if any.
    pub fn on_touch_event(&mut self, event: &TouchEvent) -> Option<ScaleGesture> {
        let (focus, span, count) = Self::measure(event);

        let config_changed = matches!(
            event.action,
            TouchAction::Down
                | TouchAction::PointerDown { .. }
                | TouchAction::PointerUp { .. }
                | TouchAction::Up
                | TouchAction::Cancel
        );

        if config_changed {
            let ended = self.in_progress.then(|| {
                ScaleGesture::End(ScaleInfo {
                    scale_factor: 1.0,
                    focus: self.focus,
                })
            });
            self.in_progress = false;
            self.initial_span = span;
            self.prev_span = span;
            if let Some(f) = focus {
                self.focus = f;
            }
            return ended;
        }

        let focus = focus?;
        self.focus = focus;
        if count < 2 {
            return None;
        }

        if !self.in_progress {
            if span >= self.min_span && (span - self.initial_span).abs() > self.span_slop {
                self.in_progress = true;
                let scale_factor = if self.initial_span >= self.min_span {
                    span / self.initial_span
                } else {
                    1.0
                };
                self.prev_span = span;
                return Some(ScaleGesture::Begin(ScaleInfo {
                    scale_factor,
                    focus,
                }));
            }
            return None;
        }

        if span < self.min_span {
            self.in_progress = false;
            self.initial_span = span;
            self.prev_span = span;
            return Some(ScaleGesture::End(ScaleInfo {
                scale_factor: 1.0,
                focus,
            }));
        }

        let scale_factor = span / self.prev_span;
        self.prev_span = span;
        Some(ScaleGesture::Scale(ScaleInfo {
            scale_factor,
            focus,
        }))
    }

    /// Focus, span, and pointer count over the pointers that remain down.
    fn measure(event: &TouchEvent) -> (Option<Point>, f64, usize) {
        let Some(focus) = event.focus() else {
            return (None, 0.0, 0);
        };
        let mut dev_x = 0.0;
        let mut dev_y = 0.0;
        let mut count = 0usize;
        for p in event.remaining_pointers() {
            dev_x += (p.position.x - focus.x).abs();
            dev_y += (p.position.y - focus.y).abs();
            count += 1;
        }
        let n = count as f64;
        let span_x = dev_x / n * 2.0;
        let span_y = dev_y / n * 2.0;
        (Some(focus), span_x.hypot(span_y), count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdtouch_core::TouchPointer;
    use std::time::Duration;

    fn pair(action: TouchAction, x0: f64, x1: f64) -> TouchEvent {
        TouchEvent::new(
            action,
            vec![TouchPointer::new(0, x0, 100.0), TouchPointer::new(1, x1, 100.0)],
            Duration::ZERO,
        )
    }

    fn started() -> ScaleDetector {
        let mut sd = ScaleDetector::new(&TouchConfig::default());
        sd.on_touch_event(&TouchEvent::down(100.0, 100.0, Duration::ZERO));
        assert_eq!(sd.on_touch_event(&pair(TouchAction::PointerDown { index: 1 }, 100.0, 200.0)), None);
        sd
    }

    #[test]
    fn small_span_change_does_not_begin() {
        let mut sd = started();
        assert_eq!(sd.on_touch_event(&pair(TouchAction::Move, 95.0, 205.0)), None);
        assert!(!sd.is_in_progress());
    }

    #[test]
    fn spreading_fingers_zoom_in() {
        let mut sd = started();
        let begin = sd.on_touch_event(&pair(TouchAction::Move, 80.0, 220.0));
        assert!(matches!(begin, Some(ScaleGesture::Begin(_))));
        let step = sd.on_touch_event(&pair(TouchAction::Move, 10.0, 290.0));
        match step {
            Some(ScaleGesture::Scale(info)) => {
                assert!((info.scale_factor - 2.0).abs() < 1e-9);
                assert_eq!(info.focus, Point::new(150.0, 100.0));
            }
            other => panic!("expected scale, got {other:?}"),
        }
    }

    #[test]
    fn pointer_up_ends_gesture() {
        let mut sd = started();
        sd.on_touch_event(&pair(TouchAction::Move, 80.0, 220.0));
        let end = sd.on_touch_event(&pair(TouchAction::PointerUp { index: 1 }, 80.0, 220.0));
        assert!(matches!(end, Some(ScaleGesture::End(info)) if info.scale_factor == 1.0));
        assert!(!sd.is_in_progress());
    }

    #[test]
    fn span_collapsing_below_minimum_ends_gesture() {
        let mut sd = started();
        assert!(matches!(
            sd.on_touch_event(&pair(TouchAction::Move, 125.0, 175.0)),
            Some(ScaleGesture::Begin(_))
        ));
        let end = sd.on_touch_event(&pair(TouchAction::Move, 150.0, 150.0));
        assert!(matches!(end, Some(ScaleGesture::End(info)) if info.scale_factor == 1.0));
        assert!(!sd.is_in_progress());
        // Still together: nothing to report.
        assert_eq!(sd.on_touch_event(&pair(TouchAction::Move, 150.0, 150.0)), None);
    }

    #[test]
    fn fingers_landing_together_begin_only_once_apart() {
        let mut sd = ScaleDetector::new(&TouchConfig::default());
        sd.on_touch_event(&TouchEvent::down(100.0, 100.0, Duration::ZERO));
        sd.on_touch_event(&pair(TouchAction::PointerDown { index: 1 }, 100.0, 100.0));
        assert_eq!(sd.on_touch_event(&pair(TouchAction::Move, 90.0, 110.0)), None);
        match sd.on_touch_event(&pair(TouchAction::Move, 60.0, 140.0)) {
            Some(ScaleGesture::Begin(info)) => assert_eq!(info.scale_factor, 1.0),
            other => panic!("expected begin, got {other:?}"),
        }
        match sd.on_touch_event(&pair(TouchAction::Move, 20.0, 180.0)) {
            Some(ScaleGesture::Scale(info)) => assert!((info.scale_factor - 2.0).abs() < 1e-9),
            other => panic!("expected scale, got {other:?}"),
        }
    }

    #[test]
    fn single_pointer_never_scales() {
        let mut sd = ScaleDetector::new(&TouchConfig::default());
        sd.on_touch_event(&TouchEvent::down(0.0, 0.0, Duration::ZERO));
        assert_eq!(sd.on_touch_event(&TouchEvent::move_to(500.0, 0.0, Duration::ZERO)), None);
    }
}
