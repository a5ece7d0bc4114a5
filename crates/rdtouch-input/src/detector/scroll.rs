#![forbid(unsafe_code)]

//! Scroll and fling detection.
//!
//! [`ScrollDetector`] follows the focus point (average of all pointers) of a
//! touch sequence. Once the focus strays beyond the touch slop from where the
//! sequence started, every further movement is reported as a scroll with
//! `distance = previous focus − current focus`; note the sign: dragging
//! downwards yields a negative `distance.y`. When the last pointer lifts after
//! scrolling, a fling is reported if the release speed exceeds the minimum.
//!
//! Adding or removing a pointer re-bases the focus so the average position
//! does not jump. A second pointer also leaves the tap region, so
//! multi-finger drags scroll without first crossing the slop.

use rdtouch_core::{Point, TouchAction, TouchEvent, Vec2};

use super::velocity::VelocityTracker;
use crate::config::TouchConfig;

/// Output of the [`ScrollDetector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollGesture {
    /// A touch sequence started.
    Down { position: Point },
    /// The pointers moved.
    Scroll {
        /// First-pointer position of the `Down` that started the sequence.
        start: Point,
        /// First-pointer position of the current event.
        current: Point,
        /// Pointers on screen in the current event.
        pointer_count: usize,
        /// Previous focus minus current focus, screen pixels.
        distance: Vec2,
    },
    /// The last pointer lifted with enough speed.
    Fling {
        start: Point,
        current: Point,
        /// Release velocity, px/s, in the direction of finger travel.
        velocity: Vec2,
    },
}

/// Scroll/fling recogniser over raw touch events.
#[derive(Debug, Clone)]
pub struct ScrollDetector {
    touch_slop_square: f64,
    min_fling_velocity: f64,
    max_fling_velocity: f64,
    velocity: VelocityTracker,
    start: Option<Point>,
    down_focus: Point,
    last_focus: Point,
    always_in_tap_region: bool,
}

impl ScrollDetector {
    #[must_use]
    pub fn new(config: &TouchConfig) -> Self {
        let slop = config.touch_slop();
        Self {
            touch_slop_square: slop * slop,
            min_fling_velocity: config.min_fling_velocity(),
            max_fling_velocity: config.max_fling_velocity(),
            velocity: VelocityTracker::new(),
            start: None,
            down_focus: Point::ORIGIN,
            last_focus: Point::ORIGIN,
            always_in_tap_region: true,
        }
    }

    /// Whether the current sequence has turned into a scroll.
    #[inline]
    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.start.is_some() && !self.always_in_tap_region
    }

    /// Feed one raw event; returns the gesture it produced, if any.
    pub fn on_touch_event(&mut self, event: &TouchEvent) -> Option<ScrollGesture> {
        if event.action == TouchAction::Down {
            self.velocity.clear();
        }
        self.velocity.add_event(event);

        let focus = event.focus().unwrap_or(self.last_focus);

        match event.action {
            TouchAction::Down => {
                let position = event.first_position();
                self.start = Some(position);
                self.down_focus = focus;
                self.last_focus = focus;
                self.always_in_tap_region = true;
                Some(ScrollGesture::Down { position })
            }
            TouchAction::PointerDown { .. } => {
                // A second finger ends any tap; multi-finger drags scroll at once.
                self.down_focus = focus;
                self.last_focus = focus;
                self.always_in_tap_region = false;
                None
            }
            TouchAction::PointerUp { .. } => {
                self.down_focus = focus;
                self.last_focus = focus;
                None
            }
            TouchAction::Move => {
                let start = self.start?;
                let distance = self.last_focus - focus;
                if self.always_in_tap_region {
                    let travel = focus - self.down_focus;
                    if travel.hypot2() > self.touch_slop_square {
                        self.always_in_tap_region = false;
                        self.last_focus = focus;
                        return Some(self.scroll(start, event, distance));
                    }
                    None
                } else if distance.x.abs() >= 1.0 || distance.y.abs() >= 1.0 {
                    self.last_focus = focus;
                    Some(self.scroll(start, event, distance))
                } else {
                    None
                }
            }
            TouchAction::Up => {
                let start = self.start.take()?;
                if self.always_in_tap_region {
                    return None;
                }
                let pointer_id = event.pointers.first().map_or(0, |p| p.id);
                let velocity = self.clamp_velocity(self.velocity.velocity(pointer_id));
                let fast_enough = velocity.x.abs() > self.min_fling_velocity
                    || velocity.y.abs() > self.min_fling_velocity;
                fast_enough.then(|| ScrollGesture::Fling {
                    start,
                    current: event.first_position(),
                    velocity,
                })
            }
            TouchAction::Cancel => {
                self.start = None;
                self.always_in_tap_region = true;
                self.velocity.clear();
                None
            }
        }
    }

    fn scroll(&self, start: Point, event: &TouchEvent, distance: Vec2) -> ScrollGesture {
        ScrollGesture::Scroll {
            start,
            current: event.first_position(),
            pointer_count: event.pointer_count(),
            distance,
        }
    }

    fn clamp_velocity(&self, v: Vec2) -> Vec2 {
        let max = self.max_fling_velocity;
        Vec2::new(v.x.clamp(-max, max), v.y.clamp(-max, max))
    }
}
