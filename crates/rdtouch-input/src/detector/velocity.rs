#![forbid(unsafe_code)]

//! Per-pointer release velocity estimation.

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use rdtouch_core::{Point, TouchEvent, Vec2};

/// Samples older than this (relative to the newest) are ignored.
const HORIZON: Duration = Duration::from_millis(100);

/// Samples kept per pointer.
const MAX_SAMPLES: usize = 20;

#[derive(Debug, Clone, Copy)]
struct Sample {
    time: Duration,
    position: Point,
}

/// Tracks recent pointer positions and fits a velocity to them.
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    samples: BTreeMap<u32, VecDeque<Sample>>,
}

impl VelocityTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every pointer.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Record the positions of every pointer in `event`.
    pub fn add_event(&mut self, event: &TouchEvent) {
        for pointer in &event.pointers {
            let history = self.samples.entry(pointer.id).or_default();
            if history.back().is_some_and(|s| s.time > event.time) {
                history.clear();
            }
            history.push_back(Sample {
                time: event.time,
                position: pointer.position,
            });
            while history.len() > MAX_SAMPLES {
                history.pop_front();
            }
        }
    }

    /// Least-squares velocity (px/s) of `pointer_id` over the recent horizon.
    ///
    /// Returns zero when fewer than two usable samples exist.
    #[must_use]
    pub fn velocity(&self, pointer_id: u32) -> Vec2 {
        let Some(history) = self.samples.get(&pointer_id) else {
            return Vec2::ZERO;
        };
        let Some(newest) = history.back() else {
            return Vec2::ZERO;
        };

        let recent: Vec<&Sample> = history
            .iter()
            .filter(|s| newest.time.saturating_sub(s.time) <= HORIZON)
            .collect();
        if recent.len() < 2 {
            return Vec2::ZERO;
        }

        // Fit x(t) and y(t) with a line; t in seconds relative to the newest sample.
        let n = recent.len() as f64;
        let t: Vec<f64> = recent
            .iter()
            .map(|s| -(newest.time.saturating_sub(s.time)).as_secs_f64())
            .collect();
        let mean_t = t.iter().sum::<f64>() / n;
        let mean_x = recent.iter().map(|s| s.position.x).sum::<f64>() / n;
        let mean_y = recent.iter().map(|s| s.position.y).sum::<f64>() / n;

        let mut stt = 0.0;
        let mut stx = 0.0;
        let mut sty = 0.0;
        for (ti, s) in t.iter().zip(&recent) {
            let dt = ti - mean_t;
            stt += dt * dt;
            stx += dt * (s.position.x - mean_x);
            sty += dt * (s.position.y - mean_y);
        }
        if stt <= f64::EPSILON {
            return Vec2::ZERO;
        }
        Vec2::new(stx / stt, sty / stt)
    }
}
