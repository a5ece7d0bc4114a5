#![forbid(unsafe_code)]

//! Post-gesture momentum (fling) animation.
//!
//! A [`FlingAnimationJob`] turns a release velocity into a decelerating
//! stream of displacement steps. The host drives it cooperatively: every
//! animation frame calls [`process_animation`](FlingAnimationJob::process_animation)
//! with the frame's elapsed time, and the job hands the step to a
//! caller-supplied action.
//!
//! # Model
//!
//! Constant deceleration along the initial direction of travel:
//!
//!   distance(t) = speed × t − ½ × deceleration × t²,  t ∈ [0, speed / deceleration]
//!
//! The job is active while residual velocity remains, i.e. until
//! `t = speed / deceleration`.
//!
//! # Invariants
//!
//! 1. `process_animation` on an inactive job returns `false` and never calls
//!    the action.
//! 2. `abort_animation` is idempotent and never calls the action.
//! 3. The sum of all steps delivered equals `distance(duration)` along the
//!    fling direction, regardless of how frame times are split.
//!
//! # Failure Modes
//!
//! - Zero velocity: the job never becomes active.
//! - Large dt: the step is clamped at the end of the animation; no overshoot.

use std::time::Duration;

use crate::geometry::Vec2;

/// Default deceleration in pixels per second squared.
pub const DEFAULT_DECELERATION: f64 = 2000.0;

/// Which momentum behaviour a job drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlingKind {
    /// Continues a one-finger pan: moves the viewport (and trackpad cursor).
    Cursor,
    /// Continues a two-finger scroll: emits remote scroll events.
    Scroll,
}

/// A reusable fling animation.
#[derive(Debug, Clone)]
pub struct FlingAnimationJob {
    kind: FlingKind,
    deceleration: f64,
    direction: Vec2,
    speed: f64,
    elapsed: Duration,
    duration: Duration,
    traveled: f64,
    active: bool,
}

impl FlingAnimationJob {
    /// Create an idle job with the default deceleration.
    #[must_use]
    pub fn new(kind: FlingKind) -> Self {
        Self {
            kind,
            deceleration: DEFAULT_DECELERATION,
            direction: Vec2::ZERO,
            speed: 0.0,
            elapsed: Duration::ZERO,
            duration: Duration::ZERO,
            traveled: 0.0,
            active: false,
        }
    }

    /// Set deceleration in px/s² (builder pattern). Non-positive values fall
    /// back to the default.
    #[must_use]
    pub fn with_deceleration(mut self, deceleration: f64) -> Self {
        self.deceleration = if deceleration > 0.0 && deceleration.is_finite() {
            deceleration
        } else {
            DEFAULT_DECELERATION
        };
        self
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> FlingKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Velocity remaining at the current point of the animation (px/s).
    #[must_use]
    pub fn residual_velocity(&self) -> Vec2 {
        if !self.active {
            return Vec2::ZERO;
        }
        let remaining = (self.speed - self.deceleration * self.elapsed.as_secs_f64()).max(0.0);
        self.direction * remaining
    }

    /// Start (or restart) the animation from an initial velocity in px/s.
    pub fn start_animation(&mut self, velocity: Vec2) {
        self.reset();
        let speed = velocity.hypot();
        if speed <= 0.0 || !speed.is_finite() {
            return;
        }
        // Too long to represent: treat as never started.
        let Ok(duration) = Duration::try_from_secs_f64(speed / self.deceleration) else {
            return;
        };
        self.direction = velocity / speed;
        self.speed = speed;
        self.duration = duration;
        self.active = !self.duration.is_zero();

        #[cfg(feature = "tracing")]
        tracing::debug!(kind = ?self.kind, speed, duration = ?self.duration, "fling started");
    }

    /// Stop immediately without delivering a final step.
    pub fn abort_animation(&mut self) {
        #[cfg(feature = "tracing")]
        {
            if self.active {
                tracing::debug!(kind = ?self.kind, "fling aborted");
            }
        }
        self.reset();
    }

    /// Advance by `dt` and hand the displacement step to `process_action`.
    ///
    /// Returns whether the job is still active afterwards.
    pub fn process_animation<F>(&mut self, dt: Duration, mut process_action: F) -> bool
    where
        F: FnMut(Vec2),
    {
        if !self.active {
            return false;
        }

        self.elapsed = (self.elapsed + dt).min(self.duration);
        let t = self.elapsed.as_secs_f64();
        let distance = self.speed * t - 0.5 * self.deceleration * t * t;
        let step = distance - self.traveled;
        self.traveled = distance;

        if self.elapsed >= self.duration {
            self.active = false;
        }

        if step != 0.0 {
            process_action(self.direction * step);
        }
        self.active
    }

    fn reset(&mut self) {
        self.direction = Vec2::ZERO;
        self.speed = 0.0;
        self.elapsed = Duration::ZERO;
        self.duration = Duration::ZERO;
        self.traveled = 0.0;
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn run_to_end(job: &mut FlingAnimationJob) -> (Vec2, usize) {
        let mut total = Vec2::ZERO;
        let mut frames = 0;
        while job.process_animation(FRAME, |d| total += d) {
            frames += 1;
            assert!(frames < 10_000, "fling never settled");
        }
        (total, frames)
    }

    #[test]
    fn idle_job_is_inactive() {
        let mut job = FlingAnimationJob::new(FlingKind::Cursor);
        let mut calls = 0;
        assert!(!job.process_animation(FRAME, |_| calls += 1));
        assert_eq!(calls, 0);
    }

    #[test]
    fn zero_velocity_never_starts() {
        let mut job = FlingAnimationJob::new(FlingKind::Scroll);
        job.start_animation(Vec2::ZERO);
        assert!(!job.is_active());
    }

    #[test]
    fn vanishing_deceleration_never_starts() {
        let mut job = FlingAnimationJob::new(FlingKind::Cursor).with_deceleration(1e-300);
        job.start_animation(Vec2::new(3000.0, 0.0));
        assert!(!job.is_active());
        assert_eq!(job.residual_velocity(), Vec2::ZERO);
    }

    #[test]
    fn huge_velocity_never_starts() {
        let mut job = FlingAnimationJob::new(FlingKind::Scroll);
        job.start_animation(Vec2::new(1e300, 0.0));
        assert!(!job.is_active());
        let mut calls = 0;
        assert!(!job.process_animation(FRAME, |_| calls += 1));
        assert_eq!(calls, 0);
    }

    #[test]
    fn total_distance_matches_model() {
        let mut job = FlingAnimationJob::new(FlingKind::Cursor).with_deceleration(1000.0);
        job.start_animation(Vec2::new(600.0, 800.0));
        assert!(job.is_active());
        let (total, _) = run_to_end(&mut job);
        // speed 1000, decel 1000 -> duration 1s, distance 500 along (0.6, 0.8).
        assert!((total.x - 300.0).abs() < 1e-6, "x = {}", total.x);
        assert!((total.y - 400.0).abs() < 1e-6, "y = {}", total.y);
        assert!(!job.is_active());
    }

    #[test]
    fn steps_shrink_over_time() {
        let mut job = FlingAnimationJob::new(FlingKind::Cursor);
        job.start_animation(Vec2::new(3000.0, 0.0));
        let mut steps = Vec::new();
        for _ in 0..5 {
            job.process_animation(FRAME, |d| steps.push(d.x));
        }
        assert!(steps.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn abort_is_silent_and_idempotent() {
        let mut job = FlingAnimationJob::new(FlingKind::Scroll);
        job.start_animation(Vec2::new(0.0, -1500.0));
        job.abort_animation();
        job.abort_animation();
        assert!(!job.is_active());
        let mut calls = 0;
        assert!(!job.process_animation(FRAME, |_| calls += 1));
        assert_eq!(calls, 0);
        assert_eq!(job.residual_velocity(), Vec2::ZERO);
    }

    #[test]
    fn restart_resets_progress() {
        let mut job = FlingAnimationJob::new(FlingKind::Cursor).with_deceleration(1000.0);
        job.start_animation(Vec2::new(1000.0, 0.0));
        job.process_animation(Duration::from_millis(500), |_| {});
        job.start_animation(Vec2::new(1000.0, 0.0));
        let (total, _) = run_to_end(&mut job);
        assert!((total.x - 500.0).abs() < 1e-6);
    }

    #[test]
    fn large_dt_does_not_overshoot() {
        let mut job = FlingAnimationJob::new(FlingKind::Cursor).with_deceleration(1000.0);
        job.start_animation(Vec2::new(1000.0, 0.0));
        let mut total = Vec2::ZERO;
        assert!(!job.process_animation(Duration::from_secs(10), |d| total += d));
        assert!((total.x - 500.0).abs() < 1e-6);
    }

    #[test]
    fn residual_velocity_decays() {
        let mut job = FlingAnimationJob::new(FlingKind::Cursor).with_deceleration(1000.0);
        job.start_animation(Vec2::new(0.0, 1000.0));
        job.process_animation(Duration::from_millis(250), |_| {});
        let v = job.residual_velocity();
        assert!((v.y - 750.0).abs() < 1e-6);
    }
}
