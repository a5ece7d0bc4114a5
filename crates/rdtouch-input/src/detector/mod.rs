#![forbid(unsafe_code)]

//! Gesture primitives that classify raw touch events.
//!
//! Each detector is a small state machine fed every [`TouchEvent`] of a
//! sequence. Detectors return what they recognised instead of calling back
//! into a listener, so the handler that owns them decides what each gesture
//! means and in which order the results apply.
//!
//! | Detector | Recognises |
//! |----------|------------|
//! | [`ScrollDetector`] | down, scroll distance, release fling |
//! | [`ScaleDetector`] | pinch span changes around a focus point |
//! | [`TapDetector`] | multi-finger taps and long presses |
//! | [`SwipePinchDetector`] | whether two fingers swipe or pinch |
//!
//! [`TouchEvent`]: rdtouch_core::TouchEvent

pub mod scale;
pub mod scroll;
pub mod swipe_pinch;
pub mod tap;
pub mod velocity;

pub use scale::{ScaleDetector, ScaleGesture, ScaleInfo};
pub use scroll::{ScrollDetector, ScrollGesture};
pub use swipe_pinch::{SwipePinchDetector, TwoFingerMode};
pub use tap::{TapDetector, TapGesture};
pub use velocity::VelocityTracker;
