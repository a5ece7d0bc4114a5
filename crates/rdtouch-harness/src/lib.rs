#![forbid(unsafe_code)]

//! Test harness for rdtouch.
//!
//! - [`RecordingView`], [`RecordingSender`], [`RecordingStrategy`]: test
//!   doubles for the handler's ports that log every call.
//! - [`TouchScript`]: builds timed multi-pointer touch sequences.
//! - [`with_captured_events`]: runs a closure under a `tracing` subscriber
//!   that records every event, for asserting on log output.

pub mod capture;
pub mod recording;
pub mod script;

pub use capture::{CapturedEvent, EventCapture, with_captured_events};
pub use recording::{
    RecordingSender, RecordingStrategy, RecordingView, SenderEvent, StrategyCall, StrategyLog,
    ViewEvent,
};
pub use script::{TouchScript, feed};
