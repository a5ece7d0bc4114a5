#![forbid(unsafe_code)]

//! Input: gesture recognition and remote input strategies.
//!
//! # Role in rdtouch
//! `rdtouch-input` turns the raw touch stream of a desktop view into pan,
//! zoom, and fling of the local viewport, and into mouse, wheel, or touch
//! events for the remote host.
//!
//! # Primary responsibilities
//! - **TouchInputHandler**: owns the detectors, fling jobs, and active
//!   strategy; dispatches every event in a fixed order.
//! - **Detectors**: scroll/fling, scale, multi-finger tap and long press,
//!   swipe-vs-pinch classification.
//! - **Strategies**: trackpad, simulated touch, and native touch semantics
//!   behind the [`InputStrategy`] trait.
//! - **TouchConfig**: thresholds and timeouts, optionally loaded from TOML or
//!   JSON with the `config` feature.
//!
//! # How it fits in the system
//! The host implements [`DesktopView`] (rendering and system UI) and
//! [`InputEventSender`] (the connection to the remote host), then feeds the
//! handler touch events, frame ticks, and size changes from one thread.

pub mod config;
pub mod detector;
pub mod handler;
pub mod strategy;
pub mod view;

pub use config::{ConfigError, TouchConfig};
pub use handler::{GestureSessionState, SystemUiVisibility, TouchInputHandler};
pub use strategy::{
    HostTouchCapability, InputEventSender, InputFeedbackType, InputMode, InputStrategy,
    MouseButton, NullInputStrategy, RemoteTouchEventKind, RemoteTouchPoint,
    SimulatedTouchInputStrategy, TouchInputStrategy, TrackpadInputStrategy,
    create_input_strategy,
};
pub use view::DesktopView;
