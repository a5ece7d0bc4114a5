#![forbid(unsafe_code)]

//! Core: viewport geometry, touch events, and fling animation for
//! remote-desktop touch input.
//!
//! # Role in rdtouch
//! `rdtouch-core` holds the state that gestures act on. It knows nothing
//! about gesture classification or about how input reaches the remote host.
//!
//! # Primary responsibilities
//! - **RenderData**: the image→screen transform, screen/image sizes, and the
//!   remote cursor position.
//! - **DesktopCanvas**: viewport placement, pan clamping, zoom limits, and
//!   fit-to-screen sizing.
//! - **FlingAnimationJob**: cooperative, frame-driven momentum animation.
//! - **TouchEvent**: the raw multi-pointer events delivered by the host view.
//!
//! # How it fits in the system
//! `rdtouch-input` owns one `RenderData`, one `DesktopCanvas`, and two
//! fling jobs, and mutates them from gesture callbacks on a single thread.

pub mod canvas;
pub mod event;
pub mod fling;
pub mod geometry;
pub mod render_data;

pub use canvas::DesktopCanvas;
pub use event::{TouchAction, TouchEvent, TouchPointer};
pub use fling::{FlingAnimationJob, FlingKind};
pub use geometry::{Affine, Insets, IntRect, Point, Vec2};
pub use render_data::RenderData;
