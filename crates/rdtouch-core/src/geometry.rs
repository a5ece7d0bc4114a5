#![forbid(unsafe_code)]

//! Geometric primitives shared by the viewport and gesture code.
//!
//! Floating-point geometry comes from [`kurbo`]: [`Point`] for positions,
//! [`Vec2`] for deltas and velocities, and [`Affine`] for the image→screen
//! transform. The integer [`IntRect`] mirrors the pixel rectangles used for
//! pan-gesture bounds, where coordinates are truncated before the hit test.

pub use kurbo::{Affine, Point, Vec2};

/// Map a vector through the linear part of `transform`, ignoring translation.
#[inline]
#[must_use]
pub fn map_vector(transform: &Affine, v: Vec2) -> Vec2 {
    let [a, b, c, d, _, _] = transform.as_coeffs();
    Vec2::new(a * v.x + c * v.y, b * v.x + d * v.y)
}

/// Uniform scale of a scale+translate transform (x axis).
#[inline]
#[must_use]
pub fn scale_factor(transform: &Affine) -> f64 {
    transform.as_coeffs()[0]
}

/// Integer rectangle with half-open bounds.
///
/// A default (zero) rectangle is empty and contains no point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntRect {
    /// Left edge (inclusive).
    pub left: i32,
    /// Top edge (inclusive).
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl IntRect {
    /// Create a new rectangle from its edges.
    #[inline]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle covering `width` × `height`, shrunk by `inset` on every side.
    #[inline]
    pub const fn inset_from_size(width: i32, height: i32, inset: i32) -> Self {
        Self::new(inset, inset, width - inset, height - inset)
    }

    /// Check if the rectangle has zero or negative area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        !self.is_empty() && x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Width in pixels.
    #[inline]
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height in pixels.
    #[inline]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Screen area obscured on each side, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Insets {
    /// No obscured area.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create new insets with specific values.
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub fn horizontal_sum(&self) -> f64 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[inline]
    pub fn vertical_sum(&self) -> f64 {
        self.top + self.bottom
    }
}
