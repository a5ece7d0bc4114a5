#![forbid(unsafe_code)]

//! Transform and cursor state shared by the canvas and the gesture handler.
//!
//! [`RenderData`] holds the affine transform that maps remote-image
//! coordinates onto the screen, the sizes of both spaces, and the remote
//! cursor position (in image coordinates).
//!
//! # Invariants
//!
//! 1. The transform is a pure scale + translate with a positive scale, so it
//!    is always invertible.
//! 2. Every screen→image conversion inverts the transform *at call time*. The
//!    transform changes on every pan and zoom; an inverse is never cached.
//! 3. The cursor position always lies within `[0, image_width] × [0, image_height]`.

use crate::geometry::{Affine, Point, Vec2, map_vector, scale_factor};

/// Current image→screen mapping plus cursor position.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderData {
    /// Maps remote-image coordinates to screen coordinates.
    pub transform: Affine,
    pub screen_width: u32,
    pub screen_height: u32,
    pub image_width: u32,
    pub image_height: u32,
    cursor_position: Point,
}

impl Default for RenderData {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderData {
    /// Identity transform, zero sizes, cursor at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transform: Affine::IDENTITY,
            screen_width: 0,
            screen_height: 0,
            image_width: 0,
            image_height: 0,
            cursor_position: Point::ORIGIN,
        }
    }

    /// Whether both the screen and image sizes are known.
    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.screen_width > 0 && self.screen_height > 0 && self.image_width > 0 && self.image_height > 0
    }

    /// Current uniform scale (screen pixels per image pixel).
    #[inline]
    #[must_use]
    pub fn scale(&self) -> f64 {
        scale_factor(&self.transform)
    }

    /// Cursor position in image coordinates.
    #[inline]
    #[must_use]
    pub fn cursor_position(&self) -> Point {
        self.cursor_position
    }

    /// Move the cursor, clamped to the image bounds.
    ///
    /// Returns `true` if the stored position changed.
    pub fn set_cursor_position(&mut self, position: Point) -> bool {
        let clamped = Point::new(
            position.x.clamp(0.0, f64::from(self.image_width)),
            position.y.clamp(0.0, f64::from(self.image_height)),
        );
        if clamped == self.cursor_position {
            return false;
        }
        self.cursor_position = clamped;
        true
    }

    /// Translate a point in screen coordinates to a location on the image.
    #[must_use]
    pub fn map_screen_point_to_image_point(&self, screen: Point) -> Point {
        self.transform.inverse() * screen
    }

    /// Translate a point on the image to screen coordinates.
    #[must_use]
    pub fn map_image_point_to_screen_point(&self, image: Point) -> Point {
        self.transform * image
    }

    /// Convert a screen-space delta into image space.
    #[must_use]
    pub fn screen_vector_to_image(&self, delta: Vec2) -> Vec2 {
        map_vector(&self.transform.inverse(), delta)
    }

    /// Convert an image-space delta into screen space.
    #[must_use]
    pub fn image_vector_to_screen(&self, delta: Vec2) -> Vec2 {
        map_vector(&self.transform, delta)
    }

    /// Image size mapped to screen pixels.
    #[must_use]
    pub fn image_size_on_screen(&self) -> Vec2 {
        self.image_vector_to_screen(Vec2::new(
            f64::from(self.image_width),
            f64::from(self.image_height),
        ))
    }

    /// Post-multiply a uniform scale anchored at `focus` (screen coordinates).
    ///
    /// Factors that are not finite and positive are ignored; they would make
    /// the transform singular.
    pub fn post_scale(&mut self, factor: f64, focus: Point) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        self.transform = Affine::scale_about(factor, focus) * self.transform;
    }

    /// Post-multiply a translation in screen coordinates.
    pub fn post_translate(&mut self, offset: Vec2) {
        self.transform = Affine::translate(offset) * self.transform;
    }
}
