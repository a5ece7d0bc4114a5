#![forbid(unsafe_code)]

//! Viewport placement over the remote desktop image.
//!
//! [`DesktopCanvas`] tracks the *viewport position*: the image point that
//! should appear at the centre of the visible screen area. Pan and zoom
//! gestures move that point; [`DesktopCanvas::reposition_image`] then rewrites
//! the [`RenderData`] transform so the point lands where it belongs.
//!
//! # Invariants
//!
//! 1. After `reposition_image`, the image covers the visible area along every
//!    axis where it is large enough to do so, and is centred along the others.
//! 2. The image is never displayed smaller than the screen in both
//!    dimensions at once; it is scaled up to fit instead.
//! 3. The zoom never exceeds the configured maximum zoom factor.
//!
//! # System UI
//!
//! When a soft keyboard or other system UI covers part of the screen,
//! [`set_system_ui_offset_values`](DesktopCanvas::set_system_ui_offset_values)
//! records the obscured margins. Repositioning with `adjust_for_system_ui`
//! centres the viewport in the remaining visible area and lets the user pan
//! far enough to bring the image edges out from under the system UI.

use crate::geometry::{Affine, Insets, Point, Vec2};
use crate::render_data::RenderData;

/// Default upper bound on screen pixels per image pixel.
pub const DEFAULT_MAX_ZOOM_FACTOR: f64 = 100.0;

/// Clamp range for the viewport centre along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisRange {
    min: f64,
    max: f64,
}

impl AxisRange {
    fn for_extent(image_extent: f64, visible_extent: f64) -> Self {
        let half = visible_extent / 2.0;
        if half * 2.0 >= image_extent {
            let mid = image_extent / 2.0;
            Self { min: mid, max: mid }
        } else {
            Self {
                min: half,
                max: image_extent - half,
            }
        }
    }

    #[inline]
    fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.min, self.max)
    }
}

/// Computes viewport placement and keeps the image transform in bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct DesktopCanvas {
    viewport_position: Point,
    system_ui_offsets: Insets,
    max_zoom_factor: f64,
}

impl Default for DesktopCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopCanvas {
    #[must_use]
    pub fn new() -> Self {
        Self {
            viewport_position: Point::ORIGIN,
            system_ui_offsets: Insets::ZERO,
            max_zoom_factor: DEFAULT_MAX_ZOOM_FACTOR,
        }
    }

    /// Set the maximum zoom factor (builder pattern). Clamped to at least 1.
    #[must_use]
    pub fn with_max_zoom_factor(mut self, factor: f64) -> Self {
        self.max_zoom_factor = factor.max(1.0);
        self
    }

    /// Image point shown at the centre of the visible area.
    #[inline]
    #[must_use]
    pub fn viewport_position(&self) -> Point {
        self.viewport_position
    }

    pub fn set_viewport_position(&mut self, position: Point) {
        self.viewport_position = position;
    }

    #[inline]
    #[must_use]
    pub fn system_ui_offsets(&self) -> Insets {
        self.system_ui_offsets
    }

    /// Record the screen margins currently covered by system UI.
    pub fn set_system_ui_offset_values(&mut self, left: f64, top: f64, right: f64, bottom: f64) {
        self.system_ui_offsets = Insets::new(left.max(0.0), top.max(0.0), right.max(0.0), bottom.max(0.0));
    }

    #[inline]
    #[must_use]
    pub fn max_zoom_factor(&self) -> f64 {
        self.max_zoom_factor
    }

    /// Offset the viewport centre by `delta` (image coordinates).
    ///
    /// With `constrain_to_screen`, the centre stays where the image still
    /// covers the visible area. Otherwise it is only kept inside the image,
    /// which lets a trackpad cursor that the viewport follows reach the edges.
    pub fn move_viewport_center(
        &mut self,
        render_data: &RenderData,
        constrain_to_screen: bool,
        delta: Vec2,
    ) -> Point {
        let mut position = self.viewport_position + delta;
        if constrain_to_screen {
            position = self.clamp_to_visible(render_data, position, true);
        } else {
            position.x = position.x.clamp(0.0, f64::from(render_data.image_width));
            position.y = position.y.clamp(0.0, f64::from(render_data.image_height));
        }
        self.viewport_position = position;
        position
    }

    /// Rewrite the transform so the viewport position lands at the centre of
    /// the visible area, scaling the image up if it no longer fills the screen.
    pub fn reposition_image(&mut self, render_data: &mut RenderData, adjust_for_system_ui: bool) {
        if !render_data.is_initialized() {
            return;
        }

        let screen = Vec2::new(
            f64::from(render_data.screen_width),
            f64::from(render_data.screen_height),
        );
        let image_on_screen = render_data.image_size_on_screen();
        if image_on_screen.x < screen.x && image_on_screen.y < screen.y {
            let factor = (screen.x / image_on_screen.x).min(screen.y / image_on_screen.y);
            render_data.post_scale(factor, Point::ORIGIN);
        }

        let center = self.clamp_to_visible(render_data, self.viewport_position, adjust_for_system_ui);
        let target = self.visible_center(render_data, adjust_for_system_ui);
        let current = render_data.map_image_point_to_screen_point(center);
        render_data.post_translate(target - current);
    }

    /// Apply zoom limits after a pinch, then reposition around the cursor
    /// (`follow_cursor`) or around the image point under the visible centre.
    pub fn reposition_image_with_zoom(&mut self, render_data: &mut RenderData, follow_cursor: bool) {
        if !render_data.is_initialized() {
            return;
        }

        let scale = render_data.scale();
        if scale > self.max_zoom_factor {
            let focus = self.visible_center(render_data, true);
            render_data.post_scale(self.max_zoom_factor / scale, focus);
        }

        self.viewport_position = if follow_cursor {
            render_data.cursor_position()
        } else {
            let center = self.visible_center(render_data, true);
            render_data.map_screen_point_to_image_point(center)
        };
        self.reposition_image(render_data, true);
    }

    /// Reset the transform to the largest uniform scale that shows the whole
    /// image on screen.
    pub fn resize_image_to_fit_screen(&mut self, render_data: &mut RenderData) {
        if !render_data.is_initialized() {
            return;
        }
        let scale = (f64::from(render_data.screen_width) / f64::from(render_data.image_width))
            .min(f64::from(render_data.screen_height) / f64::from(render_data.image_height));
        render_data.transform = Affine::scale(scale);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            scale,
            screen_width = render_data.screen_width,
            screen_height = render_data.screen_height,
            image_width = render_data.image_width,
            image_height = render_data.image_height,
            "image resized to fit screen"
        );
    }

    fn visible_size(&self, render_data: &RenderData, adjust_for_system_ui: bool) -> Vec2 {
        let mut size = Vec2::new(
            f64::from(render_data.screen_width),
            f64::from(render_data.screen_height),
        );
        if adjust_for_system_ui {
            size.x = (size.x - self.system_ui_offsets.horizontal_sum()).max(1.0);
            size.y = (size.y - self.system_ui_offsets.vertical_sum()).max(1.0);
        }
        size
    }

    fn visible_center(&self, render_data: &RenderData, adjust_for_system_ui: bool) -> Point {
        let size = self.visible_size(render_data, adjust_for_system_ui);
        let (left, top) = if adjust_for_system_ui {
            (self.system_ui_offsets.left, self.system_ui_offsets.top)
        } else {
            (0.0, 0.0)
        };
        Point::new(left + size.x / 2.0, top + size.y / 2.0)
    }

    fn clamp_to_visible(&self, render_data: &RenderData, position: Point, adjust_for_system_ui: bool) -> Point {
        let visible = render_data.screen_vector_to_image(self.visible_size(render_data, adjust_for_system_ui));
        let x = AxisRange::for_extent(f64::from(render_data.image_width), visible.x.abs());
        let y = AxisRange::for_extent(f64::from(render_data.image_height), visible.y.abs());
        Point::new(x.clamp(position.x), y.clamp(position.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_data(screen: (u32, u32), image: (u32, u32)) -> RenderData {
        let mut rd = RenderData::new();
        rd.screen_width = screen.0;
        rd.screen_height = screen.1;
        rd.image_width = image.0;
        rd.image_height = image.1;
        rd
    }

    fn approx(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-6
    }

    #[test]
    fn fit_uses_smaller_ratio() {
        let mut rd = render_data((800, 600), (1600, 1600));
        let mut canvas = DesktopCanvas::new();
        canvas.resize_image_to_fit_screen(&mut rd);
        assert!((rd.scale() - 0.375).abs() < 1e-12);
    }

    #[test]
    fn uninitialized_is_left_alone() {
        let mut rd = RenderData::new();
        let mut canvas = DesktopCanvas::new();
        canvas.resize_image_to_fit_screen(&mut rd);
        canvas.reposition_image(&mut rd, true);
        assert_eq!(rd.transform, Affine::IDENTITY);
    }

    #[test]
    fn reposition_centres_viewport_on_screen() {
        let mut rd = render_data((800, 600), (1600, 1200));
        let mut canvas = DesktopCanvas::new();
        canvas.set_viewport_position(Point::new(800.0, 600.0));
        canvas.reposition_image(&mut rd, true);
        let on_screen = rd.map_image_point_to_screen_point(Point::new(800.0, 600.0));
        assert!(approx(on_screen, Point::new(400.0, 300.0)));
    }

    #[test]
    fn reposition_keeps_image_covering_screen() {
        let mut rd = render_data((800, 600), (1600, 1200));
        let mut canvas = DesktopCanvas::new();
        canvas.set_viewport_position(Point::new(0.0, 0.0));
        canvas.reposition_image(&mut rd, true);
        // Top-left corner of the image pinned to the top-left of the screen.
        let origin = rd.map_image_point_to_screen_point(Point::ORIGIN);
        assert!(approx(origin, Point::ORIGIN));
        // The stored viewport is not rewritten by the clamp.
        assert_eq!(canvas.viewport_position(), Point::ORIGIN);
    }

    #[test]
    fn small_image_is_scaled_up() {
        let mut rd = render_data((800, 600), (400, 200));
        let mut canvas = DesktopCanvas::new();
        canvas.reposition_image(&mut rd, false);
        assert!((rd.scale() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn constrained_move_stops_at_screen_edge() {
        let rd = render_data((800, 600), (1600, 1200));
        let mut canvas = DesktopCanvas::new();
        canvas.set_viewport_position(Point::new(800.0, 600.0));
        let p = canvas.move_viewport_center(&rd, true, Vec2::new(-10_000.0, 10_000.0));
        assert_eq!(p, Point::new(400.0, 900.0));
    }

    #[test]
    fn unconstrained_move_reaches_image_edge() {
        let rd = render_data((800, 600), (1600, 1200));
        let mut canvas = DesktopCanvas::new();
        canvas.set_viewport_position(Point::new(800.0, 600.0));
        let p = canvas.move_viewport_center(&rd, false, Vec2::new(-10_000.0, 10_000.0));
        assert_eq!(p, Point::new(0.0, 1200.0));
    }

    #[test]
    fn system_ui_extends_pan_range() {
        let rd = render_data((800, 600), (1600, 1200));
        let mut canvas = DesktopCanvas::new();
        canvas.set_system_ui_offset_values(0.0, 0.0, 0.0, 200.0);
        let p = canvas.move_viewport_center(&rd, true, Vec2::new(0.0, 10_000.0));
        // Visible height is 400, so the centre may go to 1200 - 200.
        assert_eq!(p.y, 1000.0);
    }

    #[test]
    fn zoom_is_capped() {
        let mut rd = render_data((800, 600), (1600, 1200));
        rd.transform = Affine::scale(250.0);
        let mut canvas = DesktopCanvas::new().with_max_zoom_factor(100.0);
        canvas.reposition_image_with_zoom(&mut rd, false);
        assert!((rd.scale() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_follows_cursor_in_indirect_mode() {
        let mut rd = render_data((800, 600), (1600, 1200));
        rd.transform = Affine::scale(2.0);
        rd.set_cursor_position(Point::new(700.0, 500.0));
        let mut canvas = DesktopCanvas::new();
        canvas.reposition_image_with_zoom(&mut rd, true);
        assert_eq!(canvas.viewport_position(), Point::new(700.0, 500.0));
        let cursor_on_screen = rd.map_image_point_to_screen_point(Point::new(700.0, 500.0));
        assert!(approx(cursor_on_screen, Point::new(400.0, 300.0)));
    }
}
