#![forbid(unsafe_code)]

//! Touch input handler: raw touch events in, viewport changes and remote
//! input out.
//!
//! [`TouchInputHandler`] owns the [`RenderData`] transform, the
//! [`DesktopCanvas`], the gesture detectors, both fling jobs, and the active
//! [`InputStrategy`]. The host feeds it raw events, frame ticks, and size
//! changes; the handler decides whether a gesture pans, zooms, scrolls the
//! host, clicks, or opens system UI.
//!
//! # Dispatch order
//!
//! Every event goes, unconditionally and in this order, to:
//!
//! 1. the active strategy (`on_motion_event`), so it can record the raw payload;
//! 2. the scroll detector (down / scroll / fling);
//! 3. the scale detector (pinch);
//! 4. the tap detector (multi-finger tap, long press);
//! 5. the swipe/pinch classifier.
//!
//! No detector is skipped because an earlier one handled the event; each
//! must observe the whole stream to keep its own state machine correct.
//!
//! # Invariants
//!
//! 1. Within one two-finger phase a motion is either a remote scroll or a
//!    local zoom, never both; the swipe/pinch classifier decides.
//! 2. The 3+-finger swipe fires at most once per touch sequence.
//! 3. A `Down` aborts both fling jobs before the event reaches any detector.
//! 4. Switching strategy aborts both fling jobs synchronously.
//! 5. Screen→image conversions use the transform as it is at that moment.
//!
//! # Failure Modes
//!
//! | Condition | Behaviour |
//! |-----------|-----------|
//! | Pan starts inside the edge slop | Ignored; cursor movement suppressed for the sequence |
//! | Tap/long press with 0 or 4+ fingers | Ignored |
//! | Direct-mode tap outside the image | Ignored |
//! | No strategy selected yet | [`NullInputStrategy`] handles nothing; pan and zoom still work |
//! | Mode change before [`init`](TouchInputHandler::init) | Ignored with a warning |

use std::rc::Rc;
use std::time::Duration;

use rdtouch_core::{
    DesktopCanvas, FlingAnimationJob, FlingKind, IntRect, Point, RenderData, TouchAction,
    TouchEvent, Vec2,
};

use crate::config::TouchConfig;
use crate::detector::{
    ScaleDetector, ScaleGesture, ScaleInfo, ScrollDetector, ScrollGesture, SwipePinchDetector,
    TapDetector, TapGesture,
};
use crate::strategy::{
    HostTouchCapability, InputEventSender, InputMode, InputStrategy, MouseButton,
    NullInputStrategy, create_input_strategy,
};
use crate::view::DesktopView;

/// Per-sequence gesture flags.
///
/// Reset when a new touch sequence starts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GestureSessionState {
    /// No further cursor movement this sequence (edge swipe, 3-finger swipe,
    /// two-finger scroll).
    pub suppress_cursor_movement: bool,
    /// No fling at the end of this sequence (swipe fired, button held).
    pub suppress_fling: bool,
    /// The 3+-finger swipe has fired.
    pub swipe_completed: bool,
    /// A long press was accepted; one-finger pans drag.
    pub is_dragging: bool,
    /// A two-finger scroll is under way; the release flings the scroll job.
    pub scroll_fling: bool,
    /// Signed vertical travel of the current multi-finger phase, px.
    pub total_motion_y: f64,
}

/// Soft keyboard state reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemUiVisibility {
    /// Whether a soft input method is on screen.
    pub soft_input_visible: bool,
    /// Screen area left uncovered by system UI.
    pub visible_area: IntRect,
}

/// Interprets touch gestures for a remote desktop view.
pub struct TouchInputHandler<V: DesktopView> {
    view: V,
    config: TouchConfig,
    render_data: RenderData,
    canvas: DesktopCanvas,

    scroll_detector: ScrollDetector,
    scale_detector: ScaleDetector,
    tap_detector: TapDetector,
    swipe_pinch_detector: SwipePinchDetector,

    cursor_animation_job: FlingAnimationJob,
    scroll_animation_job: FlingAnimationJob,

    strategy: Box<dyn InputStrategy>,
    sender: Option<Rc<dyn InputEventSender>>,

    session: GestureSessionState,
    swipe_threshold: f64,
    edge_slop: i32,
    pan_gesture_bounds: IntRect,
}

impl<V: DesktopView> TouchInputHandler<V> {
    /// Create a handler drawing into `view`.
    ///
    /// Until a screen size arrives the pan bounds are empty, so every pan is
    /// treated as an edge swipe.
    pub fn new(view: V, config: TouchConfig) -> Self {
        let deceleration = config.fling_deceleration();
        Self {
            view,
            render_data: RenderData::new(),
            canvas: DesktopCanvas::new().with_max_zoom_factor(config.max_zoom_factor),
            scroll_detector: ScrollDetector::new(&config),
            scale_detector: ScaleDetector::new(&config),
            tap_detector: TapDetector::new(&config),
            swipe_pinch_detector: SwipePinchDetector::new(&config),
            cursor_animation_job: FlingAnimationJob::new(FlingKind::Cursor)
                .with_deceleration(deceleration),
            scroll_animation_job: FlingAnimationJob::new(FlingKind::Scroll)
                .with_deceleration(deceleration),
            strategy: Box::new(NullInputStrategy),
            sender: None,
            session: GestureSessionState::default(),
            swipe_threshold: config.swipe_threshold(),
            edge_slop: config.edge_slop(),
            pan_gesture_bounds: IntRect::default(),
            config,
        }
    }

    // -- Accessors --------------------------------------------------------

    #[inline]
    pub fn render_data(&self) -> &RenderData {
        &self.render_data
    }

    /// Mutable render data for the host renderer.
    #[inline]
    pub fn render_data_mut(&mut self) -> &mut RenderData {
        &mut self.render_data
    }

    #[inline]
    pub fn canvas(&self) -> &DesktopCanvas {
        &self.canvas
    }

    #[inline]
    pub fn canvas_mut(&mut self) -> &mut DesktopCanvas {
        &mut self.canvas
    }

    #[inline]
    pub fn session(&self) -> &GestureSessionState {
        &self.session
    }

    #[inline]
    pub fn view(&self) -> &V {
        &self.view
    }

    #[inline]
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    #[inline]
    pub fn config(&self) -> &TouchConfig {
        &self.config
    }

    /// Screen area in which a pan may start.
    #[inline]
    pub fn pan_gesture_bounds(&self) -> IntRect {
        self.pan_gesture_bounds
    }

    #[inline]
    pub fn is_cursor_fling_active(&self) -> bool {
        self.cursor_animation_job.is_active()
    }

    #[inline]
    pub fn is_scroll_fling_active(&self) -> bool {
        self.scroll_animation_job.is_active()
    }

    #[inline]
    pub fn is_indirect_input_mode(&self) -> bool {
        self.strategy.is_indirect_input_mode()
    }

    // -- Host entry points ------------------------------------------------

    /// Remember the sender used by strategies created on mode changes.
    pub fn init(&mut self, sender: Rc<dyn InputEventSender>) {
        self.sender = Some(sender);
    }

    /// Select the strategy for a new input mode / host capability pair.
    pub fn handle_input_mode_changed(&mut self, mode: InputMode, capability: HostTouchCapability) {
        let Some(sender) = self.sender.clone() else {
            tracing::warn!(?mode, ?capability, "input mode changed before init, ignoring");
            return;
        };
        let strategy = create_input_strategy(mode, capability, sender, &self.config);
        self.set_input_strategy(strategy);
        tracing::debug!(?mode, ?capability, "input strategy selected");
        self.view.cursor_visibility_changed();
    }

    /// Replace the active strategy, stopping any fling first.
    ///
    /// Fling rules differ between input modes, so a running fling never
    /// carries over.
    pub fn set_input_strategy(&mut self, strategy: Box<dyn InputStrategy>) {
        self.cursor_animation_job.abort_animation();
        self.scroll_animation_job.abort_animation();
        self.strategy = strategy;
    }

    /// The view was resized to `width` × `height` screen pixels.
    pub fn handle_client_size_changed(&mut self, width: u32, height: u32) {
        self.render_data.screen_width = width;
        self.render_data.screen_height = height;
        self.pan_gesture_bounds = IntRect::inset_from_size(
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
            self.edge_slop,
        );
        self.resize_image_to_fit_screen();
    }

    /// The remote desktop changed size.
    pub fn handle_host_size_changed(&mut self, width: u32, height: u32) {
        self.render_data.image_width = width;
        self.render_data.image_height = height;
        self.resize_image_to_fit_screen();
    }

    /// System UI (soft keyboard) appeared or went away.
    pub fn handle_system_ui_visibility_changed(&mut self, visibility: SystemUiVisibility) {
        if visibility.soft_input_visible {
            let area = visibility.visible_area;
            self.canvas.set_system_ui_offset_values(
                f64::from(area.left),
                f64::from(area.top),
                f64::from(self.render_data.screen_width) - f64::from(area.right),
                f64::from(self.render_data.screen_height) - f64::from(area.bottom),
            );
        } else {
            self.canvas.set_system_ui_offset_values(0.0, 0.0, 0.0, 0.0);
        }
        self.canvas.reposition_image(&mut self.render_data, true);
    }

    /// Feed one raw touch event; returns whether any detector consumed it.
    pub fn handle_touch_event(&mut self, event: &TouchEvent) -> bool {
        if event.action == TouchAction::Down {
            self.cursor_animation_job.abort_animation();
            self.scroll_animation_job.abort_animation();
            self.view.set_animation_enabled(false);
            self.session = GestureSessionState::default();
        }

        self.strategy.on_motion_event(event, &self.render_data);

        let mut handled = false;
        if let Some(gesture) = self.scroll_detector.on_touch_event(event) {
            handled |= self.on_scroll_gesture(gesture);
        }
        if let Some(gesture) = self.scale_detector.on_touch_event(event) {
            handled |= self.on_scale_gesture(gesture);
        }
        if let Some(gesture) = self.tap_detector.on_touch_event(event) {
            handled |= self.on_tap_gesture(gesture);
        }
        self.swipe_pinch_detector.on_touch_event(event);

        if let TouchAction::PointerDown { .. } = event.action {
            self.session.total_motion_y = 0.0;
        }
        handled
    }

    /// Fire a pending long press if its deadline has passed by `now`.
    ///
    /// `now` is on the same clock as [`TouchEvent::time`]. Returns whether a
    /// long press was recognised.
    pub fn check_long_press(&mut self, now: Duration) -> bool {
        match self.tap_detector.check_long_press(now) {
            Some(gesture) => {
                self.on_tap_gesture(gesture);
                true
            }
            None => false,
        }
    }

    /// Advance both fling jobs by one frame of `dt`.
    ///
    /// Disables the view's animation pump once both are idle. Returns whether
    /// either job is still running.
    pub fn process_animation(&mut self, dt: Duration) -> bool {
        let mut cursor_step = None;
        let mut active = self
            .cursor_animation_job
            .process_animation(dt, |step| cursor_step = Some(step));
        if let Some(step) = cursor_step {
            let delta = self.render_data.screen_vector_to_image(step);
            self.move_viewport_by_offset(-delta);
        }

        let mut scroll_step = None;
        active |= self
            .scroll_animation_job
            .process_animation(dt, |step| scroll_step = Some(step));
        if let Some(step) = scroll_step {
            self.strategy.on_scroll(-step);
        }

        if !active {
            self.view.set_animation_enabled(false);
        }
        active
    }

    // -- Gesture dispatch -------------------------------------------------

    fn on_scroll_gesture(&mut self, gesture: ScrollGesture) -> bool {
        match gesture {
            ScrollGesture::Down { .. } => true,
            ScrollGesture::Scroll {
                start,
                current,
                pointer_count,
                distance,
            } => self.on_scroll(start, current, pointer_count, distance),
            ScrollGesture::Fling { velocity, .. } => self.on_fling(velocity),
        }
    }

    fn on_scale_gesture(&mut self, gesture: ScaleGesture) -> bool {
        match gesture {
            ScaleGesture::Begin(_) => true,
            ScaleGesture::Scale(info) => self.on_scale(info),
            ScaleGesture::End(info) => {
                self.on_scale(info);
                false
            }
        }
    }

    fn on_tap_gesture(&mut self, gesture: TapGesture) -> bool {
        match gesture {
            TapGesture::Tap {
                pointer_count,
                position,
            } => self.on_tap(pointer_count, position),
            TapGesture::LongPress {
                pointer_count,
                position,
            } => {
                self.on_long_press(pointer_count, position);
                true
            }
        }
    }

    /// One or more fingers dragged; `distance` is previous minus current focus.
    fn on_scroll(&mut self, start: Point, current: Point, pointer_count: usize, distance: Vec2) -> bool {
        // Pans from the screen edge are system UI swipes.
        if !self
            .pan_gesture_bounds
            .contains(start.x as i32, start.y as i32)
        {
            tracing::trace!(x = start.x, y = start.y, "pan started in edge slop, ignoring");
            self.session.suppress_cursor_movement = true;
            return false;
        }

        if pointer_count >= 3 && !self.session.swipe_completed {
            // Dragging downwards yields a negative distance.
            self.session.total_motion_y -= distance.y;
            return self.on_swipe();
        }

        if pointer_count == 2 && self.swipe_pinch_detector.is_swiping() {
            if !self.strategy.is_indirect_input_mode() {
                // The scroll must reach the window under the fingers.
                self.move_cursor_to_screen_point(start);
            }
            self.strategy.on_scroll(distance);
            self.session.suppress_cursor_movement = true;
            self.session.scroll_fling = true;
            return true;
        }

        if pointer_count != 1 || self.session.suppress_cursor_movement {
            return false;
        }

        let delta = self.render_data.screen_vector_to_image(distance);
        self.move_viewport_by_offset(delta);
        if !self.strategy.is_indirect_input_mode() && self.session.is_dragging {
            self.move_cursor_to_screen_point(current);
        }
        true
    }

    fn on_fling(&mut self, velocity: Vec2) -> bool {
        if self.session.suppress_fling {
            return false;
        }

        if self.session.scroll_fling {
            self.scroll_animation_job.start_animation(velocity);
            self.view.set_animation_enabled(true);
            self.session.scroll_fling = false;
            tracing::debug!(vx = velocity.x, vy = velocity.y, "scroll fling started");
            return true;
        }

        if self.session.suppress_cursor_movement {
            return false;
        }

        self.cursor_animation_job.start_animation(velocity);
        self.view.set_animation_enabled(true);
        tracing::debug!(vx = velocity.x, vy = velocity.y, "cursor fling started");
        true
    }

    fn on_scale(&mut self, info: ScaleInfo) -> bool {
        if !self.swipe_pinch_detector.is_pinching() {
            return false;
        }
        if !(info.scale_factor.is_finite() && info.scale_factor > 0.0) {
            tracing::warn!(factor = info.scale_factor, "ignoring degenerate scale factor");
            return false;
        }
        self.render_data.post_scale(info.scale_factor, info.focus);

        // Indirect modes zoom around the cursor, direct modes around the fingers.
        let follow_cursor = self.strategy.is_indirect_input_mode();
        self.canvas
            .reposition_image_with_zoom(&mut self.render_data, follow_cursor);
        true
    }

    fn on_tap(&mut self, pointer_count: usize, position: Point) -> bool {
        let Some(button) = MouseButton::from_pointer_count(pointer_count) else {
            return false;
        };

        if !self.strategy.is_indirect_input_mode() {
            if self.screen_point_lies_outside_image_boundary(position) {
                tracing::trace!(x = position.x, y = position.y, "tap outside image, ignoring");
                return false;
            }
            self.move_cursor_to_screen_point(position);
        }

        if self.strategy.on_tap(button, &self.render_data) {
            let feedback = self.strategy.short_press_feedback_type();
            self.view
                .show_input_feedback(feedback, self.render_data.cursor_position());
        }
        true
    }

    fn on_long_press(&mut self, pointer_count: usize, position: Point) {
        let Some(button) = MouseButton::from_pointer_count(pointer_count) else {
            return;
        };

        if !self.strategy.is_indirect_input_mode() {
            if self.screen_point_lies_outside_image_boundary(position) {
                tracing::trace!(x = position.x, y = position.y, "long press outside image, ignoring");
                return;
            }
            self.move_cursor_to_screen_point(position);
        }

        if self.strategy.on_press_and_hold(button, &self.render_data) {
            let feedback = self.strategy.long_press_feedback_type();
            self.view
                .show_input_feedback(feedback, self.render_data.cursor_position());
            self.session.suppress_fling = true;
            self.session.is_dragging = true;
        }
    }

    /// Fire the 3+-finger swipe once vertical travel passes the threshold.
    fn on_swipe(&mut self) -> bool {
        let total = self.session.total_motion_y;
        if total > self.swipe_threshold {
            self.view.show_action_bar();
        } else if total < -self.swipe_threshold {
            self.view.show_keyboard();
        } else {
            return false;
        }
        tracing::debug!(total_motion_y = total, "multi-finger swipe");

        self.session.suppress_cursor_movement = true;
        self.session.suppress_fling = true;
        self.session.swipe_completed = true;
        true
    }

    // -- Viewport and cursor ----------------------------------------------

    /// Move the desired viewport centre by `delta` (image coordinates).
    fn move_viewport_by_offset(&mut self, delta: Vec2) {
        let indirect = self.strategy.is_indirect_input_mode();
        // Trackpad and drag follow the finger rather than the content.
        let follow_cursor = indirect || self.session.is_dragging;
        let delta = if follow_cursor { -delta } else { delta };

        let position = self
            .canvas
            .move_viewport_center(&self.render_data, !follow_cursor, delta);
        if indirect {
            self.move_cursor(position);
        }
        self.canvas.reposition_image(&mut self.render_data, true);
    }

    fn move_cursor_to_screen_point(&mut self, screen: Point) {
        let image = self.render_data.map_screen_point_to_image_point(screen);
        self.move_cursor(image);
    }

    fn move_cursor(&mut self, position: Point) {
        if self.render_data.set_cursor_position(position) {
            let cursor = self.render_data.cursor_position();
            self.strategy
                .inject_cursor_move_event(cursor.x as i32, cursor.y as i32);
        }
        self.view.cursor_moved();
    }

    fn screen_point_lies_outside_image_boundary(&self, screen: Point) -> bool {
        let image = self.render_data.map_screen_point_to_image_point(screen);
        let epsilon = self.config.image_edge_epsilon;
        let width = f64::from(self.render_data.image_width) + epsilon;
        let height = f64::from(self.render_data.image_height) + epsilon;
        image.x < -epsilon || image.x > width || image.y < -epsilon || image.y > height
    }

    fn resize_image_to_fit_screen(&mut self) {
        self.canvas.resize_image_to_fit_screen(&mut self.render_data);

        let center = Point::new(
            f64::from(self.render_data.screen_width) / 2.0,
            f64::from(self.render_data.screen_height) / 2.0,
        );
        let image_center = self.render_data.map_screen_point_to_image_point(center);
        self.canvas.set_viewport_position(image_center);
        self.move_cursor_to_screen_point(center);
        self.canvas.reposition_image(&mut self.render_data, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::InputFeedbackType;
    use rdtouch_core::{Affine, TouchPointer};

    #[derive(Debug, Default)]
    struct TestView {
        animation_enabled: bool,
        action_bar: usize,
        keyboard: usize,
        feedback: Vec<(InputFeedbackType, Point)>,
    }

    impl DesktopView for TestView {
        fn set_animation_enabled(&mut self, enabled: bool) {
            self.animation_enabled = enabled;
        }
        fn show_action_bar(&mut self) {
            self.action_bar += 1;
        }
        fn show_keyboard(&mut self) {
            self.keyboard += 1;
        }
        fn show_input_feedback(&mut self, feedback: InputFeedbackType, position: Point) {
            self.feedback.push((feedback, position));
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn handler() -> TouchInputHandler<TestView> {
        let mut h = TouchInputHandler::new(TestView::default(), TouchConfig::default());
        h.handle_client_size_changed(800, 600);
        h.handle_host_size_changed(1600, 1200);
        h
    }

    fn fingers(action: TouchAction, xs: &[f64], y: f64, t: u64) -> TouchEvent {
        let pointers = xs
            .iter()
            .enumerate()
            .map(|(i, x)| TouchPointer::new(i as u32, *x, y))
            .collect();
        TouchEvent::new(action, pointers, ms(t))
    }

    #[test]
    fn size_changes_fit_image_and_centre_cursor() {
        let h = handler();
        assert!((h.render_data().scale() - 0.5).abs() < 1e-12);
        assert_eq!(h.render_data().cursor_position(), Point::new(800.0, 600.0));
        assert_eq!(h.pan_gesture_bounds(), IntRect::new(12, 12, 788, 588));
    }

    #[test]
    fn fling_then_down_aborts() {
        let mut h = handler();
        h.render_data_mut().transform = Affine::scale(2.0);
        h.canvas_mut().set_viewport_position(Point::new(800.0, 600.0));
        h.handle_touch_event(&TouchEvent::down(400.0, 300.0, ms(0)));
        for i in 1..=5u64 {
            h.handle_touch_event(&TouchEvent::move_to(400.0 + i as f64 * 30.0, 300.0, ms(i * 10)));
        }
        h.handle_touch_event(&TouchEvent::up(550.0, 300.0, ms(60)));
        assert!(h.is_cursor_fling_active());
        assert!(h.view().animation_enabled);

        h.handle_touch_event(&TouchEvent::down(400.0, 300.0, ms(100)));
        assert!(!h.is_cursor_fling_active());
        assert!(!h.view().animation_enabled);
    }

    #[test]
    fn pan_from_edge_is_ignored() {
        let mut h = handler();
        h.render_data_mut().transform = Affine::scale(2.0);
        h.canvas_mut().set_viewport_position(Point::new(800.0, 600.0));
        let before = h.canvas().viewport_position();
        h.handle_touch_event(&TouchEvent::down(5.0, 300.0, ms(0)));
        h.handle_touch_event(&TouchEvent::move_to(60.0, 300.0, ms(10)));
        assert_eq!(h.canvas().viewport_position(), before);
        assert!(h.session().suppress_cursor_movement);
    }

    #[test]
    fn three_finger_swipe_down_shows_action_bar_once() {
        let mut h = handler();
        h.handle_touch_event(&TouchEvent::down(300.0, 200.0, ms(0)));
        h.handle_touch_event(&fingers(TouchAction::PointerDown { index: 1 }, &[300.0, 350.0], 200.0, 1));
        h.handle_touch_event(&fingers(
            TouchAction::PointerDown { index: 2 },
            &[300.0, 350.0, 400.0],
            200.0,
            2,
        ));
        for (i, y) in [215.0, 230.0, 245.0, 260.0, 200.0, 140.0].into_iter().enumerate() {
            h.handle_touch_event(&fingers(TouchAction::Move, &[300.0, 350.0, 400.0], y, 10 + i as u64));
        }
        assert_eq!(h.view().action_bar, 1);
        assert_eq!(h.view().keyboard, 0);
        assert!(h.session().swipe_completed);
    }

    #[test]
    fn tap_outside_image_is_dropped() {
        let mut h = TouchInputHandler::new(TestView::default(), TouchConfig::default());
        h.handle_client_size_changed(800, 600);
        // Letterboxed: 400x400 image fills 600x600 centred horizontally.
        h.handle_host_size_changed(400, 400);
        let cursor = h.render_data().cursor_position();
        h.handle_touch_event(&TouchEvent::down(50.0, 300.0, ms(0)));
        assert!(!h.handle_touch_event(&TouchEvent::up(50.0, 300.0, ms(50))));
        assert_eq!(h.render_data().cursor_position(), cursor);
    }

    #[test]
    fn input_mode_change_before_init_is_ignored() {
        let mut h = handler();
        h.handle_input_mode_changed(InputMode::Trackpad, HostTouchCapability::Unsupported);
        assert!(!h.is_indirect_input_mode());
    }
}
