#![forbid(unsafe_code)]

//! Native touch forwarding for hosts that accept touch input.
//!
//! Raw events are not sent as they arrive: most touch sequences are local
//! pans and zooms that the host must never see. Instead every event of the
//! current sequence is converted to image coordinates and queued. When the
//! handler recognises a gesture meant for the host (a tap, a press-and-hold,
//! or a two-finger scroll), the queue is replayed and the strategy switches
//! to forwarding live events until the sequence ends.
//!
//! # Failure Modes
//!
//! | Condition | Behaviour |
//! |-----------|-----------|
//! | Queue reaches its bound | Queue dropped; nothing from this sequence is sent |
//! | Tap with a button other than left | Not handled |
//! | Gesture recognised with an empty queue | Not handled |

use std::rc::Rc;

use rdtouch_core::{RenderData, TouchAction, TouchEvent, Vec2};

use super::{
    InputEventSender, InputFeedbackType, InputStrategy, MouseButton, RemoteTouchEventKind,
    RemoteTouchPoint,
};
use crate::config::TouchConfig;

type RemoteTouchEvent = (RemoteTouchEventKind, Vec<RemoteTouchPoint>);

/// Replays recognised touch sequences to the host as touch events.
pub struct TouchInputStrategy {
    sender: Rc<dyn InputEventSender>,
    max_queued_events: usize,
    queued: Vec<RemoteTouchEvent>,
    overflowed: bool,
    in_remote_mode: bool,
}

impl TouchInputStrategy {
    #[must_use]
    pub fn new(sender: Rc<dyn InputEventSender>, config: &TouchConfig) -> Self {
        Self {
            sender,
            max_queued_events: config.max_queued_touch_events,
            queued: Vec::new(),
            overflowed: false,
            in_remote_mode: false,
        }
    }

    /// Whether live events are currently forwarded to the host.
    #[must_use]
    pub fn is_in_remote_mode(&self) -> bool {
        self.in_remote_mode
    }

    /// Number of events waiting for a gesture to be recognised.
    #[must_use]
    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    fn reset(&mut self) {
        self.queued.clear();
        self.overflowed = false;
        self.in_remote_mode = false;
    }

    fn enqueue(&mut self, remote: RemoteTouchEvent) {
        if self.overflowed {
            return;
        }
        if self.queued.len() >= self.max_queued_events {
            tracing::debug!(
                limit = self.max_queued_events,
                "touch queue full, dropping sequence"
            );
            self.queued.clear();
            self.overflowed = true;
            return;
        }
        self.queued.push(remote);
    }

    /// Send the queue and forward live events from now on.
    fn replay(&mut self) -> bool {
        if self.queued.is_empty() {
            return false;
        }
        for (kind, points) in self.queued.drain(..) {
            self.sender.send_touch_event(kind, &points);
        }
        self.in_remote_mode = true;
        true
    }

    fn to_remote(event: &TouchEvent, render_data: &RenderData) -> RemoteTouchEvent {
        let point = |index: usize| {
            event.pointers.get(index).map(|p| RemoteTouchPoint {
                id: p.id,
                position: render_data.map_screen_point_to_image_point(p.position),
            })
        };
        let all = || -> Vec<RemoteTouchPoint> {
            (0..event.pointer_count()).filter_map(&point).collect()
        };
        match event.action {
            TouchAction::Down => (RemoteTouchEventKind::Start, point(0).into_iter().collect()),
            TouchAction::Up => (RemoteTouchEventKind::End, point(0).into_iter().collect()),
            TouchAction::PointerDown { index } => {
                (RemoteTouchEventKind::Start, point(index).into_iter().collect())
            }
            TouchAction::PointerUp { index } => {
                (RemoteTouchEventKind::End, point(index).into_iter().collect())
            }
            TouchAction::Move => (RemoteTouchEventKind::Move, all()),
            TouchAction::Cancel => (RemoteTouchEventKind::Cancel, all()),
        }
    }
}

impl InputStrategy for TouchInputStrategy {
    fn on_tap(&mut self, button: MouseButton, _render_data: &RenderData) -> bool {
        if button != MouseButton::Left {
            return false;
        }
        let handled = self.replay();
        // The tap arrives after the sequence ended.
        self.in_remote_mode = false;
        handled
    }

    fn on_press_and_hold(&mut self, button: MouseButton, _render_data: &RenderData) -> bool {
        button == MouseButton::Left && self.replay()
    }

    fn on_motion_event(&mut self, event: &TouchEvent, render_data: &RenderData) {
        if event.action == TouchAction::Down {
            self.reset();
        }
        let remote = Self::to_remote(event, render_data);
        if self.in_remote_mode {
            self.sender.send_touch_event(remote.0, &remote.1);
            if event.is_sequence_end() {
                self.in_remote_mode = false;
            }
        } else {
            self.enqueue(remote);
        }
    }

    fn on_scroll(&mut self, _distance: Vec2) {
        if !self.in_remote_mode {
            self.replay();
        }
    }

    fn inject_cursor_move_event(&mut self, _x: i32, _y: i32) {}

    fn short_press_feedback_type(&self) -> InputFeedbackType {
        InputFeedbackType::None
    }

    fn long_press_feedback_type(&self) -> InputFeedbackType {
        InputFeedbackType::None
    }

    fn is_indirect_input_mode(&self) -> bool {
        false
    }
}
