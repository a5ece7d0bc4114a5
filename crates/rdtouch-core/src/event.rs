#![forbid(unsafe_code)]

//! Raw multi-touch events as delivered by the host view.
//!
//! A [`TouchEvent`] is a snapshot of every pointer currently on the screen,
//! tagged with the action that produced it. Pointer-level actions
//! ([`TouchAction::PointerDown`] / [`TouchAction::PointerUp`]) carry the index
//! of the pointer that changed; the pointer list still includes it.
//!
//! # Design Notes
//!
//! - Coordinates are screen pixels, origin at the top-left of the view.
//! - `time` is a monotonic timestamp; only differences between events matter.
//! - A touch sequence starts with `Down` and ends with `Up` or `Cancel`.

use std::time::Duration;

use crate::geometry::Point;

/// What happened to produce a [`TouchEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchAction {
    /// First pointer touched the screen.
    Down,
    /// One or more pointers moved.
    Move,
    /// An additional pointer touched the screen.
    PointerDown {
        /// Index into [`TouchEvent::pointers`] of the new pointer.
        index: usize,
    },
    /// A pointer left the screen while others remain.
    PointerUp {
        /// Index into [`TouchEvent::pointers`] of the lifted pointer.
        index: usize,
    },
    /// The last pointer left the screen.
    Up,
    /// The sequence was aborted by the platform.
    Cancel,
}

/// One finger on the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPointer {
    /// Stable identifier for the lifetime of the finger's contact.
    pub id: u32,
    /// Screen position in pixels.
    pub position: Point,
}

impl TouchPointer {
    #[inline]
    pub fn new(id: u32, x: f64, y: f64) -> Self {
        Self {
            id,
            position: Point::new(x, y),
        }
    }
}

/// A raw touch event with one or more pointers.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub action: TouchAction,
    pub pointers: Vec<TouchPointer>,
    pub time: Duration,
}

impl TouchEvent {
    pub fn new(action: TouchAction, pointers: Vec<TouchPointer>, time: Duration) -> Self {
        Self {
            action,
            pointers,
            time,
        }
    }

    /// Single-pointer `Down` at `(x, y)`.
    pub fn down(x: f64, y: f64, time: Duration) -> Self {
        Self::new(TouchAction::Down, vec![TouchPointer::new(0, x, y)], time)
    }

    /// Single-pointer `Move` to `(x, y)`.
    pub fn move_to(x: f64, y: f64, time: Duration) -> Self {
        Self::new(TouchAction::Move, vec![TouchPointer::new(0, x, y)], time)
    }

    /// Single-pointer `Up` at `(x, y)`.
    pub fn up(x: f64, y: f64, time: Duration) -> Self {
        Self::new(TouchAction::Up, vec![TouchPointer::new(0, x, y)], time)
    }

    /// Number of pointers in this event.
    #[inline]
    #[must_use]
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Position of the pointer at `index`.
    #[inline]
    #[must_use]
    pub fn position(&self, index: usize) -> Option<Point> {
        self.pointers.get(index).map(|p| p.position)
    }

    /// Position of the first pointer, or the origin for an empty event.
    #[inline]
    #[must_use]
    pub fn first_position(&self) -> Point {
        self.position(0).unwrap_or(Point::ORIGIN)
    }

    /// Index of the pointer that caused a pointer-level action, `0` otherwise.
    #[inline]
    #[must_use]
    pub fn action_index(&self) -> usize {
        match self.action {
            TouchAction::PointerDown { index } | TouchAction::PointerUp { index } => index,
            _ => 0,
        }
    }

    /// Whether this event ends the touch sequence.
    #[inline]
    #[must_use]
    pub fn is_sequence_end(&self) -> bool {
        matches!(self.action, TouchAction::Up | TouchAction::Cancel)
    }

    /// Index of the pointer leaving the screen with this event, if any.
    #[must_use]
    pub fn lifting_index(&self) -> Option<usize> {
        match self.action {
            TouchAction::PointerUp { index } => Some(index),
            TouchAction::Up => Some(0),
            _ => None,
        }
    }

    /// Iterate the pointers that remain on the screen after this event.
    pub fn remaining_pointers(&self) -> impl Iterator<Item = &TouchPointer> {
        let skip = match self.action {
            TouchAction::PointerUp { index } => Some(index),
            _ => None,
        };
        self.pointers
            .iter()
            .enumerate()
            .filter(move |(i, _)| Some(*i) != skip)
            .map(|(_, p)| p)
    }

    /// Average position of the pointers that remain on the screen.
    ///
    /// Returns `None` when no pointer remains.
    #[must_use]
    pub fn focus(&self) -> Option<Point> {
        let mut sum = (0.0, 0.0);
        let mut count = 0usize;
        for p in self.remaining_pointers() {
            sum.0 += p.position.x;
            sum.1 += p.position.y;
            count += 1;
        }
        (count > 0).then(|| Point::new(sum.0 / count as f64, sum.1 / count as f64))
    }
}
