//! Scroll recognizer: turns the host surface's offset mutations into a
//! discrete stream of change records.
//!
//! The recognizer is pure bookkeeping. It keeps the previous and current
//! offset, derives the translation, and notifies subscribers exactly once per
//! recorded mutation, synchronously and on the calling thread. The
//! [`calibrate`](ScrollRecognizer::calibrate) path writes both stored offsets
//! without notifying anyone; that is the primitive behind silent updates.

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::Point;
use crate::subscription::{Observers, Subscription};

/// Phase of the host pan/drag gesture, mapped 1:1 from the host toolkit.
/// `Idle` is the neutral state reported when no gesture (or no host surface)
/// is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TouchPhase {
    #[default]
    Idle,
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// What the host scroll surface is currently doing with its offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollActivity {
    #[default]
    Stable,
    Tracking,
    Dragging,
    Decelerating,
}

/// One recorded offset mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollChange {
    pub previous: Point,
    pub offset: Point,
    pub phase: TouchPhase,
    /// Touch location in the surface's content coordinate space, if a gesture
    /// is in flight.
    pub touch_location: Option<Point>,
}

impl ScrollChange {
    pub fn translation(&self) -> Point {
        self.offset - self.previous
    }
}

pub struct ScrollRecognizer {
    last_offset: Point,
    offset: Point,
    phase: TouchPhase,
    activity: ScrollActivity,
    touch_location: Option<Point>,
    observers: Rc<RefCell<Observers<ScrollChange>>>,
}

impl ScrollRecognizer {
    pub fn new() -> Self {
        Self {
            last_offset: Point::ZERO,
            offset: Point::ZERO,
            phase: TouchPhase::Idle,
            activity: ScrollActivity::Stable,
            touch_location: None,
            observers: Observers::new(),
        }
    }

    pub fn last_offset(&self) -> Point {
        self.last_offset
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn translation(&self) -> Point {
        self.offset - self.last_offset
    }

    pub fn touch_phase(&self) -> TouchPhase {
        self.phase
    }

    pub fn activity(&self) -> ScrollActivity {
        self.activity
    }

    /// Touch location in the surface's content coordinate space. `None` when
    /// no gesture is in flight.
    pub fn touch_location(&self) -> Option<Point> {
        match self.phase {
            TouchPhase::Idle => None,
            _ => self.touch_location,
        }
    }

    /// Update gesture phase and touch location, as delivered by the host.
    pub fn set_touch(&mut self, phase: TouchPhase, location: Option<Point>) {
        self.phase = phase;
        self.touch_location = location;
    }

    pub fn set_activity(&mut self, activity: ScrollActivity) {
        self.activity = activity;
    }

    /// Observe recorded offset mutations. Dropping the returned subscription
    /// unregisters the callback.
    pub fn subscribe(&self, callback: impl FnMut(&ScrollChange) + 'static) -> Subscription {
        Observers::subscribe(&self.observers, callback)
    }

    /// Record a driven offset mutation and notify subscribers once.
    pub(crate) fn record(&mut self, offset: Point) -> ScrollChange {
        self.last_offset = self.offset;
        self.offset = offset;
        let change = ScrollChange {
            previous: self.last_offset,
            offset: self.offset,
            phase: self.phase,
            touch_location: self.touch_location(),
        };
        Observers::notify(&self.observers, &change);
        change
    }

    /// Rewrite both stored offsets without notifying. Afterwards the
    /// translation is zero, so the write cannot be mistaken for a user-driven
    /// delta.
    pub(crate) fn calibrate(&mut self, offset: Point) {
        self.last_offset = offset;
        self.offset = offset;
    }
}

impl Default for ScrollRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_record_tracks_previous_and_translation() {
        let mut recognizer = ScrollRecognizer::new();
        recognizer.record(Point::new(0.0, 10.0));
        let change = recognizer.record(Point::new(0.0, 25.0));

        assert_eq!(change.previous, Point::new(0.0, 10.0));
        assert_eq!(change.offset, Point::new(0.0, 25.0));
        assert_eq!(change.translation(), Point::new(0.0, 15.0));
        assert_eq!(recognizer.translation(), Point::new(0.0, 15.0));
    }

    #[test]
    fn test_record_notifies_exactly_once() {
        let mut recognizer = ScrollRecognizer::new();
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let _subscription = recognizer.subscribe(move |_| count_clone.set(count_clone.get() + 1));

        recognizer.record(Point::new(0.0, 5.0));
        assert_eq!(count.get(), 1);
        recognizer.record(Point::new(0.0, 5.0));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_calibrate_is_silent_and_zeroes_translation() {
        let mut recognizer = ScrollRecognizer::new();
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let _subscription = recognizer.subscribe(move |_| count_clone.set(count_clone.get() + 1));

        recognizer.record(Point::new(0.0, 40.0));
        assert_eq!(count.get(), 1);

        recognizer.calibrate(Point::new(0.0, 100.0));
        assert_eq!(count.get(), 1);
        assert_eq!(recognizer.offset(), Point::new(0.0, 100.0));
        assert_eq!(recognizer.translation(), Point::ZERO);
    }

    #[test]
    fn test_activity_mirrors_host_state() {
        let mut recognizer = ScrollRecognizer::new();
        assert_eq!(recognizer.activity(), ScrollActivity::Stable);

        recognizer.set_activity(ScrollActivity::Dragging);
        assert_eq!(recognizer.activity(), ScrollActivity::Dragging);
        recognizer.set_activity(ScrollActivity::Decelerating);
        assert_eq!(recognizer.activity(), ScrollActivity::Decelerating);
    }

    #[test]
    fn test_touch_location_none_when_idle() {
        let mut recognizer = ScrollRecognizer::new();
        recognizer.set_touch(TouchPhase::Idle, Some(Point::new(5.0, 5.0)));
        assert_eq!(recognizer.touch_location(), None);

        recognizer.set_touch(TouchPhase::Began, Some(Point::new(5.0, 5.0)));
        assert_eq!(recognizer.touch_location(), Some(Point::new(5.0, 5.0)));
    }
}
