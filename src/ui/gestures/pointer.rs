// SPDX-License-Identifier: MPL-2.0
//! Raw pointer input and the bookkeeping shared by all recognizers.

use iced_core::{Point, Vector};
use std::collections::VecDeque;
use std::time::Duration;

/// Identifier of one finger (or mouse button) for the lifetime of a touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Down,
    Move,
    Up,
    /// The platform took the touch away (system gesture, window lost focus).
    Cancel,
}

/// One raw pointer sample, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub phase: Phase,
    pub position: Point,
    pub time: Duration,
}

impl PointerEvent {
    #[must_use]
    pub fn new(id: u64, phase: Phase, position: Point, time: Duration) -> Self {
        Self {
            id: PointerId(id),
            phase,
            position,
            time,
        }
    }

    #[must_use]
    pub fn down(id: u64, x: f32, y: f32, time: Duration) -> Self {
        Self::new(id, Phase::Down, Point::new(x, y), time)
    }

    #[must_use]
    pub fn moved(id: u64, x: f32, y: f32, time: Duration) -> Self {
        Self::new(id, Phase::Move, Point::new(x, y), time)
    }

    #[must_use]
    pub fn up(id: u64, x: f32, y: f32, time: Duration) -> Self {
        Self::new(id, Phase::Up, Point::new(x, y), time)
    }
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f32 {
    let d = a - b;
    d.x.hypot(d.y)
}

/// Length of a vector.
#[must_use]
pub fn magnitude(v: Vector) -> f32 {
    v.x.hypot(v.y)
}

/// Midpoint of two points.
#[must_use]
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivePointer {
    pub id: PointerId,
    pub start: Point,
    pub position: Point,
    pub down_at: Duration,
}

/// Pointers currently in contact, in the order they went down.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    pointers: Vec<ActivePointer>,
}

impl PointerTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `event`. Returns `false` for events that make no sense given
    /// the current contacts (move of an unknown pointer, duplicate down);
    /// such events must be ignored by recognizers.
    pub fn apply(&mut self, event: &PointerEvent) -> bool {
        let index = self.pointers.iter().position(|p| p.id == event.id);
        match (event.phase, index) {
            (Phase::Down, None) => {
                self.pointers.push(ActivePointer {
                    id: event.id,
                    start: event.position,
                    position: event.position,
                    down_at: event.time,
                });
                true
            }
            (Phase::Move, Some(i)) => {
                self.pointers[i].position = event.position;
                true
            }
            (Phase::Up, Some(i)) => {
                self.pointers.remove(i);
                true
            }
            (Phase::Cancel, _) => {
                self.pointers.clear();
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.pointers.clear();
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.pointers.len()
    }

    /// First pointer still in contact.
    #[must_use]
    pub fn primary(&self) -> Option<&ActivePointer> {
        self.pointers.first()
    }

    #[must_use]
    pub fn get(&self, id: PointerId) -> Option<&ActivePointer> {
        self.pointers.iter().find(|p| p.id == id)
    }

    /// The two oldest contacts, used for pinch geometry.
    #[must_use]
    pub fn first_two(&self) -> Option<(&ActivePointer, &ActivePointer)> {
        match self.pointers.as_slice() {
            [a, b, ..] => Some((a, b)),
            _ => None,
        }
    }

    /// Average position of all contacts.
    #[must_use]
    pub fn centroid(&self) -> Option<Point> {
        if self.pointers.is_empty() {
            return None;
        }
        let n = self.pointers.len() as f32;
        let (sx, sy) = self
            .pointers
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.position.x, sy + p.position.y));
        Some(Point::new(sx / n, sy / n))
    }
}

/// Estimates velocity from the samples of the last `window`.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    window: Duration,
    samples: VecDeque<(Duration, Vector)>,
}

/// Samples kept at most; older ones fall outside any sensible window.
const MAX_SAMPLES: usize = 20;

impl VelocityTracker {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            samples: VecDeque::with_capacity(MAX_SAMPLES),
        }
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    pub fn add(&mut self, time: Duration, translation: Vector) {
        if self.samples.len() == MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back((time, translation));
    }

    /// Velocity in px/s at `now`. A pointer that rested longer than the
    /// window before `now` has zero velocity.
    #[must_use]
    pub fn velocity(&self, now: Duration) -> Vector {
        let cutoff = now.saturating_sub(self.window);
        let mut recent = self.samples.iter().filter(|(t, _)| *t >= cutoff);

        let Some(&(t0, v0)) = recent.next() else {
            return Vector::new(0.0, 0.0);
        };
        let Some(&(t1, v1)) = recent.last() else {
            return Vector::new(0.0, 0.0);
        };

        let dt = t1.saturating_sub(t0).as_secs_f32();
        if dt <= f32::EPSILON {
            return Vector::new(0.0, 0.0);
        }
        Vector::new((v1.x - v0.x) / dt, (v1.y - v0.y) / dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn tracker_follows_down_move_up() {
        let mut tracker = PointerTracker::new();
        assert!(tracker.apply(&PointerEvent::down(1, 10.0, 10.0, ms(0))));
        assert!(tracker.apply(&PointerEvent::down(2, 30.0, 10.0, ms(5))));
        assert_eq!(tracker.count(), 2);
        assert_eq!(tracker.centroid(), Some(Point::new(20.0, 10.0)));

        assert!(tracker.apply(&PointerEvent::moved(2, 50.0, 10.0, ms(10))));
        assert_eq!(tracker.get(PointerId(2)).map(|p| p.position.x), Some(50.0));

        assert!(tracker.apply(&PointerEvent::up(1, 10.0, 10.0, ms(20))));
        assert_eq!(tracker.primary().map(|p| p.id), Some(PointerId(2)));
    }

    #[test]
    fn tracker_rejects_inconsistent_events() {
        let mut tracker = PointerTracker::new();
        assert!(!tracker.apply(&PointerEvent::moved(7, 0.0, 0.0, ms(0))));
        assert!(tracker.apply(&PointerEvent::down(7, 0.0, 0.0, ms(0))));
        assert!(!tracker.apply(&PointerEvent::down(7, 5.0, 5.0, ms(1))));
        assert_eq!(tracker.count(), 1);
    }

    #[test]
    fn cancel_clears_all_contacts() {
        let mut tracker = PointerTracker::new();
        tracker.apply(&PointerEvent::down(1, 0.0, 0.0, ms(0)));
        tracker.apply(&PointerEvent::down(2, 0.0, 0.0, ms(0)));
        tracker.apply(&PointerEvent::new(1, Phase::Cancel, Point::ORIGIN, ms(1)));
        assert_eq!(tracker.count(), 0);
    }

    #[test]
    fn velocity_uses_recent_window() {
        let mut tracker = VelocityTracker::new(ms(100));
        tracker.add(ms(0), Vector::new(0.0, 0.0));
        tracker.add(ms(50), Vector::new(0.0, 50.0));
        tracker.add(ms(100), Vector::new(0.0, 100.0));

        let v = tracker.velocity(ms(100));
        assert_abs_diff_eq!(v.y, 1000.0, epsilon = 0.5);
        assert_abs_diff_eq!(v.x, 0.0);
    }

    #[test]
    fn resting_pointer_has_zero_velocity() {
        let mut tracker = VelocityTracker::new(ms(100));
        tracker.add(ms(0), Vector::new(0.0, 0.0));
        tracker.add(ms(20), Vector::new(0.0, 80.0));

        assert_eq!(tracker.velocity(ms(400)), Vector::new(0.0, 0.0));
    }

    #[test]
    fn geometry_helpers() {
        assert_abs_diff_eq!(distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
        assert_abs_diff_eq!(magnitude(Vector::new(-6.0, 8.0)), 10.0);
        assert_eq!(
            midpoint(Point::new(0.0, 0.0), Point::new(10.0, 20.0)),
            Point::new(5.0, 10.0)
        );
    }
}
