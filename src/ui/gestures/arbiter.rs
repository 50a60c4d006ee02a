// SPDX-License-Identifier: MPL-2.0
//! Merges the recognizers into one ordered gesture stream.

use super::pointer::{PointerEvent, PointerTracker};
use super::precedence::{GestureKind, Precedence, PrecedenceTable};
use super::recognizers::{self, Recognizer};
use super::GestureEvent;
use crate::config::Settings;
use std::time::Duration;

/// Runs every recognizer on each input and applies the precedence table.
///
/// - Recognizers see each event in precedence order.
/// - When a recognizer fires, everything it cancels receives a cancel and
///   stays blocked until all pointers are up.
/// - Output of a recognizer that waits on another is held back until that
///   other one is no longer pending, or dropped if it fires.
#[derive(Debug)]
pub struct Arbiter {
    table: PrecedenceTable,
    tracker: PointerTracker,
    recognizers: Vec<Box<dyn Recognizer>>,
    blocked: [bool; 5],
    held: Vec<GestureEvent>,
}

impl Arbiter {
    /// Arbiter with the viewer's precedence tree.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self::with_precedence(settings, &Precedence::viewer_default())
    }

    #[must_use]
    pub fn with_precedence(settings: &Settings, precedence: &Precedence) -> Self {
        let table = precedence.table();
        let recognizers = table
            .order()
            .iter()
            .map(|kind| recognizers::build(*kind, settings))
            .collect();
        Self {
            table,
            tracker: PointerTracker::new(),
            recognizers,
            blocked: [false; 5],
            held: Vec::new(),
        }
    }

    /// Number of pointers currently in contact.
    #[must_use]
    pub fn pointer_count(&self) -> usize {
        self.tracker.count()
    }

    /// Feeds one raw pointer event.
    ///
    /// Events inconsistent with the tracked contacts are ignored.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<GestureEvent> {
        if !self.tracker.apply(&event) {
            tracing::debug!(?event, "ignoring inconsistent pointer event");
            return Vec::new();
        }

        let mut out = Vec::new();
        for index in 0..self.recognizers.len() {
            let kind = self.recognizers[index].kind();
            if self.blocked[kind.index()] {
                continue;
            }
            let mut produced = Vec::new();
            self.recognizers[index].on_pointer(&event, &self.tracker, &mut produced);
            self.route(kind, produced, &mut out);
        }
        self.release_held(&mut out);

        if self.tracker.count() == 0 {
            self.blocked = [false; 5];
        }
        out
    }

    /// Advances recognizer timers to `now`.
    pub fn tick(&mut self, now: Duration) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        for index in 0..self.recognizers.len() {
            let kind = self.recognizers[index].kind();
            if self.blocked[kind.index()] {
                continue;
            }
            let mut produced = Vec::new();
            self.recognizers[index].on_tick(now, &mut produced);
            self.route(kind, produced, &mut out);
        }
        self.release_held(&mut out);
        out
    }

    /// Drops all contacts and recognition state without emitting anything.
    pub fn reset(&mut self) {
        let mut discarded = Vec::new();
        for recognizer in &mut self.recognizers {
            recognizer.cancel(&mut discarded);
        }
        self.tracker.clear();
        self.blocked = [false; 5];
        self.held.clear();
    }

    fn recognizer_mut(&mut self, kind: GestureKind) -> Option<&mut Box<dyn Recognizer>> {
        self.recognizers.iter_mut().find(|r| r.kind() == kind)
    }

    fn is_pending(&self, kind: GestureKind) -> bool {
        self.recognizers
            .iter()
            .any(|r| r.kind() == kind && r.is_pending())
    }

    fn must_wait(&self, kind: GestureKind) -> bool {
        self.table.waits_on(kind).any(|other| self.is_pending(other))
    }

    fn route(&mut self, kind: GestureKind, produced: Vec<GestureEvent>, out: &mut Vec<GestureEvent>) {
        if produced.is_empty() {
            return;
        }

        if self.must_wait(kind) {
            self.held.extend(produced);
        } else {
            out.extend(produced);
        }

        let losers: Vec<GestureKind> = self.table.cancelled_by(kind).collect();
        for loser in losers {
            if self.blocked[loser.index()] {
                continue;
            }
            tracing::debug!(winner = ?kind, ?loser, "gesture pre-empted");
            self.blocked[loser.index()] = true;
            self.held.retain(|event| event.kind() != loser);
            if let Some(recognizer) = self.recognizer_mut(loser) {
                recognizer.cancel(out);
            }
        }
    }

    fn release_held(&mut self, out: &mut Vec<GestureEvent>) {
        if self.held.is_empty() {
            return;
        }
        let held = std::mem::take(&mut self.held);
        for event in held {
            if self.must_wait(event.kind()) {
                self.held.push(event);
            } else {
                out.push(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::gestures::pointer::Phase;
    use iced_core::Point;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn arbiter() -> Arbiter {
        Arbiter::new(&Settings::default())
    }

    fn kinds(events: &[GestureEvent]) -> Vec<GestureKind> {
        events.iter().map(GestureEvent::kind).collect()
    }

    #[test]
    fn single_tap_is_delivered_after_double_tap_window() {
        let mut arbiter = arbiter();
        arbiter.handle_pointer(PointerEvent::down(1, 100.0, 100.0, ms(0)));
        assert!(arbiter
            .handle_pointer(PointerEvent::up(1, 100.0, 100.0, ms(80)))
            .is_empty());
        assert!(arbiter.tick(ms(300)).is_empty());

        let out = arbiter.tick(ms(400));
        assert_eq!(
            out,
            vec![GestureEvent::Tap {
                position: Point::new(100.0, 100.0)
            }]
        );
    }

    #[test]
    fn double_tap_swallows_pending_single_tap() {
        let mut arbiter = arbiter();
        arbiter.handle_pointer(PointerEvent::down(1, 100.0, 100.0, ms(0)));
        arbiter.handle_pointer(PointerEvent::up(1, 100.0, 100.0, ms(60)));
        arbiter.handle_pointer(PointerEvent::down(1, 102.0, 100.0, ms(150)));
        let out = arbiter.handle_pointer(PointerEvent::up(1, 102.0, 100.0, ms(200)));

        assert_eq!(kinds(&out), vec![GestureKind::DoubleTap]);
        assert!(arbiter.tick(ms(1000)).is_empty());
    }

    #[test]
    fn long_press_cancels_active_pinch_and_pan() {
        let mut arbiter = arbiter();
        arbiter.handle_pointer(PointerEvent::down(1, 300.0, 300.0, ms(0)));
        arbiter.handle_pointer(PointerEvent::down(2, 500.0, 300.0, ms(20)));
        let out = arbiter.handle_pointer(PointerEvent::moved(2, 700.0, 300.0, ms(100)));
        assert!(kinds(&out).contains(&GestureKind::Pinch));

        let out = arbiter.tick(ms(500));
        assert_eq!(
            out,
            vec![
                GestureEvent::LongPress {
                    position: Point::new(300.0, 300.0)
                },
                GestureEvent::PinchCancelled,
                GestureEvent::PanCancelled,
            ]
        );

        // Losers stay silent until every finger lifts.
        let out = arbiter.handle_pointer(PointerEvent::moved(2, 800.0, 300.0, ms(520)));
        assert!(out.is_empty());
        arbiter.handle_pointer(PointerEvent::up(2, 800.0, 300.0, ms(540)));
        arbiter.handle_pointer(PointerEvent::up(1, 300.0, 300.0, ms(560)));

        arbiter.handle_pointer(PointerEvent::down(1, 0.0, 0.0, ms(1000)));
        let out = arbiter.handle_pointer(PointerEvent::moved(1, 0.0, 40.0, ms(1016)));
        assert_eq!(kinds(&out), vec![GestureKind::Pan, GestureKind::Pan]);
    }

    #[test]
    fn pinch_and_pan_fire_together() {
        let mut arbiter = arbiter();
        arbiter.handle_pointer(PointerEvent::down(1, 300.0, 300.0, ms(0)));
        arbiter.handle_pointer(PointerEvent::down(2, 500.0, 300.0, ms(10)));
        let out = arbiter.handle_pointer(PointerEvent::moved(2, 560.0, 300.0, ms(30)));

        let kinds = kinds(&out);
        assert!(kinds.contains(&GestureKind::Pinch));
        assert!(kinds.contains(&GestureKind::Pan));
    }

    #[test]
    fn inconsistent_events_are_ignored() {
        let mut arbiter = arbiter();
        assert!(arbiter
            .handle_pointer(PointerEvent::moved(9, 10.0, 10.0, ms(0)))
            .is_empty());
        assert!(arbiter
            .handle_pointer(PointerEvent::up(9, 10.0, 10.0, ms(5)))
            .is_empty());
        assert_eq!(arbiter.pointer_count(), 0);
    }

    #[test]
    fn platform_cancel_ends_continuous_gestures() {
        let mut arbiter = arbiter();
        arbiter.handle_pointer(PointerEvent::down(1, 0.0, 0.0, ms(0)));
        arbiter.handle_pointer(PointerEvent::moved(1, 0.0, 50.0, ms(16)));
        let out = arbiter.handle_pointer(PointerEvent::new(
            1,
            Phase::Cancel,
            Point::new(0.0, 50.0),
            ms(32),
        ));
        assert_eq!(out, vec![GestureEvent::PanCancelled]);
        assert_eq!(arbiter.pointer_count(), 0);
    }

    #[test]
    fn reset_is_silent() {
        let mut arbiter = arbiter();
        arbiter.handle_pointer(PointerEvent::down(1, 0.0, 0.0, ms(0)));
        arbiter.handle_pointer(PointerEvent::up(1, 0.0, 0.0, ms(50)));
        arbiter.reset();
        assert!(arbiter.tick(ms(1000)).is_empty());
    }
}
