// SPDX-License-Identifier: MPL-2.0
//! The five gesture recognizers.
//!
//! Each recognizer sees every pointer event after the shared
//! [`PointerTracker`] has been updated, and appends what it recognized to an
//! output buffer. Recognizers know nothing about each other; conflicts are
//! resolved by the [`Arbiter`](super::Arbiter).

use super::pointer::{
    distance, magnitude, midpoint, Phase, PointerEvent, PointerId, PointerTracker,
    VelocityTracker,
};
use super::{GestureEvent, GestureKind};
use crate::config::Settings;
use iced_core::{Point, Vector};
use std::time::Duration;

/// Common interface of all recognizers.
pub trait Recognizer: std::fmt::Debug {
    fn kind(&self) -> GestureKind;

    /// Feeds one pointer event. `pointers` already reflects the event.
    fn on_pointer(
        &mut self,
        event: &PointerEvent,
        pointers: &PointerTracker,
        out: &mut Vec<GestureEvent>,
    );

    /// Advances timers to `now`.
    fn on_tick(&mut self, _now: Duration, _out: &mut Vec<GestureEvent>) {}

    /// Aborts recognition. Active continuous gestures emit their cancel event.
    fn cancel(&mut self, out: &mut Vec<GestureEvent>);

    /// Whether the recognizer is tracking input and may still fire.
    fn is_pending(&self) -> bool;
}

/// Builds one recognizer of each kind.
#[must_use]
pub fn build(kind: GestureKind, settings: &Settings) -> Box<dyn Recognizer> {
    match kind {
        GestureKind::Tap => Box::new(Tap::new(settings)),
        GestureKind::DoubleTap => Box::new(DoubleTap::new(settings)),
        GestureKind::LongPress => Box::new(LongPress::new(settings)),
        GestureKind::Pinch => Box::new(Pinch::new()),
        GestureKind::Pan => Box::new(Pan::new(settings)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Press {
    id: PointerId,
    start: Point,
    down_at: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TapSignal {
    None,
    Tapped(Point),
    Failed,
}

/// Single-finger press/release detection shared by tap and double tap.
#[derive(Debug, Clone)]
struct TapDetector {
    slop: f32,
    max_duration: Duration,
    press: Option<Press>,
}

impl TapDetector {
    fn new(settings: &Settings) -> Self {
        Self {
            slop: settings.touch_slop,
            max_duration: settings.tap_max_duration,
            press: None,
        }
    }

    fn feed(&mut self, event: &PointerEvent, pointers: &PointerTracker) -> TapSignal {
        match event.phase {
            Phase::Down => {
                if pointers.count() == 1 {
                    self.press = Some(Press {
                        id: event.id,
                        start: event.position,
                        down_at: event.time,
                    });
                    TapSignal::None
                } else {
                    self.fail()
                }
            }
            Phase::Move => match self.press {
                Some(press)
                    if press.id == event.id && distance(press.start, event.position) > self.slop =>
                {
                    self.fail()
                }
                _ => TapSignal::None,
            },
            Phase::Up => match self.press.take() {
                Some(press) if press.id == event.id => {
                    let held = event.time.saturating_sub(press.down_at);
                    if held <= self.max_duration
                        && distance(press.start, event.position) <= self.slop
                    {
                        TapSignal::Tapped(event.position)
                    } else {
                        TapSignal::Failed
                    }
                }
                other => {
                    self.press = other;
                    TapSignal::None
                }
            },
            Phase::Cancel => self.fail(),
        }
    }

    fn fail(&mut self) -> TapSignal {
        if self.press.take().is_some() {
            TapSignal::Failed
        } else {
            TapSignal::None
        }
    }
}

/// One quick touch without movement.
#[derive(Debug, Clone)]
pub struct Tap {
    detector: TapDetector,
}

impl Tap {
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            detector: TapDetector::new(settings),
        }
    }
}

impl Recognizer for Tap {
    fn kind(&self) -> GestureKind {
        GestureKind::Tap
    }

    fn on_pointer(
        &mut self,
        event: &PointerEvent,
        pointers: &PointerTracker,
        out: &mut Vec<GestureEvent>,
    ) {
        if let TapSignal::Tapped(position) = self.detector.feed(event, pointers) {
            out.push(GestureEvent::Tap { position });
        }
    }

    fn cancel(&mut self, _out: &mut Vec<GestureEvent>) {
        self.detector.press = None;
    }

    fn is_pending(&self) -> bool {
        self.detector.press.is_some()
    }
}

/// Two taps close together in time and space.
#[derive(Debug, Clone)]
pub struct DoubleTap {
    detector: TapDetector,
    window: Duration,
    max_distance: f32,
    /// Position and release time of the first tap.
    first: Option<(Point, Duration)>,
}

impl DoubleTap {
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            detector: TapDetector::new(settings),
            window: settings.double_tap_window,
            max_distance: settings.double_tap_distance,
            first: None,
        }
    }

    fn expire(&mut self, now: Duration) {
        if let Some((_, at)) = self.first {
            if now.saturating_sub(at) > self.window {
                self.first = None;
            }
        }
    }
}

impl Recognizer for DoubleTap {
    fn kind(&self) -> GestureKind {
        GestureKind::DoubleTap
    }

    fn on_pointer(
        &mut self,
        event: &PointerEvent,
        pointers: &PointerTracker,
        out: &mut Vec<GestureEvent>,
    ) {
        self.expire(event.time);

        match self.detector.feed(event, pointers) {
            TapSignal::None => {}
            TapSignal::Failed => self.first = None,
            TapSignal::Tapped(position) => match self.first.take() {
                Some((first, _)) if distance(first, position) <= self.max_distance => {
                    out.push(GestureEvent::DoubleTap { position });
                }
                _ => self.first = Some((position, event.time)),
            },
        }
    }

    fn on_tick(&mut self, now: Duration, _out: &mut Vec<GestureEvent>) {
        self.expire(now);
    }

    fn cancel(&mut self, _out: &mut Vec<GestureEvent>) {
        self.detector.press = None;
        self.first = None;
    }

    fn is_pending(&self) -> bool {
        self.first.is_some() || self.detector.press.is_some()
    }
}

/// Primary finger held still.
///
/// Only the primary pointer is watched: other fingers may come and go (and
/// pinch) without preventing the press from firing.
#[derive(Debug, Clone)]
pub struct LongPress {
    slop: f32,
    duration: Duration,
    press: Option<Press>,
}

impl LongPress {
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            slop: settings.touch_slop,
            duration: settings.long_press,
            press: None,
        }
    }

    fn fire_if_due(&mut self, now: Duration, out: &mut Vec<GestureEvent>) {
        if let Some(press) = self.press {
            if now.saturating_sub(press.down_at) >= self.duration {
                self.press = None;
                out.push(GestureEvent::LongPress {
                    position: press.start,
                });
            }
        }
    }
}

impl Recognizer for LongPress {
    fn kind(&self) -> GestureKind {
        GestureKind::LongPress
    }

    fn on_pointer(
        &mut self,
        event: &PointerEvent,
        pointers: &PointerTracker,
        out: &mut Vec<GestureEvent>,
    ) {
        self.fire_if_due(event.time, out);

        match event.phase {
            Phase::Down if pointers.count() == 1 => {
                self.press = Some(Press {
                    id: event.id,
                    start: event.position,
                    down_at: event.time,
                });
            }
            Phase::Move => {
                if let Some(press) = self.press {
                    if press.id == event.id && distance(press.start, event.position) > self.slop {
                        self.press = None;
                    }
                }
            }
            Phase::Up => {
                if self.press.is_some_and(|press| press.id == event.id) {
                    self.press = None;
                }
            }
            Phase::Cancel => self.press = None,
            Phase::Down => {}
        }
    }

    fn on_tick(&mut self, now: Duration, out: &mut Vec<GestureEvent>) {
        self.fire_if_due(now, out);
    }

    fn cancel(&mut self, _out: &mut Vec<GestureEvent>) {
        self.press = None;
    }

    fn is_pending(&self) -> bool {
        self.press.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PinchTrack {
    a: PointerId,
    b: PointerId,
    initial_distance: f32,
    focal: Point,
}

/// Two-finger scale gesture.
#[derive(Debug, Clone, Default)]
pub struct Pinch {
    active: Option<PinchTrack>,
}

/// Finger distance below which a pinch cannot start (scale would explode).
const MIN_PINCH_DISTANCE: f32 = 1.0;

impl Pinch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Recognizer for Pinch {
    fn kind(&self) -> GestureKind {
        GestureKind::Pinch
    }

    fn on_pointer(
        &mut self,
        event: &PointerEvent,
        pointers: &PointerTracker,
        out: &mut Vec<GestureEvent>,
    ) {
        if event.phase == Phase::Cancel {
            if self.active.take().is_some() {
                out.push(GestureEvent::PinchCancelled);
            }
            return;
        }

        if let Some(mut track) = self.active {
            match (pointers.get(track.a), pointers.get(track.b)) {
                (Some(a), Some(b)) => {
                    if event.phase == Phase::Move && (event.id == track.a || event.id == track.b) {
                        track.focal = midpoint(a.position, b.position);
                        let scale_factor = distance(a.position, b.position) / track.initial_distance;
                        self.active = Some(track);
                        out.push(GestureEvent::PinchChanged {
                            scale_factor,
                            focal: track.focal,
                        });
                    }
                    return;
                }
                _ => {
                    self.active = None;
                    out.push(GestureEvent::PinchEnded { focal: track.focal });
                }
            }
        }

        if let Some((a, b)) = pointers.first_two() {
            let initial_distance = distance(a.position, b.position);
            if initial_distance >= MIN_PINCH_DISTANCE {
                let focal = midpoint(a.position, b.position);
                self.active = Some(PinchTrack {
                    a: a.id,
                    b: b.id,
                    initial_distance,
                    focal,
                });
                out.push(GestureEvent::PinchBegan { focal });
            }
        }
    }

    fn cancel(&mut self, out: &mut Vec<GestureEvent>) {
        if self.active.take().is_some() {
            out.push(GestureEvent::PinchCancelled);
        }
    }

    fn is_pending(&self) -> bool {
        self.active.is_some()
    }
}

/// Centroid drag of all fingers in contact.
///
/// When fingers are added or lifted the centroid jumps; the translation is
/// rebased so it stays continuous.
#[derive(Debug, Clone)]
pub struct Pan {
    slop: f32,
    velocity: VelocityTracker,
    anchor: Option<Point>,
    anchor_count: usize,
    accumulated: Vector,
    translation: Vector,
    started: bool,
}

impl Pan {
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            slop: settings.touch_slop,
            velocity: VelocityTracker::new(settings.velocity_window),
            anchor: None,
            anchor_count: 0,
            accumulated: Vector::new(0.0, 0.0),
            translation: Vector::new(0.0, 0.0),
            started: false,
        }
    }

    fn reset(&mut self) {
        self.anchor = None;
        self.anchor_count = 0;
        self.accumulated = Vector::new(0.0, 0.0);
        self.translation = Vector::new(0.0, 0.0);
        self.started = false;
        self.velocity.reset();
    }

    fn rebase(&mut self, pointers: &PointerTracker) {
        self.accumulated = self.translation;
        self.anchor = pointers.centroid();
        self.anchor_count = pointers.count();
    }
}

impl Recognizer for Pan {
    fn kind(&self) -> GestureKind {
        GestureKind::Pan
    }

    fn on_pointer(
        &mut self,
        event: &PointerEvent,
        pointers: &PointerTracker,
        out: &mut Vec<GestureEvent>,
    ) {
        match event.phase {
            Phase::Cancel => {
                if self.started {
                    out.push(GestureEvent::PanCancelled);
                }
                self.reset();
            }
            Phase::Down => {
                if self.anchor.is_none() {
                    self.reset();
                    self.velocity.add(event.time, self.translation);
                }
                self.rebase(pointers);
            }
            Phase::Up => {
                if pointers.count() == 0 {
                    if self.started {
                        out.push(GestureEvent::PanEnded {
                            translation: self.translation,
                            velocity: self.velocity.velocity(event.time),
                        });
                    }
                    self.reset();
                } else {
                    self.rebase(pointers);
                }
            }
            Phase::Move => {
                let (Some(anchor), Some(centroid)) = (self.anchor, pointers.centroid()) else {
                    return;
                };
                if pointers.count() != self.anchor_count {
                    self.rebase(pointers);
                    return;
                }

                let previous = self.translation;
                self.translation = self.accumulated + (centroid - anchor);
                self.velocity.add(event.time, self.translation);

                if !self.started {
                    if magnitude(self.translation) <= self.slop {
                        return;
                    }
                    self.started = true;
                    out.push(GestureEvent::PanBegan {
                        pointers: pointers.count(),
                    });
                }

                out.push(GestureEvent::PanChanged {
                    delta: self.translation - previous,
                    translation: self.translation,
                    velocity: self.velocity.velocity(event.time),
                    pointers: pointers.count(),
                });
            }
        }
    }

    fn cancel(&mut self, out: &mut Vec<GestureEvent>) {
        if self.started {
            out.push(GestureEvent::PanCancelled);
        }
        self.reset();
    }

    fn is_pending(&self) -> bool {
        self.anchor.is_some()
    }
}
