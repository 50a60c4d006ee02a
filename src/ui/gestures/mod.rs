// SPDX-License-Identifier: MPL-2.0
//! Gesture recognition.
//!
//! Raw [`PointerEvent`]s go in, an ordered stream of [`GestureEvent`]s comes
//! out. Five recognizers run side by side; the [`Arbiter`] resolves their
//! conflicts through an explicit [`Precedence`] tree rather than per-gesture
//! flags.
//!
//! Timers (long press, the double-tap window) only advance when the host
//! calls [`Arbiter::tick`], so recognition is fully deterministic.

pub mod arbiter;
pub mod pointer;
pub mod precedence;
pub mod recognizers;

pub use arbiter::Arbiter;
pub use pointer::{Phase, PointerEvent, PointerId};
pub use precedence::{GestureKind, Precedence, PrecedenceTable};

use iced_core::{Point, Vector};

/// A recognized gesture (or a phase of a continuous one).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Tap {
        position: Point,
    },
    DoubleTap {
        position: Point,
    },
    LongPress {
        position: Point,
    },
    PinchBegan {
        focal: Point,
    },
    /// `scale_factor` is relative to the finger distance when the pinch began.
    PinchChanged {
        scale_factor: f32,
        focal: Point,
    },
    PinchEnded {
        focal: Point,
    },
    PinchCancelled,
    PanBegan {
        pointers: usize,
    },
    /// `translation` is cumulative since the first finger went down;
    /// `velocity` is in px/s.
    PanChanged {
        delta: Vector,
        translation: Vector,
        velocity: Vector,
        pointers: usize,
    },
    PanEnded {
        translation: Vector,
        velocity: Vector,
    },
    PanCancelled,
}

impl GestureEvent {
    /// Recognizer that produced this event.
    #[must_use]
    pub fn kind(&self) -> GestureKind {
        match self {
            GestureEvent::Tap { .. } => GestureKind::Tap,
            GestureEvent::DoubleTap { .. } => GestureKind::DoubleTap,
            GestureEvent::LongPress { .. } => GestureKind::LongPress,
            GestureEvent::PinchBegan { .. }
            | GestureEvent::PinchChanged { .. }
            | GestureEvent::PinchEnded { .. }
            | GestureEvent::PinchCancelled => GestureKind::Pinch,
            GestureEvent::PanBegan { .. }
            | GestureEvent::PanChanged { .. }
            | GestureEvent::PanEnded { .. }
            | GestureEvent::PanCancelled => GestureKind::Pan,
        }
    }
}
