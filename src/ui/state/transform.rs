// SPDX-License-Identifier: MPL-2.0
//! Per-image transform state.
//!
//! [`TransformState`] holds the animated channels driven by gestures.
//! Every change is published to a [`TransformReader`] so a render thread can
//! sample the latest transform each display frame without locking.

use super::animation::{Animated, Easing, SpringConfig};
use crate::config::{MIN_SCALE, SCALE_EPSILON};
use iced_core::{Point, Vector};
use std::sync::atomic::{fence, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Whether `scale` counts as resting zoom.
#[must_use]
pub fn is_rest_scale(scale: f32) -> bool {
    (scale - MIN_SCALE).abs() < SCALE_EPSILON
}

/// A sampled transform, as seen by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f32,
    pub pan: Vector,
    pub focal: Point,
    pub background_opacity: f32,
    pub dismiss_progress: f32,
}

impl Transform {
    /// Resting transform: fitted, centered, fully opaque background.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            scale: MIN_SCALE,
            pan: Vector::new(0.0, 0.0),
            focal: Point::ORIGIN,
            background_opacity: 1.0,
            dismiss_progress: 0.0,
        }
    }

    /// Scale 1 with no pan (focal and fades are not considered).
    #[must_use]
    pub fn is_identity(&self) -> bool {
        is_rest_scale(self.scale) && self.pan.x == 0.0 && self.pan.y == 0.0
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// What changed during one [`TransformState::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// The scale animation finished on this frame.
    pub scale_settled: bool,
    /// Every channel is at rest after this frame (and something was moving).
    pub all_settled: bool,
}

/// Animated transform channels for one image.
#[derive(Debug)]
pub struct TransformState {
    scale: Animated,
    pan_x: Animated,
    pan_y: Animated,
    focal: Point,
    background_opacity: Animated,
    dismiss_progress: Animated,
    spring: SpringConfig,
    shared: SharedTransform,
}

impl TransformState {
    #[must_use]
    pub fn new(spring: SpringConfig) -> Self {
        let state = Self {
            scale: Animated::new(MIN_SCALE),
            pan_x: Animated::new(0.0),
            pan_y: Animated::new(0.0),
            focal: Point::ORIGIN,
            background_opacity: Animated::new(1.0),
            dismiss_progress: Animated::new(0.0),
            spring,
            shared: SharedTransform::new(),
        };
        state.publish();
        state
    }

    /// Read handle for the render side.
    #[must_use]
    pub fn reader(&self) -> TransformReader {
        self.shared.reader()
    }

    #[must_use]
    pub fn current(&self) -> Transform {
        Transform {
            scale: self.scale.value(),
            pan: Vector::new(self.pan_x.value(), self.pan_y.value()),
            focal: self.focal,
            background_opacity: self.background_opacity.value().clamp(0.0, 1.0),
            dismiss_progress: self.dismiss_progress.value().clamp(0.0, 1.0),
        }
    }

    /// Transform the state will settle at once animations complete.
    #[must_use]
    pub fn settled(&self) -> Transform {
        Transform {
            scale: self.scale.target(),
            pan: Vector::new(self.pan_x.target(), self.pan_y.target()),
            focal: self.focal,
            background_opacity: self.background_opacity.target(),
            dismiss_progress: self.dismiss_progress.target(),
        }
    }

    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale.value()
    }

    #[must_use]
    pub fn pan(&self) -> Vector {
        Vector::new(self.pan_x.value(), self.pan_y.value())
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.scale.is_animating()
            || self.pan_x.is_animating()
            || self.pan_y.is_animating()
            || self.background_opacity.is_animating()
            || self.dismiss_progress.is_animating()
    }

    #[must_use]
    pub fn is_scale_animating(&self) -> bool {
        self.scale.is_animating()
    }

    /// Freezes every channel at its current value (gesture takeover).
    pub fn interrupt(&mut self) {
        self.scale.set(self.scale.value());
        self.pan_x.set(self.pan_x.value());
        self.pan_y.set(self.pan_y.value());
        self.background_opacity.set(self.background_opacity.value());
        self.dismiss_progress.set(self.dismiss_progress.value());
    }

    /// Direct gesture write of scale, pan and focal.
    pub fn set_zoom(&mut self, scale: f32, pan: Vector, focal: Point) {
        self.scale.set(scale);
        self.pan_x.set(pan.x);
        self.pan_y.set(pan.y);
        self.focal = focal;
        self.publish();
    }

    /// Direct gesture write of pan only.
    pub fn set_pan(&mut self, pan: Vector) {
        self.pan_x.set(pan.x);
        self.pan_y.set(pan.y);
        self.publish();
    }

    /// Direct gesture write of the dismiss-drag channels.
    pub fn set_dismiss_drag(&mut self, pan_y: f32, background_opacity: f32, progress: f32) {
        self.pan_x.set(0.0);
        self.pan_y.set(pan_y);
        self.background_opacity.set(background_opacity);
        self.dismiss_progress.set(progress);
        self.publish();
    }

    /// Springs scale and pan to the given values and the fades to rest.
    ///
    /// The fades use a critically damped spring; they live in `[0, 1]`.
    pub fn spring_to(&mut self, scale: f32, pan: Vector, now: Duration) {
        let fade = SpringConfig {
            damping_ratio: 1.0,
            ..self.spring
        };
        self.scale.spring_to(scale, self.spring, now);
        self.pan_x.spring_to(pan.x, self.spring, now);
        self.pan_y.spring_to(pan.y, self.spring, now);
        self.background_opacity.spring_to(1.0, fade, now);
        self.dismiss_progress.spring_to(0.0, fade, now);
        self.publish();
    }

    /// Slides the image off screen vertically and fades the background out.
    pub fn animate_exit(&mut self, pan_y: f32, duration: Duration, now: Duration) {
        self.pan_x.tween_to(0.0, duration, Easing::EaseOutCubic, now);
        self.pan_y.tween_to(pan_y, duration, Easing::EaseOutCubic, now);
        self.background_opacity
            .tween_to(0.0, duration, Easing::EaseOutCubic, now);
        self.dismiss_progress
            .tween_to(1.0, duration, Easing::EaseOutCubic, now);
        self.publish();
    }

    /// Snaps straight to identity, dropping any animation.
    pub fn reset(&mut self) {
        self.scale.set(MIN_SCALE);
        self.pan_x.set(0.0);
        self.pan_y.set(0.0);
        self.focal = Point::ORIGIN;
        self.background_opacity.set(1.0);
        self.dismiss_progress.set(0.0);
        self.publish();
    }

    /// Advances all running animations to `now`.
    pub fn tick(&mut self, now: Duration) -> TickOutcome {
        let was_animating = self.is_animating();
        if !was_animating {
            return TickOutcome::default();
        }

        let scale_settled = self.scale.tick(now);
        self.pan_x.tick(now);
        self.pan_y.tick(now);
        self.background_opacity.tick(now);
        self.dismiss_progress.tick(now);
        self.publish();

        TickOutcome {
            scale_settled,
            all_settled: !self.is_animating(),
        }
    }

    fn publish(&self) {
        self.shared.store(&self.current());
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::new(SpringConfig::default())
    }
}

const SLOT_COUNT: usize = 7;

#[derive(Debug, Default)]
struct Cell {
    sequence: AtomicU64,
    slots: [AtomicU32; SLOT_COUNT],
}

/// Write side of a lock-free transform cell (sequence lock over atomics).
///
/// Deliberately not `Clone`: exactly one writer exists per image.
#[derive(Debug)]
pub struct SharedTransform {
    cell: Arc<Cell>,
}

impl SharedTransform {
    #[must_use]
    pub fn new() -> Self {
        let shared = Self {
            cell: Arc::new(Cell::default()),
        };
        shared.store(&Transform::identity());
        shared
    }

    #[must_use]
    pub fn reader(&self) -> TransformReader {
        TransformReader {
            cell: Arc::clone(&self.cell),
        }
    }

    pub fn store(&self, transform: &Transform) {
        let values = [
            transform.scale,
            transform.pan.x,
            transform.pan.y,
            transform.focal.x,
            transform.focal.y,
            transform.background_opacity,
            transform.dismiss_progress,
        ];

        let sequence = self.cell.sequence.load(Ordering::Relaxed);
        self.cell.sequence.store(sequence.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);
        for (slot, value) in self.cell.slots.iter().zip(values) {
            slot.store(value.to_bits(), Ordering::Relaxed);
        }
        self.cell
            .sequence
            .store(sequence.wrapping_add(2), Ordering::Release);
    }
}

impl Default for SharedTransform {
    fn default() -> Self {
        Self::new()
    }
}

/// Read side of a [`SharedTransform`]. Cheap to clone and `Send + Sync`.
#[derive(Debug, Clone)]
pub struct TransformReader {
    cell: Arc<Cell>,
}

impl TransformReader {
    /// Returns the last fully published transform; never a mix of two writes.
    #[must_use]
    pub fn load(&self) -> Transform {
        loop {
            let before = self.cell.sequence.load(Ordering::Acquire);
            if before % 2 == 1 {
                std::hint::spin_loop();
                continue;
            }

            let mut values = [0.0_f32; SLOT_COUNT];
            for (value, slot) in values.iter_mut().zip(&self.cell.slots) {
                *value = f32::from_bits(slot.load(Ordering::Relaxed));
            }

            fence(Ordering::Acquire);
            let after = self.cell.sequence.load(Ordering::Relaxed);
            if before == after {
                return Transform {
                    scale: values[0],
                    pan: Vector::new(values[1], values[2]),
                    focal: Point::new(values[3], values[4]),
                    background_opacity: values[5],
                    dismiss_progress: values[6],
                };
            }
            std::hint::spin_loop();
        }
    }
}
