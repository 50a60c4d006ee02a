// SPDX-License-Identifier: MPL-2.0
//! Frame-driven animated values.
//!
//! Animations advance only when [`Animated::tick`] is called with a frame
//! timestamp, so the same gesture trace always produces the same frames.
//! Timestamps are durations since an arbitrary origin chosen by the host.
//!
//! Springs are solved analytically (damped harmonic oscillator), which keeps
//! them stable for any frame interval, including a single huge jump.

use crate::config::{SPRING_ANGULAR_FREQUENCY, SPRING_DAMPING_RATIO, SPRING_REST_THRESHOLD};
use std::time::Duration;

/// Physical parameters of a spring-back animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    /// Natural angular frequency (rad/s); higher is snappier.
    pub angular_frequency: f32,
    /// 1.0 is critically damped, below overshoots, above creeps.
    pub damping_ratio: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            angular_frequency: SPRING_ANGULAR_FREQUENCY,
            damping_ratio: SPRING_DAMPING_RATIO,
        }
    }
}

impl SpringConfig {
    /// Displacement and velocity after `t` seconds, starting from
    /// displacement `x0` with velocity `v0` (target at zero).
    fn step(self, x0: f32, v0: f32, t: f32) -> (f32, f32) {
        let omega = self.angular_frequency;
        let zeta = self.damping_ratio;

        if (zeta - 1.0).abs() < 1e-4 {
            let c = v0 + omega * x0;
            let decay = (-omega * t).exp();
            let x = (x0 + c * t) * decay;
            let v = c * decay - omega * x;
            (x, v)
        } else if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let a = x0;
            let b = (v0 + zeta * omega * x0) / omega_d;
            let decay = (-zeta * omega * t).exp();
            let (sin, cos) = (omega_d * t).sin_cos();
            let x = decay * (a * cos + b * sin);
            let v = decay * (-zeta * omega * (a * cos + b * sin) + omega_d * (b * cos - a * sin));
            (x, v)
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * (zeta - root);
            let r2 = -omega * (zeta + root);
            let c2 = (v0 - r1 * x0) / (r2 - r1);
            let c1 = x0 - c2;
            let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
            (c1 * e1 + c2 * e2, r1 * c1 * e1 + r2 * c2 * e2)
        }
    }
}

/// Easing used by timed transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    EaseOutCubic,
}

impl Easing {
    fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Idle,
    Spring {
        config: SpringConfig,
        target: f32,
        velocity: f32,
        last_frame: Duration,
    },
    Tween {
        from: f32,
        to: f32,
        start: Duration,
        duration: Duration,
        easing: Easing,
    },
}

/// A single animatable channel.
///
/// Writing a value directly ([`set`](Self::set)) interrupts any running
/// animation and continues from the written value; starting a new animation
/// continues from the current animated value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animated {
    value: f32,
    motion: Motion,
}

impl Animated {
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self {
            value,
            motion: Motion::Idle,
        }
    }

    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Value the channel settles at once its animation completes.
    #[must_use]
    pub fn target(&self) -> f32 {
        match self.motion {
            Motion::Idle => self.value,
            Motion::Spring { target, .. } => target,
            Motion::Tween { to, .. } => to,
        }
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        !matches!(self.motion, Motion::Idle)
    }

    /// Jumps to `value`, cancelling any animation.
    pub fn set(&mut self, value: f32) {
        self.value = value;
        self.motion = Motion::Idle;
    }

    /// Springs towards `target`, keeping the current velocity of a running
    /// spring so retargeting mid-flight stays smooth.
    pub fn spring_to(&mut self, target: f32, config: SpringConfig, now: Duration) {
        let velocity = match self.motion {
            Motion::Spring { velocity, .. } => velocity,
            _ => 0.0,
        };

        if (self.value - target).abs() < SPRING_REST_THRESHOLD
            && velocity.abs() < SPRING_REST_THRESHOLD
        {
            self.set(target);
            return;
        }

        self.motion = Motion::Spring {
            config,
            target,
            velocity,
            last_frame: now,
        };
    }

    /// Eases towards `target` over `duration` starting at `now`.
    pub fn tween_to(&mut self, target: f32, duration: Duration, easing: Easing, now: Duration) {
        if duration.is_zero() || (self.value - target).abs() < f32::EPSILON {
            self.set(target);
            return;
        }

        self.motion = Motion::Tween {
            from: self.value,
            to: target,
            start: now,
            duration,
            easing,
        };
    }

    /// Advances the animation to `now`.
    ///
    /// Returns `true` exactly once: on the frame the animation settles.
    pub fn tick(&mut self, now: Duration) -> bool {
        match self.motion {
            Motion::Idle => false,
            Motion::Spring {
                config,
                target,
                velocity,
                last_frame,
            } => {
                let dt = now.saturating_sub(last_frame).as_secs_f32();
                let (x, v) = config.step(self.value - target, velocity, dt);

                if !x.is_finite() || !v.is_finite() {
                    self.set(target);
                    return true;
                }

                if x.abs() < SPRING_REST_THRESHOLD && v.abs() < SPRING_REST_THRESHOLD {
                    self.set(target);
                    return true;
                }

                self.value = target + x;
                self.motion = Motion::Spring {
                    config,
                    target,
                    velocity: v,
                    last_frame: now,
                };
                false
            }
            Motion::Tween {
                from,
                to,
                start,
                duration,
                easing,
            } => {
                let elapsed = now.saturating_sub(start);
                if elapsed >= duration {
                    self.set(to);
                    return true;
                }
                let progress = elapsed.as_secs_f32() / duration.as_secs_f32();
                self.value = from + (to - from) * easing.apply(progress);
                false
            }
        }
    }
}

impl Default for Animated {
    fn default() -> Self {
        Self::new(0.0)
    }
}
