// SPDX-License-Identifier: MPL-2.0
//! Drag-to-close decision.

use crate::config::{
    DISMISS_DISTANCE_THRESHOLD, DISMISS_FADE_DISTANCE, DISMISS_PROGRESS_DISTANCE,
    DISMISS_VELOCITY_THRESHOLD,
};

/// Outcome of a finished vertical drag at resting zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DismissDecision {
    pub velocity_y: f32,
    pub distance_y: f32,
    pub should_dismiss: bool,
}

impl DismissDecision {
    /// Direction the image leaves the screen in: `1.0` down, `-1.0` up.
    ///
    /// Follows the drag distance, or the fling velocity for a drag that ends
    /// where it started.
    #[must_use]
    pub fn exit_direction(&self) -> f32 {
        let reference = if self.distance_y.abs() > f32::EPSILON {
            self.distance_y
        } else {
            self.velocity_y
        };
        if reference < 0.0 {
            -1.0
        } else {
            1.0
        }
    }
}

/// Thresholds deciding whether a drag closes the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DismissEvaluator {
    pub velocity_threshold: f32,
    pub distance_threshold: f32,
}

impl Default for DismissEvaluator {
    fn default() -> Self {
        Self {
            velocity_threshold: DISMISS_VELOCITY_THRESHOLD,
            distance_threshold: DISMISS_DISTANCE_THRESHOLD,
        }
    }
}

impl DismissEvaluator {
    #[must_use]
    pub fn new(velocity_threshold: f32, distance_threshold: f32) -> Self {
        Self {
            velocity_threshold,
            distance_threshold,
        }
    }

    /// A drag dismisses when it was flung fast enough *or* dragged far enough.
    /// Non-finite measurements never dismiss.
    #[must_use]
    pub fn evaluate(&self, velocity_y: f32, distance_y: f32) -> DismissDecision {
        let fast = velocity_y.is_finite() && velocity_y.abs() > self.velocity_threshold;
        let far = distance_y.is_finite() && distance_y.abs() > self.distance_threshold;
        DismissDecision {
            velocity_y,
            distance_y,
            should_dismiss: fast || far,
        }
    }
}

/// Background opacity while dragging `distance_y` at resting zoom.
#[must_use]
pub fn background_opacity_for(distance_y: f32) -> f32 {
    (1.0 - distance_y.abs() / DISMISS_FADE_DISTANCE).clamp(0.0, 1.0)
}

/// Dismiss progress while dragging `distance_y` at resting zoom.
#[must_use]
pub fn dismiss_progress_for(distance_y: f32) -> f32 {
    (distance_y.abs() / DISMISS_PROGRESS_DISTANCE).clamp(0.0, 1.0)
}
