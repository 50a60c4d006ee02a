// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the engine. Constants are organized by category.
//!
//! # Categories
//!
//! - **Scale**: Zoom limits for pinch and double tap
//! - **Gestures**: Recognizer timing and distance thresholds
//! - **Dismiss**: Drag-to-close thresholds and derived fades
//! - **Animation**: Spring and tween parameters
//! - **Overlay**: Caption panel geometry and transitions
//! - **Gallery**: Paging and mounting behaviour
//! - **Onboarding**: First-use tip timing

// ==========================================================================
// Scale Defaults
// ==========================================================================

/// Resting scale; the image is aspect-fitted to the viewport.
pub const MIN_SCALE: f32 = 1.0;

/// Maximum scale reachable by any gesture.
pub const MAX_SCALE: f32 = 3.0;

/// Lowest scale a pinch may reach before release springs it back to
/// [`MIN_SCALE`]. Setting this equal to `MIN_SCALE` disables the overshoot.
pub const MIN_PINCH_SCALE: f32 = 0.5;

/// Scale targeted by a double tap at rest.
pub const DOUBLE_TAP_SCALE: f32 = 2.0;

/// Two scales closer than this are considered equal.
pub const SCALE_EPSILON: f32 = 1e-3;

// ==========================================================================
// Gesture Defaults
// ==========================================================================

/// Movement (logical px) below which a pointer is considered stationary.
pub const TOUCH_SLOP_PX: f32 = 10.0;

/// Longest press still recognized as a tap.
pub const TAP_MAX_DURATION_MS: u64 = 250;

/// Maximum delay between two tap-ends forming a double tap.
pub const DOUBLE_TAP_WINDOW_MS: u64 = 300;

/// Maximum distance between two taps forming a double tap.
pub const DOUBLE_TAP_DISTANCE_PX: f32 = 40.0;

/// Hold time before a long press fires.
pub const LONG_PRESS_MS: u64 = 500;

/// Window of recent samples used to estimate pan velocity.
pub const VELOCITY_SAMPLE_WINDOW_MS: u64 = 100;

// ==========================================================================
// Dismiss Defaults
// ==========================================================================

/// Vertical fling speed (px/s) above which a drag closes the viewer.
pub const DISMISS_VELOCITY_THRESHOLD: f32 = 500.0;

/// Vertical drag distance (px) above which a drag closes the viewer.
pub const DISMISS_DISTANCE_THRESHOLD: f32 = 100.0;

/// Drag distance over which the background fades from 1 to 0.
pub const DISMISS_FADE_DISTANCE: f32 = 300.0;

/// Drag distance over which dismiss progress goes from 0 to 1.
pub const DISMISS_PROGRESS_DISTANCE: f32 = 100.0;

/// Duration of the exit animation once a dismissal is decided.
pub const DISMISS_EXIT_MS: u64 = 200;

// ==========================================================================
// Animation Defaults
// ==========================================================================

/// Natural angular frequency of spring-back animations (rad/s).
pub const SPRING_ANGULAR_FREQUENCY: f32 = 18.0;

/// Damping ratio of spring-back animations. Below 1.0 overshoots slightly.
pub const SPRING_DAMPING_RATIO: f32 = 0.85;

/// Springs closer than this to their target (and slower than this) snap.
pub const SPRING_REST_THRESHOLD: f32 = 1e-3;

/// Nominal frame interval used by the replay tool.
pub const DEFAULT_FRAME_MS: u64 = 16;

// ==========================================================================
// Overlay Defaults
// ==========================================================================

/// Duration of caption expand/collapse and fade transitions.
pub const OVERLAY_TRANSITION_MS: u64 = 200;

/// Caption opacity while the image is zoomed.
pub const OVERLAY_FADED_OPACITY: f32 = 0.15;

/// Height of the collapsed caption panel (logical px).
pub const OVERLAY_COLLAPSED_HEIGHT: f32 = 160.0;

/// Expanded caption height as a fraction of the viewport height.
pub const OVERLAY_EXPANDED_HEIGHT_RATIO: f32 = 0.85;

/// Caption lines shown while collapsed.
pub const OVERLAY_COLLAPSED_CAPTION_LINES: usize = 2;

// ==========================================================================
// Gallery Defaults
// ==========================================================================

/// Pages kept mounted on each side of the current page.
pub const MOUNTED_NEIGHBORS: usize = 1;

/// Fraction of a page that must be visible for it to become current.
pub const PAGE_VISIBILITY_THRESHOLD: f32 = 0.5;

// ==========================================================================
// Onboarding Defaults
// ==========================================================================

/// Delay before the first-use tip appears.
pub const ONBOARDING_DELAY_MS: u64 = 600;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Scale validation
    assert!(MIN_PINCH_SCALE > 0.0);
    assert!(MIN_PINCH_SCALE <= MIN_SCALE);
    assert!(MAX_SCALE > MIN_SCALE);
    assert!(DOUBLE_TAP_SCALE > MIN_SCALE);
    assert!(DOUBLE_TAP_SCALE <= MAX_SCALE);

    // Gesture validation
    assert!(TOUCH_SLOP_PX > 0.0);
    assert!(TAP_MAX_DURATION_MS < LONG_PRESS_MS);
    assert!(DOUBLE_TAP_WINDOW_MS > 0);

    // Dismiss validation
    assert!(DISMISS_VELOCITY_THRESHOLD > 0.0);
    assert!(DISMISS_DISTANCE_THRESHOLD > 0.0);
    assert!(DISMISS_FADE_DISTANCE >= DISMISS_DISTANCE_THRESHOLD);

    // Animation validation
    assert!(SPRING_ANGULAR_FREQUENCY > 0.0);
    assert!(SPRING_DAMPING_RATIO > 0.0);

    // Overlay validation
    assert!(OVERLAY_FADED_OPACITY >= 0.0);
    assert!(OVERLAY_FADED_OPACITY < 1.0);
    assert!(OVERLAY_EXPANDED_HEIGHT_RATIO > 0.0);
    assert!(OVERLAY_EXPANDED_HEIGHT_RATIO <= 1.0);

    // Gallery validation
    assert!(PAGE_VISIBILITY_THRESHOLD > 0.0);
    assert!(PAGE_VISIBILITY_THRESHOLD <= 1.0);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_defaults_are_valid() {
        assert_eq!(MIN_SCALE, 1.0);
        assert!(MIN_PINCH_SCALE < MIN_SCALE);
        assert!(DOUBLE_TAP_SCALE > MIN_SCALE && DOUBLE_TAP_SCALE <= MAX_SCALE);
    }

    #[test]
    fn gesture_defaults_are_valid() {
        assert_eq!(LONG_PRESS_MS, 500);
        assert_eq!(DOUBLE_TAP_WINDOW_MS, 300);
        assert!(TAP_MAX_DURATION_MS < LONG_PRESS_MS);
    }

    #[test]
    fn dismiss_defaults_are_valid() {
        assert_eq!(DISMISS_VELOCITY_THRESHOLD, 500.0);
        assert_eq!(DISMISS_DISTANCE_THRESHOLD, 100.0);
    }
}
