// SPDX-License-Identifier: MPL-2.0
//! Pan bounds for a zoomed image.
//!
//! A zoomed image may be panned only as far as its edges reach the viewport
//! edges; it never reveals empty space. At or below resting scale no panning
//! is possible at all.

use iced_core::{Size, Vector};

/// Pan limits for one image inside one viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Aspect-fitted display size of the image at scale 1.
    pub display: Size,
    /// Size of the viewport the image is shown in.
    pub viewport: Size,
}

impl Bounds {
    #[must_use]
    pub fn new(display: Size, viewport: Size) -> Self {
        Self { display, viewport }
    }

    /// Largest legal pan offset on each axis at `scale` (always ≥ 0).
    #[must_use]
    pub fn max_offset(&self, scale: f32) -> Vector {
        if !scale.is_finite() {
            return Vector::new(0.0, 0.0);
        }

        let scaled_w = self.display.width * scale;
        let scaled_h = self.display.height * scale;
        let max_x = ((scaled_w - self.viewport.width) / 2.0).max(0.0);
        let max_y = ((scaled_h - self.viewport.height) / 2.0).max(0.0);

        Vector::new(finite_or_zero(max_x), finite_or_zero(max_y))
    }

    /// Returns the legal offset nearest to `pan` at `scale`.
    #[must_use]
    pub fn clamp(&self, pan: Vector, scale: f32) -> Vector {
        let max = self.max_offset(scale);
        Vector::new(
            clamp_axis(pan.x, max.x),
            clamp_axis(pan.y, max.y),
        )
    }

    /// Whether `pan` is already within bounds at `scale`.
    #[must_use]
    pub fn is_legal(&self, pan: Vector, scale: f32) -> bool {
        let max = self.max_offset(scale);
        pan.x.abs() <= max.x && pan.y.abs() <= max.y
    }
}

fn clamp_axis(value: f32, max: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-max, max)
    } else {
        0.0
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
