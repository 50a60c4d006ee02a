// SPDX-License-Identifier: MPL-2.0
//! Transform state management
//!
//! This module contains the numeric core of the viewer, free of any gesture
//! or UI concerns: pan bounds, the dismiss decision, animated channels and
//! the per-image transform they make up.

pub mod animation;
pub mod bounds;
pub mod dismiss;
pub mod transform;

// Re-export commonly used types for convenience
pub use animation::{Animated, Easing, SpringConfig};
pub use bounds::Bounds;
pub use dismiss::{DismissDecision, DismissEvaluator};
pub use transform::{is_rest_scale, Transform, TransformReader, TransformState};
