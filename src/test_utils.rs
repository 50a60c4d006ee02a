// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons.
//!
//! Re-exports the `approx` crate's assertion macros. Transforms are produced
//! by springs and tweens, so exact `assert_eq!` on `f32` is rarely right.

pub use approx::{assert_abs_diff_eq, assert_relative_eq};

/// Tolerance for values that should land exactly on a target once an
/// animation has settled.
pub const SETTLED_EPSILON: f32 = 1e-3;
