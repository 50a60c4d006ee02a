// SPDX-License-Identifier: MPL-2.0
//! Media descriptors.
//!
//! The engine never touches pixels. It only needs each image's identity and
//! intrinsic size to derive the aspect-fit display size.

pub mod image;

pub use image::{fit, ViewableImage};
