// SPDX-License-Identifier: MPL-2.0
//! Viewable image descriptors and aspect-fit geometry.

use iced_core::Size;

/// An image the gallery can display. Bytes are owned by the host; the engine
/// only needs the identity and intrinsic dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewableImage {
    pub uri: String,
    pub intrinsic_width: f32,
    pub intrinsic_height: f32,
}

impl ViewableImage {
    pub fn new(uri: impl Into<String>, intrinsic_width: f32, intrinsic_height: f32) -> Self {
        Self {
            uri: uri.into(),
            intrinsic_width,
            intrinsic_height,
        }
    }

    /// Returns `true` when both dimensions are usable for aspect-fit.
    #[must_use]
    pub fn has_valid_dimensions(&self) -> bool {
        is_positive(self.intrinsic_width) && is_positive(self.intrinsic_height)
    }

    /// Display size of this image inside `viewport`.
    #[must_use]
    pub fn display_size(&self, viewport: Size) -> Size {
        fit(
            Size::new(self.intrinsic_width, self.intrinsic_height),
            viewport,
        )
    }
}

/// Scales `intrinsic` to the largest size fitting in `viewport` while keeping
/// its aspect ratio.
///
/// Zero, negative or non-finite dimensions cannot be fitted; they fall back to
/// a square as wide as the viewport. A degenerate viewport yields
/// [`Size::ZERO`].
#[must_use]
pub fn fit(intrinsic: Size, viewport: Size) -> Size {
    if !is_positive(viewport.width) || !is_positive(viewport.height) {
        return Size::ZERO;
    }

    if !is_positive(intrinsic.width) || !is_positive(intrinsic.height) {
        return Size::new(viewport.width, viewport.width);
    }

    let ratio = (viewport.width / intrinsic.width).min(viewport.height / intrinsic.height);
    Size::new(intrinsic.width * ratio, intrinsic.height * ratio)
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
