// SPDX-License-Identifier: MPL-2.0
//! Nested TEA sub-components for the viewer.
//!
//! Each sub-component has its own State, Message, Effect, and handle() method.
//! The main component.rs orchestrates these sub-components.
//!
//! ## Architecture
//!
//! ```text
//! component.rs (orchestrator)
//!     ├── gallery     - Paged images, current index, per-page reset
//!     │   └── image_view - One image: gestures, transform, dismiss
//!     ├── caption     - Collapsible caption panel
//!     └── onboarding  - First-run gesture tip
//! ```

pub mod caption;
pub mod gallery;
pub mod image_view;
pub mod onboarding;
