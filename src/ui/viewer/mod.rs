// SPDX-License-Identifier: MPL-2.0
//! Full-screen image viewer.
//!
//! [`component::State`] is the entry point; the sub-components can also be
//! driven on their own when a host only needs part of the viewer.

pub mod component;
pub mod subcomponents;

pub use component::{Effect, Item, Message, State as Viewer};
