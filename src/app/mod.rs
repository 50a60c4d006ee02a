// SPDX-License-Identifier: MPL-2.0
//! Host-side plumbing shared by every front end.
//!
//! Directory resolution and the small amount of state that outlives a viewer
//! session (the onboarding flag).

pub mod paths;
pub mod persisted_state;

pub use persisted_state::{AppState, FileOnboardingStore};
