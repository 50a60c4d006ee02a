// SPDX-License-Identifier: MPL-2.0
//! Headless user interface logic.
//!
//! Everything here follows the Elm-style "state down, messages up" pattern:
//! hosts feed messages in and act on the effects that come back. Nothing
//! renders; the host reads state through accessors.
//!
//! - [`state`] - Pan bounds, dismiss decision, animated transform
//! - [`gestures`] - Pointer tracking, recognizers and their precedence
//! - [`viewer`] - The viewer and its sub-components
//! - [`notifications`] - Transient notices for collaborator failures

pub mod gestures;
pub mod notifications;
pub mod state;
pub mod viewer;
