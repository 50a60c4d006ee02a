// SPDX-License-Identifier: MPL-2.0
//! Transient notification system for user feedback.
//!
//! Collaborator failures (a download that could not complete, a share sheet
//! that failed to open, the onboarding flag that could not be saved) never
//! interrupt the viewer. They are reported as short-lived notifications the
//! host renders however it likes.
//!
//! # Components
//!
//! - [`notification`] - Core `Notification` struct with severity levels
//! - [`manager`] - `Manager` for queuing and lifecycle management
//!
//! # Usage
//!
//! ```
//! use lightbox::ui::notifications::{Manager, Notification};
//! use std::time::Duration;
//!
//! let mut manager = Manager::new();
//! manager.push(Notification::warning("notification-download-failed"));
//! assert_eq!(manager.visible_count(), 1);
//!
//! // Warnings auto-dismiss after five seconds of engine time.
//! manager.tick(Duration::from_secs(6));
//! assert_eq!(manager.visible_count(), 0);
//! ```
//!
//! # Design Considerations
//!
//! - Duration: ~3s for success/info, ~5s for warnings, manual dismiss for errors
//! - Max visible notifications: 3 (others are queued)
//! - Timers start when a notification becomes visible, not when it is queued

mod manager;
mod notification;

pub use manager::{Manager, Message as NotificationMessage};
pub use notification::{Notification, NotificationId, Severity};
