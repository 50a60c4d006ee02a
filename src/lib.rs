// SPDX-License-Identifier: MPL-2.0
//! `lightbox` is the headless gesture and transform engine behind a
//! full-screen, paged image viewer.
//!
//! It turns raw pointer events and frame ticks into one continuously
//! animated transform per image: tap, double tap, long press, pinch and pan
//! are arbitrated by an explicit precedence tree, pan offsets are kept inside
//! legal bounds, a vertical drag at rest zoom can dismiss the viewer, and a
//! caption panel and first-run tip react to all of it. Rendering is left to
//! the host, which reads the transform through a lock-free reader.
//!
//! ```
//! use lightbox::config::Settings;
//! use lightbox::media::ViewableImage;
//! use lightbox::ui::gestures::PointerEvent;
//! use lightbox::ui::viewer::subcomponents::caption::CaptionInfo;
//! use lightbox::ui::viewer::subcomponents::onboarding::MemoryStore;
//! use lightbox::ui::viewer::{Effect, Item, Message, Viewer};
//! use iced_core::Size;
//! use std::time::Duration;
//!
//! let items = vec![Item::new(
//!     ViewableImage::new("file:///beach.jpg", 1600.0, 1200.0),
//!     CaptionInfo::default(),
//! )];
//! let mut viewer = Viewer::new(
//!     items,
//!     0,
//!     Size::new(800.0, 600.0),
//!     Settings::default(),
//!     Box::new(MemoryStore::new(true)),
//!     Duration::ZERO,
//! );
//!
//! let ms = Duration::from_millis;
//! viewer.handle(Message::Pointer(PointerEvent::down(1, 400.0, 300.0, ms(0))));
//! viewer.handle(Message::Pointer(PointerEvent::up(1, 400.0, 300.0, ms(60))));
//! let effects = viewer.handle(Message::Tick(ms(400)));
//! assert_eq!(effects, vec![Effect::Tap]);
//! assert!(!viewer.controls_visible());
//! ```

#![doc(html_root_url = "https://docs.rs/lightbox/0.1.0")]

pub mod actions;
pub mod app;
pub mod config;
pub mod error;
pub mod media;
pub mod replay;
pub mod ui;

#[cfg(test)]
mod test_utils;
