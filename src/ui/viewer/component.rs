// SPDX-License-Identifier: MPL-2.0
//! Viewer component encapsulating state and update logic.
//!
//! The viewer wires the gallery, the caption panel, the onboarding tip and
//! the notification queue together. It owns the couplings between them
//! (taps toggle the controls, zooming fades the caption, page changes swap
//! the caption) and turns everything into host-facing [`Effect`]s.

use crate::actions::{ActionError, ActionKind, ActionOutcome};
use crate::config::Settings;
use crate::media::ViewableImage;
use crate::ui::gestures::PointerEvent;
use crate::ui::notifications::{self, Notification, NotificationMessage};
use crate::ui::state::{is_rest_scale, TransformReader};
use crate::ui::viewer::subcomponents::caption::{self, Action, CaptionInfo};
use crate::ui::viewer::subcomponents::gallery;
use crate::ui::viewer::subcomponents::image_view;
use crate::ui::viewer::subcomponents::onboarding::{self, OnboardingStore};
use iced_core::Size;
use std::time::Duration;

/// Notification key shown once an image has been saved.
pub const DOWNLOAD_SUCCESS_KEY: &str = "notification-download-success";

/// One gallery entry: the image and its caption metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub image: ViewableImage,
    pub caption: CaptionInfo,
}

impl Item {
    pub fn new(image: ViewableImage, caption: CaptionInfo) -> Self {
        Self { image, caption }
    }
}

/// Messages accepted by the viewer.
#[derive(Debug, Clone)]
pub enum Message {
    Pointer(PointerEvent),
    /// Display frame at the given engine time.
    Tick(Duration),
    /// Horizontal pager offset in pixels.
    Scrolled(f32),
    GoTo(usize),
    Next,
    Previous,
    ViewportResized(Size),
    CaptionHandleTapped,
    CaptionBodyTapped,
    CaptionAction(Action),
    CaptionScrolled(f32),
    CaptionMeasured(f32),
    DownloadPressed,
    SharePressed,
    OptionsPressed,
    /// Close button.
    CloseRequested,
    OnboardingDismissed,
    /// A dispatched download or share finished.
    ActionFinished(ActionOutcome),
    Notification(NotificationMessage),
}

/// Callbacks the host is expected to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Close,
    Tap,
    LongPress,
    ZoomChanged(f32),
    PageChanged(usize),
    Like,
    Comment,
    Share,
    RequestDownload(String),
    RequestShare(String),
    RequestOptionsMenu,
}

/// Complete viewer state.
#[derive(Debug)]
pub struct State {
    gallery: gallery::State,
    /// Caption metadata per page; the current page's copy lives in `caption`
    /// until the page changes.
    captions: Vec<CaptionInfo>,
    caption: caption::State,
    /// Page whose caption `caption` currently shows.
    caption_index: usize,
    onboarding: onboarding::State,
    notifications: notifications::Manager,
    controls_visible: bool,
    /// Controls were hidden by zooming rather than by a tap.
    hidden_by_zoom: bool,
    now: Duration,
}

impl State {
    /// Opens the viewer on `items[initial]` at engine time `now`.
    #[must_use]
    pub fn new(
        items: Vec<Item>,
        initial: usize,
        viewport: Size,
        settings: Settings,
        store: Box<dyn OnboardingStore>,
        now: Duration,
    ) -> Self {
        let (images, captions): (Vec<_>, Vec<_>) = items
            .into_iter()
            .map(|item| (item.image, item.caption))
            .unzip();

        let gallery = gallery::State::new(images, initial, viewport, settings);
        let caption_index = gallery.current_index();
        let first_caption = captions
            .get(caption_index)
            .cloned()
            .unwrap_or_default();
        let caption = caption::State::new(first_caption, viewport, &settings);

        let mut onboarding = onboarding::State::new(store, settings.onboarding_delay);
        onboarding.handle(onboarding::Message::Mount(now));

        tracing::debug!(pages = gallery.len(), index = gallery.current_index(), "viewer opened");

        Self {
            gallery,
            captions,
            caption_index,
            caption,
            onboarding,
            notifications: notifications::Manager::new(),
            controls_visible: true,
            hidden_by_zoom: false,
            now,
        }
    }

    /// Handle a viewer message.
    ///
    /// Note: Takes `Message` by value following the `update(message: Message)` pattern.
    #[allow(clippy::needless_pass_by_value)]
    pub fn handle(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();
        match message {
            Message::Pointer(event) => {
                self.advance(event.time);
                if self.onboarding.is_visible() {
                    tracing::trace!("pointer swallowed by onboarding tip");
                    return effects;
                }
                let produced = self.gallery.handle(gallery::Message::Pointer(event));
                self.apply_gallery(produced, &mut effects);
            }
            Message::Tick(now) => {
                self.advance(now);
                let produced = self.gallery.handle(gallery::Message::Tick(now));
                self.apply_gallery(produced, &mut effects);
                self.caption.handle(caption::Message::Tick(now));
                if self.onboarding.handle(onboarding::Message::Tick(now)) == onboarding::Effect::Show
                {
                    tracing::debug!("onboarding tip shown");
                }
                self.notifications.tick(now);
            }
            Message::Scrolled(offset) => {
                let produced = self.gallery.handle(gallery::Message::Scrolled(offset));
                self.apply_gallery(produced, &mut effects);
            }
            Message::GoTo(index) => {
                let produced = self.gallery.handle(gallery::Message::GoTo(index));
                self.apply_gallery(produced, &mut effects);
            }
            Message::Next => {
                let produced = self.gallery.handle(gallery::Message::Next);
                self.apply_gallery(produced, &mut effects);
            }
            Message::Previous => {
                let produced = self.gallery.handle(gallery::Message::Previous);
                self.apply_gallery(produced, &mut effects);
            }
            Message::ViewportResized(size) => {
                self.gallery.handle(gallery::Message::ViewportResized(size));
                self.caption.handle(caption::Message::ViewportResized(size));
            }
            Message::CaptionHandleTapped => {
                let effect = self.caption.handle(caption::Message::HandleTapped(self.now));
                self.apply_caption(effect, &mut effects);
            }
            Message::CaptionBodyTapped => {
                let effect = self.caption.handle(caption::Message::BodyTapped(self.now));
                self.apply_caption(effect, &mut effects);
            }
            Message::CaptionAction(action) => {
                let effect = self.caption.handle(caption::Message::ActionPressed(action));
                self.apply_caption(effect, &mut effects);
            }
            Message::CaptionScrolled(delta) => {
                self.caption.handle(caption::Message::Scrolled(delta));
            }
            Message::CaptionMeasured(height) => {
                self.caption.handle(caption::Message::ContentMeasured(height));
            }
            Message::DownloadPressed => {
                if let Some(image) = self.gallery.current_image() {
                    effects.push(Effect::RequestDownload(image.uri.clone()));
                }
            }
            Message::SharePressed => {
                if let Some(image) = self.gallery.current_image() {
                    effects.push(Effect::RequestShare(image.uri.clone()));
                }
            }
            Message::OptionsPressed => effects.push(Effect::RequestOptionsMenu),
            Message::CloseRequested => effects.push(Effect::Close),
            Message::OnboardingDismissed => {
                if let onboarding::Effect::Hide {
                    warning: Some(key),
                } = self.onboarding.handle(onboarding::Message::Dismiss)
                {
                    self.notifications.push(Notification::warning(key));
                }
            }
            Message::ActionFinished(outcome) => self.action_finished(outcome),
            Message::Notification(message) => self.notifications.handle_message(&message),
        }
        effects
    }

    #[must_use]
    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    #[must_use]
    pub fn overlay_faded(&self) -> bool {
        self.caption.is_faded()
    }

    #[must_use]
    pub fn overlay_expanded(&self) -> bool {
        self.caption.is_expanded()
    }

    #[must_use]
    pub fn caption(&self) -> &caption::State {
        &self.caption
    }

    #[must_use]
    pub fn gallery(&self) -> &gallery::State {
        &self.gallery
    }

    #[must_use]
    pub fn notifications(&self) -> &notifications::Manager {
        &self.notifications
    }

    #[must_use]
    pub fn onboarding_visible(&self) -> bool {
        self.onboarding.is_visible()
    }

    /// Transform reader of the current page, for the render thread.
    ///
    /// Readers are per page; fetch a new one after [`Effect::PageChanged`].
    #[must_use]
    pub fn reader(&self) -> Option<TransformReader> {
        self.gallery.current_view().map(image_view::State::reader)
    }

    /// Whether anything still needs frame ticks.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.gallery.is_animating() || self.caption.is_animating()
    }

    fn advance(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    fn apply_gallery(&mut self, produced: Vec<gallery::Effect>, effects: &mut Vec<Effect>) {
        for effect in produced {
            match effect {
                gallery::Effect::PageChanged(index) => {
                    self.page_changed(index);
                    effects.push(Effect::PageChanged(index));
                }
                gallery::Effect::Image(image_view::Effect::Tap(_)) => {
                    self.tapped();
                    effects.push(Effect::Tap);
                }
                gallery::Effect::Image(image_view::Effect::LongPress(_)) => {
                    effects.push(Effect::LongPress);
                }
                gallery::Effect::Image(image_view::Effect::ZoomChanged(scale)) => {
                    self.zoom_changed(scale);
                    effects.push(Effect::ZoomChanged(scale));
                }
                gallery::Effect::Image(image_view::Effect::Close) => effects.push(Effect::Close),
            }
        }
    }

    fn apply_caption(&mut self, effect: caption::Effect, effects: &mut Vec<Effect>) {
        match effect {
            caption::Effect::None | caption::Effect::ExpandedChanged(_) => {}
            caption::Effect::Action(Action::Like) => effects.push(Effect::Like),
            caption::Effect::Action(Action::Comment) => effects.push(Effect::Comment),
            caption::Effect::Action(Action::Share) => effects.push(Effect::Share),
        }
    }

    fn tapped(&mut self) {
        if self.caption.is_expanded() {
            self.caption.handle(caption::Message::Collapse(self.now));
            self.set_controls(true);
        } else {
            let visible = !self.controls_visible;
            self.set_controls(visible);
        }
        self.hidden_by_zoom = false;
    }

    fn zoom_changed(&mut self, scale: f32) {
        if is_rest_scale(scale) {
            self.set_controls(true);
            self.hidden_by_zoom = false;
        } else if scale > 1.0 {
            self.set_controls(false);
            self.hidden_by_zoom = true;
        }
    }

    /// Shows or hides the controls; the caption fades out with them.
    fn set_controls(&mut self, visible: bool) {
        self.controls_visible = visible;
        self.caption
            .handle(caption::Message::SetFaded(!visible, self.now));
    }

    fn page_changed(&mut self, index: usize) {
        if let Some(slot) = self.captions.get_mut(self.caption_index) {
            *slot = self.caption.info().clone();
        }
        self.caption_index = index;
        let info = self.captions.get(index).cloned().unwrap_or_default();
        self.caption.handle(caption::Message::Replace(info));

        // The outgoing page was reset, so any zoom-driven hiding is over.
        if self.hidden_by_zoom {
            self.set_controls(true);
            self.hidden_by_zoom = false;
        }
    }

    fn action_finished(&mut self, outcome: ActionOutcome) {
        match (outcome.kind, &outcome.result) {
            (ActionKind::Download, Ok(())) => {
                self.notifications
                    .push(Notification::success(DOWNLOAD_SUCCESS_KEY));
            }
            (ActionKind::Share, Ok(())) => {
                tracing::debug!(uri = %outcome.uri, "share completed");
            }
            (kind, Err(ActionError::Cancelled)) => {
                tracing::debug!(?kind, uri = %outcome.uri, "media action cancelled");
            }
            (kind, Err(err)) => {
                self.notifications.push(
                    Notification::warning(kind.failure_key()).with_arg("reason", err.to_string()),
                );
            }
        }
    }
}
