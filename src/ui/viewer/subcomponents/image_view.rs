// SPDX-License-Identifier: MPL-2.0
//! Single image sub-component: gestures in, animated transform out.
//!
//! Owns one [`TransformState`] together with the bounds, dismiss evaluator
//! and gesture arbiter that drive it. Pointer events and frame ticks are the
//! only inputs; the resulting transform is published through a
//! [`TransformReader`] and notable outcomes are returned as [`Effect`]s.

use crate::config::{Settings, MIN_SCALE};
use crate::media::ViewableImage;
use crate::ui::gestures::{Arbiter, GestureEvent, PointerEvent};
use crate::ui::state::dismiss::{background_opacity_for, dismiss_progress_for};
use crate::ui::state::{
    is_rest_scale, Bounds, DismissEvaluator, SpringConfig, Transform, TransformReader,
    TransformState,
};
use iced_core::{Point, Size, Vector};
use std::time::Duration;

/// What the current touch sequence is doing to the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Mode {
    #[default]
    Idle,
    /// Moving a zoomed image around.
    Panning,
    /// Vertical drag at resting zoom that may close the viewer.
    DismissDrag,
    /// Two fingers own scale and pan.
    Pinching,
    /// Pinch over, some fingers still down.
    AfterPinch,
}

/// Scale, pan and focal at the moment a pinch began.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PinchAnchor {
    scale: f32,
    pan: Vector,
    focal: Point,
}

/// Single image view state.
#[derive(Debug)]
pub struct State {
    image: ViewableImage,
    viewport: Size,
    settings: Settings,
    transform: TransformState,
    bounds: Bounds,
    dismiss: DismissEvaluator,
    arbiter: Arbiter,
    mode: Mode,
    pinch: Option<PinchAnchor>,
    /// Vertical offset a dismiss drag started from, non-zero when it took
    /// over a running spring-back.
    drag_origin: f32,
    /// A gesture changed the scale; report it once the scale settles.
    zoom_pending: bool,
    /// Exit animation running; `Close` follows when it completes.
    closing: bool,
}

/// Messages for the image view sub-component.
#[derive(Debug, Clone)]
pub enum Message {
    /// Raw pointer input routed to this page.
    Pointer(PointerEvent),
    /// Display frame at the given time.
    Tick(Duration),
    /// The viewport changed size.
    ViewportResized(Size),
    /// Snap back to identity (page scrolled away).
    Reset,
}

/// Effects produced by the image view.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Confirmed single tap (after the double-tap window).
    Tap(Point),
    /// Long press on the image.
    LongPress(Point),
    /// A gesture-driven scale change has settled.
    ZoomChanged(f32),
    /// The dismiss animation finished; the viewer should close.
    Close,
}

impl State {
    #[must_use]
    pub fn new(image: ViewableImage, viewport: Size, settings: Settings) -> Self {
        let spring = SpringConfig {
            angular_frequency: settings.spring_angular_frequency,
            damping_ratio: settings.spring_damping_ratio,
        };
        let bounds = Bounds::new(image.display_size(viewport), viewport);
        if !image.has_valid_dimensions() {
            tracing::warn!(uri = %image.uri, "image has unusable dimensions, zoom disabled");
        }

        Self {
            image,
            viewport,
            settings,
            transform: TransformState::new(spring),
            bounds,
            dismiss: DismissEvaluator::new(
                settings.dismiss_velocity_threshold,
                settings.dismiss_distance_threshold,
            ),
            arbiter: Arbiter::new(&settings),
            mode: Mode::Idle,
            pinch: None,
            drag_origin: 0.0,
            zoom_pending: false,
            closing: false,
        }
    }

    /// Handle an image view message.
    ///
    /// Note: Takes `Message` by value following the `update(message: Message)` pattern.
    #[allow(clippy::needless_pass_by_value)]
    pub fn handle(&mut self, msg: Message) -> Vec<Effect> {
        let mut effects = Vec::new();
        match msg {
            Message::Pointer(event) => {
                if self.closing {
                    return effects;
                }
                let now = event.time;
                for gesture in self.arbiter.handle_pointer(event) {
                    self.apply(gesture, now, &mut effects);
                }
                if self.arbiter.pointer_count() == 0
                    && matches!(self.mode, Mode::Pinching | Mode::AfterPinch)
                {
                    self.mode = Mode::Idle;
                }
            }
            Message::Tick(now) => {
                if !self.closing {
                    for gesture in self.arbiter.tick(now) {
                        self.apply(gesture, now, &mut effects);
                    }
                }
                let outcome = self.transform.tick(now);
                if outcome.scale_settled && self.zoom_pending {
                    self.zoom_pending = false;
                    effects.push(Effect::ZoomChanged(self.transform.scale()));
                }
                if outcome.all_settled && self.closing {
                    self.closing = false;
                    tracing::debug!(uri = %self.image.uri, "dismiss animation finished");
                    effects.push(Effect::Close);
                }
            }
            Message::ViewportResized(size) => {
                self.viewport = size;
                self.bounds = Bounds::new(self.image.display_size(size), size);
                if self.zoom_enabled() {
                    let settled = self.transform.settled();
                    let pan = self.bounds.clamp(settled.pan, settled.scale);
                    self.transform.interrupt();
                    self.transform.set_zoom(settled.scale, pan, settled.focal);
                } else {
                    self.transform.reset();
                }
            }
            Message::Reset => self.reset(),
        }
        effects
    }

    /// Drops every gesture and animation and returns to identity.
    pub fn reset(&mut self) {
        self.arbiter.reset();
        self.transform.reset();
        self.mode = Mode::Idle;
        self.pinch = None;
        self.drag_origin = 0.0;
        self.zoom_pending = false;
        self.closing = false;
    }

    #[must_use]
    pub fn image(&self) -> &ViewableImage {
        &self.image
    }

    /// Current (possibly mid-animation) transform.
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.transform.current()
    }

    /// Read handle for the render thread.
    #[must_use]
    pub fn reader(&self) -> TransformReader {
        self.transform.reader()
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Whether the image is zoomed in past resting scale.
    #[must_use]
    pub fn is_zoomed(&self) -> bool {
        let scale = self.transform.scale();
        scale > MIN_SCALE && !is_rest_scale(scale)
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transform.is_animating()
    }

    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Whether a touch sequence is currently in progress on this page.
    #[must_use]
    pub fn has_pointers(&self) -> bool {
        self.arbiter.pointer_count() > 0
    }

    fn zoom_enabled(&self) -> bool {
        self.image.has_valid_dimensions()
            && self.bounds.display.width > 0.0
            && self.bounds.display.height > 0.0
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }

    fn apply(&mut self, gesture: GestureEvent, now: Duration, effects: &mut Vec<Effect>) {
        tracing::trace!(?gesture, "image view gesture");
        match gesture {
            GestureEvent::Tap { position } => effects.push(Effect::Tap(position)),
            GestureEvent::LongPress { position } => effects.push(Effect::LongPress(position)),
            GestureEvent::DoubleTap { position } => self.double_tap(position, now, effects),
            GestureEvent::PinchBegan { focal } => self.pinch_began(focal, now),
            GestureEvent::PinchChanged {
                scale_factor,
                focal,
            } => self.pinch_changed(scale_factor, focal),
            GestureEvent::PinchEnded { .. } => {
                if self.pinch.take().is_some() {
                    self.mode = Mode::AfterPinch;
                    self.settle(now, effects);
                }
            }
            GestureEvent::PinchCancelled => {
                if self.pinch.take().is_some() {
                    self.mode = Mode::Idle;
                    self.settle(now, effects);
                }
            }
            GestureEvent::PanBegan { .. } => self.pan_began(),
            GestureEvent::PanChanged {
                delta, translation, ..
            } => self.pan_changed(delta, translation),
            GestureEvent::PanEnded {
                translation,
                velocity,
            } => self.pan_ended(translation, velocity, now, effects),
            GestureEvent::PanCancelled => {
                match self.mode {
                    Mode::DismissDrag => {
                        self.transform
                            .spring_to(MIN_SCALE, Vector::new(0.0, 0.0), now);
                        self.mode = Mode::Idle;
                        self.report_if_settled(effects);
                    }
                    Mode::Panning => {
                        self.settle(now, effects);
                        self.mode = Mode::Idle;
                    }
                    _ => {}
                }
            }
        }
    }

    fn double_tap(&mut self, position: Point, now: Duration, effects: &mut Vec<Effect>) {
        if !self.zoom_enabled() {
            return;
        }
        let settled = self.transform.settled();
        self.transform.interrupt();

        if settled.scale > MIN_SCALE && !is_rest_scale(settled.scale) {
            tracing::debug!("double tap: zoom out");
            self.transform
                .spring_to(MIN_SCALE, Vector::new(0.0, 0.0), now);
        } else {
            let target = self.settings.double_tap_scale;
            let offset = (self.viewport_center() - position) * (target - MIN_SCALE);
            let pan = self.bounds.clamp(offset, target);
            tracing::debug!(target, ?pan, "double tap: zoom in");
            self.transform.spring_to(target, pan, now);
        }
        self.zoom_pending = true;
        self.report_if_settled(effects);
    }

    fn pinch_began(&mut self, focal: Point, now: Duration) {
        if !self.zoom_enabled() {
            return;
        }
        self.transform.interrupt();
        if self.mode == Mode::DismissDrag {
            tracing::debug!("pinch took over dismiss drag");
            self.transform
                .spring_to(self.transform.scale(), Vector::new(0.0, 0.0), now);
        }
        let current = self.transform.current();
        self.pinch = Some(PinchAnchor {
            scale: current.scale,
            pan: current.pan,
            focal,
        });
        self.mode = Mode::Pinching;
    }

    fn pinch_changed(&mut self, scale_factor: f32, focal: Point) {
        let Some(anchor) = self.pinch else {
            return;
        };
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            return;
        }

        let scale = (anchor.scale * scale_factor)
            .clamp(self.settings.min_pinch_scale, self.settings.max_scale);

        // Keep the image point that was under the starting focal under the
        // current focal (pan is relative to the viewport center).
        let center = self.viewport_center();
        let ratio = scale / anchor.scale;
        let start_offset = anchor.focal - center - anchor.pan;
        let pan = (focal - center) - start_offset * ratio;

        let pan = self.bounds.clamp(pan, scale);
        self.transform.set_zoom(scale, pan, focal);
    }

    fn pan_began(&mut self) {
        match self.mode {
            Mode::Pinching | Mode::AfterPinch => {}
            _ => {
                self.transform.interrupt();
                if self.is_zoomed() {
                    self.mode = Mode::Panning;
                } else {
                    self.mode = Mode::DismissDrag;
                    self.drag_origin = self.transform.pan().y;
                }
            }
        }
    }

    fn pan_changed(&mut self, delta: Vector, translation: Vector) {
        match self.mode {
            Mode::Panning => self.pan_by(delta),
            Mode::AfterPinch if self.is_zoomed() => self.pan_by(delta),
            Mode::DismissDrag => {
                let dy = self.drag_origin + translation.y;
                self.transform.set_dismiss_drag(
                    dy,
                    background_opacity_for(dy),
                    dismiss_progress_for(dy),
                );
            }
            _ => {}
        }
    }

    fn pan_by(&mut self, delta: Vector) {
        let scale = self.transform.scale();
        let pan = self.bounds.clamp(self.transform.pan() + delta, scale);
        self.transform.set_pan(pan);
    }

    fn pan_ended(
        &mut self,
        translation: Vector,
        velocity: Vector,
        now: Duration,
        effects: &mut Vec<Effect>,
    ) {
        match self.mode {
            Mode::DismissDrag => {
                let decision = self
                    .dismiss
                    .evaluate(velocity.y, self.drag_origin + translation.y);
                tracing::debug!(?decision, "dismiss drag ended");
                if decision.should_dismiss {
                    let exit_y = decision.exit_direction() * self.viewport.height;
                    self.transform
                        .animate_exit(exit_y, self.settings.dismiss_exit, now);
                    self.closing = true;
                } else {
                    self.transform
                        .spring_to(MIN_SCALE, Vector::new(0.0, 0.0), now);
                    self.report_if_settled(effects);
                }
                self.mode = Mode::Idle;
            }
            Mode::Panning => {
                let scale = self.transform.scale();
                let pan = self.bounds.clamp(self.transform.pan(), scale);
                self.transform.spring_to(scale, pan, now);
                self.mode = Mode::Idle;
                // The pan may have frozen a zoom animation mid-flight.
                self.report_if_settled(effects);
            }
            _ => {}
        }
    }

    /// Animates scale and pan to the nearest legal values.
    fn settle(&mut self, now: Duration, effects: &mut Vec<Effect>) {
        let current = self.transform.current();
        let scale = current.scale.clamp(MIN_SCALE, self.settings.max_scale);
        let pan = if is_rest_scale(scale) {
            Vector::new(0.0, 0.0)
        } else {
            self.bounds.clamp(current.pan, scale)
        };
        self.transform.spring_to(scale, pan, now);
        self.zoom_pending = true;
        self.report_if_settled(effects);
    }

    /// Reports a zoom change right away when no scale animation is needed.
    fn report_if_settled(&mut self, effects: &mut Vec<Effect>) {
        if self.zoom_pending && !self.transform.is_scale_animating() {
            self.zoom_pending = false;
            effects.push(Effect::ZoomChanged(self.transform.scale()));
        }
    }
}
