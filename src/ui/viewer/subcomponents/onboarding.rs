// SPDX-License-Identifier: MPL-2.0
//! First-run gesture tip.
//!
//! The tip appears once, a short delay after the viewer opens, and never
//! again after the user dismisses it. Storage failures are never fatal: a
//! flag that cannot be read shows the tip for this session only, a flag that
//! cannot be written hides it for this session and reports a warning.

use crate::error::{Error, Result};
use std::time::Duration;

/// Notification key raised when the "seen" flag cannot be saved.
pub const SAVE_FAILED_KEY: &str = "notification-onboarding-save-error";

/// Persistence of the single "onboarding seen" flag.
pub trait OnboardingStore: std::fmt::Debug + Send {
    /// Whether the tip has been dismissed in an earlier session.
    fn read_seen(&mut self) -> Result<bool>;

    /// Records that the tip has been dismissed.
    fn write_seen(&mut self) -> Result<()>;
}

/// In-memory store, for hosts without persistence and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub seen: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new(seen: bool) -> Self {
        Self { seen }
    }
}

impl OnboardingStore for MemoryStore {
    fn read_seen(&mut self) -> Result<bool> {
        Ok(self.seen)
    }

    fn write_seen(&mut self) -> Result<()> {
        self.seen = true;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not mounted yet.
    Unmounted,
    /// Waiting for the display delay to pass.
    Pending { show_at: Duration },
    Visible,
    /// Already seen or dismissed.
    Hidden,
}

/// Onboarding gate state.
#[derive(Debug)]
pub struct State {
    store: Box<dyn OnboardingStore>,
    delay: Duration,
    phase: Phase,
    /// `false` when the flag could not be read; dismissal is then not saved.
    persist: bool,
}

#[derive(Debug, Clone)]
pub enum Message {
    /// The viewer opened at the given time.
    Mount(Duration),
    Tick(Duration),
    /// The user closed the tip.
    Dismiss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The tip became visible.
    Show,
    /// The tip was dismissed. Carries a notification key when the flag
    /// could not be saved.
    Hide { warning: Option<String> },
}

impl State {
    #[must_use]
    pub fn new(store: Box<dyn OnboardingStore>, delay: Duration) -> Self {
        Self {
            store,
            delay,
            phase: Phase::Unmounted,
            persist: true,
        }
    }

    /// Handle an onboarding message.
    ///
    /// Note: Takes `Message` by value following the `update(message: Message)` pattern.
    #[allow(clippy::needless_pass_by_value)]
    pub fn handle(&mut self, msg: Message) -> Effect {
        match msg {
            Message::Mount(now) => {
                if self.phase != Phase::Unmounted {
                    return Effect::None;
                }
                match self.store.read_seen() {
                    Ok(true) => self.phase = Phase::Hidden,
                    Ok(false) => {
                        self.phase = Phase::Pending {
                            show_at: now + self.delay,
                        };
                    }
                    Err(err) => {
                        tracing::warn!(%err, "could not read onboarding flag, showing tip for this session");
                        self.persist = false;
                        self.phase = Phase::Pending {
                            show_at: now + self.delay,
                        };
                    }
                }
                Effect::None
            }
            Message::Tick(now) => match self.phase {
                Phase::Pending { show_at } if now >= show_at => {
                    self.phase = Phase::Visible;
                    Effect::Show
                }
                _ => Effect::None,
            },
            Message::Dismiss => {
                if self.phase != Phase::Visible {
                    return Effect::None;
                }
                self.phase = Phase::Hidden;
                let warning = if self.persist {
                    self.store.write_seen().err().map(|err| warning_key(&err))
                } else {
                    None
                };
                Effect::Hide { warning }
            }
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// While visible, gestures under the tip are inert.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.phase == Phase::Visible
    }
}

fn warning_key(err: &Error) -> String {
    tracing::warn!(%err, "could not save onboarding flag, hiding tip for this session");
    SAVE_FAILED_KEY.to_string()
}
