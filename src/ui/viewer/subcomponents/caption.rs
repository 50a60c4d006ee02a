// SPDX-License-Identifier: MPL-2.0
//! Caption panel overlaid on the image.
//!
//! The panel is either collapsed (fixed height, author and the first caption
//! lines) or expanded (most of the viewport, full caption, counters and
//! action buttons, internally scrollable). Height and opacity animate; the
//! host reads them every frame through [`State::height`] and
//! [`State::opacity`].

use crate::config::Settings;
use crate::ui::state::{Animated, Easing};
use iced_core::Size;
use std::time::Duration;

/// Caption metadata supplied with each image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptionInfo {
    pub author: String,
    pub text: String,
    pub reactions: u64,
    pub comments: u64,
    pub shares: u64,
    pub liked: bool,
}

/// Action buttons in the expanded panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Like,
    Comment,
    Share,
}

/// Caption panel state.
#[derive(Debug, Clone)]
pub struct State {
    info: CaptionInfo,
    expanded: bool,
    faded: bool,
    height: Animated,
    opacity: Animated,
    scroll_offset: f32,
    content_height: f32,
    viewport: Size,
    transition: Duration,
    faded_opacity: f32,
    collapsed_height: f32,
    expanded_height_ratio: f32,
    collapsed_lines: usize,
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Grab handle tapped.
    HandleTapped(Duration),
    /// Panel content tapped outside the action buttons.
    BodyTapped(Duration),
    ActionPressed(Action),
    /// Collapse if expanded (image tapped while expanded).
    Collapse(Duration),
    /// Fade the panel out of the way, or bring it back.
    SetFaded(bool, Duration),
    /// Internal scroll by `delta` pixels (expanded only).
    Scrolled(f32),
    /// Laid-out height of the full caption content.
    ContentMeasured(f32),
    ViewportResized(Size),
    /// Replace the caption (page change); collapses the panel.
    Replace(CaptionInfo),
    Tick(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    ExpandedChanged(bool),
    Action(Action),
}

impl State {
    #[must_use]
    pub fn new(info: CaptionInfo, viewport: Size, settings: &Settings) -> Self {
        Self {
            info,
            expanded: false,
            faded: false,
            height: Animated::new(settings.overlay_collapsed_height),
            opacity: Animated::new(1.0),
            scroll_offset: 0.0,
            content_height: 0.0,
            viewport,
            transition: settings.overlay_transition,
            faded_opacity: settings.overlay_faded_opacity,
            collapsed_height: settings.overlay_collapsed_height,
            expanded_height_ratio: settings.overlay_expanded_height_ratio,
            collapsed_lines: settings.overlay_collapsed_caption_lines,
        }
    }

    /// Handle a caption panel message.
    ///
    /// Note: Takes `Message` by value following the `update(message: Message)` pattern.
    #[allow(clippy::needless_pass_by_value)]
    pub fn handle(&mut self, msg: Message) -> Effect {
        match msg {
            Message::HandleTapped(now) => {
                let expand = !self.expanded;
                self.set_expanded(expand, now)
            }
            Message::BodyTapped(now) => {
                // Collapsed body expands; expanded content is click-through.
                let expand = !self.expanded;
                self.set_expanded(expand, now)
            }
            Message::Collapse(now) => self.set_expanded(false, now),
            Message::ActionPressed(action) => {
                if action == Action::Like {
                    self.toggle_like();
                }
                Effect::Action(action)
            }
            Message::SetFaded(faded, now) => {
                if self.faded != faded {
                    self.faded = faded;
                    let target = if faded { self.faded_opacity } else { 1.0 };
                    self.opacity
                        .tween_to(target, self.transition, Easing::EaseOutCubic, now);
                }
                Effect::None
            }
            Message::Scrolled(delta) => {
                if self.expanded && delta.is_finite() {
                    self.scroll_offset = (self.scroll_offset + delta).clamp(0.0, self.max_scroll());
                }
                Effect::None
            }
            Message::ContentMeasured(height) => {
                self.content_height = if height.is_finite() { height.max(0.0) } else { 0.0 };
                self.scroll_offset = self.scroll_offset.min(self.max_scroll());
                Effect::None
            }
            Message::ViewportResized(size) => {
                self.viewport = size;
                self.height.set(self.target_height());
                self.scroll_offset = self.scroll_offset.min(self.max_scroll());
                Effect::None
            }
            Message::Replace(info) => {
                self.info = info;
                self.content_height = 0.0;
                let was_expanded = self.expanded;
                self.expanded = false;
                self.scroll_offset = 0.0;
                self.height.set(self.collapsed_height);
                if was_expanded {
                    Effect::ExpandedChanged(false)
                } else {
                    Effect::None
                }
            }
            Message::Tick(now) => {
                self.height.tick(now);
                self.opacity.tick(now);
                Effect::None
            }
        }
    }

    #[must_use]
    pub fn info(&self) -> &CaptionInfo {
        &self.info
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    #[must_use]
    pub fn is_faded(&self) -> bool {
        self.faded
    }

    /// Current animated panel height in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.height.value()
    }

    /// Current animated panel opacity.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity.value()
    }

    #[must_use]
    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.height.is_animating() || self.opacity.is_animating()
    }

    /// Caption text to display: the first lines when collapsed, all of it
    /// when expanded.
    #[must_use]
    pub fn visible_text(&self) -> String {
        if self.expanded {
            self.info.text.clone()
        } else {
            self.info
                .text
                .lines()
                .take(self.collapsed_lines)
                .collect::<Vec<_>>()
                .join("\n")
        }
    }

    /// Whether the collapsed caption hides part of the text.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.info.text.lines().count() > self.collapsed_lines
    }

    /// Reaction, comment and share counters formatted for display.
    #[must_use]
    pub fn counters(&self) -> [String; 3] {
        [
            format_count(self.info.reactions),
            format_count(self.info.comments),
            format_count(self.info.shares),
        ]
    }

    fn expanded_height(&self) -> f32 {
        (self.viewport.height * self.expanded_height_ratio).max(self.collapsed_height)
    }

    fn target_height(&self) -> f32 {
        if self.expanded {
            self.expanded_height()
        } else {
            self.collapsed_height
        }
    }

    fn max_scroll(&self) -> f32 {
        (self.content_height - self.expanded_height()).max(0.0)
    }

    fn set_expanded(&mut self, expanded: bool, now: Duration) -> Effect {
        if self.expanded == expanded {
            return Effect::None;
        }
        self.expanded = expanded;
        if !expanded {
            self.scroll_offset = 0.0;
        }
        self.height
            .tween_to(self.target_height(), self.transition, Easing::EaseOutCubic, now);
        tracing::debug!(expanded, "caption panel toggled");
        Effect::ExpandedChanged(expanded)
    }

    fn toggle_like(&mut self) {
        if self.info.liked {
            self.info.liked = false;
            self.info.reactions = self.info.reactions.saturating_sub(1);
        } else {
            self.info.liked = true;
            self.info.reactions = self.info.reactions.saturating_add(1);
        }
    }
}

/// Compact counter text: `999`, `1.2K`, `3.4M`.
///
/// Rounds down so a count never displays larger than it is.
#[must_use]
pub fn format_count(count: u64) -> String {
    fn compact(count: u64, unit: u64, suffix: char) -> String {
        let tenths = count / (unit / 10);
        if tenths % 10 == 0 {
            format!("{}{suffix}", tenths / 10)
        } else {
            format!("{}.{}{suffix}", tenths / 10, tenths % 10)
        }
    }

    match count {
        0..=999 => count.to_string(),
        1_000..=999_999 => compact(count, 1_000, 'K'),
        1_000_000..=999_999_999 => compact(count, 1_000_000, 'M'),
        _ => compact(count, 1_000_000_000, 'B'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn panel() -> State {
        let info = CaptionInfo {
            author: "ana".into(),
            text: "line one\nline two\nline three\nline four".into(),
            reactions: 1_250,
            comments: 42,
            shares: 3_400_000,
            liked: false,
        };
        State::new(info, Size::new(800.0, 1000.0), &Settings::default())
    }

    fn settle(state: &mut State, start: Duration) {
        let mut now = start;
        while state.is_animating() {
            now += ms(16);
            state.handle(Message::Tick(now));
        }
    }

    #[test]
    fn body_tap_expands_and_animates_height() {
        let mut state = panel();
        assert_eq!(
            state.handle(Message::BodyTapped(ms(0))),
            Effect::ExpandedChanged(true)
        );
        state.handle(Message::Tick(ms(100)));
        assert!(state.height() > 160.0 && state.height() < 850.0);

        settle(&mut state, ms(100));
        assert_abs_diff_eq!(state.height(), 850.0);
    }

    #[test]
    fn expanded_content_tap_collapses() {
        let mut state = panel();
        state.handle(Message::HandleTapped(ms(0)));
        assert_eq!(
            state.handle(Message::BodyTapped(ms(50))),
            Effect::ExpandedChanged(false)
        );
        settle(&mut state, ms(50));
        assert_abs_diff_eq!(state.height(), 160.0);
    }

    #[test]
    fn action_buttons_do_not_collapse() {
        let mut state = panel();
        state.handle(Message::HandleTapped(ms(0)));
        assert_eq!(
            state.handle(Message::ActionPressed(Action::Share)),
            Effect::Action(Action::Share)
        );
        assert!(state.is_expanded());
    }

    #[test]
    fn like_is_optimistic_and_reversible() {
        let mut state = panel();
        state.handle(Message::ActionPressed(Action::Like));
        assert!(state.info().liked);
        assert_eq!(state.info().reactions, 1_251);
        state.handle(Message::ActionPressed(Action::Like));
        assert!(!state.info().liked);
        assert_eq!(state.info().reactions, 1_250);
    }

    #[test]
    fn fading_changes_opacity_not_height() {
        let mut state = panel();
        state.handle(Message::SetFaded(true, ms(0)));
        settle(&mut state, ms(0));
        assert_abs_diff_eq!(state.opacity(), 0.15);
        assert_abs_diff_eq!(state.height(), 160.0);
        assert!(!state.is_expanded());
    }

    #[test]
    fn collapsed_shows_first_lines_only() {
        let mut state = panel();
        assert_eq!(state.visible_text(), "line one\nline two");
        assert!(state.is_truncated());
        state.handle(Message::HandleTapped(ms(0)));
        assert_eq!(state.visible_text().lines().count(), 4);
    }

    #[test]
    fn scroll_is_clamped_to_content() {
        let mut state = panel();
        state.handle(Message::Scrolled(100.0));
        assert_eq!(state.scroll_offset(), 0.0);

        state.handle(Message::HandleTapped(ms(0)));
        state.handle(Message::ContentMeasured(1000.0));
        state.handle(Message::Scrolled(500.0));
        assert_abs_diff_eq!(state.scroll_offset(), 150.0);
        state.handle(Message::Scrolled(-900.0));
        assert_eq!(state.scroll_offset(), 0.0);
    }

    #[test]
    fn counts_are_compact() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1K");
        assert_eq!(format_count(1_250), "1.2K");
        assert_eq!(format_count(999_999), "999.9K");
        assert_eq!(format_count(3_400_000), "3.4M");
        assert_eq!(panel().counters(), ["1.2K".to_string(), "42".into(), "3.4M".into()]);
    }
}
