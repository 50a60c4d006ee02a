// SPDX-License-Identifier: MPL-2.0
//! Paged gallery of images, each with its own zoom state.
//!
//! Pages are laid out horizontally, one viewport wide each. Only the current
//! page and its neighbours are mounted; a page's transform state is created
//! on mount, dropped on unmount and reset to identity whenever the page stops
//! being visible. Pointer input only ever reaches the current page.

use super::image_view;
use crate::config::Settings;
use crate::media::ViewableImage;
use crate::ui::gestures::PointerEvent;
use iced_core::Size;
use std::collections::HashMap;
use std::time::Duration;

/// Stable identity of an image for the lifetime of the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(u64);

impl ImageId {
    fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone)]
struct Page {
    id: ImageId,
    image: ViewableImage,
}

/// Gallery controller state.
#[derive(Debug)]
pub struct State {
    pages: Vec<Page>,
    mounted: HashMap<ImageId, image_view::State>,
    current: usize,
    /// Scroll position in fractional pages.
    scroll_position: f32,
    viewport: Size,
    settings: Settings,
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Horizontal scroll offset of the pager, in pixels.
    Scrolled(f32),
    /// Jump to a page (indicator dots, keyboard).
    GoTo(usize),
    Next,
    Previous,
    Pointer(PointerEvent),
    Tick(Duration),
    ViewportResized(Size),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// The current page changed.
    PageChanged(usize),
    /// Something happened on the current page.
    Image(image_view::Effect),
}

impl State {
    /// Creates the gallery. `initial` is clamped into range.
    #[must_use]
    pub fn new(images: Vec<ViewableImage>, initial: usize, viewport: Size, settings: Settings) -> Self {
        let pages: Vec<Page> = images
            .into_iter()
            .map(|image| Page {
                id: ImageId::new(),
                image,
            })
            .collect();
        let current = initial.min(pages.len().saturating_sub(1));

        let mut state = Self {
            pages,
            mounted: HashMap::new(),
            current,
            scroll_position: current as f32,
            viewport,
            settings,
        };
        state.remount();
        state
    }

    /// Handle a gallery message.
    ///
    /// Note: Takes `Message` by value following the `update(message: Message)` pattern.
    #[allow(clippy::needless_pass_by_value)]
    pub fn handle(&mut self, msg: Message) -> Vec<Effect> {
        let mut effects = Vec::new();
        match msg {
            Message::Scrolled(offset) => self.scrolled(offset, &mut effects),
            Message::GoTo(index) => self.go_to(index, &mut effects),
            Message::Next => {
                if self.current + 1 < self.pages.len() {
                    self.go_to(self.current + 1, &mut effects);
                }
            }
            Message::Previous => {
                if self.current > 0 {
                    self.go_to(self.current - 1, &mut effects);
                }
            }
            Message::Pointer(event) => {
                if let Some(view) = self.current_view_mut() {
                    effects.extend(
                        view.handle(image_view::Message::Pointer(event))
                            .into_iter()
                            .map(Effect::Image),
                    );
                }
            }
            Message::Tick(now) => {
                let current = self.current_id();
                for (id, view) in &mut self.mounted {
                    let produced = view.handle(image_view::Message::Tick(now));
                    if Some(*id) == current {
                        effects.extend(produced.into_iter().map(Effect::Image));
                    }
                }
            }
            Message::ViewportResized(size) => {
                self.viewport = size;
                for view in self.mounted.values_mut() {
                    view.handle(image_view::Message::ViewportResized(size));
                }
            }
        }
        effects
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_id(&self) -> Option<ImageId> {
        self.pages.get(self.current).map(|page| page.id)
    }

    #[must_use]
    pub fn current_image(&self) -> Option<&ViewableImage> {
        self.pages.get(self.current).map(|page| &page.image)
    }

    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<ImageId> {
        self.pages.get(index).map(|page| page.id)
    }

    /// Mounted view of the page with `id`, if any.
    #[must_use]
    pub fn view(&self, id: ImageId) -> Option<&image_view::State> {
        self.mounted.get(&id)
    }

    #[must_use]
    pub fn current_view(&self) -> Option<&image_view::State> {
        self.current_id().and_then(|id| self.mounted.get(&id))
    }

    fn current_view_mut(&mut self) -> Option<&mut image_view::State> {
        let id = self.current_id()?;
        self.mounted.get_mut(&id)
    }

    /// Ids of the mounted pages, in page order.
    #[must_use]
    pub fn mounted_ids(&self) -> Vec<ImageId> {
        self.pages
            .iter()
            .map(|page| page.id)
            .filter(|id| self.mounted.contains_key(id))
            .collect()
    }

    /// Paging is disabled while the current image is zoomed in.
    #[must_use]
    pub fn is_scroll_locked(&self) -> bool {
        self.current_view().is_some_and(image_view::State::is_zoomed)
    }

    /// Scroll position in fractional pages, for page indicators.
    #[must_use]
    pub fn scroll_position(&self) -> f32 {
        self.scroll_position
    }

    /// "n / total" page counter.
    #[must_use]
    pub fn page_label(&self) -> String {
        if self.pages.is_empty() {
            return String::from("0 / 0");
        }
        format!("{} / {}", self.current + 1, self.pages.len())
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.mounted.values().any(image_view::State::is_animating)
    }

    fn scrolled(&mut self, offset: f32, effects: &mut Vec<Effect>) {
        if self.pages.is_empty() || !offset.is_finite() || self.viewport.width <= 0.0 {
            return;
        }
        if self.is_scroll_locked() {
            tracing::debug!(offset, "scroll ignored while zoomed");
            return;
        }

        let last = (self.pages.len() - 1) as f32;
        self.scroll_position = (offset / self.viewport.width).clamp(0.0, last);

        let nearest = self.scroll_position.round();
        let visibility = 1.0 - (self.scroll_position - nearest).abs();
        let nearest = nearest as usize;
        if nearest != self.current && visibility >= self.settings.page_visibility_threshold {
            self.change_page(nearest, effects);
        }
        self.reset_hidden_pages();
    }

    fn go_to(&mut self, index: usize, effects: &mut Vec<Effect>) {
        if index >= self.pages.len() {
            return;
        }
        self.scroll_position = index as f32;
        if index != self.current {
            self.change_page(index, effects);
        }
        self.reset_hidden_pages();
    }

    fn change_page(&mut self, index: usize, effects: &mut Vec<Effect>) {
        tracing::debug!(from = self.current, to = index, "page changed");
        if let Some(view) = self.current_view_mut() {
            view.reset();
        }
        self.current = index;
        self.remount();
        effects.push(Effect::PageChanged(index));
    }

    /// Mounts the pages around the current one and drops the rest.
    fn remount(&mut self) {
        let neighbors = self.settings.mounted_neighbors;
        let first = self.current.saturating_sub(neighbors);
        let last = (self.current + neighbors).min(self.pages.len().saturating_sub(1));

        let keep: Vec<ImageId> = self
            .pages
            .get(first..=last)
            .unwrap_or_default()
            .iter()
            .map(|page| page.id)
            .collect();
        self.mounted.retain(|id, _| keep.contains(id));

        for page in self.pages.get(first..=last).unwrap_or_default() {
            self.mounted.entry(page.id).or_insert_with(|| {
                image_view::State::new(page.image.clone(), self.viewport, self.settings)
            });
        }
    }

    /// Resets every mounted page that is not visible at the current scroll.
    fn reset_hidden_pages(&mut self) {
        let position = self.scroll_position;
        for (index, page) in self.pages.iter().enumerate() {
            if index == self.current || (index as f32 - position).abs() < 1.0 {
                continue;
            }
            if let Some(view) = self.mounted.get_mut(&page.id) {
                if !view.transform().is_identity() || view.is_animating() {
                    view.reset();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn images(count: usize) -> Vec<ViewableImage> {
        (0..count)
            .map(|i| ViewableImage::new(format!("file:///{i}.jpg"), 1600.0, 1200.0))
            .collect()
    }

    fn gallery(count: usize, initial: usize) -> State {
        State::new(images(count), initial, Size::new(800.0, 600.0), Settings::default())
    }

    fn zoom_current(state: &mut State) -> Duration {
        for (t, phase) in [(0, 0), (50, 1), (150, 0), (200, 1)] {
            let event = if phase == 0 {
                PointerEvent::down(1, 400.0, 300.0, ms(t))
            } else {
                PointerEvent::up(1, 400.0, 300.0, ms(t))
            };
            state.handle(Message::Pointer(event));
        }
        let mut now = ms(200);
        while state.is_animating() {
            now += ms(16);
            state.handle(Message::Tick(now));
        }
        now
    }

    #[test]
    fn initial_index_is_clamped() {
        let state = gallery(3, 10);
        assert_eq!(state.current_index(), 2);
        assert_eq!(state.page_label(), "3 / 3");
    }

    #[test]
    fn only_neighbours_are_mounted() {
        let state = gallery(5, 2);
        let expected: Vec<_> = (1..=3).filter_map(|i| state.id_at(i)).collect();
        assert_eq!(state.mounted_ids(), expected);
    }

    #[test]
    fn scrolling_past_half_changes_page() {
        let mut state = gallery(3, 0);
        assert!(state.handle(Message::Scrolled(350.0)).is_empty());
        assert_eq!(
            state.handle(Message::Scrolled(420.0)),
            vec![Effect::PageChanged(1)]
        );
        assert_eq!(state.current_index(), 1);
        assert_eq!(state.page_label(), "2 / 3");
    }

    #[test]
    fn scroll_is_locked_while_zoomed() {
        let mut state = gallery(3, 0);
        zoom_current(&mut state);
        assert!(state.is_scroll_locked());

        assert!(state.handle(Message::Scrolled(800.0)).is_empty());
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn leaving_a_page_resets_its_zoom() {
        let mut state = gallery(3, 0);
        let first = state.current_id();
        zoom_current(&mut state);

        state.handle(Message::GoTo(1));
        let view = first.and_then(|id| state.view(id)).expect("page 0 stays mounted");
        assert!(view.transform().is_identity());
        assert!(!state.is_scroll_locked());
    }

    #[test]
    fn next_and_previous_do_not_wrap() {
        let mut state = gallery(2, 0);
        assert!(state.handle(Message::Previous).is_empty());
        assert_eq!(state.handle(Message::Next), vec![Effect::PageChanged(1)]);
        assert!(state.handle(Message::Next).is_empty());
        assert_eq!(state.scroll_position(), 1.0);
    }

    #[test]
    fn empty_gallery_is_inert() {
        let mut state = gallery(0, 0);
        assert!(state.is_empty());
        assert_eq!(state.page_label(), "0 / 0");
        assert!(state.handle(Message::Scrolled(100.0)).is_empty());
        assert!(state
            .handle(Message::Pointer(PointerEvent::down(1, 0.0, 0.0, ms(0))))
            .is_empty());
    }
}
