// SPDX-License-Identifier: MPL-2.0
//! Scripted gesture replay.
//!
//! A replay script is a TOML file listing the gallery's images and a timed
//! sequence of input steps. Replaying it drives a [`Viewer`] frame by frame
//! at a fixed frame interval, which makes tuning thresholds and reproducing
//! gesture bugs possible without a touch screen.
//!
//! ```toml
//! initial = 0
//!
//! [[image]]
//! uri = "file:///beach.jpg"
//! width = 1600
//! height = 1200
//! author = "ana"
//!
//! [[step]]
//! action = "down"
//! at = 0
//! pointer = 1
//! x = 400
//! y = 300
//!
//! [[step]]
//! action = "up"
//! at = 60
//! pointer = 1
//! x = 400
//! y = 300
//! ```

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::media::ViewableImage;
use crate::ui::gestures::{Phase, PointerEvent};
use crate::ui::state::Transform;
use crate::ui::viewer::subcomponents::caption::CaptionInfo;
use crate::ui::viewer::subcomponents::onboarding::OnboardingStore;
use crate::ui::viewer::{Effect, Item, Message, Viewer};
use iced_core::{Point, Size};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Longest a replay keeps ticking after its last step, waiting for
/// animations to settle.
const MAX_SETTLE: Duration = Duration::from_secs(10);

/// A parsed replay script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub initial: usize,
    /// Used when the host supplies no persistent onboarding store.
    #[serde(default = "default_onboarding_seen")]
    pub onboarding_seen: bool,
    #[serde(rename = "image", default)]
    pub images: Vec<ScriptImage>,
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

fn default_onboarding_seen() -> bool {
    true
}

/// One gallery entry of a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptImage {
    pub uri: String,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub reactions: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub shares: u64,
    #[serde(default)]
    pub liked: bool,
}

impl ScriptImage {
    fn item(&self) -> Item {
        Item::new(
            ViewableImage::new(self.uri.clone(), self.width, self.height),
            CaptionInfo {
                author: self.author.clone(),
                text: self.caption.clone(),
                reactions: self.reactions,
                comments: self.comments,
                shares: self.shares,
                liked: self.liked,
            },
        )
    }
}

/// One timed input. `at` is in milliseconds since the viewer opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Down { at: u64, pointer: u64, x: f32, y: f32 },
    Move { at: u64, pointer: u64, x: f32, y: f32 },
    Up { at: u64, pointer: u64, x: f32, y: f32 },
    Cancel { at: u64, pointer: u64, x: f32, y: f32 },
    /// Only advances time.
    Wait { at: u64 },
    /// Pager offset in pixels.
    Scroll { at: u64, offset: f32 },
    GoTo { at: u64, index: usize },
    CaptionHandle { at: u64 },
    DismissOnboarding { at: u64 },
}

impl Step {
    #[must_use]
    pub fn at(&self) -> Duration {
        let ms = match self {
            Step::Down { at, .. }
            | Step::Move { at, .. }
            | Step::Up { at, .. }
            | Step::Cancel { at, .. }
            | Step::Wait { at }
            | Step::Scroll { at, .. }
            | Step::GoTo { at, .. }
            | Step::CaptionHandle { at }
            | Step::DismissOnboarding { at } => *at,
        };
        Duration::from_millis(ms)
    }

    fn message(&self) -> Option<Message> {
        let pointer = |id: u64, phase: Phase, x: f32, y: f32| {
            Message::Pointer(PointerEvent::new(id, phase, Point::new(x, y), self.at()))
        };
        match *self {
            Step::Down { pointer: id, x, y, .. } => Some(pointer(id, Phase::Down, x, y)),
            Step::Move { pointer: id, x, y, .. } => Some(pointer(id, Phase::Move, x, y)),
            Step::Up { pointer: id, x, y, .. } => Some(pointer(id, Phase::Up, x, y)),
            Step::Cancel { pointer: id, x, y, .. } => Some(pointer(id, Phase::Cancel, x, y)),
            Step::Wait { .. } => None,
            Step::Scroll { offset, .. } => Some(Message::Scrolled(offset)),
            Step::GoTo { index, .. } => Some(Message::GoTo(index)),
            Step::CaptionHandle { .. } => Some(Message::CaptionHandleTapped),
            Step::DismissOnboarding { .. } => Some(Message::OnboardingDismissed),
        }
    }
}

impl Script {
    /// Parses and validates a script.
    pub fn parse(content: &str) -> Result<Self> {
        let script: Script =
            toml::from_str(content).map_err(|err| Error::Script(err.to_string()))?;
        script.validate()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    fn validate(&self) -> Result<()> {
        let mut previous = Duration::ZERO;
        for (index, step) in self.steps.iter().enumerate() {
            if step.at() < previous {
                return Err(Error::Script(format!(
                    "step {} at {} ms goes back in time",
                    index + 1,
                    step.at().as_millis()
                )));
            }
            previous = step.at();
        }
        Ok(())
    }

    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        self.images.iter().map(ScriptImage::item).collect()
    }
}

/// What a replay produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    /// Every effect, stamped with the engine time it was produced at.
    pub effects: Vec<(Duration, Effect)>,
    /// Transform of the current page once everything settled.
    pub transform: Option<Transform>,
    pub page: usize,
    pub page_label: String,
    pub controls_visible: bool,
    pub overlay_faded: bool,
    /// Engine time of the last frame.
    pub finished_at: Duration,
}

/// Replays `script`, ticking every `frame` and settling after the last step.
pub fn run(
    script: &Script,
    viewport: Size,
    settings: Settings,
    store: Box<dyn OnboardingStore>,
    frame: Duration,
) -> Result<Replay> {
    if frame.is_zero() {
        return Err(Error::Script("frame interval must be positive".into()));
    }
    script.validate()?;

    let mut viewer = Viewer::new(
        script.items(),
        script.initial,
        viewport,
        settings,
        store,
        Duration::ZERO,
    );
    let mut effects = Vec::new();
    let mut clock = Duration::ZERO;

    for step in &script.steps {
        let at = step.at();
        while clock + frame <= at {
            clock += frame;
            record(&mut effects, clock, viewer.handle(Message::Tick(clock)));
        }
        if let Some(message) = step.message() {
            record(&mut effects, at, viewer.handle(message));
        }
    }

    // Let pending taps and long presses resolve, then wait for animations.
    let last = script.steps.last().map_or(Duration::ZERO, Step::at);
    let quiet_after = last + settings.double_tap_window.max(settings.long_press) + frame;
    let deadline = last + MAX_SETTLE;
    loop {
        clock += frame;
        record(&mut effects, clock, viewer.handle(Message::Tick(clock)));
        if clock >= quiet_after && !viewer.is_animating() {
            break;
        }
        if clock >= deadline {
            tracing::warn!(elapsed_ms = clock.as_millis() as u64, "replay did not settle");
            break;
        }
    }

    Ok(Replay {
        effects,
        transform: viewer
            .gallery()
            .current_view()
            .map(|view| view.transform()),
        page: viewer.gallery().current_index(),
        page_label: viewer.gallery().page_label(),
        controls_visible: viewer.controls_visible(),
        overlay_faded: viewer.overlay_faded(),
        finished_at: clock,
    })
}

fn record(log: &mut Vec<(Duration, Effect)>, at: Duration, produced: Vec<Effect>) {
    for effect in produced {
        tracing::debug!(at_ms = at.as_millis() as u64, ?effect, "effect");
        log.push((at, effect));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_abs_diff_eq, SETTLED_EPSILON};
    use crate::ui::viewer::subcomponents::onboarding::MemoryStore;

    const GALLERY: &str = r#"
        [[image]]
        uri = "file:///0.jpg"
        width = 1600
        height = 1200
        author = "ana"

        [[image]]
        uri = "file:///1.jpg"
        width = 1200
        height = 1600
    "#;

    fn replay(steps: &str) -> Replay {
        let script = Script::parse(&format!("{GALLERY}\n{steps}")).unwrap();
        run(
            &script,
            Size::new(800.0, 600.0),
            Settings::default(),
            Box::new(MemoryStore::new(script.onboarding_seen)),
            Duration::from_millis(16),
        )
        .unwrap()
    }

    fn effects(replay: &Replay) -> Vec<Effect> {
        replay.effects.iter().map(|(_, e)| e.clone()).collect()
    }

    #[test]
    fn double_tap_script_zooms_in() {
        let replay = replay(
            r#"
            [[step]]
            action = "down"
            at = 0
            pointer = 1
            x = 400
            y = 300
            [[step]]
            action = "up"
            at = 50
            pointer = 1
            x = 400
            y = 300
            [[step]]
            action = "down"
            at = 150
            pointer = 1
            x = 400
            y = 300
            [[step]]
            action = "up"
            at = 200
            pointer = 1
            x = 400
            y = 300
            "#,
        );
        assert_eq!(effects(&replay), vec![Effect::ZoomChanged(2.0)]);
        let transform = replay.transform.unwrap();
        assert_abs_diff_eq!(transform.scale, 2.0, epsilon = SETTLED_EPSILON);
        assert!(!replay.controls_visible);
    }

    #[test]
    fn goto_step_changes_page() {
        let replay = replay(
            r#"
            [[step]]
            action = "go_to"
            at = 10
            index = 1
            "#,
        );
        assert_eq!(effects(&replay), vec![Effect::PageChanged(1)]);
        assert_eq!(replay.page_label, "2 / 2");
    }

    #[test]
    fn long_drag_closes_viewer() {
        let replay = replay(
            r#"
            [[step]]
            action = "down"
            at = 0
            pointer = 1
            x = 400
            y = 300
            [[step]]
            action = "move"
            at = 100
            pointer = 1
            x = 400
            y = 380
            [[step]]
            action = "move"
            at = 200
            pointer = 1
            x = 400
            y = 450
            [[step]]
            action = "up"
            at = 300
            pointer = 1
            x = 400
            y = 450
            "#,
        );
        assert_eq!(effects(&replay), vec![Effect::Close]);
    }

    #[test]
    fn steps_out_of_order_are_rejected() {
        let err = Script::parse(&format!(
            "{GALLERY}\n[[step]]\naction = \"wait\"\nat = 100\n[[step]]\naction = \"wait\"\nat = 50\n"
        ))
        .unwrap_err();
        assert!(matches!(err, Error::Script(ref msg) if msg.contains("step 2")));
    }

    #[test]
    fn unknown_action_is_a_script_error() {
        let err = Script::parse("[[step]]\naction = \"teleport\"\nat = 0\n").unwrap_err();
        assert!(matches!(err, Error::Script(_)));
    }

    #[test]
    fn zero_frame_interval_is_rejected() {
        let script = Script::parse(GALLERY).unwrap();
        let result = run(
            &script,
            Size::new(800.0, 600.0),
            Settings::default(),
            Box::new(MemoryStore::default()),
            Duration::ZERO,
        );
        assert!(result.is_err());
    }
}
