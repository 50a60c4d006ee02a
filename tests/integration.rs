// SPDX-License-Identifier: MPL-2.0
use approx::assert_abs_diff_eq;
use iced_core::{Size, Vector};
use lightbox::app::FileOnboardingStore;
use lightbox::config::{self, Config, Settings};
use lightbox::media::ViewableImage;
use lightbox::ui::gestures::{GestureKind, PointerEvent, PrecedenceTable};
use lightbox::ui::state::{Bounds, DismissEvaluator};
use lightbox::ui::viewer::subcomponents::caption::CaptionInfo;
use lightbox::ui::viewer::subcomponents::image_view::{self, Effect as ImageEffect};
use lightbox::ui::viewer::subcomponents::onboarding::{MemoryStore, OnboardingStore};
use lightbox::ui::viewer::{Effect, Item, Message, Viewer};
use std::time::Duration;
use tempfile::tempdir;

const FRAME: Duration = Duration::from_millis(16);

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn viewport() -> Size {
    Size::new(800.0, 600.0)
}

fn photo() -> ViewableImage {
    ViewableImage::new("file:///photo.jpg", 1600.0, 1200.0)
}

fn image_view() -> image_view::State {
    image_view::State::new(photo(), viewport(), Settings::default())
}

fn pointer(view: &mut image_view::State, event: PointerEvent) -> Vec<ImageEffect> {
    view.handle(image_view::Message::Pointer(event))
}

fn settle(view: &mut image_view::State, mut now: Duration) -> (Duration, Vec<ImageEffect>) {
    let mut effects = Vec::new();
    for _ in 0..1000 {
        now += FRAME;
        effects.extend(view.handle(image_view::Message::Tick(now)));
        if !view.is_animating() && now > ms(400) {
            break;
        }
    }
    (now, effects)
}

fn double_tap(view: &mut image_view::State, x: f32, y: f32, start: Duration) {
    pointer(view, PointerEvent::down(1, x, y, start));
    pointer(view, PointerEvent::up(1, x, y, start + ms(50)));
    pointer(view, PointerEvent::down(1, x, y, start + ms(150)));
    pointer(view, PointerEvent::up(1, x, y, start + ms(200)));
}

fn viewer(items: usize, store: Box<dyn OnboardingStore>) -> Viewer {
    let items = (0..items)
        .map(|i| {
            Item::new(
                ViewableImage::new(format!("file:///{i}.jpg"), 1600.0, 1200.0),
                CaptionInfo {
                    author: format!("author {i}"),
                    ..CaptionInfo::default()
                },
            )
        })
        .collect();
    Viewer::new(items, 0, viewport(), Settings::default(), store, Duration::ZERO)
}

fn memory_store() -> Box<MemoryStore> {
    Box::new(MemoryStore::new(true))
}

#[test]
fn clamp_is_idempotent_above_rest() {
    let bounds = Bounds::new(Size::new(800.0, 600.0), viewport());
    for scale in [1.0, 1.3, 2.0, 2.7, 3.0] {
        for pan in [
            Vector::new(0.0, 0.0),
            Vector::new(5000.0, -5000.0),
            Vector::new(-123.4, 56.7),
        ] {
            let once = bounds.clamp(pan, scale);
            assert_eq!(bounds.clamp(once, scale), once);
        }
    }
}

#[test]
fn clamp_at_rest_is_always_centered() {
    let bounds = Bounds::new(Size::new(800.0, 600.0), viewport());
    for pan in [Vector::new(1.0, 1.0), Vector::new(-400.0, 900.0)] {
        assert_eq!(bounds.clamp(pan, 1.0), Vector::new(0.0, 0.0));
    }
}

#[test]
fn dismiss_is_monotonic_in_velocity() {
    let evaluator = DismissEvaluator::new(500.0, 100.0);
    let mut dismissed = false;
    for step in 0..=40 {
        let velocity = step as f32 * 25.0;
        let decision = evaluator.evaluate(velocity, 30.0);
        assert!(!dismissed || decision.should_dismiss);
        dismissed = decision.should_dismiss;
    }
    assert!(dismissed);
}

#[test]
fn double_tap_round_trip_returns_to_identity() {
    let mut view = image_view();
    double_tap(&mut view, 250.0, 420.0, Duration::ZERO);
    let (now, _) = settle(&mut view, ms(200));
    assert_abs_diff_eq!(view.transform().scale, 2.0, epsilon = 1e-3);

    double_tap(&mut view, 250.0, 420.0, now + ms(500));
    settle(&mut view, now + ms(700));
    assert!(view.transform().is_identity());
}

#[test]
fn page_switch_resets_zoom() {
    let mut viewer = viewer(3, memory_store());
    for (t, down) in [(0, true), (50, false), (150, true), (200, false)] {
        let event = if down {
            PointerEvent::down(1, 400.0, 300.0, ms(t))
        } else {
            PointerEvent::up(1, 400.0, 300.0, ms(t))
        };
        viewer.handle(Message::Pointer(event));
    }
    let mut now = ms(200);
    while viewer.is_animating() {
        now += FRAME;
        viewer.handle(Message::Tick(now));
    }
    let first = viewer.gallery().current_id().unwrap();
    assert!(viewer.gallery().is_scroll_locked());

    assert_eq!(viewer.handle(Message::GoTo(1)), vec![Effect::PageChanged(1)]);
    assert_eq!(viewer.handle(Message::GoTo(0)), vec![Effect::PageChanged(0)]);

    let view = viewer.gallery().view(first).unwrap();
    assert!(view.transform().is_identity());
    assert_eq!(viewer.gallery().current_id(), Some(first));
}

#[test]
fn scenario_centered_pinch_stays_centered() {
    let mut view = image_view();
    pointer(&mut view, PointerEvent::down(1, 300.0, 300.0, ms(0)));
    pointer(&mut view, PointerEvent::down(2, 500.0, 300.0, ms(10)));
    pointer(&mut view, PointerEvent::moved(1, 200.0, 300.0, ms(30)));
    pointer(&mut view, PointerEvent::moved(2, 600.0, 300.0, ms(30)));

    let t = view.transform();
    assert_abs_diff_eq!(t.scale, 2.0, epsilon = 1e-4);
    assert_abs_diff_eq!(t.pan.x, 0.0, epsilon = 1e-3);
    assert_abs_diff_eq!(t.pan.y, 0.0, epsilon = 1e-3);
}

#[test]
fn scenario_zoomed_pan_within_bounds_is_unchanged() {
    let mut view = image_view();
    double_tap(&mut view, 400.0, 300.0, Duration::ZERO);
    let (now, _) = settle(&mut view, ms(200));

    pointer(&mut view, PointerEvent::down(1, 400.0, 300.0, now));
    pointer(&mut view, PointerEvent::moved(1, 450.0, 350.0, now + FRAME));

    let t = view.transform();
    assert_abs_diff_eq!(t.pan.x, 50.0, epsilon = 1e-3);
    assert_abs_diff_eq!(t.pan.y, 50.0, epsilon = 1e-3);
    // The 1600x1200 photo is aspect-fitted to 800x600 before zooming, so at
    // scale 2 the limit is (1600 - 800) / 2 = 400, not the 1200 an unfitted
    // 1600px display would give (see `intrinsic_sized_display_matches_worked_example`).
    let max = view.bounds().max_offset(2.0);
    assert_abs_diff_eq!(max.x, 400.0, epsilon = 1e-3);
    assert_abs_diff_eq!(max.y, 300.0, epsilon = 1e-3);
}

#[test]
fn scenario_long_slow_drag_dismisses_on_distance() {
    let mut view = image_view();
    pointer(&mut view, PointerEvent::down(1, 400.0, 300.0, ms(0)));
    pointer(&mut view, PointerEvent::moved(1, 400.0, 450.0, ms(100)));
    // Hold still long enough for the fling velocity to decay.
    pointer(&mut view, PointerEvent::up(1, 400.0, 450.0, ms(900)));
    assert!(view.is_closing());

    let (_, effects) = settle(&mut view, ms(900));
    assert_eq!(effects, vec![ImageEffect::Close]);
}

#[test]
fn scenario_short_slow_drag_springs_back() {
    let mut view = image_view();
    pointer(&mut view, PointerEvent::down(1, 400.0, 300.0, ms(0)));
    for i in 1..=4_u64 {
        let y = 300.0 + i as f32 * 5.0;
        pointer(&mut view, PointerEvent::moved(1, 400.0, y, ms(i * 100)));
    }
    assert_abs_diff_eq!(view.transform().pan.y, 20.0, epsilon = 1e-3);
    pointer(&mut view, PointerEvent::up(1, 400.0, 320.0, ms(400)));
    assert!(!view.is_closing());

    let (_, effects) = settle(&mut view, ms(400));
    assert!(effects.is_empty());
    assert!(view.transform().is_identity());
}

#[test]
fn scenario_long_press_during_pinch_keeps_legal_scale() {
    let mut viewer = viewer(1, memory_store());
    viewer.handle(Message::Pointer(PointerEvent::down(1, 300.0, 300.0, ms(0))));
    viewer.handle(Message::Pointer(PointerEvent::down(2, 500.0, 300.0, ms(20))));
    viewer.handle(Message::Pointer(PointerEvent::moved(2, 660.0, 300.0, ms(100))));
    let scale = viewer.gallery().current_view().unwrap().transform().scale;
    assert_abs_diff_eq!(scale, 1.8, epsilon = 1e-4);

    let effects = viewer.handle(Message::Tick(ms(500)));
    assert_eq!(effects.first(), Some(&Effect::LongPress));
    assert!(effects
        .iter()
        .any(|e| matches!(e, Effect::ZoomChanged(s) if (s - 1.8).abs() < 1e-4)));

    // Further movement no longer zooms until every finger lifts.
    viewer.handle(Message::Pointer(PointerEvent::moved(2, 760.0, 300.0, ms(520))));
    let mut now = ms(520);
    for _ in 0..100 {
        now += FRAME;
        viewer.handle(Message::Tick(now));
    }
    let view = viewer.gallery().current_view().unwrap();
    let t = view.transform();
    assert_abs_diff_eq!(t.scale, 1.8, epsilon = 1e-4);
    assert!(view.bounds().is_legal(t.pan, t.scale));
}

#[test]
fn long_press_outranks_every_other_gesture() {
    let table = PrecedenceTable::default();
    for kind in [
        GestureKind::Tap,
        GestureKind::DoubleTap,
        GestureKind::Pinch,
        GestureKind::Pan,
    ] {
        assert!(table.cancels(GestureKind::LongPress, kind));
    }
    assert!(!table.cancels(GestureKind::Pinch, GestureKind::Pan));
    assert!(!table.cancels(GestureKind::Tap, GestureKind::Pinch));
}

#[test]
fn config_overrides_reach_the_engine() {
    let dir = tempdir().expect("failed to create temp dir");
    let path = dir.path().join("settings.toml");

    let config = Config {
        double_tap_scale: Some(2.5),
        ..Config::default()
    };
    config::save_to_path(&config, &path).expect("failed to save config");
    let settings = config::load_from_path(&path)
        .expect("failed to load config")
        .settings();
    assert_abs_diff_eq!(settings.double_tap_scale, 2.5);

    let mut view = image_view::State::new(photo(), viewport(), settings);
    double_tap(&mut view, 400.0, 300.0, Duration::ZERO);
    settle(&mut view, ms(200));
    assert_abs_diff_eq!(view.transform().scale, 2.5, epsilon = 1e-3);
}

#[test]
fn onboarding_is_shown_once_across_sessions() {
    let dir = tempdir().expect("failed to create temp dir");

    let mut first = viewer(1, Box::new(FileOnboardingStore::in_dir(dir.path().to_path_buf())));
    first.handle(Message::Tick(ms(700)));
    assert!(first.onboarding_visible());
    first.handle(Message::OnboardingDismissed);
    assert_eq!(first.notifications().visible_count(), 0);

    let mut second = viewer(1, Box::new(FileOnboardingStore::in_dir(dir.path().to_path_buf())));
    second.handle(Message::Tick(ms(5000)));
    assert!(!second.onboarding_visible());
}
