// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, Criterion};
use iced_core::{Size, Vector};
use lightbox::config::Settings;
use lightbox::media::ViewableImage;
use lightbox::ui::gestures::{Arbiter, PointerEvent};
use lightbox::ui::state::Bounds;
use lightbox::ui::viewer::subcomponents::image_view::{Message, State};
use std::hint::black_box;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);

fn pinch_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture_frame");

    group.bench_function("pinch_and_pan_60_frames", |b| {
        b.iter(|| {
            let mut view = State::new(
                ViewableImage::new("file:///bench.jpg", 4032.0, 3024.0),
                Size::new(1170.0, 2532.0),
                Settings::default(),
            );
            let mut now = Duration::ZERO;
            view.handle(Message::Pointer(PointerEvent::down(1, 400.0, 1200.0, now)));
            view.handle(Message::Pointer(PointerEvent::down(2, 700.0, 1200.0, now)));
            for i in 0..60_u16 {
                now += FRAME;
                let spread = f32::from(i) * 4.0;
                view.handle(Message::Pointer(PointerEvent::moved(
                    2,
                    700.0 + spread,
                    1200.0 + spread / 2.0,
                    now,
                )));
                black_box(view.handle(Message::Tick(now)));
            }
            black_box(view.transform())
        });
    });

    group.bench_function("arbiter_tap_sequence", |b| {
        let settings = Settings::default();
        b.iter(|| {
            let mut arbiter = Arbiter::new(&settings);
            arbiter.handle_pointer(PointerEvent::down(1, 10.0, 10.0, Duration::ZERO));
            arbiter.handle_pointer(PointerEvent::up(1, 10.0, 10.0, FRAME));
            black_box(arbiter.tick(Duration::from_millis(400)))
        });
    });

    group.bench_function("bounds_clamp", |b| {
        let bounds = Bounds::new(Size::new(1170.0, 877.0), Size::new(1170.0, 2532.0));
        b.iter(|| black_box(bounds.clamp(black_box(Vector::new(900.0, -400.0)), black_box(2.4))));
    });

    group.finish();
}

criterion_group!(benches, pinch_frames);
criterion_main!(benches);
