//! Criterion benchmark: whole plays through the session tick.
//!
//! Run with: cargo bench -p gridiron_core --bench play_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use gridiron_core::{Button, EngineConfig, InputFrame, Session};

const DT: f32 = 1.0 / 60.0;

/// Snapped session for `play`, ready to tick.
fn snapped(play: &str) -> Session {
    let mut session = Session::new(EngineConfig::default());
    if session.select_play(play).is_ok() {
        session.snap();
    }
    session
}

fn bench_full_play(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_play");
    for play in ["Outside", "Mesh"] {
        group.bench_with_input(BenchmarkId::from_parameter(play), &play, |b, play| {
            b.iter(|| {
                let mut session = snapped(play);
                let events = session.advance(10.5, DT, &InputFrame::idle());
                black_box(events.len())
            })
        });
    }
    group.finish();
}

fn bench_single_tick(c: &mut Criterion) {
    let mut session = snapped("Mesh");
    let steer = InputFrame::idle().with_direction(0.4, 0.9).hold(Button::Run);
    c.bench_function("live_tick", |b| {
        b.iter(|| black_box(session.step(DT, &steer)))
    });
}

criterion_group!(benches, bench_full_play, bench_single_tick);
criterion_main!(benches);
