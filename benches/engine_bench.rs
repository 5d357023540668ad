//! Benchmarks for the synthesis primitives and the realtime mix loop.
//!
//! Run with: cargo bench
//!
//! The registry render is the hard-deadline path: at 48kHz a 512-sample
//! buffer must be mixed in under 10.67ms, voices included. These benches
//! track how far under that deadline the engine sits as the voice count
//! grows.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use driftwave::dsp::envelope::{Breakpoint, Envelope};
use driftwave::dsp::voice::{Voice, VoiceId};
use driftwave::dsp::wavetable::WaveTable;
use driftwave::engine::registry::VoiceRegistry;

/// Common buffer sizes used in audio applications.
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

const SAMPLE_RATE: u32 = 48_000;

fn swell() -> Arc<Envelope> {
    Arc::new(
        Envelope::from_points(vec![
            Breakpoint { time: 0.0, value: 0.0 },
            Breakpoint { time: 1.0, value: 1.0 },
            Breakpoint { time: 3.0, value: 0.6 },
            Breakpoint { time: 4.0, value: 0.0 },
        ])
        .unwrap(),
    )
}

fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let envelope = swell();

    group.bench_function("value_at_time", |b| {
        let mut t = 0.0f32;
        b.iter(|| {
            t = (t + 0.013) % 4.0;
            black_box(envelope.value_at_time(black_box(t)))
        })
    });

    group.bench_function("value_at_fraction", |b| {
        let mut f = 0.0f32;
        b.iter(|| {
            f = (f + 0.003) % 1.0;
            black_box(envelope.value_at_fraction(black_box(f)))
        })
    });

    group.finish();
}

fn bench_wavetable(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/wavetable");
    let len = SAMPLE_RATE as usize;

    group.bench_function("sine", |b| {
        b.iter(|| black_box(WaveTable::sine(black_box(len))))
    });

    group.bench_function("timbre", |b| {
        b.iter(|| black_box(WaveTable::timbre(black_box(len), 5)))
    });

    group.finish();
}

fn bench_voice_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/voice");

    let table = Arc::new(WaveTable::timbre(SAMPLE_RATE as usize, 4));
    let mut voice = Voice::new(
        VoiceId(0),
        table,
        swell(),
        SAMPLE_RATE,
        220.0,
        0.5,
        // Long enough to stay in the sounding state for the whole run.
        100_000.0,
        0.0,
    );

    group.bench_function("tick", |b| b.iter(|| black_box(voice.tick())));

    group.finish();
}

fn bench_registry_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/registry_render");

    for &voices in &[1usize, 8, 32, 64] {
        for &size in BLOCK_SIZES {
            let registry = VoiceRegistry::new();
            let table = Arc::new(WaveTable::timbre(SAMPLE_RATE as usize, 3));
            let envelope = swell();

            for id in 0..voices {
                registry.add(Voice::new(
                    VoiceId(id as u64),
                    Arc::clone(&table),
                    Arc::clone(&envelope),
                    SAMPLE_RATE,
                    110.0 + id as f32 * 7.0,
                    0.1,
                    100_000.0,
                    0.0,
                ));
            }

            let mut buffer = vec![0.0f32; size];
            let label = format!("{voices}_voices");
            group.bench_with_input(BenchmarkId::new(label, size), &size, |b, _| {
                b.iter(|| registry.render(black_box(&mut buffer)))
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_envelope,
    bench_wavetable,
    bench_voice_tick,
    bench_registry_render,
);
criterion_main!(benches);
