//! Benchmarks for dry/wet mixing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use petal_chorus::dsp::mix::{MixCurve, Mixer};

use crate::{test_signal, BLOCK_SIZES};

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    let curves = [
        ("linear", MixCurve::Linear),
        ("equal_power", MixCurve::EqualPower),
        ("sqrt", MixCurve::Sqrt),
    ];

    for &size in BLOCK_SIZES {
        let dry = test_signal(size);
        let wet: Vec<f32> = dry.iter().rev().copied().collect();
        let mut buffer = dry.clone();

        // Gains are cached, so the curve only matters on set_mix
        for (name, curve) in curves {
            let mixer = Mixer::new(curve);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&dry);
                    mixer.process_block(black_box(&mut buffer), black_box(&wet));
                })
            });
        }

        // Mix moved every sample recomputes the gains
        let mut mixer = Mixer::new(MixCurve::EqualPower);
        group.bench_with_input(BenchmarkId::new("equal_power_moving", size), &size, |b, _| {
            b.iter(|| {
                for (i, (out, (&d, &w))) in buffer.iter_mut().zip(dry.iter().zip(&wet)).enumerate() {
                    mixer.set_mix(i as f32 / size as f32);
                    *out = mixer.process(black_box(d), black_box(w));
                }
            })
        });
    }

    group.finish();
}
