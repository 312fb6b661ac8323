//! Benchmarks for parameter smoothing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use petal_chorus::dsp::smooth::SmoothValue;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_smooth(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/smooth");

    for &size in BLOCK_SIZES {
        // Retargeted every block, as the depth knob is
        let mut value = SmoothValue::<f32>::new(0.0);
        value.init(0.025, SAMPLE_RATE);
        let mut flip = false;
        group.bench_with_input(BenchmarkId::new("ramping", size), &size, |b, _| {
            b.iter(|| {
                flip = !flip;
                value.set_target(if flip { 1.0 } else { 0.0 });
                let mut sum = 0.0f32;
                for _ in 0..size {
                    sum += value.next_value();
                }
                black_box(sum)
            })
        });

        // At rest: hysteresis swallows the jitter
        let mut value = SmoothValue::<f32>::new(0.5);
        value.init(0.025, SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("resting", size), &size, |b, _| {
            b.iter(|| {
                value.set_target(black_box(0.50001));
                let mut sum = 0.0f32;
                for _ in 0..size {
                    sum += value.next_value();
                }
                black_box(sum)
            })
        });
    }

    group.finish();
}
