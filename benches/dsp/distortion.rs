//! Benchmarks for the output soft clipper.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use petal_chorus::dsp::distortion::SoftClip;

use crate::{test_signal, BLOCK_SIZES};

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");

    for &size in BLOCK_SIZES {
        // Quiet input mostly takes the linear branch
        let quiet = test_signal(size);
        // Hot input mostly takes the sin() branch
        let hot: Vec<f32> = quiet.iter().map(|s| s * 3.0).collect();
        let clip = SoftClip::new(0.8);

        for (name, input) in [("soft_clip_quiet", &quiet), ("soft_clip_hot", &hot)] {
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(input);
                    clip.process_block(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
