//! Stereo chorus at different voice counts.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use petal_chorus::dsp::Chorus;

use crate::{test_signal, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_chorus(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/chorus");
    // Chorus construction allocates two 48k-sample lines per channel
    group.sample_size(50);

    for &size in BLOCK_SIZES {
        let input = test_signal(size);
        let mut out_l = vec![0.0f32; size];
        let mut out_r = vec![0.0f32; size];

        for voices in [1, 2, 8] {
            let mut chorus = Chorus::new(SAMPLE_RATE);
            chorus.set_num_voices(voices);
            chorus.set_depth(0.5);
            chorus.set_rate(1.2);
            chorus.set_feedback_level(0.3);

            group.bench_with_input(BenchmarkId::new(format!("voices_{voices}"), size), &size, |b, _| {
                b.iter(|| {
                    for ((&sample, l), r) in input.iter().zip(out_l.iter_mut()).zip(out_r.iter_mut()) {
                        (*l, *r) = chorus.process_stereo(black_box(sample), black_box(sample));
                    }
                })
            });
        }
    }

    group.finish();
}
