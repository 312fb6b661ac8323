//! Benchmarks for the multi-tap modulated delay.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use petal_chorus::dsp::multitap::MultitapDelay;

use crate::{test_signal, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_multitap(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/multitap");

    for &size in BLOCK_SIZES {
        let input = test_signal(size);
        let mut output = vec![0.0f32; size];

        // Cost grows with the number of taps read per sample
        for taps in [1, 2, 8] {
            let mut delay = MultitapDelay::<8, 48_000>::new(SAMPLE_RATE, 666);
            delay.set_delay_time(0.015);
            delay.set_rate(1.5);
            delay.set_depth(0.5);
            delay.set_feedback_level(0.4);
            delay.set_num_active_taps(taps);

            group.bench_with_input(BenchmarkId::new(format!("taps_{taps}"), size), &size, |b, _| {
                b.iter(|| {
                    for (out, &sample) in output.iter_mut().zip(&input) {
                        *out = delay.process(black_box(sample));
                    }
                })
            });
        }

        // Delay time changing every sample recomputes the tap layout
        let mut delay = MultitapDelay::<8, 48_000>::new(SAMPLE_RATE, 666);
        delay.set_num_active_taps(2);
        group.bench_with_input(BenchmarkId::new("ramping_delay", size), &size, |b, _| {
            b.iter(|| {
                for (i, (out, &sample)) in output.iter_mut().zip(&input).enumerate() {
                    delay.set_delay_time(0.010 + i as f32 * 1e-6);
                    *out = delay.process(black_box(sample));
                }
            })
        });
    }

    group.finish();
}
