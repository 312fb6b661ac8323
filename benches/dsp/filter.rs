//! Benchmarks for the shelf, tone and high-pass filters.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use petal_chorus::dsp::filter::{BiquadFilter, OnePoleFilter};

use crate::{test_signal, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let input = test_signal(size);
        let mut output = vec![0.0f32; size];

        // Biquad low shelf, fixed coefficients
        let mut shelf = BiquadFilter::low_shelf(SAMPLE_RATE, 250.0, 0.707, 6.0);
        group.bench_with_input(BenchmarkId::new("low_shelf", size), &size, |b, _| {
            b.iter(|| {
                for (out, &sample) in output.iter_mut().zip(&input) {
                    *out = shelf.process(black_box(sample));
                }
            })
        });

        // Shelf gain retargeted once per block, as the mix knob does
        let mut shelf = BiquadFilter::low_shelf(SAMPLE_RATE, 250.0, 0.707, 0.0);
        let mut gain = 0.0f32;
        group.bench_with_input(BenchmarkId::new("low_shelf_retuned", size), &size, |b, _| {
            b.iter(|| {
                gain = if gain > 5.0 { 0.0 } else { gain + 0.1 };
                shelf.set_gain(gain);
                for (out, &sample) in output.iter_mut().zip(&input) {
                    *out = shelf.process(black_box(sample));
                }
            })
        });

        let mut high_pass = BiquadFilter::high_pass(SAMPLE_RATE, 100.0, 0.707);
        group.bench_with_input(BenchmarkId::new("high_pass", size), &size, |b, _| {
            b.iter(|| {
                for (out, &sample) in output.iter_mut().zip(&input) {
                    *out = high_pass.process(black_box(sample));
                }
            })
        });

        // One-pole tone control with a cutoff update per sample
        let mut tone = OnePoleFilter::lowpass(SAMPLE_RATE, 4_000.0);
        group.bench_with_input(BenchmarkId::new("tone_sweep", size), &size, |b, _| {
            b.iter(|| {
                for (i, (out, &sample)) in output.iter_mut().zip(&input).enumerate() {
                    tone.set_cutoff(1_000.0 + (i % 64) as f32 * 100.0);
                    *out = tone.process(black_box(sample));
                }
            })
        });
    }

    group.finish();
}
