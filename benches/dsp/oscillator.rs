//! Benchmarks for LFO waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use petal_chorus::dsp::oscillator::{Oscillator, OscillatorWaveform};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    let waveforms = [
        ("sine", OscillatorWaveform::Sine),         // sin() per sample
        ("triangle", OscillatorWaveform::Triangle), // absolute value
        ("saw", OscillatorWaveform::Saw),           // linear ramp
        ("pulse", OscillatorWaveform::Pulse),       // branch per sample
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, waveform) in waveforms {
            let mut osc = Oscillator::new(SAMPLE_RATE)
                .with_waveform(waveform)
                .with_frequency(1.5);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for out in buffer.iter_mut() {
                        *out = osc.process();
                    }
                    black_box(&mut buffer);
                })
            });
        }
    }

    group.finish();
}
