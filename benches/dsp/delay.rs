//! Benchmarks for the fractional delay line.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use petal_chorus::dsp::delay::DelayLine;

use crate::{test_signal, BLOCK_SIZES};

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    let delay_times: &[f32] = &[
        240.5,   // 5ms at 48kHz
        1200.25, // 25ms
        23_999.0, // longest chorus delay
    ];

    for &size in BLOCK_SIZES {
        let input = test_signal(size);

        for &delay_samples in delay_times {
            let delay_ms = delay_samples / 48.0;
            let mut line = DelayLine::<48_000>::new();

            group.bench_with_input(
                BenchmarkId::new(format!("write_read_{}ms", delay_ms as u32), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        let mut sum = 0.0f32;
                        for &sample in &input {
                            line.write(sample);
                            sum += line.read(black_box(delay_samples));
                        }
                        sum
                    })
                },
            );
        }

        // Swept read, as the chorus taps do
        let mut line = DelayLine::<48_000>::new();
        for &sample in &input {
            line.write(sample);
        }
        group.bench_with_input(BenchmarkId::new("read_swept", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for i in 0..size {
                    let delay_time = 480.0 + (i as f32 * 0.1).sin() * 240.0;
                    sum += line.read(black_box(delay_time));
                }
                sum
            })
        });
    }

    group.finish();
}
