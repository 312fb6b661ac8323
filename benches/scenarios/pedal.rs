//! The whole pedal: control frame, filters, chorus, mix and clip.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use petal_chorus::{io::ControlFrame, ChorusPedal, PedalConfig};

use crate::{test_signal, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_pedal(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/pedal");
    group.sample_size(50);

    let configs = [
        ("petal", PedalConfig::petal(SAMPLE_RATE)),
        ("terrarium", PedalConfig::terrarium(SAMPLE_RATE)),
    ];

    for &size in BLOCK_SIZES {
        let input = test_signal(size);
        let mut out_l = vec![0.0f32; size];
        let mut out_r = vec![0.0f32; size];

        for (name, config) in &configs {
            let Ok(mut pedal) = ChorusPedal::new(config.clone()) else {
                continue;
            };

            // Knobs still, one control frame per block
            let frame = ControlFrame::default();
            group.bench_with_input(BenchmarkId::new(format!("{name}_steady"), size), &size, |b, _| {
                b.iter(|| {
                    pedal.apply_controls(&frame);
                    pedal.process_block(black_box(&input), black_box(&input), &mut out_l, &mut out_r);
                })
            });

            // Every knob moving, so all smoothers ramp
            let mut sweep = 0.0f32;
            group.bench_with_input(BenchmarkId::new(format!("{name}_sweeping"), size), &size, |b, _| {
                b.iter(|| {
                    sweep = (sweep + 0.013) % 1.0;
                    let mut frame = ControlFrame::default();
                    for knob in 0..6 {
                        frame = frame.with_knob(knob, (sweep + knob as f32 * 0.1) % 1.0);
                    }
                    pedal.apply_controls(&frame);
                    pedal.process_block(black_box(&input), black_box(&input), &mut out_l, &mut out_r);
                })
            });
        }
    }

    group.finish();
}
