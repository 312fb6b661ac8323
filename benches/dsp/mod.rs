//! Benchmarks for low-level DSP primitives.

mod delay;
mod distortion;
mod filter;
mod mix;
mod multitap;
mod oscillator;
mod smooth;

pub use delay::bench_delay;
pub use distortion::bench_distortion;
pub use filter::bench_filter;
pub use mix::bench_mix;
pub use multitap::bench_multitap;
pub use oscillator::bench_oscillator;
pub use smooth::bench_smooth;
