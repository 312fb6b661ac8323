//! Benchmarks for the complete signal chains.

mod chorus;
mod pedal;

pub use chorus::bench_chorus;
pub use pedal::bench_pedal;
