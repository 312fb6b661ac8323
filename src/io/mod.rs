//! Control-side plumbing: control snapshots in, LED intensities out.
//!
//! The audio callback never reads hardware or the keyboard directly. The
//! control thread scans its inputs into a [`ControlFrame`], pushes the frame
//! through a lock-free ring, and the engine drains the ring once per block
//! through the [`ControlReceiver`] seam.

pub mod controls;
pub mod indicators;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use std::collections::VecDeque;

pub use controls::{ControlFrame, ControlSurface, KNOB_COUNT, SWITCH_COUNT};
pub use indicators::Indicators;

/// Source of control frames for the audio thread.
pub trait ControlReceiver {
    fn pop(&mut self) -> Option<ControlFrame>;
}

#[cfg(feature = "rtrb")]
impl ControlReceiver for Consumer<ControlFrame> {
    fn pop(&mut self) -> Option<ControlFrame> {
        Consumer::pop(self).ok()
    }
}

impl ControlReceiver for VecDeque<ControlFrame> {
    fn pop(&mut self) -> Option<ControlFrame> {
        self.pop_front()
    }
}

/// A receiver that never yields; for offline renders driven directly.
impl ControlReceiver for () {
    fn pop(&mut self) -> Option<ControlFrame> {
        None
    }
}
