//! The audio-thread context: a pedal plus the control frames feeding it.

use crate::io::{ControlReceiver, Indicators};
use crate::pedal::ChorusPedal;

/// Everything the audio callback owns.
///
/// Built on the control side, then moved into the callback. Each block it
/// drains every pending [`ControlFrame`](crate::io::ControlFrame) in arrival
/// order, so no switch edge is skipped even when several frames queue up
/// between blocks, then renders.
pub struct PedalEngine<R: ControlReceiver> {
    pedal: ChorusPedal,
    rx: R,
    frames_applied: u64,
    blocks_rendered: u64,
}

impl<R: ControlReceiver> PedalEngine<R> {
    pub fn new(pedal: ChorusPedal, rx: R) -> Self {
        Self {
            pedal,
            rx,
            frames_applied: 0,
            blocks_rendered: 0,
        }
    }

    /// Apply all queued control frames. Returns how many were applied.
    pub fn drain_controls(&mut self) -> usize {
        let mut applied = 0;
        while let Some(frame) = self.rx.pop() {
            self.pedal.apply_controls(&frame);
            applied += 1;
        }
        self.frames_applied += applied as u64;
        applied
    }

    pub fn process_block(
        &mut self,
        in_left: &[f32],
        in_right: &[f32],
        out_left: &mut [f32],
        out_right: &mut [f32],
    ) -> Indicators {
        self.drain_controls();
        self.pedal.process_block(in_left, in_right, out_left, out_right);
        self.blocks_rendered += 1;
        self.pedal.indicators()
    }

    /// Interleaved stereo, processed in place.
    pub fn process_interleaved(&mut self, buffer: &mut [f32]) -> Indicators {
        self.drain_controls();
        self.pedal.process_interleaved(buffer);
        self.blocks_rendered += 1;
        self.pedal.indicators()
    }

    pub fn pedal(&self) -> &ChorusPedal {
        &self.pedal
    }

    pub fn pedal_mut(&mut self) -> &mut ChorusPedal {
        &mut self.pedal
    }

    pub fn frames_applied(&self) -> u64 {
        self.frames_applied
    }

    pub fn blocks_rendered(&self) -> u64 {
        self.blocks_rendered
    }

    pub fn into_parts(self) -> (ChorusPedal, R) {
        (self.pedal, self.rx)
    }
}
