#[cfg(feature = "rtrb")]
use rtrb::Producer;
use tracing::debug;
#[cfg(feature = "rtrb")]
use tracing::trace;

use crate::config::{ControlBindings, SwitchAction};

/// Knob slots on a control frame.
pub const KNOB_COUNT: usize = 6;
/// Switch slots on a control frame.
pub const SWITCH_COUNT: usize = 8;

/// One snapshot of every control input.
///
/// Frames are plain `Copy` data so they can cross the control → audio ring
/// without allocation. `rising[i]` is true only on the frame where switch `i`
/// went down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlFrame {
    /// Normalized knob positions in `[0, 1]`.
    pub knobs: [f32; KNOB_COUNT],
    pub pressed: [bool; SWITCH_COUNT],
    pub rising: [bool; SWITCH_COUNT],
    /// Milliseconds on a monotonic clock; only differences are used.
    pub now_ms: u32,
}

impl ControlFrame {
    pub fn new(knobs: [f32; KNOB_COUNT]) -> Self {
        Self {
            knobs,
            ..Self::default()
        }
    }

    pub fn with_knob(mut self, slot: usize, value: f32) -> Self {
        if let Some(knob) = self.knobs.get_mut(slot) {
            *knob = value;
        }
        self
    }

    /// Switch `slot` held down, no edge.
    pub fn with_pressed(mut self, slot: usize) -> Self {
        if let Some(pressed) = self.pressed.get_mut(slot) {
            *pressed = true;
        }
        self
    }

    /// Switch `slot` went down on this frame.
    pub fn with_rising(mut self, slot: usize) -> Self {
        if slot < SWITCH_COUNT {
            self.pressed[slot] = true;
            self.rising[slot] = true;
        }
        self
    }

    pub fn at(mut self, now_ms: u32) -> Self {
        self.now_ms = now_ms;
        self
    }

    pub fn knob(&self, slot: usize) -> f32 {
        self.knobs.get(slot).copied().unwrap_or(0.0)
    }

    pub fn is_pressed(&self, slot: usize) -> bool {
        self.pressed.get(slot).copied().unwrap_or(false)
    }

    pub fn is_rising(&self, slot: usize) -> bool {
        self.rising.get(slot).copied().unwrap_or(false)
    }
}

impl Default for ControlFrame {
    /// Every knob centred, nothing pressed.
    fn default() -> Self {
        Self {
            knobs: [0.5; KNOB_COUNT],
            pressed: [false; SWITCH_COUNT],
            rising: [false; SWITCH_COUNT],
            now_ms: 0,
        }
    }
}

/*
Control Surface
===============

Control-thread state behind the frames. It plays the part of the knob and
switch scanner on hardware: it holds the current knob positions and switch
states and turns presses into one-frame rising edges.

Edges are LATCHED. A press sets `rising` and it stays set until a frame
carrying it has actually been delivered (`commit`). A full ring therefore
delays an edge instead of losing it.

Terminals report key presses but not releases, so switches come in two
flavours:

  tap(i)      momentary: down for exactly one delivered frame, then up
  toggle(i)   latching: alternates between held and released
*/

#[derive(Debug, Clone)]
pub struct ControlSurface {
    knobs: [f32; KNOB_COUNT],
    pressed: [bool; SWITCH_COUNT],
    rising: [bool; SWITCH_COUNT],
    momentary: [bool; SWITCH_COUNT],
    tap_slot: Option<usize>,
    last_tap_ms: Option<u32>,
}

impl ControlSurface {
    pub fn new() -> Self {
        Self {
            knobs: [0.5; KNOB_COUNT],
            pressed: [false; SWITCH_COUNT],
            rising: [false; SWITCH_COUNT],
            momentary: [false; SWITCH_COUNT],
            tap_slot: None,
            last_tap_ms: None,
        }
    }

    /// A surface that knows which switch is the tap-tempo footswitch, for
    /// logging tap intervals.
    pub fn for_bindings(bindings: &ControlBindings) -> Self {
        Self {
            tap_slot: bindings.switch_for(SwitchAction::TapTempo),
            ..Self::new()
        }
    }

    pub fn knob(&self, slot: usize) -> f32 {
        self.knobs.get(slot).copied().unwrap_or(0.0)
    }

    pub fn set_knob(&mut self, slot: usize, value: f32) {
        if let Some(knob) = self.knobs.get_mut(slot) {
            *knob = value.clamp(0.0, 1.0);
        }
    }

    pub fn nudge_knob(&mut self, slot: usize, delta: f32) {
        self.set_knob(slot, self.knob(slot) + delta);
    }

    pub fn is_pressed(&self, slot: usize) -> bool {
        self.pressed.get(slot).copied().unwrap_or(false)
    }

    /// Put switch `slot` down. Raises an edge only if it was up.
    pub fn press(&mut self, slot: usize) {
        if slot >= SWITCH_COUNT {
            return;
        }
        if !self.pressed[slot] {
            self.rising[slot] = true;
        }
        self.pressed[slot] = true;
    }

    pub fn release(&mut self, slot: usize) {
        if slot >= SWITCH_COUNT {
            return;
        }
        self.pressed[slot] = false;
        self.momentary[slot] = false;
    }

    /// Press for one delivered frame.
    pub fn tap(&mut self, slot: usize) {
        if slot >= SWITCH_COUNT {
            return;
        }
        self.press(slot);
        self.momentary[slot] = true;
    }

    pub fn toggle(&mut self, slot: usize) {
        if self.is_pressed(slot) {
            self.release(slot);
        } else {
            self.press(slot);
        }
    }

    /// Snapshot the current state without consuming edges.
    pub fn frame(&self, now_ms: u32) -> ControlFrame {
        ControlFrame {
            knobs: self.knobs,
            pressed: self.pressed,
            rising: self.rising,
            now_ms,
        }
    }

    /// Mark the frame taken at `now_ms` as delivered: clear edges and let
    /// momentary switches up.
    pub fn commit(&mut self, now_ms: u32) {
        if let Some(slot) = self.tap_slot {
            if self.rising[slot] {
                self.log_tap(now_ms);
            }
        }

        self.rising = [false; SWITCH_COUNT];
        for slot in 0..SWITCH_COUNT {
            if self.momentary[slot] {
                self.pressed[slot] = false;
                self.momentary[slot] = false;
            }
        }
    }

    /// Push the current frame, committing it only if the ring accepted it.
    #[cfg(feature = "rtrb")]
    pub fn push(&mut self, tx: &mut Producer<ControlFrame>, now_ms: u32) -> bool {
        match tx.push(self.frame(now_ms)) {
            Ok(()) => {
                self.commit(now_ms);
                true
            }
            Err(_) => {
                trace!("control ring full, frame held back");
                false
            }
        }
    }

    fn log_tap(&mut self, now_ms: u32) {
        match self.last_tap_ms.replace(now_ms) {
            Some(previous) => {
                let interval = now_ms.wrapping_sub(previous);
                debug!(interval_ms = interval, "tap tempo edge");
            }
            None => debug!("first tap tempo edge"),
        }
    }
}

impl Default for ControlSurface {
    fn default() -> Self {
        Self::new()
    }
}
