/*
Fractional Delay Line
=====================

A fixed-capacity circular buffer. The write cursor moves BACKWARD one slot
per sample, so a read "delay samples ago" is found by looking FORWARD from
the cursor:

    write(v):   buf[pos] = v; pos = pos - 1 (mod N)

    read(d):    p = pos + d + 1
                i = floor(p), frac = p - i
                buf[i] + frac * (buf[i+1] - buf[i])      (indices mod N)

    read(0.0) returns the sample that was just written.
    read(k)   returns the sample written k ticks earlier.

Valid delays are 0 ..= N-2. Nothing here validates that; callers clamp the
delay time before it reaches the line (see MultitapDelay::set_delay_time).

The buffer is allocated once in `new()` and never resized, so `write` and
`read` are safe to call from the audio callback.
*/

pub struct DelayLine<const CAPACITY: usize> {
    buffer: Box<[f32]>,
    pos: usize,
}

impl<const CAPACITY: usize> DelayLine<CAPACITY> {
    pub fn new() -> Self {
        Self {
            buffer: vec![0.0; CAPACITY].into_boxed_slice(),
            pos: 0,
        }
    }

    /// Buffer length in samples.
    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Store `sample` at the cursor and step the cursor back one slot.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.pos] = sample;
        self.pos = (self.pos + CAPACITY - 1) % CAPACITY;
    }

    /// Read `delay` samples behind the most recent write, interpolating
    /// linearly between the two neighbouring slots.
    #[inline]
    pub fn read(&self, delay: f32) -> f32 {
        let delay_pos = self.pos as f32 + delay + 1.0;

        let a = delay_pos as usize;
        let b = a + 1;
        let frac = delay_pos - a as f32;

        let a_value = self.buffer[a % CAPACITY];
        let b_value = self.buffer[b % CAPACITY];

        a_value + frac * (b_value - a_value)
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.pos = 0;
    }
}

impl<const CAPACITY: usize> Default for DelayLine<CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}
