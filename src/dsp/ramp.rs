//! Linear parameter smoothing.

/*
Ramps
=====

Changing a control value (gain, frequency) from one sample to the next makes a
step in the signal, which is heard as a click. A ramp spreads the change over a
short, fixed number of samples instead:

    value
      b ┤          ┌──────
        │        ╱
        │      ╱
      a ┤────╱
        └────┬────┬──────→ samples
           start  start + N

    increment = (b - a) / N

Tens of milliseconds are enough to hide the step for gain and pitch moves. A
ramp of zero samples is an instant set, used where a hard cut is wanted (e.g.
the mute at the start of a phase reset).
*/

#[derive(Debug, Clone, Copy)]
pub struct LinearRamp {
    current: f32,
    target: f32,
    increment: f32,
    remaining: u32,
}

impl LinearRamp {
    pub fn new(value: f32) -> Self {
        Self {
            current: value,
            target: value,
            increment: 0.0,
            remaining: 0,
        }
    }

    /// Jump straight to `value`, cancelling any ramp in progress.
    pub fn set(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.increment = 0.0;
        self.remaining = 0;
    }

    /// Move towards `value` over `samples` samples, starting from wherever the
    /// ramp currently is.
    pub fn ramp_to(&mut self, value: f32, samples: u32) {
        if samples == 0 {
            self.set(value);
            return;
        }
        self.target = value;
        self.increment = (value - self.current) / samples as f32;
        self.remaining = samples;
    }

    #[inline]
    pub fn next_value(&mut self) -> f32 {
        let value = self.current;
        if self.remaining > 0 {
            self.remaining -= 1;
            self.current = if self.remaining == 0 {
                self.target
            } else {
                self.current + self.increment
            };
        }
        value
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_ramping(&self) -> bool {
        self.remaining > 0
    }
}

/// Convert a duration in seconds to a whole number of samples.
#[inline]
pub fn seconds_to_samples(seconds: f32, sample_rate: f32) -> u32 {
    (seconds.max(0.0) * sample_rate).round() as u32
}
