//! Low Frequency Oscillator (LFO) math for gain modulation.

/*
Low Frequency Oscillators
=========================

An LFO is a sine running below the audible range (here 0.01 Hz to 20 Hz). It
is never listened to directly; it moves a parameter. In this crate it moves
each channel's gain, so every tone slowly swells and fades around the volume
the user picked.

Vocabulary
----------

  base volume   The volume the user set for a channel, in [0.0, 1.0]. The
                modulation is centered on it.

  depth         How much of the available room the LFO may use, in [0.0, 1.0].
                0.0 bypasses the LFO entirely.

  swing         Peak-to-peak distance the gain travels in one LFO cycle.

  bipolar       Output swings -1.0 to +1.0 (what sin() gives).

  unipolar      Output is 0.0 to 1.0. unipolar = (bipolar + 1.0) / 2.0


Evaluating from Time, not from a Phase Accumulator
--------------------------------------------------

The modulation loop runs once per display frame (~60 Hz), not per sample, and
frames are not evenly spaced. Instead of accumulating phase it evaluates the
sine directly from the elapsed time since a shared origin:

    lfo = sin(2π × rate × (now - origin))

Every channel reads the same origin, so resetting that origin re-aligns all
LFOs at once, and a tick that arrives late simply lands further along the
curve instead of drifting.


The Swing Formula
-----------------

Naive modulation `base ± depth` clips against the rails when the base volume
sits near 0.0 or 1.0:

    base = 0.9, depth = 0.5  →  gain would reach 1.4, clipped to 1.0
                                (the top of the sine is flattened)

The swing is limited by whichever rail is closer, and by a total span of 1.0:

    max_up   = 1.0 - base
    max_down = base
    swing    = min(max_up, max_down, 0.5) × 2 × depth

    gain     = clamp(base + lfo × swing / 2, 0.0, 1.0)

    base   depth   swing   gain range
    0.5    1.0     1.0     0.0 .. 1.0
    0.9    1.0     0.2     0.8 .. 1.0
    0.1    0.5     0.1     0.05 .. 0.15

The result is always a symmetric sinusoid around the base volume. The clamp
is kept even though the formula already stays in range.
*/

use std::f64::consts::TAU;

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

/// Sine LFO value at `elapsed` seconds after the modulation origin.
#[inline]
pub fn lfo_value(rate_hz: f32, elapsed_secs: f64) -> f32 {
    (TAU * rate_hz as f64 * elapsed_secs).sin() as f32
}

/// Peak-to-peak swing available to a channel at `base_volume` and `depth`.
#[inline]
pub fn swing(base_volume: f32, depth: f32) -> f32 {
    let max_up = 1.0 - base_volume;
    let max_down = base_volume;
    max_up.min(max_down).min(0.5) * 2.0 * depth
}

/// Apply one LFO reading to a base volume.
///
/// Returns `base_volume` untouched when `depth` is zero.
#[inline]
pub fn modulated_volume(base_volume: f32, depth: f32, lfo: f32) -> f32 {
    if depth == 0.0 {
        return base_volume;
    }
    (base_volume + lfo * swing(base_volume, depth) / 2.0).clamp(0.0, 1.0)
}
