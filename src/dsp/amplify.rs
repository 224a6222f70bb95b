//! Gain and level measurement primitives.

/*
Gain
====

  gain          A multiplier applied to amplitude.
                  gain = 1.0  →  unchanged (unity gain)
                  gain < 1.0  →  quieter (attenuation)
                  gain = 0.0  →  silence

Every channel in the binaural bank runs through one attenuator, and the summed
channels run through one more (the master). Both only ever attenuate; gains
are kept in [0.0, 1.0].

    dB = 20 × log₁₀(gain)

    ×1.0   =   0 dB
    ×0.5   =  -6 dB
    ×0.1   = -20 dB   (the auto-leveling floor)


Clipping
--------

Digital audio is limited to [-1.0, +1.0]. Summing five tones at half volume
each can easily reach 2.5, which the sound card flattens ("clips") into a
harsh square-ish shape. `peak()` is what the clipping guard looks at.
*/

use crate::dsp::ramp::LinearRamp;

/// Multiply a signal by a constant gain factor (in-place).
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

/// Multiply a signal by a gain that may be ramping (in-place).
#[inline]
pub fn apply_gain_ramp(signal: &mut [f32], gain: &mut LinearRamp) {
    if !gain.is_ramping() {
        apply_gain(signal, gain.current());
        return;
    }
    for sample in signal.iter_mut() {
        *sample *= gain.next_value();
    }
}

/// Add `source` into `dest` sample-by-sample.
#[inline]
pub fn accumulate(dest: &mut [f32], source: &[f32]) {
    debug_assert_eq!(dest.len(), source.len());
    for (d, &s) in dest.iter_mut().zip(source.iter()) {
        *d += s;
    }
}

/// Largest absolute sample value.
pub fn peak(buffer: &[f32]) -> f32 {
    buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

/// Root-mean-square level. Empty buffers are silent.
pub fn rms(buffer: &[f32]) -> f32 {
    if buffer.is_empty() {
        return 0.0;
    }
    (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt()
}
