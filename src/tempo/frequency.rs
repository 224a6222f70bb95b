//! Tempo state and the tempo → frequency derivation.

/*
Beat Frequencies from Tempo
===========================

Two tones a few Hz apart are heard as one tone that pulses at the difference
frequency. The bank exploits that: every channel sits above a shared root by
an amount tied to the tempo.

    beat_hz = bpm / 60            (one pulse per beat)

    channel     ratio   frequency              heard against root
    Root        0       root                   -
    Half        0.5     root + beat_hz × 0.5   one pulse every 2 beats
    Beat        1       root + beat_hz         one pulse per beat
    Double      2       root + beat_hz × 2     two pulses per beat

Example: root = 200 Hz, bpm = 120  →  beat_hz = 2
    Root 200, Half 201, Beat 202, Double 204

The derivation is pure. Clamping bpm and root happens before values reach it.
*/

pub const BPM_MIN: f64 = 1.0;
pub const BPM_MAX: f64 = 300.0;
pub const ROOT_HZ_MIN: f64 = 20.0;
pub const ROOT_HZ_MAX: f64 = 2000.0;

/// Tempo and root frequency, always within their bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoState {
    bpm: f64,
    root_hz: f64,
}

impl TempoState {
    /// Out-of-range values are clamped; NaN falls back to the lower bound.
    pub fn new(bpm: f64, root_hz: f64) -> Self {
        Self {
            bpm: clamp_or_min(bpm, BPM_MIN, BPM_MAX),
            root_hz: clamp_or_min(root_hz, ROOT_HZ_MIN, ROOT_HZ_MAX),
        }
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn root_hz(&self) -> f64 {
        self.root_hz
    }

    pub fn set_bpm(&mut self, bpm: f64) {
        self.bpm = clamp_or_min(bpm, BPM_MIN, BPM_MAX);
    }

    pub fn set_root_hz(&mut self, root_hz: f64) {
        self.root_hz = clamp_or_min(root_hz, ROOT_HZ_MIN, ROOT_HZ_MAX);
    }

    pub fn beat_hz(&self) -> f64 {
        beat_hz(self.bpm)
    }

    /// Target frequency for every ratio in `ratios`.
    pub fn frequencies(&self, ratios: &[f64]) -> Vec<f64> {
        frequencies(self.root_hz, self.bpm, ratios)
    }
}

impl Default for TempoState {
    fn default() -> Self {
        Self::new(60.0, 200.0)
    }
}

#[inline]
pub fn beat_hz(bpm: f64) -> f64 {
    bpm / 60.0
}

/// Frequency of one channel. A zero ratio is the root itself.
#[inline]
pub fn channel_frequency(root_hz: f64, bpm: f64, ratio: f64) -> f64 {
    if ratio == 0.0 {
        root_hz
    } else {
        root_hz + beat_hz(bpm) * ratio
    }
}

/// Target frequencies for a ratio table.
pub fn frequencies(root_hz: f64, bpm: f64, ratios: &[f64]) -> Vec<f64> {
    ratios
        .iter()
        .map(|&ratio| channel_frequency(root_hz, bpm, ratio))
        .collect()
}

pub(crate) fn clamp_or_min(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LADDER: [f64; 5] = [0.0, 0.5, 1.0, 2.0, 4.0];

    #[test]
    fn root_channel_is_exactly_root() {
        for bpm in [1.0, 60.0, 137.0, 300.0] {
            for root in [20.0, 200.0, 432.1, 2000.0] {
                assert_eq!(frequencies(root, bpm, &LADDER)[0], root);
            }
        }
    }

    #[test]
    fn other_channels_follow_beat_rate() {
        for bpm in [1.0, 72.5, 120.0, 300.0] {
            for root in [20.0, 111.0, 2000.0] {
                let freqs = frequencies(root, bpm, &LADDER);
                for (i, &ratio) in LADDER.iter().enumerate().skip(1) {
                    assert_eq!(freqs[i], root + (bpm / 60.0) * ratio);
                }
            }
        }
    }

    #[test]
    fn worked_example() {
        let tempo = TempoState::new(120.0, 200.0);
        assert_eq!(tempo.beat_hz(), 2.0);
        assert_eq!(tempo.frequencies(&[0.0, 0.5, 1.0, 2.0]), vec![200.0, 201.0, 202.0, 204.0]);
    }

    #[test]
    fn state_clamps_inputs() {
        let mut tempo = TempoState::new(0.0, 5000.0);
        assert_eq!(tempo.bpm(), BPM_MIN);
        assert_eq!(tempo.root_hz(), ROOT_HZ_MAX);
        tempo.set_bpm(999.0);
        tempo.set_root_hz(f64::NAN);
        assert_eq!(tempo.bpm(), BPM_MAX);
        assert_eq!(tempo.root_hz(), ROOT_HZ_MIN);
    }
}
