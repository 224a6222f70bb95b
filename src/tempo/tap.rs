//! Tap-tempo estimation.

use std::collections::VecDeque;
use std::time::Duration;

use super::frequency::{BPM_MAX, BPM_MIN};

pub const DEFAULT_TAP_CAPACITY: usize = 8;
pub const DEFAULT_TAP_RESET: Duration = Duration::from_millis(2000);

/// Turns a run of user taps into a bpm estimate.
///
/// Keeps the most recent taps only. A pause longer than the reset gap starts a
/// fresh run, so an old rhythm never bleeds into a new one.
#[derive(Debug, Clone)]
pub struct TapTempo {
    taps: VecDeque<Duration>,
    capacity: usize,
    reset_gap: Duration,
}

impl TapTempo {
    /// A capacity below two is raised to two, the least that yields an interval.
    pub fn new(capacity: usize, reset_gap: Duration) -> Self {
        let capacity = capacity.max(2);
        Self {
            taps: VecDeque::with_capacity(capacity + 1),
            capacity,
            reset_gap,
        }
    }

    /// Register a tap at `now` (time since any fixed epoch).
    ///
    /// Returns the rounded bpm once two or more taps are buffered, clamped to
    /// [1, 300]. Returns `None` for the first tap of a run, and when the taps
    /// carry no usable interval (all at the same instant).
    pub fn record_tap(&mut self, now: Duration) -> Option<f64> {
        if let Some(&last) = self.taps.back() {
            if now.saturating_sub(last) > self.reset_gap {
                self.taps.clear();
            }
        }

        self.taps.push_back(now);
        while self.taps.len() > self.capacity {
            self.taps.pop_front();
        }

        if self.taps.len() < 2 {
            return None;
        }

        let (first, last) = (*self.taps.front()?, *self.taps.back()?);
        let intervals = (self.taps.len() - 1) as f64;
        let mean_ms = last.saturating_sub(first).as_secs_f64() * 1000.0 / intervals;
        if mean_ms <= 0.0 {
            return None;
        }
        Some((60_000.0 / mean_ms).round().clamp(BPM_MIN, BPM_MAX))
    }

    /// Number of taps in the current run.
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    pub fn clear(&mut self) {
        self.taps.clear();
    }
}

impl Default for TapTempo {
    fn default() -> Self {
        Self::new(DEFAULT_TAP_CAPACITY, DEFAULT_TAP_RESET)
    }
}
