use std::time::Duration;

/// Shared time origin for every LFO.
///
/// Times are durations since an epoch chosen by the caller (session start,
/// `Instant` of launch, a virtual clock in offline renders).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModulationClock {
    origin: Duration,
}

impl ModulationClock {
    pub fn new(origin: Duration) -> Self {
        Self { origin }
    }

    pub fn origin(&self) -> Duration {
        self.origin
    }

    pub fn reset(&mut self, now: Duration) {
        self.origin = now;
    }

    /// Seconds since the origin. Never negative.
    pub fn elapsed(&self, now: Duration) -> f64 {
        now.saturating_sub(self.origin).as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_since_reset() {
        let mut clock = ModulationClock::default();
        clock.reset(Duration::from_millis(1500));
        assert_eq!(clock.origin(), Duration::from_millis(1500));
        assert!((clock.elapsed(Duration::from_millis(4000)) - 2.5).abs() < 1e-9);
        assert_eq!(clock.elapsed(Duration::from_millis(1000)), 0.0);
    }
}
