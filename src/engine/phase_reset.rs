//! Glitch-free resynchronisation of every channel.

/*
Phase Reset
===========

Zeroing oscillator phases mid-waveform produces a click. The reset hides it
behind a short silence:

    t0                      t0 + window
    │ master → 0 (instant)  │ master ramps back to the captured level
    │ phases → 0°           │
    │ LFO origin → t0       │
    ├───────── silent ──────┤

All of the t0 work happens in one call between ticks, so no tick ever sees a
half-reset bank. The restore fires from the tick loop once the deadline has
passed.

A second reset inside the window keeps the level captured by the first one
(the master is already 0 by then) and pushes the deadline out. A reset while
master-muted captures 0, so the restore is a no-op.
*/

use std::time::Duration;

use crate::{
    engine::{clock::ModulationClock, session::Session},
    io::AudioPrimitives,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingRestore {
    due: Duration,
    volume: f32,
}

#[derive(Debug, Clone)]
pub struct PhaseReset {
    window: Duration,
    restore_ramp: Duration,
    pending: Option<PendingRestore>,
}

impl PhaseReset {
    pub fn new(window: Duration, restore_ramp: Duration) -> Self {
        Self {
            window,
            restore_ramp,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// True while the master is held silent.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Run the silent part of the reset at `now`.
    pub fn begin<P: AudioPrimitives>(
        &mut self,
        now: Duration,
        effective_master: f32,
        session: &mut Session<P>,
        clock: &mut ModulationClock,
    ) {
        let volume = self
            .pending
            .map(|pending| pending.volume)
            .unwrap_or(effective_master);

        session.ramp_master(0.0, Duration::ZERO);
        session.zero_phases();
        clock.reset(now);

        self.pending = Some(PendingRestore {
            due: now + self.window,
            volume,
        });
        tracing::info!(restore_to = volume, "phase reset");
    }

    /// Restore the master if the window has elapsed. Returns the restored
    /// level when it fires.
    pub fn poll<P: AudioPrimitives>(
        &mut self,
        now: Duration,
        session: &mut Session<P>,
    ) -> Option<f32> {
        let pending = self.pending?;
        if now < pending.due {
            return None;
        }
        self.pending = None;
        session.ramp_master(pending.volume, self.restore_ramp);
        tracing::debug!(volume = pending.volume, "phase reset window closed");
        Some(pending.volume)
    }

    /// Drop a pending restore without touching the primitives.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!("pending phase reset restore cancelled");
        }
    }
}
