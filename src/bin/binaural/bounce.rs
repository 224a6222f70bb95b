//! Offline render to WAV.
//!
//! Runs the same tick loop as the TUI against [`LocalPrimitives`], with a
//! virtual clock advancing one display frame per tick.

use std::{path::Path, time::Duration};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};

use binaural_dsp::{engine::Engine, io::LocalPrimitives, EngineConfig, Viewport};

/// Control ticks per second of rendered audio.
const TICK_RATE: u32 = 60;

pub fn render(config: EngineConfig, path: &Path, seconds: f64, sample_rate: u32) -> EyreResult<()> {
    if !(seconds.is_finite() && seconds > 0.0) {
        return Err(eyre!("--seconds must be positive, got {seconds}"));
    }
    if sample_rate < TICK_RATE {
        return Err(eyre!("sample rate {sample_rate} is too low"));
    }

    let mut engine = Engine::new(config)?;
    engine.start(LocalPrimitives::new(sample_rate as f32), Duration::ZERO)?;
    engine.set_playing(true);

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .wrap_err_with(|| format!("failed to create {}", path.display()))?;

    let total_frames = (seconds * sample_rate as f64).round() as u64;
    let frames_per_tick = (sample_rate / TICK_RATE) as usize;
    let mut block = vec![0.0f32; frames_per_tick];
    let mut rendered = 0u64;
    let mut clipped_ticks = 0u64;

    tracing::info!(
        path = %path.display(),
        seconds,
        sample_rate,
        channels = engine.channel_count(),
        "bouncing"
    );

    while rendered < total_frames {
        let now = Duration::from_secs_f64(rendered as f64 / sample_rate as f64);
        let report = engine.tick(now, Viewport::default());
        if report.scope.clipping {
            clipped_ticks += 1;
        }

        let frames = frames_per_tick.min((total_frames - rendered) as usize);
        let out = &mut block[..frames];
        engine
            .session_mut()
            .ok_or_else(|| eyre!("session closed during bounce"))?
            .primitives_mut()
            .render(out);

        for &sample in out.iter() {
            writer.write_sample(sample)?;
        }
        rendered += frames as u64;
    }

    writer.finalize()?;
    engine.stop();

    tracing::info!(
        frames = rendered,
        clipped_ticks,
        guard_corrections = engine.guard_corrections(),
        master = engine.master_volume(),
        "bounce finished"
    );
    Ok(())
}
