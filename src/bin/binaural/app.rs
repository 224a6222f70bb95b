//! Binaural - application builder and audio output

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use binaural_dsp::{
    engine::Engine,
    io::{link, RingPrimitives},
    EngineConfig,
};

use super::ui::UiApp;

/// Main application builder
pub struct Binaural {
    config: EngineConfig,
}

impl Binaural {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Run the terminal UI until the user quits.
    ///
    /// No audio device is touched until the first Space press.
    pub fn run(self) -> EyreResult<()> {
        let engine = Engine::new(self.config)?;
        let mut app = UiApp::new(engine);

        let mut terminal = ratatui::init();
        let result = app.run(&mut terminal);
        ratatui::restore();

        app.shutdown();
        result
    }
}

/// An open output stream plus the control half of its ring link.
pub struct AudioOutput {
    /// Dropping the stream stops the callback.
    _stream: cpal::Stream,
    pub sample_rate: f32,
    pub channels: usize,
}

impl AudioOutput {
    /// Open the default output device and start rendering.
    pub fn open() -> EyreResult<(Self, RingPrimitives)> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let (primitives, mut renderer) = link(sample_rate);

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| renderer.render_interleaved(data, channels),
                |err| tracing::error!(%err, "audio stream error"),
                None,
            )
            .wrap_err("failed to build output stream")?;
        stream.play().wrap_err("failed to start output stream")?;

        tracing::info!(sample_rate, channels, "audio output opened");

        Ok((
            Self {
                _stream: stream,
                sample_rate,
                channels,
            },
            primitives,
        ))
    }
}
