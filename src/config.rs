//! Engine configuration.
//!
//! Every field has a default, so a TOML file only needs the values it wants
//! to change:
//!
//! ```toml
//! bpm = 90
//! root_hz = 432
//!
//! [[channels]]
//! label = "Root"
//! ratio = 0
//!
//! [[channels]]
//! label = "Beat"
//! ratio = 1
//! lfo_depth = 0.5
//! ```

use std::{path::Path, time::Duration};

use serde::Deserialize;

use crate::error::ConfigError;

/// Initial settings for one channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub label: String,
    /// Multiplier of the beat frequency added to the root. 0 marks the root.
    pub ratio: f64,
    pub base_volume: f32,
    pub muted: bool,
    pub lfo_rate: f32,
    pub lfo_depth: f32,
}

impl ChannelConfig {
    pub fn new(label: &str, ratio: f64) -> Self {
        Self {
            label: label.to_string(),
            ratio,
            ..Self::default()
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            ratio: 0.0,
            base_volume: 0.5,
            muted: false,
            lfo_rate: 0.1,
            lfo_depth: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub bpm: f64,
    pub root_hz: f64,
    pub master_volume: f32,
    pub time_scale: f32,
    pub channels: Vec<ChannelConfig>,

    /// Glide applied to oscillators when tempo or root change.
    pub frequency_ramp_ms: u64,
    /// Silence window around a phase reset.
    pub phase_reset_ms: u64,
    /// Fade back in after the phase-reset silence.
    pub restore_ramp_ms: u64,

    pub clip_threshold: f32,
    pub guard_decay: f32,
    pub guard_floor: f32,

    pub analyser_size: usize,
    pub tap_capacity: usize,
    pub tap_reset_ms: u64,

    pub lfo_rate_min: f32,
    pub lfo_rate_max: f32,
    pub time_scale_min: f32,
    pub time_scale_max: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bpm: 60.0,
            root_hz: 200.0,
            master_volume: 0.5,
            time_scale: 1.0,
            channels: vec![
                ChannelConfig::new("Root", 0.0),
                ChannelConfig::new("Half", 0.5),
                ChannelConfig::new("Beat", 1.0),
                ChannelConfig::new("Double", 2.0),
                ChannelConfig::new("Quad", 4.0),
            ],
            frequency_ramp_ms: 30,
            phase_reset_ms: 50,
            restore_ramp_ms: 10,
            clip_threshold: 0.95,
            guard_decay: 0.95,
            guard_floor: 0.1,
            analyser_size: 2048,
            tap_capacity: 8,
            tap_reset_ms: 2000,
            lfo_rate_min: 0.01,
            lfo_rate_max: 20.0,
            time_scale_min: 0.25,
            time_scale_max: 8.0,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(path = %path.display(), channels = config.channels.len(), "loaded config");
        Ok(config)
    }

    /// Check the ratio ladder and numeric bounds.
    ///
    /// The first channel must be the root (ratio 0); every later ratio must be
    /// strictly greater than the one before it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let first = self.channels.first().ok_or(ConfigError::NoChannels)?;
        if first.ratio != 0.0 {
            return Err(ConfigError::RootNotFirst(first.ratio));
        }
        for (index, pair) in self.channels.windows(2).enumerate() {
            let (previous, current) = (pair[0].ratio, pair[1].ratio);
            if !current.is_finite() {
                return Err(ConfigError::NotFinite { field: "ratio" });
            }
            if current <= previous {
                return Err(ConfigError::RatioNotIncreasing {
                    index: index + 1,
                    ratio: current,
                    previous,
                });
            }
        }

        let finite = [
            ("bpm", self.bpm),
            ("root_hz", self.root_hz),
            ("master_volume", self.master_volume as f64),
            ("time_scale", self.time_scale as f64),
            ("clip_threshold", self.clip_threshold as f64),
            ("guard_decay", self.guard_decay as f64),
            ("guard_floor", self.guard_floor as f64),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }

        check_bounds("lfo_rate", self.lfo_rate_min, self.lfo_rate_max)?;
        check_bounds("time_scale", self.time_scale_min, self.time_scale_max)?;

        check_size("analyser_size", self.analyser_size, 1)?;
        // Two taps make the first interval.
        check_size("tap_capacity", self.tap_capacity, 2)?;
        Ok(())
    }

    pub fn ratios(&self) -> Vec<f64> {
        self.channels.iter().map(|c| c.ratio).collect()
    }

    pub fn frequency_ramp(&self) -> Duration {
        Duration::from_millis(self.frequency_ramp_ms)
    }

    pub fn phase_reset_window(&self) -> Duration {
        Duration::from_millis(self.phase_reset_ms)
    }

    pub fn restore_ramp(&self) -> Duration {
        Duration::from_millis(self.restore_ramp_ms)
    }

    pub fn tap_reset_gap(&self) -> Duration {
        Duration::from_millis(self.tap_reset_ms)
    }
}

fn check_bounds(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if !(min.is_finite() && max.is_finite()) || min <= 0.0 || min > max {
        return Err(ConfigError::InvalidBounds {
            field,
            min: min as f64,
            max: max as f64,
        });
    }
    Ok(())
}

fn check_size(field: &'static str, value: usize, min: usize) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::TooSmall { field, min, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.ratios(), vec![0.0, 0.5, 1.0, 2.0, 4.0]);
        assert_eq!(config.frequency_ramp(), Duration::from_millis(30));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            bpm = 90
            guard_floor = 0.2

            [[channels]]
            label = "Root"
            ratio = 0

            [[channels]]
            label = "Beat"
            ratio = 1
            lfo_depth = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.bpm, 90.0);
        assert_eq!(config.root_hz, 200.0);
        assert_eq!(config.guard_floor, 0.2);
        assert_eq!(config.channels.len(), 2);
        assert_eq!(config.channels[1].lfo_depth, 0.5);
        assert_eq!(config.channels[1].base_volume, 0.5);
    }

    #[test]
    fn rejects_missing_root() {
        let err = EngineConfig::from_toml_str(
            r#"
            [[channels]]
            ratio = 1
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::RootNotFirst(r) if r == 1.0));
    }

    #[test]
    fn rejects_non_increasing_ratios() {
        let mut config = EngineConfig::default();
        config.channels[3].ratio = 0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RatioNotIncreasing { index: 3, .. })
        ));

        config.channels[3].ratio = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_channels_and_bad_sizes() {
        let mut config = EngineConfig::default();
        config.analyser_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooSmall { field: "analyser_size", min: 1, .. })
        ));
        config.analyser_size = 2048;
        config.tap_capacity = 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooSmall { field: "tap_capacity", min: 2, value: 1 })
        ));
        config.tap_capacity = 2;
        assert!(config.validate().is_ok());
        config.channels.clear();
        assert!(matches!(config.validate(), Err(ConfigError::NoChannels)));
    }

    #[test]
    fn rejects_inverted_bounds() {
        let mut config = EngineConfig::default();
        config.time_scale_min = 4.0;
        config.time_scale_max = 2.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBounds { field: "time_scale", .. })
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = EngineConfig::from_toml_str("bpm = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
