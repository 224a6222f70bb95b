//! Oscilloscope point generation.

/*
Oscilloscope Sampler
====================

The analyser hands over a fixed-size frame (2048 samples by default). The
display shows a prefix of it, stretched across the full width:

    samples_to_show = min(floor(len / time_scale), len)
    slice_width     = width / samples_to_show

    len    time_scale   samples_to_show
    2048   1.0          2048
    2048   2.0          1024    (fewer samples, each one wider)
    2048   0.5          2048    (capped: the frame holds no more)

Sample values in [-1, +1] map to [0, 1] with (v + 1) / 2, then to [0, height].

Idle
----

When the transport is stopped the sampler ignores the frame and emits a flat
line at mid-height. A silent-but-playing mix also sits at mid-height, but
only the idle frame carries `idle = true`, so a renderer can tell them apart.

The frame is tagged `clipping` with the same test the guard uses, so the
renderer can recolor without re-scanning.
*/

use crate::{dsp::lfo::bipolar_to_unipolar, engine::guard::is_clipping, graph::AnalyserFrame};

/// Drawing area in the renderer's units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    /// Unit square.
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScopePoint {
    pub x: f64,
    pub y: f64,
}

/// Render-ready polyline for one tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScopeFrame {
    pub points: Vec<ScopePoint>,
    pub clipping: bool,
    pub idle: bool,
}

/// Number of frame samples displayed at `time_scale`.
///
/// Non-positive or NaN scales show the whole frame.
pub fn samples_to_show(len: usize, time_scale: f32) -> usize {
    if time_scale.is_nan() || time_scale <= 0.0 {
        return len;
    }
    let scaled = (len as f64 / time_scale as f64).floor();
    (scaled as usize).min(len)
}

#[derive(Debug, Clone)]
pub struct OscilloscopeSampler {
    clip_threshold: f32,
}

impl OscilloscopeSampler {
    pub fn new(clip_threshold: f32) -> Self {
        Self { clip_threshold }
    }

    pub fn sample(
        &self,
        frame: &AnalyserFrame,
        time_scale: f32,
        viewport: Viewport,
        playing: bool,
    ) -> ScopeFrame {
        let count = samples_to_show(frame.len(), time_scale);

        if !playing {
            return Self::idle(count, viewport);
        }

        let slice_width = if count > 0 {
            viewport.width / count as f64
        } else {
            0.0
        };
        let points = frame.samples()[..count]
            .iter()
            .enumerate()
            .map(|(i, &v)| ScopePoint {
                x: i as f64 * slice_width,
                y: bipolar_to_unipolar(v) as f64 * viewport.height,
            })
            .collect();

        ScopeFrame {
            points,
            clipping: is_clipping(frame, self.clip_threshold),
            idle: false,
        }
    }

    /// Flat centerline spanning the viewport.
    fn idle(count: usize, viewport: Viewport) -> ScopeFrame {
        let count = count.max(2);
        let step = viewport.width / (count - 1) as f64;
        let mid = viewport.height / 2.0;
        ScopeFrame {
            points: (0..count)
                .map(|i| ScopePoint {
                    x: i as f64 * step,
                    y: mid,
                })
                .collect(),
            clipping: false,
            idle: true,
        }
    }
}

impl Default for OscilloscopeSampler {
    fn default() -> Self {
        Self::new(crate::engine::guard::DEFAULT_CLIP_THRESHOLD)
    }
}
