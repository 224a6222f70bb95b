/// Context passed to graph nodes during rendering
///
/// Contains information about how to render:
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - frame: Index of the first sample in this block since the graph started
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frame: u64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frame: 0,
        }
    }

    /// Convert a ramp duration into a sample count at this context's rate.
    pub fn ramp_samples(&self, ramp: std::time::Duration) -> u32 {
        crate::dsp::ramp::seconds_to_samples(ramp.as_secs_f32(), self.sample_rate)
    }
}

/// Core trait for signal sources in the graph
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);
}
