//! Rolling capture of the mixed output for visualization and level checks.

/// Read-only snapshot of the most recent output samples, oldest first.
///
/// Produced by an analyser, consumed by the clipping guard and the
/// oscilloscope sampler. Nothing downstream mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyserFrame {
    samples: Vec<f32>,
}

impl AnalyserFrame {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    /// A silent frame of `len` samples.
    pub fn silent(len: usize) -> Self {
        Self {
            samples: vec![0.0; len],
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether any sample's magnitude exceeds `threshold`.
    pub fn exceeds(&self, threshold: f32) -> bool {
        self.samples.iter().any(|s| s.abs() > threshold)
    }
}

impl From<Vec<f32>> for AnalyserFrame {
    fn from(samples: Vec<f32>) -> Self {
        Self::new(samples)
    }
}

/// Fixed-size circular capture buffer.
pub struct Analyser {
    buffer: Vec<f32>,
    head: usize,
}

impl Analyser {
    pub fn new(size: usize) -> Self {
        Self {
            buffer: vec![0.0; size.max(1)],
            head: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Append a block of samples, overwriting the oldest.
    pub fn capture(&mut self, block: &[f32]) {
        let size = self.buffer.len();
        // Only the tail of an oversized block can survive.
        let block = if block.len() > size {
            &block[block.len() - size..]
        } else {
            block
        };
        for &sample in block {
            self.buffer[self.head] = sample;
            self.head = (self.head + 1) % size;
        }
    }

    /// Copy the buffer out in chronological order.
    pub fn snapshot(&self) -> AnalyserFrame {
        let mut samples = Vec::with_capacity(self.buffer.len());
        samples.extend_from_slice(&self.buffer[self.head..]);
        samples.extend_from_slice(&self.buffer[..self.head]);
        AnalyserFrame::new(samples)
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.head = 0;
    }
}
