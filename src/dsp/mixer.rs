//! Mixer: the master bus: sums stereo voice frames and applies master gain.

/// A summing stereo mixer that accumulates frames from many voices.
#[derive(Debug, Clone)]
pub struct Mixer {
    pub master_gain: f64,
    left: Vec<f64>,
    right: Vec<f64>,
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

impl Mixer {
    pub fn new() -> Self {
        Mixer {
            master_gain: 1.0,
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    /// Prepare a block of `num_frames` silent frames.
    pub fn clear(&mut self, num_frames: usize) {
        self.left.clear();
        self.left.resize(num_frames, 0.0);
        self.right.clear();
        self.right.resize(num_frames, 0.0);
    }

    /// Add a stereo frame at the given index.
    pub fn add(&mut self, index: usize, (l, r): (f64, f64)) {
        if index < self.left.len() {
            self.left[index] += l;
            self.right[index] += r;
        }
    }

    /// Append the block, with master gain and soft clipping, to interleaved `out`.
    pub fn drain_into(&self, out: &mut Vec<f32>) {
        out.reserve(self.left.len() * 2);
        for (&l, &r) in self.left.iter().zip(&self.right) {
            out.push(soft_clip(l * self.master_gain) as f32);
            out.push(soft_clip(r * self.master_gain) as f32);
        }
    }

    /// Number of frames in the current block.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Is the block empty?
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// Soft clipper using tanh to prevent harsh digital clipping.
fn soft_clip(x: f64) -> f64 {
    x.tanh()
}
