//! Noise buffers: smoothed random walks rather than raw white noise.

use std::sync::Arc;

use rand::Rng;

/// Weight of the previous sample in the one-pole smoothing.
const SMOOTHING: f64 = 0.98;

/// Fill `duration` seconds with a low-passed random walk:
/// `x[n] = 0.98 · x[n−1] + 0.02 · u`, `u ~ U[−1, 1)`.
pub fn random_walk_buffer(duration: f64, sample_rate: f64, rng: &mut impl Rng) -> Arc<[f64]> {
    let frames = (duration * sample_rate).round().max(0.0) as usize;
    let mut previous = 0.0;
    (0..frames)
        .map(|_| {
            let white: f64 = rng.random_range(-1.0..1.0);
            previous = previous * SMOOTHING + white * (1.0 - SMOOTHING);
            previous
        })
        .collect()
}
