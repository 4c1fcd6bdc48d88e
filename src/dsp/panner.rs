//! Equal-power stereo panner for mono sources.

use std::f64::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StereoPanner {
    left: f64,
    right: f64,
}

impl StereoPanner {
    /// `pan` in [−1, 1]: −1 is hard left, 0 center, 1 hard right.
    pub fn new(pan: f64) -> Self {
        let x = (pan.clamp(-1.0, 1.0) + 1.0) / 2.0;
        StereoPanner {
            left: (x * FRAC_PI_2).cos(),
            right: (x * FRAC_PI_2).sin(),
        }
    }

    pub fn process(&self, input: f64) -> (f64, f64) {
        (input * self.left, input * self.right)
    }
}
