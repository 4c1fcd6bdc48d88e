//! Band-pass biquad with WebAudio `BiquadFilterNode` "bandpass" coefficients.

use std::f64::consts::PI;

/// Second-order band-pass section, 0 dB at the center frequency.
///
/// Direct Form II Transposed; coefficients from the Audio EQ Cookbook
/// (constant 0 dB peak gain form). The numerator's middle tap is zero for
/// this response and is left out.
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    b0: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    z1: f64,
    z2: f64,
}

impl BiquadFilter {
    pub fn bandpass(center: f64, q: f64, sample_rate: f64) -> Self {
        let w0 = 2.0 * PI * center / sample_rate;
        let alpha = w0.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;
        BiquadFilter {
            b0: alpha / a0,
            b2: -alpha / a0,
            a1: -2.0 * w0.cos() / a0,
            a2: (1.0 - alpha) / a0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.b0 * input + self.z1;
        self.z1 = self.z2 - self.a1 * output;
        self.z2 = self.b2 * input - self.a2 * output;
        output
    }

    /// Clear the delay line.
    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}
