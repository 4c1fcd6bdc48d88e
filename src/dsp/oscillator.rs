//! Tone oscillators.

use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    Sine,
    Triangle,
}

/// Phase accumulator whose frequency is supplied per sample, so pitch sweeps
/// stay continuous.
#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    /// Position in the current cycle, in [0, 1).
    phase: f64,
    sample_rate: f64,
}

impl Oscillator {
    pub fn new(waveform: Waveform, sample_rate: f64) -> Self {
        Oscillator {
            waveform,
            phase: 0.0,
            sample_rate,
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Emit the sample at the current phase, then step by `frequency` Hz.
    pub fn next_sample(&mut self, frequency: f64) -> f64 {
        let out = match self.waveform {
            Waveform::Sine => (TAU * self.phase).sin(),
            // -1 at phase 0, +1 at phase 0.5
            Waveform::Triangle => 1.0 - 4.0 * (self.phase - 0.5).abs(),
        };
        self.phase = (self.phase + frequency / self.sample_rate).rem_euclid(1.0);
        out
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_starts_at_zero_crossing() {
        let mut osc = Oscillator::new(Waveform::Sine, 48000.0);
        assert!(osc.next_sample(2000.0).abs() < 1e-12);
    }

    #[test]
    fn sine_period_matches_frequency() {
        let mut osc = Oscillator::new(Waveform::Sine, 48000.0);
        let cycle: Vec<f64> = (0..17).map(|_| osc.next_sample(3000.0)).collect();
        // 16 samples per cycle at 3 kHz / 48 kHz.
        assert!((cycle[4] - 1.0).abs() < 1e-9);
        assert!((cycle[12] + 1.0).abs() < 1e-9);
        assert!((cycle[16] - cycle[0]).abs() < 1e-9);
    }

    #[test]
    fn triangle_corners() {
        let mut osc = Oscillator::new(Waveform::Triangle, 8.0);
        let cycle: Vec<f64> = (0..8).map(|_| osc.next_sample(1.0)).collect();
        assert_eq!(cycle[0], -1.0);
        assert!((cycle[2] - 0.0).abs() < 1e-12);
        assert!((cycle[4] - 1.0).abs() < 1e-12);
        assert!((cycle[6] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn swept_output_stays_in_range() {
        for waveform in [Waveform::Sine, Waveform::Triangle] {
            let mut osc = Oscillator::new(waveform, 44100.0);
            for i in 0..44100 {
                let s = osc.next_sample(900.0 + i as f64 * 0.05);
                assert!((-1.0..=1.0).contains(&s), "{waveform:?} out of range: {s}");
            }
        }
    }

    #[test]
    fn reset_restarts_cycle() {
        let mut osc = Oscillator::new(Waveform::Triangle, 44100.0);
        for _ in 0..37 {
            osc.next_sample(900.0);
        }
        osc.reset();
        assert_eq!(osc.next_sample(900.0), -1.0);
        assert_eq!(osc.waveform(), Waveform::Triangle);
    }
}
