//! Percussive gain envelopes.

use super::automation::AutomationCurve;

/// Level an exponential decay aims for; exponential ramps cannot reach zero.
pub const DECAY_FLOOR: f64 = 0.0001;

/// A one-shot attack/decay gain envelope on the absolute timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    curve: AutomationCurve,
}

impl Envelope {
    /// Silent at `start`, linear rise to `peak` over `attack` seconds, then an
    /// exponential fall to [`DECAY_FLOOR`] reached at `decay_end`.
    pub fn percussive(start: f64, attack: f64, peak: f64, decay_end: f64) -> Self {
        let curve = AutomationCurve::new(0.0)
            .set_value_at_time(0.0, start)
            .linear_ramp_to_value_at_time(peak, start + attack)
            .exponential_ramp_to_value_at_time(DECAY_FLOOR, decay_end);
        Envelope { curve }
    }

    pub fn gain_at(&self, t: f64) -> f64 {
        self.curve.value_at(t)
    }

    /// Time at which the decay has reached its floor.
    pub fn end_time(&self) -> f64 {
        self.curve.end_time()
    }

    /// Returns true once the envelope has fully decayed at time `t`.
    pub fn is_finished(&self, t: f64) -> bool {
        t >= self.end_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_before_start() {
        let env = Envelope::percussive(1.0, 0.03, 0.5, 1.18);
        assert_eq!(env.gain_at(0.5), 0.0);
        assert_eq!(env.gain_at(1.0), 0.0);
    }

    #[test]
    fn attack_reaches_peak() {
        let env = Envelope::percussive(0.0, 0.005, 0.8, 0.12);
        assert!((env.gain_at(0.0025) - 0.4).abs() < 1e-9);
        assert!((env.gain_at(0.005) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn decays_to_floor() {
        let env = Envelope::percussive(0.0, 0.005, 0.4, 0.2);
        let mut last = env.gain_at(0.005);
        let mut t = 0.006;
        while t < 0.2 {
            let g = env.gain_at(t);
            assert!(g < last, "decay should be monotonic at t = {t}");
            last = g;
            t += 0.001;
        }
        assert!((env.gain_at(0.2) - DECAY_FLOOR).abs() < 1e-12);
        assert!(env.is_finished(0.2));
        assert!(!env.is_finished(0.19));
    }

    #[test]
    fn full_cycle_range() {
        let env = Envelope::percussive(0.1, 0.03, 0.5, 0.28);
        for i in 0..1000 {
            let g = env.gain_at(i as f64 * 0.0005);
            assert!((0.0..=0.5).contains(&g), "Envelope out of range: {g}");
        }
    }
}
