//! Voice: one transient sound: source → optional filter → envelope → optional pan.

use std::sync::Arc;

use super::automation::AutomationCurve;
use super::envelope::Envelope;
use super::filter::BiquadFilter;
use super::oscillator::{Oscillator, Waveform};
use super::panner::StereoPanner;

/// Sound generator feeding a voice.
#[derive(Debug, Clone)]
pub enum Source {
    /// An oscillator whose frequency follows an automation curve.
    Tone {
        oscillator: Oscillator,
        frequency: AutomationCurve,
    },
    /// One-shot playback of a sample buffer.
    Buffer { samples: Arc<[f64]>, position: usize },
}

impl Source {
    pub fn tone(waveform: Waveform, frequency: AutomationCurve, sample_rate: f64) -> Self {
        Source::Tone {
            oscillator: Oscillator::new(waveform, sample_rate),
            frequency,
        }
    }

    pub fn buffer(samples: Arc<[f64]>) -> Self {
        Source::Buffer {
            samples,
            position: 0,
        }
    }

    fn next_sample(&mut self, t: f64) -> f64 {
        match self {
            Source::Tone {
                oscillator,
                frequency,
            } => oscillator.next_sample(frequency.value_at(t)),
            Source::Buffer { samples, position } => {
                let sample = samples.get(*position).copied().unwrap_or(0.0);
                *position += 1;
                sample
            }
        }
    }
}

/// A scheduled, self-terminating sound.
///
/// Start and stop are absolute times on the device clock. Outside
/// `[start, stop)` the voice is silent; once the clock passes `stop` it is
/// finished and the device drops it.
#[derive(Debug, Clone)]
pub struct Voice {
    source: Source,
    filter: Option<BiquadFilter>,
    envelope: Envelope,
    panner: Option<StereoPanner>,
    start: f64,
    stop: f64,
}

impl Voice {
    pub fn new(source: Source, envelope: Envelope, start: f64, stop: f64) -> Self {
        Voice {
            source,
            filter: None,
            envelope,
            panner: None,
            start,
            stop,
        }
    }

    pub fn with_filter(mut self, filter: BiquadFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_pan(mut self, panner: StereoPanner) -> Self {
        self.panner = Some(panner);
        self
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn stop(&self) -> f64 {
        self.stop
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn panner(&self) -> Option<&StereoPanner> {
        self.panner.as_ref()
    }

    pub fn is_filtered(&self) -> bool {
        self.filter.is_some()
    }

    /// Oscillator frequency at time `t`, or `None` for buffer sources.
    pub fn frequency_at(&self, t: f64) -> Option<f64> {
        match &self.source {
            Source::Tone { frequency, .. } => Some(frequency.value_at(t)),
            Source::Buffer { .. } => None,
        }
    }

    /// Render the stereo frame at device time `t`. Frames must be requested
    /// in increasing time order, one per sample.
    pub fn next_frame(&mut self, t: f64) -> (f64, f64) {
        if t < self.start || self.is_finished(t) {
            return (0.0, 0.0);
        }

        let mut sample = self.source.next_sample(t);
        if let Some(filter) = &mut self.filter {
            sample = filter.process(sample);
        }
        sample *= self.envelope.gain_at(t);

        match &self.panner {
            Some(panner) => panner.process(sample),
            None => (sample, sample),
        }
    }

    /// Is this voice done at device time `t`?
    pub fn is_finished(&self, t: f64) -> bool {
        t >= self.stop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 44100.0;

    fn tone_voice(start: f64) -> Voice {
        let freq = AutomationCurve::new(0.0).set_value_at_time(2000.0, start);
        Voice::new(
            Source::tone(Waveform::Sine, freq, SR),
            Envelope::percussive(start, 0.005, 0.4, start + 0.2),
            start,
            start + 0.21,
        )
    }

    fn render(voice: &mut Voice, from: f64, to: f64) -> Vec<(f64, f64)> {
        let n = ((to - from) * SR) as usize;
        (0..n).map(|i| voice.next_frame(from + i as f64 / SR)).collect()
    }

    #[test]
    fn voice_produces_sound() {
        let mut v = tone_voice(0.0);
        let frames = render(&mut v, 0.0, 0.1);
        assert!(
            frames.iter().any(|(l, _)| l.abs() > 0.01),
            "Voice should produce non-zero output"
        );
    }

    #[test]
    fn silent_before_start() {
        let mut v = tone_voice(0.5);
        let frames = render(&mut v, 0.0, 0.5);
        assert!(frames.iter().all(|&f| f == (0.0, 0.0)));
    }

    #[test]
    fn voice_finishes_at_stop() {
        let mut v = tone_voice(0.0);
        render(&mut v, 0.0, 0.21);
        assert!(v.is_finished(0.21));
        assert_eq!(v.next_frame(0.25), (0.0, 0.0));
    }

    #[test]
    fn voice_output_range() {
        let mut v = tone_voice(0.0);
        for (l, r) in render(&mut v, 0.0, 0.21) {
            assert!(l.abs() <= 0.4 + 1e-9 && r.abs() <= 0.4 + 1e-9, "out of range: {l}, {r}");
        }
    }

    #[test]
    fn buffer_source_runs_out() {
        let samples: Arc<[f64]> = vec![0.5; 10].into();
        let env = Envelope::percussive(0.0, 0.0, 1.0, 1.0);
        let mut v = Voice::new(Source::buffer(samples), env, 0.0, 1.0);
        let frames = render(&mut v, 0.0, 20.0 / SR);
        assert!(frames[..10].iter().all(|&(l, _)| l > 0.0));
        assert!(frames[10..].iter().all(|&(l, r)| l == 0.0 && r == 0.0));
        assert_eq!(v.frequency_at(0.0), None);
    }

    #[test]
    fn panned_voice_is_asymmetric() {
        let mut v = tone_voice(0.0).with_pan(StereoPanner::new(-0.6));
        let frames = render(&mut v, 0.0, 0.05);
        let left: f64 = frames.iter().map(|(l, _)| l.abs()).sum();
        let right: f64 = frames.iter().map(|(_, r)| r.abs()).sum();
        assert!(left > right);
    }
}
