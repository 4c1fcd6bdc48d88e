//! The three sound recipes of the slicing scene.
//!
//! Each recipe builds voices scheduled relative to `now` on the device clock.
//! All timings are in seconds.

use rand::Rng;

use super::automation::AutomationCurve;
use super::envelope::Envelope;
use super::filter::BiquadFilter;
use super::noise::random_walk_buffer;
use super::oscillator::Waveform;
use super::panner::StereoPanner;
use super::voice::{Source, Voice};

// slice: band-passed noise swish
const SLICE_BUFFER: f64 = 0.15;
const SLICE_CENTER_HZ: f64 = 5000.0;
const SLICE_Q: f64 = 1.5;
const SLICE_ATTACK: f64 = 0.03;
const SLICE_PEAK: f64 = 0.5;
const SLICE_DECAY_END: f64 = 0.18;
const SLICE_STOP: f64 = 0.2;

// crack: upward chirp
const CRACK_FROM_HZ: f64 = 900.0;
const CRACK_TO_HZ: f64 = 3000.0;
const CRACK_SWEEP: f64 = 0.02;
const CRACK_ATTACK: f64 = 0.005;
const CRACK_PEAK: f64 = 0.8;
const CRACK_DECAY_END: f64 = 0.12;
const CRACK_STOP: f64 = 0.13;

// shards: scattered tinkles
pub const SHARD_VOICES: usize = 12;
const SHARD_FIRST_ONSET: f64 = 0.03;
const SHARD_ONSET_STRIDE: f64 = 0.01;
const SHARD_ONSET_JITTER: f64 = 0.03;
const SHARD_MIN_HZ: f64 = 2000.0;
const SHARD_MAX_HZ: f64 = 7000.0;
const SHARD_ATTACK: f64 = 0.005;
const SHARD_PEAK: f64 = 0.4;
const SHARD_DECAY: f64 = 0.2;
const SHARD_STOP: f64 = 0.21;
const SHARD_PAN_WIDTH: f64 = 0.6;

/// Soft swish: a noise burst band-limited around 5 kHz.
pub fn slice(now: f64, sample_rate: f64, rng: &mut impl Rng) -> Voice {
    let noise = random_walk_buffer(SLICE_BUFFER, sample_rate, rng);
    Voice::new(
        Source::buffer(noise),
        Envelope::percussive(now, SLICE_ATTACK, SLICE_PEAK, now + SLICE_DECAY_END),
        now,
        now + SLICE_STOP,
    )
    .with_filter(BiquadFilter::bandpass(SLICE_CENTER_HZ, SLICE_Q, sample_rate))
}

/// Short crack impulse: a triangle tone swept 900 Hz → 3 kHz.
pub fn crack(now: f64, sample_rate: f64) -> Voice {
    let sweep = AutomationCurve::new(CRACK_FROM_HZ)
        .set_value_at_time(CRACK_FROM_HZ, now)
        .exponential_ramp_to_value_at_time(CRACK_TO_HZ, now + CRACK_SWEEP);
    Voice::new(
        Source::tone(Waveform::Triangle, sweep, sample_rate),
        Envelope::percussive(now, CRACK_ATTACK, CRACK_PEAK, now + CRACK_DECAY_END),
        now,
        now + CRACK_STOP,
    )
}

/// Twelve tiny sine tinkles with staggered onsets and random stereo positions.
pub fn shards(now: f64, sample_rate: f64, rng: &mut impl Rng) -> Vec<Voice> {
    (0..SHARD_VOICES)
        .map(|i| {
            let onset = now
                + SHARD_FIRST_ONSET
                + i as f64 * SHARD_ONSET_STRIDE
                + rng.random::<f64>() * SHARD_ONSET_JITTER;
            let pitch = rng.random_range(SHARD_MIN_HZ..SHARD_MAX_HZ);
            let pan = rng.random_range(-SHARD_PAN_WIDTH..SHARD_PAN_WIDTH);
            let frequency = AutomationCurve::new(pitch).set_value_at_time(pitch, onset);
            Voice::new(
                Source::tone(Waveform::Sine, frequency, sample_rate),
                Envelope::percussive(onset, SHARD_ATTACK, SHARD_PEAK, onset + SHARD_DECAY),
                onset,
                onset + SHARD_STOP,
            )
            .with_pan(StereoPanner::new(pan))
        })
        .collect()
}
