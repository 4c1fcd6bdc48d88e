use thiserror::Error;

/// Errors raised while building a scene from configuration.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error(
        "second slab [{slice2_start}, {slice2_end}] must end at or before \
         the first slab start {slice1_start}"
    )]
    OverlappingSlabs {
        slice1_start: f64,
        slice2_start: f64,
        slice2_end: f64,
    },
    #[error("slab boundary {boundary} lies outside the sphere of radius {radius}")]
    SlabOutsideVolume { boundary: f64, radius: f64 },
    #[error("crack window ({low}, {high}) is empty or outside [0, 1]")]
    InvalidCrackWindow { low: f64, high: f64 },
    #[error("fragment cap must allow at least one live fragment")]
    ZeroFragmentCap,
    #[error("unknown sound event {0:?}")]
    UnknownSound(String),
    #[error("invalid scene config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Audio(#[from] AudioError),
}

/// Errors raised by the audio layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    /// The platform refused to create an output device. The engine stays
    /// inactive and `start` may be called again.
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
    #[error(
        "sample rate {0} Hz is outside (0, {max}]",
        max = crate::dsp::renderer::MAX_SAMPLE_RATE
    )]
    InvalidSampleRate(f64),
}
