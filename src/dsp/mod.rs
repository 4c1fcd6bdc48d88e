//! Procedural sound synthesis for the slicing scene.
//!
//! Voices are built from small DSP blocks (oscillators, noise buffers,
//! band-pass filters, automation curves, panners) and mixed through one
//! master bus. The same code drives a live output device and the offline
//! renderer.

pub mod automation;
pub mod engine;
pub mod envelope;
pub mod filter;
pub mod mixer;
pub mod noise;
pub mod oscillator;
pub mod panner;
pub mod recipes;
pub mod renderer;
pub mod voice;
