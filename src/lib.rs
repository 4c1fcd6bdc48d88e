pub mod config;
pub mod dsp;
pub mod error;
pub mod scene;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::SceneConfig;
use crate::scene::Scene;
use crate::scene::frame::FrameSnapshot;
use crate::scene::sequencer::SoundEvent;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the glasscut-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}

/// What one `advance` call hands back to the host.
#[derive(Serialize)]
struct FrameUpdate {
    frame: FrameSnapshot,
    sounds: Vec<SoundEvent>,
}

/// WASM-exposed handle to a running scene.
#[wasm_bindgen]
pub struct WasmScene {
    scene: Scene,
}

#[wasm_bindgen]
impl WasmScene {
    /// A scene with default constants and the given seed.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> Result<WasmScene, JsValue> {
        let config = SceneConfig {
            seed: seed as u64,
            ..SceneConfig::default()
        };
        let scene = Scene::new(config).map_err(to_js_error)?;
        Ok(WasmScene { scene })
    }

    /// Build from a JSON config; missing sections take their defaults.
    #[wasm_bindgen(js_name = fromConfigJson)]
    pub fn from_config_json(json: &str) -> Result<WasmScene, JsValue> {
        let scene = Scene::from_json(json).map_err(to_js_error)?;
        Ok(WasmScene { scene })
    }

    /// Advance one frame by `delta` seconds. Returns `{ frame, sounds }`.
    pub fn advance(&mut self, delta: f64) -> Result<JsValue, JsValue> {
        let sounds = self.scene.advance(delta);
        let update = FrameUpdate {
            frame: self.scene.snapshot(),
            sounds,
        };
        serde_wasm_bindgen::to_value(&update).map_err(to_js_error)
    }

    /// The current frame snapshot without advancing.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.scene.snapshot()).map_err(to_js_error)
    }

    /// The six clip regions with their planes and modes.
    pub fn regions(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.scene.clip_planes().regions()).map_err(to_js_error)
    }
}

/// WASM-exposed: render a single cue (`"slice"`, `"crack"` or `"shards"`)
/// to interleaved stereo f32 samples.
#[wasm_bindgen]
pub fn render_cue_samples(kind: &str, sample_rate: u32, seed: u32) -> Result<Vec<f32>, JsValue> {
    let event: SoundEvent = kind.parse().map_err(to_js_error)?;
    dsp::renderer::render_cue(event, sample_rate as f64, seed as u64).map_err(to_js_error)
}

/// WASM-exposed: run the whole scene at `fps` and render its soundtrack to a
/// stereo WAV byte array.
#[wasm_bindgen]
pub fn render_soundtrack_wav(sample_rate: u32, fps: f64, seed: u32) -> Result<Vec<u8>, JsValue> {
    let config = SceneConfig {
        seed: seed as u64,
        ..SceneConfig::default()
    };
    let samples = dsp::renderer::render_soundtrack(config, sample_rate as f64, fps)
        .map_err(to_js_error)?;
    Ok(dsp::renderer::render_wav(&samples, sample_rate))
}
