//! Reframe WASM - WebAssembly bindings for Reframe
//!
//! This crate exposes the reframe-core crop and uncrop engine to
//! JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `geometry` - Crop frame conversions, snapping and aspect presets
//! - `bounds` - Out-of-bounds detection and extension margins
//! - `crop` - In-bounds crop extraction, probing and file naming
//! - `outpaint` - Uncrop service calls and the extend-or-crop pipeline
//! - `session` - Stateful crop session for the page
//! - `storage` - `localStorage` persistence of the API key
//! - `logging` - `log` output to the browser console
//! - `types` - WASM-compatible wrapper types
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropSession } from '@reframe/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new JsCropSession();
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const { width, height } = session.load_image(bytes, file.name);
//! console.log(`Loaded ${width}x${height}`);
//! ```

use log::LevelFilter;
use wasm_bindgen::prelude::*;

mod bounds;
mod crop;
mod geometry;
mod logging;
mod outpaint;
mod session;
mod storage;
mod types;

// Re-export public types
pub use bounds::{calculate_extend, is_out_of_bounds};
pub use crop::{crop_image, output_file_name, probe_dimensions};
pub use geometry::{aspect_presets, JsCropFrame};
pub use logging::set_log_level;
pub use outpaint::{crop_or_extend, uncrop};
pub use session::JsCropSession;
pub use storage::WebStorage;
pub use types::{JsCropResult, JsDownload};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logging::install(LevelFilter::Info);
    log::debug!("reframe-wasm {} ready", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
