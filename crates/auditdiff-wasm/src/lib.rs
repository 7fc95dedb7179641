//! WASM bindings for auditdiff-core.
//!
//! Exposes the three-way diff as a `#[wasm_bindgen]` function so that a
//! browser or Node front end can preview what an audit record will contain.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p auditdiff-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/auditdiff_wasm.wasm
//! ```

use wasm_bindgen::prelude::*;

/// Diff two JSON documents.
///
/// Returns `{"removed":…,"added":…,"unchanged":…}` as a JSON string, with
/// `null` for absent parts. Throws a JS error if either input is not valid JSON.
#[wasm_bindgen]
pub fn diff(old_json: &str, new_json: &str) -> std::result::Result<String, JsValue> {
    diff_to_json(old_json, new_json).map_err(|e| JsValue::from_str(&e))
}

fn diff_to_json(old_json: &str, new_json: &str) -> std::result::Result<String, String> {
    let result = auditdiff_core::diff_json(old_json, new_json).map_err(|e| e.to_string())?;
    serde_json::to_string(&result).map_err(|e| e.to_string())
}
