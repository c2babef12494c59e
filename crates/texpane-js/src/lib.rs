//! WASM content-script bindings for the texpane math preview.
//!
//! The host extension loads this module into the messaging page, injects
//! the typesetting engine, and forwards settings-channel messages here;
//! the module keeps a live math preview attached to the message composer.

mod preview;

pub use preview::MathPreview;

use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}
