//! Binding to the page-global KaTeX engine.
//!
//! The engine bundle and its stylesheet are injected into the page by the
//! host extension, not linked into this module, and web-sys has no KaTeX
//! API - so this is a custom wasm_bindgen binding, resolved through the
//! global object at call time. Until the injection finishes the global is
//! simply absent and `is_ready` reports false.

use js_sys::{Object, Reflect};
use texpane_core::{MathMode, TypesetError, Typesetter};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    /// The `katex` global installed by the engine bundle.
    type KatexGlobal;

    #[wasm_bindgen(method, catch, js_name = renderToString)]
    fn render_to_string(
        this: &KatexGlobal,
        source: &str,
        options: &JsValue,
    ) -> Result<String, JsValue>;
}

/// Typesetting capability backed by the page-global `katex` object.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageKatex;

impl PageKatex {
    fn global(&self) -> Option<KatexGlobal> {
        let window = web_sys::window()?;
        let value = Reflect::get(&window, &JsValue::from_str("katex")).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }
        Some(value.unchecked_into())
    }
}

impl Typesetter for PageKatex {
    fn is_ready(&self) -> bool {
        self.global().is_some()
    }

    fn typeset(&self, source: &str, mode: MathMode) -> Result<String, TypesetError> {
        let katex = self.global().ok_or(TypesetError::Unavailable)?;
        let options = Object::new();
        let display = matches!(mode, MathMode::Display);
        Reflect::set(&options, &"displayMode".into(), &display.into()).map_err(as_render_error)?;
        // The engine absorbs most parse problems into error markup of its
        // own; the catch path covers the ones it refuses to absorb.
        Reflect::set(&options, &"throwOnError".into(), &false.into()).map_err(as_render_error)?;
        katex.render_to_string(source, &options).map_err(as_render_error)
    }
}

fn as_render_error(value: JsValue) -> TypesetError {
    TypesetError::Render(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}
