//! Locating the host page's message composer.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

/// Selector strategies in adoption order: the SPA's contenteditable
/// message box first, then textarea fallbacks by placeholder text in the
/// locales the host page ships.
const COMPOSER_SELECTORS: &[&str] = &[
    r#"[contenteditable="true"][role="textbox"]"#,
    r#"textarea[placeholder*="Mesaj"]"#,
    r#"textarea[placeholder*="Message"]"#,
];

/// Query the document for the current composer candidate.
pub fn find_composer(document: &Document) -> Option<Element> {
    COMPOSER_SELECTORS
        .iter()
        .find_map(|selector| document.query_selector(selector).ok().flatten())
}

/// Current text of the composer: `value` for form fields, the rendered
/// text for contenteditable regions.
pub fn composer_text(element: &Element) -> String {
    if let Some(textarea) = element.dyn_ref::<web_sys::HtmlTextAreaElement>() {
        return textarea.value();
    }
    element
        .dyn_ref::<web_sys::HtmlElement>()
        .map(|el| el.inner_text())
        .unwrap_or_default()
}
