//! The floating preview surface.
//!
//! Three regions: a header with a label and a dismiss control, the
//! rendered content, and a static usage hint. At most one surface exists
//! per document; it is inserted as the sibling immediately before the
//! composer and lives exactly as long as the adoption it belongs to.
//! Colors and box styling are the host extension's stylesheet's concern -
//! this module only hands out class names.

use gloo_events::EventListener;
use texpane_core::Theme;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

/// Document-wide id of the surface root, also the single-instance guard.
pub const SURFACE_ID: &str = "texpane-preview";

const LABEL_TEXT: &str = "Math preview";
const HINT_TEXT: &str = r"Tip: try $x^2 + y^2 = r^2$ or $$\int_0^\infty e^{-x} dx$$";
const PLACEHOLDER_HTML: &str = r#"<em class="texpane-empty">No math expression detected</em>"#;

/// The mounted surface. Dropping it removes the element from the document
/// and releases the dismiss listener.
pub struct PreviewSurface {
    root: Element,
    content: Element,
    _dismiss: EventListener,
}

impl PreviewSurface {
    /// Build the surface and insert it immediately before `composer`.
    /// A surface left over from an earlier adoption is removed first.
    ///
    /// Returns `None` when the document refuses element creation or the
    /// composer has no parent to insert next to; the caller treats that
    /// as "no surface", the same degraded state as never having matched.
    pub fn mount(document: &Document, composer: &Element, theme: Theme) -> Option<PreviewSurface> {
        if let Some(stale) = document.get_element_by_id(SURFACE_ID) {
            stale.remove();
        }

        let root = document.create_element("div").ok()?;
        root.set_id(SURFACE_ID);
        root.set_class_name(&format!("texpane-preview {}", theme.css_class()));

        let header = document.create_element("div").ok()?;
        header.set_class_name("texpane-header");
        let label = document.create_element("span").ok()?;
        label.set_class_name("texpane-label");
        label.set_text_content(Some(LABEL_TEXT));
        let dismiss = document.create_element("button").ok()?;
        dismiss.set_class_name("texpane-dismiss");
        dismiss.set_text_content(Some("\u{2715}"));
        header.append_child(&label).ok()?;
        header.append_child(&dismiss).ok()?;

        let content = document.create_element("div").ok()?;
        content.set_class_name("texpane-content");

        let hint = document.create_element("div").ok()?;
        hint.set_class_name("texpane-hint");
        hint.set_text_content(Some(HINT_TEXT));

        root.append_child(&header).ok()?;
        root.append_child(&content).ok()?;
        root.append_child(&hint).ok()?;

        let parent = composer.parent_element()?;
        parent.insert_before(&root, Some(composer.as_ref())).ok()?;

        let dismiss_root = root.clone();
        let _dismiss = EventListener::new(&dismiss, "click", move |_| {
            set_visible(&dismiss_root, false);
        });

        Some(PreviewSurface {
            root,
            content,
            _dismiss,
        })
    }

    /// Write rendered markup into the content region and show the surface.
    pub fn show_rendered(&self, html: &str) {
        self.content.set_inner_html(html);
        set_visible(&self.root, true);
    }

    /// Show the "nothing detected" message.
    pub fn show_placeholder(&self) {
        self.content.set_inner_html(PLACEHOLDER_HTML);
        set_visible(&self.root, true);
    }

    /// Hide the surface without discarding it.
    pub fn hide(&self) {
        set_visible(&self.root, false);
    }

    /// Swap the theme class on a live surface.
    pub fn set_theme(&self, theme: Theme) {
        self.root
            .set_class_name(&format!("texpane-preview {}", theme.css_class()));
    }

    pub fn root(&self) -> &Element {
        &self.root
    }
}

impl Drop for PreviewSurface {
    fn drop(&mut self) {
        self.root.remove();
    }
}

fn set_visible(element: &Element, visible: bool) {
    if let Some(html_el) = element.dyn_ref::<web_sys::HtmlElement>() {
        let display = if visible { "block" } else { "none" };
        let _ = html_el.style().set_property("display", display);
    }
}
