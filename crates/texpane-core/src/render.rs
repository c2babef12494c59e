//! Markup assembly over an injected typesetting capability.

use thiserror::Error;

use crate::scan::{self, MathMode, Segment};

/// Wrapper class for block-level typeset output.
pub const DISPLAY_CLASS: &str = "texpane-math-display";
/// Wrapper class for inline typeset output.
pub const INLINE_CLASS: &str = "texpane-math-inline";

/// Failure to typeset a single expression.
#[derive(Debug, Error)]
pub enum TypesetError {
    /// The typesetting engine has not been loaded into the page yet.
    #[error("typesetting engine is not loaded")]
    Unavailable,
    /// The engine rejected the expression.
    #[error("failed to typeset expression: {0}")]
    Render(String),
}

/// The typesetting capability: converts one math-expression string into
/// renderable markup. Provided externally; absence is a recoverable state.
pub trait Typesetter {
    /// Whether the engine is loaded and callable.
    fn is_ready(&self) -> bool;

    /// Typeset one expression, markers excluded.
    fn typeset(&self, source: &str, mode: MathMode) -> Result<String, TypesetError>;
}

/// Replace every well-formed math span in `text` with typeset markup,
/// leaving all other characters verbatim in their original order.
///
/// Degrades instead of failing: an engine that is not ready passes the
/// whole text through unchanged, and a span the engine rejects is emitted
/// as its original delimiter-bounded substring, leaving sibling spans
/// untouched.
pub fn render_markup<T: Typesetter>(text: &str, typesetter: &T) -> String {
    if !typesetter.is_ready() {
        return text.to_owned();
    }
    let mut out = String::with_capacity(text.len());
    for segment in scan::segment(text) {
        match segment {
            Segment::Text(literal) => out.push_str(literal),
            Segment::Math { src, mode, raw } => match typesetter.typeset(src, mode) {
                Ok(markup) => {
                    let class = match mode {
                        MathMode::Display => DISPLAY_CLASS,
                        MathMode::Inline => INLINE_CLASS,
                    };
                    out.push_str("<span class=\"");
                    out.push_str(class);
                    out.push_str("\">");
                    out.push_str(&markup);
                    out.push_str("</span>");
                }
                Err(err) => {
                    tracing::warn!(source = src, "math typeset failed, keeping source: {err}");
                    out.push_str(raw);
                }
            },
        }
    }
    out
}
