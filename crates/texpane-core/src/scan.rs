//! Delimiter scanning for math spans.
//!
//! A `$` marker opens and closes a math span: doubled (`$$…$$`) for display
//! mode, single (`$…$`) for inline mode. Display spans are consumed first,
//! over the raw input; the inline pass only sees the text regions left
//! between them, so a doubled marker is never read as two adjacent inline
//! markers. Span content must be non-empty and must not itself contain the
//! marker - there is no nesting and no escape sequence. Everything that is
//! not part of a well-formed span is preserved verbatim.

/// The reserved delimiter character.
pub const MARKER: char = '$';

const DISPLAY_DELIM: &str = "$$";
const INLINE_DELIM: &str = "$";

/// Rendering mode of a math span, determined by its delimiter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathMode {
    /// Single-marker span, typeset in line with the surrounding text.
    Inline,
    /// Doubled-marker span, typeset as a block.
    Display,
}

/// One piece of a scanned input string.
///
/// Concatenating the `Text` slices and the `raw` extents of the `Math`
/// segments reproduces the input exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text, preserved verbatim.
    Text(&'a str),
    /// A well-formed math span.
    Math {
        /// Content between the markers, markers excluded.
        src: &'a str,
        mode: MathMode,
        /// The original delimiter-bounded substring, markers included.
        raw: &'a str,
    },
}

/// Whether the text contains the delimiter marker at all.
///
/// The attachment controller uses this as its visibility gate: no marker
/// anywhere means the preview has nothing to say.
pub fn contains_marker(text: &str) -> bool {
    text.contains(MARKER)
}

/// Split `text` into literal and math segments.
pub fn segment(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    while let Some((start, end)) = find_span(&text[cursor..], DISPLAY_DELIM) {
        let (start, end) = (cursor + start, cursor + end);
        segment_inline(&text[cursor..start], &mut segments);
        segments.push(Segment::Math {
            src: &text[start + DISPLAY_DELIM.len()..end - DISPLAY_DELIM.len()],
            mode: MathMode::Display,
            raw: &text[start..end],
        });
        cursor = end;
    }
    segment_inline(&text[cursor..], &mut segments);
    segments
}

/// Inline pass over a text region left between display spans.
fn segment_inline<'a>(region: &'a str, segments: &mut Vec<Segment<'a>>) {
    let mut cursor = 0;
    while let Some((start, end)) = find_span(&region[cursor..], INLINE_DELIM) {
        let (start, end) = (cursor + start, cursor + end);
        if start > cursor {
            segments.push(Segment::Text(&region[cursor..start]));
        }
        segments.push(Segment::Math {
            src: &region[start + INLINE_DELIM.len()..end - INLINE_DELIM.len()],
            mode: MathMode::Inline,
            raw: &region[start..end],
        });
        cursor = end;
    }
    if cursor < region.len() {
        segments.push(Segment::Text(&region[cursor..]));
    }
}

/// Find the next well-formed span delimited by `delim`, returning the byte
/// range of the whole span, markers included.
///
/// The content is the maximal marker-free run after the opening delimiter;
/// it must be non-empty and must be followed immediately by the closing
/// delimiter. An opening delimiter that does not lead to a well-formed span
/// stays literal: scanning resumes one byte past it.
fn find_span(text: &str, delim: &str) -> Option<(usize, usize)> {
    let mut at = 0;
    while let Some(found) = text[at..].find(delim) {
        let open = at + found;
        let content_start = open + delim.len();
        let tail = &text[content_start..];
        let content_len = tail.find(MARKER).unwrap_or(tail.len());
        if content_len > 0 && text[content_start + content_len..].starts_with(delim) {
            return Some((open, content_start + content_len + delim.len()));
        }
        at = open + 1;
    }
    None
}
