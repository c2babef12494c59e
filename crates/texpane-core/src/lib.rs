//! texpane-core: platform-independent logic for the math preview.
//!
//! This crate provides:
//! - `scan` - delimiter scanning for inline and display math spans
//! - `render` - markup assembly, generic over a `Typesetter` capability
//! - `controller` - the attachment state machine, generic over a `HostPage`
//! - `settings` - the settings-channel types (enabled flag, theme table)
//!
//! Nothing here touches the DOM; the browser layer supplies the `Typesetter`
//! and `HostPage` implementations and drives the controller from its timer,
//! observer, and input callbacks.

pub mod controller;
pub mod render;
pub mod scan;
pub mod settings;

pub use controller::{
    AttachController, AttachPhase, HostPage, ProbeOutcome, PASTE_SETTLE_MS, PROBE_INTERVAL_MS,
    PROBE_TIMEOUT_TICKS,
};
pub use render::{render_markup, TypesetError, Typesetter, DISPLAY_CLASS, INLINE_CLASS};
pub use scan::{contains_marker, segment, MathMode, Segment, MARKER};
pub use settings::{Settings, SettingsMessage, Theme};
