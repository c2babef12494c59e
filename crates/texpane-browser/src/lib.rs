//! Browser DOM layer for the texpane math preview.
//!
//! This crate implements the seams `texpane-core` leaves open, against the
//! real DOM. It assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `katex`: binding to the page-global typesetting engine
//! - `composer`: locating the host page's message composer
//! - `surface`: the floating preview surface (header, content, hint)
//! - `page`: `HostPage` implementation tying the two together
//! - `runtime`: timers, mutation observer, and input listeners driving the
//!   core attachment controller
//!
//! # Re-exports
//!
//! This crate re-exports `texpane-core` for convenience, so consumers only
//! need to depend on `texpane-browser`.

pub use texpane_core;
pub use texpane_core::*;

pub mod composer;
pub mod katex;
pub mod page;
pub mod runtime;
pub mod surface;

pub use katex::PageKatex;
pub use page::PageDom;
pub use runtime::PreviewRuntime;
pub use surface::PreviewSurface;
