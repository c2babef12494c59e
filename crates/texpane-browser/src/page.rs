//! `HostPage` over the real document.

use texpane_core::{HostPage, Theme};
use web_sys::{Document, Element};

use crate::composer;
use crate::surface::PreviewSurface;

/// The live document plus the surface it may currently carry.
pub struct PageDom {
    document: Document,
    theme: Theme,
    surface: Option<PreviewSurface>,
}

impl PageDom {
    pub fn new(document: Document, theme: Theme) -> Self {
        PageDom {
            document,
            theme,
            surface: None,
        }
    }

    /// Switch themes, restyling a mounted surface in place.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if let Some(surface) = &self.surface {
            surface.set_theme(theme);
        }
    }

    pub fn surface(&self) -> Option<&PreviewSurface> {
        self.surface.as_ref()
    }
}

impl HostPage for PageDom {
    type Target = Element;

    fn find_composer(&self) -> Option<Element> {
        composer::find_composer(&self.document)
    }

    fn is_attached(&self, target: &Element) -> bool {
        self.document.contains(Some(target.as_ref()))
    }

    fn composer_text(&self, target: &Element) -> String {
        composer::composer_text(target)
    }

    fn mount_surface(&mut self, target: &Element) {
        self.surface = PreviewSurface::mount(&self.document, target, self.theme);
        if self.surface.is_none() {
            tracing::warn!("preview surface could not be mounted next to the composer");
        }
    }

    fn unmount_surface(&mut self) {
        self.surface = None;
    }

    fn show_rendered(&mut self, html: &str) {
        if let Some(surface) = &self.surface {
            surface.show_rendered(html);
        }
    }

    fn show_placeholder(&mut self) {
        if let Some(surface) = &self.surface {
            surface.show_placeholder();
        }
    }

    fn hide_surface(&mut self) {
        if let Some(surface) = &self.surface {
            surface.hide();
        }
    }
}
