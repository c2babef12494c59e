//! The attachment state machine.
//!
//! The host page is a single-page app that tears down and rebuilds its DOM
//! without notice, so the preview cannot hold on to the message composer:
//! it has to re-acquire it. Two independent event sources drive one owned
//! state struct: a recurring acquisition probe while `Searching`, and a
//! structural-change watcher that runs for the whole session and knocks the
//! controller back to `Searching` the moment the adopted composer leaves
//! the document.
//!
//! The controller is generic over [`HostPage`] so the whole machine runs
//! under native tests against a fake page; the browser layer supplies the
//! real implementation and the timers/observers that call into it.

use crate::render::{render_markup, Typesetter};
use crate::scan;

/// Milliseconds between acquisition probe ticks.
pub const PROBE_INTERVAL_MS: u32 = 1_000;
/// Probe ticks before the search gives up until the next structural change.
pub const PROBE_TIMEOUT_TICKS: u32 = 30;
/// Delay before sampling composer text after a paste, giving the host page
/// time to finish inserting the pasted content.
pub const PASTE_SETTLE_MS: u32 = 100;

/// What the attachment controller needs from the host document.
///
/// The preview surface is owned behind this trait: it exists exactly while
/// a composer is adopted, and the controller only ever addresses "the"
/// surface, never a handle.
pub trait HostPage {
    /// Handle to the composer element.
    type Target: Clone + PartialEq;

    /// Query the document for a composer candidate, trying each selector
    /// strategy in order.
    fn find_composer(&self) -> Option<Self::Target>;

    /// Whether the target is still attached to the document.
    fn is_attached(&self, target: &Self::Target) -> bool;

    /// Current text content of the composer.
    fn composer_text(&self, target: &Self::Target) -> String;

    /// Build the preview surface and insert it as the sibling immediately
    /// before the target. At most one surface exists per document; a stale
    /// one is replaced.
    fn mount_surface(&mut self, target: &Self::Target);

    /// Discard the preview surface, removing it from the document.
    fn unmount_surface(&mut self);

    /// Write rendered markup into the surface content region and show it.
    fn show_rendered(&mut self, html: &str);

    /// Show the "nothing detected" message instead of content.
    fn show_placeholder(&mut self);

    /// Hide the surface without destroying it.
    fn hide_surface(&mut self);
}

/// Where the controller currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachPhase<T> {
    /// No composer adopted; the acquisition probe may be running.
    Searching,
    /// A composer is adopted and the preview surface is mounted before it.
    Attached(T),
}

/// Result of one acquisition probe tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome<T> {
    /// Keep probing.
    Continue,
    /// A composer was adopted; the driver must cancel the probe and wire
    /// input notifications to the target.
    Adopted(T),
    /// The tick budget ran out with no candidate; the driver must cancel
    /// the probe. A later structural change may warrant a fresh one.
    Expired,
}

/// The attachment controller: one owned state struct, mutated only from
/// the driver's callbacks.
pub struct AttachController<P: HostPage> {
    phase: AttachPhase<P::Target>,
    ticks: u32,
}

impl<P: HostPage> Default for AttachController<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: HostPage> AttachController<P> {
    pub fn new() -> Self {
        AttachController {
            phase: AttachPhase::Searching,
            ticks: 0,
        }
    }

    pub fn phase(&self) -> &AttachPhase<P::Target> {
        &self.phase
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.phase, AttachPhase::Attached(_))
    }

    /// Reset the probe tick budget. Drivers call this when (re)starting
    /// the acquisition probe.
    pub fn reset_probe(&mut self) {
        self.ticks = 0;
    }

    /// One acquisition probe tick.
    ///
    /// Inert while attached; acquisition and synchronization are mutually
    /// exclusive per composer lifetime.
    pub fn on_probe_tick(&mut self, page: &mut P) -> ProbeOutcome<P::Target> {
        if self.is_attached() {
            return ProbeOutcome::Continue;
        }
        self.ticks += 1;
        if let Some(target) = page.find_composer() {
            page.mount_surface(&target);
            self.phase = AttachPhase::Attached(target.clone());
            tracing::debug!("composer adopted, preview surface mounted");
            return ProbeOutcome::Adopted(target);
        }
        if self.ticks >= PROBE_TIMEOUT_TICKS {
            tracing::debug!("no composer found within the probe budget, going quiet");
            return ProbeOutcome::Expired;
        }
        ProbeOutcome::Continue
    }

    /// React to a structural change in the host document.
    ///
    /// Returns `true` when the acquisition probe is warranted: either the
    /// adopted composer just left the document (surface and target are
    /// discarded together), or the controller was already searching. The
    /// driver starts a probe only if one is not already running.
    pub fn on_subtree_change(&mut self, page: &mut P) -> bool {
        match &self.phase {
            AttachPhase::Attached(target) => {
                if page.is_attached(target) {
                    return false;
                }
                tracing::debug!("composer left the document, discarding preview surface");
                page.unmount_surface();
                self.phase = AttachPhase::Searching;
                self.ticks = 0;
                true
            }
            AttachPhase::Searching => true,
        }
    }

    /// Synchronize the surface with the composer text.
    ///
    /// No marker anywhere hides the surface; otherwise the rendered markup
    /// is shown, or the placeholder if rendering produced nothing at all.
    /// Inert unless attached, so a stale notification from an abandoned
    /// composer cannot touch the surface.
    pub fn on_composer_input<T: Typesetter>(&mut self, page: &mut P, typesetter: &T) {
        let AttachPhase::Attached(target) = &self.phase else {
            return;
        };
        let text = page.composer_text(target);
        if !scan::contains_marker(&text) {
            page.hide_surface();
            return;
        }
        let html = render_markup(&text, typesetter);
        if html.is_empty() {
            page.show_placeholder();
        } else {
            page.show_rendered(&html);
        }
    }

    /// Tear the pairing down deliberately (disable, shutdown): the surface
    /// is unmounted and the controller returns to `Searching`.
    pub fn detach(&mut self, page: &mut P) {
        if self.is_attached() {
            page.unmount_surface();
        }
        self.phase = AttachPhase::Searching;
        self.ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::FakeTypesetter;

    /// What the fake page's surface is currently showing.
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum SurfaceView {
        Fresh,
        Hidden,
        Placeholder,
        Rendered(String),
    }

    /// In-memory host page double. Targets are small integers so tests can
    /// tell "the same element" from "a new one that matches the same
    /// selector".
    struct FakePage {
        composer: Option<u32>,
        detached: bool,
        text: String,
        surface: Option<SurfaceView>,
        mounted_before: Option<u32>,
    }

    impl FakePage {
        fn empty() -> Self {
            FakePage {
                composer: None,
                detached: false,
                text: String::new(),
                surface: None,
                mounted_before: None,
            }
        }

        fn with_composer(id: u32) -> Self {
            FakePage {
                composer: Some(id),
                ..FakePage::empty()
            }
        }
    }

    impl HostPage for FakePage {
        type Target = u32;

        fn find_composer(&self) -> Option<u32> {
            self.composer
        }

        fn is_attached(&self, target: &u32) -> bool {
            self.composer == Some(*target) && !self.detached
        }

        fn composer_text(&self, _target: &u32) -> String {
            self.text.clone()
        }

        fn mount_surface(&mut self, target: &u32) {
            self.surface = Some(SurfaceView::Fresh);
            self.mounted_before = Some(*target);
        }

        fn unmount_surface(&mut self) {
            self.surface = None;
            self.mounted_before = None;
        }

        fn show_rendered(&mut self, html: &str) {
            self.surface = Some(SurfaceView::Rendered(html.to_owned()));
        }

        fn show_placeholder(&mut self) {
            self.surface = Some(SurfaceView::Placeholder);
        }

        fn hide_surface(&mut self) {
            self.surface = Some(SurfaceView::Hidden);
        }
    }

    #[test]
    fn probe_adopts_first_match_and_mounts_surface() {
        let mut page = FakePage::with_composer(1);
        let mut controller = AttachController::new();
        assert_eq!(controller.on_probe_tick(&mut page), ProbeOutcome::Adopted(1));
        assert!(controller.is_attached());
        assert_eq!(page.mounted_before, Some(1));
    }

    #[test]
    fn probe_expires_after_tick_budget() {
        let mut page = FakePage::empty();
        let mut controller = AttachController::new();
        for _ in 0..PROBE_TIMEOUT_TICKS - 1 {
            assert_eq!(controller.on_probe_tick(&mut page), ProbeOutcome::Continue);
        }
        assert_eq!(controller.on_probe_tick(&mut page), ProbeOutcome::Expired);
        assert!(!controller.is_attached());
    }

    #[test]
    fn probe_is_inert_while_attached() {
        let mut page = FakePage::with_composer(1);
        let mut controller = AttachController::new();
        controller.on_probe_tick(&mut page);
        // A stray tick must not re-query or remount.
        page.composer = Some(2);
        assert_eq!(controller.on_probe_tick(&mut page), ProbeOutcome::Continue);
        assert_eq!(controller.phase(), &AttachPhase::Attached(1));
    }

    #[test]
    fn subtree_change_discards_pair_and_readopts_replacement() {
        let mut page = FakePage::with_composer(1);
        let mut controller = AttachController::new();
        controller.on_probe_tick(&mut page);

        // Host page rerender: the adopted composer leaves the document.
        page.detached = true;
        assert!(controller.on_subtree_change(&mut page));
        assert!(!controller.is_attached());
        assert_eq!(page.surface, None);

        // A replacement matching the same selector is adoptable at once.
        page.composer = Some(2);
        page.detached = false;
        assert_eq!(controller.on_probe_tick(&mut page), ProbeOutcome::Adopted(2));
        assert_eq!(page.mounted_before, Some(2));
    }

    #[test]
    fn subtree_change_is_quiet_while_composer_lives() {
        let mut page = FakePage::with_composer(1);
        let mut controller = AttachController::new();
        controller.on_probe_tick(&mut page);
        assert!(!controller.on_subtree_change(&mut page));
        assert!(controller.is_attached());
    }

    #[test]
    fn subtree_change_warrants_probe_while_searching() {
        let mut page = FakePage::empty();
        let mut controller = AttachController::new();
        assert!(controller.on_subtree_change(&mut page));
    }

    #[test]
    fn input_without_marker_hides_surface() {
        let mut page = FakePage::with_composer(1);
        let mut controller = AttachController::new();
        controller.on_probe_tick(&mut page);

        page.text = "hello there".into();
        controller.on_composer_input(&mut page, &FakeTypesetter::ready());
        assert_eq!(page.surface, Some(SurfaceView::Hidden));
    }

    #[test]
    fn input_with_span_shows_rendered_markup() {
        let mut page = FakePage::with_composer(1);
        let mut controller = AttachController::new();
        controller.on_probe_tick(&mut page);

        page.text = "see $x^2$".into();
        controller.on_composer_input(&mut page, &FakeTypesetter::ready());
        match &page.surface {
            Some(SurfaceView::Rendered(html)) => {
                assert!(html.contains("texpane-math-inline"));
                assert!(html.starts_with("see "));
            }
            other => panic!("expected rendered surface, got {other:?}"),
        }
    }

    #[test]
    fn malformed_span_still_shows_surface() {
        let mut page = FakePage::with_composer(1);
        let mut controller = AttachController::new();
        controller.on_probe_tick(&mut page);

        let ts = FakeTypesetter {
            ready: true,
            reject: Some("x^"),
        };
        page.text = "$x^$".into();
        controller.on_composer_input(&mut page, &ts);
        // The marker is present, so the surface shows - with the source
        // kept verbatim since the engine rejected it.
        assert_eq!(page.surface, Some(SurfaceView::Rendered("$x^$".into())));
    }

    #[test]
    fn input_passes_through_when_engine_not_loaded() {
        let mut page = FakePage::with_composer(1);
        let mut controller = AttachController::new();
        controller.on_probe_tick(&mut page);

        let ts = FakeTypesetter {
            ready: false,
            reject: None,
        };
        page.text = "see $x^2$".into();
        controller.on_composer_input(&mut page, &ts);
        assert_eq!(
            page.surface,
            Some(SurfaceView::Rendered("see $x^2$".into()))
        );
    }

    #[test]
    fn input_is_inert_while_searching() {
        let mut page = FakePage::empty();
        let mut controller = AttachController::new();
        page.text = "$x$".into();
        controller.on_composer_input(&mut page, &FakeTypesetter::ready());
        assert_eq!(page.surface, None);
    }

    #[test]
    fn detach_unmounts_and_returns_to_searching() {
        let mut page = FakePage::with_composer(1);
        let mut controller = AttachController::new();
        controller.on_probe_tick(&mut page);

        controller.detach(&mut page);
        assert!(!controller.is_attached());
        assert_eq!(page.surface, None);

        // The pair can be rebuilt afterwards.
        assert_eq!(controller.on_probe_tick(&mut page), ProbeOutcome::Adopted(1));
    }
}
