//! `MathPreview` - the content-script entry point for JavaScript.

use texpane_browser::PreviewRuntime;
use texpane_core::{Settings, SettingsMessage, Theme};
use wasm_bindgen::prelude::*;

/// The preview pipeline, as seen from the content script.
///
/// Holds the persisted settings and, while enabled, the running attachment
/// runtime. Disabling drops the runtime, which cancels the probe, stops
/// the structural-change watcher, and removes the preview surface.
#[wasm_bindgen]
pub struct MathPreview {
    settings: Settings,
    runtime: Option<PreviewRuntime>,
}

#[wasm_bindgen]
impl MathPreview {
    /// Create the pipeline from the persisted settings read at startup.
    /// Missing values fall back to defaults (enabled, silver theme).
    #[wasm_bindgen(constructor)]
    pub fn new(enabled: Option<bool>, theme: Option<String>) -> MathPreview {
        let defaults = Settings::default();
        let settings = Settings {
            enabled: enabled.unwrap_or(defaults.enabled),
            theme: theme.as_deref().map(Theme::parse).unwrap_or(defaults.theme),
        };
        MathPreview {
            settings,
            runtime: None,
        }
    }

    /// Start watching the page. No-op while disabled or already running.
    pub fn start(&mut self) -> Result<(), JsError> {
        if !self.settings.enabled || self.runtime.is_some() {
            return Ok(());
        }
        let runtime = PreviewRuntime::start(self.settings.theme)
            .map_err(|err| JsError::new(&format!("failed to start math preview: {err:?}")))?;
        self.runtime = Some(runtime);
        Ok(())
    }

    /// Stop watching and remove the preview surface.
    pub fn stop(&mut self) {
        self.runtime = None;
    }

    #[wasm_bindgen(getter)]
    pub fn enabled(&self) -> bool {
        self.settings.enabled
    }

    #[wasm_bindgen(getter)]
    pub fn theme(&self) -> String {
        self.settings.theme.as_str().to_owned()
    }

    /// Apply a settings-channel message.
    ///
    /// A message that does not decode is logged and dropped - the settings
    /// channel is best-effort and must never take the host page down.
    #[wasm_bindgen(js_name = handleMessage)]
    pub fn handle_message(&mut self, message: JsValue) -> Result<(), JsError> {
        let message: SettingsMessage = match serde_wasm_bindgen::from_value(message) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!("ignoring malformed settings message: {err}");
                return Ok(());
            }
        };
        match message {
            SettingsMessage::Toggle { enabled } => self.set_enabled(enabled),
            SettingsMessage::ChangeTheme { theme } => {
                self.set_theme(&theme);
                Ok(())
            }
        }
    }

    /// Enable or disable the pipeline. Disabling tears all observation
    /// down rather than merely suppressing rendering.
    #[wasm_bindgen(js_name = setEnabled)]
    pub fn set_enabled(&mut self, enabled: bool) -> Result<(), JsError> {
        self.settings.enabled = enabled;
        if enabled {
            self.start()
        } else {
            self.stop();
            Ok(())
        }
    }

    /// Switch the preview theme, restyling a live surface in place.
    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&mut self, theme: &str) {
        self.settings.theme = Theme::parse(theme);
        if let Some(runtime) = &self.runtime {
            runtime.set_theme(self.settings.theme);
        }
    }
}
