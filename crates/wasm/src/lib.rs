use chatmark_core::{RenderOptions, RenderWarning, Renderer};
use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

// ============================================================================
// Render Config
// ============================================================================

/// Configuration accepted by `renderWithOptions`.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct WasmRenderConfig {
    /// Link `target` attribute; an empty string drops the attribute.
    #[serde(default, alias = "linkTarget")]
    pub link_target: Option<String>,
    /// Convert newlines to `<br>`.
    #[serde(default, alias = "hardBreaks")]
    pub hard_breaks: Option<bool>,
}

fn parse_config(config: JsValue) -> Result<WasmRenderConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(WasmRenderConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))
}

fn build_render_options(cfg: &WasmRenderConfig) -> RenderOptions {
    let defaults = RenderOptions::default();
    RenderOptions {
        link_target: match cfg.link_target.as_deref() {
            Some("") => None,
            Some(target) => Some(target.to_string()),
            None => defaults.link_target,
        },
        hard_breaks: cfg.hard_breaks.unwrap_or(defaults.hard_breaks),
    }
}

// ============================================================================
// Render API
// ============================================================================

/// Renders a chat reply to an HTML fragment with the default options.
///
/// Links open in a new tab and newlines become `<br>`. The result is meant
/// for a message container's `innerHTML`; source HTML is not escaped.
#[wasm_bindgen]
pub fn render(source: &str) -> String {
    chatmark_core::render(source)
}

/// Renders a chat reply with caller-supplied options.
///
/// # Example (JavaScript)
///
/// ```javascript
/// import { renderWithOptions } from './chatmark_wasm';
///
/// const html = renderWithOptions("see [doc](http://x)", { linkTarget: "" });
/// // html = 'see <a href="http://x">doc</a>'
/// ```
#[wasm_bindgen(js_name = renderWithOptions)]
pub fn render_with_options(source: &str, config: JsValue) -> Result<String, JsError> {
    let cfg = parse_config(config)?;
    let renderer = Renderer::new(build_render_options(&cfg))
        .map_err(|e| JsError::new(&e.to_string()))?;
    Ok(renderer.render(source))
}

// ============================================================================
// Diagnostics API
// ============================================================================

/// Markup warning surfaced to JavaScript.
#[derive(Debug, Clone, Serialize)]
pub struct WarningEntry {
    /// Warning kind, e.g. `unclosed-code-fence`.
    pub kind: &'static str,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Human-readable message.
    pub message: String,
}

impl From<&RenderWarning> for WarningEntry {
    fn from(warning: &RenderWarning) -> Self {
        let location = warning.location();
        Self {
            kind: warning.kind(),
            line: location.line,
            column: location.column,
            message: warning.to_string(),
        }
    }
}

/// Lists markup in `source` that will render as literal text.
///
/// Returns an array of `{kind, line, column, message}` objects.
#[wasm_bindgen]
pub fn inspect(source: &str) -> Result<JsValue, JsError> {
    let entries: Vec<WarningEntry> = chatmark_core::inspect(source)
        .warnings
        .iter()
        .map(WarningEntry::from)
        .collect();
    serde_wasm_bindgen::to_value(&entries)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
