//! Renderer configuration.

use crate::ChatmarkError;
use serde::Deserialize;

/// Default `target` attribute for rendered links.
pub const DEFAULT_LINK_TARGET: &str = "_blank";

/// Options controlling the HTML the renderer emits.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Value of the `target` attribute on links; `None` omits the attribute.
    #[serde(alias = "linkTarget")]
    pub link_target: Option<String>,
    /// Convert every remaining newline into `<br>`.
    #[serde(alias = "hardBreaks")]
    pub hard_breaks: bool,
}

impl RenderOptions {
    /// Chat-reply defaults: links open in a new tab, newlines become `<br>`.
    pub fn chat() -> Self {
        Self {
            link_target: Some(DEFAULT_LINK_TARGET.to_string()),
            hard_breaks: true,
        }
    }

    /// Decode options from JSON and validate them.
    ///
    /// Missing fields fall back to [`RenderOptions::chat`].
    pub fn from_json(input: &str) -> Result<Self, ChatmarkError> {
        let options: RenderOptions = serde_json::from_str(input)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject values that would break out of the markup they are written into.
    pub fn validate(&self) -> Result<(), ChatmarkError> {
        if let Some(target) = &self.link_target
            && (target.is_empty() || target.contains(['"', '<', '>']))
        {
            return Err(ChatmarkError::invalid_link_target(target.as_str()));
        }
        Ok(())
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::chat()
    }
}
