//! The environment widgets are mounted in.

use crate::capability::Capabilities;
use crate::element::Element;
use crate::metrics::{count_lines, MonospaceMetrics, NullMetrics, TextMetrics};
use crate::widget::TextStyle;
use std::fmt;
use std::sync::Arc;

/// Capabilities and text metrics of a mounting host.
#[derive(Clone)]
pub struct Host {
    capabilities: Capabilities,
    metrics: Arc<dyn TextMetrics>,
}

impl Host {
    /// Create a host from its parts.
    #[must_use]
    pub fn new(capabilities: Capabilities, metrics: impl TextMetrics + 'static) -> Self {
        Self {
            capabilities,
            metrics: Arc::new(metrics),
        }
    }

    /// A host with no capability primitive and no layout engine.
    #[must_use]
    pub fn headless() -> Self {
        Self::new(Capabilities::absent(), NullMetrics)
    }

    /// Replace the capabilities.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Replace the text metrics.
    #[must_use]
    pub fn with_metrics(mut self, metrics: impl TextMetrics + 'static) -> Self {
        self.metrics = Arc::new(metrics);
        self
    }

    /// Capability surface.
    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Text metrics.
    #[must_use]
    pub fn metrics(&self) -> &dyn TextMetrics {
        self.metrics.as_ref()
    }

    /// Content height of a text element laid out at `width`.
    ///
    /// The text is wrapped inside the horizontal padding, and the vertical
    /// padding is added on top, like the scroll height of a form control.
    /// Unparseable padding values count as zero.
    #[must_use]
    pub fn scroll_height(&self, element: &Element, width: f32, text_style: &TextStyle) -> f32 {
        let style = element.style();
        let padding = |property: &str| style.px(property).unwrap_or(0.0);

        let inner_width = width - padding("padding-left") - padding("padding-right");
        let lines = count_lines(element.text(), inner_width, self.metrics(), text_style);
        let line_height = self.metrics.line_height(text_style);

        lines as f32 * line_height + padding("padding-top") + padding("padding-bottom")
    }
}

impl Default for Host {
    /// Ambient capabilities with monospace metrics.
    fn default() -> Self {
        Self::new(Capabilities::current(), MonospaceMetrics::default())
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}
