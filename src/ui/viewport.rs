//! Viewport sizing
//!
//! The log fills the window except for a fixed strip reserved for the
//! input form underneath it.

use super::LogContainer;
use crate::config::UiConfig;

#[derive(Debug, Clone)]
pub struct ViewportSizer {
    footer_height: f32,
    clamp_negative: bool,
}

impl ViewportSizer {
    pub fn new(config: &UiConfig) -> Self {
        Self {
            footer_height: config.footer_height,
            clamp_negative: config.clamp_negative_height,
        }
    }

    pub fn footer_height(&self) -> f32 {
        self.footer_height
    }

    /// Log height for a window of `window_height`
    pub fn log_height(&self, window_height: f32) -> f32 {
        let height = window_height - self.footer_height;
        if self.clamp_negative {
            height.max(0.0)
        } else {
            height
        }
    }

    /// Size `container` for the window and return the applied height
    pub fn apply(&self, window_height: f32, container: &mut dyn LogContainer) -> f32 {
        let height = self.log_height(window_height);
        container.set_height(height);
        trace!("Log resized to {} for window {}", height, window_height);
        height
    }
}

impl Default for ViewportSizer {
    fn default() -> Self {
        Self::new(&UiConfig::default())
    }
}
