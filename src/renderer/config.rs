//! Renderer construction parameters.

use glam::Vec2;

/// Fixed settings applied when the renderer is created.
///
/// The viewport dimensions size the offscreen targets and the UI camera;
/// `blur_size` scales the Gaussian kernel in both bloom blur stages.
#[derive(Clone, Debug, PartialEq)]
pub struct RendererConfig {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub blur_size: f32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1024,
            viewport_height: 768,
            blur_size: 2.0,
        }
    }
}

impl RendererConfig {
    /// Viewport dimensions as the `g_screen_size` uniform value.
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.viewport_width as f32, self.viewport_height as f32)
    }
}
