//! Fixed-function device state behind a trait seam.

/// Framebuffer blend state used by the render passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// Source fragments overwrite the destination.
    Disabled,
    /// Source fragments add onto the destination. Required by the light
    /// accumulation pass.
    Additive,
}

/// Which attachments a clear touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClearMask {
    /// Depth only. Used before the shadow pass.
    Depth,
    /// Color and depth together.
    ColorAndDepth,
}

/// Mutable global GPU state the passes toggle between draws.
///
/// The passes leave depth write and depth test disabled on exit so the 2D
/// sprite pass never has to reset them.
pub trait RenderDevice {
    fn set_depth_write(&mut self, enabled: bool);
    fn set_depth_test(&mut self, enabled: bool);
    fn set_blend(&mut self, mode: BlendMode);
    fn clear(&mut self, mask: ClearMask);

    /// Bind the backend's default (on-screen) framebuffer for writing.
    fn bind_default_target(&mut self);
}
