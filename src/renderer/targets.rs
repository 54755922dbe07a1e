//! Offscreen render targets and the texture units they are sampled from.

/// GPU-side pixel storage with one or more attachments, created once by the
/// backend at the configured viewport resolution and reused across frames.
pub trait RenderTarget {
    /// Bind this target so subsequent draws write into its attachments.
    fn bind_for_writing(&self);

    /// Bind this target's attachments for sampling, starting at
    /// `texture_unit`.
    ///
    /// Single-attachment targets occupy exactly `texture_unit`. The geometry
    /// target binds its color, position and normal attachments at
    /// `texture_unit`, `texture_unit + 1` and `texture_unit + 2`.
    fn bind_for_reading(&self, texture_unit: u32);
}

/// The full set of offscreen targets the render passes share.
///
/// Each target is written by exactly one pass per frame and read by exactly
/// one subsequent pass; none are read and written within the same pass.
pub struct RenderTargetSet {
    /// Depth-only target written by the shadow pass.
    pub shadow_map: Box<dyn RenderTarget>,
    /// Multi-attachment G-buffer (color, position, normal) written by the
    /// geometry pass.
    pub geometry: Box<dyn RenderTarget>,
    /// Accumulated lit color written by the light pass.
    pub lit: Box<dyn RenderTarget>,
    /// Bright-pass output; reused as the vertical blur output.
    pub bright: Box<dyn RenderTarget>,
    /// Horizontal blur output.
    pub blur: Box<dyn RenderTarget>,
}

/// G-buffer color attachment sampler unit.
pub const GBUFFER_COLOR_UNIT: u32 = 0;
/// G-buffer position attachment sampler unit.
pub const GBUFFER_POSITION_UNIT: u32 = 1;
/// G-buffer normal attachment sampler unit.
pub const GBUFFER_NORMAL_UNIT: u32 = 2;

/// Shadow map unit while forward shading samples it.
pub const FORWARD_SHADOW_UNIT: u32 = 1;
/// Shadow map unit during the deferred spot light sub-pass, clear of the
/// three G-buffer units.
pub const DEFERRED_SHADOW_UNIT: u32 = 3;

/// Input unit for each bloom stage's source texture.
pub const BLOOM_INPUT_UNIT: u32 = 0;
/// Unit the blurred bloom texture occupies during the final composite, next
/// to the lit buffer at [`BLOOM_INPUT_UNIT`].
pub const COMPOSITE_BLOOM_UNIT: u32 = 1;
