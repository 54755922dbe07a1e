//! Bloom post-process: bright-pass, separable blur, composite.
//!
//! A strict four-stage chain where each stage samples the previous stage's
//! output and writes the next target, with a clear before every stage:
//!
//! 1. bright-pass thresholds the lit buffer into `bright`,
//! 2. horizontal Gaussian blur of `bright` into `blur`,
//! 3. vertical Gaussian blur of `blur` back into `bright`,
//! 4. composite samples the lit buffer and the blurred bloom and writes the
//!    final frame to the screen.
//!
//! Reordering the blur stages changes the output; skipping the bright-pass
//! would bloom the entire image.

use crate::renderer::config::RendererConfig;
use crate::renderer::device::{ClearMask, RenderDevice};
use crate::renderer::drawable::Drawable;
use crate::renderer::pipeline::{
    draw_screen_pass, PassContext, BLUR_BINDINGS, COMPOSITE_BINDINGS,
};
use crate::renderer::scene::Scene;
use crate::renderer::shaders::{names, ShaderPool};
use crate::renderer::targets::{RenderTargetSet, BLOOM_INPUT_UNIT, COMPOSITE_BLOOM_UNIT};
use crate::renderer::RenderError;

/// Run the bloom chain over the lit buffer and composite the final frame to
/// the default target. `blur_size` is the Gaussian kernel scale for both
/// blur stages.
pub(crate) fn render(
    scene: &Scene,
    shaders: &ShaderPool,
    targets: &RenderTargetSet,
    device: &mut dyn RenderDevice,
    quad: &dyn Drawable,
    config: &RendererConfig,
    blur_size: f32,
) -> Result<(), RenderError> {
    let camera = scene.camera().ok_or(RenderError::NoCamera)?;

    let mut ctx = PassContext::with_camera(camera, config);
    ctx.blur_size = blur_size;

    // 1. Bright-pass: keep only pixels the shader considers bright.
    targets.lit.bind_for_reading(BLOOM_INPUT_UNIT);
    targets.bright.bind_for_writing();
    device.clear(ClearMask::ColorAndDepth);
    draw_screen_pass(shaders.get(names::PICK_BRIGHT)?.as_ref(), &[], &ctx, quad);

    // 2. Horizontal blur of the bright regions.
    targets.bright.bind_for_reading(BLOOM_INPUT_UNIT);
    targets.blur.bind_for_writing();
    device.clear(ClearMask::ColorAndDepth);
    draw_screen_pass(
        shaders.get(names::GAUSSIAN_BLUR_H)?.as_ref(),
        BLUR_BINDINGS,
        &ctx,
        quad,
    );

    // 3. Vertical blur, ping-ponged back into the bright target.
    targets.blur.bind_for_reading(BLOOM_INPUT_UNIT);
    targets.bright.bind_for_writing();
    device.clear(ClearMask::ColorAndDepth);
    draw_screen_pass(
        shaders.get(names::GAUSSIAN_BLUR_V)?.as_ref(),
        BLUR_BINDINGS,
        &ctx,
        quad,
    );

    // 4. Composite lit color + bloom to the screen.
    targets.lit.bind_for_reading(BLOOM_INPUT_UNIT);
    targets.bright.bind_for_reading(COMPOSITE_BLOOM_UNIT);
    device.bind_default_target();
    device.clear(ClearMask::ColorAndDepth);
    draw_screen_pass(
        shaders.get(names::DEFERRED_COMPOSITE)?.as_ref(),
        COMPOSITE_BINDINGS,
        &ctx,
        quad,
    );

    Ok(())
}
