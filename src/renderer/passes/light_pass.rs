//! Deferred light accumulation over the G-buffer.
//!
//! The caller binds the G-buffer for reading, binds the lit target for
//! writing and enables additive blending before this pass runs; the
//! accumulated result is only correct under additive blending.

use crate::renderer::config::RendererConfig;
use crate::renderer::device::{ClearMask, RenderDevice};
use crate::renderer::drawable::Drawable;
use crate::renderer::pipeline::{
    apply_bindings, PassContext, SCREEN_PASS_BINDINGS, SPOT_SHADOW_BINDINGS,
};
use crate::renderer::scene::Scene;
use crate::renderer::shaders::{names, ShaderPool};
use crate::renderer::targets::{RenderTarget, DEFERRED_SHADOW_UNIT};
use crate::renderer::RenderError;

/// Accumulate lit color by drawing one full-screen quad per point and spot
/// light, then a single quad for the directional and ambient lights, in
/// that fixed sub-pass order.
pub(crate) fn render(
    scene: &Scene,
    shaders: &ShaderPool,
    shadow_map: &dyn RenderTarget,
    device: &mut dyn RenderDevice,
    quad: &dyn Drawable,
    config: &RendererConfig,
) -> Result<(), RenderError> {
    let camera = scene.camera().ok_or(RenderError::NoCamera)?;
    let lights = scene.lights();

    let mut ctx = PassContext::with_camera(camera, config);
    ctx.light_view = lights.first_spot_light().map(|light| light.view_matrix());

    device.clear(ClearMask::ColorAndDepth);

    // Point lights, one quad each.
    if lights.point_light_count() > 0 {
        let shader = shaders.get(names::POINT_LIGHT_PASS)?;
        for light in lights.point_lights() {
            shader.bind();
            light.apply(shader.as_ref(), 0);
            apply_bindings(shader.as_ref(), SCREEN_PASS_BINDINGS, &ctx);
            quad.draw();
        }
    }

    // Spot lights sample the shadow map; the shadow matrix always comes from
    // the shadow caster (the first spot light).
    if lights.spot_light_count() > 0 {
        shadow_map.bind_for_reading(DEFERRED_SHADOW_UNIT);
        let shader = shaders.get(names::SPOT_LIGHT_PASS)?;
        for light in lights.spot_lights() {
            shader.bind();
            light.apply(shader.as_ref(), 0);
            apply_bindings(shader.as_ref(), SCREEN_PASS_BINDINGS, &ctx);
            apply_bindings(shader.as_ref(), SPOT_SHADOW_BINDINGS, &ctx);
            quad.draw();
        }
    }

    // Directional + ambient always run, exactly once.
    let shader = shaders.get(names::DIR_LIGHT_PASS)?;
    shader.bind();
    apply_bindings(shader.as_ref(), SCREEN_PASS_BINDINGS, &ctx);
    lights.directional().apply(shader.as_ref());
    lights.ambient().apply(shader.as_ref());
    quad.draw();

    Ok(())
}
