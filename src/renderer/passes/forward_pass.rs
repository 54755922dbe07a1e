//! Single-pass forward shading, the alternative to the deferred path.

use crate::renderer::config::RendererConfig;
use crate::renderer::device::{ClearMask, RenderDevice};
use crate::renderer::passes::FORWARD_PASS;
use crate::renderer::pipeline::PassContext;
use crate::renderer::scene::Scene;
use crate::renderer::targets::{RenderTarget, FORWARD_SHADOW_UNIT};
use crate::renderer::RenderError;

/// Shade every queued entity directly to the default target, applying all
/// lights in each entity's own shader.
///
/// When a spot light exists the shadow map is bound for sampling and each
/// entity receives the light-space matrix; with no spot lights no shadow
/// state is touched at all. The skybox, when present, is drawn last with
/// its own program. This path has no post-processing.
pub(crate) fn render(
    scene: &Scene,
    shadow_map: &dyn RenderTarget,
    device: &mut dyn RenderDevice,
    config: &RendererConfig,
) -> Result<(), RenderError> {
    let camera = scene.camera().ok_or(RenderError::NoCamera)?;
    let lights = scene.lights();

    device.set_depth_write(true);
    device.set_depth_test(true);
    device.clear(ClearMask::ColorAndDepth);

    let mut ctx = PassContext::with_camera(camera, config);
    ctx.light_view = lights.first_spot_light().map(|light| light.view_matrix());

    if ctx.light_view.is_some() {
        shadow_map.bind_for_reading(FORWARD_SHADOW_UNIT);
    }

    for entity in scene.entities() {
        let shader = entity.shader.as_ref();
        shader.bind();

        ctx.model = entity.model_matrix;
        if ctx.light_view.is_some() {
            ctx.apply_light_mvp(shader);
            shader.set_i32("g_shadow_map", FORWARD_SHADOW_UNIT as i32);
        }

        lights.apply_all(shader);
        entity.apply_bone_transforms(shader);
        ctx.apply(shader);
        entity.mesh.draw();

        if let Some(on_render) = &entity.on_render {
            on_render(entity, FORWARD_PASS);
        }
    }

    if let Some(skybox) = scene.skybox() {
        let shader = skybox.shader();
        shader.bind();
        ctx.model = skybox.model_matrix(camera);
        ctx.apply(shader);
        skybox.mesh().draw();
    }

    device.set_depth_write(false);
    device.set_depth_test(false);

    Ok(())
}
