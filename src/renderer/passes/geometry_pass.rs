//! First half of the deferred path: fill the G-buffer.

use crate::renderer::config::RendererConfig;
use crate::renderer::device::{BlendMode, ClearMask, RenderDevice};
use crate::renderer::passes::GEOMETRY_PASS;
use crate::renderer::pipeline::PassContext;
use crate::renderer::scene::Scene;
use crate::renderer::shaders::{names, ShaderPool};
use crate::renderer::targets::RenderTarget;
use crate::renderer::RenderError;

/// Render every queued entity's color, position and normal into the
/// geometry buffer.
///
/// Blending is disabled for the whole pass; G-buffer values must be written
/// exactly, never blended. The skybox, when present, is drawn last with the
/// deferred skybox program, re-centered on the camera.
pub(crate) fn render(
    scene: &Scene,
    shaders: &ShaderPool,
    gbuffer: &dyn RenderTarget,
    device: &mut dyn RenderDevice,
    config: &RendererConfig,
) -> Result<(), RenderError> {
    let camera = scene.camera().ok_or(RenderError::NoCamera)?;

    gbuffer.bind_for_writing();
    device.set_depth_write(true);
    device.clear(ClearMask::ColorAndDepth);
    device.set_depth_test(true);
    device.set_blend(BlendMode::Disabled);

    let mut ctx = PassContext::with_camera(camera, config);

    for entity in scene.entities() {
        let shader = entity.shader.as_ref();
        shader.bind();
        ctx.model = entity.model_matrix;
        entity.apply_bone_transforms(shader);
        ctx.apply(shader);
        entity.mesh.draw();

        if let Some(on_render) = &entity.on_render {
            on_render(entity, GEOMETRY_PASS);
        }
    }

    if let Some(skybox) = scene.skybox() {
        let shader = shaders.get(names::SKY_BOX_DEFERRED)?;
        shader.bind();
        ctx.model = skybox.model_matrix(camera);
        ctx.apply(shader.as_ref());
        skybox.mesh().draw();
    }

    device.set_depth_write(false);
    device.set_depth_test(false);

    Ok(())
}
