//! Depth-only pass rendering shadow casters from the light's point of view.

use crate::renderer::config::RendererConfig;
use crate::renderer::device::{ClearMask, RenderDevice};
use crate::renderer::lighting::SpotLight;
use crate::renderer::pipeline::PassContext;
use crate::renderer::scene::Scene;
use crate::renderer::shaders::{names, ShaderPool};
use crate::renderer::targets::RenderTarget;
use crate::renderer::RenderError;

/// Render the depth of every shadow-casting entity into `target`, viewed
/// from `light` (the scene's first spot light).
///
/// Every draw uses the depth-only pool program; entity shaders are left
/// untouched. On exit depth write and test are disabled and the default
/// target is rebound.
pub(crate) fn render(
    scene: &Scene,
    light: &SpotLight,
    shaders: &ShaderPool,
    target: &dyn RenderTarget,
    device: &mut dyn RenderDevice,
    config: &RendererConfig,
) -> Result<(), RenderError> {
    let camera = scene.camera().ok_or(RenderError::NoCamera)?;
    let shader = shaders.get(names::SHADOW)?;

    device.set_depth_write(true);
    device.set_depth_test(true);
    target.bind_for_writing();
    device.clear(ClearMask::Depth);

    let mut ctx = PassContext::with_camera(camera, config);
    ctx.view = light.view_matrix();

    for entity in scene.entities() {
        if !entity.casts_shadow {
            continue;
        }

        shader.bind();
        ctx.model = entity.model_matrix;
        entity.apply_bone_transforms(shader.as_ref());
        ctx.apply(shader.as_ref());
        entity.mesh.draw();
    }

    device.set_depth_write(false);
    device.set_depth_test(false);
    device.bind_default_target();

    Ok(())
}
