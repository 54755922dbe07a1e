//! 2D/UI pass, run unconditionally after the 3D path.

use crate::renderer::config::RendererConfig;
use crate::renderer::passes::SPRITE_PASS;
use crate::renderer::pipeline::PassContext;
use crate::renderer::scene::Scene;

/// Draw and drain the frame's sprite queue with the scene's orthographic UI
/// camera. Each sprite binds its own program.
pub(crate) fn render(scene: &mut Scene, config: &RendererConfig) {
    let sprites = scene.take_sprites();
    let mut ctx = PassContext::with_camera(scene.ui_camera(), config);

    for sprite in &sprites {
        let shader = sprite.shader.as_ref();
        shader.bind();
        ctx.model = sprite.model_matrix;
        ctx.apply(shader);
        sprite.mesh.draw();

        if let Some(on_render) = &sprite.on_render {
            on_render(sprite, SPRITE_PASS);
        }
    }
}
