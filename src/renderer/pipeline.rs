//! Transient per-pass state and the declarative uniform binding tables.
//!
//! Every screen-space draw (light accumulation, bloom stages) shares the
//! same block of uniforms: an identity MVP for the clip-space quad, the
//! screen size, the three G-buffer sampler units and the eye position.
//! Instead of repeating the setter calls in every pass, each pass declares a
//! table of `{name, semantic}` pairs and [`apply_bindings`] resolves the
//! semantics against the current [`PassContext`].

use glam::{Mat4, Vec2, Vec3};

use super::config::RendererConfig;
use super::drawable::Drawable;
use super::shaders::ShaderProgram;
use super::targets::{
    COMPOSITE_BLOOM_UNIT, DEFERRED_SHADOW_UNIT, GBUFFER_COLOR_UNIT, GBUFFER_NORMAL_UNIT,
    GBUFFER_POSITION_UNIT,
};
use crate::camera::Camera;

/// Per-pass state assembled at the start of a pass and discarded at its end.
pub struct PassContext {
    pub projection: Mat4,
    pub view: Mat4,
    pub model: Mat4,
    pub eye_position: Vec3,
    /// View matrix of the shadow-casting light, when a spot light exists.
    pub light_view: Option<Mat4>,
    pub screen_size: Vec2,
    pub blur_size: f32,
}

impl PassContext {
    /// Build a context from the pass's camera. The model matrix starts as
    /// identity and is overwritten per draw.
    pub fn with_camera(camera: &Camera, config: &RendererConfig) -> Self {
        Self {
            projection: camera.projection_matrix(),
            view: camera.view_matrix(),
            model: Mat4::IDENTITY,
            eye_position: camera.eye(),
            light_view: None,
            screen_size: config.screen_size(),
            blur_size: config.blur_size,
        }
    }

    /// Push the camera, model and eye uniforms of a geometry draw into the
    /// bound shader.
    pub fn apply(&self, shader: &dyn ShaderProgram) {
        shader.set_mat4("g_projection_matrix", &self.projection);
        shader.set_mat4("g_view_matrix", &self.view);
        shader.set_mat4("g_model_matrix", &self.model);
        shader.set_vec3("g_eye_position", self.eye_position);
    }

    /// Push the light-space view projection used for shadow sampling. Does
    /// nothing when the scene has no shadow-casting light.
    pub fn apply_light_mvp(&self, shader: &dyn ShaderProgram) {
        if let Some(light_vp) = self.light_vp_matrix() {
            shader.set_mat4("g_light_vp_matrix", &light_vp);
        }
    }

    /// The light-space view projection matrix, if a shadow caster exists.
    pub fn light_vp_matrix(&self) -> Option<Mat4> {
        self.light_view.map(|view| self.projection * view)
    }
}

/// Where a declaratively bound uniform takes its value from.
#[derive(Clone, Copy, Debug)]
pub enum UniformSemantic {
    /// The viewport size from the pass context.
    ScreenSize,
    /// The camera position from the pass context.
    EyePosition,
    /// An identity MVP matrix; screen-space quads are already in clip space.
    IdentityMvp,
    /// The blur kernel size from the pass context.
    BlurSize,
    /// The shadow caster's view projection matrix; skipped when the context
    /// has no light view.
    LightViewProjection,
    /// A fixed texture sampler unit.
    TextureUnit(u32),
}

/// One entry of a per-pass uniform binding table.
pub struct UniformBinding {
    pub name: &'static str,
    pub semantic: UniformSemantic,
}

/// Uniforms shared by every full-screen draw over the G-buffer.
pub const SCREEN_PASS_BINDINGS: &[UniformBinding] = &[
    UniformBinding {
        name: "g_MVP_matrix",
        semantic: UniformSemantic::IdentityMvp,
    },
    UniformBinding {
        name: "g_screen_size",
        semantic: UniformSemantic::ScreenSize,
    },
    UniformBinding {
        name: "g_color_map",
        semantic: UniformSemantic::TextureUnit(GBUFFER_COLOR_UNIT),
    },
    UniformBinding {
        name: "g_position_map",
        semantic: UniformSemantic::TextureUnit(GBUFFER_POSITION_UNIT),
    },
    UniformBinding {
        name: "g_normal_map",
        semantic: UniformSemantic::TextureUnit(GBUFFER_NORMAL_UNIT),
    },
    UniformBinding {
        name: "g_eye_position",
        semantic: UniformSemantic::EyePosition,
    },
];

/// Extra uniforms for the spot light sub-pass: the shadow map sampler and
/// the matrix that projects G-buffer positions into shadow map space.
pub const SPOT_SHADOW_BINDINGS: &[UniformBinding] = &[
    UniformBinding {
        name: "g_shadow_map",
        semantic: UniformSemantic::TextureUnit(DEFERRED_SHADOW_UNIT),
    },
    UniformBinding {
        name: "g_light_vp_matrix",
        semantic: UniformSemantic::LightViewProjection,
    },
];

/// Extra uniform for the two Gaussian blur stages.
pub const BLUR_BINDINGS: &[UniformBinding] = &[UniformBinding {
    name: "g_blur_size",
    semantic: UniformSemantic::BlurSize,
}];

/// Extra uniform for the bloom composite: the blurred bloom sampler, bound
/// next to the lit buffer.
pub const COMPOSITE_BINDINGS: &[UniformBinding] = &[UniformBinding {
    name: "g_bloom_map",
    semantic: UniformSemantic::TextureUnit(COMPOSITE_BLOOM_UNIT),
}];

/// Resolve a binding table against the pass context and push each value into
/// the bound shader.
pub fn apply_bindings(shader: &dyn ShaderProgram, bindings: &[UniformBinding], ctx: &PassContext) {
    for binding in bindings {
        match binding.semantic {
            UniformSemantic::ScreenSize => shader.set_vec2(binding.name, ctx.screen_size),
            UniformSemantic::EyePosition => shader.set_vec3(binding.name, ctx.eye_position),
            UniformSemantic::IdentityMvp => shader.set_mat4(binding.name, &Mat4::IDENTITY),
            UniformSemantic::BlurSize => shader.set_f32(binding.name, ctx.blur_size),
            UniformSemantic::LightViewProjection => {
                if let Some(light_vp) = ctx.light_vp_matrix() {
                    shader.set_mat4(binding.name, &light_vp);
                }
            }
            UniformSemantic::TextureUnit(unit) => shader.set_i32(binding.name, unit as i32),
        }
    }
}

/// Bind `shader`, apply the shared screen-pass table plus `extras`, and draw
/// the full-screen quad.
pub(crate) fn draw_screen_pass(
    shader: &dyn ShaderProgram,
    extras: &[UniformBinding],
    ctx: &PassContext,
    quad: &dyn Drawable,
) {
    shader.bind();
    apply_bindings(shader, SCREEN_PASS_BINDINGS, ctx);
    apply_bindings(shader, extras, ctx);
    quad.draw();
}
