//! Per-frame draw submissions.
//!
//! Entities and sprites are submitted by value each frame; the meshes and
//! shader programs they reference stay owned by the caller behind `Rc`. The
//! renderer drains the queues before `render` returns, so nothing here
//! outlives a frame except the previous frame's snapshot.

use std::rc::Rc;

use glam::Mat4;

use super::shaders::ShaderProgram;

/// A piece of GPU geometry the backend knows how to draw. Binding vertex and
/// index buffers and issuing the draw call happen behind this seam.
pub trait Drawable {
    fn draw(&self);
}

/// Post-draw hook for a 3D entity, invoked with the entity and the index of
/// the pass that drew it (see [`super::passes`]).
pub type EntityCallback = Rc<dyn Fn(&RenderEntity, usize)>;

/// Post-draw hook for a sprite.
pub type SpriteCallback = Rc<dyn Fn(&Sprite, usize)>;

/// A 3D drawable submitted for the current frame.
#[derive(Clone)]
pub struct RenderEntity {
    /// The geometry to draw.
    pub mesh: Rc<dyn Drawable>,
    /// The program that shades this entity in the forward and geometry
    /// passes. The shadow pass ignores it and uses the depth-only program.
    pub shader: Rc<dyn ShaderProgram>,
    /// Local-to-world transform.
    pub model_matrix: Mat4,
    /// Distance from the active camera, computed by the submitter. Entities
    /// are drawn in ascending order of this value.
    pub distance_to_camera: f32,
    /// Whether this entity is rendered into the shadow map.
    pub casts_shadow: bool,
    /// Skinning matrices for animated entities, already evaluated for the
    /// current frame. `None` for static geometry.
    pub bone_transforms: Option<Vec<Mat4>>,
    /// Optional hook invoked after each draw of this entity.
    pub on_render: Option<EntityCallback>,
}

impl RenderEntity {
    pub fn new(mesh: Rc<dyn Drawable>, shader: Rc<dyn ShaderProgram>, model_matrix: Mat4) -> Self {
        Self {
            mesh,
            shader,
            model_matrix,
            distance_to_camera: 0.0,
            casts_shadow: true,
            bone_transforms: None,
            on_render: None,
        }
    }

    pub fn with_distance(mut self, distance_to_camera: f32) -> Self {
        self.distance_to_camera = distance_to_camera;
        self
    }

    pub fn with_shadow_casting(mut self, casts_shadow: bool) -> Self {
        self.casts_shadow = casts_shadow;
        self
    }

    pub fn with_bone_transforms(mut self, bone_transforms: Vec<Mat4>) -> Self {
        self.bone_transforms = Some(bone_transforms);
        self
    }

    pub fn with_callback(mut self, on_render: EntityCallback) -> Self {
        self.on_render = Some(on_render);
        self
    }

    /// Push this entity's skinning state into the bound shader: the
    /// animation flag, and one matrix per bone when animated.
    pub fn apply_bone_transforms(&self, shader: &dyn ShaderProgram) {
        match &self.bone_transforms {
            Some(bones) => {
                shader.set_i32("g_has_animation", 1);
                for (i, transform) in bones.iter().enumerate() {
                    shader.set_mat4(&format!("g_bones[{i}]"), transform);
                }
            }
            None => shader.set_i32("g_has_animation", 0),
        }
    }
}

/// A 2D drawable rendered by the sprite pass with the scene's UI camera.
#[derive(Clone)]
pub struct Sprite {
    pub mesh: Rc<dyn Drawable>,
    pub shader: Rc<dyn ShaderProgram>,
    /// Transform in UI space (pixels, origin bottom-left).
    pub model_matrix: Mat4,
    /// Optional hook invoked after this sprite is drawn.
    pub on_render: Option<SpriteCallback>,
}

impl Sprite {
    pub fn new(mesh: Rc<dyn Drawable>, shader: Rc<dyn ShaderProgram>, model_matrix: Mat4) -> Self {
        Self {
            mesh,
            shader,
            model_matrix,
            on_render: None,
        }
    }

    pub fn with_callback(mut self, on_render: SpriteCallback) -> Self {
        self.on_render = Some(on_render);
        self
    }
}
