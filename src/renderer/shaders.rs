//! The shader program collaborator and the string-keyed shader pool.

use std::collections::HashMap;
use std::rc::Rc;

use glam::{Mat4, Vec2, Vec3};

use super::RenderError;

/// Identifiers for the shader programs the render passes look up by name.
///
/// A backend must register a program for each name its chosen render path
/// looks up: the deferred path needs all of them, the forward path only
/// [`SHADOW`](names::SHADOW).
pub mod names {
    /// Depth-only program bound for every draw in the shadow pass.
    pub const SHADOW: &str = "shadow";
    /// Directional + ambient accumulation over the G-buffer.
    pub const DIR_LIGHT_PASS: &str = "dir_light_pass";
    /// Per point light accumulation over the G-buffer.
    pub const POINT_LIGHT_PASS: &str = "point_light_pass";
    /// Per spot light accumulation, sampling the shadow map.
    pub const SPOT_LIGHT_PASS: &str = "spot_light_pass";
    /// Bloom bright-pass threshold.
    pub const PICK_BRIGHT: &str = "pick_bright";
    /// Horizontal separable Gaussian blur.
    pub const GAUSSIAN_BLUR_H: &str = "gaussian_blur";
    /// Vertical separable Gaussian blur.
    pub const GAUSSIAN_BLUR_V: &str = "gaussian_blur_v";
    /// Final bloom composite written to the screen.
    pub const DEFERRED_COMPOSITE: &str = "deferred_composite";
    /// Skybox program used while filling the G-buffer. The forward path has
    /// no counterpart here; it draws the skybox with the program held by
    /// [`Skybox`](crate::renderer::scene::Skybox) itself.
    pub const SKY_BOX_DEFERRED: &str = "sky_box_deferred";
}

/// A compiled GPU shader program, treated opaquely by the renderer.
///
/// Uniforms are addressed by the string names listed in the pass modules;
/// compilation and name-to-location resolution belong to the backend.
pub trait ShaderProgram {
    /// Make this program the active one for subsequent uniform sets and
    /// draws.
    fn bind(&self);

    fn set_i32(&self, name: &str, value: i32);
    fn set_f32(&self, name: &str, value: f32);
    fn set_vec2(&self, name: &str, value: Vec2);
    fn set_vec3(&self, name: &str, value: Vec3);
    fn set_mat4(&self, name: &str, value: &Mat4);
}

/// String-keyed registry of shader programs shared by the render passes.
#[derive(Default)]
pub struct ShaderPool {
    programs: HashMap<String, Rc<dyn ShaderProgram>>,
}

impl ShaderPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a program under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, program: Rc<dyn ShaderProgram>) {
        self.programs.insert(name.into(), program);
    }

    /// Look up a program by name.
    ///
    /// A missing program is a contract violation by the backend and is
    /// reported as [`RenderError::ShaderNotFound`] rather than silently
    /// rendering garbage.
    pub fn get(&self, name: &str) -> Result<Rc<dyn ShaderProgram>, RenderError> {
        self.programs
            .get(name)
            .cloned()
            .ok_or_else(|| RenderError::ShaderNotFound(name.to_owned()))
    }

    /// Check whether a program is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.programs.contains_key(name)
    }
}
