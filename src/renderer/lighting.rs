//! Scene lights and the registry that owns them.
//!
//! The ambient and directional lights are singletons that always exist.
//! Point and spot lights live in arenas and are addressed by stable keys;
//! their enumeration order (creation order) decides the uniform array slot
//! each light occupies in forward shaders.

use glam::{Mat4, Vec3};
use slotmap::{new_key_type, SlotMap};

use super::shaders::ShaderProgram;

new_key_type! {
    /// Stable handle to a scene-owned point light.
    pub struct PointLightKey;
    /// Stable handle to a scene-owned spot light.
    pub struct SpotLightKey;
}

/// Constant scene-wide illumination.
#[derive(Clone, Debug)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 0.1,
        }
    }
}

impl AmbientLight {
    /// Push this light's parameters into the bound shader.
    pub fn apply(&self, shader: &dyn ShaderProgram) {
        shader.set_vec3("g_ambient_light_color", self.color);
        shader.set_f32("g_ambient_light_intensity", self.intensity);
    }
}

/// Infinitely distant light shining along a fixed direction.
#[derive(Clone, Debug)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::NEG_Y,
            color: Vec3::ONE,
            intensity: 1.0,
        }
    }
}

impl DirectionalLight {
    /// Push this light's parameters into the bound shader.
    pub fn apply(&self, shader: &dyn ShaderProgram) {
        shader.set_vec3("g_dir_light_direction", self.direction);
        shader.set_vec3("g_dir_light_color", self.color);
        shader.set_f32("g_dir_light_intensity", self.intensity);
    }
}

/// Omnidirectional light with distance falloff.
#[derive(Clone, Debug)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    /// Attenuation radius; contributions past this distance fall to zero.
    pub range: f32,
}

impl PointLight {
    pub fn new(position: Vec3, color: Vec3, intensity: f32, range: f32) -> Self {
        Self {
            position,
            color,
            intensity,
            range,
        }
    }

    /// Push this light's parameters into uniform array slot `slot` of the
    /// bound shader.
    pub fn apply(&self, shader: &dyn ShaderProgram, slot: usize) {
        shader.set_vec3(&format!("g_point_lights[{slot}].position"), self.position);
        shader.set_vec3(&format!("g_point_lights[{slot}].color"), self.color);
        shader.set_f32(&format!("g_point_lights[{slot}].intensity"), self.intensity);
        shader.set_f32(&format!("g_point_lights[{slot}].range"), self.range);
    }
}

/// Cone-shaped light. The first spot light created is also the scene's only
/// shadow caster.
#[derive(Clone, Debug)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    /// Attenuation radius; contributions past this distance fall to zero.
    pub range: f32,
    /// Half-angle of the cone in radians.
    pub cutoff: f32,
}

impl SpotLight {
    pub fn new(
        position: Vec3,
        direction: Vec3,
        color: Vec3,
        intensity: f32,
        range: f32,
        cutoff: f32,
    ) -> Self {
        Self {
            position,
            direction: direction.normalize(),
            color,
            intensity,
            range,
            cutoff,
        }
    }

    /// Push this light's parameters into uniform array slot `slot` of the
    /// bound shader.
    pub fn apply(&self, shader: &dyn ShaderProgram, slot: usize) {
        shader.set_vec3(&format!("g_spot_lights[{slot}].position"), self.position);
        shader.set_vec3(&format!("g_spot_lights[{slot}].direction"), self.direction);
        shader.set_vec3(&format!("g_spot_lights[{slot}].color"), self.color);
        shader.set_f32(&format!("g_spot_lights[{slot}].intensity"), self.intensity);
        shader.set_f32(&format!("g_spot_lights[{slot}].range"), self.range);
        shader.set_f32(&format!("g_spot_lights[{slot}].cutoff"), self.cutoff);
    }

    /// View matrix for rendering or sampling shadows from this light: a
    /// look-at from the light's position along its direction with world +Y
    /// as up.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.direction, Vec3::Y)
    }
}

/// All lights owned by a scene.
#[derive(Default)]
pub struct LightRegistry {
    ambient: AmbientLight,
    directional: DirectionalLight,
    point_lights: SlotMap<PointLightKey, PointLight>,
    spot_lights: SlotMap<SpotLightKey, SpotLight>,
}

impl LightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The scene's ambient light. Always present.
    pub fn ambient(&self) -> &AmbientLight {
        &self.ambient
    }

    pub fn ambient_mut(&mut self) -> &mut AmbientLight {
        &mut self.ambient
    }

    /// The scene's directional light. Always present.
    pub fn directional(&self) -> &DirectionalLight {
        &self.directional
    }

    pub fn directional_mut(&mut self) -> &mut DirectionalLight {
        &mut self.directional
    }

    /// Register a point light, returning a stable handle to it. Lights live
    /// for the scene's lifetime.
    pub fn add_point_light(&mut self, light: PointLight) -> PointLightKey {
        self.point_lights.insert(light)
    }

    /// Register a spot light, returning a stable handle to it. The first
    /// spot light added becomes the scene's shadow caster.
    pub fn add_spot_light(&mut self, light: SpotLight) -> SpotLightKey {
        self.spot_lights.insert(light)
    }

    pub fn point_light(&self, key: PointLightKey) -> Option<&PointLight> {
        self.point_lights.get(key)
    }

    pub fn point_light_mut(&mut self, key: PointLightKey) -> Option<&mut PointLight> {
        self.point_lights.get_mut(key)
    }

    pub fn spot_light(&self, key: SpotLightKey) -> Option<&SpotLight> {
        self.spot_lights.get(key)
    }

    pub fn spot_light_mut(&mut self, key: SpotLightKey) -> Option<&mut SpotLight> {
        self.spot_lights.get_mut(key)
    }

    /// Iterate point lights in creation order; the enumeration index is the
    /// uniform array slot.
    pub fn point_lights(&self) -> impl Iterator<Item = &PointLight> {
        self.point_lights.values()
    }

    /// Iterate spot lights in creation order; the enumeration index is the
    /// uniform array slot.
    pub fn spot_lights(&self) -> impl Iterator<Item = &SpotLight> {
        self.spot_lights.values()
    }

    pub fn point_light_count(&self) -> usize {
        self.point_lights.len()
    }

    pub fn spot_light_count(&self) -> usize {
        self.spot_lights.len()
    }

    /// The scene's single shadow-casting light, if any spot light exists.
    pub fn first_spot_light(&self) -> Option<&SpotLight> {
        self.spot_lights.values().next()
    }

    /// Push every light into the bound shader at once, as the forward path
    /// shades with all lights in a single draw.
    pub fn apply_all(&self, shader: &dyn ShaderProgram) {
        shader.set_i32("g_point_light_amount", self.point_lights.len() as i32);
        shader.set_i32("g_spot_light_amount", self.spot_lights.len() as i32);
        self.directional.apply(shader);
        self.ambient.apply(shader);

        for (slot, light) in self.point_lights.values().enumerate() {
            light.apply(shader, slot);
        }

        for (slot, light) in self.spot_lights.values().enumerate() {
            light.apply(shader, slot);
        }
    }
}
