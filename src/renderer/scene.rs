//! Scene state consumed by the renderer, and the registry that owns scenes.

use std::rc::Rc;

use glam::Mat4;
use slotmap::{new_key_type, SlotMap};

use super::config::RendererConfig;
use super::drawable::{Drawable, RenderEntity, Sprite};
use super::lighting::LightRegistry;
use super::shaders::ShaderProgram;
use crate::camera::Camera;

/// Which pass sequence [`super::Renderer::render`] executes for a scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderType {
    /// Single-pass shading directly to the screen. No post-processing.
    #[default]
    Forward,
    /// G-buffer geometry pass, per-light accumulation and bloom.
    Deferred,
}

/// Background geometry drawn last in the 3D passes, translated to follow the
/// camera so it always appears infinitely distant.
pub struct Skybox {
    mesh: Rc<dyn Drawable>,
    /// Program used by the forward path. The geometry pass substitutes the
    /// deferred skybox program from the pool.
    shader: Rc<dyn ShaderProgram>,
}

impl Skybox {
    pub fn new(mesh: Rc<dyn Drawable>, shader: Rc<dyn ShaderProgram>) -> Self {
        Self { mesh, shader }
    }

    pub fn mesh(&self) -> &dyn Drawable {
        self.mesh.as_ref()
    }

    pub fn shader(&self) -> &dyn ShaderProgram {
        self.shader.as_ref()
    }

    /// Model matrix that re-centers the skybox on the camera.
    pub fn model_matrix(&self, camera: &Camera) -> Mat4 {
        Mat4::from_translation(camera.eye())
    }
}

/// Scene-graph collaborator. A visit populates the scene's per-frame queues
/// through [`Scene::submit_entity`] and [`Scene::submit_sprite`]; the
/// renderer knows nothing about graph topology.
pub trait SceneGraph {
    fn visit(&mut self, scene: &mut Scene);
}

/// Everything the renderer needs to draw one world: lights, cameras, render
/// strategy and the transient per-frame draw queues.
///
/// A `Scene` is not a scene graph. Entity submission happens from the
/// outside, once per frame, and the entity queue is fully drained before
/// `render` returns.
pub struct Scene {
    lights: LightRegistry,
    camera: Option<Camera>,
    ui_camera: Camera,
    render_type: RenderType,
    skybox: Option<Skybox>,
    entities: Vec<RenderEntity>,
    sprites: Vec<Sprite>,
    last_frame: Vec<RenderEntity>,
}

impl Scene {
    /// Create an empty scene. The UI camera is an orthographic camera over
    /// the configured viewport; the 3D camera starts unset and must be
    /// provided before rendering.
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            lights: LightRegistry::new(),
            camera: None,
            ui_camera: Camera::orthographic(
                config.viewport_width,
                config.viewport_height,
                0.01,
                1000.0,
            ),
            render_type: RenderType::default(),
            skybox: None,
            entities: Vec::new(),
            sprites: Vec::new(),
            last_frame: Vec::new(),
        }
    }

    pub fn lights(&self) -> &LightRegistry {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut LightRegistry {
        &mut self.lights
    }

    /// The active 3D camera, if one has been set.
    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.camera.as_mut()
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = Some(camera);
    }

    /// The orthographic camera used by the sprite pass.
    pub fn ui_camera(&self) -> &Camera {
        &self.ui_camera
    }

    pub fn set_ui_camera(&mut self, camera: Camera) {
        self.ui_camera = camera;
    }

    pub fn render_type(&self) -> RenderType {
        self.render_type
    }

    pub fn set_render_type(&mut self, render_type: RenderType) {
        self.render_type = render_type;
    }

    pub fn skybox(&self) -> Option<&Skybox> {
        self.skybox.as_ref()
    }

    pub fn set_skybox(&mut self, skybox: Option<Skybox>) {
        self.skybox = skybox;
    }

    /// Queue an entity for the current frame.
    pub fn submit_entity(&mut self, entity: RenderEntity) {
        self.entities.push(entity);
    }

    /// Queue a sprite for the current frame.
    pub fn submit_sprite(&mut self, sprite: Sprite) {
        self.sprites.push(sprite);
    }

    /// Entities queued for the current frame, in draw order once
    /// [`Self::sort_entities`] has run.
    pub fn entities(&self) -> &[RenderEntity] {
        &self.entities
    }

    /// Sprites queued for the current frame.
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    /// The entities rendered by the previous frame.
    pub fn last_frame(&self) -> &[RenderEntity] {
        &self.last_frame
    }

    /// Order queued entities nearest-first by their distance to the camera.
    pub fn sort_entities(&mut self) {
        self.entities
            .sort_by(|a, b| a.distance_to_camera.total_cmp(&b.distance_to_camera));
    }

    pub(crate) fn take_sprites(&mut self) -> Vec<Sprite> {
        std::mem::take(&mut self.sprites)
    }

    /// Snapshot the entity queue into the last-frame list and clear it, so
    /// the next frame's submissions start from empty.
    pub(crate) fn end_frame(&mut self) {
        self.last_frame = std::mem::take(&mut self.entities);
    }

    /// Drop the frame's queues without drawing or snapshotting, leaving the
    /// previous frame's snapshot untouched. Used when a frame aborts with an
    /// error so the next visit starts from empty queues.
    pub(crate) fn discard_frame(&mut self) {
        self.entities.clear();
        self.sprites.clear();
    }
}

new_key_type! {
    /// Stable handle to a registered scene.
    pub struct SceneKey;
}

/// Owns scenes and tracks which one is active.
///
/// Activation is an explicit lifecycle: insert, activate, deactivate. There
/// is no implicit global; whoever drives the frame loop holds the registry
/// and asks it for the active scene.
#[derive(Default)]
pub struct SceneRegistry {
    scenes: SlotMap<SceneKey, Scene>,
    active: Option<SceneKey>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scene, returning its handle. The scene is not activated.
    pub fn insert(&mut self, scene: Scene) -> SceneKey {
        self.scenes.insert(scene)
    }

    /// Remove a scene. Deactivates it first if it was active.
    pub fn remove(&mut self, key: SceneKey) -> Option<Scene> {
        if self.active == Some(key) {
            self.active = None;
        }
        self.scenes.remove(key)
    }

    /// Make `key` the active scene. Returns false (and leaves the previous
    /// activation untouched) when the key is not registered.
    pub fn activate(&mut self, key: SceneKey) -> bool {
        if self.scenes.contains_key(key) {
            self.active = Some(key);
            true
        } else {
            false
        }
    }

    /// Clear the active scene.
    pub fn deactivate(&mut self) {
        self.active = None;
    }

    pub fn active_key(&self) -> Option<SceneKey> {
        self.active
    }

    pub fn active(&self) -> Option<&Scene> {
        self.active.and_then(|key| self.scenes.get(key))
    }

    pub fn active_mut(&mut self) -> Option<&mut Scene> {
        match self.active {
            Some(key) => self.scenes.get_mut(key),
            None => None,
        }
    }

    pub fn get(&self, key: SceneKey) -> Option<&Scene> {
        self.scenes.get(key)
    }

    pub fn get_mut(&mut self, key: SceneKey) -> Option<&mut Scene> {
        self.scenes.get_mut(key)
    }
}
