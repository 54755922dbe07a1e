//! Pass orchestration: who draws, where, in what order.
//!
//! [`Renderer::render`] runs one frame for a scene: visit the scene graph to
//! fill the draw queues, sort them, execute the scene's pass sequence
//! (forward or deferred) and finally the 2D sprite pass. All GPU work goes
//! through the collaborator traits, so the renderer itself is backend-free.

pub mod config;
pub mod device;
pub mod drawable;
pub mod lighting;
pub mod passes;
pub mod pipeline;
pub mod scene;
pub mod shaders;
pub mod targets;

#[cfg(test)]
pub(crate) mod testing;

use std::rc::Rc;

use tracing::info;

pub use config::RendererConfig;
pub use scene::{RenderType, Scene, SceneGraph, SceneRegistry};

use device::{BlendMode, RenderDevice};
use drawable::Drawable;
use shaders::ShaderPool;
use targets::{RenderTargetSet, GBUFFER_COLOR_UNIT};

/// Errors surfaced while rendering a frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A pass asked the shader pool for a program the backend never
    /// registered.
    #[error("no shader program registered under name '{0}'")]
    ShaderNotFound(String),
    /// The scene has no 3D camera set.
    #[error("scene has no camera")]
    NoCamera,
}

/// Executes the render passes for one scene per [`render`](Self::render)
/// call.
///
/// The renderer owns the shared resources the passes need (shader pool,
/// offscreen targets, the full-screen quad) but no scene state; scenes are
/// owned by the caller, typically inside a [`SceneRegistry`].
pub struct Renderer {
    config: RendererConfig,
    shaders: ShaderPool,
    targets: RenderTargetSet,
    quad: Rc<dyn Drawable>,
}

impl Renderer {
    /// Create a renderer from backend-built resources. `quad` must be a
    /// full-screen clip-space quad (see [`crate::meshes`]); the screen-space
    /// passes draw it with an identity MVP.
    pub fn new(
        config: RendererConfig,
        shaders: ShaderPool,
        targets: RenderTargetSet,
        quad: Rc<dyn Drawable>,
    ) -> Self {
        info!(
            width = config.viewport_width,
            height = config.viewport_height,
            "created renderer"
        );
        Self {
            config,
            shaders,
            targets,
            quad,
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn shaders(&self) -> &ShaderPool {
        &self.shaders
    }

    pub fn shaders_mut(&mut self) -> &mut ShaderPool {
        &mut self.shaders
    }

    /// Render one frame of `scene`.
    ///
    /// The graph is visited first to fill the scene's draw queues, entities
    /// are sorted nearest-first, then the scene's 3D pass sequence runs,
    /// then the sprite pass. On return the queues are drained — on the error
    /// paths too, so a retried frame never draws stale submissions — and a
    /// completed frame's entities are available from [`Scene::last_frame`].
    pub fn render(
        &self,
        scene: &mut Scene,
        graph: &mut dyn SceneGraph,
        device: &mut dyn RenderDevice,
    ) -> Result<(), RenderError> {
        graph.visit(scene);

        if scene.camera().is_none() {
            scene.discard_frame();
            return Err(RenderError::NoCamera);
        }

        scene.sort_entities();

        let result = match scene.render_type() {
            RenderType::Forward => self.render_forward(scene, device),
            RenderType::Deferred => self.render_deferred(scene, device),
        };
        if let Err(err) = result {
            scene.discard_frame();
            return Err(err);
        }

        passes::sprite_pass::render(scene, &self.config);
        scene.end_frame();

        Ok(())
    }

    /// Forward sequence: optional shadow pass, then one shaded draw per
    /// entity straight to the screen.
    fn render_forward(&self, scene: &Scene, device: &mut dyn RenderDevice) -> Result<(), RenderError> {
        if let Some(light) = scene.lights().first_spot_light() {
            passes::shadow_pass::render(
                scene,
                light,
                &self.shaders,
                self.targets.shadow_map.as_ref(),
                device,
                &self.config,
            )?;
        }

        passes::forward_pass::render(scene, self.targets.shadow_map.as_ref(), device, &self.config)
    }

    /// Deferred sequence: optional shadow pass, G-buffer fill, additive
    /// light accumulation into the lit buffer, bloom and composite.
    fn render_deferred(&self, scene: &Scene, device: &mut dyn RenderDevice) -> Result<(), RenderError> {
        if let Some(light) = scene.lights().first_spot_light() {
            passes::shadow_pass::render(
                scene,
                light,
                &self.shaders,
                self.targets.shadow_map.as_ref(),
                device,
                &self.config,
            )?;
        }

        passes::geometry_pass::render(
            scene,
            &self.shaders,
            self.targets.geometry.as_ref(),
            device,
            &self.config,
        )?;

        // Light contributions accumulate; the lit buffer is only correct
        // under additive blending.
        device.set_blend(BlendMode::Additive);
        self.targets.geometry.bind_for_reading(GBUFFER_COLOR_UNIT);
        self.targets.lit.bind_for_writing();

        passes::light_pass::render(
            scene,
            &self.shaders,
            self.targets.shadow_map.as_ref(),
            device,
            self.quad.as_ref(),
            &self.config,
        )?;

        device.set_blend(BlendMode::Disabled);

        passes::bloom_pass::render(
            scene,
            &self.shaders,
            &self.targets,
            device,
            self.quad.as_ref(),
            &self.config,
            self.config.blur_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use glam::{Mat4, Vec3};

    use super::testing::{self, GpuEvent, ListGraph, RecordingDevice};
    use super::*;
    use crate::camera::Camera;
    use crate::renderer::device::ClearMask;
    use crate::renderer::drawable::{RenderEntity, Sprite};
    use crate::renderer::lighting::{PointLight, SpotLight};
    use crate::renderer::shaders::names;

    fn test_renderer(log: &testing::EventLog) -> Renderer {
        Renderer::new(
            RendererConfig::default(),
            testing::shader_pool(log),
            testing::target_set(log),
            testing::quad(log),
        )
    }

    fn test_scene(render_type: RenderType) -> Scene {
        let mut scene = Scene::new(&RendererConfig::default());
        scene.set_camera(Camera::perspective(
            Vec3::new(0.0, 2.0, 5.0),
            Vec3::ZERO,
            Vec3::Y,
            f32::to_radians(45.0),
            0.1,
            100.0,
            1024,
            768,
        ));
        scene.set_render_type(render_type);
        scene
    }

    fn test_entity(log: &testing::EventLog, name: &str, distance: f32) -> RenderEntity {
        RenderEntity::new(
            testing::mesh(log, name),
            testing::shader(log, "standard"),
            Mat4::IDENTITY,
        )
        .with_distance(distance)
    }

    fn test_spot_light() -> SpotLight {
        SpotLight::new(
            Vec3::new(0.0, 5.0, 5.0),
            Vec3::new(0.0, -1.0, -1.0),
            Vec3::ONE,
            1.0,
            20.0,
            0.4,
        )
    }

    fn bind_count(events: &[GpuEvent], shader: &str) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GpuEvent::BindShader(name) if name == shader))
            .count()
    }

    fn draw_count(events: &[GpuEvent], mesh: &str) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GpuEvent::Draw(name) if name == mesh))
            .count()
    }

    fn position_of(events: &[GpuEvent], wanted: &GpuEvent) -> usize {
        events
            .iter()
            .position(|e| e == wanted)
            .unwrap_or_else(|| panic!("event {wanted:?} not found"))
    }

    #[test]
    fn scene_without_camera_is_an_error() {
        let log = testing::event_log();
        let renderer = test_renderer(&log);
        let mut scene = Scene::new(&RendererConfig::default());
        let mut graph = ListGraph::default();
        let mut device = RecordingDevice::new(&log);

        let result = renderer.render(&mut scene, &mut graph, &mut device);
        assert!(matches!(result, Err(RenderError::NoCamera)));
    }

    #[test]
    fn missing_shader_is_reported_by_name() {
        let log = testing::event_log();
        // Empty pool: the deferred light pass always needs the directional
        // program.
        let renderer = Renderer::new(
            RendererConfig::default(),
            ShaderPool::new(),
            testing::target_set(&log),
            testing::quad(&log),
        );
        let mut scene = test_scene(RenderType::Deferred);
        let mut graph = ListGraph::default();
        let mut device = RecordingDevice::new(&log);

        match renderer.render(&mut scene, &mut graph, &mut device) {
            Err(RenderError::ShaderNotFound(name)) => assert_eq!(names::DIR_LIGHT_PASS, name),
            other => panic!("expected ShaderNotFound, got {other:?}"),
        }
    }

    #[test]
    fn failed_render_still_drains_the_queues() {
        let log = testing::event_log();
        let renderer = Renderer::new(
            RendererConfig::default(),
            ShaderPool::new(),
            testing::target_set(&log),
            testing::quad(&log),
        );
        let mut scene = test_scene(RenderType::Deferred);
        let mut graph = ListGraph::default();
        graph.entities.push(test_entity(&log, "cube", 1.0));
        graph.sprites.push(Sprite::new(
            testing::mesh(&log, "hud"),
            testing::shader(&log, "sprite"),
            Mat4::IDENTITY,
        ));
        let mut device = RecordingDevice::new(&log);

        assert!(renderer.render(&mut scene, &mut graph, &mut device).is_err());
        assert!(scene.entities().is_empty());
        assert!(scene.sprites().is_empty());
        assert!(scene.last_frame().is_empty());

        // A retried frame re-visits the graph into clean queues, so the
        // entity draws once per attempt, not cumulatively.
        assert!(renderer.render(&mut scene, &mut graph, &mut device).is_err());
        assert_eq!(2, draw_count(&log.borrow(), "cube"));
    }

    #[test]
    fn missing_camera_still_drains_the_queues() {
        let log = testing::event_log();
        let renderer = test_renderer(&log);
        let mut scene = Scene::new(&RendererConfig::default());
        let mut graph = ListGraph::default();
        graph.entities.push(test_entity(&log, "cube", 1.0));
        let mut device = RecordingDevice::new(&log);

        assert!(matches!(
            renderer.render(&mut scene, &mut graph, &mut device),
            Err(RenderError::NoCamera)
        ));
        assert!(scene.entities().is_empty());
    }

    #[test]
    fn entities_draw_nearest_first() {
        let log = testing::event_log();
        let renderer = test_renderer(&log);
        let mut scene = test_scene(RenderType::Forward);
        let mut graph = ListGraph::default();
        graph.entities.push(test_entity(&log, "far", 50.0));
        graph.entities.push(test_entity(&log, "near", 1.0));
        graph.entities.push(test_entity(&log, "mid", 10.0));
        let mut device = RecordingDevice::new(&log);

        renderer.render(&mut scene, &mut graph, &mut device).unwrap();

        let events = log.borrow();
        let near = position_of(&events, &GpuEvent::Draw("near".into()));
        let mid = position_of(&events, &GpuEvent::Draw("mid".into()));
        let far = position_of(&events, &GpuEvent::Draw("far".into()));
        assert!(near < mid && mid < far);
    }

    #[test]
    fn forward_without_spot_light_touches_no_shadow_state() {
        let log = testing::event_log();
        let renderer = test_renderer(&log);
        let mut scene = test_scene(RenderType::Forward);
        scene
            .lights_mut()
            .add_point_light(PointLight::new(Vec3::X, Vec3::ONE, 1.0, 5.0));
        let mut graph = ListGraph::default();
        graph.entities.push(test_entity(&log, "cube", 1.0));
        let mut device = RecordingDevice::new(&log);

        renderer.render(&mut scene, &mut graph, &mut device).unwrap();

        let events = log.borrow();
        assert!(!events
            .iter()
            .any(|e| matches!(e, GpuEvent::BindForWriting(name) if name == "shadow_map")));
        assert!(!events
            .iter()
            .any(|e| matches!(e, GpuEvent::BindForReading(name, _) if name == "shadow_map")));
        assert_eq!(0, bind_count(&events, names::SHADOW));
    }

    #[test]
    fn forward_with_spot_light_renders_and_samples_shadow_map() {
        let log = testing::event_log();
        let renderer = test_renderer(&log);
        let mut scene = test_scene(RenderType::Forward);
        scene.lights_mut().add_spot_light(test_spot_light());
        let mut graph = ListGraph::default();
        graph.entities.push(test_entity(&log, "cube", 1.0));
        let mut device = RecordingDevice::new(&log);

        renderer.render(&mut scene, &mut graph, &mut device).unwrap();

        let events = log.borrow();
        let written = position_of(&events, &GpuEvent::BindForWriting("shadow_map".into()));
        let read = position_of(&events, &GpuEvent::BindForReading("shadow_map".into(), 1));
        assert!(written < read);
        assert!(events.contains(&GpuEvent::SetI32("g_shadow_map".into(), 1)));
        assert!(events.contains(&GpuEvent::SetMat4("g_light_vp_matrix".into())));
        // Shadow pass draw plus forward draw.
        assert_eq!(2, draw_count(&events, "cube"));
    }

    #[test]
    fn shadow_pass_skips_non_casters() {
        let log = testing::event_log();
        let renderer = test_renderer(&log);
        let mut scene = test_scene(RenderType::Forward);
        scene.lights_mut().add_spot_light(test_spot_light());
        let mut graph = ListGraph::default();
        graph.entities.push(test_entity(&log, "caster", 1.0));
        graph
            .entities
            .push(test_entity(&log, "ghost", 2.0).with_shadow_casting(false));
        let mut device = RecordingDevice::new(&log);

        renderer.render(&mut scene, &mut graph, &mut device).unwrap();

        let events = log.borrow();
        assert_eq!(2, draw_count(&events, "caster"));
        assert_eq!(1, draw_count(&events, "ghost"));
    }

    #[test]
    fn deferred_accumulates_one_quad_per_light() {
        let log = testing::event_log();
        let renderer = test_renderer(&log);
        let mut scene = test_scene(RenderType::Deferred);
        scene
            .lights_mut()
            .add_point_light(PointLight::new(Vec3::X, Vec3::ONE, 1.0, 5.0));
        scene
            .lights_mut()
            .add_point_light(PointLight::new(Vec3::Y, Vec3::ONE, 1.0, 5.0));
        scene.lights_mut().add_spot_light(test_spot_light());
        let mut graph = ListGraph::default();
        graph.entities.push(test_entity(&log, "cube", 1.0));
        let mut device = RecordingDevice::new(&log);

        renderer.render(&mut scene, &mut graph, &mut device).unwrap();

        let events = log.borrow();
        assert_eq!(2, bind_count(&events, names::POINT_LIGHT_PASS));
        assert_eq!(1, bind_count(&events, names::SPOT_LIGHT_PASS));
        assert_eq!(1, bind_count(&events, names::DIR_LIGHT_PASS));
        // 4 light quads (2 point + 1 spot + directional) + 4 bloom stages.
        assert_eq!(8, draw_count(&events, "quad"));
    }

    #[test]
    fn deferred_spot_lights_sample_shadow_map_on_free_unit() {
        let log = testing::event_log();
        let renderer = test_renderer(&log);
        let mut scene = test_scene(RenderType::Deferred);
        scene.lights_mut().add_spot_light(test_spot_light());
        let mut graph = ListGraph::default();
        graph.entities.push(test_entity(&log, "cube", 1.0));
        let mut device = RecordingDevice::new(&log);

        renderer.render(&mut scene, &mut graph, &mut device).unwrap();

        let events = log.borrow();
        assert!(events.contains(&GpuEvent::BindForReading("shadow_map".into(), 3)));
        assert!(events.contains(&GpuEvent::SetI32("g_shadow_map".into(), 3)));
        assert!(events.contains(&GpuEvent::SetMat4("g_light_vp_matrix".into())));
    }

    #[test]
    fn deferred_without_lights_still_runs_directional_pass_once() {
        let log = testing::event_log();
        let renderer = test_renderer(&log);
        let mut scene = test_scene(RenderType::Deferred);
        let mut graph = ListGraph::default();
        graph.entities.push(test_entity(&log, "cube", 1.0));
        let mut device = RecordingDevice::new(&log);

        renderer.render(&mut scene, &mut graph, &mut device).unwrap();

        let events = log.borrow();
        assert_eq!(0, bind_count(&events, names::POINT_LIGHT_PASS));
        assert_eq!(0, bind_count(&events, names::SPOT_LIGHT_PASS));
        assert_eq!(1, bind_count(&events, names::DIR_LIGHT_PASS));
        assert!(!events
            .iter()
            .any(|e| matches!(e, GpuEvent::BindForWriting(name) if name == "shadow_map")));
    }

    #[test]
    fn deferred_enables_additive_blend_between_geometry_and_lights() {
        let log = testing::event_log();
        let renderer = test_renderer(&log);
        let mut scene = test_scene(RenderType::Deferred);
        let mut graph = ListGraph::default();
        graph.entities.push(test_entity(&log, "cube", 1.0));
        let mut device = RecordingDevice::new(&log);

        renderer.render(&mut scene, &mut graph, &mut device).unwrap();

        let events = log.borrow();
        let geometry = position_of(&events, &GpuEvent::BindForWriting("geometry".into()));
        let additive = position_of(&events, &GpuEvent::SetBlend(BlendMode::Additive));
        let gbuffer_read = position_of(&events, &GpuEvent::BindForReading("geometry".into(), 0));
        let lit = position_of(&events, &GpuEvent::BindForWriting("lit".into()));
        let dir = position_of(&events, &GpuEvent::BindShader(names::DIR_LIGHT_PASS.into()));
        assert!(geometry < additive);
        assert!(additive < gbuffer_read && gbuffer_read < lit && lit < dir);
    }

    #[test]
    fn bloom_stages_run_in_order_and_composite_to_screen() {
        let log = testing::event_log();
        let renderer = test_renderer(&log);
        let mut scene = test_scene(RenderType::Deferred);
        let mut graph = ListGraph::default();
        graph.entities.push(test_entity(&log, "cube", 1.0));
        let mut device = RecordingDevice::new(&log);

        renderer.render(&mut scene, &mut graph, &mut device).unwrap();

        let events = log.borrow();
        let bright = position_of(&events, &GpuEvent::BindShader(names::PICK_BRIGHT.into()));
        let blur_h = position_of(&events, &GpuEvent::BindShader(names::GAUSSIAN_BLUR_H.into()));
        let blur_v = position_of(&events, &GpuEvent::BindShader(names::GAUSSIAN_BLUR_V.into()));
        let composite = position_of(
            &events,
            &GpuEvent::BindShader(names::DEFERRED_COMPOSITE.into()),
        );
        assert!(bright < blur_h && blur_h < blur_v && blur_v < composite);

        // The composite samples the lit buffer and the blurred bloom and
        // writes to the default target. The lit buffer is also read by the
        // bright-pass, so search after the last blur stage.
        let lit_read = blur_v
            + events[blur_v..]
                .iter()
                .position(|e| *e == GpuEvent::BindForReading("lit".into(), 0))
                .unwrap();
        let bloom_read = position_of(&events, &GpuEvent::BindForReading("bright".into(), 1));
        let screen = position_of(&events, &GpuEvent::BindDefaultTarget);
        assert!(blur_v < lit_read && lit_read < composite);
        assert!(bloom_read < composite && screen < composite);
        assert!(events.contains(&GpuEvent::SetI32("g_bloom_map".into(), 1)));

        // Every bloom stage clears its target first.
        let clears = events
            .iter()
            .skip(bright.saturating_sub(4))
            .filter(|e| matches!(e, GpuEvent::Clear(ClearMask::ColorAndDepth)))
            .count();
        assert!(clears >= 4);
    }

    #[test]
    fn render_type_selects_the_pass_sequence() {
        let log = testing::event_log();
        let renderer = test_renderer(&log);
        let mut graph = ListGraph::default();
        graph.entities.push(test_entity(&log, "cube", 1.0));
        let mut device = RecordingDevice::new(&log);

        let mut forward = test_scene(RenderType::Forward);
        renderer
            .render(&mut forward, &mut graph, &mut device)
            .unwrap();
        assert!(!log
            .borrow()
            .iter()
            .any(|e| matches!(e, GpuEvent::BindForWriting(name) if name == "geometry")));

        log.borrow_mut().clear();

        let mut deferred = test_scene(RenderType::Deferred);
        renderer
            .render(&mut deferred, &mut graph, &mut device)
            .unwrap();
        assert!(log
            .borrow()
            .iter()
            .any(|e| matches!(e, GpuEvent::BindForWriting(name) if name == "geometry")));
    }

    #[test]
    fn queues_drain_and_snapshot_after_render() {
        let log = testing::event_log();
        let renderer = test_renderer(&log);
        let mut scene = test_scene(RenderType::Forward);
        let mut graph = ListGraph::default();
        graph.entities.push(test_entity(&log, "a", 1.0));
        graph.entities.push(test_entity(&log, "b", 2.0));
        graph.sprites.push(Sprite::new(
            testing::mesh(&log, "hud"),
            testing::shader(&log, "sprite"),
            Mat4::IDENTITY,
        ));
        let mut device = RecordingDevice::new(&log);

        renderer.render(&mut scene, &mut graph, &mut device).unwrap();

        assert!(scene.entities().is_empty());
        assert!(scene.sprites().is_empty());
        assert_eq!(2, scene.last_frame().len());
    }

    #[test]
    fn sprites_draw_after_the_3d_passes() {
        let log = testing::event_log();
        let renderer = test_renderer(&log);
        let mut scene = test_scene(RenderType::Deferred);
        let mut graph = ListGraph::default();
        graph.entities.push(test_entity(&log, "cube", 1.0));
        graph.sprites.push(Sprite::new(
            testing::mesh(&log, "hud"),
            testing::shader(&log, "sprite"),
            Mat4::IDENTITY,
        ));
        let mut device = RecordingDevice::new(&log);

        renderer.render(&mut scene, &mut graph, &mut device).unwrap();

        let events = log.borrow();
        let composite = position_of(
            &events,
            &GpuEvent::BindShader(names::DEFERRED_COMPOSITE.into()),
        );
        let hud = position_of(&events, &GpuEvent::Draw("hud".into()));
        assert!(composite < hud);
    }

    #[test]
    fn callbacks_receive_the_pass_that_drew_them() {
        let log = testing::event_log();
        let renderer = test_renderer(&log);
        let mut scene = test_scene(RenderType::Deferred);

        let entity_passes = Rc::new(RefCell::new(Vec::new()));
        let sprite_passes = Rc::new(RefCell::new(Vec::new()));

        let mut graph = ListGraph::default();
        let sink = entity_passes.clone();
        graph.entities.push(
            test_entity(&log, "cube", 1.0)
                .with_callback(Rc::new(move |_, pass| sink.borrow_mut().push(pass))),
        );
        let sink = sprite_passes.clone();
        graph.sprites.push(
            Sprite::new(
                testing::mesh(&log, "hud"),
                testing::shader(&log, "sprite"),
                Mat4::IDENTITY,
            )
            .with_callback(Rc::new(move |_, pass| sink.borrow_mut().push(pass))),
        );
        let mut device = RecordingDevice::new(&log);

        renderer.render(&mut scene, &mut graph, &mut device).unwrap();

        assert_eq!(vec![passes::GEOMETRY_PASS], *entity_passes.borrow());
        assert_eq!(vec![passes::SPRITE_PASS], *sprite_passes.borrow());
    }
}
