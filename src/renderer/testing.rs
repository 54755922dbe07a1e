//! Recording fakes for the collaborator traits.
//!
//! Every fake appends to a shared event log, so tests can assert the exact
//! sequence of shader binds, uniform writes, target binds, state changes
//! and draws a pass produced without any GPU behind it.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec2, Vec3};

use super::device::{BlendMode, ClearMask, RenderDevice};
use super::drawable::{Drawable, RenderEntity, Sprite};
use super::scene::{Scene, SceneGraph};
use super::shaders::{names, ShaderPool, ShaderProgram};
use super::targets::{RenderTarget, RenderTargetSet};

/// One observable GPU-facing action.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum GpuEvent {
    BindShader(String),
    SetI32(String, i32),
    SetF32(String, f32),
    SetVec2(String, Vec2),
    SetVec3(String, Vec3),
    SetMat4(String),
    BindForWriting(String),
    BindForReading(String, u32),
    SetDepthWrite(bool),
    SetDepthTest(bool),
    SetBlend(BlendMode),
    Clear(ClearMask),
    BindDefaultTarget,
    Draw(String),
}

pub(crate) type EventLog = Rc<RefCell<Vec<GpuEvent>>>;

pub(crate) fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub(crate) struct RecordingShader {
    name: String,
    log: EventLog,
}

impl ShaderProgram for RecordingShader {
    fn bind(&self) {
        self.log
            .borrow_mut()
            .push(GpuEvent::BindShader(self.name.clone()));
    }

    fn set_i32(&self, name: &str, value: i32) {
        self.log
            .borrow_mut()
            .push(GpuEvent::SetI32(name.to_owned(), value));
    }

    fn set_f32(&self, name: &str, value: f32) {
        self.log
            .borrow_mut()
            .push(GpuEvent::SetF32(name.to_owned(), value));
    }

    fn set_vec2(&self, name: &str, value: Vec2) {
        self.log
            .borrow_mut()
            .push(GpuEvent::SetVec2(name.to_owned(), value));
    }

    fn set_vec3(&self, name: &str, value: Vec3) {
        self.log
            .borrow_mut()
            .push(GpuEvent::SetVec3(name.to_owned(), value));
    }

    fn set_mat4(&self, name: &str, _value: &Mat4) {
        self.log.borrow_mut().push(GpuEvent::SetMat4(name.to_owned()));
    }
}

/// A shader fake registered under `name`.
pub(crate) fn shader(log: &EventLog, name: &str) -> Rc<dyn ShaderProgram> {
    Rc::new(RecordingShader {
        name: name.to_owned(),
        log: log.clone(),
    })
}

pub(crate) struct RecordingTarget {
    name: String,
    log: EventLog,
}

impl RenderTarget for RecordingTarget {
    fn bind_for_writing(&self) {
        self.log
            .borrow_mut()
            .push(GpuEvent::BindForWriting(self.name.clone()));
    }

    fn bind_for_reading(&self, texture_unit: u32) {
        self.log
            .borrow_mut()
            .push(GpuEvent::BindForReading(self.name.clone(), texture_unit));
    }
}

fn target(log: &EventLog, name: &str) -> Box<dyn RenderTarget> {
    Box::new(RecordingTarget {
        name: name.to_owned(),
        log: log.clone(),
    })
}

/// A full target set with the canonical names "shadow_map", "geometry",
/// "lit", "bright" and "blur".
pub(crate) fn target_set(log: &EventLog) -> RenderTargetSet {
    RenderTargetSet {
        shadow_map: target(log, "shadow_map"),
        geometry: target(log, "geometry"),
        lit: target(log, "lit"),
        bright: target(log, "bright"),
        blur: target(log, "blur"),
    }
}

pub(crate) struct RecordingMesh {
    name: String,
    log: EventLog,
}

impl Drawable for RecordingMesh {
    fn draw(&self) {
        self.log.borrow_mut().push(GpuEvent::Draw(self.name.clone()));
    }
}

pub(crate) fn mesh(log: &EventLog, name: &str) -> Rc<dyn Drawable> {
    Rc::new(RecordingMesh {
        name: name.to_owned(),
        log: log.clone(),
    })
}

/// The shared full-screen quad, drawing as "quad".
pub(crate) fn quad(log: &EventLog) -> Rc<dyn Drawable> {
    mesh(log, "quad")
}

pub(crate) struct RecordingDevice {
    log: EventLog,
}

impl RecordingDevice {
    pub(crate) fn new(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}

impl RenderDevice for RecordingDevice {
    fn set_depth_write(&mut self, enabled: bool) {
        self.log.borrow_mut().push(GpuEvent::SetDepthWrite(enabled));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.log.borrow_mut().push(GpuEvent::SetDepthTest(enabled));
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.log.borrow_mut().push(GpuEvent::SetBlend(mode));
    }

    fn clear(&mut self, mask: ClearMask) {
        self.log.borrow_mut().push(GpuEvent::Clear(mask));
    }

    fn bind_default_target(&mut self) {
        self.log.borrow_mut().push(GpuEvent::BindDefaultTarget);
    }
}

/// A pool with a recording program under every canonical shader name.
pub(crate) fn shader_pool(log: &EventLog) -> ShaderPool {
    let mut pool = ShaderPool::new();
    for name in [
        names::SHADOW,
        names::DIR_LIGHT_PASS,
        names::POINT_LIGHT_PASS,
        names::SPOT_LIGHT_PASS,
        names::PICK_BRIGHT,
        names::GAUSSIAN_BLUR_H,
        names::GAUSSIAN_BLUR_V,
        names::DEFERRED_COMPOSITE,
        names::SKY_BOX_DEFERRED,
    ] {
        pool.insert(name, shader(log, name));
    }
    pool
}

/// Scene graph fake that submits a fixed list of entities and sprites on
/// every visit.
#[derive(Default)]
pub(crate) struct ListGraph {
    pub(crate) entities: Vec<RenderEntity>,
    pub(crate) sprites: Vec<Sprite>,
}

impl SceneGraph for ListGraph {
    fn visit(&mut self, scene: &mut Scene) {
        for entity in &self.entities {
            scene.submit_entity(entity.clone());
        }
        for sprite in &self.sprites {
            scene.submit_sprite(sprite.clone());
        }
    }
}
