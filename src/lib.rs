//! A pass-orchestrated 3D scene renderer.
//!
//! `prism` owns the scene-level state of a real-time renderer (lights,
//! cameras, per-frame draw queues) and the ordering and data flow of the
//! render passes that consume it: shadow mapping, a deferred G-buffer path
//! with per-light accumulation and bloom, and an alternative single-pass
//! forward path.
//!
//! The crate deliberately does *not* talk to a GPU API. Shader programs,
//! render targets, fixed-function state and mesh draws are reached through
//! the traits in [`renderer::shaders`], [`renderer::targets`],
//! [`renderer::device`] and [`renderer::drawable`]; a backend implements
//! those seams and hands them to [`renderer::Renderer`].

pub mod camera;
pub mod logging;
pub mod meshes;
pub mod renderer;
