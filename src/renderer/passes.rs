//! The render passes, one module per pass.
//!
//! Pass ordering and the state handed between passes are owned by
//! [`super::Renderer`]; each module here only implements the body of its
//! pass against the collaborator traits.

pub(crate) mod bloom_pass;
pub(crate) mod forward_pass;
pub(crate) mod geometry_pass;
pub(crate) mod light_pass;
pub(crate) mod shadow_pass;
pub(crate) mod sprite_pass;

/// Pass index handed to post-draw callbacks by the forward pass.
pub const FORWARD_PASS: usize = 0;
/// Pass index handed to post-draw callbacks by the geometry pass.
pub const GEOMETRY_PASS: usize = 1;
/// Pass index handed to post-draw callbacks by the sprite pass.
pub const SPRITE_PASS: usize = 2;
