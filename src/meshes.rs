//! Canonical geometry for the screen-space passes.
//!
//! The renderer never creates GPU buffers itself. Backends upload this quad
//! once and hand the resulting mesh to [`crate::renderer::Renderer::new`] as
//! the shared full-screen quad drawn by the lighting and bloom passes.

/// A lightweight vertex used for drawing full screen quads.
///
/// A quad vertex only has a position and a single set of texture coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

/// Vertices for a full screen quad in CCW order, spanning clip space so the
/// quad can be drawn with an identity MVP matrix.
pub const QUAD_VERTS: &[QuadVertex] = &[
    QuadVertex {
        position: [-1.0, -1.0, 0.0],
        tex_coords: [0.0, 0.0],
    },
    QuadVertex {
        position: [1.0, -1.0, 0.0],
        tex_coords: [1.0, 0.0],
    },
    QuadVertex {
        position: [1.0, 1.0, 0.0],
        tex_coords: [1.0, 1.0],
    },
    QuadVertex {
        position: [-1.0, 1.0, 0.0],
        tex_coords: [0.0, 1.0],
    },
];

/// Indices for a full screen quad in CCW order.
pub const QUAD_INDICES: &[u16] = &[0, 1, 2, 0, 2, 3];
