use glam::{Mat4, Vec3};
use thiserror::Error;

/// How a camera maps view space to clip space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    /// Perspective projection for the 3D scene camera.
    Perspective {
        /// The vertical field of view in radians.
        fov_y: f32,
        /// Fragments closer than `z_near` are not rendered.
        z_near: f32,
        /// Fragments further than `z_far` are not rendered.
        z_far: f32,
    },
    /// Orthographic projection, used by the UI/sprite camera.
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        z_near: f32,
        z_far: f32,
    },
}

/// Camera assumes a right-handed system with the +Z axis going _out_ of the
/// screen rather than in.
///
/// Positive rotations in a right handed system are counterclockwise around
/// the axis of rotation.
///
/// The following transforms points from local space to clip space:
///  `V_clip = M_projection * M_view * M_model * M_local`
pub struct Camera {
    /// The position of the camera in world space.
    eye: Vec3,
    /// The target position the camera should look at.
    target: Vec3,
    /// The camera's up direction.
    up: Vec3,
    /// A world space direction vector indicating which direction is considered
    /// straight up.
    world_up: Vec3,
    /// The ratio of the viewport width to its height.
    aspect: f32,
    projection: Projection,
    viewport_width: f32,
    viewport_height: f32,
}

impl Camera {
    /// Create a perspective camera centered at `eye` with the center of the
    /// view aiming at `target` and `up` as the camera's upward direction.
    ///
    /// The aspect ratio is set to zero if either the viewport width or height
    /// is zero.
    #[allow(clippy::too_many_arguments)]
    pub fn perspective(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y: f32,
        z_near: f32,
        z_far: f32,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Self {
        assert!(fov_y > 0.0);
        assert!(z_near >= 0.0);
        assert!(z_far > z_near);
        assert!(eye != target);

        Self::with_projection(
            eye,
            target,
            up,
            Projection::Perspective {
                fov_y,
                z_near,
                z_far,
            },
            viewport_width,
            viewport_height,
        )
    }

    /// Create an orthographic camera at the world origin looking down the -Z
    /// axis, mapping `[0, width] x [0, height]` to the viewport. This is the
    /// camera shape used by the 2D sprite pass.
    pub fn orthographic(width: u32, height: u32, z_near: f32, z_far: f32) -> Self {
        assert!(z_far > z_near);

        Self::with_projection(
            Vec3::ZERO,
            Vec3::NEG_Z,
            Vec3::Y,
            Projection::Orthographic {
                left: 0.0,
                right: width as f32,
                bottom: 0.0,
                top: height as f32,
                z_near,
                z_far,
            },
            width,
            height,
        )
    }

    fn with_projection(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        projection: Projection,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Self {
        let up = up.normalize();

        Self {
            eye,
            target,
            up,
            world_up: up,
            aspect: if viewport_width > 0 && viewport_height > 0 {
                viewport_width as f32 / viewport_height as f32
            } else {
                0.0
            },
            projection,
            viewport_width: viewport_width as f32,
            viewport_height: viewport_height as f32,
        }
    }

    /// Reorient the camera to be located at `eye` and look at `target`. Both
    /// points should be in world space.
    ///
    /// Calling `reorient` will rebuild the camera's local coordinate system
    /// using the Gram-Schmidt process.
    pub fn reorient(&mut self, new_eye: Vec3, new_target: Vec3) {
        self.eye = new_eye;
        self.target = new_target;

        // NOTE: This direction is technically the _opposite_ of the camera's
        // facing direction (it goes from target to eye rather than eye to
        // target) because by convention the camera points towards -Z.
        let new_direction = (self.eye - self.target).normalize();
        let new_right = Vec3::cross(self.world_up, new_direction).normalize();
        let new_up = Vec3::cross(new_direction, new_right);

        self.up = new_up;
    }

    /// Get the camera's view matrix.
    ///
    /// A view matrix transforms coordinates from world space to view space,
    /// with the viewer's eye located at (0, 0, 0) and looking down the -Z
    /// axis.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Get the camera's projection matrix, transforming coordinates from view
    /// space to clip space.
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective {
                fov_y,
                z_near,
                z_far,
            } => Mat4::perspective_rh(fov_y, self.aspect, z_near, z_far),
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
                z_near,
                z_far,
            } => Mat4::orthographic_rh(left, right, bottom, top, z_near, z_far),
        }
    }

    /// Get the camera's view projection matrix. The view projection matrix
    /// will transform points from world space to clip space.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Resize the camera's viewport.
    pub fn set_viewport_size(
        &mut self,
        new_width: u32,
        new_height: u32,
    ) -> Result<(), InvalidCameraSize> {
        if new_width > 0 && new_height > 0 {
            self.aspect = new_width as f32 / new_height as f32;
            self.viewport_width = new_width as f32;
            self.viewport_height = new_height as f32;
            Ok(())
        } else {
            Err(InvalidCameraSize(new_width, new_height))
        }
    }

    /// Get the position of the camera in world space.
    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Get the point at which the camera is focused on.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Get the camera's up axis.
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Get the camera's projection parameters.
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Get the camera viewport width in pixels.
    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    /// Get the camera viewport height in pixels.
    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Get the world up axis (not the camera's up axis).
    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }
}

#[derive(Debug, Error)]
#[error("camera viewport width and height must be larger than zero but width was {} and height was {}", .0, .1)]
pub struct InvalidCameraSize(u32, u32);
