// Perspective camera with look-at view state, used for cursor unprojection

use glam::{Mat4, Vec3};

pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(
        position: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov_y,
            aspect,
            near,
            far,
        }
    }

    /// Camera matching the demo scene: 75 degree fov, z = 50, looking at the origin
    pub fn demo_default(aspect: f32) -> Self {
        Self::new(
            Vec3::new(0.0, 0.0, 50.0),
            Vec3::ZERO,
            Vec3::Y,
            75f32.to_radians(),
            aspect,
            0.1,
            1000.0,
        )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn proj_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj_matrix(&self) -> Mat4 {
        self.proj_matrix() * self.view_matrix()
    }

    /// Unit view direction from the camera position toward the target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }
}
