use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

pub const DEFAULT_FOV_DEGREES: f32 = 70.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 5.0;

/// Look-at camera driven by dolly/truck/pan motion
#[derive(Debug, Clone)]
pub struct LookAtCamera {
    pub eye: Vec3,
    pub at: Vec3,
    pub up: Vec3,
    view_matrix: Mat4,
    proj_matrix: Mat4,
    fov: f32,
    near: f32,
    far: f32,
}

impl LookAtCamera {
    pub fn new(eye: Vec3, at: Vec3, up: Vec3) -> Self {
        let mut camera = Self {
            eye,
            at,
            up,
            view_matrix: Mat4::IDENTITY,
            proj_matrix: Mat4::IDENTITY,
            fov: DEFAULT_FOV_DEGREES.to_radians(),
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        };
        camera.compute_view_matrix();
        camera
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self::new(
            Vec3::from_array(config.eye),
            Vec3::from_array(config.at),
            Vec3::from_array(config.up),
        );
        camera.fov = config.fov_degrees.to_radians();
        camera.near = config.near;
        camera.far = config.far;
        camera
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    pub fn proj_matrix(&self) -> Mat4 {
        self.proj_matrix
    }

    /// Recompute the projection for a new viewport size
    pub fn compute_projection_matrix(&mut self, width: u32, height: u32) {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        self.proj_matrix = Mat4::perspective_rh(self.fov, aspect, self.near, self.far);
    }

    pub fn compute_view_matrix(&mut self) {
        self.view_matrix = Mat4::look_at_rh(self.eye, self.at, self.up);
    }

    /// Unit vector from eye towards at
    pub fn forward(&self) -> Vec3 {
        (self.at - self.eye).normalize()
    }

    /// Move eye and at along the view direction
    pub fn dolly(&mut self, speed: f32) {
        let forward = self.forward();
        self.eye += forward * speed;
        self.at += forward * speed;
        self.compute_view_matrix();
    }

    /// Strafe eye and at sideways; positive speed moves right
    pub fn truck(&mut self, speed: f32) {
        let left = self.up.cross(self.forward());
        self.eye -= left * speed;
        self.at -= left * speed;
        self.compute_view_matrix();
    }

    /// Yaw the look target around the up axis through the eye
    pub fn pan(&mut self, speed: f32) {
        let transform = Mat4::from_translation(self.eye)
            * Mat4::from_axis_angle(self.up.normalize(), -speed)
            * Mat4::from_translation(-self.eye);
        self.at = transform.transform_point3(self.at);
        self.compute_view_matrix();
    }
}

impl Default for LookAtCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}
