use glam::{Mat4, Vec3};

use crate::camera::LookAtCamera;
use crate::core::clock::FrameInfo;
use crate::core::controller::{Controller, Velocities};
use crate::core::sweep::{terrain_transforms, TERRAIN_DRAWS};
use crate::core::trigger::{clamp_lateral, Trigger, TriggerSet};

const AVATAR_HEIGHT: f32 = 0.5;
const AVATAR_LEAD: f32 = 0.5;
const AVATAR_SCALE: f32 = 0.2;

/// Draws issued per frame: terrain, the avatar, three props
pub const DRAWS_PER_FRAME: usize = TERRAIN_DRAWS + 1 + 3;

/// Which loaded model a draw uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelSlot {
    Terrain,
    Avatar,
    Prop,
}

impl ModelSlot {
    pub const ALL: [ModelSlot; 3] = [ModelSlot::Terrain, ModelSlot::Avatar, ModelSlot::Prop];
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub slot: ModelSlot,
    pub transform: Mat4,
}

/// Owns the camera, the input-driven velocities, the trigger latches and the win flag
#[derive(Debug, Clone)]
pub struct Scene {
    camera: LookAtCamera,
    velocities: Velocities,
    triggers: TriggerSet,
    terrain: Vec<Mat4>,
    frame: u64,
}

impl Scene {
    pub fn new(camera: LookAtCamera) -> Self {
        Self {
            camera,
            velocities: Velocities::default(),
            triggers: TriggerSet::default(),
            terrain: terrain_transforms(),
            frame: 0,
        }
    }

    pub fn camera(&self) -> &LookAtCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut LookAtCamera {
        &mut self.camera
    }

    pub fn velocities(&self) -> Velocities {
        self.velocities
    }

    pub fn triggers(&self) -> &[Trigger; 3] {
        self.triggers.triggers()
    }

    pub fn has_won(&self) -> bool {
        self.triggers.has_won()
    }

    /// Pick up the latest velocities from the input side
    pub fn apply_input(&mut self, controller: &dyn Controller) {
        self.velocities = controller.velocities();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.compute_projection_matrix(width, height);
    }

    /// Move the camera: dolly, then truck, then pan
    pub fn advance(&mut self, delta: f32) {
        self.camera.dolly(self.velocities.dolly * delta);
        self.camera.truck(self.velocities.truck * delta);
        self.camera.pan(self.velocities.pan * delta);
    }

    /// One frame of simulation: camera motion, then the zone latches
    pub fn update(&mut self, frame: FrameInfo) {
        self.frame = frame.number;
        self.advance(frame.delta);
        self.triggers.step(self.camera.eye.z, self.frame);
    }

    /// Lateral coordinate the avatar and latched props are anchored to
    pub fn lateral_anchor(&self) -> f32 {
        clamp_lateral(self.camera.at.x)
    }

    pub fn avatar_transform(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(
            self.lateral_anchor(),
            AVATAR_HEIGHT,
            self.camera.eye.z - AVATAR_LEAD,
        )) * Mat4::from_rotation_x(270f32.to_radians())
            * Mat4::from_rotation_z(180f32.to_radians())
            * Mat4::from_scale(Vec3::splat(AVATAR_SCALE))
    }

    /// Draw commands for the current state, in submission order
    pub fn draw_list(&self) -> Vec<DrawCommand> {
        let mut draws = Vec::with_capacity(DRAWS_PER_FRAME);
        draws.extend(self.terrain.iter().map(|&transform| DrawCommand {
            slot: ModelSlot::Terrain,
            transform,
        }));
        draws.push(DrawCommand {
            slot: ModelSlot::Avatar,
            transform: self.avatar_transform(),
        });

        let lateral = self.lateral_anchor();
        let eye_z = self.camera.eye.z;
        draws.extend(self.triggers().iter().map(|trigger| DrawCommand {
            slot: ModelSlot::Prop,
            transform: trigger.prop_transform(lateral, eye_z),
        }));
        draws
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(LookAtCamera::default())
    }
}
