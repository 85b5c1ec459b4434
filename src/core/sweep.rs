use glam::{Mat4, Vec3};

/// Sweep coordinates run 0.0..=10.0 in 0.5 steps
pub const SWEEP_STEPS: usize = 21;
pub const SWEEP_STEP: f32 = 0.5;
pub const SWEEP_POSES: usize = SWEEP_STEPS * SWEEP_STEPS;

/// Terrain draws per frame: base tile, the sweep, and the trailing tile
pub const TERRAIN_DRAWS: usize = SWEEP_POSES + 2;

const BASE_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 1.0);
const TAIL_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 1.5);

/// One compounding step: translate, quarter turn about Y, unit scale
fn accumulate(model: Mat4, offset: Vec3) -> Mat4 {
    model
        * Mat4::from_translation(offset)
        * Mat4::from_rotation_y(90f32.to_radians())
        * Mat4::from_scale(Vec3::ONE)
}

/// Transform of the first terrain tile
pub fn base_transform() -> Mat4 {
    accumulate(Mat4::IDENTITY, BASE_OFFSET)
}

/// The sweep never resets the running matrix between cells, so the tiles
/// land on a spiral staircase rather than a regular grid.
pub fn sweep_poses(start: Mat4) -> Vec<Mat4> {
    let mut model = start;
    let mut poses = Vec::with_capacity(SWEEP_POSES);
    for i in 0..SWEEP_STEPS {
        for j in 0..SWEEP_STEPS {
            let offset = Vec3::new(i as f32 * SWEEP_STEP, 0.0, j as f32 * SWEEP_STEP);
            model = accumulate(model, offset);
            poses.push(model);
        }
    }
    poses
}

/// Every terrain transform for one frame, in draw order
pub fn terrain_transforms() -> Vec<Mat4> {
    let base = base_transform();
    let mut transforms = Vec::with_capacity(TERRAIN_DRAWS);
    transforms.push(base);
    transforms.extend(sweep_poses(base));
    let last = *transforms.last().unwrap_or(&base);
    transforms.push(accumulate(last, TAIL_OFFSET));
    transforms
}
