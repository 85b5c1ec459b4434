use glam::{Mat4, Vec3};
use log::info;

/// Offset from the camera eye to the point tested against each zone
pub const PROBE_OFFSET: f32 = 0.5;
pub const LATERAL_MIN: f32 = -0.5;
pub const LATERAL_MAX: f32 = 0.4;

const PROP_HEIGHT: f32 = 0.1;
const PROP_FOLLOW_OFFSET: f32 = 0.7;
const PROP_SCALE: f32 = 0.1;

/// Fixed z-band that latches a prop once the probe enters it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerZone {
    pub lower: f32,
    pub upper: f32,
    pub lateral_offset: f32,
}

impl TriggerZone {
    pub const fn new(lower: f32, upper: f32, lateral_offset: f32) -> Self {
        Self {
            lower,
            upper,
            lateral_offset,
        }
    }

    /// Open interval test on both ends
    pub fn contains(&self, probe: f32) -> bool {
        probe > self.lower && probe < self.upper
    }
}

pub const TRIGGER_ZONES: [TriggerZone; 3] = [
    TriggerZone::new(-3.0, -2.5, 0.3),
    TriggerZone::new(-4.0, -3.5, 0.2),
    TriggerZone::new(-5.0, -4.5, 0.1),
];

/// Clamp the camera's lateral coordinate into the band used to place props
pub fn clamp_lateral(x: f32) -> f32 {
    x.clamp(LATERAL_MIN, LATERAL_MAX)
}

/// One zone's latch: the counter never goes back to zero once it leaves it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trigger {
    pub zone: TriggerZone,
    count: u64,
}

impl Trigger {
    pub fn new(zone: TriggerZone) -> Self {
        Self { zone, count: 0 }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_latched(&self) -> bool {
        self.count > 0
    }

    /// Advance one frame; returns true on the frame the latch first closes
    pub fn step(&mut self, probe: f32) -> bool {
        if self.zone.contains(probe) || self.is_latched() {
            let first = self.count == 0;
            self.count = self.count.saturating_add(1);
            first
        } else {
            false
        }
    }

    /// Prop pose: following the camera when latched, parked at the zone otherwise
    pub fn prop_transform(&self, lateral: f32, eye_z: f32) -> Mat4 {
        let pose = if self.is_latched() {
            Mat4::from_translation(Vec3::new(
                lateral + self.zone.lateral_offset,
                PROP_HEIGHT,
                eye_z - PROP_FOLLOW_OFFSET,
            )) * Mat4::from_rotation_x(270f32.to_radians())
                * Mat4::from_rotation_z(180f32.to_radians())
        } else {
            Mat4::from_translation(Vec3::new(0.0, PROP_HEIGHT, self.zone.lower))
                * Mat4::from_rotation_x(270f32.to_radians())
        };
        pose * Mat4::from_scale(Vec3::splat(PROP_SCALE))
    }
}

/// The three zone latches plus the win latch they feed
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerSet {
    triggers: [Trigger; 3],
    won: bool,
}

impl TriggerSet {
    pub fn new(zones: [TriggerZone; 3]) -> Self {
        Self {
            triggers: zones.map(Trigger::new),
            won: false,
        }
    }

    pub fn triggers(&self) -> &[Trigger; 3] {
        &self.triggers
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    /// Step every zone with the probe for this eye position, then re-check the win latch
    pub fn step(&mut self, eye_z: f32, frame: u64) {
        let probe = eye_z - PROBE_OFFSET;
        for (index, trigger) in self.triggers.iter_mut().enumerate() {
            if trigger.step(probe) {
                info!("Zone {} latched at frame {} (probe z = {:.3})", index + 1, frame, probe);
            }
        }

        if !self.won && self.triggers.iter().all(Trigger::is_latched) {
            self.won = true;
            info!("All zones latched at frame {}: win", frame);
        }
    }
}

impl Default for TriggerSet {
    fn default() -> Self {
        Self::new(TRIGGER_ZONES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_bounds_are_exclusive() {
        let zone = TRIGGER_ZONES[0];
        assert!(!zone.contains(-3.0));
        assert!(!zone.contains(-2.5));
        assert!(zone.contains(-2.75));
    }

    #[test]
    fn test_zones_are_half_unit_wide_one_unit_apart() {
        for pair in TRIGGER_ZONES.windows(2) {
            assert_eq!(pair[0].lower - pair[1].lower, 1.0);
        }
        for zone in TRIGGER_ZONES {
            assert_eq!(zone.upper - zone.lower, 0.5);
        }
    }

    #[test]
    fn test_clamp_lateral() {
        assert_eq!(clamp_lateral(-1.0), -0.5);
        assert_eq!(clamp_lateral(0.9), 0.4);
        assert_eq!(clamp_lateral(0.1), 0.1);
    }

    #[test]
    fn test_trigger_does_not_count_outside_band() {
        let mut trigger = Trigger::new(TRIGGER_ZONES[1]);
        assert!(!trigger.step(0.0));
        assert!(!trigger.step(-3.5));
        assert_eq!(trigger.count(), 0);
    }

    #[test]
    fn test_step_reports_first_latch_only() {
        let mut trigger = Trigger::new(TRIGGER_ZONES[0]);
        assert!(trigger.step(-2.75));
        assert!(!trigger.step(-2.75));
        assert_eq!(trigger.count(), 2);
    }

    #[test]
    fn test_rest_pose_encodes_lower_bound() {
        let trigger = Trigger::new(TRIGGER_ZONES[2]);
        let origin = trigger.prop_transform(0.3, 1.0).transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 0.1, -5.0)).length() < 1e-6);
    }

    #[test]
    fn test_latched_pose_follows_camera() {
        let mut trigger = Trigger::new(TRIGGER_ZONES[0]);
        trigger.step(-2.75);
        let origin = trigger.prop_transform(-0.2, -2.25).transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.1, 0.1, -2.95)).length() < 1e-6);
    }
}
