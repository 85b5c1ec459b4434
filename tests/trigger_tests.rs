use meadow::core::clock::FrameInfo;
use meadow::core::controller::{Controller, Velocities};
use meadow::core::trigger::{TriggerSet, TRIGGER_ZONES};
use meadow::Scene;

/// Eye z that puts the probe in the middle of each zone
const ZONE_EYES: [f32; 3] = [-2.25, -3.25, -4.25];
/// Eye z with the probe outside every zone
const CLEAR_EYE: f32 = 1.0;

#[cfg(test)]
mod trigger_tests {
    use super::*;

    fn counts(set: &TriggerSet) -> [u64; 3] {
        set.triggers().map(|t| t.count())
    }

    fn visit(order: &[usize]) -> TriggerSet {
        let mut set = TriggerSet::default();
        for (frame, &zone) in order.iter().enumerate() {
            assert!(!set.has_won(), "won before visiting zone {}", zone + 1);
            set.step(ZONE_EYES[zone], frame as u64);
            set.step(CLEAR_EYE, frame as u64);
        }
        set
    }

    #[test]
    fn test_latch_keeps_counting_outside_the_band() {
        let mut set = TriggerSet::default();
        set.step(ZONE_EYES[0], 0);
        assert_eq!(counts(&set), [1, 0, 0]);

        for frame in 1..=5 {
            set.step(CLEAR_EYE, frame);
        }
        assert_eq!(counts(&set), [6, 0, 0]);
        assert!(!set.has_won());
    }

    #[test]
    fn test_band_edges_are_exclusive() {
        let mut set = TriggerSet::default();
        // Probe exactly on a zone boundary
        set.step(TRIGGER_ZONES[0].upper + 0.5, 0);
        set.step(TRIGGER_ZONES[0].lower + 0.5, 1);
        assert_eq!(counts(&set), [0, 0, 0]);
    }

    #[test]
    fn test_win_in_forward_order() {
        let set = visit(&[0, 1, 2]);
        assert!(set.has_won());
    }

    #[test]
    fn test_win_in_reverse_order() {
        let set = visit(&[2, 1, 0]);
        assert!(set.has_won());
        // Zone 3 latched first and has counted every frame since
        let [first, second, third] = counts(&set);
        assert!(third > second && second > first);
    }

    #[test]
    fn test_win_interleaved_with_revisits() {
        let set = visit(&[1, 1, 2, 1, 0]);
        assert!(set.has_won());
    }

    #[test]
    fn test_win_never_resets() {
        let mut set = visit(&[0, 1, 2]);
        for frame in 10..100 {
            set.step(CLEAR_EYE + frame as f32, frame);
            assert!(set.has_won());
        }
    }

    struct Forward;

    impl Controller for Forward {
        fn velocities(&self) -> Velocities {
            Velocities::new(1.0, 0.0, 0.0)
        }
    }

    #[test]
    fn test_flying_forward_wins_after_the_third_band() {
        let mut scene = Scene::default();
        scene.apply_input(&Forward);

        let mut frame = 0;
        while scene.camera().eye.z > -4.4 {
            let before = scene.triggers().map(|t| t.is_latched());
            scene.update(FrameInfo { number: frame, delta: 0.1 });
            frame += 1;

            if !before[2] && scene.triggers()[2].is_latched() {
                assert!(scene.has_won());
            } else if !scene.triggers()[2].is_latched() {
                assert!(!scene.has_won());
            }
        }

        assert!(scene.has_won());
        assert!(scene.triggers().iter().all(|t| t.count() > 0));
    }
}
