//! Blend parameter math mapping movement intent to animation values.
use bevy::prelude::*;
use rand::Rng;

/// Dimensionality of a monster's locomotion blend tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    OneD,
    TwoD,
}

/// One frame of blend output.
///
/// `scalar` is the value compared against the run threshold: the raw blend
/// value in 1-D mode, the Euclidean norm of the axes in 2-D mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendSample {
    pub primary: f32,
    pub axes: Option<Vec2>,
    pub scalar: f32,
}

/// Computes the blend output for a frame of movement.
///
/// `direction` is the planar vector toward the target (unnormalized);
/// `active` is whether the monster actually moved this frame.
pub fn sample(mode: BlendMode, move_speed: f32, direction: Vec2, active: bool) -> BlendSample {
    match mode {
        BlendMode::OneD => {
            let value = if active { move_speed } else { 0.0 };
            BlendSample {
                primary: value,
                axes: None,
                scalar: value,
            }
        }
        BlendMode::TwoD => {
            let normalized = if active {
                direction.normalize_or_zero()
            } else {
                Vec2::ZERO
            };
            BlendSample {
                primary: 0.0,
                axes: Some(normalized),
                scalar: normalized.length(),
            }
        }
    }
}

/// Derives the running flag from a blend scalar.
pub fn is_running(scalar: f32, run_threshold: f32) -> bool {
    scalar >= run_threshold
}

/// Uniformly selects an integer blend-tree state in `[0, count)`.
/// Returns None when the tree has no states.
pub fn random_state_index(count: u32, rng: &mut impl Rng) -> Option<i32> {
    if count == 0 {
        return None;
    }
    Some(rng.gen_range(0..count) as i32)
}

/// Uniformly selects a float blend value scaled into `[0, count - 1]`.
/// Returns None when the tree has no states.
pub fn random_state_value(count: u32, rng: &mut impl Rng) -> Option<f32> {
    if count == 0 {
        return None;
    }
    Some(rng.gen_range(0.0..=(count - 1) as f32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn one_d_blend_tracks_move_speed() {
        let moving = sample(BlendMode::OneD, 2.5, Vec2::new(1.0, 0.0), true);
        assert_eq!(moving.primary, 2.5);
        assert_eq!(moving.scalar, 2.5);
        assert!(moving.axes.is_none());

        let idle = sample(BlendMode::OneD, 2.5, Vec2::ZERO, false);
        assert_eq!(idle.primary, 0.0);
        assert_eq!(idle.scalar, 0.0);
    }

    #[test]
    fn two_d_blend_normalizes_direction() {
        let moving = sample(BlendMode::TwoD, 2.0, Vec2::new(3.0, 4.0), true);
        let axes = moving.axes.expect("2-D sample carries axes");
        assert!((axes.x - 0.6).abs() < 1e-6);
        assert!((axes.y - 0.8).abs() < 1e-6);
        assert!((moving.scalar - 1.0).abs() < 1e-6);
    }

    #[test]
    fn two_d_unit_direction_reaches_run_threshold() {
        // Direction (1, 0) at any speed yields magnitude 1.0, enough to
        // cross a run threshold of 1.0.
        let moving = sample(BlendMode::TwoD, 2.0, Vec2::new(1.0, 0.0), true);
        assert!(moving.scalar >= 1.0);
    }

    #[test]
    fn two_d_idle_is_zero_magnitude() {
        let idle = sample(BlendMode::TwoD, 2.0, Vec2::new(1.0, 0.0), false);
        assert_eq!(idle.axes, Some(Vec2::ZERO));
        assert_eq!(idle.scalar, 0.0);
    }

    #[test]
    fn running_flag_compares_against_threshold() {
        assert!(is_running(2.0, 2.0));
        assert!(is_running(2.5, 2.0));
        assert!(!is_running(1.99, 2.0));
    }

    #[test]
    fn random_state_index_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let index = random_state_index(4, &mut rng).expect("non-empty tree");
            assert!((0..4).contains(&index));
        }
        assert_eq!(random_state_index(0, &mut rng), None);
    }

    #[test]
    fn random_state_value_stays_in_scaled_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let value = random_state_value(4, &mut rng).expect("non-empty tree");
            assert!((0.0..=3.0).contains(&value));
        }
        assert_eq!(random_state_value(0, &mut rng), None);
    }
}
