//! The player-controlled flyer

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::scale::Viewport;
use crate::consts::{MAX_TILT_DEG, TILT_PER_VELOCITY};
use crate::tuning::ScaledTuning;

/// The flyer entity
///
/// `pos` is the top-left corner. Size, gravity and impulse are fixed once the
/// session starts; only `pos.y` and `velocity` change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flyer {
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (pixels per tick, positive = down)
    pub velocity: f32,
    gravity: f32,
    jump_impulse: f32,
}

impl Flyer {
    /// Spawn at a quarter of the viewport width, vertically centered
    pub fn new(viewport: Viewport, tuning: &ScaledTuning) -> Self {
        Self {
            pos: Vec2::new(
                viewport.width * tuning.flyer_x_fraction,
                viewport.height / 2.0,
            ),
            size: Vec2::new(tuning.flyer_width, tuning.flyer_height),
            velocity: 0.0,
            gravity: tuning.gravity,
            jump_impulse: tuning.jump_impulse,
        }
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn jump_impulse(&self) -> f32 {
        self.jump_impulse
    }

    /// Per-tick gravity (not scaled by elapsed time)
    pub fn apply_gravity(&mut self) {
        self.velocity += self.gravity;
    }

    /// Set, not add, the upward impulse
    pub fn apply_impulse(&mut self) {
        self.velocity = self.jump_impulse;
    }

    pub fn integrate(&mut self) {
        self.pos.y += self.velocity;
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    /// Nose tilt for the renderer, degrees clamped to ±30
    pub fn rotation_deg(&self) -> f32 {
        (self.velocity * TILT_PER_VELOCITY).clamp(-MAX_TILT_DEG, MAX_TILT_DEG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn flyer() -> Flyer {
        Flyer::new(Viewport::new(400.0, 600.0), &Tuning::default().scaled(1.0))
    }

    #[test]
    fn test_spawn_pose() {
        let f = flyer();
        assert_eq!(f.pos, Vec2::new(100.0, 300.0));
        assert_eq!(f.size, Vec2::new(75.0, 20.0));
        assert_eq!(f.velocity, 0.0);
    }

    #[test]
    fn test_gravity_accumulates_per_tick() {
        let mut f = flyer();
        f.apply_gravity();
        f.integrate();
        f.apply_gravity();
        f.integrate();
        assert!((f.velocity - 0.6).abs() < 1e-6);
        assert!((f.pos.y - 300.9).abs() < 1e-4);
    }

    #[test]
    fn test_impulse_sets_velocity() {
        let mut f = flyer();
        f.velocity = 4.0;
        f.apply_impulse();
        assert_eq!(f.velocity, -6.0);
        // Repeated impulses don't stack
        f.apply_impulse();
        assert_eq!(f.velocity, -6.0);
    }

    #[test]
    fn test_rotation_is_clamped() {
        let mut f = flyer();
        f.velocity = -6.0;
        assert_eq!(f.rotation_deg(), -30.0);
        f.velocity = 2.0;
        assert_eq!(f.rotation_deg(), 10.0);
        f.velocity = 100.0;
        assert_eq!(f.rotation_deg(), 30.0);
    }
}
