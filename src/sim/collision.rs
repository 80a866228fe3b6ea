//! Collision detection between the flyer, the world bounds and the gates
//!
//! All checks are axis-aligned. Ground and obstacle hits are terminal; the
//! ceiling only stops the flyer.

use super::flyer::Flyer;
use super::obstacles::{Obstacle, ObstaclePair};

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crash {
    Ground,
    Obstacle { pair_id: u32 },
}

/// Bottom edge at or below the ground line
pub fn check_ground(flyer: &Flyer, ground_y: f32) -> bool {
    flyer.bottom() >= ground_y
}

/// Clamp the flyer under the ceiling. Returns true if it was touching.
pub fn check_ceiling(flyer: &mut Flyer) -> bool {
    if flyer.top() < 0.0 {
        flyer.pos.y = 0.0;
        flyer.velocity = 0.0;
        return true;
    }
    false
}

/// Horizontal spans overlap (touching edges don't count)
#[inline]
fn overlaps_horizontally(flyer: &Flyer, obstacle: &Obstacle, obstacle_width: f32) -> bool {
    flyer.right() > obstacle.x && flyer.left() < obstacle.x + obstacle_width
}

/// Flyer overlaps a single obstacle
pub fn hits_obstacle(flyer: &Flyer, obstacle: &Obstacle, obstacle_width: f32) -> bool {
    if !overlaps_horizontally(flyer, obstacle, obstacle_width) {
        return false;
    }
    if obstacle.is_top() {
        flyer.top() < obstacle.height
    } else {
        flyer.bottom() > obstacle.y
    }
}

/// First pair the flyer is touching, if any
pub fn check_obstacles(
    flyer: &Flyer,
    pairs: &[ObstaclePair],
    obstacle_width: f32,
) -> Option<u32> {
    pairs
        .iter()
        .find(|pair| {
            pair.members()
                .iter()
                .any(|o| hits_obstacle(flyer, o, obstacle_width))
        })
        .map(|pair| pair.id)
}

/// End-of-tick adjudication: ceiling clamp, then terminal checks
///
/// The ceiling clamp is applied even when the tick turns out to be terminal.
pub fn adjudicate(
    flyer: &mut Flyer,
    pairs: &[ObstaclePair],
    obstacle_width: f32,
    ground_y: f32,
) -> Option<Crash> {
    let grounded = check_ground(flyer, ground_y);
    check_ceiling(flyer);
    if grounded {
        return Some(Crash::Ground);
    }
    check_obstacles(flyer, pairs, obstacle_width).map(|pair_id| Crash::Obstacle { pair_id })
}
