//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Per-tick deltas only (speed is coupled to the caller's frame rate)
//! - Timestamps are passed in, never read from a clock
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod flyer;
pub mod obstacles;
pub mod scale;
pub mod state;
pub mod tick;

pub use collision::{Crash, adjudicate, check_ceiling, check_ground, check_obstacles};
pub use flyer::Flyer;
pub use obstacles::{Obstacle, ObstaclePair, ObstacleSide, ObstacleStream};
pub use scale::{Viewport, derive_scale};
pub use state::{FlyerPose, GamePhase, Session, Snapshot};
pub use tick::Game;
