//! Gate Runner - A side-scrolling gate-flying arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, game state)
//! - `highscores`: Session score and persisted best score
//! - `persistence`: Key-value store port with native/web backends
//! - `platform`: Viewport and input abstraction
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::{GameResult, ScoreTracker};
pub use persistence::{MemoryStore, PersistentStore, StoreError};
pub use tuning::Tuning;

/// Game configuration constants
///
/// Every size and speed is expressed at reference scale (a 400px wide
/// viewport) and multiplied by the session scale factor once at start.
pub mod consts {
    /// Viewport width the constants below are authored against
    pub const REFERENCE_WIDTH: f32 = 400.0;

    /// Flyer defaults
    pub const FLYER_WIDTH: f32 = 75.0;
    pub const FLYER_HEIGHT: f32 = 20.0;
    /// Added to vertical velocity every tick
    pub const FLYER_GRAVITY: f32 = 0.3;
    /// Velocity set on impulse (negative = upward)
    pub const FLYER_JUMP_IMPULSE: f32 = -6.0;
    /// Flyer x as a fraction of viewport width
    pub const FLYER_X_FRACTION: f32 = 0.25;

    /// Obstacle geometry
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const OBSTACLE_GAP: f32 = 165.0;
    pub const OBSTACLE_MIN_HEIGHT: f32 = 50.0;
    /// Space kept below the lowest possible gap
    pub const OBSTACLE_MIN_BOTTOM_MARGIN: f32 = 150.0;
    pub const GROUND_HEIGHT: f32 = 20.0;

    /// Horizontal obstacle speed (pixels per tick)
    pub const BASE_SPEED: f32 = 2.0;
    pub const SPEED_STEP: f32 = 0.2;
    pub const MAX_SPEED: f32 = 5.0;

    /// Spawn cadence (milliseconds, never scaled)
    pub const BASE_SPAWN_INTERVAL_MS: f64 = 1500.0;
    pub const SPAWN_INTERVAL_STEP_MS: f64 = 50.0;
    pub const MIN_SPAWN_INTERVAL_MS: f64 = 1000.0;

    /// Difficulty ramps every time the score reaches a multiple of this
    pub const RAMP_SCORE_STEP: u32 = 5;

    /// On resume the next spawn is scheduled this far ahead of now
    pub const RESUME_LOOKAHEAD_MS: f64 = 100.0;

    /// Tilt shown to the renderer, degrees per unit of velocity
    pub const TILT_PER_VELOCITY: f32 = 5.0;
    pub const MAX_TILT_DEG: f32 = 30.0;

    /// Background scrolls at this fraction of obstacle speed
    pub const BACKGROUND_PARALLAX: f32 = 0.5;
}

/// Wrap a scroll offset into `[0, period)`
#[inline]
pub fn wrap_offset(offset: f32, period: f32) -> f32 {
    if period <= 0.0 {
        return 0.0;
    }
    offset.rem_euclid(period)
}
