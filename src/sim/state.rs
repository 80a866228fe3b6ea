//! Session state and render snapshots
//!
//! A `Session` is everything that lives from `start` to game over. Nothing
//! here is global; the state machine owns the session by value.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::flyer::Flyer;
use super::obstacles::{Obstacle, ObstacleStream};
use super::scale::Viewport;
use crate::consts::BACKGROUND_PARALLAX;
use crate::tuning::{ScaledTuning, Tuning};
use crate::wrap_offset;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// Title screen, no session yet
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Session frozen, ticks ignored
    Paused,
    /// Run ended
    GameOver,
}

impl GamePhase {
    /// A session exists in this phase
    pub fn has_session(&self) -> bool {
        matches!(self, GamePhase::Running | GamePhase::Paused)
    }
}

/// One play-through
#[derive(Debug, Clone)]
pub struct Session {
    pub viewport: Viewport,
    pub tuning: ScaledTuning,
    pub flyer: Flyer,
    pub stream: ObstacleStream,
    /// Seeded per session so runs are reproducible
    rng: Pcg32,
    pub seed: u64,
    pub started_at_ms: f64,
    /// Ticks processed while running
    pub ticks: u64,
    /// Parallax scroll offsets (visual only)
    pub background_offset: f32,
    pub ground_offset: f32,
}

impl Session {
    /// Fresh session; all spatial values are scaled here and never again
    pub fn new(viewport: Viewport, tuning: &Tuning, seed: u64, t0_ms: f64) -> Self {
        let scaled = tuning.scaled(viewport.scale());
        Self {
            viewport,
            tuning: scaled,
            flyer: Flyer::new(viewport, &scaled),
            stream: ObstacleStream::new(viewport, &scaled, t0_ms),
            rng: Pcg32::seed_from_u64(seed),
            seed,
            started_at_ms: t0_ms,
            ticks: 0,
            background_offset: 0.0,
            ground_offset: 0.0,
        }
    }

    /// Top of the ground strip
    pub fn ground_y(&self) -> f32 {
        self.viewport.height - self.tuning.ground_height
    }

    /// Spawn a pair if one is due
    pub fn maybe_spawn(&mut self, now_ms: f64) -> Option<u32> {
        self.stream.maybe_spawn(now_ms, &mut self.rng)
    }

    /// Advance the parallax offsets by the current obstacle speed
    pub fn scroll(&mut self) {
        let speed = self.stream.speed();
        self.background_offset = wrap_offset(
            self.background_offset + speed * BACKGROUND_PARALLAX,
            self.viewport.width,
        );
        self.ground_offset = wrap_offset(
            self.ground_offset + speed,
            self.tuning.ground_height,
        );
    }
}

/// Flyer placement for drawing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlyerPose {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub velocity: f32,
    pub rotation_deg: f32,
}

impl From<&Flyer> for FlyerPose {
    fn from(flyer: &Flyer) -> Self {
        Self {
            x: flyer.pos.x,
            y: flyer.pos.y,
            width: flyer.size.x,
            height: flyer.size.y,
            velocity: flyer.velocity,
            rotation_deg: flyer.rotation_deg(),
        }
    }
}

/// Immutable per-tick view handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub flyer: Option<FlyerPose>,
    pub obstacles: Vec<Obstacle>,
    pub obstacle_width: f32,
    pub ground_y: f32,
    pub background_offset: f32,
    pub ground_offset: f32,
    pub score: u32,
    pub best: u32,
}

impl Snapshot {
    pub fn capture(phase: GamePhase, session: Option<&Session>, score: u32, best: u32) -> Self {
        match session {
            Some(s) => Self {
                phase,
                flyer: Some(FlyerPose::from(&s.flyer)),
                obstacles: s.stream.obstacles().cloned().collect(),
                obstacle_width: s.stream.width(),
                ground_y: s.ground_y(),
                background_offset: s.background_offset,
                ground_offset: s.ground_offset,
                score,
                best,
            },
            None => Self {
                phase,
                flyer: None,
                obstacles: Vec::new(),
                obstacle_width: 0.0,
                ground_y: 0.0,
                background_offset: 0.0,
                ground_offset: 0.0,
                score,
                best,
            },
        }
    }
}
