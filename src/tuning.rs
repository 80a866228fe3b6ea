//! Data-driven game balance
//!
//! All values are authored at reference scale. A session multiplies the
//! spatial ones by the viewport scale factor exactly once, at start.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Reference-scale balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Flyer ===
    pub flyer_width: f32,
    pub flyer_height: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    /// Flyer x as a fraction of viewport width
    pub flyer_x_fraction: f32,

    // === Obstacles ===
    pub obstacle_width: f32,
    pub gap: f32,
    pub min_obstacle_height: f32,
    pub min_bottom_margin: f32,
    pub ground_height: f32,

    // === Difficulty ===
    pub base_speed: f32,
    pub speed_step: f32,
    pub max_speed: f32,
    pub spawn_interval_ms: f64,
    pub spawn_interval_step_ms: f64,
    pub min_spawn_interval_ms: f64,
    pub ramp_score_step: u32,

    // === Timing ===
    pub resume_lookahead_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            flyer_width: FLYER_WIDTH,
            flyer_height: FLYER_HEIGHT,
            gravity: FLYER_GRAVITY,
            jump_impulse: FLYER_JUMP_IMPULSE,
            flyer_x_fraction: FLYER_X_FRACTION,

            obstacle_width: OBSTACLE_WIDTH,
            gap: OBSTACLE_GAP,
            min_obstacle_height: OBSTACLE_MIN_HEIGHT,
            min_bottom_margin: OBSTACLE_MIN_BOTTOM_MARGIN,
            ground_height: GROUND_HEIGHT,

            base_speed: BASE_SPEED,
            speed_step: SPEED_STEP,
            max_speed: MAX_SPEED,
            spawn_interval_ms: BASE_SPAWN_INTERVAL_MS,
            spawn_interval_step_ms: SPAWN_INTERVAL_STEP_MS,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,
            ramp_score_step: RAMP_SCORE_STEP,

            resume_lookahead_ms: RESUME_LOOKAHEAD_MS,
        }
    }
}

/// Concrete per-session values after scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledTuning {
    pub scale: f32,
    pub flyer_width: f32,
    pub flyer_height: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub flyer_x_fraction: f32,
    pub obstacle_width: f32,
    pub gap: f32,
    pub min_obstacle_height: f32,
    pub min_bottom_margin: f32,
    pub ground_height: f32,
    pub base_speed: f32,
    pub speed_step: f32,
    pub max_speed: f32,
    pub spawn_interval_ms: f64,
    pub spawn_interval_step_ms: f64,
    pub min_spawn_interval_ms: f64,
    pub ramp_score_step: u32,
    pub resume_lookahead_ms: f64,
}

impl Tuning {
    /// Parse a tuning table; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Multiply spatial values by `scale`. Millisecond timings are left alone.
    pub fn scaled(&self, scale: f32) -> ScaledTuning {
        ScaledTuning {
            scale,
            flyer_width: self.flyer_width * scale,
            flyer_height: self.flyer_height * scale,
            gravity: self.gravity * scale,
            jump_impulse: self.jump_impulse * scale,
            flyer_x_fraction: self.flyer_x_fraction,
            obstacle_width: self.obstacle_width * scale,
            gap: self.gap * scale,
            min_obstacle_height: self.min_obstacle_height * scale,
            min_bottom_margin: self.min_bottom_margin * scale,
            ground_height: self.ground_height * scale,
            base_speed: self.base_speed * scale,
            speed_step: self.speed_step * scale,
            max_speed: self.max_speed * scale,
            spawn_interval_ms: self.spawn_interval_ms,
            spawn_interval_step_ms: self.spawn_interval_step_ms,
            min_spawn_interval_ms: self.min_spawn_interval_ms,
            // A zero step would ramp on every score; treat it as "every point"
            ramp_score_step: self.ramp_score_step.max(1),
            resume_lookahead_ms: self.resume_lookahead_ms,
        }
    }

    /// Load a tuning file, falling back to defaults (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring malformed tuning file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
