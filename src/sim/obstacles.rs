//! Obstacle pairs and the stream that spawns, scrolls and retires them
//!
//! Spawning is driven by caller-supplied timestamps; nothing here reads a clock.
//! Difficulty ramps on score milestones, never on elapsed time.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::scale::Viewport;
use crate::tuning::ScaledTuning;

/// Which side of the gap an obstacle guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleSide {
    Top,
    Bottom,
}

/// One half of a gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pair_id: u32,
    pub side: ObstacleSide,
    pub x: f32,
    /// Top edge (0 for the top member)
    pub y: f32,
    pub height: f32,
    /// Flips false -> true once, never back
    passed: bool,
}

impl Obstacle {
    pub fn is_top(&self) -> bool {
        self.side == ObstacleSide::Top
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Mark as passed; returns true only on the first call
    fn mark_passed(&mut self) -> bool {
        if self.passed {
            return false;
        }
        self.passed = true;
        true
    }
}

/// Top and bottom obstacles sharing an id and an x
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePair {
    pub id: u32,
    pub top: Obstacle,
    pub bottom: Obstacle,
}

impl ObstaclePair {
    pub fn x(&self) -> f32 {
        self.top.x
    }

    fn shift(&mut self, dx: f32) {
        self.top.x -= dx;
        self.bottom.x -= dx;
    }

    pub fn members(&self) -> [&Obstacle; 2] {
        [&self.top, &self.bottom]
    }
}

/// Spawns, scrolls and retires obstacle pairs; owns the difficulty ramp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleStream {
    /// Live pairs, oldest first
    pub pairs: Vec<ObstaclePair>,
    viewport: Viewport,
    width: f32,
    gap: f32,
    min_height: f32,
    min_bottom_margin: f32,
    ground_height: f32,
    speed: f32,
    speed_step: f32,
    max_speed: f32,
    spawn_interval_ms: f64,
    spawn_interval_step_ms: f64,
    min_spawn_interval_ms: f64,
    ramp_score_step: u32,
    resume_lookahead_ms: f64,
    last_spawn_ms: f64,
    next_pair_id: u32,
}

impl ObstacleStream {
    /// Fresh stream for a session starting at `t0_ms`
    pub fn new(viewport: Viewport, tuning: &ScaledTuning, t0_ms: f64) -> Self {
        Self {
            pairs: Vec::new(),
            viewport,
            width: tuning.obstacle_width,
            gap: tuning.gap,
            min_height: tuning.min_obstacle_height,
            min_bottom_margin: tuning.min_bottom_margin,
            ground_height: tuning.ground_height,
            speed: tuning.base_speed,
            speed_step: tuning.speed_step,
            max_speed: tuning.max_speed,
            spawn_interval_ms: tuning.spawn_interval_ms,
            spawn_interval_step_ms: tuning.spawn_interval_step_ms,
            min_spawn_interval_ms: tuning.min_spawn_interval_ms,
            ramp_score_step: tuning.ramp_score_step,
            resume_lookahead_ms: tuning.resume_lookahead_ms,
            last_spawn_ms: t0_ms,
            next_pair_id: 1,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn spawn_interval_ms(&self) -> f64 {
        self.spawn_interval_ms
    }

    pub fn last_spawn_ms(&self) -> f64 {
        self.last_spawn_ms
    }

    /// Spawn a pair at the right edge once the interval has elapsed
    pub fn maybe_spawn<R: Rng>(&mut self, now_ms: f64, rng: &mut R) -> Option<u32> {
        if now_ms - self.last_spawn_ms <= self.spawn_interval_ms {
            return None;
        }
        let top_height = self.random_top_height(rng);
        let id = self.spawn_pair_at(self.viewport.width, top_height);
        self.last_spawn_ms = now_ms;
        log::debug!(
            "Spawned pair {} (top height {:.1}) at t={:.0}ms",
            id,
            top_height,
            now_ms
        );
        Some(id)
    }

    /// Top height drawn from `[min_height, viewport_h - gap - margin)`, floored
    /// to whole pixels above the minimum.
    ///
    /// A viewport too short for that range collapses to `min_height`.
    pub fn random_top_height<R: Rng>(&self, rng: &mut R) -> f32 {
        let max_height = self.viewport.height - self.gap - self.min_bottom_margin;
        let span = max_height - self.min_height;
        if span <= 0.0 {
            return self.min_height;
        }
        (rng.random::<f32>() * span).floor() + self.min_height
    }

    /// Push a pair at `x` whose top member is `top_height` tall
    ///
    /// The bottom member fills what is left above the ground so that
    /// `top + gap + bottom + ground == viewport height`.
    pub fn spawn_pair_at(&mut self, x: f32, top_height: f32) -> u32 {
        let id = self.next_pair_id;
        self.next_pair_id += 1;

        let top_height = top_height.max(0.0);
        let bottom_y = top_height + self.gap;
        let bottom_height =
            (self.viewport.height - top_height - self.gap - self.ground_height).max(0.0);

        self.pairs.push(ObstaclePair {
            id,
            top: Obstacle {
                pair_id: id,
                side: ObstacleSide::Top,
                x,
                y: 0.0,
                height: top_height,
                passed: false,
            },
            bottom: Obstacle {
                pair_id: id,
                side: ObstacleSide::Bottom,
                x,
                y: bottom_y,
                height: bottom_height,
                passed: false,
            },
        });
        id
    }

    /// Scroll every pair left by the current speed
    pub fn advance(&mut self) {
        let speed = self.speed;
        for pair in &mut self.pairs {
            pair.shift(speed);
        }
    }

    /// Drop pairs whose trailing edge has left the screen
    pub fn reap_offscreen(&mut self) -> usize {
        let width = self.width;
        let before = self.pairs.len();
        self.pairs.retain(|p| p.x() + width >= 0.0);
        before - self.pairs.len()
    }

    /// Flag pairs the flyer has fully cleared
    ///
    /// Returns how many pairs were passed for the first time. Only the bottom
    /// member's transition counts, so a pair is worth exactly one.
    pub fn mark_passed(&mut self, flyer_x: f32) -> u32 {
        let width = self.width;
        let mut newly_passed = 0;
        for pair in &mut self.pairs {
            if pair.x() + width < flyer_x {
                pair.top.mark_passed();
                if pair.bottom.mark_passed() {
                    newly_passed += 1;
                }
            }
        }
        newly_passed
    }

    /// Ramp difficulty for a freshly incremented score
    ///
    /// Call once per score increment. Returns true when a milestone was hit.
    pub fn apply_difficulty_ramp(&mut self, score: u32) -> bool {
        if score == 0 || score % self.ramp_score_step != 0 {
            return false;
        }
        self.speed = (self.speed + self.speed_step).min(self.max_speed);
        self.spawn_interval_ms =
            (self.spawn_interval_ms - self.spawn_interval_step_ms).max(self.min_spawn_interval_ms);
        log::debug!(
            "Difficulty ramp at score {}: speed {:.2}, spawn interval {:.0}ms",
            score,
            self.speed,
            self.spawn_interval_ms
        );
        true
    }

    /// Reschedule spawning after a pause so resuming never spawns instantly
    ///
    /// The next pair becomes due `resume_lookahead_ms` after `now_ms`.
    pub fn realign_after_resume(&mut self, now_ms: f64) {
        self.last_spawn_ms = now_ms - (self.spawn_interval_ms - self.resume_lookahead_ms);
    }

    /// Iterate every obstacle, top member first within each pair
    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.pairs.iter().flat_map(|p| p.members())
    }
}
