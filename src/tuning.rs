//! Data-driven game balance
//!
//! Defaults reproduce the shipped game. A JSON file may override any subset
//! of fields; missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{PLAYFIELD_MAX, PLAYFIELD_MIN};

/// Largest accepted reward for a single parcel
pub const MAX_PARCEL_REWARD: u64 = 1_000_000;
/// Largest accepted spawn wave
pub const MAX_SPAWNS_PER_INTERVAL: u32 = 8;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Balance parameters for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Scoring ===
    /// Points awarded per caught parcel
    pub parcel_reward: u64,
    /// Points needed per level
    pub points_per_level: u64,

    // === Difficulty ramp ===
    /// Added to the fall-speed multiplier on every catch
    pub speed_multiplier_step: f32,
    /// Starting spawn cadence
    pub initial_spawn_interval_ms: f64,
    /// Cadence reduction per catch
    pub spawn_interval_step_ms: f64,
    /// Cadence never drops below this
    pub min_spawn_interval_ms: f64,

    // === Spawning ===
    /// Items spawned each time the interval elapses
    pub spawns_per_interval: u32,
    /// Base fall speed, percent of height per tick
    pub base_speed: f32,
    /// Fall speed varies uniformly by +/- this much
    pub speed_jitter: f32,
    pub spawn_min_x: f32,
    pub spawn_max_x: f32,
    /// Chance that a spawned item is a parcel
    pub parcel_probability: f64,

    // === Flow ===
    /// Countdown length before play starts
    pub countdown_secs: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            parcel_reward: 10,
            points_per_level: 100,

            speed_multiplier_step: 0.1,
            initial_spawn_interval_ms: 2000.0,
            spawn_interval_step_ms: 80.0,
            min_spawn_interval_ms: 200.0,

            spawns_per_interval: 2,
            base_speed: 0.3,
            speed_jitter: 0.1,
            spawn_min_x: 5.0,
            spawn_max_x: 95.0,
            parcel_probability: 0.5,

            countdown_secs: 3,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |field, reason| Err(TuningError::Invalid { field, reason });

        if self.parcel_reward == 0 || self.parcel_reward > MAX_PARCEL_REWARD {
            return invalid("parcel_reward", "must be within [1, 1000000]");
        }
        if self.points_per_level == 0 {
            return invalid("points_per_level", "must be positive");
        }
        if !(self.min_spawn_interval_ms > 0.0) {
            return invalid("min_spawn_interval_ms", "must be positive");
        }
        if self.initial_spawn_interval_ms < self.min_spawn_interval_ms {
            return invalid("initial_spawn_interval_ms", "below the minimum interval");
        }
        if self.spawn_interval_step_ms < 0.0 {
            return invalid("spawn_interval_step_ms", "must not be negative");
        }
        if self.speed_multiplier_step < 0.0 {
            return invalid("speed_multiplier_step", "must not be negative");
        }
        if self.speed_jitter < 0.0 {
            return invalid("speed_jitter", "must not be negative");
        }
        if self.base_speed - self.speed_jitter <= 0.0 {
            return invalid("base_speed", "items must always fall");
        }
        if self.spawns_per_interval == 0 || self.spawns_per_interval > MAX_SPAWNS_PER_INTERVAL {
            return invalid("spawns_per_interval", "must be within [1, 8]");
        }
        if !(self.spawn_min_x >= PLAYFIELD_MIN) {
            return invalid("spawn_min_x", "outside the playfield");
        }
        if !(self.spawn_max_x <= PLAYFIELD_MAX) {
            return invalid("spawn_max_x", "outside the playfield");
        }
        if self.spawn_min_x > self.spawn_max_x {
            return invalid("spawn_min_x", "greater than spawn_max_x");
        }
        if !(0.0..=1.0).contains(&self.parcel_probability) {
            return invalid("parcel_probability", "must be within [0, 1]");
        }
        Ok(())
    }
}
