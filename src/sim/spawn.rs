//! Spawn draws
//!
//! The tick never touches an RNG directly; it asks a `SpawnSource` for the
//! next roll so tests can script exact sequences.

use rand::Rng;

use super::state::ItemKind;
use crate::tuning::Tuning;

/// One randomized spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRoll {
    pub x: f32,
    pub kind: ItemKind,
    pub speed: f32,
}

/// Supplies spawn rolls to the simulation
pub trait SpawnSource {
    fn roll(&mut self, tuning: &Tuning) -> SpawnRoll;
}

/// Spawn source backed by any `rand` generator
#[derive(Debug, Clone)]
pub struct RandomSpawns<R> {
    rng: R,
}

impl<R: Rng> RandomSpawns<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> SpawnSource for RandomSpawns<R> {
    fn roll(&mut self, tuning: &Tuning) -> SpawnRoll {
        let x = self
            .rng
            .random_range(tuning.spawn_min_x..=tuning.spawn_max_x);
        let kind = if self.rng.random_bool(tuning.parcel_probability) {
            ItemKind::Parcel
        } else {
            ItemKind::Hazard
        };
        let jitter = self
            .rng
            .random_range(-tuning.speed_jitter..=tuning.speed_jitter);
        SpawnRoll {
            x,
            kind,
            speed: tuning.base_speed + jitter,
        }
    }
}

/// Replays a fixed list of rolls, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedSpawns {
    rolls: Vec<SpawnRoll>,
    cursor: usize,
}

impl ScriptedSpawns {
    pub fn new(rolls: Vec<SpawnRoll>) -> Self {
        Self { rolls, cursor: 0 }
    }

    /// Rolls handed out so far
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl SpawnSource for ScriptedSpawns {
    fn roll(&mut self, tuning: &Tuning) -> SpawnRoll {
        if self.rolls.is_empty() {
            return SpawnRoll {
                x: (tuning.spawn_min_x + tuning.spawn_max_x) / 2.0,
                kind: ItemKind::Parcel,
                speed: tuning.base_speed,
            };
        }
        let roll = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        roll
    }
}
