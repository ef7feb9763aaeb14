//! Game state and core simulation types
//!
//! Everything the host needs to draw a frame lives here; clocks that the
//! tick reads (spawn clock, tick counter) are plain fields, never globals.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;
use crate::{clamp_truck, level_for_score};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Counting down to the start (seconds remaining)
    Countdown(u8),
    /// Active gameplay
    Running,
    /// Game is paused; the host must not tick
    Paused,
    /// Hit a hazard. Terminal for this session
    Over,
}

/// Falling item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Scores when caught
    Parcel,
    /// Ends the run when caught
    Hazard,
}

/// A falling item entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingItem {
    pub id: u32,
    /// Percent-of-playfield position; y grows downward from 0
    pub pos: Vec2,
    pub kind: ItemKind,
    /// Percent of height per tick, before the global multiplier
    pub speed: f32,
}

impl FallingItem {
    /// Horizontal span covered by this item
    pub fn span(&self) -> (f32, f32) {
        (self.pos.x - ITEM_HALF_WIDTH, self.pos.x + ITEM_HALF_WIDTH)
    }
}

/// The player's truck
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Truck {
    /// Center, percent of playfield width, always in [TRUCK_MIN, TRUCK_MAX]
    pub position: f32,
}

impl Default for Truck {
    fn default() -> Self {
        Self {
            position: TRUCK_START,
        }
    }
}

impl Truck {
    /// Horizontal span covered by the truck
    pub fn span(&self) -> (f32, f32) {
        (
            self.position - TRUCK_HALF_WIDTH,
            self.position + TRUCK_HALF_WIDTH,
        )
    }

    pub fn move_to(&mut self, target: f32) {
        self.position = clamp_truck(target);
    }
}

/// Events raised while advancing the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Countdown stepped to a new value
    CountdownTick { remaining: u8 },
    /// Countdown finished, play begins
    Started,
    /// A parcel landed in the truck
    Caught { item_id: u32, score: u64 },
    /// The truck hit a hazard
    GameOver { score: u64, level: u32 },
}

/// Read-only view handed to the renderer each frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub items: &'a [FallingItem],
    pub truck: f32,
    pub score: u64,
    pub level: u32,
    pub phase: GamePhase,
    /// Ticks simulated so far, for frame-independent animation
    pub tick: u64,
}

/// Complete simulation state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Balance values this run was started with
    pub tuning: Tuning,
    pub score: u64,
    /// Global fall-speed scalar, ratchets up per catch
    pub speed_multiplier: f32,
    /// Current spawn cadence in milliseconds
    pub spawn_interval_ms: f64,
    /// Live items in spawn order
    pub items: Vec<FallingItem>,
    pub phase: GamePhase,
    pub truck: Truck,
    /// Host timestamp of the last spawn wave
    pub last_spawn_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Next entity ID
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl GameState {
    /// Create a fresh state counting down from `tuning.countdown_secs`
    pub fn new(tuning: Tuning) -> Self {
        Self {
            score: 0,
            speed_multiplier: 1.0,
            spawn_interval_ms: tuning.initial_spawn_interval_ms,
            items: Vec::new(),
            phase: GamePhase::Countdown(tuning.countdown_secs),
            truck: Truck::default(),
            last_spawn_ms: 0.0,
            time_ticks: 0,
            next_id: 0,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Level derived from the current score
    pub fn level(&self) -> u32 {
        level_for_score(self.score, self.tuning.points_per_level)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }

    /// Move the truck to `target`, clamped to the playfield
    pub fn move_truck(&mut self, target: f32) {
        if self.is_over() {
            return;
        }
        self.truck.move_to(target);
    }

    /// Toggle between Running and Paused; other phases are unaffected
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            other => other,
        };
    }

    /// Apply the reward and difficulty ramp for one caught parcel
    pub(crate) fn reward_catch(&mut self) {
        self.score = self.score.saturating_add(self.tuning.parcel_reward);
        self.speed_multiplier += self.tuning.speed_multiplier_step;
        self.spawn_interval_ms = (self.spawn_interval_ms - self.tuning.spawn_interval_step_ms)
            .max(self.tuning.min_spawn_interval_ms);
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            items: &self.items,
            truck: self.truck.position,
            score: self.score,
            level: self.level(),
            phase: self.phase,
            tick: self.time_ticks,
        }
    }
}
