//! Simulation engine
//!
//! All gameplay logic lives here. This module must stay pure:
//! - No timers; the host passes timestamps in
//! - Randomness only through an injected `SpawnSource`
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{ItemOutcome, classify, in_catch_zone, spans_overlap};
pub use spawn::{RandomSpawns, ScriptedSpawns, SpawnRoll, SpawnSource};
pub use state::{FallingItem, GameEvent, GamePhase, GameState, ItemKind, Snapshot, Truck};
pub use tick::{TickInput, advance_countdown, spawn_item, tick};
