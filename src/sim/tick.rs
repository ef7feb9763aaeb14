//! Per-frame simulation tick
//!
//! Core game loop: spawn on cadence, integrate fall, resolve catches.
//! The host calls `tick` once per animation frame while Running and
//! `advance_countdown` once per second before that.

use glam::Vec2;

use super::collision::{ItemOutcome, classify};
use super::spawn::SpawnSource;
use super::state::{FallingItem, GameEvent, GamePhase, GameState, ItemKind};

/// Host input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Host timestamp (ms) of this frame
    pub now_ms: f64,
    /// Truck position requested this frame, if any
    pub truck_target: Option<f32>,
}

impl TickInput {
    pub fn at(now_ms: f64) -> Self {
        Self {
            now_ms,
            truck_target: None,
        }
    }
}

/// Spawn one item at the top of the playfield, returning its id
pub fn spawn_item<S: SpawnSource + ?Sized>(state: &mut GameState, spawns: &mut S) -> u32 {
    let roll = spawns.roll(&state.tuning);
    let id = state.next_entity_id();
    state.items.push(FallingItem {
        id,
        pos: Vec2::new(roll.x, 0.0),
        kind: roll.kind,
        speed: roll.speed,
    });
    id
}

/// Step the countdown. `Countdown(0)` starts play with one immediate spawn
/// and resets the spawn clock to `now_ms`.
pub fn advance_countdown<S: SpawnSource + ?Sized>(
    state: &mut GameState,
    now_ms: f64,
    spawns: &mut S,
) -> Vec<GameEvent> {
    match state.phase {
        GamePhase::Countdown(n) if n > 0 => {
            state.phase = GamePhase::Countdown(n - 1);
            vec![GameEvent::CountdownTick { remaining: n - 1 }]
        }
        GamePhase::Countdown(_) => {
            state.phase = GamePhase::Running;
            spawn_item(state, spawns);
            state.last_spawn_ms = now_ms;
            log::debug!("Countdown finished, play started");
            vec![GameEvent::Started]
        }
        _ => Vec::new(),
    }
}

/// Advance the game state by one frame
///
/// Outside `Running` this is a no-op, so a host that ticks while paused or
/// after game over cannot corrupt the state.
pub fn tick<S: SpawnSource + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    spawns: &mut S,
) -> Vec<GameEvent> {
    if state.phase != GamePhase::Running {
        return Vec::new();
    }

    if let Some(target) = input.truck_target {
        state.move_truck(target);
    }

    state.time_ticks = state.time_ticks.saturating_add(1);
    let mut events = Vec::new();

    // Spawn wave
    if input.now_ms - state.last_spawn_ms >= state.spawn_interval_ms {
        for _ in 0..state.tuning.spawns_per_interval {
            spawn_item(state, spawns);
        }
        state.last_spawn_ms = input.now_ms;
    }

    // Integrate fall
    let multiplier = state.speed_multiplier;
    for item in &mut state.items {
        item.pos.y += item.speed * multiplier;
    }

    // Resolve in spawn order
    let truck = state.truck;
    let mut items = std::mem::take(&mut state.items).into_iter();
    let mut kept = Vec::with_capacity(items.len());

    while let Some(item) = items.next() {
        match classify(&item, &truck) {
            ItemOutcome::Contact => match item.kind {
                ItemKind::Parcel => {
                    state.reward_catch();
                    events.push(GameEvent::Caught {
                        item_id: item.id,
                        score: state.score,
                    });
                }
                ItemKind::Hazard => {
                    state.phase = GamePhase::Over;
                    let level = state.level();
                    log::info!("Game over: score {} level {}", state.score, level);
                    events.push(GameEvent::GameOver {
                        score: state.score,
                        level,
                    });
                    // No more scoring; unresolved items freeze where they
                    // are unless they already left the playfield
                    kept.extend(
                        items
                            .by_ref()
                            .filter(|rest| classify(rest, &truck) != ItemOutcome::Exited),
                    );
                    break;
                }
            },
            ItemOutcome::Exited => {}
            ItemOutcome::Falling => kept.push(item),
        }
    }

    state.items = kept;
    events
}
