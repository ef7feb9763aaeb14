//! Parcel Catcher entry point
//!
//! The browser build starts from `platform::web::start`. Natively this runs
//! a headless session with a simple autopilot and records the result in a
//! file-backed leaderboard.
//!
//! Usage: `parcel-catcher [seed]`
//! - `PARCEL_CATCHER_DATA`: leaderboard directory (default `.parcel-catcher`)
//! - `PARCEL_CATCHER_TUNING`: optional tuning JSON file

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;

    use parcel_catcher::consts::*;
    use parcel_catcher::persistence::FileStore;
    use parcel_catcher::sim::{GameEvent, GameState, ItemKind, RandomSpawns, spans_overlap};
    use parcel_catcher::{GameSession, LeaderboardStore, PlayerIdentity, Tuning};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Frame length of the simulated display
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    pub fn run() -> Result<(), Box<dyn Error>> {
        let seed = match std::env::args().nth(1) {
            Some(arg) => arg.parse::<u64>()?,
            None => 42,
        };

        let tuning = match std::env::var("PARCEL_CATCHER_TUNING") {
            Ok(path) => {
                log::info!("Loading tuning from {path}");
                Tuning::from_json(&std::fs::read_to_string(path)?)?
            }
            Err(_) => Tuning::default(),
        };

        let data_dir =
            std::env::var("PARCEL_CATCHER_DATA").unwrap_or_else(|_| ".parcel-catcher".to_string());
        let mut leaderboard = LeaderboardStore::new(FileStore::open(&data_dir)?);

        let identity = PlayerIdentity::new(
            "Auto",
            "Pilot",
            "Headless Logistics",
            format!("autopilot-{seed}@example.com"),
        );
        let spawns = RandomSpawns::new(Pcg32::seed_from_u64(seed));
        let mut session = GameSession::new(identity, tuning, spawns, 0.0);
        log::info!("Headless run with seed {seed}, data in {data_dir}");

        let mut now = 0.0;
        for _ in 0..MAX_FRAMES {
            now += FRAME_MS;
            let target = autopilot(session.state());
            for event in session.update_with_target(now, target) {
                match event {
                    GameEvent::Caught { score, .. } => log::debug!("Caught, score {score}"),
                    GameEvent::GameOver { score, level } => log::info!(
                        "Game over at {:.1}s after {} ticks: score {score}, level {level}",
                        now / 1000.0,
                        session.state().snapshot().tick
                    ),
                    GameEvent::CountdownTick { remaining } => log::debug!("Countdown {remaining}"),
                    GameEvent::Started => log::info!("Go!"),
                }
            }
            if session.state().is_over() {
                break;
            }
        }

        match session.finish(&mut leaderboard, None) {
            Some(summary) => {
                println!("\n{} {}", summary.rating.headline(), summary.rating.message());
                println!("Final score {} (level {})", summary.score, summary.level);
                match summary.rank {
                    Some(rank) => println!("Leaderboard rank: #{rank}"),
                    None => println!("Did not make the leaderboard"),
                }
            }
            None => println!("\nTime limit reached with score {}", session.state().score),
        }

        println!("\nTop Delivery Drivers");
        for (i, row) in leaderboard.fetch().iter().enumerate() {
            println!(
                "{:>2}. {:<24} {:<20} {:>6}  L{}",
                i + 1,
                row.name,
                row.company.as_deref().unwrap_or("-"),
                row.score,
                row.level
            );
        }
        Ok(())
    }

    /// Chase the lowest reachable parcel, sidestepping hazards about to land
    fn autopilot(state: &GameState) -> Option<f32> {
        let truck = state.truck.position;

        let target = state
            .items
            .iter()
            .filter(|i| i.kind == ItemKind::Parcel && i.pos.y < CATCH_ZONE_BOTTOM)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|parcel| parcel.pos.x)
            .unwrap_or(truck);

        let span = (target - TRUCK_HALF_WIDTH, target + TRUCK_HALF_WIDTH);
        let threat = state.items.iter().find(|i| {
            i.kind == ItemKind::Hazard
                && i.pos.y > CATCH_ZONE_TOP - 10.0
                && i.pos.y < CATCH_ZONE_BOTTOM
                && spans_overlap(i.span(), span)
        });

        match threat {
            Some(hazard) if hazard.pos.x >= target => Some(target - 2.0 * TRUCK_HALF_WIDTH),
            Some(_) => Some(target + 2.0 * TRUCK_HALF_WIDTH),
            None => Some(target),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Parcel Catcher (native) starting...");
    if let Err(err) = native::run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
