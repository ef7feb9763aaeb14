//! Parcel Catcher - a falling-parcels arcade game
//!
//! Core modules:
//! - `sim`: Simulation engine (spawning, motion, catch resolution, phases)
//! - `leaderboard`: Capped, deduplicated top-10 table
//! - `persistence`: Key-value storage backends and the remote sink interface
//! - `tuning`: Data-driven game balance
//! - `identity`: Player identity supplied by the host
//! - `session`: Session-scoped driver owning clocks, RNG and state
//! - `platform`: Browser bindings (wasm32 only)

pub mod identity;
pub mod input;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod sim;
pub mod tuning;

pub use identity::PlayerIdentity;
pub use leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardStore};
pub use session::GameSession;
pub use tuning::Tuning;

/// Playfield geometry, in percent of the playfield width/height
pub mod consts {
    /// Playfield extent on both axes
    pub const PLAYFIELD_MIN: f32 = 0.0;
    pub const PLAYFIELD_MAX: f32 = 100.0;

    /// Truck travel limits
    pub const TRUCK_MIN: f32 = 10.0;
    pub const TRUCK_MAX: f32 = 90.0;
    /// Truck starts centered
    pub const TRUCK_START: f32 = 50.0;
    /// Half-width of the truck's horizontal span
    pub const TRUCK_HALF_WIDTH: f32 = 8.0;

    /// Half-width of a falling item's horizontal span
    pub const ITEM_HALF_WIDTH: f32 = 3.0;

    /// Catch zone (exclusive bounds on y)
    pub const CATCH_ZONE_TOP: f32 = 70.0;
    pub const CATCH_ZONE_BOTTOM: f32 = 85.0;
    /// Items past this y have left the playfield
    pub const EXIT_Y: f32 = 90.0;

    /// Milliseconds per countdown step
    pub const COUNTDOWN_STEP_MS: f64 = 1000.0;

    /// Truck nudge per arrow key / button press
    pub const TRUCK_NUDGE: f32 = 10.0;
}

/// Clamp a truck target to the legal travel range
#[inline]
pub fn clamp_truck(target: f32) -> f32 {
    if target.is_nan() {
        return consts::TRUCK_START;
    }
    target.clamp(consts::TRUCK_MIN, consts::TRUCK_MAX)
}

/// Level reached for a score (1-based)
#[inline]
pub fn level_for_score(score: u64, points_per_level: u64) -> u32 {
    u32::try_from(score / points_per_level.max(1))
        .unwrap_or(u32::MAX)
        .saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_score_saturates() {
        assert_eq!(level_for_score(0, 100), 1);
        assert_eq!(level_for_score(199, 100), 2);
        assert_eq!(level_for_score(u64::MAX, 100), u32::MAX);
        assert_eq!(level_for_score(u64::MAX, 1), u32::MAX);
    }
}
