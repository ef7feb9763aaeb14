//! Session host
//!
//! One `GameSession` per play-through. It owns everything the browser
//! version kept in component refs: the spawn source, the countdown clock
//! and the one-shot leaderboard submission flag. The host calls `update`
//! from its animation-frame callback and forwards player commands.

use crate::consts::COUNTDOWN_STEP_MS;
use crate::identity::PlayerIdentity;
use crate::input::Control;
use crate::leaderboard::{LeaderboardStore, SubmitOutcome};
use crate::persistence::{KeyValueStore, RemoteLeaderboard};
use crate::sim::{GameEvent, GamePhase, GameState, SpawnSource, TickInput, advance_countdown, tick};
use crate::tuning::Tuning;

/// Verdict shown on the game-over screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    GoodStart,
    WellDone,
    Outstanding,
}

impl Rating {
    pub fn for_score(score: u64) -> Self {
        match score {
            s if s > 500 => Rating::Outstanding,
            s if s > 200 => Rating::WellDone,
            _ => Rating::GoodStart,
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Rating::GoodStart => "Good Start!",
            Rating::WellDone => "Well Done!",
            Rating::Outstanding => "Outstanding!",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Rating::GoodStart => "Keep practicing to improve your skills.",
            Rating::WellDone => "You're becoming a skilled driver.",
            Rating::Outstanding => "You're a delivery champion!",
        }
    }
}

/// Final result of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub score: u64,
    pub level: u32,
    pub rating: Rating,
    /// Leaderboard rank after submission, if the local store accepted it
    pub rank: Option<usize>,
}

/// A single play-through
pub struct GameSession<S> {
    state: GameState,
    spawns: S,
    identity: PlayerIdentity,
    /// Timestamp of the last countdown step
    countdown_anchor_ms: f64,
    submitted: bool,
}

impl<S: SpawnSource> GameSession<S> {
    /// Start a session whose countdown begins at `now_ms`
    pub fn new(identity: PlayerIdentity, tuning: Tuning, spawns: S, now_ms: f64) -> Self {
        log::info!("Session started for {}", identity.full_name());
        Self {
            state: GameState::new(tuning),
            spawns,
            identity,
            countdown_anchor_ms: now_ms,
            submitted: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn identity(&self) -> &PlayerIdentity {
        &self.identity
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Advance to `now_ms`: countdown steps while counting down, one tick
    /// while running, nothing otherwise
    pub fn update(&mut self, now_ms: f64) -> Vec<GameEvent> {
        self.update_with_target(now_ms, None)
    }

    /// `update` with a truck target applied before the tick
    pub fn update_with_target(&mut self, now_ms: f64, truck_target: Option<f32>) -> Vec<GameEvent> {
        match self.state.phase {
            GamePhase::Countdown(_) => {
                if let Some(target) = truck_target {
                    self.state.move_truck(target);
                }
                self.run_countdown(now_ms)
            }
            GamePhase::Running => {
                let input = TickInput {
                    now_ms,
                    truck_target,
                };
                tick(&mut self.state, &input, &mut self.spawns)
            }
            GamePhase::Paused | GamePhase::Over => Vec::new(),
        }
    }

    fn run_countdown(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while matches!(self.state.phase, GamePhase::Countdown(_))
            && now_ms - self.countdown_anchor_ms >= COUNTDOWN_STEP_MS
        {
            self.countdown_anchor_ms += COUNTDOWN_STEP_MS;
            let at = self.countdown_anchor_ms;
            events.extend(advance_countdown(&mut self.state, at, &mut self.spawns));
            // Zero starts play straight away
            if self.state.phase == GamePhase::Countdown(0) {
                events.extend(advance_countdown(&mut self.state, at, &mut self.spawns));
            }
        }
        events
    }

    /// Apply a player command. Movement is ignored while paused or over.
    pub fn apply(&mut self, control: Control) {
        match control {
            Control::TogglePause => self.toggle_pause(),
            _ => {
                if matches!(self.state.phase, GamePhase::Paused | GamePhase::Over) {
                    return;
                }
                if let Some(target) = control.truck_target(self.state.truck.position) {
                    self.state.move_truck(target);
                }
            }
        }
    }

    pub fn move_truck(&mut self, target: f32) {
        self.apply(Control::MoveTo(target));
    }

    pub fn toggle_pause(&mut self) {
        self.state.toggle_pause();
        log::debug!("Pause toggled: {:?}", self.state.phase);
    }

    /// Submit the result once the game is over. Returns `None` before game
    /// over and on every call after the first.
    ///
    /// A remote failure is logged and does not block the local submission.
    pub fn finish<K: KeyValueStore>(
        &mut self,
        store: &mut LeaderboardStore<K>,
        remote: Option<&mut dyn RemoteLeaderboard>,
    ) -> Option<GameOverSummary> {
        if !self.state.is_over() || self.submitted {
            return None;
        }
        self.submitted = true;

        let score = self.state.score;
        let level = self.state.level();
        let entry = self.identity.to_entry(score, level);

        if let Some(remote) = remote {
            if let Err(err) = remote.insert(&entry) {
                log::error!("Remote leaderboard insert failed: {err}");
            }
        }

        let rank = match store.submit(entry) {
            Ok(SubmitOutcome::Inserted { rank })
            | Ok(SubmitOutcome::Improved { rank })
            | Ok(SubmitOutcome::Unchanged { rank }) => Some(rank),
            Ok(SubmitOutcome::Rejected) => None,
            Err(err) => {
                log::error!("Could not save leaderboard: {err}");
                None
            }
        };

        Some(GameOverSummary {
            score,
            level,
            rating: Rating::for_score(score),
            rank,
        })
    }

    /// Start over with the same player and tuning ("Play Again")
    pub fn restart(&mut self, now_ms: f64) {
        self.state = GameState::new(self.state.tuning.clone());
        self.countdown_anchor_ms = now_ms;
        self.submitted = false;
        log::info!("Session restarted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::LeaderboardEntry;
    use crate::persistence::{MemoryStore, RemoteError, UnavailableStore};
    use crate::sim::{ItemKind, ScriptedSpawns, SpawnRoll};

    const FRAME_MS: f64 = 16.0;

    fn fast(kind: ItemKind) -> ScriptedSpawns {
        ScriptedSpawns::new(vec![SpawnRoll {
            x: 50.0,
            kind,
            speed: 5.0,
        }])
    }

    fn ada() -> PlayerIdentity {
        PlayerIdentity::new("Ada", "Lovelace", "Engines", "ada@example.com")
    }

    /// Run frames after the countdown until `done` or a frame budget runs out
    fn run_until<S: SpawnSource>(
        session: &mut GameSession<S>,
        mut now: f64,
        done: impl Fn(&[GameEvent]) -> bool,
    ) -> f64 {
        for _ in 0..1000 {
            now += FRAME_MS;
            let events = session.update(now);
            if done(events.as_slice()) {
                break;
            }
        }
        now
    }

    #[derive(Default)]
    struct RecordingRemote {
        rows: Vec<LeaderboardEntry>,
    }

    impl RemoteLeaderboard for RecordingRemote {
        fn insert(&mut self, entry: &LeaderboardEntry) -> Result<(), RemoteError> {
            self.rows.push(entry.clone());
            Ok(())
        }

        fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, RemoteError> {
            Ok(self.rows.iter().take(limit).cloned().collect())
        }
    }

    struct DownRemote;

    impl RemoteLeaderboard for DownRemote {
        fn insert(&mut self, _entry: &LeaderboardEntry) -> Result<(), RemoteError> {
            Err(RemoteError::Request("connection refused".to_string()))
        }

        fn top(&self, _limit: usize) -> Result<Vec<LeaderboardEntry>, RemoteError> {
            Err(RemoteError::NotConfigured)
        }
    }

    #[test]
    fn test_countdown_runs_once_per_second() {
        let mut session = GameSession::new(ada(), Tuning::default(), fast(ItemKind::Parcel), 0.0);
        assert!(session.update(999.0).is_empty());
        assert_eq!(session.phase(), GamePhase::Countdown(3));

        assert_eq!(
            session.update(1000.0),
            vec![GameEvent::CountdownTick { remaining: 2 }]
        );
        session.update(2000.0);
        assert_eq!(session.phase(), GamePhase::Countdown(1));

        let events = session.update(3000.0);
        assert_eq!(
            events,
            vec![GameEvent::CountdownTick { remaining: 0 }, GameEvent::Started]
        );
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.state().items.len(), 1);
        assert_eq!(session.state().last_spawn_ms, 3000.0);
    }

    #[test]
    fn test_countdown_catches_up_after_stall() {
        let mut session = GameSession::new(ada(), Tuning::default(), fast(ItemKind::Parcel), 0.0);
        let events = session.update(10_000.0);
        assert_eq!(events.last(), Some(&GameEvent::Started));
        assert_eq!(session.phase(), GamePhase::Running);
    }

    #[test]
    fn test_catching_parcels_scores() {
        let mut session = GameSession::new(ada(), Tuning::default(), fast(ItemKind::Parcel), 0.0);
        session.update(3000.0);
        run_until(&mut session, 3000.0, |events| {
            events.iter().any(|e| matches!(e, GameEvent::Caught { .. }))
        });
        assert_eq!(session.state().score, 10);
        assert_eq!(session.phase(), GamePhase::Running);
    }

    #[test]
    fn test_hazard_ends_session_and_submits_once() {
        let mut session = GameSession::new(ada(), Tuning::default(), fast(ItemKind::Hazard), 0.0);
        let mut store = LeaderboardStore::new(MemoryStore::new());

        session.update(3000.0);
        assert!(session.finish(&mut store, None).is_none());

        run_until(&mut session, 3000.0, |events| {
            events.iter().any(|e| matches!(e, GameEvent::GameOver { .. }))
        });
        assert_eq!(session.phase(), GamePhase::Over);
        assert!(session.update(1e9).is_empty());

        let mut remote = RecordingRemote::default();
        let summary = session.finish(&mut store, Some(&mut remote)).unwrap();
        assert_eq!(summary.score, 0);
        assert_eq!(summary.level, 1);
        assert_eq!(summary.rating, Rating::GoodStart);
        assert_eq!(summary.rank, Some(1));
        assert_eq!(remote.rows.len(), 1);

        assert!(session.finish(&mut store, Some(&mut remote)).is_none());
        assert_eq!(remote.rows.len(), 1);

        let rows = store.fetch();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Ada Lovelace");
        assert_eq!(rows[0].email, "ada@example.com");
    }

    #[test]
    fn test_remote_failure_is_not_fatal() {
        let mut session = GameSession::new(ada(), Tuning::default(), fast(ItemKind::Hazard), 0.0);
        let mut store = LeaderboardStore::new(MemoryStore::new());
        session.update(3000.0);
        run_until(&mut session, 3000.0, |events| {
            events.iter().any(|e| matches!(e, GameEvent::GameOver { .. }))
        });

        let mut remote = DownRemote;
        let summary = session.finish(&mut store, Some(&mut remote)).unwrap();
        assert_eq!(summary.rank, Some(1));
        assert_eq!(store.fetch().len(), 1);
    }

    #[test]
    fn test_storage_failure_still_reports_summary() {
        let mut session = GameSession::new(ada(), Tuning::default(), fast(ItemKind::Hazard), 0.0);
        let mut store = LeaderboardStore::new(UnavailableStore);
        session.update(3000.0);
        run_until(&mut session, 3000.0, |events| {
            events.iter().any(|e| matches!(e, GameEvent::GameOver { .. }))
        });

        let mut remote = RecordingRemote::default();
        let summary = session.finish(&mut store, Some(&mut remote)).unwrap();
        assert_eq!(summary.score, 0);
        assert_eq!(summary.level, 1);
        assert_eq!(summary.rank, None);
        assert_eq!(remote.rows.len(), 1);
        assert!(session.finish(&mut store, None).is_none());
    }

    #[test]
    fn test_pause_blocks_ticks_and_moves() {
        let mut session = GameSession::new(ada(), Tuning::default(), fast(ItemKind::Parcel), 0.0);
        session.update(3000.0);
        session.apply(Control::TogglePause);
        assert_eq!(session.phase(), GamePhase::Paused);

        let y = session.state().items[0].pos.y;
        session.update(3016.0);
        assert_eq!(session.state().items[0].pos.y, y);

        session.apply(Control::NudgeLeft);
        session.move_truck(12.0);
        assert_eq!(session.state().truck.position, 50.0);

        session.apply(Control::from_key("p").unwrap());
        assert_eq!(session.phase(), GamePhase::Running);
        session.apply(Control::NudgeLeft);
        assert_eq!(session.state().truck.position, 40.0);
    }

    #[test]
    fn test_moves_allowed_during_countdown_and_clamped() {
        let mut session = GameSession::new(ada(), Tuning::default(), fast(ItemKind::Parcel), 0.0);
        for _ in 0..10 {
            session.apply(Control::NudgeRight);
        }
        assert_eq!(session.state().truck.position, 90.0);
        session.apply(Control::MoveTo(-5.0));
        assert_eq!(session.state().truck.position, 10.0);
    }

    #[test]
    fn test_restart_resets_state() {
        let mut session = GameSession::new(ada(), Tuning::default(), fast(ItemKind::Hazard), 0.0);
        let mut store = LeaderboardStore::new(MemoryStore::new());
        session.update(3000.0);
        let now = run_until(&mut session, 3000.0, |events| {
            events.iter().any(|e| matches!(e, GameEvent::GameOver { .. }))
        });
        session.finish(&mut store, None);

        session.restart(now);
        assert_eq!(session.phase(), GamePhase::Countdown(3));
        assert!(session.state().items.is_empty());
        assert_eq!(session.state().score, 0);
    }

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(Rating::for_score(200), Rating::GoodStart);
        assert_eq!(Rating::for_score(210), Rating::WellDone);
        assert_eq!(Rating::for_score(500), Rating::WellDone);
        assert_eq!(Rating::for_score(510), Rating::Outstanding);
        assert_eq!(Rating::Outstanding.headline(), "Outstanding!");
    }
}
