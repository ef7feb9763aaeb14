//! wasm-bindgen surface for the browser host
//!
//! JS owns the canvas, DOM listeners and `requestAnimationFrame`; it calls
//! `frame` once per animation frame and draws from `snapshot_json`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen::prelude::*;

use crate::identity::PlayerIdentity;
use crate::input::{Control, touch_percent};
use crate::leaderboard::LeaderboardStore;
use crate::persistence::{KeyValueStore, LocalStore, MemoryStore};
use crate::session::{GameOverSummary, GameSession};
use crate::sim::{GameEvent, RandomSpawns};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("Parcel Catcher starting...");
}

/// Leaderboard backend: localStorage, or memory when storage is blocked
fn leaderboard_backend() -> Box<dyn KeyValueStore> {
    match LocalStore::local() {
        Ok(store) => Box::new(store),
        Err(err) => {
            log::warn!("localStorage unavailable ({err}), leaderboard will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Game instance handed to JS
#[wasm_bindgen]
pub struct WebGame {
    session: GameSession<RandomSpawns<Pcg32>>,
    leaderboard: LeaderboardStore<Box<dyn KeyValueStore>>,
    summary: Option<GameOverSummary>,
}

#[wasm_bindgen]
impl WebGame {
    /// Validate the entry form and remember the player for this tab
    pub fn register(
        name: &str,
        surname: &str,
        company: &str,
        email: &str,
    ) -> Result<(), JsValue> {
        let identity = PlayerIdentity::new(name.trim(), surname.trim(), company.trim(), email.trim());
        identity.validate().map_err(to_js)?;
        let mut store = LocalStore::session().map_err(to_js)?;
        identity.save(&mut store).map_err(to_js)
    }

    #[wasm_bindgen(constructor)]
    pub fn new(now_ms: f64) -> WebGame {
        let identity = match LocalStore::session() {
            Ok(store) => PlayerIdentity::load(&store),
            Err(err) => {
                log::warn!("sessionStorage unavailable: {err}");
                PlayerIdentity::default().with_defaults()
            }
        };
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);

        WebGame {
            session: GameSession::new(
                identity,
                Tuning::default(),
                RandomSpawns::new(Pcg32::seed_from_u64(seed)),
                now_ms,
            ),
            leaderboard: LeaderboardStore::new(leaderboard_backend()),
            summary: None,
        }
    }

    /// Advance one animation frame. Returns true on the frame the game ends.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let events = self.session.update(now_ms);
        let over = events
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. }));
        if over {
            self.summary = self.session.finish(&mut self.leaderboard, None);
        }
        over
    }

    /// Forward a `keydown` event's `key`
    pub fn key_down(&mut self, key: &str) {
        if let Some(control) = Control::from_key(key) {
            self.session.apply(control);
        }
    }

    /// Forward a `touchmove` position relative to the playfield
    pub fn touch(&mut self, client_x: f32, area_left: f32, area_width: f32) {
        if let Some(target) = touch_percent(client_x, area_left, area_width) {
            self.session.apply(Control::MoveTo(target));
        }
    }

    pub fn nudge_left(&mut self) {
        self.session.apply(Control::NudgeLeft);
    }

    pub fn nudge_right(&mut self) {
        self.session.apply(Control::NudgeRight);
    }

    pub fn toggle_pause(&mut self) {
        self.session.toggle_pause();
    }

    pub fn restart(&mut self, now_ms: f64) {
        self.summary = None;
        self.session.restart(now_ms);
    }

    /// `{items, truck, score, level, phase}` for the renderer
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.state().snapshot()).map_err(to_js)
    }

    /// Final result, once the game is over
    pub fn summary_json(&self) -> Option<String> {
        let summary = self.summary.as_ref()?;
        let value = serde_json::json!({
            "name": self.session.identity().full_name(),
            "score": summary.score,
            "level": summary.level,
            "rank": summary.rank,
            "headline": summary.rating.headline(),
            "message": summary.rating.message(),
        });
        Some(value.to_string())
    }

    pub fn leaderboard_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.leaderboard.fetch()).map_err(to_js)
    }

    pub fn clear_leaderboard(&mut self) -> Result<(), JsValue> {
        self.leaderboard.clear().map_err(to_js)
    }
}
