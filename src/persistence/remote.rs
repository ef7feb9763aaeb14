//! Remote leaderboard sink
//!
//! Only the interface lives here. A remote backend accepts insert-only
//! writes and serves the top entries ordered by score. Failures are never
//! fatal to the caller: local persistence proceeds regardless.

use thiserror::Error;

use crate::leaderboard::LeaderboardEntry;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote leaderboard not configured")]
    NotConfigured,
    #[error("remote request failed: {0}")]
    Request(String),
}

pub trait RemoteLeaderboard {
    /// Append one finished-session result
    fn insert(&mut self, entry: &LeaderboardEntry) -> Result<(), RemoteError>;
    /// Top `limit` entries, highest score first
    ///
    /// Nothing in this crate reads it: the ranked table shown to players
    /// always comes from the local store. It exists for hosts that render a
    /// global board themselves.
    fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, RemoteError>;
}
