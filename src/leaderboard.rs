//! Leaderboard
//!
//! Top 10 finished sessions, one row per email, highest score first.
//! Persisted as a JSON array under a fixed key.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError};

/// Maximum number of rows kept
pub const MAX_ENTRIES: usize = 10;

/// Storage key for the serialized table
pub const STORAGE_KEY: &str = "parcelCatcherLeaderboard";

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Deduplication key
    pub email: String,
    pub score: u64,
    pub level: u32,
}

/// Result of merging one entry into the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// New email, now at `rank` (1-indexed)
    Inserted { rank: usize },
    /// Known email beat its previous best
    Improved { rank: usize },
    /// Known email did not beat its previous best; table untouched
    Unchanged { rank: usize },
    /// New email that did not make the top 10
    Rejected,
}

/// Ranked leaderboard table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from arbitrary rows, enforcing the table invariants
    pub fn from_entries(rows: impl IntoIterator<Item = LeaderboardEntry>) -> Self {
        let mut board = Self::new();
        for row in rows {
            board.submit(row);
        }
        board
    }

    /// Rows in rank order
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<LeaderboardEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Current rank of an email (1-indexed)
    pub fn rank_of(&self, email: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.email == email)
            .map(|i| i + 1)
    }

    /// Rank a brand-new email with `score` would get, if it makes the table
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        (pos < MAX_ENTRIES).then_some(pos + 1)
    }

    /// Merge one finished session into the table
    pub fn submit(&mut self, entry: LeaderboardEntry) -> SubmitOutcome {
        let email = entry.email.clone();

        let improved = match self.entries.iter().position(|e| e.email == entry.email) {
            Some(i) if entry.score > self.entries[i].score => {
                self.entries[i] = entry;
                true
            }
            Some(i) => return SubmitOutcome::Unchanged { rank: i + 1 },
            None => {
                self.entries.push(entry);
                false
            }
        };

        // Stable: equal scores keep their insertion order
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);

        match self.rank_of(&email) {
            Some(rank) if improved => SubmitOutcome::Improved { rank },
            Some(rank) => SubmitOutcome::Inserted { rank },
            None => SubmitOutcome::Rejected,
        }
    }
}

/// Leaderboard persisted through a key-value store
///
/// Every operation is a full read-modify-write of the stored table.
#[derive(Debug, Clone)]
pub struct LeaderboardStore<S> {
    store: S,
}

impl<S: KeyValueStore> LeaderboardStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the table. Missing, unreadable or corrupt data is an empty table.
    pub fn load(&self) -> Leaderboard {
        let json = match self.store.get(STORAGE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return Leaderboard::new(),
            Err(err) => {
                log::warn!("Could not read leaderboard, starting empty: {err}");
                return Leaderboard::new();
            }
        };

        match serde_json::from_str::<Vec<LeaderboardEntry>>(&json) {
            Ok(rows) => {
                let board = Leaderboard::from_entries(rows);
                log::debug!("Loaded {} leaderboard entries", board.len());
                board
            }
            Err(err) => {
                log::warn!("Corrupt leaderboard data, treating as empty: {err}");
                Leaderboard::new()
            }
        }
    }

    /// Ranked rows, at most `MAX_ENTRIES`
    pub fn fetch(&self) -> Vec<LeaderboardEntry> {
        self.load().into_entries()
    }

    /// Merge `entry` into the stored table and persist the result
    pub fn submit(&mut self, entry: LeaderboardEntry) -> Result<SubmitOutcome, StorageError> {
        let mut board = self.load();
        let outcome = board.submit(entry);
        self.save(&board)?;
        log::info!(
            "Leaderboard submit: {:?} ({} entries)",
            outcome,
            board.len()
        );
        Ok(outcome)
    }

    /// Remove all stored rows
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.remove(STORAGE_KEY)?;
        log::info!("Leaderboard cleared");
        Ok(())
    }

    fn save(&mut self, board: &Leaderboard) -> Result<(), StorageError> {
        let json = serde_json::to_string(board)
            .map_err(|err| StorageError::Backend(err.to_string()))?;
        self.store.set(STORAGE_KEY, &json)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, UnavailableStore};
    use proptest::prelude::*;

    fn entry(email: &str, score: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            name: format!("Driver {email}"),
            surname: None,
            company: Some("Acme".to_string()),
            email: email.to_string(),
            score,
            level: (score / 100) as u32 + 1,
        }
    }

    #[test]
    fn test_lower_resubmission_is_noop() {
        let mut store = LeaderboardStore::new(MemoryStore::new());
        store.submit(entry("a@x.com", 50)).unwrap();
        let outcome = store.submit(entry("a@x.com", 30)).unwrap();
        assert_eq!(outcome, SubmitOutcome::Unchanged { rank: 1 });

        let rows = store.fetch();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].score, 50);
    }

    #[test]
    fn test_unreadable_store_loads_empty_and_submit_fails() {
        let mut store = LeaderboardStore::new(UnavailableStore);
        assert!(store.fetch().is_empty());
        assert!(store.load().is_empty());
        assert!(matches!(
            store.submit(entry("a@x.com", 50)),
            Err(StorageError::Unavailable)
        ));
        assert!(matches!(store.clear(), Err(StorageError::Unavailable)));
    }

    #[test]
    fn test_equal_resubmission_is_noop() {
        let mut board = Leaderboard::new();
        board.submit(entry("a@x.com", 50));
        let mut renamed = entry("a@x.com", 50);
        renamed.name = "Someone Else".to_string();
        board.submit(renamed);
        assert_eq!(board.entries()[0].name, "Driver a@x.com");
    }

    #[test]
    fn test_higher_resubmission_replaces_and_reranks() {
        let mut board = Leaderboard::new();
        board.submit(entry("a@x.com", 100));
        board.submit(entry("b@x.com", 200));
        assert_eq!(board.rank_of("a@x.com"), Some(2));

        let outcome = board.submit(entry("a@x.com", 300));
        assert_eq!(outcome, SubmitOutcome::Improved { rank: 1 });
        assert_eq!(board.len(), 2);
        assert_eq!(board.top_score(), Some(300));
    }

    #[test]
    fn test_eleventh_lowest_is_dropped() {
        let mut board = Leaderboard::new();
        for i in 0..10 {
            board.submit(entry(&format!("p{i}@x.com"), 100 + i * 10));
        }
        let outcome = board.submit(entry("low@x.com", 5));
        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert_eq!(board.len(), MAX_ENTRIES);
        assert_eq!(board.rank_of("low@x.com"), None);
        assert_eq!(board.entries().last().map(|e| e.score), Some(100));
    }

    #[test]
    fn test_eleventh_high_pushes_out_lowest() {
        let mut board = Leaderboard::new();
        for i in 0..10 {
            board.submit(entry(&format!("p{i}@x.com"), 100 + i * 10));
        }
        let outcome = board.submit(entry("ace@x.com", 1000));
        assert_eq!(outcome, SubmitOutcome::Inserted { rank: 1 });
        assert_eq!(board.len(), MAX_ENTRIES);
        assert_eq!(board.rank_of("p0@x.com"), None);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut board = Leaderboard::new();
        board.submit(entry("first@x.com", 70));
        board.submit(entry("second@x.com", 70));
        board.submit(entry("third@x.com", 90));
        let emails: Vec<_> = board.entries().iter().map(|e| e.email.as_str()).collect();
        assert_eq!(emails, ["third@x.com", "first@x.com", "second@x.com"]);
    }

    #[test]
    fn test_potential_rank() {
        let mut board = Leaderboard::new();
        assert_eq!(board.potential_rank(0), Some(1));
        for i in 0..10 {
            board.submit(entry(&format!("p{i}@x.com"), 100 + i * 10));
        }
        assert_eq!(board.potential_rank(500), Some(1));
        // Ties rank below the existing row
        assert_eq!(board.potential_rank(150), Some(6));
        assert_eq!(board.potential_rank(100), None);
    }

    #[test]
    fn test_corrupt_storage_is_empty() {
        let mut kv = MemoryStore::new();
        kv.set(STORAGE_KEY, "{not an array").unwrap();
        let mut store = LeaderboardStore::new(kv);
        assert!(store.fetch().is_empty());

        // Submitting over corrupt data overwrites it
        store.submit(entry("a@x.com", 40)).unwrap();
        assert_eq!(store.fetch().len(), 1);
    }

    #[test]
    fn test_unnormalized_storage_is_repaired() {
        let mut kv = MemoryStore::new();
        let rows: Vec<_> = (0..15)
            .map(|i| entry(&format!("p{}@x.com", i % 12), i * 10))
            .collect();
        kv.set(STORAGE_KEY, &serde_json::to_string(&rows).unwrap())
            .unwrap();
        let rows = LeaderboardStore::new(kv).fetch();
        assert_eq!(rows.len(), MAX_ENTRIES);
        assert!(rows.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(rows[0].score, 140);
    }

    #[test]
    fn test_reads_stored_shape() {
        let mut kv = MemoryStore::new();
        kv.set(
            STORAGE_KEY,
            r#"[{"name":"Ada Lovelace","surname":"Lovelace","company":"Engines","email":"ada@x.com","score":120,"level":2},
                {"name":"Player","email":"","score":10,"level":1}]"#,
        )
        .unwrap();
        let rows = LeaderboardStore::new(kv).fetch();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].surname.as_deref(), Some("Lovelace"));
        assert_eq!(rows[1].company, None);
    }

    #[test]
    fn test_optional_fields_omitted_when_absent() {
        let mut row = entry("a@x.com", 10);
        row.company = None;
        let json = serde_json::to_string(&row).unwrap();
        assert!(!json.contains("surname"));
        assert!(!json.contains("company"));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut store = LeaderboardStore::new(MemoryStore::new());
        store.submit(entry("a@x.com", 10)).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.fetch().is_empty());
        assert!(store.store().is_empty());
    }

    proptest! {
        #[test]
        fn prop_table_invariants(
            submissions in prop::collection::vec((0usize..15, 0u64..2000), 0..60),
        ) {
            let mut board = Leaderboard::new();
            let mut best: std::collections::HashMap<usize, u64> = Default::default();

            for (who, score) in submissions {
                let email = format!("p{who}@x.com");
                let before = board.entries().iter().find(|e| e.email == email).cloned();
                board.submit(entry(&email, score));

                prop_assert!(board.len() <= MAX_ENTRIES);
                prop_assert!(board.entries().windows(2).all(|w| w[0].score >= w[1].score));

                let mut emails: Vec<_> = board.entries().iter().map(|e| &e.email).collect();
                emails.sort();
                emails.dedup();
                prop_assert_eq!(emails.len(), board.len());

                if let Some(prev) = before {
                    let now = board.entries().iter().find(|e| e.email == email);
                    if score <= prev.score {
                        prop_assert_eq!(now, Some(&prev));
                    }
                }

                let b = best.entry(who).or_insert(score);
                *b = (*b).max(score);
                if let Some(row) = board.entries().iter().find(|e| e.email == email) {
                    prop_assert!(row.score <= best[&who]);
                }
            }
        }
    }
}
