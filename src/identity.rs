//! Player identity
//!
//! Collected by the host before a session starts and kept for the lifetime
//! of the browser tab. The simulation never looks inside it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::leaderboard::LeaderboardEntry;
use crate::persistence::{KeyValueStore, StorageError};

/// Name shown when the player left the name blank
pub const DEFAULT_NAME: &str = "Player";

/// Form validation failures, in field order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("First name is required")]
    MissingName,
    #[error("Surname is required")]
    MissingSurname,
    #[error("Company is required")]
    MissingCompany,
    #[error("Email is required")]
    MissingEmail,
    #[error("Please enter a valid email")]
    InvalidEmail,
}

/// Who is playing this session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerIdentity {
    pub name: String,
    pub surname: String,
    pub company: String,
    /// Leaderboard key
    pub email: String,
}

impl PlayerIdentity {
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        company: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
            company: company.into(),
            email: email.into(),
        }
    }

    /// Fill blanks the way the host does before play starts
    pub fn with_defaults(mut self) -> Self {
        if self.name.trim().is_empty() && self.surname.trim().is_empty() {
            self.name = DEFAULT_NAME.to_string();
        }
        self
    }

    /// "First Last", or just whichever part is present
    pub fn full_name(&self) -> String {
        match (self.name.trim(), self.surname.trim()) {
            ("", "") => DEFAULT_NAME.to_string(),
            (name, "") => name.to_string(),
            ("", surname) => surname.to_string(),
            (name, surname) => format!("{name} {surname}"),
        }
    }

    /// Validate the entry form; reports the first failing field
    pub fn validate(&self) -> Result<(), IdentityError> {
        if self.name.trim().is_empty() {
            return Err(IdentityError::MissingName);
        }
        if self.surname.trim().is_empty() {
            return Err(IdentityError::MissingSurname);
        }
        if self.company.trim().is_empty() {
            return Err(IdentityError::MissingCompany);
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(IdentityError::MissingEmail);
        }
        if !is_valid_email(email) {
            return Err(IdentityError::InvalidEmail);
        }
        Ok(())
    }

    /// Leaderboard row for a finished session
    pub fn to_entry(&self, score: u64, level: u32) -> LeaderboardEntry {
        let non_empty = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        LeaderboardEntry {
            name: self.full_name(),
            surname: non_empty(&self.surname),
            company: non_empty(&self.company),
            email: self.email.trim().to_string(),
            score,
            level,
        }
    }

    /// Storage key
    const STORAGE_KEY: &'static str = "playerIdentity";

    /// Load the identity; anything unreadable yields the defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<PlayerIdentity>(&json) {
                Ok(identity) => return identity.with_defaults(),
                Err(err) => log::warn!("Corrupt player identity, using defaults: {err}"),
            },
            Ok(None) => log::info!("No player identity stored"),
            Err(err) => log::warn!("Could not read player identity: {err}"),
        }
        Self::default().with_defaults()
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(self).map_err(|err| StorageError::Backend(err.to_string()))?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Player identity saved");
        Ok(())
    }
}

/// Something like `local@domain.tld`: no whitespace, a non-empty local
/// part, and a dot inside the domain
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    email
        .char_indices()
        .filter(|&(_, c)| c == '@')
        .any(|(at, _)| {
            let domain = &email[at + 1..];
            at > 0
                && domain
                    .char_indices()
                    .any(|(dot, c)| c == '.' && dot > 0 && dot + 1 < domain.len())
        })
}
