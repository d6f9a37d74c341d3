//! Local persistence: accounts, score history, login history and the
//! leaderboard, kept as one versionless JSON record.
//!
//! The host owns the actual storage (the browser's `localStorage`); this module
//! only loads from and serializes to the raw string. A missing or unreadable
//! record loads as empty.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::StoreError;

/// Key the browser shell stores the record under.
pub const STORAGE_KEY: &str = "snake_game_data";

/// Leaderboard size when the caller does not ask for one.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

/// What the simulation core needs from persistence.
pub trait ScoreStore {
    /// Append a finished run. Called once per run that scored anything.
    fn record_score(&mut self, user: &str, score: u32);

    /// Best score of `user`, 0 when there is no history.
    fn high_score(&self, user: &str) -> u32;
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u32,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: DateTime<Utc>,
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Lowercase hex SHA-256 of the password.
    pub password: String,
    #[serde(default, deserialize_with = "lenient_dates")]
    pub login_history: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub scores: Vec<ScoreEntry>,
}

impl UserRecord {
    /// The best entry; the earliest one wins a tie.
    #[must_use]
    pub fn best(&self) -> Option<&ScoreEntry> {
        self.scores
            .iter()
            .reduce(|best, e| if e.score > best.score { e } else { best })
    }
}

/// The serialized document.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalRecord {
    #[serde(default)]
    pub users: BTreeMap<String, UserRecord>,
    #[serde(default)]
    pub current_user: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u32,
    pub date: DateTime<Utc>,
}

/// Convert a host timestamp (milliseconds since the epoch) to a UTC time.
/// Out-of-range values clamp to the epoch.
#[must_use]
pub fn timestamp(ms: f64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms as i64).unwrap_or_default()
}

/// RFC 3339 strings and epoch milliseconds are understood; anything else
/// (locale-formatted strings from older builds) becomes the Unix epoch.
fn parse_date(raw: &Value) -> DateTime<Utc> {
    let parsed = match raw {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        Value::Number(n) => n.as_f64().map(timestamp),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        warn!(date = %raw, "unreadable date in local record");
        DateTime::default()
    })
}

fn lenient_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    Value::deserialize(deserializer).map(|raw| parse_date(&raw))
}

fn lenient_dates<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<DateTime<Utc>>, D::Error> {
    Vec::<Value>::deserialize(deserializer).map(|raw| raw.iter().map(parse_date).collect())
}

/// The record plus the host's notion of "now", used to date new scores.
#[derive(Debug, Default)]
pub struct LocalStore {
    record: LocalRecord,
    now: DateTime<Utc>,
}

impl LocalStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the raw stored string. `None`, empty or structurally corrupt
    /// input gives an empty store, and the next save overwrites whatever was
    /// there. Individual dates that fail to parse load as the Unix epoch and
    /// keep their accounts.
    #[must_use]
    pub fn load(raw: Option<&str>) -> Self {
        let record = match raw.map(str::trim) {
            None | Some("") => LocalRecord::default(),
            Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
                warn!(error = %e, "discarding unreadable local record");
                LocalRecord::default()
            }),
        };
        Self {
            record,
            now: DateTime::default(),
        }
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(&self.record)?)
    }

    #[must_use]
    pub fn record(&self) -> &LocalRecord {
        &self.record
    }

    /// Set the time stamped on scores recorded through [`ScoreStore`].
    pub fn set_now(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }

    #[must_use]
    pub fn user_exists(&self, username: &str) -> bool {
        self.record.users.contains_key(username)
    }

    #[must_use]
    pub fn user(&self, username: &str) -> Option<&UserRecord> {
        self.record.users.get(username)
    }

    /// Insert a new account. Returns `false` if the name is taken.
    pub fn register_user(&mut self, username: &str, password_hash: String) -> bool {
        if self.user_exists(username) {
            return false;
        }
        self.record.users.insert(
            username.to_owned(),
            UserRecord {
                password: password_hash,
                ..UserRecord::default()
            },
        );
        true
    }

    #[must_use]
    pub fn verify_password(&self, username: &str, password_hash: &str) -> bool {
        self.user(username)
            .is_some_and(|u| u.password == password_hash)
    }

    /// Append a score dated `at`. Unknown users are ignored.
    pub fn record_score_at(&mut self, username: &str, score: u32, at: DateTime<Utc>) {
        if let Some(user) = self.record.users.get_mut(username) {
            user.scores.push(ScoreEntry { score, date: at });
        }
    }

    /// Scores in insertion order.
    #[must_use]
    pub fn scores(&self, username: &str) -> &[ScoreEntry] {
        self.user(username)
            .map(|u| u.scores.as_slice())
            .unwrap_or_default()
    }

    /// Scores sorted best first; equal scores keep their insertion order.
    #[must_use]
    pub fn score_history(&self, username: &str) -> Vec<ScoreEntry> {
        let mut sorted = self.scores(username).to_vec();
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
        sorted
    }

    /// Append a login. Unknown users are ignored.
    pub fn add_login(&mut self, username: &str, at: DateTime<Utc>) {
        if let Some(user) = self.record.users.get_mut(username) {
            user.login_history.push(at);
        }
    }

    /// Logins, most recent first.
    #[must_use]
    pub fn login_history(&self, username: &str) -> Vec<DateTime<Utc>> {
        self.user(username)
            .map(|u| u.login_history.iter().rev().copied().collect())
            .unwrap_or_default()
    }

    pub fn set_current_user(&mut self, username: &str) {
        self.record.current_user = Some(username.to_owned());
    }

    /// The remembered session user, only if the account still exists.
    #[must_use]
    pub fn current_user(&self) -> Option<&str> {
        self.record
            .current_user
            .as_deref()
            .filter(|name| self.user_exists(name))
    }

    pub fn clear_current_user(&mut self) {
        self.record.current_user = None;
    }

    /// Every user's best score, highest first, truncated to `limit`.
    #[must_use]
    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut board: Vec<LeaderboardEntry> = self
            .record
            .users
            .iter()
            .filter_map(|(name, user)| {
                user.best().map(|best| LeaderboardEntry {
                    username: name.clone(),
                    score: best.score,
                    date: best.date,
                })
            })
            .collect();
        board.sort_by(|a, b| b.score.cmp(&a.score));
        board.truncate(limit);
        board
    }
}

impl ScoreStore for LocalStore {
    fn record_score(&mut self, user: &str, score: u32) {
        let now = self.now;
        self.record_score_at(user, score, now);
    }

    fn high_score(&self, user: &str) -> u32 {
        self.user(user).and_then(UserRecord::best).map_or(0, |e| e.score)
    }
}

/// Score history without accounts, for hosts that do not need them.
#[derive(Debug, Default)]
pub struct MemoryScores {
    pub scores: HashMap<String, Vec<u32>>,
}

impl ScoreStore for MemoryScores {
    fn record_score(&mut self, user: &str, score: u32) {
        self.scores.entry(user.to_owned()).or_default().push(score);
    }

    fn high_score(&self, user: &str) -> u32 {
        self.scores
            .get(user)
            .and_then(|s| s.iter().max().copied())
            .unwrap_or(0)
    }
}
