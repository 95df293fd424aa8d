//! Flat, storage-friendly records.
//!
//! Field names match the documents already held by the remote store
//! (camelCase, enum members as ordinals, enum sets as bitmasks).

use std::collections::HashSet;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use cueball_domain::DEFAULT_MAX_ATTEMPTS_PER_GAME;

/// Prefix of the synthetic turn keys
pub const TURN_KEY_PREFIX: &str = "key_";

/// Synthetic key of the turn at `index`
pub fn turn_key(index: usize) -> String {
    format!("{}{}", TURN_KEY_PREFIX, index)
}

// =============================================================================
// AdvStatsRecord
// =============================================================================

/// Stored advanced shot statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvStatsRecord {
    /// `ShotType` ordinal
    pub shot_type: i32,
    /// `SubType` ordinal
    pub shot_sub_type: i32,
    /// `HowType` bitmask
    pub how_types: i32,
    /// `Angle` bitmask
    pub angles: i32,
    /// Cue ball to object ball distance
    pub cb_to_ob: f32,
    /// Object ball to pocket distance
    pub ob_to_aim_point: f32,
    /// Shot speed
    pub speed: i32,
    /// Cue contact point, horizontal
    pub cue_x: i32,
    /// Cue contact point, vertical
    pub cue_y: i32,
    /// Shooter id
    pub player: String,
}

// =============================================================================
// TurnRecord
// =============================================================================

/// Stored turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRecord {
    /// `TurnEnd` ordinal
    pub turn_end: i32,
    /// `GameType` ordinal
    pub game_type: i32,
    /// Table status in its canonical string form
    pub table_status: String,
    /// Turn ended on a foul
    pub is_foul: bool,
    /// Turn ended on a game-losing foul
    pub is_serious_foul: bool,
    /// Shot details
    pub adv_stats: AdvStatsRecord,
    /// Shooter id
    pub player_id: String,
}

// =============================================================================
// TurnRecords
// =============================================================================

/// Turns of a match keyed by synthetic keys, in insertion order.
///
/// Serialized as a map. Entry order is the order turns were played; keys are
/// never sorted (`key_10` follows `key_9`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnRecords(Vec<(String, TurnRecord)>);

impl TurnRecords {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Key the next appended turn will receive
    pub fn next_key(&self) -> String {
        turn_key(self.0.len())
    }

    /// Append a turn under the next synthetic key and return that key
    pub fn push(&mut self, turn: TurnRecord) -> String {
        let key = self.next_key();
        self.0.push((key.clone(), turn));
        key
    }

    /// Remove the most recent turn
    pub fn pop(&mut self) -> Option<(String, TurnRecord)> {
        self.0.pop()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TurnRecord)> {
        self.0.iter().map(|(key, turn)| (key.as_str(), turn))
    }

    /// Turn stored under `key`
    pub fn get(&self, key: &str) -> Option<&TurnRecord> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, turn)| turn)
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// No turns stored
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<TurnRecord> for TurnRecords {
    fn from_iter<I: IntoIterator<Item = TurnRecord>>(iter: I) -> Self {
        let mut records = Self::new();
        for turn in iter {
            records.push(turn);
        }
        records
    }
}

impl Serialize for TurnRecords {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, turn) in &self.0 {
            map.serialize_entry(key, turn)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TurnRecords {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TurnRecordsVisitor)
    }
}

struct TurnRecordsVisitor;

impl<'de> Visitor<'de> for TurnRecordsVisitor {
    type Value = TurnRecords;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of turn keys to turn records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let capacity = access.size_hint().unwrap_or(0);
        let mut entries = Vec::with_capacity(capacity);
        let mut seen = HashSet::with_capacity(capacity);

        while let Some((key, turn)) = access.next_entry::<String, TurnRecord>()? {
            if !seen.insert(key.clone()) {
                return Err(de::Error::custom(format!("duplicate turn key: {}", key)));
            }
            entries.push((key, turn));
        }

        Ok(TurnRecords(entries))
    }
}

// =============================================================================
// MatchRecord
// =============================================================================

fn default_max_attempts() -> i32 {
    DEFAULT_MAX_ATTEMPTS_PER_GAME
}

/// Stored match document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    /// Match id
    pub match_id: String,
    /// Tracked player id
    pub player_id: String,
    /// Opponent id
    pub opponent_id: String,
    /// Tracked player name
    pub player_name: String,
    /// Opponent name
    pub opponent_name: String,
    /// `GameType` ordinal
    pub game_type: i32,
    /// `PlayerTurn` ordinal of the first shooter
    pub turn: i32,
    /// `BreakType` ordinal
    pub break_type: i32,
    /// Tracked player rank
    pub player_rank: i32,
    /// Opponent rank
    pub opponent_rank: i32,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
    /// Where the match was played
    #[serde(default)]
    pub location: String,
    /// Creation time, epoch milliseconds
    pub date: i64,
    /// `StatsDetail` bitmask
    #[serde(default)]
    pub details: i32,
    /// Attempts per game in ghost matches
    #[serde(default = "default_max_attempts")]
    pub max_attempts_per_game: i32,
    /// Turns in play order
    #[serde(default)]
    pub turns: TurnRecords,
}

// =============================================================================
// Tests
// =============================================================================
