//! Match-record files and one-line summaries.

use std::fs;
use std::path::Path;

use cueball_codec::{record_to_match, MatchRecord};
use cueball_domain::Match;

use crate::error::{AppError, AppResult};

/// Read a match-record JSON document and map it to a match.
pub fn load_match_file(path: impl AsRef<Path>) -> AppResult<Match> {
    let text = fs::read_to_string(path.as_ref())?;
    parse_match(&text)
}

/// Parse a match-record JSON document.
pub fn parse_match(text: &str) -> AppResult<Match> {
    let record: MatchRecord =
        serde_json::from_str(text).map_err(|e| AppError::InvalidRecord(e.to_string()))?;
    Ok(record_to_match(&record)?)
}

/// One-line description of a match
pub fn match_summary(m: &Match) -> String {
    let mut line = format!(
        "{}  {}  {} vs {}  {} turn{}",
        m.created_at.format("%Y-%m-%d"),
        m.game_type,
        m.player.name,
        m.opponent.name,
        m.turn_count(),
        if m.turn_count() == 1 { "" } else { "s" },
    );
    if !m.location.is_empty() {
        line.push_str("  @ ");
        line.push_str(&m.location);
    }
    line
}

// =============================================================================
// Tests
// =============================================================================
