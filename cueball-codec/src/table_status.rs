//! Table-status codec.
//!
//! Canonical stored form: `<gameTypeOrdinal>,<state_1>,...,<state_N>` where
//! `N` is the table size of the game type and each state is a
//! [`BallStatus`] ordinal. No trailing delimiter.

use cueball_domain::{BallStatus, GameType, TableStatus};

use crate::enum_set::{decode_member, encode_member};
use crate::error::{CodecError, CodecResult};

const DELIMITER: &str = ",";

fn expected_size(game_type: GameType) -> CodecResult<usize> {
    game_type
        .table_size()
        .ok_or(CodecError::UnsupportedGameType(game_type))
}

fn write_statuses(game_type: GameType, balls: &[BallStatus]) -> String {
    std::iter::once(encode_member(game_type))
        .chain(balls.iter().map(|&status| encode_member(status)))
        .map(|ordinal| ordinal.to_string())
        .collect::<Vec<_>>()
        .join(DELIMITER)
}

/// Serialize a game type and its ball states (ball 1 first).
///
/// # Errors
/// - `CodecError::UnsupportedGameType` if the game type has no table
/// - `CodecError::SizeMismatch` if `balls` is not exactly one rack
pub fn serialize(game_type: GameType, balls: &[BallStatus]) -> CodecResult<String> {
    let expected = expected_size(game_type)?;
    if balls.len() != expected {
        return Err(CodecError::SizeMismatch {
            game_type,
            expected,
            actual: balls.len(),
        });
    }
    Ok(write_statuses(game_type, balls))
}

/// Parse a stored table status.
///
/// Tokens after the first are assigned to balls `1, 2, ...` in order.
///
/// # Errors
/// - `CodecError::MalformedRecord` if a token is not an integer or names no member
/// - `CodecError::UnsupportedGameType` if the game type has no table
/// - `CodecError::SizeMismatch` if the state count differs from the table size
pub fn deserialize(value: &str) -> CodecResult<(GameType, Vec<BallStatus>)> {
    let mut tokens = value.split(DELIMITER);

    let game_type = tokens
        .next()
        .ok_or_else(|| CodecError::malformed("empty table status"))
        .and_then(|token| parse_token::<GameType>(token, 0))?;

    let balls = tokens
        .enumerate()
        .map(|(index, token)| parse_token::<BallStatus>(token, index + 1))
        .collect::<CodecResult<Vec<_>>>()?;

    let expected = expected_size(game_type)?;
    if balls.len() != expected {
        return Err(CodecError::SizeMismatch {
            game_type,
            expected,
            actual: balls.len(),
        });
    }

    Ok((game_type, balls))
}

fn parse_token<E: cueball_domain::Ordinal>(token: &str, position: usize) -> CodecResult<E> {
    let ordinal = token.parse::<i32>().map_err(|_| {
        CodecError::malformed(format!(
            "table status token {} is not an integer: {:?}",
            position, token
        ))
    })?;
    decode_member::<E>(ordinal).map_err(|_| {
        CodecError::malformed(format!(
            "table status token {} is not a valid {} ordinal: {}",
            position,
            E::NAME,
            ordinal
        ))
    })
}

/// Stored form of a table
pub fn encode_table(table: &TableStatus) -> String {
    write_statuses(table.game_type(), table.balls())
}

/// Rebuild a table from its stored form
pub fn decode_table(value: &str) -> CodecResult<TableStatus> {
    let (game_type, balls) = deserialize(value)?;
    Ok(TableStatus::from_parts(game_type, balls)?)
}

// =============================================================================
// Tests
// =============================================================================
