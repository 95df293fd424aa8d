//! Turn/Match codec: domain aggregates to and from stored records.
//!
//! Pure transformations. Every function here is the inverse of its
//! counterpart for well-formed input.

use chrono::{TimeZone, Utc};

use cueball_domain::{
    AdvStats, Angle, BreakType, GameType, HowType, Match, Participant, PlayerTurn, ShotType,
    StatsDetail, SubType, Turn, TurnEnd,
};

use crate::enum_set::{decode_member, decode_set, encode_member, encode_set};
use crate::error::{CodecError, CodecResult};
use crate::records::{AdvStatsRecord, MatchRecord, TurnRecord, TurnRecords};
use crate::table_status::{decode_table, encode_table};

// =============================================================================
// AdvStats
// =============================================================================

/// Encode shot statistics
pub fn adv_stats_to_record(stats: &AdvStats) -> CodecResult<AdvStatsRecord> {
    Ok(AdvStatsRecord {
        shot_type: encode_member(stats.shot_type),
        shot_sub_type: encode_member(stats.sub_type),
        how_types: encode_set(&stats.how_types)?,
        angles: encode_set(&stats.angles)?,
        cb_to_ob: stats.cb_to_ob,
        ob_to_aim_point: stats.ob_to_pocket,
        speed: stats.speed,
        cue_x: stats.cue_x,
        cue_y: stats.cue_y,
        player: stats.player.clone(),
    })
}

/// Decode shot statistics
pub fn record_to_adv_stats(record: &AdvStatsRecord) -> CodecResult<AdvStats> {
    Ok(AdvStats::new(record.player.clone())
        .with_shot_type(decode_member::<ShotType>(record.shot_type)?)
        .with_sub_type(decode_member::<SubType>(record.shot_sub_type)?)
        .with_how_types(decode_set::<HowType>(record.how_types)?)
        .with_angles(decode_set::<Angle>(record.angles)?)
        .with_distances(record.cb_to_ob, record.ob_to_aim_point)
        .with_speed(record.speed)
        .with_cueing(record.cue_x, record.cue_y))
}

// =============================================================================
// Turn
// =============================================================================

/// Encode a turn.
///
/// The shooter id is written both on the turn and inside its statistics.
pub fn turn_to_record(turn: &Turn) -> CodecResult<TurnRecord> {
    Ok(TurnRecord {
        turn_end: encode_member(turn.turn_end),
        game_type: encode_member(turn.game_type()),
        table_status: encode_table(&turn.table),
        is_foul: turn.foul,
        is_serious_foul: turn.serious_foul,
        adv_stats: adv_stats_to_record(&turn.adv_stats)?,
        player_id: turn.player_id().to_string(),
    })
}

/// Decode a turn.
///
/// # Errors
/// - Any table-status or ordinal error from the nested codecs
/// - `CodecError::MalformedRecord` if the turn's game type disagrees with its table
pub fn record_to_turn(record: &TurnRecord) -> CodecResult<Turn> {
    let table = decode_table(&record.table_status)?;
    let game_type = decode_member::<GameType>(record.game_type)?;
    if game_type != table.game_type() {
        return Err(CodecError::malformed(format!(
            "turn game type {} does not match table game type {}",
            game_type,
            table.game_type()
        )));
    }

    let mut adv_stats = record_to_adv_stats(&record.adv_stats)?;
    if adv_stats.player.is_empty() {
        adv_stats.player = record.player_id.clone();
    }

    Ok(Turn::new(
        decode_member::<TurnEnd>(record.turn_end)?,
        table,
        record.is_foul,
        record.is_serious_foul,
        adv_stats,
    ))
}

// =============================================================================
// Match
// =============================================================================

/// Encode a match, keying its turns `key_0`, `key_1`, ... in play order.
pub fn match_to_record(m: &Match) -> CodecResult<MatchRecord> {
    let turns = m
        .turns()
        .iter()
        .map(turn_to_record)
        .collect::<CodecResult<TurnRecords>>()?;

    Ok(MatchRecord {
        match_id: m.id.clone(),
        player_id: m.player.id.clone(),
        opponent_id: m.opponent.id.clone(),
        player_name: m.player.name.clone(),
        opponent_name: m.opponent.name.clone(),
        game_type: encode_member(m.game_type),
        turn: encode_member(m.first_turn),
        break_type: encode_member(m.break_type),
        player_rank: m.player.rank,
        opponent_rank: m.opponent.rank,
        notes: m.notes.clone(),
        location: m.location.clone(),
        date: m.created_at.timestamp_millis(),
        details: encode_set(&m.details)?,
        max_attempts_per_game: m.max_attempts_per_game,
        turns,
    })
}

/// Decode a match, restoring its turns in the record's entry order.
pub fn record_to_match(record: &MatchRecord) -> CodecResult<Match> {
    let player = Participant::new(record.player_id.clone(), record.player_name.clone())?
        .with_rank(record.player_rank);
    let opponent = Participant::new(record.opponent_id.clone(), record.opponent_name.clone())?
        .with_rank(record.opponent_rank);

    let created_at = Utc
        .timestamp_millis_opt(record.date)
        .single()
        .ok_or_else(|| CodecError::malformed(format!("match date out of range: {}", record.date)))?;

    let game_type = decode_member::<GameType>(record.game_type)?;
    let mut m = Match::new(player, opponent, game_type)?
        .with_id(record.match_id.clone())
        .with_first_turn(decode_member::<PlayerTurn>(record.turn)?)
        .with_break_type(decode_member::<BreakType>(record.break_type)?)
        .with_notes(record.notes.clone())
        .with_location(record.location.clone())
        .with_created_at(created_at)
        .with_details(decode_set::<StatsDetail>(record.details)?)
        .with_max_attempts_per_game(record.max_attempts_per_game);

    for (_, turn) in record.turns.iter() {
        m.add_turn(record_to_turn(turn)?)?;
    }

    Ok(m)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cueball_domain::{BallStatus, DomainError, TableStatus};
    use proptest::prelude::*;
    use strum::IntoEnumIterator;

    fn nine_ball_turn(player: &str, made: &[usize]) -> Turn {
        let mut table = TableStatus::new(GameType::BcaNineBall).unwrap();
        table.set_balls(BallStatus::Made, made).unwrap();
        Turn::new(
            TurnEnd::Miss,
            table,
            false,
            false,
            AdvStats::new(player)
                .with_shot_type(ShotType::Cut)
                .with_how_types([HowType::Thin, HowType::AimLeft])
                .with_angles([Angle::Thirty])
                .with_distances(1.5, 0.25)
                .with_speed(3)
                .with_cueing(10, -20),
        )
    }

    fn sample_match(turns: usize) -> Match {
        let player = Participant::new("p1", "Alice").unwrap();
        let opponent = Participant::new("p2", "Bob").unwrap().with_rank(42);
        let mut m = Match::new(player, opponent, GameType::BcaNineBall)
            .unwrap()
            .with_notes("league night")
            .with_location("Hall 3")
            .with_break_type(BreakType::Winner)
            .with_details([StatsDetail::CueingPlayer, StatsDetail::AngleOpponent]);
        for i in 0..turns {
            let shooter = if i % 2 == 0 { "p1" } else { "p2" };
            m.add_turn(nine_ball_turn(shooter, &[(i % 8) + 1])).unwrap();
        }
        m
    }

    #[test]
    fn test_turn_round_trip() {
        let turn = nine_ball_turn("p1", &[1, 2]);

        let record = turn_to_record(&turn).unwrap();

        assert_eq!(record.game_type, 2);
        assert_eq!(record.table_status, "2,2,2,0,0,0,0,0,0,0");
        assert_eq!(record.player_id, "p1");
        assert_eq!(record_to_turn(&record).unwrap(), turn);
    }

    #[test]
    fn test_turn_game_type_disagreement() {
        let mut record = turn_to_record(&nine_ball_turn("p1", &[])).unwrap();
        record.game_type = 0;

        assert!(matches!(record_to_turn(&record), Err(CodecError::MalformedRecord(_))));
    }

    #[test]
    fn test_turn_player_falls_back_to_record() {
        let mut record = turn_to_record(&nine_ball_turn("p1", &[])).unwrap();
        record.adv_stats.player.clear();

        assert_eq!(record_to_turn(&record).unwrap().player_id(), "p1");
    }

    #[test]
    fn test_turn_invalid_turn_end() {
        let mut record = turn_to_record(&nine_ball_turn("p1", &[])).unwrap();
        record.turn_end = 12;

        assert!(matches!(
            record_to_turn(&record),
            Err(CodecError::InvalidOrdinal { enumeration: "TurnEnd", ordinal: 12 })
        ));
    }

    #[test]
    fn test_match_round_trip_preserves_turn_order() {
        for count in [0, 1, 12] {
            let m = sample_match(count);

            let record = match_to_record(&m).unwrap();
            let restored = record_to_match(&record).unwrap();

            assert_eq!(record.turns.len(), count);
            assert_eq!(restored, m);
        }
    }

    #[test]
    fn test_match_keys_follow_play_order() {
        let record = match_to_record(&sample_match(11)).unwrap();

        let keys: Vec<&str> = record.turns.iter().map(|(key, _)| key).collect();
        let expected: Vec<String> = (0..11).map(|i| format!("key_{i}")).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_match_record_fields() {
        let m = sample_match(0);
        let record = match_to_record(&m).unwrap();

        assert_eq!(record.match_id, m.id);
        assert_eq!(record.break_type, 0);
        assert_eq!(record.details, (1 << 6) | (1 << 19));
        assert_eq!(record.opponent_rank, 42);
        assert_eq!(record.date, m.created_at.timestamp_millis());
    }

    #[test]
    fn test_match_survives_json() {
        let m = sample_match(3);

        let json = serde_json::to_string(&match_to_record(&m).unwrap()).unwrap();
        let record: MatchRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record_to_match(&record).unwrap(), m);
    }

    #[test]
    fn test_match_rejects_foreign_turn() {
        let mut record = match_to_record(&sample_match(1)).unwrap();
        let mut foreign = record.turns.iter().next().unwrap().1.clone();
        foreign.game_type = 1;
        foreign.table_status = format!("1{}", ",0".repeat(10));
        record.turns.push(foreign);

        assert!(matches!(
            record_to_match(&record),
            Err(CodecError::Domain(DomainError::GameTypeMismatch { .. }))
        ));
    }

    fn turn_strategy() -> impl Strategy<Value = Turn> {
        let game_types: Vec<GameType> = GameType::iter()
            .filter(|g| g.table_size().is_some() && !g.is_straight_pool())
            .collect();
        let statuses: Vec<BallStatus> = BallStatus::iter().collect();

        (
            prop::sample::select(game_types),
            prop::sample::select(TurnEnd::iter().collect::<Vec<_>>()),
            any::<bool>(),
            any::<bool>(),
            prop::sample::select(ShotType::iter().collect::<Vec<_>>()),
            prop::sample::select(SubType::iter().collect::<Vec<_>>()),
            prop::sample::subsequence(HowType::iter().collect::<Vec<_>>(), 0..=4),
            prop::sample::subsequence(Angle::iter().collect::<Vec<_>>(), 0..=4),
            (-1.0f32..100.0, -1.0f32..100.0, -1i32..10, -200i32..200, -200i32..200),
        )
            .prop_flat_map(move |(game_type, turn_end, foul, serious, shot, sub, how, angles, numbers)| {
                let size = game_type.table_size().unwrap_or_default();
                prop::collection::vec(prop::sample::select(statuses.clone()), size).prop_map(
                    move |balls| {
                        let (cb, ob, speed, x, y) = numbers;
                        Turn::new(
                            turn_end,
                            TableStatus::from_parts(game_type, balls).unwrap(),
                            foul,
                            serious,
                            AdvStats::new("shooter")
                                .with_shot_type(shot)
                                .with_sub_type(sub)
                                .with_how_types(how.clone())
                                .with_angles(angles.clone())
                                .with_distances(cb, ob)
                                .with_speed(speed)
                                .with_cueing(x, y),
                        )
                    },
                )
            })
    }

    proptest! {
        /// Property: record_to_turn inverts turn_to_record
        #[test]
        fn prop_turn_round_trip(turn in turn_strategy()) {
            let record = turn_to_record(&turn).unwrap();
            prop_assert_eq!(record_to_turn(&record).unwrap(), turn);
        }
    }
}
