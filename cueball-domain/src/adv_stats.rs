//! Advanced shot statistics attached to a turn.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum_macros::{EnumCount, EnumIter};

use crate::ordinal::impl_ordinal;

/// Sentinel for a distance that was not recorded
pub const UNSET_DISTANCE: f32 = -1.0;
/// Sentinel for a speed that was not recorded
pub const UNSET_SPEED: i32 = -1;
/// Sentinel for a cue contact coordinate that was not recorded
pub const UNSET_CUE: i32 = -200;

// =============================================================================
// Shot classification
// =============================================================================

/// Kind of shot attempted.
///
/// Persisted by ordinal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter, EnumCount,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShotType {
    /// No shot type recorded
    #[default]
    None,
    /// Cut shot
    Cut,
    /// Straight-in shot
    StraightShot,
    /// Bank shot
    Bank,
    /// Kick shot
    Kick,
    /// Combination
    Combo,
    /// Carom
    Carom,
    /// Jump shot
    Jump,
    /// Massé
    Masse,
    /// Safety
    Safety,
    /// Failed safety
    SafetyError,
    /// Break shot
    BreakShot,
}

/// Refinement of the shot type.
///
/// Persisted by ordinal. The first five members describe safeties.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter, EnumCount,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubType {
    /// Opponent fully hooked
    FullHook,
    /// Opponent partially hooked
    PartialHook,
    /// Long table safety
    LongT,
    /// Short table safety
    ShortT,
    /// No direct shot left
    NoDirectShot,
    /// Open shot left
    Open,
    /// Wing cut
    WingCut,
    /// Back cut
    BackCut,
    /// Rail cut
    RailCut,
    /// No sub type recorded
    #[default]
    None,
}

impl SubType {
    /// Whether this sub type describes a safety
    pub fn is_safety(self) -> bool {
        matches!(
            self,
            Self::FullHook | Self::PartialHook | Self::LongT | Self::ShortT | Self::NoDirectShot
        )
    }
}

/// How a shot was missed.
///
/// Persisted as a bitmask of ordinals.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter, EnumCount,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HowType {
    /// Miscue
    Miscue,
    /// Hit too hard
    TooHard,
    /// Hit too soft
    TooSoft,
    /// Aimed left of the target
    AimLeft,
    /// Aimed right of the target
    AimRight,
    /// Ball kicked in
    KickedIn,
    /// Hit too thin
    Thin,
    /// Hit too thick
    Thick,
    /// Kick came up long
    KickLong,
    /// Kick came up short
    KickShort,
    /// Bank came up long
    BankLong,
    /// Bank came up short
    BankShort,
    /// Massé curved too early
    CurveEarly,
    /// Massé curved too late
    CurveLate,
}

/// Angle qualifiers for a shot.
///
/// Persisted as a bitmask of ordinals.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter, EnumCount,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Angle {
    /// One rail kick or bank
    OneRail,
    /// Two rails
    TwoRail,
    /// Three rails
    ThreeRail,
    /// Four rails
    FourRail,
    /// Five rails
    FiveRail,
    /// Natural angle
    Natural,
    /// Crossover bank
    Crossover,
    /// Along the long rail
    LongRail,
    /// Along the short rail
    ShortRail,
    /// 5 degree cut
    Five,
    /// 10 degree cut
    Ten,
    /// 15 degree cut
    Fifteen,
    /// 20 degree cut
    Twenty,
    /// 25 degree cut
    TwentyFive,
    /// 30 degree cut
    Thirty,
    /// 35 degree cut
    ThirtyFive,
    /// 40 degree cut
    Forty,
    /// 45 degree cut
    FortyFive,
    /// 50 degree cut
    Fifty,
    /// 55 degree cut
    FiftyFive,
    /// 60 degree cut
    Sixty,
    /// 65 degree cut
    SixtyFive,
    /// 70 degree cut
    Seventy,
    /// 75 degree cut
    SeventyFive,
    /// 80 degree cut
    Eighty,
    /// Shallow angle
    Shallow,
    /// Medium angle
    Medium,
    /// Steep angle
    Steep,
}

impl_ordinal!(ShotType, SubType, HowType, Angle);

// =============================================================================
// AdvStats
// =============================================================================

/// Detailed description of one shot.
///
/// Fields that were not recorded keep their sentinel values
/// ([`UNSET_DISTANCE`], [`UNSET_SPEED`], [`UNSET_CUE`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvStats {
    /// Id of the player who took the shot
    pub player: String,
    /// Kind of shot
    pub shot_type: ShotType,
    /// Refinement of the shot kind
    pub sub_type: SubType,
    /// How the shot was missed
    pub how_types: BTreeSet<HowType>,
    /// Angle qualifiers
    pub angles: BTreeSet<Angle>,
    /// Cue ball to object ball distance
    pub cb_to_ob: f32,
    /// Object ball to pocket distance
    pub ob_to_pocket: f32,
    /// Shot speed
    pub speed: i32,
    /// Cue contact point, horizontal
    pub cue_x: i32,
    /// Cue contact point, vertical
    pub cue_y: i32,
}

impl AdvStats {
    /// Create empty statistics for a player's shot.
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            shot_type: ShotType::None,
            sub_type: SubType::None,
            how_types: BTreeSet::new(),
            angles: BTreeSet::new(),
            cb_to_ob: UNSET_DISTANCE,
            ob_to_pocket: UNSET_DISTANCE,
            speed: UNSET_SPEED,
            cue_x: UNSET_CUE,
            cue_y: UNSET_CUE,
        }
    }

    /// Set the shot type
    pub fn with_shot_type(mut self, shot_type: ShotType) -> Self {
        self.shot_type = shot_type;
        self
    }

    /// Set the sub type
    pub fn with_sub_type(mut self, sub_type: SubType) -> Self {
        self.sub_type = sub_type;
        self
    }

    /// Set how the shot was missed
    pub fn with_how_types(mut self, how_types: impl IntoIterator<Item = HowType>) -> Self {
        self.how_types = how_types.into_iter().collect();
        self
    }

    /// Set the angle qualifiers
    pub fn with_angles(mut self, angles: impl IntoIterator<Item = Angle>) -> Self {
        self.angles = angles.into_iter().collect();
        self
    }

    /// Set both ball distances
    pub fn with_distances(mut self, cb_to_ob: f32, ob_to_pocket: f32) -> Self {
        self.cb_to_ob = cb_to_ob;
        self.ob_to_pocket = ob_to_pocket;
        self
    }

    /// Set the shot speed
    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed;
        self
    }

    /// Set the cue contact point
    pub fn with_cueing(mut self, cue_x: i32, cue_y: i32) -> Self {
        self.cue_x = cue_x;
        self.cue_y = cue_y;
        self
    }

    /// Both cue contact coordinates were recorded
    pub fn is_cueing_valid(&self) -> bool {
        self.cue_x > UNSET_CUE && self.cue_y > UNSET_CUE
    }

    /// Speed was recorded
    pub fn is_speed_valid(&self) -> bool {
        self.speed > UNSET_SPEED
    }

    /// Nothing beyond the player id was recorded
    pub fn is_empty(&self) -> bool {
        *self == Self::new(self.player.clone())
    }
}

// =============================================================================
// Tests
// =============================================================================
