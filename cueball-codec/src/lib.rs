//! Cueball Codec Layer
//!
//! Translates domain aggregates into the flat records held by the document
//! store and back.
//!
//! # Architecture
//!
//! ```text
//! Match ──► match_to_record ──► MatchRecord { turns: key_0, key_1, ... }
//!             │                       │
//!             ├─ encode_set   (enum sets → i32 bitmask)
//!             └─ encode_table (TableStatus → "gameType,s1,...,sN")
//! ```
//!
//! # Components
//!
//! - **Set codec**: enum sets packed into an `i32`, one bit per ordinal
//! - **Table-status codec**: positional, comma-separated ball states
//! - **Records**: serde shapes of the stored documents
//! - **Mapper**: `Turn`/`Match` to and from records
//!
//! # Example
//!
//! ```rust,ignore
//! use cueball_codec::{match_to_record, record_to_match};
//!
//! let record = match_to_record(&m)?;
//! let json = serde_json::to_string(&record)?;
//! let restored = record_to_match(&serde_json::from_str(&json)?)?;
//! assert_eq!(restored, m);
//! ```

#![warn(clippy::all)]

pub mod enum_set;
pub mod error;
pub mod mapper;
pub mod records;
pub mod table_status;

// Re-exports for convenience
pub use enum_set::{decode_member, decode_set, encode_member, encode_set, MAX_MEMBERS};
pub use error::{CodecError, CodecResult};
pub use mapper::{
    adv_stats_to_record, match_to_record, record_to_adv_stats, record_to_match, record_to_turn,
    turn_to_record,
};
pub use records::{turn_key, AdvStatsRecord, MatchRecord, TurnRecord, TurnRecords, TURN_KEY_PREFIX};
pub use table_status::{decode_table, encode_table};
