//! Set codec: enum sets packed into a single integer.
//!
//! Member `n` of the enumeration (declaration order) occupies bit `n`.
//! Only enumerations with at most 31 members are supported so that every
//! mask is a non-negative `i32`.

use std::collections::BTreeSet;

use cueball_domain::Ordinal;

use crate::error::{CodecError, CodecResult};

/// Largest enumeration that fits in a non-negative `i32` mask
pub const MAX_MEMBERS: usize = 31;

fn ensure_fits<E: Ordinal>() -> CodecResult<()> {
    if E::COUNT > MAX_MEMBERS {
        return Err(CodecError::EnumTooLarge {
            enumeration: E::NAME,
            members: E::COUNT,
        });
    }
    Ok(())
}

/// Pack a set of members into a bitmask.
///
/// The empty set encodes to `0`.
///
/// # Errors
/// Returns `CodecError::EnumTooLarge` if `E` has more than 31 members
pub fn encode_set<E: Ordinal>(set: &BTreeSet<E>) -> CodecResult<i32> {
    ensure_fits::<E>()?;
    let mask = set
        .iter()
        .fold(0u32, |mask, member| mask | (1u32 << member.ordinal()));
    // ensure_fits keeps bit 31 clear
    Ok(mask as i32)
}

/// Unpack a bitmask into the set of members it names.
///
/// Walks the set bits from lowest to highest, clearing each one after
/// mapping its position to a member.
///
/// # Errors
/// - `CodecError::EnumTooLarge` if `E` has more than 31 members
/// - `CodecError::InvalidOrdinal` if a set bit has no matching member
pub fn decode_set<E: Ordinal>(value: i32) -> CodecResult<BTreeSet<E>> {
    ensure_fits::<E>()?;
    let mut bits = value as u32;
    let mut set = BTreeSet::new();
    while bits != 0 {
        let position = bits.trailing_zeros();
        let member =
            E::from_ordinal(position).ok_or_else(|| CodecError::invalid_ordinal(E::NAME, position))?;
        set.insert(member);
        bits &= bits - 1;
    }
    Ok(set)
}

/// Stored ordinal of a single member
pub fn encode_member<E: Ordinal>(member: E) -> i32 {
    member.ordinal() as i32
}

/// Member stored under `ordinal`.
///
/// # Errors
/// Returns `CodecError::InvalidOrdinal` for negative or out-of-range values
pub fn decode_member<E: Ordinal>(ordinal: i32) -> CodecResult<E> {
    u32::try_from(ordinal)
        .ok()
        .and_then(E::from_ordinal)
        .ok_or_else(|| CodecError::invalid_ordinal(E::NAME, ordinal))
}

// =============================================================================
// Tests
// =============================================================================
