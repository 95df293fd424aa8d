//! Stable ordinals for persisted enumerations.
//!
//! Stored matches refer to enum members by their position in the
//! declaration order. Every enum implementing [`Ordinal`] is part of the
//! storage format: appending a member is safe, reordering or removing one
//! changes the meaning of data already written.

use strum::{EnumCount, IntoEnumIterator};

/// An enumeration whose members are identified by declaration order.
pub trait Ordinal: Copy + Ord + IntoEnumIterator + EnumCount + 'static {
    /// Enumeration name used in error messages.
    const NAME: &'static str;

    /// Zero-based position of this member in the declaration order.
    fn ordinal(self) -> u32;

    /// Look up the member declared at `ordinal`.
    ///
    /// Returns `None` when `ordinal` is past the last member.
    fn from_ordinal(ordinal: u32) -> Option<Self> {
        Self::iter().nth(ordinal as usize)
    }
}

/// Implements [`Ordinal`] for fieldless enums with implicit discriminants.
macro_rules! impl_ordinal {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl $crate::ordinal::Ordinal for $ty {
                const NAME: &'static str = stringify!($ty);

                fn ordinal(self) -> u32 {
                    self as u32
                }
            }
        )+
    };
}

pub(crate) use impl_ordinal;

// =============================================================================
// Tests
// =============================================================================
