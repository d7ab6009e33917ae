//! Key symbol types
//!
//! The engine works on raw fixed-width codes; callers are responsible for
//! encoding text into them. One value per type is reserved as the end
//! sentinel that terminates every stored key.

use std::fmt::Debug;
use std::hash::Hash;

/// Element type of a trie key
pub trait Symbol: Copy + Eq + Ord + Hash + Debug + Default {
    /// Reserved end-of-key sentinel; keys must not contain it
    const END: Self;

    /// Non-negative transition offset for this symbol
    fn code(self) -> i32;

    /// True for the reserved sentinel
    #[inline]
    fn is_end(self) -> bool {
        self == Self::END
    }
}

impl Symbol for u8 {
    const END: Self = 0;

    #[inline]
    fn code(self) -> i32 {
        self as i32
    }
}

impl Symbol for u16 {
    const END: Self = 0;

    #[inline]
    fn code(self) -> i32 {
        self as i32
    }
}

impl Symbol for char {
    const END: Self = '\0';

    #[inline]
    fn code(self) -> i32 {
        self as i32
    }
}
