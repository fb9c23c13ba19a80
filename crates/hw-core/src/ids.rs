//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub`, but
//! callers should prefer the `.index()` helper when indexing a `Vec`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Unique, monotonically assigned vehicle number.  Starts at 1.
    pub struct VehicleId(u32);
}

typed_id! {
    /// Zero-based position of a segment along the highway (west to east).
    pub struct SegmentId(u32);
}

typed_id! {
    /// Zero-based shoulder index.  Shoulder `i` sits between segments `i`
    /// and `i + 1`.
    pub struct ShoulderId(u32);
}

impl ShoulderId {
    /// The shoulder on the boundary between two adjacent segments, in either
    /// travel order.  Returns `None` if the segments are not neighbours.
    pub fn between(a: SegmentId, b: SegmentId) -> Option<ShoulderId> {
        if a.0.abs_diff(b.0) != 1 {
            return None;
        }
        Some(ShoulderId(a.0.min(b.0)))
    }
}

// Segments and shoulders are numbered from 1 in reports, matching road signage.

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vehicle#{}", self.0)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment {}", self.0 + 1)
    }
}

impl fmt::Display for ShoulderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shoulder {}-{}", self.0 + 1, self.0 + 2)
    }
}
