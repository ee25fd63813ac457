//! Dense indices into the road graph.
//!
//! Cities are interned into `NodeId`s when the graph is built, and each
//! directed road gets an `EdgeId` into the CSR edge array.  Solvers keep
//! their per-query state (distance, predecessor) in flat `Vec`s indexed by
//! these, so a tree over N cities is three allocations and no hashing.
//!
//! The inner integer is `pub` so tests can name a node directly; library
//! code converts with [`index`](NodeId::index) and
//! [`from_index`](NodeId::from_index).

use std::fmt;

/// Declare a `u32` index type for one graph array.  `$label` prefixes the
/// `Display` form (`city#3`, `road#12`), which is what log lines show.
macro_rules! dense_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident, $label:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub u32);

        impl $name {
            /// Marks "no predecessor" / "no edge" slots in solver arrays.
            pub const INVALID: $name = $name(u32::MAX);

            /// Position in the owning array.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Inverse of [`index`](Self::index).  Debug builds panic on an
            /// index that does not fit below the `INVALID` sentinel.
            #[inline(always)]
            pub fn from_index(i: usize) -> Self {
                debug_assert!(i < u32::MAX as usize, "{} index {i} out of range", $label);
                $name(i as u32)
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}#{}", $label, self.0)
                } else {
                    write!(f, "{}#-", $label)
                }
            }
        }
    };
}

dense_id! {
    /// Index of a city in the road graph.
    pub struct NodeId, "city";
}

dense_id! {
    /// Index of a directed road in the graph's CSR edge array.
    pub struct EdgeId, "road";
}
