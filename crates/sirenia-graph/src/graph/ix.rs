//! Integer handles into the node and edge arenas.

use std::fmt;

/// Handle to a node slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIx(u32);

/// Handle to an edge slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeIx(u32);

macro_rules! impl_ix {
    ($ty:ident, $prefix:literal) => {
        impl $ty {
            pub fn new(index: usize) -> Self {
                Self(index as u32)
            }

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

impl_ix!(NodeIx, "n");
impl_ix!(EdgeIx, "e");
