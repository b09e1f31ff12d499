//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  `AgentId` doubles as the index into
//! every dense per-agent array, so `.index()` is the preferred accessor.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
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
    /// Index of an agent in SoA storage.  Stable for the whole run: dead
    /// agents keep their slot so ids are never reused.
    pub struct AgentId(u32);
}

typed_id! {
    /// Identity of a non-agent world object (berry bush, predator, prey…),
    /// assigned by the environment.
    pub struct ObjectId(u32);
}

typed_id! {
    /// Identity of a boundary (emergent inside/outside group).  Never reused.
    pub struct BoundaryId(u32);
}

/// Anything an agent can perceive and hold a coherence relation toward.
///
/// Ordering puts every agent before every object, then by inner id.  This is
/// the final deterministic tie-break used by the alignment selector.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetId {
    Agent(AgentId),
    Object(ObjectId),
}

impl TargetId {
    /// The agent behind this target, if it is one.
    #[inline]
    pub fn agent(self) -> Option<AgentId> {
        match self {
            TargetId::Agent(a) => Some(a),
            TargetId::Object(_) => None,
        }
    }

    /// A single `u64` key, unique across both variants.  Used to derive
    /// per-target RNG streams.
    #[inline]
    pub fn stream_key(self) -> u64 {
        match self {
            TargetId::Agent(a) => a.0 as u64,
            TargetId::Object(o) => (1u64 << 32) | o.0 as u64,
        }
    }
}

impl From<AgentId> for TargetId {
    fn from(a: AgentId) -> Self {
        TargetId::Agent(a)
    }
}

impl From<ObjectId> for TargetId {
    fn from(o: ObjectId) -> Self {
        TargetId::Object(o)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetId::Agent(a) => a.fmt(f),
            TargetId::Object(o) => o.fmt(f),
        }
    }
}
