//! Field conversions the matcher may emit besides a plain copy.

use std::collections::BTreeSet;
use std::fmt;

use kmgen_core::lang::basic_types::{self, BasicTypeId, DEFAULT_CONVERTIBLE};

use crate::model::TypeSignature;

/// How a source value becomes a destination value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionKind {
    /// `dest.X = T(src.Y)`
    Cast,
    /// Guarded type assertion out of a map source: `if v, ok := src["X"].(T); ok { ... }`
    MapExtract,
}

impl fmt::Display for ConversionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionKind::Cast => f.write_str("cast"),
            ConversionKind::MapExtract => f.write_str("mapExtract"),
        }
    }
}

/// Basic kinds that may be cast into one another.
///
/// Every member converts to every other member and never to itself. Membership is flat: a pair is
/// convertible only when both ends are listed, there is no chaining through other types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionTable {
    members: BTreeSet<BasicTypeId>,
}

impl Default for ConversionTable {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERTIBLE.iter().copied())
    }
}

impl ConversionTable {
    pub fn new(kinds: impl IntoIterator<Item = BasicTypeId>) -> Self {
        Self {
            members: kinds.into_iter().collect(),
        }
    }

    /// A table that never allows a cast.
    pub fn empty() -> Self {
        Self::new([])
    }

    /// Build a table from Go spellings such as `"int64"`.
    ///
    /// ## Errors
    /// - The first spelling that is not a predeclared basic type.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, String> {
        let mut members = BTreeSet::new();
        for name in names {
            let name = name.as_ref();
            let id = basic_types::from_str(name).ok_or_else(|| name.to_string())?;
            members.insert(id);
        }
        Ok(Self { members })
    }

    pub fn contains(&self, kind: BasicTypeId) -> bool {
        self.members.contains(&kind)
    }

    /// `true` when a value of type `from` may be cast to `to`.
    pub fn is_convertible(&self, from: &TypeSignature, to: &TypeSignature) -> bool {
        match (from.basic_kind(), to.basic_kind()) {
            (Some(a), Some(b)) => a != b && self.contains(a) && self.contains(b),
            _ => false,
        }
    }

    pub fn members(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.members.iter().map(|id| basic_types::as_str(*id))
    }
}
