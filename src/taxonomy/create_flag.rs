use std::fmt;
use std::ops::BitOr;

use crate::constants::*;

/// Single node-creation flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreateFlag {
    /// Node is removed when the owning session ends
    Ephemeral,
    /// Server appends a monotonically increasing suffix to the path
    Sequential,
}

impl CreateFlag {
    /// Native bit for this flag.
    pub fn code(&self) -> i32 {
        match self {
            CreateFlag::Ephemeral => ZOO_EPHEMERAL,
            CreateFlag::Sequential => ZOO_SEQUENCE,
        }
    }
}

/// Combination of [`CreateFlag`]s, `NONE` for a plain persistent node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CreateFlags(i32);

impl CreateFlags {
    pub const NONE: CreateFlags = CreateFlags(0);
    pub const EPHEMERAL: CreateFlags = CreateFlags(ZOO_EPHEMERAL);
    pub const SEQUENTIAL: CreateFlags = CreateFlags(ZOO_SEQUENCE);

    const ALL_BITS: i32 = ZOO_EPHEMERAL | ZOO_SEQUENCE;

    /// Accepts a raw native flag word.
    ///
    /// Returns `None` when the word carries a bit this binding does not know,
    /// so that no flag is ever dropped silently on the way to the service.
    pub fn from_code(code: i32) -> Option<Self> {
        if code & !Self::ALL_BITS != 0 {
            return None;
        }
        Some(CreateFlags(code))
    }

    /// Native flag word passed to the create call.
    pub fn code(&self) -> i32 {
        self.0
    }

    pub fn contains(
        &self,
        flag: CreateFlag,
    ) -> bool {
        self.0 & flag.code() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl From<CreateFlag> for CreateFlags {
    fn from(flag: CreateFlag) -> Self {
        CreateFlags(flag.code())
    }
}

impl FromIterator<CreateFlag> for CreateFlags {
    fn from_iter<I: IntoIterator<Item = CreateFlag>>(iter: I) -> Self {
        iter.into_iter().fold(CreateFlags::NONE, |acc, flag| acc | flag)
    }
}

impl BitOr for CreateFlags {
    type Output = CreateFlags;

    fn bitor(
        self,
        rhs: CreateFlags,
    ) -> CreateFlags {
        CreateFlags(self.0 | rhs.0)
    }
}

impl BitOr<CreateFlag> for CreateFlags {
    type Output = CreateFlags;

    fn bitor(
        self,
        rhs: CreateFlag,
    ) -> CreateFlags {
        CreateFlags(self.0 | rhs.code())
    }
}

impl BitOr for CreateFlag {
    type Output = CreateFlags;

    fn bitor(
        self,
        rhs: CreateFlag,
    ) -> CreateFlags {
        CreateFlags(self.code() | rhs.code())
    }
}

impl fmt::Display for CreateFlags {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match (
            self.contains(CreateFlag::Ephemeral),
            self.contains(CreateFlag::Sequential),
        ) {
            (false, false) => f.write_str("None"),
            (true, false) => f.write_str("Ephemeral"),
            (false, true) => f.write_str("Sequential"),
            (true, true) => f.write_str("Ephemeral|Sequential"),
        }
    }
}
