// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

use crate::core::model::BlockType;

/// Ore family a destroyed block is clustered under.
///
/// Declaration order is the listing order: most interesting first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OreBucket {
    Diamond,
    Emerald,
    Lapis,
    Gold,
    Iron,
    Redstone,
    Coal,
}

impl OreBucket {
    pub const ALL: [OreBucket; 7] = [
        OreBucket::Diamond,
        OreBucket::Emerald,
        OreBucket::Lapis,
        OreBucket::Gold,
        OreBucket::Iron,
        OreBucket::Redstone,
        OreBucket::Coal,
    ];

    /// Bucket of a block type; `None` for anything that is not an ore.
    /// Both redstone ore ids (73 and the lit variant 74) share a bucket.
    pub fn for_block(block: &BlockType) -> Option<Self> {
        match block.id() {
            56 => Some(OreBucket::Diamond),
            129 => Some(OreBucket::Emerald),
            21 => Some(OreBucket::Lapis),
            14 => Some(OreBucket::Gold),
            15 => Some(OreBucket::Iron),
            73 | 74 => Some(OreBucket::Redstone),
            16 => Some(OreBucket::Coal),
            _ => None,
        }
    }

    /// Position in [`OreBucket::ALL`].
    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            OreBucket::Diamond => "diamond",
            OreBucket::Emerald => "emerald",
            OreBucket::Lapis => "lapis",
            OreBucket::Gold => "gold",
            OreBucket::Iron => "iron",
            OreBucket::Redstone => "redstone",
            OreBucket::Coal => "coal",
        }
    }

    /// Display colour as `0xRRGGBB`.
    pub fn colour(self) -> u32 {
        match self {
            OreBucket::Diamond => 0x5DECF5,
            OreBucket::Emerald => 0x17DD62,
            OreBucket::Lapis => 0x1F42C8,
            OreBucket::Gold => 0xFCEE4B,
            OreBucket::Iron => 0xD8AF93,
            OreBucket::Redstone => 0xFF0000,
            OreBucket::Coal => 0x363636,
        }
    }
}

impl fmt::Display for OreBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
