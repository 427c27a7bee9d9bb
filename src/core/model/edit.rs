// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;
use std::sync::Arc;

use super::block_type::BlockTypeRef;
use crate::core::util::clock::from_millis;

/// Integer world coordinates of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coords {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coords {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The 26 surrounding positions (every ±1 offset except zero).
    pub fn neighbours(&self) -> impl Iterator<Item = Coords> + '_ {
        (-1..=1).flat_map(move |dx| {
            (-1..=1).flat_map(move |dy| {
                (-1..=1).filter_map(move |dz| {
                    if dx == 0 && dy == 0 && dz == 0 {
                        None
                    } else {
                        Some(Coords::new(
                            self.x.wrapping_add(dx),
                            self.y.wrapping_add(dy),
                            self.z.wrapping_add(dz),
                        ))
                    }
                })
            })
        })
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

/// One observed creation or destruction of one block.
///
/// Immutable once built. Shared as [`EditRef`] between the per-player store
/// that owns it and the ore index that refers to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Epoch millis on the naive local timeline.
    pub time: i64,
    pub player: String,
    /// `true` for placement, `false` for destruction.
    pub creation: bool,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub block: BlockTypeRef,
}

pub type EditRef = Arc<Edit>;

impl Edit {
    pub fn new(
        time: i64,
        player: impl Into<String>,
        creation: bool,
        coords: Coords,
        block: BlockTypeRef,
    ) -> Self {
        Self {
            time,
            player: player.into(),
            creation,
            x: coords.x,
            y: coords.y,
            z: coords.z,
            block,
        }
    }

    #[inline]
    pub fn coords(&self) -> Coords {
        Coords::new(self.x, self.y, self.z)
    }

    /// Same change as `other`, ignoring who made it.
    pub fn same_change(&self, other: &Edit) -> bool {
        self.time == other.time
            && self.creation == other.creation
            && self.coords() == other.coords()
            && self.block == other.block
    }

    #[inline]
    pub fn action(&self) -> &'static str {
        if self.creation {
            "created"
        } else {
            "destroyed"
        }
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            from_millis(self.time).format("%Y-%m-%d %H:%M:%S"),
            self.player,
            self.action(),
            self.coords(),
            self.block
        )
    }
}

/// A text note pinned to a world position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub text: String,
}

impl Annotation {
    pub fn new(coords: Coords, text: impl Into<String>) -> Self {
        Self {
            x: coords.x,
            y: coords.y,
            z: coords.z,
            text: text.into(),
        }
    }

    #[inline]
    pub fn coords(&self) -> Coords {
        Coords::new(self.x, self.y, self.z)
    }
}
