// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;
use std::fmt;

use crate::core::model::{Coords, Edit, EditRef};

/// Lower-cased player name used as a map key. The display spelling lives in
/// [`PlayerEditSet::player`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerKey(String);

impl PlayerKey {
    pub fn new(player: &str) -> Self {
        Self(player.to_lowercase())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One player's edits ordered by time, ties by insertion order.
///
/// Adding an edit that repeats one already present (same time, position,
/// action and block) is a no-op, so overlapping query results collapse.
#[derive(Debug, Clone)]
pub struct PlayerEditSet {
    player: String,
    edits: BTreeMap<(i64, u64), EditRef>,
    next_seq: u64,
    visible: bool,
}

impl PlayerEditSet {
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            edits: BTreeMap::new(),
            next_seq: 0,
            visible: true,
        }
    }

    /// Player name as first encountered.
    #[inline]
    pub fn player(&self) -> &str {
        &self.player
    }

    /// Insert `edit`; `false` if an identical edit is already present.
    pub fn add(&mut self, edit: EditRef) -> bool {
        if self.find_change(&edit).is_some() {
            return false;
        }
        self.next_seq += 1;
        self.edits.insert((edit.time, self.next_seq), edit);
        true
    }

    /// The stored edit describing the same change as `edit`, if any.
    pub fn find_change(&self, edit: &Edit) -> Option<&EditRef> {
        self.edits
            .range((edit.time, 0)..=(edit.time, u64::MAX))
            .map(|(_, existing)| existing)
            .find(|existing| existing.same_change(edit))
    }

    /// Oldest edit at `coords`.
    pub fn find(&self, coords: Coords) -> Option<&EditRef> {
        self.edits.values().find(|edit| edit.coords() == coords)
    }

    /// Edits oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &EditRef> + '_ {
        self.edits.values()
    }

    pub fn latest(&self) -> Option<&EditRef> {
        self.edits.values().next_back()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
