// SPDX-License-Identifier: MIT OR Apache-2.0

//! # BlockEditSet
//!
//! Every edit observed in one world or dimension, grouped per player in the
//! order players were first seen, with the annotations placed in that world
//! and the [`OreDb`] clustering its destroyed ores.
//!
//! An edit accepted by the player filter lives in exactly one
//! [`PlayerEditSet`]; if it is an ore destruction and clustering is enabled
//! it is also referenced from the ore db.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::core::model::{Annotation, Coords, Edit, EditRef};
use crate::core::session::selection::Selection;

use super::filters::PlayerFilter;
use super::ore::OreDb;
use super::player_edit_set::{PlayerEditSet, PlayerKey};

/// Environment an edit is added under.
#[derive(Debug)]
pub struct EditContext<'a> {
    pub filter: &'a PlayerFilter,
    /// Whether ore destructions are clustered (not in creative mode, unless
    /// overridden).
    pub cluster_ores: bool,
    pub selection: Option<&'a mut Selection>,
}

impl<'a> EditContext<'a> {
    pub fn new(filter: &'a PlayerFilter, cluster_ores: bool) -> Self {
        Self {
            filter,
            cluster_ores,
            selection: None,
        }
    }

    pub fn with_selection(mut self, selection: &'a mut Selection) -> Self {
        self.selection = Some(selection);
        self
    }
}

/// One line of the player listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSummary {
    pub player: String,
    pub edits: usize,
    pub visible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BlockEditSet {
    players: Vec<PlayerEditSet>,
    index: HashMap<PlayerKey, usize>,
    annotations: Vec<Annotation>,
    ore_db: OreDb,
}

impl BlockEditSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one edit. Returns `false`, changing nothing, when the filter
    /// rejects the player. An exact repeat of a stored edit is accepted but
    /// not stored twice; with clustering enabled the stored copy is offered
    /// to the ore db again, so an ore first seen while clustering was off is
    /// clustered once it is reported again.
    pub fn add_edit(&mut self, edit: Edit, ctx: &mut EditContext<'_>, update_state: bool) -> bool {
        if !ctx.filter.accepts(&edit.player) {
            return false;
        }
        let key = PlayerKey::new(&edit.player);
        let position = match self.index.get(&key) {
            Some(position) => *position,
            None => {
                self.players.push(PlayerEditSet::new(edit.player.clone()));
                self.index.insert(key, self.players.len() - 1);
                self.players.len() - 1
            }
        };
        let set = &mut self.players[position];
        let edit: EditRef = match set.find_change(&edit) {
            Some(stored) => Arc::clone(stored),
            None => {
                let edit = Arc::new(edit);
                set.add(Arc::clone(&edit));
                edit
            }
        };
        if ctx.cluster_ores {
            self.ore_db.add_edit(&edit);
        }
        if update_state {
            if let Some(selection) = ctx.selection.as_deref_mut() {
                selection.select(&edit);
            }
        }
        true
    }

    /// Oldest edit at `coords`, of `player` or of anyone. Players are
    /// scanned in the order they were first seen.
    pub fn find_edit(&self, coords: Coords, player: Option<&str>) -> Option<&EditRef> {
        match player {
            Some(player) => self
                .player_set(player)
                .and_then(|set| set.find(coords)),
            None => self.players.iter().find_map(|set| set.find(coords)),
        }
    }

    pub fn player_set(&self, player: &str) -> Option<&PlayerEditSet> {
        self.index
            .get(&PlayerKey::new(player))
            .and_then(|position| self.players.get(*position))
    }

    /// Per-player edit sets in first-seen order.
    pub fn player_sets(&self) -> &[PlayerEditSet] {
        &self.players
    }

    pub fn players(&self) -> Vec<PlayerSummary> {
        self.players
            .iter()
            .map(|set| PlayerSummary {
                player: set.player().to_string(),
                edits: set.len(),
                visible: set.is_visible(),
            })
            .collect()
    }

    /// Returns `false` if the player has no edits here.
    pub fn set_visible(&mut self, player: &str, visible: bool) -> bool {
        match self.index.get(&PlayerKey::new(player)) {
            Some(position) => {
                self.players[*position].set_visible(visible);
                true
            }
            None => false,
        }
    }

    /// Drop every edit of `player`, including its ore blocks. Returns the
    /// number of edits removed.
    pub fn remove_player(&mut self, player: &str) -> usize {
        let Some(position) = self.index.remove(&PlayerKey::new(player)) else {
            return 0;
        };
        let removed = self.players.remove(position);
        self.index = self
            .players
            .iter()
            .enumerate()
            .map(|(i, set)| (PlayerKey::new(set.player()), i))
            .collect();
        self.ore_db.remove_player(player);
        debug!("Removed {} edits of {}", removed.len(), removed.player());
        removed.len()
    }

    /// Every edit, grouped by player.
    pub fn edits(&self) -> impl Iterator<Item = &EditRef> + '_ {
        self.players.iter().flat_map(|set| set.iter())
    }

    pub fn edit_count(&self) -> usize {
        self.players.iter().map(PlayerEditSet::len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.annotations.is_empty()
    }

    /// Add every edit of `other` under `ctx`, then its annotations that are
    /// not already present. Returns the number of edits accepted.
    pub fn merge_from(&mut self, other: &BlockEditSet, ctx: &mut EditContext<'_>) -> usize {
        let accepted = self.add_filtered(other.edits().map(|edit| (**edit).clone()), ctx);
        for annotation in &other.annotations {
            if !self.annotations.contains(annotation) {
                self.annotations.push(annotation.clone());
            }
        }
        accepted
    }

    /// Add `edits` without touching the selection. Returns the number accepted.
    pub fn add_filtered<I>(&mut self, edits: I, ctx: &mut EditContext<'_>) -> usize
    where
        I: IntoIterator<Item = Edit>,
    {
        let mut accepted = 0;
        for edit in edits {
            if self.add_edit(edit, ctx, false) {
                accepted += 1;
            }
        }
        accepted
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    pub fn remove_annotation(&mut self, index: usize) -> Option<Annotation> {
        (index < self.annotations.len()).then(|| self.annotations.remove(index))
    }

    #[inline]
    pub fn ore_db(&self) -> &OreDb {
        &self.ore_db
    }

    #[inline]
    pub fn ore_db_mut(&mut self) -> &mut OreDb {
        &mut self.ore_db
    }

    /// Forget all edits, annotations and deposits.
    pub fn clear(&mut self) {
        self.players.clear();
        self.index.clear();
        self.annotations.clear();
        self.ore_db.clear();
    }
}
