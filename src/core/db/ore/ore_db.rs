// SPDX-License-Identifier: MIT OR Apache-2.0

//! # OreDb
//!
//! Top level of the clustering engine: one [`TypedOreDb`] per [`OreBucket`],
//! plus a global index of every deposit ordered by [`DepositKey`] so that
//! deposits of all buckets can be listed and visited by one 1-based number.
//!
//! Only destructions of ore blocks are clustered. A failure while clustering
//! one edit is logged and has no effect on later edits.

use std::collections::BTreeMap;

use log::{debug, error};

use crate::core::model::EditRef;
use crate::core::util::clock::from_millis;

use super::ore_bucket::OreBucket;
use super::ore_deposit::{DepositId, DepositKey, OreDeposit};
use super::positional::{nth_wrapped, wrap_index};
use super::typed_ore_db::{DepositChange, TypedOreDb};

/// Per-bucket totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OreSummary {
    pub bucket: OreBucket,
    pub deposits: usize,
    pub blocks: usize,
}

#[derive(Debug, Clone)]
pub struct OreDb {
    dbs: Vec<TypedOreDb>,
    index: BTreeMap<DepositKey, OreBucket>,
    next_id: u64,
    next_seq: u64,
    /// 1-based index of the deposit last teleported to; 0 before the first.
    tp_index: usize,
}

impl OreDb {
    pub fn new() -> Self {
        Self {
            dbs: OreBucket::ALL.iter().map(|b| TypedOreDb::new(*b)).collect(),
            index: BTreeMap::new(),
            next_id: 0,
            next_seq: 0,
            tp_index: 0,
        }
    }

    /// Cluster `edit` if it is the destruction of an ore. Returns whether the
    /// deposit index changed.
    pub fn add_edit(&mut self, edit: &EditRef) -> bool {
        if edit.creation {
            return false;
        }
        let Some(bucket) = OreBucket::for_block(&edit.block) else {
            return false;
        };
        self.next_id += 1;
        self.next_seq += 1;
        let id = DepositId(self.next_id);
        let result = self.dbs[bucket.ordinal()].add_edit(edit.clone(), id, self.next_seq);
        match result {
            Ok(DepositChange::Unchanged) => false,
            Ok(DepositChange::Created(key)) => {
                self.index.insert(key, bucket);
                true
            }
            Ok(DepositChange::Grown { old, new }) => {
                self.index.remove(&old);
                self.index.insert(new, bucket);
                true
            }
            Ok(DepositChange::Merged { old, new }) => {
                for key in &old {
                    self.index.remove(key);
                }
                self.index.insert(new, bucket);
                true
            }
            Err(e) => {
                error!("Failed to cluster {}: {}", edit, e);
                false
            }
        }
    }

    #[inline]
    pub fn typed(&self, bucket: OreBucket) -> &TypedOreDb {
        &self.dbs[bucket.ordinal()]
    }

    #[inline]
    pub fn deposit_count(&self) -> usize {
        self.index.len()
    }

    pub fn block_count(&self) -> usize {
        self.dbs.iter().map(TypedOreDb::block_count).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Every deposit in global key order.
    pub fn deposits(&self) -> impl Iterator<Item = &OreDeposit> + '_ {
        self.index
            .iter()
            .filter_map(|(key, bucket)| self.dbs[bucket.ordinal()].deposit(key.id))
    }

    /// Deposit at 1-based `index`, wrapping circularly. Callers check
    /// [`deposit_count`](Self::deposit_count) first; an empty db yields `None`.
    pub fn get_deposit(&self, index: i64) -> Option<&OreDeposit> {
        let (key, bucket) = nth_wrapped(&self.index, index)?;
        self.dbs[bucket.ordinal()].deposit(key.id)
    }

    #[inline]
    pub fn tp_index(&self) -> usize {
        self.tp_index
    }

    /// Select the deposit at `index` (wrapped) as the teleport target.
    pub fn teleport_to(&mut self, index: i64) -> Option<(usize, &OreDeposit)> {
        if self.index.is_empty() {
            return None;
        }
        let position = wrap_index(index, self.index.len());
        self.tp_index = position;
        self.get_deposit(position as i64).map(|d| (position, d))
    }

    pub fn teleport_next(&mut self) -> Option<(usize, &OreDeposit)> {
        self.teleport_to(self.tp_index as i64 + 1)
    }

    pub fn teleport_prev(&mut self) -> Option<(usize, &OreDeposit)> {
        self.teleport_to(self.tp_index as i64 - 1)
    }

    /// Number of listing pages of `per_page` lines.
    pub fn page_count(&self, per_page: usize) -> usize {
        let per_page = per_page.max(1);
        self.index.len().div_ceil(per_page)
    }

    /// Listing lines for 1-based `page`, clamped into range:
    /// `(index) MM-DD HH:MM:SS (x,y,z) blockId [count] player`.
    pub fn list_deposits(&self, page: usize, per_page: usize) -> Vec<String> {
        let per_page = per_page.max(1);
        let pages = self.page_count(per_page);
        if pages == 0 {
            return Vec::new();
        }
        let page = page.clamp(1, pages);
        self.deposits()
            .enumerate()
            .skip((page - 1) * per_page)
            .take(per_page)
            .map(|(position, deposit)| format_listing(position + 1, deposit))
            .collect()
    }

    /// Totals per bucket, in listing order.
    pub fn summary(&self) -> Vec<OreSummary> {
        self.dbs
            .iter()
            .map(|db| OreSummary {
                bucket: db.bucket(),
                deposits: db.deposit_count(),
                blocks: db.block_count(),
            })
            .collect()
    }

    /// Drop every block destroyed by `player` (case-insensitive) and recluster
    /// the rest in their original order.
    pub fn remove_player(&mut self, player: &str) {
        let player = player.to_lowercase();
        let mut remaining: Vec<(u64, EditRef)> = self
            .dbs
            .iter()
            .flat_map(|db| db.blocks())
            .filter(|block| block.edit().player.to_lowercase() != player)
            .map(|block| (block.seq(), block.edit().clone()))
            .collect();
        let before = self.block_count();
        remaining.sort_by_key(|(seq, _)| *seq);
        self.clear();
        for (_, edit) in &remaining {
            self.add_edit(edit);
        }
        debug!(
            "Removed {} ore blocks of {}",
            before - remaining.len(),
            player
        );
    }

    pub fn clear(&mut self) {
        for db in &mut self.dbs {
            db.clear();
        }
        self.index.clear();
        self.tp_index = 0;
    }
}

impl Default for OreDb {
    fn default() -> Self {
        Self::new()
    }
}

fn format_listing(position: usize, deposit: &OreDeposit) -> String {
    let key = deposit.key();
    format!(
        "({}) {} {} {} [{}] {}",
        position,
        from_millis(key.time).format("%m-%d %H:%M:%S"),
        key.coords(),
        key.block.id(),
        deposit.len(),
        key.player
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{BlockTypeRegistry, Coords, Edit};
    use std::sync::Arc;

    fn edit(player: &str, block: &str, creation: bool, time: i64, c: (i32, i32, i32)) -> EditRef {
        let blocks = BlockTypeRegistry::defaults();
        Arc::new(Edit::new(
            time,
            player,
            creation,
            Coords::new(c.0, c.1, c.2),
            blocks.by_name(block),
        ))
    }

    #[test]
    fn test_only_ore_destructions_cluster() {
        let mut db = OreDb::new();
        assert!(!db.add_edit(&edit("a", "diamond_ore", true, 1, (0, 0, 0))));
        assert!(!db.add_edit(&edit("a", "stone", false, 1, (0, 0, 0))));
        assert!(db.add_edit(&edit("a", "diamond_ore", false, 1, (0, 0, 0))));
        assert_eq!(db.deposit_count(), 1);
    }

    #[test]
    fn test_buckets_do_not_mix() {
        let mut db = OreDb::new();
        db.add_edit(&edit("a", "diamond_ore", false, 1, (0, 0, 0)));
        db.add_edit(&edit("a", "iron_ore", false, 2, (0, 0, 1)));
        assert_eq!(db.deposit_count(), 2);
        db.add_edit(&edit("a", "redstone_ore", false, 3, (5, 5, 5)));
        db.add_edit(&edit("a", "lit_redstone_ore", false, 4, (5, 5, 6)));
        assert_eq!(db.typed(OreBucket::Redstone).deposit_count(), 1);
        assert_eq!(db.deposit_count(), 3);
    }

    #[test]
    fn test_global_order_spans_buckets() {
        let mut db = OreDb::new();
        db.add_edit(&edit("a", "coal_ore", false, 10, (0, 0, 0)));
        db.add_edit(&edit("a", "diamond_ore", false, 20, (9, 9, 9)));
        assert_eq!(db.get_deposit(1).unwrap().bucket(), OreBucket::Coal);
        assert_eq!(db.get_deposit(2).unwrap().bucket(), OreBucket::Diamond);
        assert_eq!(db.get_deposit(0).unwrap().bucket(), OreBucket::Diamond);
        assert_eq!(db.get_deposit(3).unwrap().bucket(), OreBucket::Coal);
    }

    #[test]
    fn test_teleport_cursor_wraps() {
        let mut db = OreDb::new();
        assert!(db.teleport_next().is_none());
        db.add_edit(&edit("a", "gold_ore", false, 10, (0, 0, 0)));
        db.add_edit(&edit("a", "gold_ore", false, 20, (9, 9, 9)));
        assert_eq!(db.teleport_next().map(|(i, _)| i), Some(1));
        assert_eq!(db.teleport_next().map(|(i, _)| i), Some(2));
        assert_eq!(db.teleport_next().map(|(i, _)| i), Some(1));
        assert_eq!(db.teleport_prev().map(|(i, _)| i), Some(2));
    }

    #[test]
    fn test_listing_lines() {
        let mut db = OreDb::new();
        db.add_edit(&edit("Alice", "diamond_ore", false, 0, (5, 64, 5)));
        db.add_edit(&edit("Alice", "diamond_ore", false, 1_000, (5, 64, 6)));
        let lines = db.list_deposits(1, 10);
        assert_eq!(lines, vec!["(1) 01-01 00:00:00 (5,64,5) 56 [2] Alice".to_string()]);
        assert!(OreDb::new().list_deposits(1, 10).is_empty());
    }

    #[test]
    fn test_remove_player_reclusters_rest() {
        let mut db = OreDb::new();
        db.add_edit(&edit("Alice", "diamond_ore", false, 1, (0, 0, 0)));
        db.add_edit(&edit("Bob", "diamond_ore", false, 2, (1, 0, 0)));
        db.add_edit(&edit("Alice", "diamond_ore", false, 3, (2, 0, 0)));
        assert_eq!(db.deposit_count(), 1);
        db.remove_player("BOB");
        assert_eq!(db.deposit_count(), 2);
        assert_eq!(db.block_count(), 2);
    }

    #[test]
    fn test_summary_in_listing_order() {
        let mut db = OreDb::new();
        db.add_edit(&edit("a", "coal_ore", false, 1, (0, 0, 0)));
        let summary = db.summary();
        assert_eq!(summary[0].bucket, OreBucket::Diamond);
        assert_eq!(summary[6].bucket, OreBucket::Coal);
        assert_eq!(summary[6].deposits, 1);
    }
}
