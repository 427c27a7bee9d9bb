// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Per-bucket clustering
//!
//! A [`TypedOreDb`] holds every destroyed block of one [`OreBucket`] in a
//! coordinate map, and the deposits they form in an index ordered by
//! [`DepositKey`]. Adding a block checks its 26 neighbours and then either
//! starts a deposit, grows the single adjacent one, or merges all adjacent
//! deposits (plus the new block) into a fresh one.

use std::collections::{BTreeSet, HashMap};

use log::trace;

use crate::core::error::{BlockWatchError, BlockWatchResult};
use crate::core::model::{Coords, EditRef};

use super::ore_block::OreBlock;
use super::ore_bucket::OreBucket;
use super::ore_deposit::{DepositId, DepositKey, OreDeposit};
use super::positional;

/// How the deposit index changed after one block was added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositChange {
    /// The coordinate was already known; first seen wins.
    Unchanged,
    Created(DepositKey),
    Grown { old: DepositKey, new: DepositKey },
    Merged { old: Vec<DepositKey>, new: DepositKey },
}

#[derive(Debug, Clone)]
pub struct TypedOreDb {
    bucket: OreBucket,
    blocks: HashMap<Coords, OreBlock>,
    deposits: HashMap<DepositId, OreDeposit>,
    index: BTreeSet<DepositKey>,
}

impl TypedOreDb {
    pub fn new(bucket: OreBucket) -> Self {
        Self {
            bucket,
            blocks: HashMap::new(),
            deposits: HashMap::new(),
            index: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn bucket(&self) -> OreBucket {
        self.bucket
    }

    /// Cluster one destroyed block. `new_id` names the deposit if one has to
    /// be created; `seq` is the block's global insertion order.
    pub fn add_edit(
        &mut self,
        edit: EditRef,
        new_id: DepositId,
        seq: u64,
    ) -> BlockWatchResult<DepositChange> {
        let coords = edit.coords();
        if self.blocks.contains_key(&coords) {
            return Ok(DepositChange::Unchanged);
        }

        let mut adjacent: Vec<DepositId> = coords
            .neighbours()
            .filter_map(|c| self.blocks.get(&c).map(OreBlock::deposit))
            .collect();
        adjacent.sort_unstable();
        adjacent.dedup();
        if let Some(missing) = adjacent.iter().find(|id| !self.deposits.contains_key(*id)) {
            return Err(BlockWatchError::other(format!(
                "{} block at {} refers to missing deposit {}",
                self.bucket, coords, missing
            )));
        }

        match adjacent.as_slice() {
            [] => {
                let deposit = OreDeposit::new(new_id, self.bucket, edit.clone());
                let key = deposit.sort_key();
                self.deposits.insert(new_id, deposit);
                self.index.insert(key);
                self.blocks.insert(coords, OreBlock::new(edit, new_id, seq));
                trace!("{} deposit {} started at {}", self.bucket, new_id, coords);
                Ok(DepositChange::Created(key))
            }
            [id] => {
                let Some(deposit) = self.deposits.get_mut(id) else {
                    return Err(BlockWatchError::other(format!("deposit {} vanished", id)));
                };
                let old = deposit.sort_key();
                deposit.add(edit.clone());
                let new = deposit.sort_key();
                self.index.remove(&old);
                self.index.insert(new);
                self.blocks.insert(coords, OreBlock::new(edit, *id, seq));
                Ok(DepositChange::Grown { old, new })
            }
            ids => {
                let mut parts: Vec<OreDeposit> = ids
                    .iter()
                    .filter_map(|id| self.deposits.remove(id))
                    .collect();
                parts.sort_by_key(OreDeposit::sort_key);
                let old: Vec<DepositKey> = parts.iter().map(OreDeposit::sort_key).collect();
                for key in &old {
                    self.index.remove(key);
                }
                let merged = OreDeposit::merged(new_id, self.bucket, parts, edit.clone());
                for member in merged.blocks() {
                    if let Some(block) = self.blocks.get_mut(&member.coords()) {
                        block.set_deposit(new_id);
                    }
                }
                let new = merged.sort_key();
                trace!(
                    "{} deposits {:?} merged into {} at {}",
                    self.bucket,
                    old,
                    new_id,
                    coords
                );
                self.deposits.insert(new_id, merged);
                self.index.insert(new);
                self.blocks.insert(coords, OreBlock::new(edit, new_id, seq));
                Ok(DepositChange::Merged { old, new })
            }
        }
    }

    pub fn block_at(&self, coords: Coords) -> Option<&OreBlock> {
        self.blocks.get(&coords)
    }

    pub fn deposit(&self, id: DepositId) -> Option<&OreDeposit> {
        self.deposits.get(&id)
    }

    /// Deposit containing the block at `coords`.
    pub fn deposit_at(&self, coords: Coords) -> Option<&OreDeposit> {
        self.block_at(coords)
            .and_then(|block| self.deposits.get(&block.deposit()))
    }

    #[inline]
    pub fn deposit_count(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Deposits in key order.
    pub fn deposits(&self) -> impl Iterator<Item = &OreDeposit> + '_ {
        self.index.iter().filter_map(|key| self.deposits.get(&key.id))
    }

    pub fn blocks(&self) -> impl Iterator<Item = &OreBlock> + '_ {
        self.blocks.values()
    }

    /// Deposit at 1-based `index` in key order, wrapping circularly.
    /// `None` only when there are no deposits.
    pub fn get_deposit(&self, index: i64) -> Option<&OreDeposit> {
        let key = positional::nth_wrapped(&self.index, index)?;
        self.deposits.get(&key.id)
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
        self.deposits.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{BlockTypeRegistry, Edit};
    use std::sync::Arc;

    struct Db {
        inner: TypedOreDb,
        next: u64,
    }

    impl Db {
        fn new() -> Self {
            Self {
                inner: TypedOreDb::new(OreBucket::Diamond),
                next: 0,
            }
        }

        fn dig(&mut self, time: i64, x: i32, y: i32, z: i32) -> DepositChange {
            let blocks = BlockTypeRegistry::defaults();
            let edit = Arc::new(Edit::new(
                time,
                "miner",
                false,
                Coords::new(x, y, z),
                blocks.by_name("diamond_ore"),
            ));
            self.next += 1;
            self.inner
                .add_edit(edit, DepositId(self.next), self.next)
                .unwrap()
        }
    }

    #[test]
    fn test_diagonal_neighbour_joins() {
        let mut db = Db::new();
        db.dig(1, 0, 0, 0);
        assert!(matches!(db.dig(2, 1, 1, 1), DepositChange::Grown { .. }));
        assert_eq!(db.inner.deposit_count(), 1);
    }

    #[test]
    fn test_two_apart_is_separate() {
        let mut db = Db::new();
        db.dig(1, 0, 0, 0);
        assert!(matches!(db.dig(2, 2, 2, 2), DepositChange::Created(_)));
        assert_eq!(db.inner.deposit_count(), 2);
    }

    #[test]
    fn test_bridge_merges_into_new_deposit() {
        let mut db = Db::new();
        db.dig(1, 0, 0, 0);
        db.dig(2, 2, 0, 0);
        db.dig(3, 4, 0, 0);
        assert_eq!(db.inner.deposit_count(), 3);
        db.dig(4, 1, 0, 0);
        let change = db.dig(5, 3, 0, 0);
        let DepositChange::Merged { old, new } = change else {
            panic!("expected merge, got {:?}", change);
        };
        assert_eq!(old.len(), 2);
        assert_eq!(db.inner.deposit_count(), 1);
        let deposit = db.inner.deposit(new.id).unwrap();
        assert_eq!(deposit.len(), 5);
        for x in 0..=4 {
            assert_eq!(
                db.inner.block_at(Coords::new(x, 0, 0)).unwrap().deposit(),
                new.id
            );
        }
    }

    #[test]
    fn test_same_coordinate_first_seen_wins() {
        let mut db = Db::new();
        db.dig(10, 0, 0, 0);
        assert_eq!(db.dig(5, 0, 0, 0), DepositChange::Unchanged);
        assert_eq!(
            db.inner.block_at(Coords::new(0, 0, 0)).unwrap().edit().time,
            10
        );
    }

    #[test]
    fn test_lower_block_moves_deposit_in_index() {
        let mut db = Db::new();
        db.dig(100, 0, 20, 0);
        db.dig(200, 50, 20, 50);
        let first = db.inner.get_deposit(1).unwrap().id();
        db.dig(300, 0, 19, 0);
        assert_ne!(db.inner.get_deposit(1).unwrap().id(), first);
        assert_eq!(db.inner.get_deposit(2).unwrap().key().time, 300);
    }
}
