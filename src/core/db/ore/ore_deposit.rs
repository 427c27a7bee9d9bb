// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

use crate::core::model::{Coords, EditRef};

use super::ore_bucket::OreBucket;

/// Identity of a deposit, unique within one [`OreDb`](super::OreDb) and
/// increasing with creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DepositId(pub u64);

impl fmt::Display for DepositId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Sort key of a deposit: key-block time, then creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DepositKey {
    pub time: i64,
    pub id: DepositId,
}

/// A 26-connected cluster of destroyed ore blocks of one bucket.
///
/// Never empty. The key block is the lowest block, ties going to the earliest
/// edit and then to the block added first.
#[derive(Debug, Clone)]
pub struct OreDeposit {
    id: DepositId,
    bucket: OreBucket,
    blocks: Vec<EditRef>,
    key: EditRef,
    earliest: EditRef,
    latest: EditRef,
}

impl OreDeposit {
    pub fn new(id: DepositId, bucket: OreBucket, first: EditRef) -> Self {
        Self {
            id,
            bucket,
            blocks: vec![first.clone()],
            key: first.clone(),
            earliest: first.clone(),
            latest: first,
        }
    }

    /// A new deposit combining `parts` (in the given order) with `bridge`.
    pub(crate) fn merged(
        id: DepositId,
        bucket: OreBucket,
        parts: Vec<OreDeposit>,
        bridge: EditRef,
    ) -> Self {
        let mut edits = parts.into_iter().flat_map(|part| part.blocks.into_iter());
        let mut deposit = match edits.next() {
            Some(first) => OreDeposit::new(id, bucket, first),
            None => return OreDeposit::new(id, bucket, bridge),
        };
        for edit in edits {
            deposit.add(edit);
        }
        deposit.add(bridge);
        deposit
    }

    pub(crate) fn add(&mut self, edit: EditRef) {
        if (edit.y, edit.time) < (self.key.y, self.key.time) {
            self.key = edit.clone();
        }
        if edit.time < self.earliest.time {
            self.earliest = edit.clone();
        }
        if edit.time > self.latest.time {
            self.latest = edit.clone();
        }
        self.blocks.push(edit);
    }

    #[inline]
    pub fn id(&self) -> DepositId {
        self.id
    }

    #[inline]
    pub fn bucket(&self) -> OreBucket {
        self.bucket
    }

    #[inline]
    pub fn key(&self) -> &EditRef {
        &self.key
    }

    #[inline]
    pub fn key_coords(&self) -> Coords {
        self.key.coords()
    }

    #[inline]
    pub fn earliest(&self) -> &EditRef {
        &self.earliest
    }

    #[inline]
    pub fn latest(&self) -> &EditRef {
        &self.latest
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block edits in the order they joined the deposit.
    pub fn blocks(&self) -> &[EditRef] {
        &self.blocks
    }

    #[inline]
    pub fn sort_key(&self) -> DepositKey {
        DepositKey {
            time: self.key.time,
            id: self.id,
        }
    }
}
