// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::core::model::{Coords, EditRef};

use super::ore_deposit::DepositId;

/// One destroyed ore position. The first destruction seen at a coordinate is
/// the one kept.
#[derive(Debug, Clone)]
pub struct OreBlock {
    coords: Coords,
    edit: EditRef,
    deposit: DepositId,
    /// Insertion order within the owning [`OreDb`](super::OreDb).
    seq: u64,
}

impl OreBlock {
    pub(crate) fn new(edit: EditRef, deposit: DepositId, seq: u64) -> Self {
        Self {
            coords: edit.coords(),
            edit,
            deposit,
            seq,
        }
    }

    #[inline]
    pub fn coords(&self) -> Coords {
        self.coords
    }

    #[inline]
    pub fn edit(&self) -> &EditRef {
        &self.edit
    }

    #[inline]
    pub fn deposit(&self) -> DepositId {
        self.deposit
    }

    #[inline]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub(crate) fn set_deposit(&mut self, deposit: DepositId) {
        self.deposit = deposit;
    }
}
