// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Spatial ore clustering
//!
//! Destroyed ore blocks are grouped into deposits: maximal sets of blocks of
//! the same [`OreBucket`] connected through any of the 26 surrounding
//! positions. Deposits are ordered by the time of their key block (the
//! lowest one, then the earliest) and addressed by 1-based position.

pub mod ore_block;
pub mod ore_bucket;
pub mod ore_db;
pub mod ore_deposit;
pub mod positional;
pub mod typed_ore_db;

pub use ore_block::OreBlock;
pub use ore_bucket::OreBucket;
pub use ore_db::{OreDb, OreSummary};
pub use ore_deposit::{DepositId, DepositKey, OreDeposit};
pub use typed_ore_db::{DepositChange, TypedOreDb};
