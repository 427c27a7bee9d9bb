// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Edit record store
//!
//! Edits recovered from chat are kept per world in a [`BlockEditSet`], per
//! player in a [`PlayerEditSet`], and ore destructions are clustered into
//! deposits by the [`ore`] engine.

pub mod block_edit_set;
pub mod filters;
pub mod ore;
pub mod persistence;
pub mod player_edit_set;

pub use block_edit_set::{BlockEditSet, EditContext, PlayerSummary};
pub use filters::PlayerFilter;
pub use ore::{OreBucket, OreDb, OreDeposit};
pub use persistence::LoadReport;
pub use player_edit_set::{PlayerEditSet, PlayerKey};
