// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod analysis;
pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod session;
pub mod util;

pub use error::{BlockWatchError, BlockWatchResult};
