// SPDX-License-Identifier: MIT OR Apache-2.0

//! # blockwatch
//!
//! Recovers block edit history from the chat output of the LogBlock, Prism
//! and CoreProtect server plugins, and clusters destroyed ores into deposits.
//!
//! Chat lines flow through [`core::chat`] (classification and routing) into
//! [`core::analysis`] (header/detail correlation), land as edits in
//! [`core::db`], and are clustered by [`core::db::ore`]. A
//! [`core::session::Session`] ties it together for one connection.

pub mod core;
