// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod block_type;
pub mod edit;

pub use block_type::{BlockType, BlockTypeRef, BlockTypeRegistry};
pub use edit::{Annotation, Coords, Edit, EditRef};
