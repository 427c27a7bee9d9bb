// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolve the block text printed by a plugin to a [`BlockTypeRef`].
//!
//! Accepted shapes: `diamond_ore`, `Diamond Ore`, `minecraft:diamond_ore`,
//! `#56`, `#56:2` and `#56 (Diamond Ore)`. Unrecognised names resolve to the
//! registry's unknown type; a numeric id that does not fit is malformed.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::error::{BlockWatchError, BlockWatchResult};
use crate::core::model::{BlockTypeRef, BlockTypeRegistry};

static NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(\d+)(?::(\d+))?(?:\s*\(.*\))?$").expect("static pattern compiles")
});

pub fn resolve_block(text: &str, blocks: &BlockTypeRegistry) -> BlockWatchResult<BlockTypeRef> {
    let text = text.trim();
    let Some(captures) = NUMERIC.captures(text) else {
        return Ok(blocks.by_name(text));
    };
    let id_text = captures.get(1).map_or("", |m| m.as_str());
    let id: u16 = id_text
        .parse()
        .map_err(|e| BlockWatchError::malformed_field("block id", id_text, format!("{}", e)))?;
    let data: u8 = match captures.get(2) {
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|e| BlockWatchError::malformed_field("block data", m.as_str(), format!("{}", e)))?,
        None => 0,
    };
    Ok(blocks.by_id_data(id, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_and_ids_resolve_to_same_type() {
        let blocks = BlockTypeRegistry::defaults();
        let by_name = resolve_block("diamond_ore", &blocks).unwrap();
        let by_id = resolve_block("#56 (Diamond Ore)", &blocks).unwrap();
        assert_eq!(by_name, by_id);
        assert_eq!(resolve_block("minecraft:diamond_ore", &blocks).unwrap().id(), 56);
    }

    #[test]
    fn test_id_with_data() {
        let blocks = BlockTypeRegistry::defaults();
        let block = resolve_block("#17:1", &blocks).unwrap();
        assert_eq!((block.id(), block.data()), (17, 1));
    }

    #[test]
    fn test_unknown_name_is_not_an_error() {
        let blocks = BlockTypeRegistry::defaults();
        assert!(resolve_block("mystery block", &blocks).unwrap().is_unknown());
    }

    #[test]
    fn test_oversized_id_is_malformed() {
        let blocks = BlockTypeRegistry::defaults();
        assert!(resolve_block("#99999999", &blocks).is_err());
    }
}
