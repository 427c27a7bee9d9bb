// SPDX-License-Identifier: MIT OR Apache-2.0

//! Block types and the name/id lookup used to turn plugin text back into types.

use log::error;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::core::error::{BlockWatchError, BlockWatchResult};

/// Id reserved for the "unknown" sentinel type.
pub const UNKNOWN_ID: u16 = 4095;

const DEFAULT_BLOCKS_YAML: &str = include_str!("../../../resources/blocks.yml");

/// A kind of block, identified by numeric id and data value.
#[derive(Debug, Clone)]
pub struct BlockType {
    id: u16,
    data: u8,
    names: Vec<String>,
}

pub type BlockTypeRef = Arc<BlockType>;

impl BlockType {
    pub fn new(id: u16, data: u8, names: Vec<String>) -> Self {
        Self {
            id: id & 0x0FFF,
            data: data & 0x0F,
            names,
        }
    }

    #[inline]
    pub fn id(&self) -> u16 {
        self.id
    }

    #[inline]
    pub fn data(&self) -> u8 {
        self.data
    }

    /// 16-bit composite of id (12 bits) and data (4 bits).
    #[inline]
    pub fn index(&self) -> u16 {
        (self.id << 4) | u16::from(self.data)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Preferred display name: the first alias, or `id:data` when there is none.
    pub fn name(&self) -> String {
        match self.names.first() {
            Some(name) => name.clone(),
            None => format!("{}:{}", self.id, self.data),
        }
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        self.id == UNKNOWN_ID
    }
}

impl PartialEq for BlockType {
    fn eq(&self, other: &Self) -> bool {
        self.index() == other.index()
    }
}

impl Eq for BlockType {}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Deserialize)]
struct BlocksFile {
    #[serde(default)]
    blocks: Vec<serde_yaml::Value>,
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    id: u16,
    #[serde(default)]
    data: u8,
    #[serde(default)]
    names: Vec<String>,
}

/// Lookup of block types by name alias and by (id, data).
#[derive(Debug, Clone)]
pub struct BlockTypeRegistry {
    by_index: HashMap<u16, BlockTypeRef>,
    by_name: HashMap<String, BlockTypeRef>,
    unknown: BlockTypeRef,
}

impl BlockTypeRegistry {
    /// An empty registry: every lookup yields the unknown type.
    pub fn new() -> Self {
        Self {
            by_index: HashMap::new(),
            by_name: HashMap::new(),
            unknown: Arc::new(BlockType::new(UNKNOWN_ID, 15, vec!["unknown".to_string()])),
        }
    }

    /// Registry loaded from the bundled block list.
    pub fn defaults() -> Self {
        match Self::from_yaml(DEFAULT_BLOCKS_YAML) {
            Ok(registry) => registry,
            Err(e) => {
                error!("Bundled block list failed to load: {}", e);
                Self::new()
            }
        }
    }

    /// Load a registry from YAML. Individual bad entries are logged and skipped.
    pub fn from_yaml(text: &str) -> BlockWatchResult<Self> {
        let file: BlocksFile = serde_yaml::from_str(text)?;
        let mut registry = Self::new();
        for (position, value) in file.blocks.into_iter().enumerate() {
            match serde_yaml::from_value::<RawBlock>(value) {
                Ok(raw) => {
                    if raw.id >= UNKNOWN_ID || raw.data > 15 {
                        error!(
                            "Block entry {} ({}:{}) is out of range; skipped",
                            position, raw.id, raw.data
                        );
                        continue;
                    }
                    registry.register(BlockType::new(raw.id, raw.data, raw.names));
                }
                Err(e) => error!("Block entry {} is malformed: {}; skipped", position, e),
            }
        }
        Ok(registry)
    }

    /// Add a type. Later registrations replace earlier ones with the same index
    /// or alias.
    pub fn register(&mut self, block: BlockType) -> BlockTypeRef {
        let block = Arc::new(block);
        for name in block.names() {
            self.by_name.insert(normalize_name(name), Arc::clone(&block));
        }
        self.by_index.insert(block.index(), Arc::clone(&block));
        block
    }

    /// Look up by alias; unrecognised names give the unknown type.
    pub fn by_name(&self, name: &str) -> BlockTypeRef {
        self.find_by_name(name)
            .unwrap_or_else(|| Arc::clone(&self.unknown))
    }

    pub fn find_by_name(&self, name: &str) -> Option<BlockTypeRef> {
        self.by_name.get(&normalize_name(name)).cloned()
    }

    /// Look up by id and data.
    ///
    /// A data value with no entry of its own borrows the names of `id:0`, so
    /// the numeric identity of the edit survives a save/load cycle.
    pub fn by_id_data(&self, id: u16, data: u8) -> BlockTypeRef {
        if id >= UNKNOWN_ID || data > 15 {
            return Arc::clone(&self.unknown);
        }
        let index = (id << 4) | u16::from(data);
        if let Some(block) = self.by_index.get(&index) {
            return Arc::clone(block);
        }
        match self.by_index.get(&(id << 4)) {
            Some(base) => Arc::new(BlockType::new(id, data, base.names().to_vec())),
            None => Arc::new(BlockType::new(id, data, Vec::new())),
        }
    }

    pub fn unknown(&self) -> BlockTypeRef {
        Arc::clone(&self.unknown)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }
}

impl Default for BlockTypeRegistry {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Canonical form of a block alias: lower case, no namespace, underscores.
pub fn normalize_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let bare = lower.strip_prefix("minecraft:").unwrap_or(&lower);
    bare.replace(' ', "_")
}

/// Guard used by loaders that accept numeric ids from text.
pub fn parse_id_data(id: &str, data: &str) -> BlockWatchResult<(u16, u8)> {
    let id_value: u16 = id
        .trim()
        .parse()
        .map_err(|e| BlockWatchError::malformed_field("id", id, format!("{}", e)))?;
    let data_value: u8 = data
        .trim()
        .parse()
        .map_err(|e| BlockWatchError::malformed_field("data", data, format!("{}", e)))?;
    Ok((id_value, data_value))
}
