// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Chat Category Registry
//!
//! Ordered collection of [`ChatCategory`] definitions. Registration order is
//! significant: the classifier takes the first category that matches, so two
//! overlapping patterns are disambiguated purely by which was registered
//! first.
//!
//! ## Loading
//!
//! Categories come from YAML (`categories:` list). Every entry is validated on
//! its own; a missing field, a pattern that fails to compile or a duplicate id
//! is logged at error level and that entry is skipped. The rest of the file
//! still loads.
//!
//! ```yaml
//! categories:
//!   - id: lb.position
//!     tag: lb.position
//!     pattern: 'Block changes at (?P<x>-?\d+):(?P<y>-?\d+):(?P<z>-?\d+) in (?P<world>.+):'
//! ```

use log::error;
use serde::Deserialize;
use std::collections::HashSet;

use super::category::{ChatCategory, UNKNOWN_CATEGORY};
use crate::core::error::{BlockWatchError, BlockWatchResult};

const DEFAULT_CATEGORIES_YAML: &str = include_str!("../../../resources/chat_categories.yml");

#[derive(Debug, Deserialize)]
struct CategoriesFile {
    #[serde(default)]
    categories: Vec<serde_yaml::Value>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    id: Option<String>,
    tag: Option<String>,
    pattern: Option<String>,
    initial: Option<String>,
    #[serde(default)]
    extensible: bool,
}

/// Ordered set of chat categories, plus the reserved `unknown` fallback.
#[derive(Debug, Clone)]
pub struct ChatCategoryRegistry {
    categories: Vec<ChatCategory>,
    ids: HashSet<String>,
    unknown: ChatCategory,
}

impl ChatCategoryRegistry {
    /// An empty registry. Every line classifies as `unknown`.
    pub fn new() -> Self {
        let mut ids = HashSet::new();
        ids.insert(UNKNOWN_CATEGORY.to_string());
        Self {
            categories: Vec::new(),
            ids,
            unknown: ChatCategory::unknown(),
        }
    }

    /// Registry loaded from the bundled category file.
    pub fn defaults() -> Self {
        let mut registry = Self::new();
        if let Err(e) = registry.load_yaml(DEFAULT_CATEGORIES_YAML) {
            error!("Bundled chat categories failed to load: {}", e);
        }
        registry
    }

    pub fn from_yaml(text: &str) -> BlockWatchResult<Self> {
        let mut registry = Self::new();
        registry.load_yaml(text)?;
        Ok(registry)
    }

    /// Append the categories in `text`, in file order.
    ///
    /// Only a document that is not YAML at all is an error. Returns the number
    /// of categories that were registered.
    pub fn load_yaml(&mut self, text: &str) -> BlockWatchResult<usize> {
        let file: CategoriesFile = serde_yaml::from_str(text)?;
        let mut loaded = 0;
        for (position, value) in file.categories.into_iter().enumerate() {
            match self.register_value(position, value) {
                Ok(()) => loaded += 1,
                Err(e) => error!("Chat category entry {} skipped: {}", position, e),
            }
        }
        Ok(loaded)
    }

    fn register_value(&mut self, position: usize, value: serde_yaml::Value) -> BlockWatchResult<()> {
        let context = format!("chat category entry {}", position);
        let raw: RawCategory = serde_yaml::from_value(value)?;
        let id = raw
            .id
            .ok_or_else(|| BlockWatchError::missing_field("id", &context))?;
        let tag = raw
            .tag
            .ok_or_else(|| BlockWatchError::missing_field("tag", &context))?;
        let pattern = raw
            .pattern
            .ok_or_else(|| BlockWatchError::missing_field("pattern", &context))?;
        let category = ChatCategory::new(id, tag, &pattern, raw.initial.as_deref(), raw.extensible)?;
        self.register(category)
    }

    /// Append one category. Duplicate ids (including `unknown`) are rejected.
    pub fn register(&mut self, category: ChatCategory) -> BlockWatchResult<()> {
        if !self.ids.insert(category.id().to_string()) {
            return Err(BlockWatchError::duplicate_category(category.id()));
        }
        self.categories.push(category);
        Ok(())
    }

    /// Registered categories in registration order, excluding `unknown`.
    pub fn categories(&self) -> &[ChatCategory] {
        &self.categories
    }

    pub fn get(&self, id: &str) -> Option<&ChatCategory> {
        self.categories.iter().find(|c| c.id() == id)
    }

    #[inline]
    pub fn unknown(&self) -> &ChatCategory {
        &self.unknown
    }

    /// Distinct tags, in order of first registration.
    pub fn tags(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.categories
            .iter()
            .map(ChatCategory::tag)
            .filter(|tag| seen.insert(*tag))
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for ChatCategoryRegistry {
    fn default() -> Self {
        Self::defaults()
    }
}
