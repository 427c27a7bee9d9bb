// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Chat Classifier
//!
//! Turns a raw chat line into a [`TaggedLine`]: colour codes are stripped, the
//! registry is scanned in registration order and the first category whose
//! pattern matches the entire line wins. Lines nothing matches are tagged
//! `unknown`.
//!
//! Every classified line is written to the `blockwatch::chat` log target at
//! debug level, whatever its tag.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use super::category::{ChatCategory, UNKNOWN_CATEGORY};
use super::registry::ChatCategoryRegistry;

/// Log target receiving every classified line.
pub const CHAT_LOG_TARGET: &str = "blockwatch::chat";

static FORMATTING_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new("(?i)\u{00A7}[0-9a-fk-or]").expect("static pattern compiles"));

/// Remove `§x` formatting codes from a chat line.
pub fn strip_formatting(raw: &str) -> String {
    FORMATTING_CODE.replace_all(raw, "").into_owned()
}

/// A chat line together with the category that claimed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedLine {
    raw: String,
    text: String,
    category_id: String,
    tag: String,
    groups: HashMap<String, String>,
}

impl TaggedLine {
    fn from_match(raw: &str, text: String, category: &ChatCategory) -> Self {
        let mut groups = HashMap::new();
        if let Some(captures) = category.captures(&text) {
            for name in category.pattern().capture_names().flatten() {
                if let Some(value) = captures.name(name) {
                    groups.insert(name.to_string(), value.as_str().to_string());
                }
            }
        }
        Self {
            raw: raw.to_string(),
            text,
            category_id: category.id().to_string(),
            tag: category.tag().to_string(),
            groups,
        }
    }

    /// The line as received, formatting codes included.
    #[inline]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The line with formatting codes removed.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        self.category_id == UNKNOWN_CATEGORY
    }

    /// Value of a named capture group, if it participated in the match.
    pub fn group(&self, name: &str) -> Option<&str> {
        self.groups.get(name).map(String::as_str)
    }
}

/// Linear first-match classifier over a [`ChatCategoryRegistry`].
#[derive(Debug, Clone)]
pub struct ChatClassifier {
    registry: ChatCategoryRegistry,
}

impl ChatClassifier {
    pub fn new(registry: ChatCategoryRegistry) -> Self {
        Self { registry }
    }

    #[inline]
    pub fn registry(&self) -> &ChatCategoryRegistry {
        &self.registry
    }

    /// Classify one line. Never fails: no match means the `unknown` category.
    pub fn classify(&self, raw: &str) -> TaggedLine {
        let text = strip_formatting(raw);
        let category = self
            .registry
            .categories()
            .iter()
            .find(|category| category.matches(&text))
            .unwrap_or_else(|| self.registry.unknown());
        let line = TaggedLine::from_match(raw, text, category);
        log::debug!(target: CHAT_LOG_TARGET, "[{}] {}", line.tag(), line.text());
        line
    }
}

impl Default for ChatClassifier {
    fn default() -> Self {
        Self::new(ChatCategoryRegistry::defaults())
    }
}
