// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat category definitions.
//!
//! A category pairs a full-line pattern with a routing tag. The optional
//! `initial` pattern and `extensible` flag describe lines that a server may
//! split across several messages. They are kept as data only: classification
//! never rejoins continuation lines.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::core::error::{BlockWatchError, BlockWatchResult};

/// Id and tag of the reserved catch-all category.
pub const UNKNOWN_CATEGORY: &str = "unknown";

static MATCH_ANYTHING: Lazy<Regex> =
    Lazy::new(|| Regex::new("^(?s:.*)$").expect("static pattern compiles"));

/// A named classification rule.
#[derive(Debug, Clone)]
pub struct ChatCategory {
    id: String,
    tag: String,
    pattern: Regex,
    initial_pattern: Option<Regex>,
    extensible: bool,
}

impl ChatCategory {
    /// Compile a category. Both patterns are anchored to the whole line.
    pub fn new(
        id: impl Into<String>,
        tag: impl Into<String>,
        pattern: &str,
        initial: Option<&str>,
        extensible: bool,
    ) -> BlockWatchResult<Self> {
        let id = id.into();
        let pattern = compile_anchored(&id, pattern)?;
        let initial_pattern = match initial {
            Some(text) => Some(compile_anchored(&id, text)?),
            None => None,
        };
        Ok(Self {
            id,
            tag: tag.into(),
            pattern,
            initial_pattern,
            extensible,
        })
    }

    /// The reserved match-anything category.
    pub(crate) fn unknown() -> Self {
        Self {
            id: UNKNOWN_CATEGORY.to_string(),
            tag: UNKNOWN_CATEGORY.to_string(),
            pattern: MATCH_ANYTHING.clone(),
            initial_pattern: None,
            extensible: false,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[inline]
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    #[inline]
    pub fn initial_pattern(&self) -> Option<&Regex> {
        self.initial_pattern.as_ref()
    }

    #[inline]
    pub fn is_extensible(&self) -> bool {
        self.extensible
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        self.id == UNKNOWN_CATEGORY
    }

    /// True if the full pattern matches the entire line.
    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    pub fn captures<'t>(&self, line: &'t str) -> Option<Captures<'t>> {
        self.pattern.captures(line)
    }
}

fn compile_anchored(id: &str, pattern: &str) -> BlockWatchResult<Regex> {
    Regex::new(&format!("^(?:{})$", pattern))
        .map_err(|e| BlockWatchError::invalid_pattern(id, e.to_string()))
}
