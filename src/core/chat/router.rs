// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tag dispatch table: tag string to the set of handlers interested in it.
//!
//! Built explicitly at startup. Handlers registered under one tag form a set,
//! so invocation order among them is unspecified.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::classifier::TaggedLine;

#[derive(Debug, Clone)]
pub struct TagRouter<H> {
    handlers: HashMap<String, HashSet<H>>,
}

impl<H> TagRouter<H>
where
    H: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register `handler` for `tag`. Returns false if it was already registered.
    pub fn add_handler(&mut self, tag: impl Into<String>, handler: H) -> bool {
        self.handlers.entry(tag.into()).or_default().insert(handler)
    }

    pub fn remove_handler(&mut self, tag: &str, handler: &H) -> bool {
        match self.handlers.get_mut(tag) {
            Some(set) => set.remove(handler),
            None => false,
        }
    }

    /// Snapshot of the handlers for `tag` (empty when none are registered).
    pub fn handlers_for(&self, tag: &str) -> Vec<H> {
        self.handlers
            .get(tag)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Invoke `f` once per handler registered under the line's tag.
    ///
    /// Returns the number of handlers invoked; zero is a silent no-op.
    pub fn dispatch<F>(&self, line: &TaggedLine, mut f: F) -> usize
    where
        F: FnMut(&H, &TaggedLine),
    {
        match self.handlers.get(line.tag()) {
            Some(set) => {
                for handler in set {
                    f(handler, line);
                }
                set.len()
            }
            None => 0,
        }
    }

    pub fn has_handlers(&self, tag: &str) -> bool {
        self.handlers.get(tag).is_some_and(|set| !set.is_empty())
    }
}

impl<H> Default for TagRouter<H>
where
    H: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
