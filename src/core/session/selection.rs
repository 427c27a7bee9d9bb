// SPDX-License-Identifier: MIT OR Apache-2.0

//! The "current selection": the edit most recently picked out by a query.
//! Read by anything that builds commands or names from it.

use std::collections::HashMap;

use crate::core::model::Edit;
use crate::core::util::template::time_vars;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub player: Option<String>,
    pub time: Option<i64>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub z: Option<i32>,
    pub block_id: Option<u16>,
    pub block_data: Option<u8>,
    pub block_name: Option<String>,
    pub creation: Option<bool>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `edit` the current selection.
    pub fn select(&mut self, edit: &Edit) {
        self.player = Some(edit.player.clone());
        self.time = Some(edit.time);
        self.x = Some(edit.x);
        self.y = Some(edit.y);
        self.z = Some(edit.z);
        self.block_id = Some(edit.block.id());
        self.block_data = Some(edit.block.data());
        self.block_name = Some(edit.block.name());
        self.creation = Some(edit.creation);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.time.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// String value of one variable: `player`, `time`, `x`, `y`, `z`,
    /// `block`, `id`, `data`, `action`.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "player" => self.player.clone(),
            "time" => self.time.map(|t| t.to_string()),
            "x" => self.x.map(|v| v.to_string()),
            "y" => self.y.map(|v| v.to_string()),
            "z" => self.z.map(|v| v.to_string()),
            "block" => self.block_name.clone(),
            "id" => self.block_id.map(|v| v.to_string()),
            "data" => self.block_data.map(|v| v.to_string()),
            "action" => self
                .creation
                .map(|c| if c { "created" } else { "destroyed" }.to_string()),
            _ => None,
        }
    }

    /// Every set variable, plus the date/time parts of the selection time
    /// shifted by `time_offset_ms`.
    pub fn vars(&self, time_offset_ms: i64) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        for key in ["player", "time", "x", "y", "z", "block", "id", "data", "action"] {
            if let Some(value) = self.get(key) {
                vars.insert(key.to_string(), value);
            }
        }
        if let Some(time) = self.time {
            vars.extend(time_vars(time + time_offset_ms));
        }
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{BlockTypeRegistry, Coords};

    #[test]
    fn test_select_and_get() {
        let blocks = BlockTypeRegistry::defaults();
        let edit = Edit::new(0, "Alice", false, Coords::new(1, -2, 3), blocks.by_name("gold_ore"));
        let mut selection = Selection::new();
        assert!(selection.is_empty());
        selection.select(&edit);
        assert_eq!(selection.get("player").as_deref(), Some("Alice"));
        assert_eq!(selection.get("y").as_deref(), Some("-2"));
        assert_eq!(selection.get("id").as_deref(), Some("14"));
        assert_eq!(selection.get("action").as_deref(), Some("destroyed"));
        assert_eq!(selection.get("nonsense"), None);
    }

    #[test]
    fn test_vars_apply_offset() {
        let blocks = BlockTypeRegistry::defaults();
        let edit = Edit::new(0, "Alice", true, Coords::new(0, 0, 0), blocks.by_name("stone"));
        let mut selection = Selection::new();
        selection.select(&edit);
        let vars = selection.vars(3_600_000);
        assert_eq!(vars["hour"], "01");
        assert_eq!(vars["year"], "1970");
        assert_eq!(vars["block"], "stone");
    }
}
