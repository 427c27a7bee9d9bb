// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeSet;

/// Case-insensitive set of players whose edits are kept. Empty accepts all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerFilter {
    players: BTreeSet<String>,
}

impl PlayerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accepts(&self, player: &str) -> bool {
        self.players.is_empty() || self.players.contains(&player.to_lowercase())
    }

    /// Returns `false` if the player was already listed.
    pub fn add(&mut self, player: &str) -> bool {
        self.players.insert(player.to_lowercase())
    }

    pub fn remove(&mut self, player: &str) -> bool {
        self.players.remove(&player.to_lowercase())
    }

    pub fn clear(&mut self) {
        self.players.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Listed players, lower case, sorted.
    pub fn players(&self) -> impl Iterator<Item = &str> + '_ {
        self.players.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for PlayerFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut filter = PlayerFilter::new();
        for player in iter {
            filter.add(player.as_ref());
        }
        filter
    }
}
