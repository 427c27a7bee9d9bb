// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;

use blockwatch_rust::core::config::SessionConfig;
use blockwatch_rust::core::db::{BlockEditSet, EditContext, PlayerFilter};
use blockwatch_rust::core::model::{BlockTypeRegistry, Coords, Edit};
use blockwatch_rust::core::session::Session;
use blockwatch_rust::core::util::clock::to_millis;
use blockwatch_rust::core::util::ManualClock;

/// 2024-06-01 12:00:00 local.
pub fn noon() -> i64 {
    to_millis(
        &NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap(),
    )
}

/// A session on a manual clock, fed line by line through its ingress.
pub struct SessionRunner {
    pub session: Session,
    pub clock: ManualClock,
    pub sent: Vec<String>,
}

impl SessionRunner {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        let clock = ManualClock::new(noon());
        let session = Session::new(config, Arc::new(clock.clone()));
        Self {
            session,
            clock,
            sent: Vec::new(),
        }
    }

    /// Deliver `line` after `gap_ms` and let the session process it.
    pub fn chat(&mut self, gap_ms: i64, line: &str) -> &mut Self {
        self.clock.advance(gap_ms);
        self.session.ingress().chat(line);
        self.session.tick(&mut self.sent);
        self
    }

    /// Let time pass until every queued command went out.
    pub fn drain(&mut self) -> &mut Self {
        while !self.session.outbound().is_empty() {
            self.clock.advance(self.session.config().command_spacing_ms.max(1));
            self.session.tick(&mut self.sent);
        }
        self
    }

    pub fn edits(&self) -> &BlockEditSet {
        self.session.edits().expect("edits recorded")
    }
}

/// An edit set fed directly, bypassing chat.
pub struct EditFeeder {
    pub blocks: BlockTypeRegistry,
    pub set: BlockEditSet,
    pub filter: PlayerFilter,
}

impl EditFeeder {
    pub fn new() -> Self {
        Self {
            blocks: BlockTypeRegistry::defaults(),
            set: BlockEditSet::new(),
            filter: PlayerFilter::new(),
        }
    }

    pub fn edit(&self, time: i64, player: &str, creation: bool, xyz: (i32, i32, i32), block: &str) -> Edit {
        Edit::new(
            time,
            player,
            creation,
            Coords::new(xyz.0, xyz.1, xyz.2),
            self.blocks.by_name(block),
        )
    }

    pub fn destroy(&mut self, time: i64, player: &str, xyz: (i32, i32, i32), block: &str) -> bool {
        let edit = self.edit(time, player, false, xyz, block);
        let mut ctx = EditContext::new(&self.filter, true);
        self.set.add_edit(edit, &mut ctx, false)
    }
}
