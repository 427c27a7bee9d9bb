// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thread-safe entry point into a [`Session`](super::Session).
//!
//! Network or I/O threads only enqueue [`SessionTask`]s through a cloneable
//! [`SessionIngress`]. The session drains and applies them on its own thread
//! during [`tick`](super::Session::tick), so the stores are only ever
//! mutated from one place.

use std::fmt;
use std::sync::Arc;

use crossbeam_channel::Sender;
use log::debug;

use crate::core::util::Clock;

/// Work handed to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTask {
    /// A raw chat line and its local receive time.
    Chat { text: String, received_at: i64 },
    GameMode { creative: bool },
    /// The player moved to another world or dimension.
    Dimension(String),
    /// Local clock minus server clock, in milliseconds.
    ServerTimeOffset(i64),
}

#[derive(Clone)]
pub struct SessionIngress {
    sender: Sender<SessionTask>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for SessionIngress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionIngress")
            .field("queued", &self.sender.len())
            .finish()
    }
}

impl SessionIngress {
    pub(crate) fn new(sender: Sender<SessionTask>, clock: Arc<dyn Clock>) -> Self {
        Self { sender, clock }
    }

    /// Enqueue a task. Returns `false` once the session is gone.
    pub fn send(&self, task: SessionTask) -> bool {
        match self.sender.send(task) {
            Ok(()) => true,
            Err(e) => {
                debug!("Session closed; dropping {:?}", e.into_inner());
                false
            }
        }
    }

    /// Enqueue a chat line, stamped with the current local time.
    pub fn chat(&self, text: impl Into<String>) -> bool {
        self.send(SessionTask::Chat {
            text: text.into(),
            received_at: self.clock.now_millis(),
        })
    }

    pub fn game_mode(&self, creative: bool) -> bool {
        self.send(SessionTask::GameMode { creative })
    }

    pub fn dimension(&self, name: impl Into<String>) -> bool {
        self.send(SessionTask::Dimension(name.into()))
    }

    pub fn server_time_offset(&self, offset_ms: i64) -> bool {
        self.send(SessionTask::ServerTimeOffset(offset_ms))
    }
}
