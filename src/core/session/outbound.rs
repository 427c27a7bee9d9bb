// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rate-limited queue of commands bound for the server.

use std::collections::VecDeque;

use log::debug;

/// Whatever actually delivers a command to the server.
pub trait CommandSink {
    fn send_command(&mut self, command: &str);
}

impl CommandSink for Vec<String> {
    fn send_command(&mut self, command: &str) {
        self.push(command.to_string());
    }
}

/// FIFO of outbound commands, released no closer together than `spacing_ms`.
#[derive(Debug, Clone)]
pub struct OutboundQueue {
    queue: VecDeque<String>,
    spacing_ms: i64,
    last_sent: Option<i64>,
}

impl OutboundQueue {
    pub fn new(spacing_ms: i64) -> Self {
        Self {
            queue: VecDeque::new(),
            spacing_ms: spacing_ms.max(0),
            last_sent: None,
        }
    }

    pub fn push(&mut self, command: impl Into<String>) {
        let command = command.into();
        debug!("Queued command '{}'", command);
        self.queue.push_back(command);
    }

    /// Next command if one is queued and the spacing since the last one has
    /// elapsed at `now`.
    pub fn poll(&mut self, now: i64) -> Option<String> {
        if let Some(last) = self.last_sent {
            if now - last < self.spacing_ms {
                return None;
            }
        }
        let command = self.queue.pop_front()?;
        self.last_sent = Some(now);
        Some(command)
    }

    /// Send at most one due command to `sink`. Returns whether one was sent.
    pub fn dispatch(&mut self, now: i64, sink: &mut dyn CommandSink) -> bool {
        match self.poll(now) {
            Some(command) => {
                sink.send_command(&command);
                true
            }
            None => false,
        }
    }

    /// Queued commands, next first.
    pub fn pending(&self) -> impl Iterator<Item = &str> + '_ {
        self.queue.iter().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
