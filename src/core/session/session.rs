// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Session
//!
//! Everything that lives for one connection to a server: the classifier and
//! tag router, one analysis per plugin format, the per-dimension edit sets,
//! the current selection, the player filter and the outbound command queue.
//!
//! ## Threading
//!
//! A `Session` is owned by one thread. Other threads talk to it through
//! [`SessionIngress`] handles; queued work is applied when the owner calls
//! [`Session::tick`].
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut session = Session::with_defaults();
//! let ingress = session.ingress();
//! ingress.chat("Block changes at 10:20:30 in world:");
//! let mut sent = Vec::new();
//! session.tick(&mut sent);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::io::{BufRead, Write};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info, trace};

use crate::core::analysis::{
    builtin_formats, AnalysisOutput, CorrelatedAnalysis, Outcome, PluginFormat,
};
use crate::core::chat::{ChatCategoryRegistry, ChatClassifier, TagRouter, CHAT_LOG_TARGET};
use crate::core::config::SessionConfig;
use crate::core::db::{persistence, BlockEditSet, EditContext, LoadReport, PlayerFilter};
use crate::core::error::BlockWatchResult;
use crate::core::model::{BlockTypeRegistry, Coords, Edit};
use crate::core::util::template::expand;
use crate::core::util::{Clock, SystemClock};

use super::ingress::{SessionIngress, SessionTask};
use super::outbound::{CommandSink, OutboundQueue};
use super::selection::Selection;

/// Dimension edits go to before any dimension change is reported.
pub const DEFAULT_DIMENSION: &str = "overworld";

/// Routes analysis results into the session's stores. A dimension's edit
/// set is only created once an edit for it is accepted.
struct SessionOutput<'a> {
    worlds: &'a mut BTreeMap<String, BlockEditSet>,
    dimension: &'a str,
    ctx: EditContext<'a>,
    outbound: &'a mut OutboundQueue,
}

impl AnalysisOutput for SessionOutput<'_> {
    fn record_edit(&mut self, edit: Edit, update_state: bool) -> bool {
        if !self.ctx.filter.accepts(&edit.player) {
            return false;
        }
        self.worlds
            .entry(self.dimension.to_string())
            .or_default()
            .add_edit(edit, &mut self.ctx, update_state)
    }

    fn queue_command(&mut self, command: String) {
        self.outbound.push(command);
    }
}

pub struct Session {
    config: SessionConfig,
    clock: Arc<dyn Clock>,
    blocks: BlockTypeRegistry,
    classifier: ChatClassifier,
    router: TagRouter<usize>,
    analyses: Vec<CorrelatedAnalysis>,
    worlds: BTreeMap<String, BlockEditSet>,
    dimension: String,
    selection: Selection,
    filter: PlayerFilter,
    creative: bool,
    server_time_offset_ms: i64,
    outbound: OutboundQueue,
    sender: Sender<SessionTask>,
    receiver: Receiver<SessionTask>,
}

impl Session {
    /// A session with the bundled chat categories and block list.
    pub fn new(config: SessionConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_registries(
            config,
            clock,
            ChatCategoryRegistry::defaults(),
            BlockTypeRegistry::defaults(),
        )
    }

    /// Default configuration on the system clock.
    pub fn with_defaults() -> Self {
        Self::new(SessionConfig::default(), Arc::new(SystemClock))
    }

    pub fn with_registries(
        config: SessionConfig,
        clock: Arc<dyn Clock>,
        categories: ChatCategoryRegistry,
        blocks: BlockTypeRegistry,
    ) -> Self {
        let (sender, receiver) = unbounded();
        let mut session = Self {
            outbound: OutboundQueue::new(config.command_spacing_ms),
            config,
            clock,
            blocks,
            classifier: ChatClassifier::new(categories),
            router: TagRouter::new(),
            analyses: Vec::new(),
            worlds: BTreeMap::new(),
            dimension: DEFAULT_DIMENSION.to_string(),
            selection: Selection::new(),
            filter: PlayerFilter::new(),
            creative: false,
            server_time_offset_ms: 0,
            sender,
            receiver,
        };
        for format in builtin_formats() {
            session.add_format(format);
        }
        session
    }

    /// Register one more plugin format; its tags are routed to a new analysis.
    pub fn add_format(&mut self, format: PluginFormat) {
        let handler = self.analyses.len();
        for tag in format.tags() {
            if !self
                .classifier
                .registry()
                .categories()
                .iter()
                .any(|c| c.tag() == tag)
            {
                debug!("{} tag '{}' has no chat category", format.name(), tag);
            }
            self.router.add_handler(tag, handler);
        }
        info!("Registered {} analysis", format.name());
        self.analyses
            .push(CorrelatedAnalysis::new(format, self.config.analysis_settings()));
    }

    /// A handle other threads use to feed this session.
    pub fn ingress(&self) -> SessionIngress {
        SessionIngress::new(self.sender.clone(), Arc::clone(&self.clock))
    }

    /// Apply every queued task, then release at most one due outbound
    /// command to `sink`. Returns the number of tasks applied.
    pub fn tick(&mut self, sink: &mut dyn CommandSink) -> usize {
        let tasks: Vec<SessionTask> = self.receiver.try_iter().collect();
        let applied = tasks.len();
        for task in tasks {
            self.apply(task);
        }
        self.outbound.dispatch(self.clock.now_millis(), sink);
        applied
    }

    pub fn apply(&mut self, task: SessionTask) {
        match task {
            SessionTask::Chat { text, received_at } => {
                self.process_line(&text, received_at);
            }
            SessionTask::GameMode { creative } => self.set_creative(creative),
            SessionTask::Dimension(name) => self.set_dimension(name),
            SessionTask::ServerTimeOffset(offset) => self.server_time_offset_ms = offset,
        }
    }

    /// Classify one chat line received at local time `received_at` and hand
    /// it to every analysis interested in its tag.
    pub fn process_line(&mut self, raw: &str, received_at: i64) -> Vec<Outcome> {
        let line = self.classifier.classify(raw);
        if line.is_unknown() {
            if self.config.show_unknown_lines {
                info!(target: CHAT_LOG_TARGET, "Unrecognised: {}", line.text());
            } else {
                trace!(target: CHAT_LOG_TARGET, "Unrecognised: {}", line.text());
            }
            return Vec::new();
        }

        let cluster_ores = self.cluster_ores();
        let mut out = SessionOutput {
            worlds: &mut self.worlds,
            dimension: &self.dimension,
            ctx: EditContext::new(&self.filter, cluster_ores).with_selection(&mut self.selection),
            outbound: &mut self.outbound,
        };
        let analyses = &mut self.analyses;
        let blocks = &self.blocks;
        let mut outcomes = Vec::new();
        self.router.dispatch(&line, |handler, line| {
            if let Some(analysis) = analyses.get_mut(*handler) {
                outcomes.push(analysis.on_line(line, received_at, blocks, &mut out));
            }
        });
        outcomes
    }

    /// Whether ore destructions are clustered right now.
    #[inline]
    pub fn cluster_ores(&self) -> bool {
        !self.creative || self.config.group_ores_in_creative
    }

    pub fn set_creative(&mut self, creative: bool) {
        self.creative = creative;
    }

    #[inline]
    pub fn is_creative(&self) -> bool {
        self.creative
    }

    pub fn set_dimension(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name != self.dimension {
            debug!("Dimension changed to {}", name);
            self.dimension = name;
            for analysis in &mut self.analyses {
                analysis.reset();
            }
        }
    }

    #[inline]
    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    pub fn set_server_time_offset(&mut self, offset_ms: i64) {
        self.server_time_offset_ms = offset_ms;
    }

    #[inline]
    pub fn server_time_offset(&self) -> i64 {
        self.server_time_offset_ms
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[inline]
    pub fn blocks(&self) -> &BlockTypeRegistry {
        &self.blocks
    }

    #[inline]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[inline]
    pub fn filter(&self) -> &PlayerFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut PlayerFilter {
        &mut self.filter
    }

    #[inline]
    pub fn outbound(&self) -> &OutboundQueue {
        &self.outbound
    }

    /// Edits of the current dimension, if any were recorded.
    pub fn edits(&self) -> Option<&BlockEditSet> {
        self.worlds.get(&self.dimension)
    }

    pub fn edits_mut(&mut self) -> &mut BlockEditSet {
        self.worlds.entry(self.dimension.clone()).or_default()
    }

    pub fn world(&self, name: &str) -> Option<&BlockEditSet> {
        self.worlds.get(name)
    }

    pub fn worlds(&self) -> impl Iterator<Item = (&str, &BlockEditSet)> + '_ {
        self.worlds.iter().map(|(name, set)| (name.as_str(), set))
    }

    /// Forget every edit in the current dimension.
    pub fn clear_edits(&mut self) {
        if let Some(set) = self.worlds.get_mut(&self.dimension) {
            set.clear();
        }
        self.selection.clear();
    }

    /// Listing lines for one page of deposits in the current dimension.
    pub fn list_deposits(&self, page: usize) -> Vec<String> {
        self.edits()
            .map(|set| {
                set.ore_db()
                    .list_deposits(page, self.config.deposits_per_page)
            })
            .unwrap_or_default()
    }

    /// Queue a teleport to the key block of deposit `index` (1-based, wrapping).
    /// Returns the command, or `None` when there are no deposits.
    pub fn teleport_to_deposit(&mut self, index: i64) -> Option<String> {
        let ore_db = self.worlds.get_mut(&self.dimension)?.ore_db_mut();
        let coords = ore_db.teleport_to(index)?.1.key_coords();
        let command = self.teleport_command(coords);
        self.outbound.push(command.clone());
        Some(command)
    }

    pub fn teleport_next(&mut self) -> Option<String> {
        let next = self.edits()?.ore_db().tp_index() as i64 + 1;
        self.teleport_to_deposit(next)
    }

    pub fn teleport_prev(&mut self) -> Option<String> {
        let prev = self.edits()?.ore_db().tp_index() as i64 - 1;
        self.teleport_to_deposit(prev)
    }

    fn teleport_command(&self, coords: Coords) -> String {
        let vars: HashMap<String, String> = [
            ("x".to_string(), coords.x.to_string()),
            ("y".to_string(), coords.y.to_string()),
            ("z".to_string(), coords.z.to_string()),
        ]
        .into_iter()
        .collect();
        expand(&self.config.teleport_command, &vars)
    }

    /// Queue the query for the state of the world just before the selected
    /// edit, in server time. `None` without a selection.
    pub fn query_pre_edit(&mut self) -> Option<String> {
        if self.selection.is_empty() {
            return None;
        }
        let vars = self.selection.vars(-self.server_time_offset_ms);
        let command = expand(&self.config.pre_edit_query, &vars);
        self.outbound.push(command.clone());
        Some(command)
    }

    /// Write the current dimension's edits and annotations.
    pub fn save_edits<W: Write>(&self, writer: W) -> BlockWatchResult<usize> {
        match self.edits() {
            Some(set) => persistence::save(set, writer),
            None => persistence::save(&BlockEditSet::new(), writer),
        }
    }

    /// Load saved edits into the current dimension under the session's
    /// filter and clustering rules.
    pub fn load_edits<R: BufRead>(&mut self, reader: R) -> BlockWatchResult<LoadReport> {
        let cluster_ores = self.cluster_ores();
        let set = self.worlds.entry(self.dimension.clone()).or_default();
        let mut ctx = EditContext::new(&self.filter, cluster_ores);
        persistence::load(reader, &self.blocks, &mut ctx, set)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::with_defaults()
    }
}
