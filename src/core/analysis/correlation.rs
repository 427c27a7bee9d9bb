// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Correlated Header/Detail Analysis
//!
//! Every logging plugin answers a query the same way: a *header* line that
//! fixes the context (a reference coordinate for inspector results, or just
//! "a lookup follows"), then a burst of *detail* lines, newest first. Some
//! lookups print the coordinates of each detail on a separate *location*
//! line that follows it.
//!
//! [`CorrelatedAnalysis`] is the one state machine behind all of them. A
//! [`PluginFormat`] describes a plugin as data: which tag plays which
//! [`Role`] and which function extracts the fields of that line.
//!
//! ## State transitions
//!
//! - **Header**: record mode and reference coordinate, open the correlation
//!   window at the line's receive time, arm the first-result flag, drop any
//!   half-finished lookup detail.
//! - **Detail**: honoured only while the window is open
//!   (`received_at - header_time < timeout`). With coordinates it is emitted
//!   at once. Without, an inspector header supplies them; in a lookup the
//!   detail waits for its location line.
//! - **LookupDetail**: a detail shape only printed for lookups; dropped
//!   unless the open header is a lookup.
//! - **Location**: honoured only in lookup mode with a waiting detail.
//! - **Page**: re-opens the window of the last header (same mode and
//!   coordinate, first-result flag untouched), since a requested page is
//!   printed without a new header. May queue the next-page command.
//!
//! Stale or out-of-mode lines are dropped without a word. A matched line whose
//! fields fail to parse is logged and dropped, leaving the state as it was.
//!
//! Only the first edit emitted after a header may update the shared
//! selection; later, older results in the same burst must not clobber it.

use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;

use crate::core::chat::TaggedLine;
use crate::core::error::BlockWatchResult;
use crate::core::model::{BlockTypeRef, BlockTypeRegistry, Coords, Edit};
use crate::core::util::template::expand;

/// What a header says about the lines that follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Results for one block; details carry no coordinates of their own.
    Inspector,
    /// Results for a region; coordinates come with each result.
    Lookup,
}

/// Part a line plays in the header/detail protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Header,
    Detail,
    /// A detail that only appears in lookup results.
    LookupDetail,
    Location,
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u32,
    pub pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub mode: Mode,
    pub coords: Option<Coords>,
    pub page: Option<PageInfo>,
}

/// An edit as read from one detail line; coordinates and time may still be
/// missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailInfo {
    pub time: Option<i64>,
    pub player: String,
    pub creation: bool,
    pub coords: Option<Coords>,
    pub block: BlockTypeRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationInfo {
    pub coords: Coords,
    /// Absolute time, when the location line is more precise than the detail.
    pub time: Option<i64>,
}

/// Result of field extraction for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Header(HeaderInfo),
    Detail(DetailInfo),
    Location(LocationInfo),
    Page(PageInfo),
    /// Matched, but not something that is recorded (e.g. an item drop).
    Ignore,
}

/// Inputs available to extraction functions.
#[derive(Debug, Clone, Copy)]
pub struct ExtractContext<'a> {
    /// Local receive time of the line.
    pub now: i64,
    pub blocks: &'a BlockTypeRegistry,
}

pub type Extractor = fn(&TaggedLine, &ExtractContext<'_>) -> BlockWatchResult<Extracted>;

#[derive(Clone)]
pub struct FormatRule {
    pub tag: &'static str,
    pub role: Role,
    pub extract: Extractor,
}

impl fmt::Debug for FormatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRule")
            .field("tag", &self.tag)
            .field("role", &self.role)
            .finish()
    }
}

/// One plugin's output format, as data.
#[derive(Debug, Clone)]
pub struct PluginFormat {
    name: &'static str,
    page_command: &'static str,
    rules: Vec<FormatRule>,
}

impl PluginFormat {
    /// `page_command` is expanded with `{page}` set to the page to fetch.
    pub fn new(name: &'static str, page_command: &'static str) -> Self {
        Self {
            name,
            page_command,
            rules: Vec::new(),
        }
    }

    pub fn rule(mut self, tag: &'static str, role: Role, extract: Extractor) -> Self {
        self.rules.push(FormatRule { tag, role, extract });
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rules(&self) -> &[FormatRule] {
        &self.rules
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.tag)
    }

    fn rule_for(&self, tag: &str) -> Option<&FormatRule> {
        self.rules.iter().find(|rule| rule.tag == tag)
    }

    /// Lookups only wait for location lines if the plugin prints them.
    fn has_location_lines(&self) -> bool {
        self.rules.iter().any(|rule| rule.role == Role::Location)
    }
}

/// Tunables shared by every analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSettings {
    pub timeout_ms: i64,
    pub auto_page: bool,
    pub max_auto_pages: u32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 250,
            auto_page: true,
            max_auto_pages: 3,
        }
    }
}

/// Where analyses deliver their results.
pub trait AnalysisOutput {
    /// Store `edit`; `update_state` is set for the first result after a
    /// header. Returns whether the player filter accepted it.
    fn record_edit(&mut self, edit: Edit, update_state: bool) -> bool;

    /// Queue an outbound server command.
    fn queue_command(&mut self, command: String);
}

/// What happened to one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    HeaderStarted,
    /// An edit was produced; `accepted` is the filter verdict.
    Emitted { accepted: bool, first: bool },
    /// A lookup detail is waiting for its location line.
    Pending,
    PageRequested,
    /// Stale, out of mode, malformed or incomplete.
    Dropped,
    /// Not handled by this analysis, or matched but not recorded.
    Ignored,
}

#[derive(Debug, Clone, Copy)]
struct ActiveHeader {
    mode: Mode,
    coords: Option<Coords>,
    started_at: i64,
}

#[derive(Debug, Default)]
struct CorrelationState {
    header: Option<ActiveHeader>,
    first_result: bool,
    pending: Option<DetailInfo>,
}

/// Header/detail state machine for one plugin format.
#[derive(Debug)]
pub struct CorrelatedAnalysis {
    format: PluginFormat,
    settings: AnalysisSettings,
    state: CorrelationState,
}

impl CorrelatedAnalysis {
    pub fn new(format: PluginFormat, settings: AnalysisSettings) -> Self {
        Self {
            format,
            settings,
            state: CorrelationState::default(),
        }
    }

    #[inline]
    pub fn format(&self) -> &PluginFormat {
        &self.format
    }

    #[inline]
    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Forget any header and waiting detail.
    pub fn reset(&mut self) {
        self.state = CorrelationState::default();
    }

    /// Feed one classified line received at local time `received_at`.
    pub fn on_line(
        &mut self,
        line: &TaggedLine,
        received_at: i64,
        blocks: &BlockTypeRegistry,
        out: &mut dyn AnalysisOutput,
    ) -> Outcome {
        let Some(rule) = self.format.rule_for(line.tag()) else {
            return Outcome::Ignored;
        };
        let role = rule.role;
        let extract = rule.extract;

        let header = match role {
            Role::Detail | Role::LookupDetail | Role::Location => {
                match self.active_header(received_at) {
                    Some(header) => Some(header),
                    None => return Outcome::Dropped,
                }
            }
            Role::Header | Role::Page => None,
        };
        let lookup_only = matches!(role, Role::LookupDetail | Role::Location);
        if lookup_only && header.map(|h| h.mode) != Some(Mode::Lookup) {
            return Outcome::Dropped;
        }

        let context = ExtractContext {
            now: received_at,
            blocks,
        };
        let extracted = match extract(line, &context) {
            Ok(extracted) => extracted,
            Err(e) => {
                warn!(
                    "[{}] Discarding '{}' ({}): {}",
                    self.format.name,
                    line.text(),
                    line.category_id(),
                    e
                );
                return Outcome::Dropped;
            }
        };

        match (extracted, header) {
            (Extracted::Header(info), _) => self.start_header(info, received_at, out),
            (Extracted::Detail(detail), Some(header)) => self.on_detail(detail, header, out),
            (Extracted::Location(location), Some(_)) => self.on_location(location, out),
            (Extracted::Page(page), _) => self.on_page(page, received_at, out),
            (Extracted::Ignore, _) => Outcome::Ignored,
            (other, _) => {
                debug!(
                    "[{}] {:?} extracted for a {:?} line; ignored",
                    self.format.name, other, role
                );
                Outcome::Ignored
            }
        }
    }

    fn active_header(&self, now: i64) -> Option<ActiveHeader> {
        self.state
            .header
            .filter(|header| now - header.started_at < self.settings.timeout_ms)
    }

    fn start_header(
        &mut self,
        info: HeaderInfo,
        received_at: i64,
        out: &mut dyn AnalysisOutput,
    ) -> Outcome {
        self.state.header = Some(ActiveHeader {
            mode: info.mode,
            coords: info.coords,
            started_at: received_at,
        });
        // A header repeated on a later page continues the same result set.
        if info.page.is_none_or(|page| page.page <= 1) {
            self.state.first_result = true;
        }
        self.state.pending = None;
        if let Some(page) = info.page {
            self.request_page(page, out);
        }
        Outcome::HeaderStarted
    }

    fn on_page(&mut self, page: PageInfo, received_at: i64, out: &mut dyn AnalysisOutput) -> Outcome {
        if let Some(header) = self.state.header.as_mut() {
            header.started_at = received_at;
        }
        self.request_page(page, out)
    }

    fn on_detail(
        &mut self,
        detail: DetailInfo,
        header: ActiveHeader,
        out: &mut dyn AnalysisOutput,
    ) -> Outcome {
        if let Some(coords) = detail.coords {
            return self.emit(detail, coords, None, out);
        }
        match header.mode {
            Mode::Inspector => match header.coords {
                Some(coords) => self.emit(detail, coords, None, out),
                None => Outcome::Dropped,
            },
            Mode::Lookup if self.format.has_location_lines() => {
                self.state.pending = Some(detail);
                Outcome::Pending
            }
            Mode::Lookup => Outcome::Dropped,
        }
    }

    fn on_location(&mut self, location: LocationInfo, out: &mut dyn AnalysisOutput) -> Outcome {
        match self.state.pending.take() {
            Some(detail) => self.emit(detail, location.coords, location.time, out),
            None => Outcome::Dropped,
        }
    }

    fn emit(
        &mut self,
        detail: DetailInfo,
        coords: Coords,
        time_override: Option<i64>,
        out: &mut dyn AnalysisOutput,
    ) -> Outcome {
        let Some(time) = time_override.or(detail.time) else {
            debug!("[{}] Result without a time; dropped", self.format.name);
            return Outcome::Dropped;
        };
        let edit = Edit::new(time, detail.player, detail.creation, coords, detail.block);
        let first = std::mem::replace(&mut self.state.first_result, false);
        let accepted = out.record_edit(edit, first);
        Outcome::Emitted { accepted, first }
    }

    fn request_page(&self, page: PageInfo, out: &mut dyn AnalysisOutput) -> Outcome {
        if !self.settings.auto_page
            || page.page >= page.pages
            || page.page >= self.settings.max_auto_pages
        {
            return Outcome::Ignored;
        }
        let mut vars = HashMap::new();
        vars.insert("page".to_string(), (page.page + 1).to_string());
        out.queue_command(expand(self.format.page_command, &vars));
        Outcome::PageRequested
    }
}

/// Collects analysis output in memory.
#[derive(Debug, Default)]
pub struct CollectingOutput {
    pub edits: Vec<(Edit, bool)>,
    pub commands: Vec<String>,
    /// Players rejected by `record_edit`, compared case-insensitively.
    pub rejected_players: Vec<String>,
}

impl AnalysisOutput for CollectingOutput {
    fn record_edit(&mut self, edit: Edit, update_state: bool) -> bool {
        if self
            .rejected_players
            .iter()
            .any(|p| p.eq_ignore_ascii_case(&edit.player))
        {
            return false;
        }
        self.edits.push((edit, update_state));
        true
    }

    fn queue_command(&mut self, command: String) {
        self.commands.push(command);
    }
}
