// SPDX-License-Identifier: MIT OR Apache-2.0

//! LogBlock output.
//!
//! A toolblock/inspector query prints `Block changes at x:y:z in world:`
//! followed by year-less edit lines without coordinates. A region query
//! prints `Block changes in world:` and either `(n) … at x:y:z` lines or
//! edit lines carrying `(x,y,z)` before the block name.

use crate::core::chat::TaggedLine;
use crate::core::error::{BlockWatchError, BlockWatchResult};

use super::block_spec::resolve_block;
use super::correlation::{
    DetailInfo, ExtractContext, Extracted, HeaderInfo, Mode, PageInfo, PluginFormat, Role,
};
use super::fields;
use super::time::month_day_time;

pub const PAGE_COMMAND: &str = "/lb page {page}";

pub fn format() -> PluginFormat {
    PluginFormat::new("LogBlock", PAGE_COMMAND)
        .rule("lb.position", Role::Header, position)
        .rule("lb.header", Role::Header, lookup_header)
        .rule("lb.coord", Role::LookupDetail, edit)
        .rule("lb.coordreplaced", Role::LookupDetail, replaced)
        .rule("lb.editreplaced", Role::Detail, replaced)
        .rule("lb.edit", Role::Detail, edit)
        .rule("lb.page", Role::Page, page)
}

fn position(line: &TaggedLine, _: &ExtractContext<'_>) -> BlockWatchResult<Extracted> {
    Ok(Extracted::Header(HeaderInfo {
        mode: Mode::Inspector,
        coords: Some(fields::coords(line)?),
        page: None,
    }))
}

fn lookup_header(_: &TaggedLine, _: &ExtractContext<'_>) -> BlockWatchResult<Extracted> {
    Ok(Extracted::Header(HeaderInfo {
        mode: Mode::Lookup,
        coords: None,
        page: None,
    }))
}

fn timestamp(line: &TaggedLine, now: i64) -> BlockWatchResult<i64> {
    let month: u32 = fields::number(line, "month")?;
    let day: u32 = fields::number(line, "day")?;
    let hour: u32 = fields::number(line, "hour")?;
    let minute: u32 = fields::number(line, "minute")?;
    let second: u32 = fields::number(line, "second")?;
    month_day_time(now, month, day, hour, minute, second).ok_or_else(|| {
        BlockWatchError::malformed_field(
            "time",
            format!("{:02}-{:02} {:02}:{:02}:{:02}", month, day, hour, minute, second),
            "no such date",
        )
    })
}

fn edit(line: &TaggedLine, ctx: &ExtractContext<'_>) -> BlockWatchResult<Extracted> {
    Ok(Extracted::Detail(DetailInfo {
        time: Some(timestamp(line, ctx.now)?),
        player: fields::text(line, "player")?.to_string(),
        creation: fields::text(line, "action")? == "created",
        coords: fields::optional_coords(line)?,
        block: resolve_block(fields::text(line, "block")?, ctx.blocks)?,
    }))
}

/// Only the destruction of the old block is kept.
fn replaced(line: &TaggedLine, ctx: &ExtractContext<'_>) -> BlockWatchResult<Extracted> {
    Ok(Extracted::Detail(DetailInfo {
        time: Some(timestamp(line, ctx.now)?),
        player: fields::text(line, "player")?.to_string(),
        creation: false,
        coords: fields::optional_coords(line)?,
        block: resolve_block(fields::text(line, "old")?, ctx.blocks)?,
    }))
}

fn page(line: &TaggedLine, _: &ExtractContext<'_>) -> BlockWatchResult<Extracted> {
    Ok(Extracted::Page(PageInfo {
        page: fields::number(line, "page")?,
        pages: fields::number(line, "pages")?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analysis::correlation::{
        AnalysisSettings, CollectingOutput, CorrelatedAnalysis, Outcome,
    };
    use crate::core::chat::ChatClassifier;
    use crate::core::model::{BlockTypeRegistry, Coords};
    use crate::core::util::clock::to_millis;
    use chrono::NaiveDate;

    fn now() -> i64 {
        to_millis(
            &NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        )
    }

    struct Run {
        classifier: ChatClassifier,
        blocks: BlockTypeRegistry,
        analysis: CorrelatedAnalysis,
        out: CollectingOutput,
    }

    impl Run {
        fn new() -> Self {
            Self {
                classifier: ChatClassifier::default(),
                blocks: BlockTypeRegistry::defaults(),
                analysis: CorrelatedAnalysis::new(format(), AnalysisSettings::default()),
                out: CollectingOutput::default(),
            }
        }

        fn feed(&mut self, text: &str, at: i64) -> Outcome {
            let line = self.classifier.classify(text);
            self.analysis.on_line(&line, at, &self.blocks, &mut self.out)
        }
    }

    #[test]
    fn test_toolblock_result_takes_header_coords() {
        let mut run = Run::new();
        run.feed("Block changes at 10:20:30 in world:", now());
        run.feed("01-15 08:00:00 Alice destroyed diamond_ore", now() + 50);
        let (edit, first) = &run.out.edits[0];
        assert!(*first);
        assert!(!edit.creation);
        assert_eq!(edit.coords(), Coords::new(10, 20, 30));
        assert_eq!(edit.block.id(), 56);
    }

    #[test]
    fn test_inline_coords_override_header() {
        let mut run = Run::new();
        run.feed("Block changes at 10:20:30 in world:", now());
        run.feed("01-15 08:00:00 Alice created (1,2,3) diamond_ore", now() + 50);
        let (edit, _) = &run.out.edits[0];
        assert!(edit.creation);
        assert_eq!(edit.coords(), Coords::new(1, 2, 3));
    }

    #[test]
    fn test_coord_lines_in_lookup() {
        let mut run = Run::new();
        run.feed("Block changes in world:", now());
        run.feed("(1) 05-30 10:00:00 Bob destroyed iron_ore at 4:12:-9", now() + 10);
        run.feed(
            "(2) 05-30 09:00:00 Bob replaced stone with dirt at 4:13:-9",
            now() + 20,
        );
        assert_eq!(run.out.edits.len(), 2);
        let replaced = &run.out.edits[1].0;
        assert!(!replaced.creation);
        assert_eq!(replaced.block.name(), "stone");
        assert_eq!(replaced.coords(), Coords::new(4, 13, -9));
    }

    #[test]
    fn test_coord_line_after_toolblock_header_is_dropped() {
        let mut run = Run::new();
        run.feed("Block changes at 1:2:3 in world:", now());
        assert_eq!(
            run.feed("(1) 05-30 10:00:00 Bob destroyed iron_ore at 4:12:-9", now() + 10),
            Outcome::Dropped
        );
        assert!(run.out.edits.is_empty());
    }

    #[test]
    fn test_requested_page_results_are_correlated() {
        let mut run = Run::new();
        run.feed("Block changes in world:", now());
        run.feed("Page 1/3", now() + 5);
        run.feed("(1) 05-30 10:00:00 Bob destroyed iron_ore at 4:12:-9", now() + 10);
        assert_eq!(run.out.commands, vec!["/lb page 2".to_string()]);

        run.feed("Page 2/3", now() + 1_000);
        assert_eq!(
            run.feed("(11) 05-29 10:00:00 Bob destroyed iron_ore at 40:12:-9", now() + 1_010),
            Outcome::Emitted {
                accepted: true,
                first: false
            }
        );
        assert_eq!(run.out.edits[1].0.coords(), Coords::new(40, 12, -9));
        assert_eq!(run.out.commands.len(), 2);
    }

    #[test]
    fn test_lookup_edit_without_coords_is_dropped() {
        let mut run = Run::new();
        run.feed("Block changes in world:", now());
        assert_eq!(
            run.feed("01-15 08:00:00 Alice created stone", now() + 5),
            Outcome::Dropped
        );
    }

    #[test]
    fn test_impossible_date_is_dropped() {
        let mut run = Run::new();
        run.feed("Block changes at 1:2:3 in world:", now());
        assert_eq!(
            run.feed("02-30 08:00:00 Alice created stone", now() + 5),
            Outcome::Dropped
        );
        assert!(run.out.edits.is_empty());
    }

    #[test]
    fn test_page_line_queues_next_page() {
        let mut run = Run::new();
        assert_eq!(run.feed("Page 1/4", now()), Outcome::PageRequested);
        assert_eq!(run.out.commands, vec!["/lb page 2".to_string()]);
    }
}
