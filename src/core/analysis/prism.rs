// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prism output.
//!
//! Inspector results follow `Prism // Inspecting x y z`. Lookups follow
//! `Prism // Showing N results. Page p of n`; each data line there is
//! followed by a `-- n - M/D/YY h:mm:ssam - world @ x y z` location line,
//! whose absolute time is preferred over the data line's relative one.

use crate::core::chat::TaggedLine;
use crate::core::error::{BlockWatchError, BlockWatchResult};

use super::block_spec::resolve_block;
use super::correlation::{
    DetailInfo, ExtractContext, Extracted, HeaderInfo, LocationInfo, Mode, PageInfo,
    PluginFormat, Role,
};
use super::fields;
use super::time::{parse_ago, twelve_hour_time};

pub const PAGE_COMMAND: &str = "/pr page {page}";

pub fn format() -> PluginFormat {
    PluginFormat::new("Prism", PAGE_COMMAND)
        .rule("prism.header", Role::Header, lookup_header)
        .rule("prism.inspector", Role::Header, inspector_header)
        .rule("prism.data", Role::Detail, data)
        .rule("prism.location", Role::Location, location)
        .rule("prism.page", Role::Page, page)
}

fn page_info(line: &TaggedLine) -> BlockWatchResult<PageInfo> {
    Ok(PageInfo {
        page: fields::number(line, "page")?,
        pages: fields::number(line, "pages")?,
    })
}

fn lookup_header(line: &TaggedLine, _: &ExtractContext<'_>) -> BlockWatchResult<Extracted> {
    Ok(Extracted::Header(HeaderInfo {
        mode: Mode::Lookup,
        coords: None,
        page: Some(page_info(line)?),
    }))
}

fn inspector_header(line: &TaggedLine, _: &ExtractContext<'_>) -> BlockWatchResult<Extracted> {
    Ok(Extracted::Header(HeaderInfo {
        mode: Mode::Inspector,
        coords: Some(fields::coords(line)?),
        page: None,
    }))
}

/// Action types that describe a block changing; anything else (item drops,
/// entity kills, container access) is not an edit.
fn is_block_action(action_type: Option<&str>) -> bool {
    match action_type {
        None => true,
        Some(kind) => kind.starts_with("block-") || kind == "tree-grow" || kind == "lava-break",
    }
}

fn data(line: &TaggedLine, ctx: &ExtractContext<'_>) -> BlockWatchResult<Extracted> {
    if !is_block_action(line.group("type")) {
        return Ok(Extracted::Ignore);
    }
    let ago = fields::text(line, "ago")?;
    let time = parse_ago(ctx.now, ago)
        .ok_or_else(|| BlockWatchError::malformed_field("ago", ago, "not a relative time"))?;
    Ok(Extracted::Detail(DetailInfo {
        time: Some(time),
        player: fields::text(line, "player")?.to_string(),
        creation: fields::text(line, "sign")? == "+",
        coords: None,
        block: resolve_block(fields::text(line, "block")?, ctx.blocks)?,
    }))
}

fn location(line: &TaggedLine, _: &ExtractContext<'_>) -> BlockWatchResult<Extracted> {
    let month: u32 = fields::number(line, "month")?;
    let day: u32 = fields::number(line, "day")?;
    let year: i32 = fields::number(line, "year")?;
    let hour: u32 = fields::number(line, "hour")?;
    let minute: u32 = fields::number(line, "minute")?;
    let second: u32 = fields::number(line, "second")?;
    let pm = fields::text(line, "ampm")? == "pm";
    Ok(Extracted::Location(LocationInfo {
        coords: fields::coords(line)?,
        time: twelve_hour_time(month, day, year, hour, minute, second, pm),
    }))
}

fn page(line: &TaggedLine, _: &ExtractContext<'_>) -> BlockWatchResult<Extracted> {
    Ok(Extracted::Page(page_info(line)?))
}
