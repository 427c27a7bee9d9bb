// SPDX-License-Identifier: MIT OR Apache-2.0

//! CoreProtect output.
//!
//! `----- CoreProtect ----- (x1/y2/z3)` opens inspector results and
//! `----- CoreProtect Lookup Results -----` opens a lookup. Detail lines give
//! the age in fractional hours; in a lookup each one is followed by a
//! `^ (x1/y2/z3/world)` line.

use crate::core::chat::TaggedLine;
use crate::core::error::{BlockWatchError, BlockWatchResult};

use super::block_spec::resolve_block;
use super::correlation::{
    DetailInfo, ExtractContext, Extracted, HeaderInfo, LocationInfo, Mode, PageInfo,
    PluginFormat, Role,
};
use super::fields;
use super::time::hours_ago;

pub const PAGE_COMMAND: &str = "/co page {page}";

pub fn format() -> PluginFormat {
    PluginFormat::new("CoreProtect", PAGE_COMMAND)
        .rule("cp.lookupheader", Role::Header, lookup_header)
        .rule("cp.inspectorheader", Role::Header, inspector_header)
        .rule("cp.details", Role::Detail, details)
        .rule("cp.location", Role::Location, location)
        .rule("cp.page", Role::Page, page)
}

fn lookup_header(_: &TaggedLine, _: &ExtractContext<'_>) -> BlockWatchResult<Extracted> {
    Ok(Extracted::Header(HeaderInfo {
        mode: Mode::Lookup,
        coords: None,
        page: None,
    }))
}

fn inspector_header(line: &TaggedLine, _: &ExtractContext<'_>) -> BlockWatchResult<Extracted> {
    Ok(Extracted::Header(HeaderInfo {
        mode: Mode::Inspector,
        coords: Some(fields::coords(line)?),
        page: None,
    }))
}

fn details(line: &TaggedLine, ctx: &ExtractContext<'_>) -> BlockWatchResult<Extracted> {
    let hours: f64 = fields::number(line, "hours")?;
    let time = hours_ago(ctx.now, hours).ok_or_else(|| {
        BlockWatchError::malformed_field("hours", hours.to_string(), "not a valid age")
    })?;
    Ok(Extracted::Detail(DetailInfo {
        time: Some(time),
        player: fields::text(line, "player")?.to_string(),
        creation: fields::text(line, "action")? == "placed",
        coords: None,
        block: resolve_block(fields::text(line, "block")?, ctx.blocks)?,
    }))
}

fn location(line: &TaggedLine, _: &ExtractContext<'_>) -> BlockWatchResult<Extracted> {
    Ok(Extracted::Location(LocationInfo {
        coords: fields::coords(line)?,
        time: None,
    }))
}

fn page(line: &TaggedLine, _: &ExtractContext<'_>) -> BlockWatchResult<Extracted> {
    Ok(Extracted::Page(PageInfo {
        page: fields::number(line, "page")?,
        pages: fields::number(line, "pages")?,
    }))
}
