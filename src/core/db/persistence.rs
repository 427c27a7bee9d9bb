// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Edit set files
//!
//! Line-oriented text, one record per line:
//!
//! ```text
//! 2024-01-15|08:00:00|Alice|d|56|0|5|64|5
//! #5|64|5|first diamond here
//! ```
//!
//! Edit lines hold date, time, player, `c` (created) or `d` (destroyed), block
//! id, block data and x, y, z. Annotation lines start with `#` and hold x, y, z
//! and free text. Times are stored to the second. Lines that fit neither
//! shape are skipped on load.
//!
//! Player names and annotation text are escaped so every record stays on
//! one line: `\\` for a backslash, `\|` for a pipe, `\n` and `\r` for line
//! breaks. An unescaped `|` in annotation text is still read as text.

use std::io::{BufRead, Write};

use chrono::NaiveDateTime;
use log::{debug, info};

use crate::core::error::{BlockWatchError, BlockWatchResult};
use crate::core::model::block_type::parse_id_data;
use crate::core::model::{Annotation, BlockTypeRegistry, Coords, Edit};
use crate::core::util::clock::{from_millis, to_millis};

use super::block_edit_set::{BlockEditSet, EditContext};

const TIME_FORMAT: &str = "%Y-%m-%d|%H:%M:%S";

/// Counts from one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub edits: usize,
    pub annotations: usize,
    pub skipped: usize,
}

/// Write every edit (grouped by player, oldest first) and then every
/// annotation. Returns the number of lines written.
pub fn save<W: Write>(set: &BlockEditSet, mut writer: W) -> BlockWatchResult<usize> {
    let mut lines = 0;
    for edit in set.edits() {
        writeln!(writer, "{}", format_edit(edit))?;
        lines += 1;
    }
    for annotation in set.annotations() {
        writeln!(writer, "{}", format_annotation(annotation))?;
        lines += 1;
    }
    writer.flush()?;
    Ok(lines)
}

/// Read records from `reader` into `set`. Edits go through `ctx` like any
/// other edit, so the filter and clustering rules apply.
pub fn load<R: BufRead>(
    reader: R,
    blocks: &BlockTypeRegistry,
    ctx: &mut EditContext<'_>,
    set: &mut BlockEditSet,
) -> BlockWatchResult<LoadReport> {
    let mut report = LoadReport::default();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }
        let parsed = match line.strip_prefix('#') {
            Some(rest) => parse_annotation(rest).map(|a| {
                set.add_annotation(a);
                report.annotations += 1;
            }),
            None => parse_edit(line, blocks).map(|edit| {
                if set.add_edit(edit, ctx, false) {
                    report.edits += 1;
                }
            }),
        };
        if let Err(e) = parsed {
            debug!("Skipping line {}: {}", number + 1, e);
            report.skipped += 1;
        }
    }
    info!(
        "Loaded {} edits and {} annotations ({} lines skipped)",
        report.edits, report.annotations, report.skipped
    );
    Ok(report)
}

pub fn format_edit(edit: &Edit) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}|{}|{}",
        from_millis(edit.time).format(TIME_FORMAT),
        escape(&edit.player),
        if edit.creation { "c" } else { "d" },
        edit.block.id(),
        edit.block.data(),
        edit.x,
        edit.y,
        edit.z
    )
}

pub fn format_annotation(annotation: &Annotation) -> String {
    format!(
        "#{}|{}|{}|{}",
        annotation.x,
        annotation.y,
        annotation.z,
        escape(&annotation.text)
    )
}

pub fn parse_edit(line: &str, blocks: &BlockTypeRegistry) -> BlockWatchResult<Edit> {
    let fields = split_fields(line);
    let [date, time, player, action, id, data, x, y, z] = fields.as_slice() else {
        return Err(BlockWatchError::persistence(
            format!("expected 9 fields, found {}", fields.len()),
            None,
        ));
    };
    let stamp = format!("{}|{}", date, time);
    let when = NaiveDateTime::parse_from_str(&stamp, TIME_FORMAT)
        .map_err(|e| BlockWatchError::malformed_field("time", stamp.as_str(), e.to_string()))?;
    let creation = match action.as_str() {
        "c" => true,
        "d" => false,
        other => return Err(BlockWatchError::malformed_field("action", other, "expected c or d")),
    };
    if player.is_empty() {
        return Err(BlockWatchError::missing_field("player", "edit line"));
    }
    let (id, data) = parse_id_data(id, data)?;
    Ok(Edit::new(
        to_millis(&when),
        unescape(player),
        creation,
        parse_coords(x, y, z)?,
        blocks.by_id_data(id, data),
    ))
}

pub fn parse_annotation(rest: &str) -> BlockWatchResult<Annotation> {
    let mut parts = rest.splitn(4, '|');
    let (Some(x), Some(y), Some(z), Some(text)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(BlockWatchError::persistence("annotation needs x|y|z|text", None));
    };
    Ok(Annotation::new(parse_coords(x, y, z)?, unescape(text)))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '|' => out.push_str("\\|"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape`]. Unknown escapes are kept as written.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(c @ ('\\' | '|')) => out.push(c),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Split on `|` not preceded by an escaping backslash. Fields stay escaped.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '|' => fields.push(std::mem::take(&mut field)),
            '\\' => {
                field.push(c);
                if let Some(next) = chars.next() {
                    field.push(next);
                }
            }
            c => field.push(c),
        }
    }
    fields.push(field);
    fields
}

fn parse_coords(x: &str, y: &str, z: &str) -> BlockWatchResult<Coords> {
    let axis = |name: &str, value: &str| {
        value
            .trim()
            .parse::<i32>()
            .map_err(|e| BlockWatchError::malformed_field(name, value, e.to_string()))
    };
    Ok(Coords::new(axis("x", x)?, axis("y", y)?, axis("z", z)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db::PlayerFilter;
    use std::io::Cursor;

    #[test]
    fn test_edit_line_format() {
        let blocks = BlockTypeRegistry::defaults();
        let edit = parse_edit("2024-01-15|08:00:00|Alice|d|56|0|5|64|-5", &blocks).unwrap();
        assert!(!edit.creation);
        assert_eq!(edit.block.id(), 56);
        assert_eq!(edit.coords(), Coords::new(5, 64, -5));
        assert_eq!(format_edit(&edit), "2024-01-15|08:00:00|Alice|d|56|0|5|64|-5");
    }

    #[test]
    fn test_annotation_text_may_contain_separator() {
        let annotation = parse_annotation("1|2|3|a|b").unwrap();
        assert_eq!(annotation.text, "a|b");
        assert_eq!(format_annotation(&annotation), "#1|2|3|a\\|b");
    }

    #[test]
    fn test_annotation_text_is_escaped_onto_one_line() {
        let annotation = Annotation::new(Coords::new(1, 2, 3), "two\nlines | C:\\ore\r");
        let line = format_annotation(&annotation);
        assert_eq!(line, "#1|2|3|two\\nlines \\| C:\\\\ore\\r");
        assert!(!line.contains('\n'));
        let parsed = parse_annotation(line.strip_prefix('#').unwrap()).unwrap();
        assert_eq!(parsed.text, annotation.text);
    }

    #[test]
    fn test_player_with_separator_survives() {
        let blocks = BlockTypeRegistry::defaults();
        let edit = Edit::new(0, "odd|name\\", false, Coords::new(1, 2, 3), blocks.by_name("coal_ore"));
        let line = format_edit(&edit);
        assert!(line.contains("odd\\|name\\\\"));
        let parsed = parse_edit(&line, &blocks).unwrap();
        assert_eq!(parsed.player, "odd|name\\");
        assert_eq!(parsed.coords(), Coords::new(1, 2, 3));
    }

    #[test]
    fn test_unknown_escape_is_kept() {
        assert_eq!(unescape("a\\qb\\"), "a\\qb\\");
        assert_eq!(unescape("x\\|y\\\\z"), "x|y\\z");
    }

    #[test]
    fn test_unrecognised_lines_are_skipped() {
        let blocks = BlockTypeRegistry::defaults();
        let filter = PlayerFilter::new();
        let mut ctx = EditContext::new(&filter, true);
        let mut set = BlockEditSet::new();
        let text = "garbage\n2024-01-15|08:00:00|Alice|x|1|0|0|0|0\n\n2024-01-15|08:00:00|Alice|c|1|0|0|0|0\n#oops\n";
        let report = load(Cursor::new(text), &blocks, &mut ctx, &mut set).unwrap();
        assert_eq!(
            report,
            LoadReport {
                edits: 1,
                annotations: 0,
                skipped: 3
            }
        );
    }

    #[test]
    fn test_unknown_block_survives() {
        let blocks = BlockTypeRegistry::defaults();
        let edit = Edit::new(0, "Alice", true, Coords::new(0, 0, 0), blocks.unknown());
        let line = format_edit(&edit);
        assert_eq!(parse_edit(&line, &blocks).unwrap().block, blocks.unknown());
    }
}
