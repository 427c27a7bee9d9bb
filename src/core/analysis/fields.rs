// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed access to the named groups of a [`TaggedLine`].

use std::fmt::Display;
use std::str::FromStr;

use crate::core::chat::TaggedLine;
use crate::core::error::{BlockWatchError, BlockWatchResult};
use crate::core::model::Coords;

/// A group that the pattern is expected to always provide.
pub fn text<'a>(line: &'a TaggedLine, name: &str) -> BlockWatchResult<&'a str> {
    line.group(name)
        .ok_or_else(|| BlockWatchError::missing_field(name, line.category_id()))
}

/// A group parsed as a number.
pub fn number<T>(line: &TaggedLine, name: &str) -> BlockWatchResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    let value = text(line, name)?;
    value
        .parse::<T>()
        .map_err(|e| BlockWatchError::malformed_field(name, value, e.to_string()))
}

/// The `x`, `y` and `z` groups.
pub fn coords(line: &TaggedLine) -> BlockWatchResult<Coords> {
    Ok(Coords::new(
        number(line, "x")?,
        number(line, "y")?,
        number(line, "z")?,
    ))
}

/// The `x`, `y` and `z` groups when the pattern made them optional.
pub fn optional_coords(line: &TaggedLine) -> BlockWatchResult<Option<Coords>> {
    if line.group("x").is_none() {
        return Ok(None);
    }
    coords(line).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chat::ChatClassifier;

    #[test]
    fn test_coords_parse() {
        let line = ChatClassifier::default().classify("Block changes at -10:64:7 in world:");
        assert_eq!(coords(&line).unwrap(), Coords::new(-10, 64, 7));
    }

    #[test]
    fn test_out_of_range_number_is_malformed() {
        let line = ChatClassifier::default().classify("Block changes at 99999999999:64:7 in world:");
        assert!(matches!(
            coords(&line),
            Err(BlockWatchError::MalformedField { .. })
        ));
    }

    #[test]
    fn test_optional_coords_absent() {
        let line = ChatClassifier::default().classify("01-15 08:00:00 Alice created stone");
        assert_eq!(optional_coords(&line).unwrap(), None);
    }
}
