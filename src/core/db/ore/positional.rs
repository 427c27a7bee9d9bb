// SPDX-License-Identifier: MIT OR Apache-2.0

//! 1-based circular positional access into ordered collections.

/// Clamp a 1-based index into `1..=len` by wrapping: anything below 1 is the
/// last position, anything past `len` is the first.
#[inline]
pub fn wrap_index(index: i64, len: usize) -> usize {
    if index < 1 {
        len
    } else if index as u64 > len as u64 {
        1
    } else {
        index as usize
    }
}

/// Item at wrapped 1-based `index`, walking from whichever end is nearer.
pub fn nth_wrapped<I>(items: I, index: i64) -> Option<I::Item>
where
    I: IntoIterator,
    I::IntoIter: DoubleEndedIterator + ExactSizeIterator,
{
    let mut iter = items.into_iter();
    let len = iter.len();
    if len == 0 {
        return None;
    }
    let position = wrap_index(index, len) - 1;
    if position < len / 2 {
        iter.nth(position)
    } else {
        iter.nth_back(len - 1 - position)
    }
}
