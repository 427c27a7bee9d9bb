// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod clock;
pub mod template;

pub use clock::{Clock, ManualClock, SystemClock};
