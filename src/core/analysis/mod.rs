// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Analyses
//!
//! Turn classified chat lines from the logging plugins back into [`Edit`]s.
//! One generic [`CorrelatedAnalysis`] is instantiated per plugin format.
//!
//! [`Edit`]: crate::core::model::Edit

pub mod block_spec;
pub mod correlation;
pub mod coreprotect;
pub mod fields;
pub mod logblock;
pub mod prism;
pub mod time;

pub use correlation::{
    AnalysisOutput, AnalysisSettings, CollectingOutput, CorrelatedAnalysis, Extracted, Mode,
    Outcome, PluginFormat, Role,
};

/// The formats of every supported plugin, in routing order.
pub fn builtin_formats() -> Vec<PluginFormat> {
    vec![logblock::format(), prism::format(), coreprotect::format()]
}
