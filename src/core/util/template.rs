// SPDX-License-Identifier: MIT OR Apache-2.0

//! `{name}` placeholder expansion for outbound server commands.

use chrono::{Datelike, Timelike};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

use super::clock::from_millis;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("static pattern compiles"));

/// Replace every `{name}` with `vars[name]`. Unknown placeholders are left as is.
pub fn expand(template: &str, vars: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Date/time variables for `millis`: `year` (4 digits), and 2-digit
/// `month`, `day`, `hour`, `minute`, `second`.
pub fn time_vars(millis: i64) -> HashMap<String, String> {
    let when = from_millis(millis);
    let mut vars = HashMap::with_capacity(6);
    vars.insert("year".to_string(), format!("{:04}", when.year()));
    vars.insert("month".to_string(), format!("{:02}", when.month()));
    vars.insert("day".to_string(), format!("{:02}", when.day()));
    vars.insert("hour".to_string(), format!("{:02}", when.hour()));
    vars.insert("minute".to_string(), format!("{:02}", when.minute()));
    vars.insert("second".to_string(), format!("{:02}", when.second()));
    vars
}
