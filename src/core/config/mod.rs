// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod session_config;

pub use session_config::{SessionConfig, DEFAULT_CONFIG_YAML};
