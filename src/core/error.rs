// SPDX-License-Identifier: MIT OR Apache-2.0

//! BlockWatch Core Error Types
//!
//! Errors surface only from loaders (configuration, chat categories, block
//! types, saved edit files). The chat pipeline itself never returns an error
//! for a single bad line; it logs and moves on.

use thiserror::Error;

/// Result type for BlockWatch operations
pub type BlockWatchResult<T> = Result<T, BlockWatchError>;

/// BlockWatch error types
#[derive(Error, Debug)]
pub enum BlockWatchError {
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        config_key: Option<String>,
    },

    #[error("Invalid pattern for category '{id}': {message}")]
    InvalidPattern { id: String, message: String },

    #[error("Duplicate chat category id '{id}'")]
    DuplicateCategory { id: String },

    #[error("Missing required field '{field}' in {context}")]
    MissingField { field: String, context: String },

    #[error("Malformed field '{field}' = '{value}': {message}")]
    MalformedField {
        field: String,
        value: String,
        message: String,
    },

    #[error("Persistence error at line {line:?}: {message}")]
    Persistence { message: String, line: Option<usize> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Other(String),
}

impl BlockWatchError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            config_key: None,
        }
    }

    /// Create a configuration error with a specific key
    pub fn configuration_with_key(message: impl Into<String>, config_key: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            config_key: Some(config_key.into()),
        }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate category error
    pub fn duplicate_category(id: impl Into<String>) -> Self {
        Self::DuplicateCategory { id: id.into() }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    /// Create a malformed field error
    pub fn malformed_field(
        field: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedField {
            field: field.into(),
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a persistence error, optionally tied to a 1-based line number
    pub fn persistence(message: impl Into<String>, line: Option<usize>) -> Self {
        Self::Persistence {
            message: message.into(),
            line,
        }
    }

    /// Create a generic error from a string
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
