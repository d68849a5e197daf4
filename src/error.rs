//! Error types for configuration, profiles and word lists.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid generator settings. Reported before any random draw.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("word list is empty")]
    EmptyWordList,

    #[error("word list contains an empty word at position {index}")]
    EmptyWord { index: usize },

    #[error("no statement kinds configured")]
    NoStatementKinds,

    #[error("weight for {label} must be finite and non-negative, got {weight}")]
    InvalidWeight { label: String, weight: f64 },

    #[error("total statement weight must be positive, got {total}")]
    NonPositiveTotalWeight { total: f64 },

    #[error("total statement weight must be finite, got {total}")]
    NonFiniteTotalWeight { total: f64 },

    #[error("{name} must be at most {max}, got {value}")]
    AboveCap {
        name: &'static str,
        value: usize,
        max: usize,
    },

    #[error("primary_literal_complexity ({primary}) must not exceed max_complexity ({max})")]
    PrimaryCeilingAboveMax { primary: usize, max: usize },

    #[error("max_types must be at least 1")]
    NoTypes,

    #[error("approximate_name_length must be at least 1")]
    ZeroNameLength,

    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
}

/// Failure to resolve or parse a settings profile.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("unknown profile '{name}' (available: {available})")]
    Unknown { name: String, available: String },

    #[error("failed to read profile {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profile '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Failure to load a word list from disk.
#[derive(Error, Debug)]
pub enum WordListError {
    #[error("failed to read word list {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("word list {} has no usable words", path.display())]
    NoUsableWords { path: PathBuf },
}
