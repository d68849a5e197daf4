//! Run manifest.
//!
//! Records the seed, profile and effective settings of a generation run as
//! JSON, so the same program can be produced again.

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::symbols::Program;

/// The complete manifest of one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub seed: u64,
    pub profile: String,
    /// Settings after command-line overrides. Word lists are not recorded.
    pub settings: Settings,
    pub class_count: usize,
    pub method_count: usize,
    /// Serialized as `{ secs_since_epoch, nanos_since_epoch }`.
    pub generated_at: SystemTime,
    pub generator_version: String,
}

impl Manifest {
    pub fn new(seed: u64, profile: String, settings: Settings, program: &Program) -> Self {
        Self {
            seed,
            profile,
            settings,
            class_count: program.class_count(),
            method_count: program.method_count(),
            generated_at: SystemTime::now(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Write the manifest as pretty-printed JSON.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }
}
