//! Generation profiles.
//!
//! Profiles are presets for [`Settings`]. Each profile is a TOML file
//! embedded in the binary at compile time. Fields omitted from a TOML file
//! inherit the `Default` impl of `Settings`.

use std::path::Path;

use crate::error::ProfileError;
use crate::settings::Settings;

// Embedded profile TOML data (compiled into the binary).
static PROFILES: &[(&str, &str)] = &[
    ("default", include_str!("../profiles/default.toml")),
    ("small", include_str!("../profiles/small.toml")),
    ("wide", include_str!("../profiles/wide.toml")),
];

/// Returns a list of available profile names.
pub fn available_profiles() -> Vec<&'static str> {
    PROFILES.iter().map(|(name, _)| *name).collect()
}

/// Parse a TOML string into `Settings`, using defaults for omitted fields.
pub fn parse_profile(name: &str, toml_str: &str) -> Result<Settings, ProfileError> {
    toml::from_str(toml_str).map_err(|source| ProfileError::Parse {
        name: name.to_string(),
        source,
    })
}

/// Get a profile by name, or load it from a file path.
///
/// If `name_or_path` contains `/` or ends with `.toml`, it is treated as a
/// file path and loaded from disk. Otherwise it is looked up among the
/// embedded profiles.
pub fn get_profile(name_or_path: &str) -> Result<Settings, ProfileError> {
    if name_or_path.contains('/') || name_or_path.ends_with(".toml") {
        let path = Path::new(name_or_path);
        let content = std::fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        return parse_profile(name_or_path, &content);
    }
    let (name, toml_str) = PROFILES
        .iter()
        .find(|(name, _)| *name == name_or_path)
        .ok_or_else(|| ProfileError::Unknown {
            name: name_or_path.to_string(),
            available: available_profiles().join(", "),
        })?;
    parse_profile(name, toml_str)
}
