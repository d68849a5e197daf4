// src/lib.rs
//! Random, well-typed Java program synthesis.
//!
//! [`synthesize_program`] plans class skeletons, fills every method body with
//! type-correct statements and expressions, and returns a [`Program`] tree
//! that [`render_program`] turns into Java source.

pub mod assembler;
pub mod ast;
pub mod emit;
pub mod error;
pub mod expr;
pub mod manifest;
pub mod names;
pub mod planner;
pub mod profile;
pub mod scope;
pub mod settings;
pub mod stmt;
pub mod symbols;
pub mod universe;
pub mod weighted;
pub mod words;

pub use assembler::synthesize_program;
pub use emit::render_program;
pub use error::{ConfigError, ProfileError, WordListError};
pub use settings::Settings;
pub use symbols::Program;
