//! Core types and utilities for the lifeplus multi-species automaton.

pub mod types;
pub mod config;
pub mod error;
pub mod lenient;
pub mod preset;
pub mod rules;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
pub use preset::{find_preset, normalize_probability, presets, RuleDef, RulePreset};
pub use rules::*;
