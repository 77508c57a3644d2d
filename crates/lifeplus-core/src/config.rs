//! Configuration types for the simulator.

use crate::error::Result;
use crate::rules::{ClassicRule, DirectionalRuleSet};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the world grid
    pub width: i32,
    /// Height of the world grid
    pub height: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
        }
    }
}

/// Rules layered on top of the cell rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaRules {
    /// At most one species per cell
    pub exclusive_cell: bool,
    /// Stop the session once any species reaches the top row
    pub end_on_top: bool,
}

/// Which step engine drives the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Classic,
    #[default]
    Directional,
}

/// Simulation session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// World configuration
    pub world: WorldConfig,
    /// Random seed for reproducibility (random when absent)
    pub seed: Option<u32>,
    /// Meta-rules
    pub meta_rules: MetaRules,
    /// Step engine
    pub engine: EngineKind,
    /// Rule for the classic engine
    pub classic_rule: ClassicRule,
    /// Preset id used when no explicit rule set is given
    pub preset: String,
    /// Explicit directional rule set, overrides `preset`
    pub rule_set: Option<DirectionalRuleSet>,
    /// Number of generations to run
    pub generations: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            seed: None,
            meta_rules: MetaRules::default(),
            engine: EngineKind::default(),
            classic_rule: ClassicRule::default(),
            preset: "expand".to_string(),
            rule_set: None,
            generations: 1000,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
