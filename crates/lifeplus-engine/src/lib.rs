//! Multi-species cellular automaton engine.
//!
//! Three species share one grid that wraps on the x axis and is open on the
//! y axis. Two engines advance it: the classic neighbor-count engine in
//! [`classic`] and the direction-aware stochastic engine in [`evolve`].

pub mod classic;
pub mod directional;
pub mod evolve;
pub mod exclusive;
pub mod grid;
mod neighborhood;
pub mod random;
pub mod seed;
pub mod session;

pub use classic::{compile_rule, CompiledRule};
pub use directional::{compile_rule_set, CompiledRuleSet};
pub use evolve::{step_directional, step_directional_from_entropy};
pub use exclusive::{normalize_exclusive, pick_one};
pub use grid::Grid;
pub use random::{parse_seed, random_seed, Mulberry32, RandomSource, ScriptedSource};
pub use seed::{seed_glider, seed_line_horizontal5, seed_line_vertical5, seed_points, Pattern};
pub use session::{RunSummary, Simulation, StepOutcome};
