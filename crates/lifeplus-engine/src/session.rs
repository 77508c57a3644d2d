//! Headless simulation session.
//!
//! A [`Simulation`] owns everything a run needs between generations: the
//! current grid, the compiled engine rule, a seeded generator and the
//! meta-rules. Every random decision of a session (grid rerolls, exclusive
//! normalization and the directional engine) draws from the same
//! [`Mulberry32`], so a seed replays a whole session.

use crate::classic::{self, compile_rule, CompiledRule};
use crate::directional::{compile_rule_set, CompiledRuleSet};
use crate::evolve;
use crate::exclusive::normalize_exclusive;
use crate::grid::Grid;
use crate::random::{random_seed, Mulberry32, RandomSource};
use lifeplus_core::{
    find_preset, format_species_mask, presets, ClassicRule, DirectionalRuleSet, EngineKind, Error,
    MetaRules, Result, SimulationConfig, Species,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
enum Engine {
    Classic(Arc<CompiledRule>),
    Directional(Arc<CompiledRuleSet>),
}

impl Engine {
    fn kind(&self) -> EngineKind {
        match self {
            Engine::Classic(_) => EngineKind::Classic,
            Engine::Directional(_) => EngineKind::Directional,
        }
    }
}

/// Result of a single [`Simulation::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced,
    /// The session has ended; `species` is the mask that reached the top row.
    GameOver { species: u8 },
}

/// Result of [`Simulation::run`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub seed: u32,
    /// Generations advanced by this run.
    pub generations_run: u64,
    /// Generation counter after the run.
    pub generation: u64,
    pub population: [usize; 3],
    pub game_over: Option<u8>,
}

pub struct Simulation {
    grid: Grid,
    engine: Engine,
    rng: Mulberry32,
    seed: u32,
    meta: MetaRules,
    generation: u64,
    game_over: Option<u8>,
}

impl Simulation {
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        let grid = Grid::new(i64::from(config.world.width), i64::from(config.world.height))?;
        let engine = match config.engine {
            EngineKind::Classic => Engine::Classic(compile_rule(&config.classic_rule)),
            EngineKind::Directional => Engine::Directional(compile_rule_set(&resolve_rule_set(config)?)),
        };
        let seed = config.seed.unwrap_or_else(random_seed);

        let mut sim = Self {
            grid,
            engine,
            rng: Mulberry32::new(seed),
            seed,
            meta: config.meta_rules,
            generation: 0,
            game_over: None,
        };

        info!(
            event = "session_start",
            width = sim.grid.width(),
            height = sim.grid.height(),
            seed,
            engine = ?sim.engine.kind(),
            exclusive_cell = sim.meta.exclusive_cell,
            end_on_top = sim.meta.end_on_top,
            "Created simulation"
        );

        sim.restart(seed);
        Ok(sim)
    }

    /// Restart from `seed`: fresh generator, cleared game-over, new grid.
    pub fn reseed(&mut self, seed: u32) {
        info!(event = "reseed", seed, "Reseeded simulation");
        self.restart(seed);
    }

    fn restart(&mut self, seed: u32) {
        self.seed = seed;
        self.rng = Mulberry32::new(seed);
        self.generation = 0;
        self.game_over = None;
        self.randomize_grid();
    }

    /// Restart with the current seed.
    pub fn reset(&mut self) {
        self.reseed(self.seed);
    }

    /// Replace the grid with one cell of each species on row 0.
    ///
    /// Under the exclusive meta-rule the three columns are distinct whenever
    /// the row has room for them.
    pub fn randomize_grid(&mut self) {
        let width = self.grid.width();
        let mut cells = vec![0u8; self.grid.cells().len()];

        if self.meta.exclusive_cell {
            let mut used = vec![false; width];
            for species in Species::ALL {
                let x = self.pick_unused_column(&mut used);
                cells[x] = species.bit();
            }
        } else {
            for species in Species::ALL {
                let x = self.random_column();
                cells[x] |= species.bit();
            }
        }

        self.grid = self.grid.with_cells(cells);
        debug!(
            event = "grid_randomized",
            species = %format_species_mask(self.grid.row_species(0)),
            "Rerolled grid"
        );
        self.check_top_row();
    }

    fn random_column(&mut self) -> usize {
        let width = self.grid.width();
        ((self.rng.next_f64() * width as f64).floor() as usize).min(width - 1)
    }

    fn pick_unused_column(&mut self, used: &mut [bool]) -> usize {
        for _ in 0..used.len() * 3 {
            let x = self.random_column();
            if !used[x] {
                used[x] = true;
                return x;
            }
        }
        match used.iter().position(|&taken| !taken) {
            Some(x) => {
                used[x] = true;
                x
            }
            None => 0,
        }
    }

    /// Switch the exclusive-cell meta-rule. Turning it on normalizes the grid.
    pub fn set_exclusive_cell(&mut self, on: bool) {
        self.meta.exclusive_cell = on;
        if on {
            self.grid = normalize_exclusive(&self.grid, &mut self.rng);
            self.check_top_row();
        }
    }

    pub fn set_end_on_top(&mut self, on: bool) {
        self.meta.end_on_top = on;
        self.check_top_row();
    }

    /// Switch to the directional engine with `rule_set`.
    pub fn set_rule_set(&mut self, rule_set: &DirectionalRuleSet) {
        self.engine = Engine::Directional(compile_rule_set(rule_set));
    }

    /// Switch to the classic engine with `rule`.
    pub fn set_classic_rule(&mut self, rule: &ClassicRule) {
        self.engine = Engine::Classic(compile_rule(rule));
    }

    /// Replace the grid, e.g. with a seeded pattern.
    pub fn load_grid(&mut self, grid: Grid) -> Result<()> {
        grid.validate()?;
        self.grid = grid;
        self.check_top_row();
        Ok(())
    }

    fn check_top_row(&mut self) -> Option<u8> {
        if self.meta.end_on_top && self.game_over.is_none() {
            let top = self.grid.top_row_species();
            if top != 0 {
                self.game_over = Some(top);
                info!(
                    event = "game_over",
                    generation = self.generation,
                    species = %format_species_mask(top),
                    "Species reached the top row"
                );
            }
        }
        self.game_over
    }

    /// Advance one generation, unless the session has already ended.
    pub fn step(&mut self) -> Result<StepOutcome> {
        if let Some(species) = self.game_over {
            return Ok(StepOutcome::GameOver { species });
        }

        self.grid = match &self.engine {
            Engine::Classic(rule) => classic::step_compiled(&self.grid, rule)?,
            Engine::Directional(rules) => {
                evolve::step_compiled(&self.grid, rules, &mut self.rng, self.meta.exclusive_cell)?
            }
        };
        self.generation += 1;

        let [population_a, population_b, population_c] = self.grid.population();
        debug!(
            generation = self.generation,
            population_a,
            population_b,
            population_c,
            "Generation complete"
        );

        Ok(match self.check_top_row() {
            Some(species) => StepOutcome::GameOver { species },
            None => StepOutcome::Advanced,
        })
    }

    /// Step up to `generations` times, stopping early on game over.
    #[instrument(skip(self), fields(seed = self.seed))]
    pub fn run(&mut self, generations: u64) -> Result<RunSummary> {
        info!("Running up to {} generations", generations);

        let mut generations_run = 0;
        for _ in 0..generations {
            let before = self.generation;
            let outcome = self.step()?;
            generations_run += self.generation - before;
            if let StepOutcome::GameOver { .. } = outcome {
                break;
            }
        }

        let summary = RunSummary {
            seed: self.seed,
            generations_run,
            generation: self.generation,
            population: self.grid.population(),
            game_over: self.game_over,
        };
        info!(
            event = "run_summary",
            generations_run,
            generation = summary.generation,
            population_a = summary.population[0],
            population_b = summary.population[1],
            population_c = summary.population[2],
            game_over = summary.game_over.is_some(),
            "Run complete"
        );
        Ok(summary)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn meta_rules(&self) -> MetaRules {
        self.meta
    }

    pub fn engine_kind(&self) -> EngineKind {
        self.engine.kind()
    }

    pub fn game_over(&self) -> Option<u8> {
        self.game_over
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }
}

/// The configured rule set, else the named preset, else the first preset.
fn resolve_rule_set(config: &SimulationConfig) -> Result<DirectionalRuleSet> {
    if let Some(rule_set) = &config.rule_set {
        return Ok(rule_set.clone());
    }
    if let Some(preset) = find_preset(&config.preset) {
        return Ok(preset.build_rule_set());
    }

    let fallback = presets()
        .into_iter()
        .next()
        .ok_or_else(|| Error::NotFound(format!("preset {}", config.preset)))?;
    warn!(
        preset = %config.preset,
        fallback = %fallback.id,
        "Unknown preset, using default"
    );
    Ok(fallback.build_rule_set())
}
