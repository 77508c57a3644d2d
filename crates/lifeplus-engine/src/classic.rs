//! Classic neighbor-count engine.
//!
//! The rule is compiled to two 9-bit masks indexed by neighbor count and
//! applied to each species layer on its own. Species never see each other
//! under this engine.

use crate::grid::Grid;
use crate::neighborhood::Neighborhood;
use dashmap::DashMap;
use lifeplus_core::{ClassicRule, Result, Species};
use std::sync::{Arc, OnceLock};
use tracing::trace;

/// A classic rule as two lookup masks, bit `n` set for neighbor count `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompiledRule {
    pub birth_bits: u16,
    pub survive_bits: u16,
}

impl CompiledRule {
    pub fn cache_key(&self) -> u32 {
        u32::from(self.birth_bits) | u32::from(self.survive_bits) << 9
    }

    /// Next state of one species bit given its neighbor count.
    pub fn next_state(&self, alive: bool, count: u32) -> bool {
        let bits = if alive { self.survive_bits } else { self.birth_bits };
        (bits >> count) & 1 == 1
    }
}

fn count_bits(counts: &[i64]) -> u16 {
    counts
        .iter()
        .filter(|&&n| (0..=8).contains(&n))
        .fold(0, |bits, &n| bits | 1 << n)
}

/// Memoized compiled rules, keyed by their mask pair.
#[derive(Debug, Default)]
pub struct RuleCache {
    compiled: DashMap<u32, Arc<CompiledRule>>,
}

impl RuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a rule, reusing an earlier result with the same masks.
    ///
    /// Counts outside `0..=8` are ignored.
    pub fn compile(&self, rule: &ClassicRule) -> Arc<CompiledRule> {
        let compiled = CompiledRule {
            birth_bits: count_bits(rule.birth_counts()),
            survive_bits: count_bits(rule.survive_counts()),
        };
        self.compiled
            .entry(compiled.cache_key())
            .or_insert_with(|| {
                trace!(
                    birth_bits = compiled.birth_bits,
                    survive_bits = compiled.survive_bits,
                    "compiled classic rule"
                );
                Arc::new(compiled)
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

/// The process-wide classic rule cache.
pub fn rule_cache() -> &'static RuleCache {
    static CACHE: OnceLock<RuleCache> = OnceLock::new();
    CACHE.get_or_init(RuleCache::new)
}

pub fn compile_rule(rule: &ClassicRule) -> Arc<CompiledRule> {
    rule_cache().compile(rule)
}

/// Advance one generation under `rule`.
pub fn step(grid: &Grid, rule: &ClassicRule) -> Result<Grid> {
    grid.validate()?;
    let compiled = compile_rule(rule);
    step_compiled(grid, &compiled)
}

/// Advance one generation under an already compiled rule.
pub fn step_compiled(grid: &Grid, rule: &CompiledRule) -> Result<Grid> {
    grid.validate()?;

    let width = grid.width();
    let height = grid.height();
    let cells = grid.cells();
    let mut next_cells = vec![0u8; cells.len()];

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let hood = Neighborhood::gather(cells, width, height, x, y);
            let current = cells[idx];

            next_cells[idx] = Species::ALL.iter().fold(0, |next, species| {
                let bit = species.bit();
                if rule.next_state(current & bit != 0, hood.count(bit)) {
                    next | bit
                } else {
                    next
                }
            });
        }
    }

    Ok(grid.with_cells(next_cells))
}
