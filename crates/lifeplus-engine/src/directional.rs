//! Directional rule compilation and matching.
//!
//! A directional rule names the neighbor directions that must hold the
//! species and those that must not. Birth rules also carry a probability.
//! Compilation drops every rule with an out-of-range mask or with
//! overlapping alive/dead masks.

use crate::random::RandomSource;
use lifeplus_core::{normalize_probability, DirectionalRule, DirectionalRuleSet, RuleSetId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::trace;

/// A well-formed direction-mask condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskCondition {
    pub must_alive: u8,
    pub must_dead: u8,
}

impl MaskCondition {
    /// Validate a raw rule. Masks must lie in `0..=255` and be disjoint.
    pub fn from_rule(rule: &DirectionalRule) -> Option<Self> {
        let must_alive = u8::try_from(rule.must_alive_mask).ok()?;
        let must_dead = u8::try_from(rule.must_dead_mask).ok()?;
        if must_alive & must_dead != 0 {
            return None;
        }
        Some(Self {
            must_alive,
            must_dead,
        })
    }

    /// True if every required direction is occupied and no forbidden one is.
    pub fn matches(&self, neighbors: u8) -> bool {
        neighbors & self.must_alive == self.must_alive && neighbors & self.must_dead == 0
    }
}

/// A birth condition with its trigger probability in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirthCondition {
    pub condition: MaskCondition,
    pub p: f64,
}

/// How the alive rules of a set are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliveMode {
    /// An occupied cell survives when an alive rule matches.
    Survive,
    /// An occupied cell dies when an alive rule matches.
    Death,
}

/// A normalized rule set ready for per-cell evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRuleSet {
    pub birth: Vec<BirthCondition>,
    pub alive: Vec<MaskCondition>,
    pub mode: AliveMode,
}

impl CompiledRuleSet {
    pub fn compile(rule_set: &DirectionalRuleSet) -> Self {
        let (mode, alive_rules) = match rule_set.death_rules() {
            Some(death) => (AliveMode::Death, death),
            None => (AliveMode::Survive, rule_set.survive_rules()),
        };

        let birth = rule_set
            .birth_rules()
            .iter()
            .filter_map(|rule| {
                MaskCondition::from_rule(rule).map(|condition| BirthCondition {
                    condition,
                    p: rule.p.map_or(1.0, normalize_probability),
                })
            })
            .collect();
        let alive = alive_rules.iter().filter_map(MaskCondition::from_rule).collect();

        Self { birth, alive, mode }
    }

    /// True as soon as one alive rule matches. Draws nothing.
    pub fn alive_matches(&self, neighbors: u8) -> bool {
        self.alive.iter().any(|condition| condition.matches(neighbors))
    }

    /// Whether an occupied cell keeps its species.
    pub fn survives(&self, neighbors: u8) -> bool {
        let matched = self.alive_matches(neighbors);
        match self.mode {
            AliveMode::Survive => matched,
            AliveMode::Death => !matched,
        }
    }

    /// Whether an empty cell is born.
    ///
    /// Every matching rule draws once, in list order, even after an earlier
    /// rule has already triggered; the draw count is part of the seeded
    /// sequence.
    pub fn birth_triggered<R: RandomSource + ?Sized>(&self, neighbors: u8, rng: &mut R) -> bool {
        let mut triggered = false;
        for rule in &self.birth {
            if !rule.condition.matches(neighbors) {
                continue;
            }
            if rng.next_f64() < rule.p {
                triggered = true;
            }
        }
        triggered
    }
}

/// Memoized compiled rule sets, keyed by rule set id.
#[derive(Debug, Default)]
pub struct RuleSetCache {
    compiled: RwLock<HashMap<RuleSetId, Arc<CompiledRuleSet>>>,
}

impl RuleSetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compile(&self, rule_set: &DirectionalRuleSet) -> Arc<CompiledRuleSet> {
        if let Some(compiled) = self.compiled.read().get(&rule_set.id()) {
            return compiled.clone();
        }

        let mut compiled = self.compiled.write();
        let set = compiled
            .entry(rule_set.id())
            .or_insert_with(|| {
                let set = CompiledRuleSet::compile(rule_set);
                trace!(
                    rule_set = %rule_set.id(),
                    birth_rules = set.birth.len(),
                    alive_rules = set.alive.len(),
                    mode = ?set.mode,
                    "compiled directional rule set"
                );
                Arc::new(set)
            })
            .clone();
        set
    }

    pub fn len(&self) -> usize {
        self.compiled.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.read().is_empty()
    }
}

/// The process-wide directional rule set cache.
pub fn rule_set_cache() -> &'static RuleSetCache {
    static CACHE: OnceLock<RuleSetCache> = OnceLock::new();
    CACHE.get_or_init(RuleSetCache::new)
}

pub fn compile_rule_set(rule_set: &DirectionalRuleSet) -> Arc<CompiledRuleSet> {
    rule_set_cache().compile(rule_set)
}
