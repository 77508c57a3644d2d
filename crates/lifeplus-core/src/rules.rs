//! Rule definitions as supplied by callers.
//!
//! These are the uncompiled forms. They accept out-of-range or malformed
//! entries on purpose; the engine's compilers normalize or drop them.

use crate::lenient;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Birth counts of the standard Conway rule.
pub const DEFAULT_BIRTH: [i64; 1] = [3];
/// Survival counts of the standard Conway rule.
pub const DEFAULT_SURVIVE: [i64; 2] = [2, 3];

/// Neighbor-count rule applied to each species layer.
///
/// A `None` list falls back to the corresponding Conway default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicRule {
    #[serde(default, deserialize_with = "lenient::counts")]
    pub birth: Option<Vec<i64>>,
    #[serde(default, deserialize_with = "lenient::counts")]
    pub survive: Option<Vec<i64>>,
}

impl ClassicRule {
    pub fn new(birth: &[i64], survive: &[i64]) -> Self {
        Self {
            birth: Some(birth.to_vec()),
            survive: Some(survive.to_vec()),
        }
    }

    /// B3/S23.
    pub fn conway() -> Self {
        Self::new(&DEFAULT_BIRTH, &DEFAULT_SURVIVE)
    }

    pub fn birth_counts(&self) -> &[i64] {
        self.birth.as_deref().unwrap_or(&DEFAULT_BIRTH)
    }

    pub fn survive_counts(&self) -> &[i64] {
        self.survive.as_deref().unwrap_or(&DEFAULT_SURVIVE)
    }
}

fn invalid_mask() -> i64 {
    lenient::INVALID_MASK
}

/// A single direction-mask condition.
///
/// Masks are kept wide so that out-of-range input survives until
/// compilation, where it invalidates the rule. `p` is only meaningful for
/// birth rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalRule {
    #[serde(default = "invalid_mask", deserialize_with = "lenient::mask")]
    pub must_alive_mask: i64,
    #[serde(default = "invalid_mask", deserialize_with = "lenient::mask")]
    pub must_dead_mask: i64,
    #[serde(default, deserialize_with = "lenient::probability")]
    pub p: Option<f64>,
}

impl DirectionalRule {
    pub fn new(must_alive_mask: i64, must_dead_mask: i64) -> Self {
        Self {
            must_alive_mask,
            must_dead_mask,
            p: None,
        }
    }

    pub fn with_probability(mut self, p: f64) -> Self {
        self.p = Some(p);
        self
    }

    /// A rule every compiler drops.
    pub fn invalid() -> Self {
        Self::new(lenient::INVALID_MASK, lenient::INVALID_MASK)
    }
}

/// Identifier used to memoize compiled rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleSetId(pub Uuid);

impl RuleSetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RuleSetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RuleSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Directional rules for birth and for the fate of occupied cells.
///
/// When `death_rules` is present the set runs in death mode: an occupied cell
/// dies when a death rule matches. Otherwise an occupied cell survives only
/// when a survive rule matches.
///
/// Every value carries a [`RuleSetId`]. Builder methods that change the rules
/// hand out a fresh id, so a compiled form cached under an id always matches
/// the rules it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionalRuleSet {
    #[serde(skip, default)]
    id: RuleSetId,
    #[serde(default, deserialize_with = "lenient::rules")]
    birth_rules: Vec<DirectionalRule>,
    #[serde(default, deserialize_with = "lenient::rules")]
    survive_rules: Vec<DirectionalRule>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_rules",
        skip_serializing_if = "Option::is_none"
    )]
    death_rules: Option<Vec<DirectionalRule>>,
}

impl DirectionalRuleSet {
    /// A rule set in survive mode.
    pub fn survive(birth_rules: Vec<DirectionalRule>, survive_rules: Vec<DirectionalRule>) -> Self {
        Self {
            id: RuleSetId::new(),
            birth_rules,
            survive_rules,
            death_rules: None,
        }
    }

    /// A rule set in death mode.
    pub fn death(birth_rules: Vec<DirectionalRule>, death_rules: Vec<DirectionalRule>) -> Self {
        Self {
            id: RuleSetId::new(),
            birth_rules,
            survive_rules: Vec::new(),
            death_rules: Some(death_rules),
        }
    }

    pub fn id(&self) -> RuleSetId {
        self.id
    }

    pub fn birth_rules(&self) -> &[DirectionalRule] {
        &self.birth_rules
    }

    pub fn survive_rules(&self) -> &[DirectionalRule] {
        &self.survive_rules
    }

    pub fn death_rules(&self) -> Option<&[DirectionalRule]> {
        self.death_rules.as_deref()
    }

    pub fn with_birth_rule(mut self, rule: DirectionalRule) -> Self {
        self.birth_rules.push(rule);
        self.id = RuleSetId::new();
        self
    }

    pub fn with_survive_rule(mut self, rule: DirectionalRule) -> Self {
        self.survive_rules.push(rule);
        self.id = RuleSetId::new();
        self
    }

    /// Add a death rule, switching the set to death mode.
    pub fn with_death_rule(mut self, rule: DirectionalRule) -> Self {
        self.death_rules.get_or_insert_with(Vec::new).push(rule);
        self.id = RuleSetId::new();
        self
    }
}

impl Default for DirectionalRuleSet {
    fn default() -> Self {
        Self::survive(Vec::new(), Vec::new())
    }
}
