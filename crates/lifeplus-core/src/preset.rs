//! Built-in directional rule presets.
//!
//! A preset is the editable form of a rule set: named rule definitions that
//! can be switched on and off, each with one or more alive-mask variants.
//! [`RulePreset::build_rule_set`] flattens the enabled definitions into a
//! [`DirectionalRuleSet`] in death mode.

use crate::rules::{DirectionalRule, DirectionalRuleSet};
use crate::types::dir;
use serde::{Deserialize, Serialize};

/// Clamp a birth probability: non-finite reads as 1, then clamp to `[0, 1]`.
pub fn normalize_probability(p: f64) -> f64 {
    if !p.is_finite() {
        1.0
    } else if p <= 0.0 {
        0.0
    } else if p >= 1.0 {
        1.0
    } else {
        p
    }
}

/// One named rule in a preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDef {
    pub name: String,
    /// Each variant becomes its own directional rule.
    pub must_alive_masks: Vec<u8>,
    pub must_dead_mask: u8,
    pub enabled: bool,
    pub p: f64,
}

impl RuleDef {
    pub fn new(name: &str, must_alive_masks: &[u8], must_dead_mask: u8, enabled: bool) -> Self {
        Self {
            name: name.to_string(),
            must_alive_masks: must_alive_masks.to_vec(),
            must_dead_mask,
            enabled,
            p: 1.0,
        }
    }

    pub fn with_probability(mut self, p: f64) -> Self {
        self.p = normalize_probability(p);
        self
    }

    fn expand(&self, with_probability: bool) -> impl Iterator<Item = DirectionalRule> + '_ {
        self.must_alive_masks.iter().map(move |&mask| {
            let rule = DirectionalRule::new(i64::from(mask), i64::from(self.must_dead_mask));
            if with_probability {
                rule.with_probability(self.p)
            } else {
                rule
            }
        })
    }
}

/// A named set of birth and death rule definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulePreset {
    pub id: String,
    pub name: String,
    pub birth_rules: Vec<RuleDef>,
    pub death_rules: Vec<RuleDef>,
}

impl RulePreset {
    /// Flatten the enabled definitions into an engine rule set.
    ///
    /// Birth rules keep their probability; death rules never carry one.
    pub fn build_rule_set(&self) -> DirectionalRuleSet {
        let birth = self
            .birth_rules
            .iter()
            .filter(|def| def.enabled)
            .flat_map(|def| def.expand(true))
            .collect();
        let death = self
            .death_rules
            .iter()
            .filter(|def| def.enabled)
            .flat_map(|def| def.expand(false))
            .collect();
        DirectionalRuleSet::death(birth, death)
    }

    /// Toggle a birth definition by name. Returns false if no such rule exists.
    pub fn set_birth_enabled(&mut self, name: &str, enabled: bool) -> bool {
        set_enabled(&mut self.birth_rules, name, enabled)
    }

    /// Toggle a death definition by name. Returns false if no such rule exists.
    pub fn set_death_enabled(&mut self, name: &str, enabled: bool) -> bool {
        set_enabled(&mut self.death_rules, name, enabled)
    }
}

fn set_enabled(defs: &mut [RuleDef], name: &str, enabled: bool) -> bool {
    match defs.iter_mut().find(|def| def.name == name) {
        Some(def) => {
            def.enabled = enabled;
            true
        }
        None => false,
    }
}

/// Growth that spreads sideways and climbs upward.
pub fn expand_preset() -> RulePreset {
    RulePreset {
        id: "expand".to_string(),
        name: "Expand".to_string(),
        birth_rules: vec![
            RuleDef::new("horizontal spread", &[dir::W, dir::E], 0, true),
            RuleDef::new("upward spread", &[dir::S], 0, true),
            RuleDef::new("supported growth", &[dir::S | dir::SW | dir::SE], 0, false),
        ],
        death_rules: Vec::new(),
    }
}

/// All built-in presets, the default first.
pub fn presets() -> Vec<RulePreset> {
    vec![expand_preset()]
}

pub fn find_preset(id: &str) -> Option<RulePreset> {
    presets().into_iter().find(|preset| preset.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_probability() {
        assert_eq!(normalize_probability(f64::NAN), 1.0);
        assert_eq!(normalize_probability(f64::INFINITY), 1.0);
        assert_eq!(normalize_probability(-0.5), 0.0);
        assert_eq!(normalize_probability(0.0), 0.0);
        assert_eq!(normalize_probability(0.25), 0.25);
        assert_eq!(normalize_probability(3.0), 1.0);
    }

    #[test]
    fn test_expand_preset_build() {
        let preset = expand_preset();
        let set = preset.build_rule_set();

        // Two variants from "horizontal spread", one from "upward spread".
        let birth: Vec<(i64, i64, Option<f64>)> = set
            .birth_rules()
            .iter()
            .map(|rule| (rule.must_alive_mask, rule.must_dead_mask, rule.p))
            .collect();
        assert_eq!(
            birth,
            vec![
                (i64::from(dir::W), 0, Some(1.0)),
                (i64::from(dir::E), 0, Some(1.0)),
                (i64::from(dir::S), 0, Some(1.0)),
            ]
        );
        assert_eq!(set.death_rules(), Some(&[][..]));
    }

    #[test]
    fn test_toggle_rules() {
        let mut preset = expand_preset();
        assert!(preset.set_birth_enabled("supported growth", true));
        assert!(preset.set_birth_enabled("horizontal spread", false));
        assert!(!preset.set_death_enabled("missing", true));

        let set = preset.build_rule_set();
        let masks: Vec<i64> = set.birth_rules().iter().map(|r| r.must_alive_mask).collect();
        assert_eq!(
            masks,
            vec![i64::from(dir::S), i64::from(dir::S | dir::SW | dir::SE)]
        );
    }

    #[test]
    fn test_death_rules_drop_probability() {
        let mut preset = expand_preset();
        preset
            .death_rules
            .push(RuleDef::new("crowded", &[dir::E | dir::W], dir::N, true).with_probability(0.3));
        let set = preset.build_rule_set();
        let death = set.death_rules().unwrap();
        assert_eq!(death.len(), 1);
        assert_eq!(death[0].p, None);
        assert_eq!(death[0].must_dead_mask, i64::from(dir::N));
    }

    #[test]
    fn test_find_preset() {
        assert!(find_preset("expand").is_some());
        assert!(find_preset("nope").is_none());
        assert_eq!(presets()[0].id, "expand");
    }
}
