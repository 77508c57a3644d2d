//! Permissive deserializers for rule input.
//!
//! Rule configurations coming from a UI or a config file are never rejected
//! for bad entries. Anything that does not have the expected shape decays to
//! a value the rule compilers drop or clamp.

use crate::rules::DirectionalRule;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Mask value that no compiler accepts.
pub const INVALID_MASK: i64 = -1;

/// An integral JSON number, including floats with no fractional part.
pub fn integer(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(n) = number.as_i64() {
        return Some(n);
    }
    let n = number.as_f64()?;
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}

pub(crate) fn mask<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(integer(&value).unwrap_or(INVALID_MASK))
}

pub(crate) fn probability<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// A list of neighbor counts; `None` when the value is not a list.
pub(crate) fn counts<'de, D>(deserializer: D) -> Result<Option<Vec<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => Some(items.iter().filter_map(integer).collect()),
        _ => None,
    })
}

fn rule_from_value(value: Value) -> DirectionalRule {
    serde_json::from_value(value).unwrap_or_else(|_| DirectionalRule::invalid())
}

/// A list of rules; anything that is not a list reads as empty.
pub(crate) fn rules<'de, D>(deserializer: D) -> Result<Vec<DirectionalRule>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.into_iter().map(rule_from_value).collect(),
        _ => Vec::new(),
    })
}

/// An optional list of rules; anything that is not a list reads as absent.
pub(crate) fn optional_rules<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<DirectionalRule>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => Some(items.into_iter().map(rule_from_value).collect()),
        _ => None,
    })
}
