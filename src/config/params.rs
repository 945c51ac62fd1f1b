use std::collections::BTreeMap;

use serde::Serialize;

use crate::foundation::error::{LoopFxError, LoopFxResult};

/// Declared type, legal range and default of one effect parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamKind {
    /// Real number clamped into `[min, max]`.
    Float {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
        /// Default value.
        default: f64,
    },
    /// Integer clamped into `[min, max]`; fractional input is rounded.
    Int {
        /// Lower bound.
        min: i64,
        /// Upper bound.
        max: i64,
        /// Default value.
        default: i64,
    },
    /// Flag.
    Bool {
        /// Default value.
        default: bool,
    },
    /// One of a fixed set of lowercase names; anything else selects `default`.
    Choice {
        /// Legal names.
        options: &'static [&'static str],
        /// Default name.
        default: &'static str,
    },
    /// Hex color string, parsed at precompute time.
    Color {
        /// Default color.
        default: &'static str,
    },
}

/// One named parameter of an effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSpec {
    /// Key in the flat configuration map.
    pub name: &'static str,
    /// Type, range and default.
    pub kind: ParamKind,
    /// One-line description.
    pub doc: &'static str,
}

impl ParamSpec {
    pub(crate) const fn float(
        name: &'static str,
        min: f64,
        max: f64,
        default: f64,
        doc: &'static str,
    ) -> Self {
        Self {
            name,
            kind: ParamKind::Float { min, max, default },
            doc,
        }
    }

    pub(crate) const fn int(
        name: &'static str,
        min: i64,
        max: i64,
        default: i64,
        doc: &'static str,
    ) -> Self {
        Self {
            name,
            kind: ParamKind::Int { min, max, default },
            doc,
        }
    }

    pub(crate) const fn flag(name: &'static str, default: bool, doc: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Bool { default },
            doc,
        }
    }

    pub(crate) const fn choice(
        name: &'static str,
        options: &'static [&'static str],
        default: &'static str,
        doc: &'static str,
    ) -> Self {
        Self {
            name,
            kind: ParamKind::Choice { options, default },
            doc,
        }
    }

    pub(crate) const fn color(
        name: &'static str,
        default: &'static str,
        doc: &'static str,
    ) -> Self {
        Self {
            name,
            kind: ParamKind::Color { default },
            doc,
        }
    }

    /// Default value for this parameter.
    pub fn default_value(&self) -> ParamValue {
        match self.kind {
            ParamKind::Float { default, .. } => ParamValue::Float(default),
            ParamKind::Int { default, .. } => ParamValue::Int(default),
            ParamKind::Bool { default } => ParamValue::Bool(default),
            ParamKind::Choice { default, .. } => ParamValue::Text(default.to_owned()),
            ParamKind::Color { default } => ParamValue::Text(default.to_owned()),
        }
    }

    /// Coerce a raw JSON value into this parameter's legal domain.
    ///
    /// Never fails: numbers are clamped, unknown choices and wrong types fall back to the
    /// default. Numeric strings are accepted for numeric kinds.
    pub fn normalize(&self, raw: &serde_json::Value) -> ParamValue {
        let out = match self.kind {
            ParamKind::Float { min, max, default } => match as_number(raw) {
                Some(v) if v.is_finite() => ParamValue::Float(v.clamp(min, max)),
                _ => ParamValue::Float(default),
            },
            ParamKind::Int { min, max, default } => match as_number(raw) {
                Some(v) if v.is_finite() => {
                    let v = v.round().clamp(min as f64, max as f64) as i64;
                    ParamValue::Int(v)
                }
                _ => ParamValue::Int(default),
            },
            ParamKind::Bool { default } => ParamValue::Bool(as_bool(raw).unwrap_or(default)),
            ParamKind::Choice { options, default } => {
                let picked = raw
                    .as_str()
                    .map(|s| s.trim().to_ascii_lowercase())
                    .and_then(|s| options.iter().find(|o| **o == s).copied())
                    .unwrap_or(default);
                ParamValue::Text(picked.to_owned())
            }
            ParamKind::Color { default } => match raw.as_str() {
                Some(s) => ParamValue::Text(s.trim().to_owned()),
                None => ParamValue::Text(default.to_owned()),
            },
        };
        if !out.matches_json(raw) {
            tracing::debug!(param = self.name, raw = %raw, value = ?out, "parameter coerced");
        }
        out
    }
}

fn as_number(v: &serde_json::Value) -> Option<f64> {
    match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        serde_json::Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn as_bool(v: &serde_json::Value) -> Option<bool> {
    match v {
        serde_json::Value::Bool(b) => Some(*b),
        serde_json::Value::Number(n) => n.as_f64().map(|x| x != 0.0),
        serde_json::Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// A normalized parameter value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Flag.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Real number.
    Float(f64),
    /// Choice name or color string.
    Text(String),
}

impl ParamValue {
    fn matches_json(&self, raw: &serde_json::Value) -> bool {
        match (self, raw) {
            (Self::Bool(a), serde_json::Value::Bool(b)) => a == b,
            (Self::Int(a), serde_json::Value::Number(n)) => n.as_i64() == Some(*a),
            (Self::Float(a), serde_json::Value::Number(n)) => n.as_f64() == Some(*a),
            (Self::Text(a), serde_json::Value::String(b)) => a == b,
            _ => false,
        }
    }

    fn as_f64(&self) -> f64 {
        match self {
            Self::Float(v) => *v,
            Self::Int(v) => *v as f64,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Text(_) => 0.0,
        }
    }
}

/// Validated, immutable parameter set of one effect.
///
/// Every declared parameter is present; out-of-range inputs have already been clamped.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EffectConfig {
    values: BTreeMap<&'static str, ParamValue>,
}

impl EffectConfig {
    /// All parameters at their defaults.
    pub fn defaults(specs: &'static [ParamSpec]) -> Self {
        Self {
            values: specs.iter().map(|s| (s.name, s.default_value())).collect(),
        }
    }

    /// Build from a flat JSON object. `null` yields the defaults.
    ///
    /// Only a non-object input is an error; unknown keys are ignored.
    pub fn from_json(specs: &'static [ParamSpec], raw: &serde_json::Value) -> LoopFxResult<Self> {
        let obj = match raw {
            serde_json::Value::Null => return Ok(Self::defaults(specs)),
            serde_json::Value::Object(o) => o,
            other => {
                return Err(LoopFxError::validation(format!(
                    "effect params must be a JSON object, got {other}"
                )));
            }
        };

        for key in obj.keys() {
            if !specs.iter().any(|s| s.name == key) {
                tracing::debug!(param = %key, "ignoring unknown parameter");
            }
        }

        let values = specs
            .iter()
            .map(|s| {
                let v = match obj.get(s.name) {
                    Some(raw) => s.normalize(raw),
                    None => s.default_value(),
                };
                (s.name, v)
            })
            .collect();
        Ok(Self { values })
    }

    /// Flat `key → value` JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Stable 64-bit digest of the normalized values.
    pub fn fingerprint(&self) -> u64 {
        let canon = serde_json::to_vec(self).unwrap_or_default();
        xxhash_rust::xxh3::xxh3_64(&canon)
    }

    /// Raw value of `name`.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Numeric value of `name` (0 if undeclared).
    pub fn f64(&self, name: &str) -> f64 {
        self.values.get(name).map(ParamValue::as_f64).unwrap_or(0.0)
    }

    /// Integer value of `name` (0 if undeclared).
    pub fn i64(&self, name: &str) -> i64 {
        match self.values.get(name) {
            Some(ParamValue::Int(v)) => *v,
            Some(other) => other.as_f64().round() as i64,
            None => 0,
        }
    }

    /// Flag value of `name` (false if undeclared).
    pub fn flag(&self, name: &str) -> bool {
        match self.values.get(name) {
            Some(ParamValue::Bool(b)) => *b,
            Some(other) => other.as_f64() != 0.0,
            None => false,
        }
    }

    /// Text value of `name` (empty if undeclared or numeric).
    pub fn text(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(ParamValue::Text(s)) => s,
            _ => "",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/params.rs"]
mod tests;
