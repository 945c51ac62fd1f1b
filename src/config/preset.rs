use std::path::Path;

use crate::{
    foundation::error::{LoopFxError, LoopFxResult},
    fx::{
        effect::{EffectInstance, StaticSettings},
        registry::EffectRegistry,
    },
};

/// An effect id with its parameters and optional target size, as stored in a JSON file.
///
/// ```json
/// { "effect": "ripple", "params": { "amplitude": 6 }, "width": 512, "height": 512 }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EffectPreset {
    /// Registry id.
    pub effect: String,
    /// Flat parameter object; missing or `null` selects the defaults.
    #[serde(default)]
    pub params: serde_json::Value,
    /// Target width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Target height in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl EffectPreset {
    /// Preset for `effect` with default parameters.
    pub fn new(effect: impl Into<String>) -> Self {
        Self {
            effect: effect.into(),
            params: serde_json::Value::Null,
            width: None,
            height: None,
        }
    }

    /// Parse a preset from JSON text.
    pub fn from_json_str(s: &str) -> LoopFxResult<Self> {
        let preset: Self = serde_json::from_str(s)?;
        if preset.effect.trim().is_empty() {
            return Err(LoopFxError::validation("preset 'effect' must not be empty"));
        }
        Ok(preset)
    }

    /// Read and parse a preset file.
    pub fn from_path(path: impl AsRef<Path>) -> LoopFxResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text).map_err(|e| match e {
            LoopFxError::Serde(msg) => {
                LoopFxError::serde(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Target size as [`StaticSettings`].
    pub fn settings(&self) -> StaticSettings {
        StaticSettings {
            width: self.width,
            height: self.height,
        }
    }

    /// Resolve against `registry` and precompute an instance.
    pub fn instantiate(&self, registry: &EffectRegistry) -> LoopFxResult<EffectInstance> {
        registry.instantiate(self.effect.trim(), &self.params, self.settings())
    }

    /// Like [`EffectPreset::instantiate`], with `width` and `height` filling in whichever
    /// target dimensions the preset leaves unset.
    pub fn instantiate_for(
        &self,
        registry: &EffectRegistry,
        width: u32,
        height: u32,
    ) -> LoopFxResult<EffectInstance> {
        let settings = self.settings().or_size(width, height);
        registry.instantiate(self.effect.trim(), &self.params, settings)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/preset.rs"]
mod tests;
