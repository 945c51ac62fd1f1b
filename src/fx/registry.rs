use std::collections::BTreeMap;

use crate::{
    config::params::EffectConfig,
    foundation::error::{LoopFxError, LoopFxResult},
    fx::{
        bloom::Bloom,
        chromatic::ChromaticOrbit,
        echo::Echo,
        effect::{Effect, EffectInstance, EffectMetadata, StaticSettings},
        grain::Grain,
        interference::Interference,
        ripple::Ripple,
        vignette::Vignette,
        vortex::VortexFlow,
    },
};

type Instantiate = fn(EffectConfig, StaticSettings) -> EffectInstance;

fn instantiate_with<E: Effect>(config: EffectConfig, settings: StaticSettings) -> EffectInstance {
    EffectInstance::new(E::default(), config, settings)
}

/// Immutable registry entry for one effect type.
#[derive(Clone, Copy)]
pub struct EffectDescriptor {
    metadata: &'static EffectMetadata,
    instantiate: Instantiate,
}

impl std::fmt::Debug for EffectDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectDescriptor")
            .field("id", &self.metadata.id)
            .finish()
    }
}

impl EffectDescriptor {
    /// Descriptor for effect type `E`.
    pub fn of<E: Effect>() -> Self {
        Self {
            metadata: E::default().metadata(),
            instantiate: instantiate_with::<E>,
        }
    }

    /// Registry id.
    pub fn id(&self) -> &'static str {
        self.metadata.id
    }

    /// Name, description and parameter table.
    pub fn metadata(&self) -> &'static EffectMetadata {
        self.metadata
    }

    /// Every parameter at its default.
    pub fn default_config(&self) -> EffectConfig {
        EffectConfig::defaults(self.metadata.params)
    }

    /// Normalize a flat JSON parameter object against this effect's declarations.
    pub fn config_from_json(&self, params: &serde_json::Value) -> LoopFxResult<EffectConfig> {
        EffectConfig::from_json(self.metadata.params, params)
    }

    /// Precompute an instance.
    pub fn instantiate(&self, config: EffectConfig, settings: StaticSettings) -> EffectInstance {
        (self.instantiate)(config, settings)
    }
}

/// Explicit id → descriptor table.
#[derive(Clone, Debug, Default)]
pub struct EffectRegistry {
    by_id: BTreeMap<&'static str, EffectDescriptor>,
}

impl EffectRegistry {
    /// A registry with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every built-in effect.
    pub fn builtin() -> Self {
        let mut reg = Self::empty();
        for d in [
            EffectDescriptor::of::<Bloom>(),
            EffectDescriptor::of::<Ripple>(),
            EffectDescriptor::of::<ChromaticOrbit>(),
            EffectDescriptor::of::<VortexFlow>(),
            EffectDescriptor::of::<Interference>(),
            EffectDescriptor::of::<Echo>(),
            EffectDescriptor::of::<Vignette>(),
            EffectDescriptor::of::<Grain>(),
        ] {
            reg.by_id.insert(d.id(), d);
        }
        reg
    }

    /// Add a descriptor; ids must be unique.
    pub fn register(&mut self, descriptor: EffectDescriptor) -> LoopFxResult<()> {
        if self.by_id.contains_key(descriptor.id()) {
            return Err(LoopFxError::validation(format!(
                "effect id '{}' is already registered",
                descriptor.id()
            )));
        }
        self.by_id.insert(descriptor.id(), descriptor);
        Ok(())
    }

    /// Descriptor for `id`.
    pub fn get(&self, id: &str) -> Option<&EffectDescriptor> {
        self.by_id.get(id)
    }

    /// Descriptor for `id`, or a validation error naming the known ids.
    pub fn require(&self, id: &str) -> LoopFxResult<&EffectDescriptor> {
        self.get(id).ok_or_else(|| {
            LoopFxError::validation(format!(
                "unknown effect '{id}' (known: {})",
                self.ids().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_id.keys().copied()
    }

    /// Registered descriptors in id order.
    pub fn descriptors(&self) -> impl Iterator<Item = &EffectDescriptor> {
        self.by_id.values()
    }

    /// Look up `id`, normalize `params` and precompute an instance.
    pub fn instantiate(
        &self,
        id: &str,
        params: &serde_json::Value,
        settings: StaticSettings,
    ) -> LoopFxResult<EffectInstance> {
        let d = self.require(id)?;
        let config = d.config_from_json(params)?;
        Ok(d.instantiate(config, settings))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fx/registry.rs"]
mod tests;
