//! The standard effects manager.
//!
//! Effects are created from a registry of filter factories keyed by effect
//! type. An effect whose type has no registered factory is not added.

mod filters;

use std::collections::HashMap;
use std::fmt;

use stratum_layer::prelude::*;

pub use filters::{BlurFilter, TintFilter, WaveFilter, BLUR_EFFECT, COLOR_TINT_EFFECT, WAVE_EFFECT};

/// Builds the filter of a new effect from its definition.
pub type EffectFactory = Box<dyn Fn(&EffectData) -> Box<dyn EffectFilter>>;

/// Effects manager backed by a registry of filter factories.
#[derive(Default)]
pub struct StandardEffectsManager {
    factories: HashMap<String, EffectFactory>,
}

impl StandardEffectsManager {
    /// A manager with no effect types registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// A manager knowing the [`BLUR_EFFECT`], [`COLOR_TINT_EFFECT`] and
    /// [`WAVE_EFFECT`] types.
    pub fn with_builtin_filters() -> Self {
        let mut manager = Self::new();
        manager.register(BLUR_EFFECT, |_: &EffectData| -> Box<dyn EffectFilter> {
            Box::new(BlurFilter::default())
        });
        manager.register(COLOR_TINT_EFFECT, |_: &EffectData| -> Box<dyn EffectFilter> {
            Box::new(TintFilter::default())
        });
        manager.register(WAVE_EFFECT, |_: &EffectData| -> Box<dyn EffectFilter> {
            Box::new(WaveFilter::default())
        });
        manager
    }

    /// Register (or replace) the factory of an effect type.
    pub fn register<F>(&mut self, effect_type: &str, factory: F)
    where
        F: Fn(&EffectData) -> Box<dyn EffectFilter> + 'static,
    {
        if self
            .factories
            .insert(effect_type.to_owned(), Box::new(factory))
            .is_some()
        {
            tracing::debug!(effect_type, "replaced effect factory");
        }
    }

    pub fn has_effect_type(&self, effect_type: &str) -> bool {
        self.factories.contains_key(effect_type)
    }

    /// Registered effect types, sorted.
    pub fn effect_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl fmt::Debug for StandardEffectsManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardEffectsManager")
            .field("effect_types", &self.effect_types())
            .finish()
    }
}

impl EffectsManager for StandardEffectsManager {
    fn add_effect(&self, data: &EffectData, effects: &mut LayerEffects, target: RenderTarget) -> bool {
        let Some(factory) = self.factories.get(&data.effect_type) else {
            tracing::warn!(
                effect = %data.name,
                effect_type = %data.effect_type,
                "no filter registered for effect type; effect not added"
            );
            return false;
        };

        let effect = RuntimeEffect::new(data, factory(data));
        if effects.insert(effect).is_some() {
            tracing::debug!(effect = %data.name, render_target = target.0, "replaced existing effect");
        }
        true
    }

    fn update_pre_render(&self, effects: &mut LayerEffects, target: &EffectsTarget<'_>) {
        for effect in effects.iter_mut().filter(|effect| effect.is_enabled()) {
            effect.update_pre_render(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_types() {
        let manager = StandardEffectsManager::with_builtin_filters();
        assert_eq!(manager.effect_types(), vec!["Blur", "ColorTint", "Wave"]);
        assert!(!manager.has_effect_type("Glow"));
    }

    #[test]
    fn unknown_type_is_not_added() {
        let manager = StandardEffectsManager::with_builtin_filters();
        let mut effects = LayerEffects::new();
        assert!(!manager.add_effect(
            &EffectData::new("glow", "Glow"),
            &mut effects,
            RenderTarget(0)
        ));
        assert!(effects.is_empty());
    }

    #[test]
    fn custom_factory_sees_definition() {
        let mut manager = StandardEffectsManager::new();
        manager.register("Blur", |data: &EffectData| -> Box<dyn EffectFilter> {
            let mut filter = BlurFilter::default();
            if data.name == "strong" {
                filter.blur = 50.0;
            }
            Box::new(filter)
        });
        let mut effects = LayerEffects::new();
        assert!(manager.add_effect(&EffectData::new("strong", "Blur"), &mut effects, RenderTarget(0)));
        assert!(format!("{:?}", effects.get("strong").unwrap().filter()).contains("50.0"));
    }
}
