//! Effect runtime state and the effects-manager contract.
//!
//! A layer owns a [`LayerEffects`] mapping: which effects exist, in which
//! order they apply, whether they are enabled and which parameter values they
//! carry. Creating filters and advancing them every frame is the job of an
//! [`EffectsManager`], which receives the mapping by reference on each call.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::EffectData;

// ---------------------------------------------------------------------------
// ParamValue
// ---------------------------------------------------------------------------

/// Value of an effect parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ParamValue {
    Double(f64),
    String(String),
    Boolean(bool),
}

// ---------------------------------------------------------------------------
// RenderTarget / EffectsTarget
// ---------------------------------------------------------------------------

/// Opaque handle to the native render target of a layer renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RenderTarget(pub u64);

/// Per-frame context handed to effect filters.
#[derive(Debug, Clone, Copy)]
pub struct EffectsTarget<'a> {
    /// Name of the layer the effects belong to.
    pub layer_name: &'a str,
    /// Render target the effects are attached to.
    pub render_target: RenderTarget,
    /// Elapsed time of the frame in milliseconds, already scaled by the
    /// layer time scale.
    pub elapsed_time: f64,
    /// Width of the layer viewport.
    pub width: f64,
    /// Height of the layer viewport.
    pub height: f64,
}

// ---------------------------------------------------------------------------
// EffectFilter
// ---------------------------------------------------------------------------

/// The filter behind an effect: holds the parameters the compositor reads.
pub trait EffectFilter: fmt::Debug {
    /// Apply a parameter value.
    ///
    /// Returns `false` if the filter has no such parameter or the value has
    /// the wrong type; the filter is left unchanged in that case.
    fn set_parameter(&mut self, name: &str, value: &ParamValue) -> bool;

    /// Advance time-based state before the layer is rendered.
    fn update_pre_render(&mut self, _target: &EffectsTarget<'_>) {}

    /// Parameters the filter changes on its own in
    /// [`update_pre_render`](Self::update_pre_render), with their current
    /// values. Each must be accepted back by
    /// [`set_parameter`](Self::set_parameter).
    fn animated_parameters(&self) -> Vec<(&'static str, ParamValue)> {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// RuntimeEffect
// ---------------------------------------------------------------------------

/// An effect instantiated on a layer.
#[derive(Debug)]
pub struct RuntimeEffect {
    name: String,
    effect_type: String,
    enabled: bool,
    /// Values accepted by the filter, by parameter name.
    parameters: BTreeMap<String, ParamValue>,
    filter: Box<dyn EffectFilter>,
}

impl RuntimeEffect {
    /// Create an enabled effect and apply the initial parameters of `data`.
    ///
    /// Parameters the filter rejects are logged and not recorded.
    pub fn new(data: &EffectData, filter: Box<dyn EffectFilter>) -> Self {
        let mut effect = Self {
            name: data.name.clone(),
            effect_type: data.effect_type.clone(),
            enabled: true,
            parameters: BTreeMap::new(),
            filter,
        };
        for (parameter, value) in data.parameters() {
            if !effect.set_parameter(&parameter, value) {
                tracing::debug!(
                    effect = %data.name,
                    effect_type = %data.effect_type,
                    parameter = %parameter,
                    "initial parameter not accepted by filter"
                );
            }
        }
        effect
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn effect_type(&self) -> &str {
        &self.effect_type
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Forward a parameter to the filter, recording it if accepted.
    pub fn set_parameter(&mut self, parameter: &str, value: ParamValue) -> bool {
        let accepted = self.filter.set_parameter(parameter, &value);
        if accepted {
            self.parameters.insert(parameter.to_owned(), value);
        }
        accepted
    }

    /// Last accepted value of a parameter.
    pub fn parameter(&self, parameter: &str) -> Option<&ParamValue> {
        self.parameters.get(parameter)
    }

    pub fn parameters(&self) -> &BTreeMap<String, ParamValue> {
        &self.parameters
    }

    pub fn filter(&self) -> &dyn EffectFilter {
        self.filter.as_ref()
    }

    pub fn filter_mut(&mut self) -> &mut dyn EffectFilter {
        self.filter.as_mut()
    }

    /// Advance the filter and record the parameters it animated.
    pub fn update_pre_render(&mut self, target: &EffectsTarget<'_>) {
        self.filter.update_pre_render(target);
        for (parameter, value) in self.filter.animated_parameters() {
            self.parameters.insert(parameter.to_owned(), value);
        }
    }

    /// Rebuild a definition that recreates this effect with its current
    /// parameter values.
    pub fn to_effect_data(&self) -> EffectData {
        let mut data = EffectData::new(&self.name, &self.effect_type);
        for (parameter, value) in &self.parameters {
            data.insert_parameter(parameter, value.clone());
        }
        data
    }
}

// ---------------------------------------------------------------------------
// LayerEffects
// ---------------------------------------------------------------------------

/// Effects of a layer keyed by name, in application order.
#[derive(Debug, Default)]
pub struct LayerEffects {
    entries: Vec<RuntimeEffect>,
}

impl LayerEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&RuntimeEffect> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RuntimeEffect> {
        self.entries.iter_mut().find(|e| e.name == name)
    }

    /// Insert an effect. An effect with the same name is replaced in place
    /// and returned.
    pub fn insert(&mut self, effect: RuntimeEffect) -> Option<RuntimeEffect> {
        match self.entries.iter().position(|e| e.name == effect.name) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index], effect)),
            None => {
                self.entries.push(effect);
                None
            }
        }
    }

    /// Remove an effect by name, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<RuntimeEffect> {
        let index = self.entries.iter().position(|e| e.name == name)?;
        Some(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Effect names in application order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuntimeEffect> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RuntimeEffect> {
        self.entries.iter_mut()
    }
}

// ---------------------------------------------------------------------------
// EffectsManager
// ---------------------------------------------------------------------------

/// Creates, configures and updates the effects of layers.
///
/// Every operation receives the layer-owned [`LayerEffects`]; the manager
/// keeps no per-layer state. Operations naming an unknown effect are no-ops
/// and report `false`.
pub trait EffectsManager {
    /// Add an effect, or replace the one with the same name.
    ///
    /// Returns `false` if the effect could not be created (e.g. its type is
    /// unknown); `effects` is unchanged in that case.
    fn add_effect(&self, data: &EffectData, effects: &mut LayerEffects, target: RenderTarget)
        -> bool;

    /// Advance the enabled effects before the layer is rendered.
    fn update_pre_render(&self, effects: &mut LayerEffects, target: &EffectsTarget<'_>);

    /// Remove an effect. Returns whether it existed.
    fn remove_effect(&self, effects: &mut LayerEffects, _target: RenderTarget, name: &str) -> bool {
        effects.remove(name).is_some()
    }

    /// Change a parameter of an effect. Returns whether it was applied.
    fn set_effect_parameter(
        &self,
        effects: &mut LayerEffects,
        name: &str,
        parameter: &str,
        value: ParamValue,
    ) -> bool {
        match effects.get_mut(name) {
            Some(effect) => effect.set_parameter(parameter, value),
            None => false,
        }
    }

    fn enable_effect(&self, effects: &mut LayerEffects, name: &str, enable: bool) {
        if let Some(effect) = effects.get_mut(name) {
            effect.set_enabled(enable);
        }
    }

    fn is_effect_enabled(&self, effects: &LayerEffects, name: &str) -> bool {
        effects.get(name).is_some_and(RuntimeEffect::is_enabled)
    }

    fn has_effect(&self, effects: &LayerEffects, name: &str) -> bool {
        effects.contains(name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
