//! Serialized layer and effect definitions.
//!
//! Field names follow the camelCase project format, so a layer definition
//! exported by the editor deserializes directly:
//!
//! ```
//! use stratum_layer::data::LayerData;
//!
//! let data = LayerData::from_json(r#"{
//!     "name": "Lights",
//!     "visibility": true,
//!     "isLightingLayer": true,
//!     "followBaseLayerCamera": true,
//!     "ambientLightColorR": 128,
//!     "ambientLightColorG": 128,
//!     "ambientLightColorB": 200,
//!     "effects": [
//!         { "name": "soft", "effectType": "Blur", "doubleParameters": { "blur": 4 } }
//!     ]
//! }"#).unwrap();
//!
//! assert!(data.is_lighting_layer);
//! assert_eq!(data.effects[0].effect_type, "Blur");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::effect::ParamValue;
use crate::LayerError;

// ---------------------------------------------------------------------------
// EffectData
// ---------------------------------------------------------------------------

/// Definition of one effect on a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectData {
    /// Unique name of the effect on its layer.
    pub name: String,
    /// Type of filter to instantiate (e.g. `"Blur"`).
    pub effect_type: String,
    #[serde(default)]
    pub double_parameters: BTreeMap<String, f64>,
    #[serde(default)]
    pub string_parameters: BTreeMap<String, String>,
    #[serde(default)]
    pub boolean_parameters: BTreeMap<String, bool>,
}

impl EffectData {
    /// An effect definition without parameters.
    pub fn new(name: &str, effect_type: &str) -> Self {
        Self {
            name: name.to_owned(),
            effect_type: effect_type.to_owned(),
            double_parameters: BTreeMap::new(),
            string_parameters: BTreeMap::new(),
            boolean_parameters: BTreeMap::new(),
        }
    }

    /// Add (or replace) a parameter, choosing the typed map from the value.
    pub fn with_parameter(mut self, name: &str, value: ParamValue) -> Self {
        self.insert_parameter(name, value);
        self
    }

    /// Insert a parameter into the typed map matching its value.
    pub fn insert_parameter(&mut self, name: &str, value: ParamValue) {
        let name = name.to_owned();
        match value {
            ParamValue::Double(v) => {
                self.double_parameters.insert(name, v);
            }
            ParamValue::String(v) => {
                self.string_parameters.insert(name, v);
            }
            ParamValue::Boolean(v) => {
                self.boolean_parameters.insert(name, v);
            }
        }
    }

    /// All parameters as `(name, value)` pairs: doubles, then strings, then
    /// booleans, each sorted by name.
    pub fn parameters(&self) -> Vec<(String, ParamValue)> {
        let doubles = self
            .double_parameters
            .iter()
            .map(|(k, v)| (k.clone(), ParamValue::Double(*v)));
        let strings = self
            .string_parameters
            .iter()
            .map(|(k, v)| (k.clone(), ParamValue::String(v.clone())));
        let booleans = self
            .boolean_parameters
            .iter()
            .map(|(k, v)| (k.clone(), ParamValue::Boolean(*v)));
        doubles.chain(strings).chain(booleans).collect()
    }
}

// ---------------------------------------------------------------------------
// LayerData
// ---------------------------------------------------------------------------

/// Definition of a layer, as stored in a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerData {
    /// Layer name. The empty string is the base layer.
    pub name: String,
    #[serde(default = "default_visibility")]
    pub visibility: bool,
    /// Effects, in application order.
    #[serde(default)]
    pub effects: Vec<EffectData>,
    #[serde(default)]
    pub is_lighting_layer: bool,
    #[serde(default)]
    pub follow_base_layer_camera: bool,
    #[serde(default)]
    pub ambient_light_color_r: u8,
    #[serde(default)]
    pub ambient_light_color_g: u8,
    #[serde(default)]
    pub ambient_light_color_b: u8,
}

fn default_visibility() -> bool {
    true
}

impl LayerData {
    /// A visible, effect-free, non-lighting layer with a black ambient color.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            visibility: true,
            effects: Vec::new(),
            is_lighting_layer: false,
            follow_base_layer_camera: false,
            ambient_light_color_r: 0,
            ambient_light_color_g: 0,
            ambient_light_color_b: 0,
        }
    }

    /// Parse a layer definition from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::InvalidData`] if the JSON is malformed or a
    /// field has the wrong type (e.g. an ambient channel above 255).
    pub fn from_json(json: &str) -> Result<Self, LayerError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let data = LayerData::from_json(r#"{ "name": "UI" }"#).unwrap();
        assert_eq!(data, LayerData::new("UI"));
    }

    #[test]
    fn hidden_layer_and_typed_parameters() {
        let data = LayerData::from_json(
            r#"{
                "name": "",
                "visibility": false,
                "effects": [{
                    "name": "tint",
                    "effectType": "ColorTint",
                    "stringParameters": { "color": "255;0;0" },
                    "booleanParameters": { "animated": true }
                }]
            }"#,
        )
        .unwrap();
        assert!(!data.visibility);
        let effect = &data.effects[0];
        assert_eq!(
            effect.parameters(),
            vec![
                ("color".to_owned(), ParamValue::String("255;0;0".to_owned())),
                ("animated".to_owned(), ParamValue::Boolean(true)),
            ]
        );
    }

    #[test]
    fn out_of_range_ambient_channel_is_rejected() {
        let err = LayerData::from_json(r#"{ "name": "x", "ambientLightColorR": 300 }"#)
            .unwrap_err();
        assert!(matches!(err, LayerError::InvalidData(_)));
    }

    #[test]
    fn builder_routes_parameters_by_type() {
        let data = EffectData::new("wave", "Wave")
            .with_parameter("speed", ParamValue::Double(2.0))
            .with_parameter("paused", ParamValue::Boolean(false));
        assert_eq!(data.double_parameters.get("speed"), Some(&2.0));
        assert_eq!(data.boolean_parameters.get("paused"), Some(&false));
        assert!(data.string_parameters.is_empty());
    }
}
