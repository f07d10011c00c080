//! Document model: features, layers, and the layer store.
//!
//! This module defines the GeoJSON-shaped data the application treats as the
//! source of truth (`Feature`, `FeatureCollection`, `Layer`), a typed accessor
//! for the open-ended properties bag (`Props`), and the snapshot store that
//! owns the ordered layer list and the active-layer pointer (`LayerStore`).
//!
//! Data flows into this layer from project loads (JSON deserialization), from
//! the editing session (write-back of live shapes), and from the importer.
//! Store operations never mutate in place: each returns a new snapshot.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use geo::Geometry;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

/// Stable identifier of a layer.
pub type LayerId = String;

/// Open-ended feature properties (`name`, `color`, and anything else).
pub type Properties = serde_json::Map<String, Value>;

// =============================================================================
// FEATURE
// =============================================================================

/// A single geometry plus its properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FeatureWire", into = "FeatureWire")]
pub struct Feature {
    pub geometry: Geometry<f64>,
    pub properties: Properties,
}

impl Feature {
    /// Feature with no properties.
    #[must_use]
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self { geometry, properties: Properties::new() }
    }

    /// Feature carrying the given `color` (and optional `name`) properties.
    #[must_use]
    pub fn with_style(geometry: Geometry<f64>, name: Option<&str>, color: &str) -> Self {
        let mut properties = Properties::new();
        if let Some(name) = name {
            properties.insert("name".into(), Value::String(name.to_string()));
        }
        properties.insert("color".into(), Value::String(color.to_string()));
        Self { geometry, properties }
    }

    /// Typed view over the properties bag.
    #[must_use]
    pub fn props(&self) -> Props<'_> {
        Props::new(&self.properties)
    }

    /// Name shown for the feature at `index`: its `name` property or `Object N`.
    #[must_use]
    pub fn display_name(&self, index: usize) -> String {
        match self.props().name() {
            Some(name) => name.to_string(),
            None => format!("Object {}", index + 1),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
enum FeatureTag {
    #[default]
    Feature,
}

#[derive(Serialize, Deserialize)]
struct FeatureWire {
    #[serde(rename = "type")]
    tag: FeatureTag,
    geometry: geojson::Geometry,
    #[serde(default)]
    properties: Option<Properties>,
}

impl TryFrom<FeatureWire> for Feature {
    type Error = geojson::Error;

    fn try_from(wire: FeatureWire) -> Result<Self, Self::Error> {
        let geometry = Geometry::<f64>::try_from(wire.geometry)?;
        Ok(Self { geometry, properties: wire.properties.unwrap_or_default() })
    }
}

impl From<Feature> for FeatureWire {
    fn from(feature: Feature) -> Self {
        Self {
            tag: FeatureTag::Feature,
            geometry: geojson::Geometry::new(geojson::Value::from(&feature.geometry)),
            properties: Some(feature.properties),
        }
    }
}

/// Typed access to common fields of a feature's properties.
pub struct Props<'a> {
    value: &'a Properties,
}

impl<'a> Props<'a> {
    /// Wrap a reference to a properties map for typed access.
    #[must_use]
    pub fn new(value: &'a Properties) -> Self {
        Self { value }
    }

    /// User-facing name, when present and non-empty.
    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        self.value
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Stroke/fill color as a CSS color string, when present.
    #[must_use]
    pub fn color(&self) -> Option<&'a str> {
        self.value.get("color").and_then(Value::as_str)
    }
}

// =============================================================================
// FEATURE COLLECTION
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
enum CollectionTag {
    #[default]
    FeatureCollection,
}

/// Ordered sequence of features. Positions are significant: selection and
/// the boolean operation address features by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    tag: CollectionTag,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Wrap an ordered list of features.
    #[must_use]
    pub fn new(features: Vec<Feature>) -> Self {
        Self { tag: CollectionTag::FeatureCollection, features }
    }

    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` if the collection holds no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

// =============================================================================
// LAYER
// =============================================================================

/// A named, toggleable group of features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    /// Accepts either an inline FeatureCollection or one encoded as a JSON string.
    #[serde(default, deserialize_with = "features_inline_or_encoded")]
    pub features: FeatureCollection,
}

impl Layer {
    /// New empty, visible layer with a freshly generated id.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self::with_id(&format!("layer_{}", Uuid::new_v4().simple()), name)
    }

    /// New empty, visible layer with the given id.
    #[must_use]
    pub fn with_id(id: &str, name: &str) -> Self {
        Self { id: id.to_string(), name: name.to_string(), visible: true, features: FeatureCollection::default() }
    }

    /// Builder-style replacement of the layer's features.
    #[must_use]
    pub fn with_features(mut self, features: FeatureCollection) -> Self {
        self.features = features;
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeaturesRepr {
    Inline(FeatureCollection),
    Encoded(String),
}

fn features_inline_or_encoded<'de, D>(deserializer: D) -> Result<FeatureCollection, D::Error>
where
    D: Deserializer<'de>,
{
    match FeaturesRepr::deserialize(deserializer)? {
        FeaturesRepr::Inline(collection) => Ok(collection),
        FeaturesRepr::Encoded(raw) => serde_json::from_str(&raw).map_err(serde::de::Error::custom),
    }
}

// =============================================================================
// LAYER STORE
// =============================================================================

/// Ordered layers plus the id of the one editable ("active") layer.
///
/// Every operation is a pure transformation returning a new snapshot. The
/// active id always names an existing layer or is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerStore {
    layers: Vec<Layer>,
    active_id: Option<LayerId>,
}

impl LayerStore {
    /// Empty store with no active layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `layers`, with the first one active.
    #[must_use]
    pub fn from_layers(layers: Vec<Layer>) -> Self {
        let active_id = layers.first().map(|l| l.id.clone());
        Self { layers, active_id }
    }

    /// Append a layer. Duplicate ids are rejected and the snapshot is returned unchanged.
    #[must_use]
    pub fn add_layer(&self, layer: Layer) -> Self {
        if self.layer(&layer.id).is_some() {
            warn!(layer_id = %layer.id, "add_layer: duplicate layer id ignored");
            return self.clone();
        }
        let mut next = self.clone();
        next.layers.push(layer);
        next
    }

    /// Remove a layer. When it was active, the first remaining layer becomes
    /// active, or none when no layers remain.
    #[must_use]
    pub fn remove_layer(&self, id: &str) -> Self {
        let layers: Vec<Layer> = self.layers.iter().filter(|l| l.id != id).cloned().collect();
        let active_id = match &self.active_id {
            Some(active) if active == id => layers.first().map(|l| l.id.clone()),
            other => other.clone(),
        };
        Self { layers, active_id }
    }

    /// Rename a layer.
    #[must_use]
    pub fn rename_layer(&self, id: &str, name: &str) -> Self {
        self.map_layer(id, |l| l.name = name.to_string())
    }

    /// Show or hide a layer.
    #[must_use]
    pub fn set_visible(&self, id: &str, visible: bool) -> Self {
        self.map_layer(id, |l| l.visible = visible)
    }

    /// Replace a layer's whole feature collection.
    #[must_use]
    pub fn replace_features(&self, id: &str, features: FeatureCollection) -> Self {
        self.map_layer(id, move |l| l.features = features)
    }

    /// Change the active layer. Unknown ids leave the snapshot unchanged.
    #[must_use]
    pub fn set_active(&self, id: Option<&str>) -> Self {
        match id {
            Some(id) if self.layer(id).is_none() => {
                warn!(layer_id = %id, "set_active: unknown layer id ignored");
                self.clone()
            }
            _ => Self { layers: self.layers.clone(), active_id: id.map(str::to_string) },
        }
    }

    fn map_layer(&self, id: &str, f: impl FnOnce(&mut Layer)) -> Self {
        let mut next = self.clone();
        match next.layers.iter_mut().find(|l| l.id == id) {
            Some(layer) => f(layer),
            None => warn!(layer_id = %id, "layer not found"),
        }
        next
    }

    // --- Queries ---

    /// All layers in display order.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Look up a layer by id.
    #[must_use]
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Id of the active layer, if any.
    #[must_use]
    pub fn active_layer_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// The active layer, if any.
    #[must_use]
    pub fn active_layer(&self) -> Option<&Layer> {
        self.active_id.as_deref().and_then(|id| self.layer(id))
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if the store holds no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
