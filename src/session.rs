//! Active-layer editing session.
//!
//! The session owns the live shapes projected from the active layer: an
//! arena of [`LiveShape`]s kept in the same order as the layer's stored
//! features, so position `i` in the arena is feature `i` in the store.
//!
//! Projection runs one way (stored features into live shapes) on activation
//! and on external replacement of the collection. Mutations made through
//! the surface flow back as a freshly built [`FeatureCollection`] via
//! [`EditSession::collection`], always read after the mutation is applied.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use geo::Geometry;
use tracing::{debug, info, warn};

use crate::config::EditorConfig;
use crate::doc::{Feature, FeatureCollection, Layer, LayerId, Properties};
use crate::selection::Selection;
use crate::surface::{DrawKind, DrawRequest, ShapeHandle, ShapeStyle, Surface};

/// One live shape bound to one stored feature.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveShape {
    pub handle: ShapeHandle,
    pub geometry: Geometry<f64>,
    pub properties: Properties,
}

impl LiveShape {
    /// Snapshot as a stored feature.
    #[must_use]
    pub fn to_feature(&self) -> Feature {
        Feature { geometry: self.geometry.clone(), properties: self.properties.clone() }
    }

    fn color(&self) -> Option<&str> {
        self.properties.get("color").and_then(serde_json::Value::as_str)
    }
}

/// Live-shape state for the active layer.
#[derive(Debug, Default)]
pub struct EditSession {
    /// Layer whose features are projected; `None` while suspended.
    layer_id: Option<LayerId>,
    shapes: Vec<LiveShape>,
    editing: Option<ShapeHandle>,
    last_draw: Option<u64>,
}

impl EditSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // PROJECTION
    // =========================================================================

    /// Tear down every live shape and rebuild from `layer`.
    ///
    /// A missing or hidden layer leaves the session suspended with no shapes.
    pub fn project<S: Surface>(&mut self, surface: &mut S, layer: Option<&Layer>, config: &EditorConfig) {
        self.clear(surface);
        let Some(layer) = layer.filter(|l| l.visible) else {
            debug!("session: suspended (no visible active layer)");
            return;
        };
        for feature in &layer.features.features {
            let style = ShapeStyle::normal(feature.props().color(), &config.default_color);
            let handle = surface.add_shape(&feature.geometry, &style);
            self.shapes.push(LiveShape { handle, geometry: feature.geometry.clone(), properties: feature.properties.clone() });
        }
        self.layer_id = Some(layer.id.clone());
        info!(layer_id = %layer.id, shapes = self.shapes.len(), "session: projected layer");
    }

    /// Remove all live shapes from the surface and suspend.
    pub fn clear<S: Surface>(&mut self, surface: &mut S) {
        if let Some(handle) = self.editing.take() {
            surface.set_editing(handle, false);
        }
        for shape in self.shapes.drain(..) {
            surface.remove_shape(shape.handle);
        }
        self.layer_id = None;
    }

    /// Restyle every live shape to reflect `selection`.
    pub fn restyle<S: Surface>(&self, surface: &mut S, selection: &Selection, config: &EditorConfig) {
        for (index, shape) in self.shapes.iter().enumerate() {
            let style = if selection.contains(index) {
                ShapeStyle::selected(shape.color(), &config.default_color, &config.highlight_color)
            } else {
                ShapeStyle::normal(shape.color(), &config.default_color)
            };
            surface.set_style(shape.handle, &style);
        }
    }

    // =========================================================================
    // DRAWING
    // =========================================================================

    /// Enter drawing mode. Returns `false` while suspended.
    pub fn begin_draw<S: Surface>(&mut self, surface: &mut S, kind: DrawKind) -> bool {
        if self.layer_id.is_none() {
            debug!(?kind, "begin_draw: no active layer");
            return false;
        }
        surface.begin_draw(kind);
        true
    }

    /// Enter drawing mode for a host request. A request whose id was already
    /// honored is ignored, so repeated requests of one kind need distinct ids.
    pub fn begin_requested_draw<S: Surface>(&mut self, surface: &mut S, request: DrawRequest) -> bool {
        if self.last_draw == Some(request.id) {
            debug!(id = request.id, "begin_draw: request already handled");
            return false;
        }
        if !self.begin_draw(surface, request.kind) {
            return false;
        }
        self.last_draw = Some(request.id);
        true
    }

    // =========================================================================
    // SURFACE EVENTS
    // =========================================================================

    /// Record a shape the surface just created. Duplicate notifications for
    /// the same handle are ignored; returns whether the shape was added.
    ///
    /// With no active layer the shape has nowhere to live and is removed
    /// from the surface again.
    pub fn shape_created<S: Surface>(&mut self, surface: &mut S, handle: ShapeHandle, geometry: Geometry<f64>, color: &str, config: &EditorConfig) -> bool {
        if self.index_of(handle).is_some() {
            debug!(?handle, "shape_created: already tracked");
            return false;
        }
        if self.layer_id.is_none() {
            warn!(?handle, "shape_created: no active layer, discarding shape");
            surface.remove_shape(handle);
            return false;
        }
        let feature = Feature::with_style(geometry, None, color);
        surface.set_style(handle, &ShapeStyle::normal(Some(color), &config.default_color));
        self.shapes.push(LiveShape { handle, geometry: feature.geometry, properties: feature.properties });
        true
    }

    /// Record new vertices for a shape. Returns whether the handle was known.
    pub fn shape_edited(&mut self, handle: ShapeHandle, geometry: Geometry<f64>) -> bool {
        match self.shapes.iter_mut().find(|s| s.handle == handle) {
            Some(shape) => {
                shape.geometry = geometry;
                true
            }
            None => {
                warn!(?handle, "shape_edited: unknown handle");
                false
            }
        }
    }

    /// Forget shapes the surface already removed. Returns how many were tracked.
    pub fn shapes_deleted(&mut self, handles: &[ShapeHandle]) -> usize {
        let before = self.shapes.len();
        self.shapes.retain(|s| !handles.contains(&s.handle));
        if self.editing.is_some_and(|h| handles.contains(&h)) {
            self.editing = None;
        }
        before - self.shapes.len()
    }

    /// Remove the shape at `index` from both the arena and the surface.
    pub fn remove<S: Surface>(&mut self, surface: &mut S, index: usize) -> Option<LiveShape> {
        if index >= self.shapes.len() {
            return None;
        }
        let shape = self.shapes.remove(index);
        if self.editing == Some(shape.handle) {
            self.editing = None;
        }
        surface.remove_shape(shape.handle);
        Some(shape)
    }

    // =========================================================================
    // VERTEX EDITING
    // =========================================================================

    /// Enable vertex editing on the shape at `index`, disabling it on any
    /// other shape first.
    pub fn begin_edit<S: Surface>(&mut self, surface: &mut S, index: usize) -> bool {
        let Some(handle) = self.shapes.get(index).map(|s| s.handle) else {
            return false;
        };
        if let Some(previous) = self.editing.filter(|h| *h != handle) {
            surface.set_editing(previous, false);
        }
        surface.set_editing(handle, true);
        self.editing = Some(handle);
        true
    }

    /// Disable vertex editing. Returns whether a shape was being edited.
    pub fn stop_edit<S: Surface>(&mut self, surface: &mut S) -> bool {
        match self.editing.take() {
            Some(handle) => {
                surface.set_editing(handle, false);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Features rebuilt from the live shapes, in arena order.
    #[must_use]
    pub fn collection(&self) -> FeatureCollection {
        FeatureCollection::new(self.shapes.iter().map(LiveShape::to_feature).collect())
    }

    #[must_use]
    pub fn layer_id(&self) -> Option<&str> {
        self.layer_id.as_deref()
    }

    #[must_use]
    pub fn shapes(&self) -> &[LiveShape] {
        &self.shapes
    }

    #[must_use]
    pub fn shape(&self, index: usize) -> Option<&LiveShape> {
        self.shapes.get(index)
    }

    #[must_use]
    pub fn index_of(&self, handle: ShapeHandle) -> Option<usize> {
        self.shapes.iter().position(|s| s.handle == handle)
    }

    /// Position of the shape under vertex editing.
    #[must_use]
    pub fn editing_index(&self) -> Option<usize> {
        self.editing.and_then(|h| self.index_of(h))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
