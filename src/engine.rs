use geo::Geometry;
use tracing::{debug, info, warn};

use crate::boolean::{self, SubtractError};
use crate::codec;
use crate::color::{generate_color, normalize_hex_color};
use crate::config::EditorConfig;
use crate::consts::{
    DEFAULT_LAYER_ID, MSG_COPIED, MSG_COPY_FAILED, MSG_FULLY_REMOVED, MSG_INVALID_COLOR, MSG_INVALID_WKT, MSG_NO_ACTIVE_LAYER, MSG_NO_GEOMETRIES,
    MSG_ONLY_POLYGONS, MSG_SUBTRACT_DONE, MSG_SUBTRACT_FAILED,
};
use crate::doc::{Feature, FeatureCollection, Layer, LayerId, LayerStore};
use crate::import::{self, ImportReport};
use crate::menu::{ContextMenu, MenuItem};
use crate::selection::Selection;
use crate::session::EditSession;
use crate::stats::{self, Stats};
use crate::surface::{DrawKind, DrawRequest, ScreenPoint, ShapeHandle, Surface, geometry_bounds};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from editor entry points for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A layer's feature collection was replaced; persist it.
    LayerUpdated { layer_id: LayerId, features: FeatureCollection },
    /// The layer list or the active layer changed; persist the layers.
    LayersChanged,
    /// Show a transient notification.
    Toast(String),
    /// The selection changed; carries the sorted indices.
    SelectionChanged(Vec<usize>),
    /// A feature was focused from the feature list.
    FocusFeature(Feature),
    RenderNeeded,
}

/// Write access to the system clipboard.
pub trait Clipboard {
    /// Replace the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClipboardError`] when the platform refuses the write.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable")]
    Unavailable,
    #[error("clipboard write denied: {0}")]
    Denied(String),
}

/// The map editor: layer store, active-layer session, selection, and
/// context menu, driving a rendering [`Surface`].
pub struct Editor<S: Surface> {
    store: LayerStore,
    session: EditSession,
    selection: Selection,
    menu: ContextMenu,
    surface: S,
    config: EditorConfig,
}

impl<S: Surface> Editor<S> {
    #[must_use]
    pub fn new(surface: S, config: EditorConfig) -> Self {
        Self { store: LayerStore::new(), session: EditSession::new(), selection: Selection::new(), menu: ContextMenu::new(), surface, config }
    }

    // =========================================================================
    // LAYERS
    // =========================================================================

    /// Replace all layers with a loaded project. An empty project gets one
    /// empty default layer. The first layer becomes active.
    pub fn load_project(&mut self, layers: Vec<Layer>) -> Vec<Action> {
        let layers = if layers.is_empty() { vec![Layer::with_id(DEFAULT_LAYER_ID, &self.config.default_layer_name)] } else { layers };
        info!(layers = layers.len(), "editor: project loaded");
        self.store = LayerStore::from_layers(layers);
        let mut actions = vec![Action::LayersChanged];
        actions.extend(self.reset_active());
        actions
    }

    /// Create an empty layer and make it active. Blank names are ignored.
    pub fn add_layer(&mut self, name: &str) -> Vec<Action> {
        let name = name.trim();
        if name.is_empty() {
            return Vec::new();
        }
        let layer = Layer::new(name);
        let id = layer.id.clone();
        self.store = self.store.add_layer(layer).set_active(Some(id.as_str()));
        let mut actions = vec![Action::LayersChanged];
        actions.extend(self.reset_active());
        actions
    }

    /// Delete a layer. Removing the active layer activates the first remaining one.
    pub fn remove_layer(&mut self, id: &str) -> Vec<Action> {
        if self.store.layer(id).is_none() {
            return Vec::new();
        }
        let was_active = self.store.active_layer_id() == Some(id);
        self.store = self.store.remove_layer(id);
        let mut actions = vec![Action::LayersChanged];
        if was_active {
            actions.extend(self.reset_active());
        }
        actions
    }

    /// Rename a layer. Blank names are ignored.
    pub fn rename_layer(&mut self, id: &str, name: &str) -> Vec<Action> {
        let name = name.trim();
        if name.is_empty() || self.store.layer(id).is_none() {
            return Vec::new();
        }
        self.store = self.store.rename_layer(id, name);
        vec![Action::LayersChanged]
    }

    /// Show or hide a layer. Hiding the active layer suspends editing.
    pub fn set_layer_visible(&mut self, id: &str, visible: bool) -> Vec<Action> {
        match self.store.layer(id) {
            Some(layer) if layer.visible != visible => {}
            _ => return Vec::new(),
        }
        self.store = self.store.set_visible(id, visible);
        let mut actions = vec![Action::LayersChanged];
        if self.store.active_layer_id() == Some(id) {
            actions.extend(self.reset_active());
        }
        actions
    }

    /// Flip a layer's visibility.
    pub fn toggle_layer_visibility(&mut self, id: &str) -> Vec<Action> {
        match self.store.layer(id).map(|l| l.visible) {
            Some(visible) => self.set_layer_visible(id, !visible),
            None => Vec::new(),
        }
    }

    /// Switch the active layer. Unknown ids and the current layer are no-ops.
    pub fn set_active_layer(&mut self, id: Option<&str>) -> Vec<Action> {
        if self.store.active_layer_id() == id {
            return Vec::new();
        }
        if id.is_some_and(|id| self.store.layer(id).is_none()) {
            warn!(layer_id = ?id, "set_active_layer: unknown layer");
            return Vec::new();
        }
        info!(layer_id = ?id, "editor: active layer changed");
        self.store = self.store.set_active(id);
        let mut actions = vec![Action::LayersChanged];
        actions.extend(self.reset_active());
        actions
    }

    /// GeoJSON text of a layer's features, for download.
    #[must_use]
    pub fn export_layer(&self, id: &str) -> Option<String> {
        let layer = self.store.layer(id)?;
        match serde_json::to_string(&layer.features) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(layer_id = %id, error = %e, "export_layer: serialization failed");
                None
            }
        }
    }

    /// Feature count and area over the visible layers.
    #[must_use]
    pub fn stats(&self) -> Stats {
        stats::stats(self.store.layers())
    }

    // =========================================================================
    // DRAWING AND SURFACE EVENTS
    // =========================================================================

    /// Toolbar-initiated draw.
    pub fn begin_draw(&mut self, kind: DrawKind) -> Vec<Action> {
        if self.session.begin_draw(&mut self.surface, kind) { Vec::new() } else { vec![toast(MSG_NO_ACTIVE_LAYER)] }
    }

    /// Host-requested draw; a repeated request id is ignored.
    pub fn request_draw(&mut self, request: DrawRequest) -> Vec<Action> {
        if self.session.layer_id().is_none() {
            return vec![toast(MSG_NO_ACTIVE_LAYER)];
        }
        self.session.begin_requested_draw(&mut self.surface, request);
        Vec::new()
    }

    /// The surface finished drawing a shape. The new feature gets a fresh color.
    pub fn shape_created(&mut self, handle: ShapeHandle, geometry: Geometry<f64>) -> Vec<Action> {
        let color = generate_color();
        if !self.session.shape_created(&mut self.surface, handle, geometry, &color, &self.config) {
            return Vec::new();
        }
        debug!(?handle, %color, "editor: shape created");
        self.write_back().into_iter().chain([Action::RenderNeeded]).collect()
    }

    /// The surface finished a vertex drag on a shape.
    pub fn shape_edited(&mut self, handle: ShapeHandle, geometry: Geometry<f64>) -> Vec<Action> {
        if !self.session.shape_edited(handle, geometry) {
            return Vec::new();
        }
        self.write_back().into_iter().collect()
    }

    /// The surface's own delete tool removed shapes.
    pub fn shapes_deleted(&mut self, handles: &[ShapeHandle]) -> Vec<Action> {
        if self.session.shapes_deleted(handles) == 0 {
            return Vec::new();
        }
        self.menu.close();
        let mut actions: Vec<Action> = self.write_back().into_iter().collect();
        actions.extend(self.clear_selection_forced());
        actions
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    /// Primary click on a live shape.
    pub fn click_shape(&mut self, handle: ShapeHandle, additive: bool) -> Vec<Action> {
        match self.session.index_of(handle) {
            Some(index) => self.toggle_selection(index, additive),
            None => Vec::new(),
        }
    }

    /// Toggle selection of the feature at `index` in the active layer.
    pub fn toggle_selection(&mut self, index: usize, additive: bool) -> Vec<Action> {
        if index >= self.session.len() {
            return Vec::new();
        }
        self.selection.toggle(index, additive);
        self.selection_changed()
    }

    /// Empty the selection.
    pub fn clear_selection(&mut self) -> Vec<Action> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        self.clear_selection_forced()
    }

    /// Click on empty map: closes the menu and, unless a shape is being
    /// edited, clears the selection.
    pub fn click_background(&mut self) -> Vec<Action> {
        let was_open = self.menu.is_open();
        self.menu.close();
        if self.session.editing_index().is_some() {
            return if was_open { vec![Action::RenderNeeded] } else { Vec::new() };
        }
        let actions = self.clear_selection();
        if actions.is_empty() && was_open { vec![Action::RenderNeeded] } else { actions }
    }

    /// Escape: closes the menu, then stops an active edit (persisting it) or
    /// clears the selection.
    pub fn key_escape(&mut self) -> Vec<Action> {
        self.menu.close();
        if self.session.stop_edit(&mut self.surface) {
            return self.write_back().into_iter().chain([Action::RenderNeeded]).collect();
        }
        self.clear_selection()
    }

    // =========================================================================
    // CONTEXT MENU
    // =========================================================================

    /// Secondary gesture on a live shape.
    pub fn open_context_menu(&mut self, handle: ShapeHandle, position: ScreenPoint) -> Vec<Action> {
        let Some(index) = self.session.index_of(handle) else {
            return Vec::new();
        };
        self.menu.open(index, position);
        vec![Action::RenderNeeded]
    }

    pub fn close_menu(&mut self) -> Vec<Action> {
        if !self.menu.is_open() {
            return Vec::new();
        }
        self.menu.close();
        vec![Action::RenderNeeded]
    }

    /// Entries of the open menu.
    #[must_use]
    pub fn menu_items(&self) -> Vec<MenuItem> {
        self.menu.items(&self.selection, self.session.editing_index())
    }

    /// Copy the target shape's geometry as WKT.
    pub fn menu_copy_as_text<C: Clipboard>(&mut self, clipboard: &mut C) -> Vec<Action> {
        let Some(shape) = self.menu.target().and_then(|i| self.session.shape(i)) else {
            return Vec::new();
        };
        let message = match codec::serialize(&shape.geometry) {
            Ok(text) => match clipboard.write_text(&text) {
                Ok(()) => MSG_COPIED,
                Err(e) => {
                    warn!(error = %e, "copy_as_text: clipboard write failed");
                    MSG_COPY_FAILED
                }
            },
            Err(e) => {
                warn!(error = %e, "copy_as_text: serialization failed");
                MSG_COPY_FAILED
            }
        };
        self.menu.close();
        vec![toast(message), Action::RenderNeeded]
    }

    /// Turn vertex editing on for the target, or off (persisting) when it is
    /// already being edited.
    pub fn menu_toggle_edit(&mut self) -> Vec<Action> {
        let Some(target) = self.menu.target() else {
            return Vec::new();
        };
        self.menu.close();
        if self.session.editing_index() == Some(target) {
            self.session.stop_edit(&mut self.surface);
            return self.write_back().into_iter().chain([Action::RenderNeeded]).collect();
        }
        self.session.begin_edit(&mut self.surface, target);
        vec![Action::RenderNeeded]
    }

    /// Delete the target shape.
    pub fn menu_delete(&mut self) -> Vec<Action> {
        let Some(target) = self.menu.target() else {
            return Vec::new();
        };
        self.menu.close();
        if self.session.remove(&mut self.surface, target).is_none() {
            return vec![Action::RenderNeeded];
        }
        let mut actions: Vec<Action> = self.write_back().into_iter().collect();
        actions.extend(self.clear_selection_forced());
        actions
    }

    /// Subtract the other selected shape from the target.
    pub fn menu_subtract(&mut self) -> Vec<Action> {
        let Some(target) = self.menu.target() else {
            return Vec::new();
        };
        self.menu.close();
        let Some(clip_index) = self.selection.partner_of(target) else {
            return vec![Action::RenderNeeded];
        };
        let (Some(subject), Some(clip)) = (self.session.shape(target), self.session.shape(clip_index)) else {
            return vec![Action::RenderNeeded];
        };

        let outcome = boolean::subtract_feature(&subject.to_feature(), &clip.to_feature());
        let (replacement, message) = match outcome {
            Ok(Some(feature)) => (Some(feature), MSG_SUBTRACT_DONE),
            Ok(None) => (None, MSG_FULLY_REMOVED),
            Err(SubtractError::NotPolygon(kind)) => {
                info!(kind, "subtract: rejected non-polygon operand");
                return vec![toast(MSG_ONLY_POLYGONS), Action::RenderNeeded];
            }
            Err(e @ SubtractError::Failed(_)) => {
                warn!(error = %e, "subtract: failed");
                return vec![toast(MSG_SUBTRACT_FAILED), Action::RenderNeeded];
            }
        };
        info!(subject = target, clip = clip_index, removed = replacement.is_none(), "subtract: applied");

        let mut features: Vec<Feature> =
            self.session.collection().features.into_iter().enumerate().filter(|(i, _)| *i != target).map(|(_, f)| f).collect();
        features.extend(replacement);
        self.selection.clear();
        let mut actions = self.replace_active(FeatureCollection::new(features));
        actions.push(Action::SelectionChanged(Vec::new()));
        actions.push(toast(message));
        actions
    }

    // =========================================================================
    // FEATURE LIST
    // =========================================================================

    /// Focus the feature at `index` of the active layer and fly to it.
    pub fn focus_feature(&mut self, index: usize) -> Vec<Action> {
        let Some(feature) = self.store.active_layer().and_then(|l| l.features.features.get(index)).cloned() else {
            return Vec::new();
        };
        self.fly_to_feature(&feature);
        vec![Action::FocusFeature(feature)]
    }

    /// Set the color of a feature in the active layer.
    pub fn recolor_feature(&mut self, index: usize, color: &str) -> Vec<Action> {
        let Some(color) = normalize_hex_color(color) else {
            return vec![toast(MSG_INVALID_COLOR)];
        };
        self.edit_active_feature(index, |f| {
            f.properties.insert("color".into(), serde_json::Value::String(color));
        })
    }

    /// Set (or, when blank, clear) the name of a feature in the active layer.
    pub fn rename_feature(&mut self, index: usize, name: &str) -> Vec<Action> {
        let name = name.trim().to_string();
        self.edit_active_feature(index, |f| {
            if name.is_empty() {
                f.properties.remove("name");
            } else {
                f.properties.insert("name".into(), serde_json::Value::String(name));
            }
        })
    }

    /// Remove a feature from the active layer.
    pub fn delete_feature(&mut self, index: usize) -> Vec<Action> {
        let Some(layer) = self.store.active_layer() else {
            return Vec::new();
        };
        if index >= layer.features.len() {
            return Vec::new();
        }
        let mut features = layer.features.features.clone();
        features.remove(index);
        self.selection.clear();
        let mut actions = self.replace_active(FeatureCollection::new(features));
        actions.push(Action::SelectionChanged(Vec::new()));
        actions
    }

    /// Append a feature parsed from pasted WKT to the active layer.
    pub fn paste_wkt(&mut self, text: &str) -> Vec<Action> {
        let Some(geometry) = codec::parse(text) else {
            return vec![toast(MSG_INVALID_WKT)];
        };
        let Some(layer) = self.store.active_layer().filter(|l| l.visible) else {
            return vec![toast(MSG_NO_ACTIVE_LAYER)];
        };
        let feature = Feature::with_style(geometry, None, &generate_color());
        let mut features = layer.features.features.clone();
        features.push(feature.clone());
        let actions = self.replace_active(FeatureCollection::new(features));
        self.fly_to_feature(&feature);
        actions
    }

    /// Import geometries from delimited text into a new active layer.
    pub fn import_text(&mut self, filename: &str, text: &str) -> (ImportReport, Vec<Action>) {
        let import = import::import_delimited(filename, text);
        let Some(layer) = import.layer else {
            return (import.report, vec![toast(MSG_NO_GEOMETRIES)]);
        };
        let id = layer.id.clone();
        self.store = self.store.add_layer(layer).set_active(Some(id.as_str()));
        let mut actions = vec![Action::LayersChanged];
        actions.extend(self.reset_active());
        actions.push(toast(&format!("Imported {} of {} features", import.report.imported, import.report.total)));
        (import.report, actions)
    }

    // =========================================================================
    // VIEWPORT
    // =========================================================================

    /// Fly to a geometry's bounds. Returns `false` when it has none.
    pub fn fly_to_geometry(&mut self, geometry: &Geometry<f64>) -> bool {
        let Some(bounds) = geometry_bounds(geometry) else {
            debug!("fly_to: no valid bounds, ignoring");
            return false;
        };
        self.surface.fly_to(bounds, self.config.fly_options());
        true
    }

    pub fn fly_to_feature(&mut self, feature: &Feature) -> bool {
        self.fly_to_geometry(&feature.geometry)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    #[must_use]
    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn menu(&self) -> &ContextMenu {
        &self.menu
    }

    #[must_use]
    pub fn session(&self) -> &EditSession {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Visible layers other than the active one, rendered read-only by the host.
    pub fn passive_layers(&self) -> impl Iterator<Item = &Layer> {
        let active = self.store.active_layer_id();
        self.store.layers().iter().filter(move |l| l.visible && Some(l.id.as_str()) != active)
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Rebuild for a changed active layer: no menu, no selection, fresh shapes.
    fn reset_active(&mut self) -> Vec<Action> {
        self.menu.close();
        self.selection.clear();
        self.session.project(&mut self.surface, self.store.active_layer(), &self.config);
        vec![Action::SelectionChanged(Vec::new()), Action::RenderNeeded]
    }

    /// Store the session's live shapes as the active layer's features.
    /// Live shapes are already current, so nothing is rebuilt.
    fn write_back(&mut self) -> Option<Action> {
        let layer_id = self.session.layer_id()?.to_string();
        let features = self.session.collection();
        self.store = self.store.replace_features(&layer_id, features.clone());
        Some(Action::LayerUpdated { layer_id, features })
    }

    /// Replace the active layer's features from outside the session and
    /// rebuild the live shapes from them.
    fn replace_active(&mut self, features: FeatureCollection) -> Vec<Action> {
        let Some(layer_id) = self.store.active_layer_id().map(str::to_string) else {
            return Vec::new();
        };
        self.store = self.store.replace_features(&layer_id, features.clone());
        self.menu.close();
        self.session.project(&mut self.surface, self.store.active_layer(), &self.config);
        self.selection.truncate(self.session.len());
        self.session.restyle(&mut self.surface, &self.selection, &self.config);
        vec![Action::LayerUpdated { layer_id, features }, Action::RenderNeeded]
    }

    fn edit_active_feature(&mut self, index: usize, edit: impl FnOnce(&mut Feature)) -> Vec<Action> {
        let Some(layer) = self.store.active_layer() else {
            return Vec::new();
        };
        let mut features = layer.features.features.clone();
        let Some(feature) = features.get_mut(index) else {
            return Vec::new();
        };
        edit(feature);
        self.replace_active(FeatureCollection::new(features))
    }

    fn clear_selection_forced(&mut self) -> Vec<Action> {
        self.selection.clear();
        self.selection_changed()
    }

    fn selection_changed(&mut self) -> Vec<Action> {
        self.session.restyle(&mut self.surface, &self.selection, &self.config);
        vec![Action::SelectionChanged(self.selection.to_vec()), Action::RenderNeeded]
    }
}

fn toast(message: &str) -> Action {
    Action::Toast(message.to_string())
}
