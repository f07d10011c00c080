#![allow(clippy::float_cmp)]

use geo::{Area, LineString, Point, polygon};

use super::*;
use crate::consts::{DEFAULT_LAYER_NAME, HIGHLIGHT_COLOR};
use crate::menu::MenuState;
use crate::surface::surface_test::RecordingSurface;

// =============================================================================
// Helpers
// =============================================================================

#[derive(Default)]
struct RecordingClipboard {
    writes: Vec<String>,
    fail: bool,
}

impl Clipboard for RecordingClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::Denied("no focus".into()));
        }
        self.writes.push(text.to_string());
        Ok(())
    }
}

fn square(x0: f64, y0: f64, size: f64) -> Geometry<f64> {
    Geometry::Polygon(polygon![(x: x0, y: y0), (x: x0 + size, y: y0), (x: x0 + size, y: y0 + size), (x: x0, y: y0 + size), (x: x0, y: y0)])
}

fn editor() -> Editor<RecordingSurface> {
    Editor::new(RecordingSurface::default(), EditorConfig::default())
}

fn layer(id: &str, geometries: Vec<Geometry<f64>>) -> Layer {
    let features = geometries.into_iter().map(|g| Feature::with_style(g, None, "#00aa00")).collect();
    Layer::with_id(id, id).with_features(FeatureCollection::new(features))
}

fn editor_with(layers: Vec<Layer>) -> Editor<RecordingSurface> {
    let mut ed = editor();
    ed.load_project(layers);
    ed
}

/// Draw through the surface, then deliver the creation event.
fn draw(ed: &mut Editor<RecordingSurface>, geometry: Geometry<f64>) -> (ShapeHandle, Vec<Action>) {
    let handle = ed.surface_mut().draw_shape(geometry.clone());
    let actions = ed.shape_created(handle, geometry);
    (handle, actions)
}

fn handle_at(ed: &Editor<RecordingSurface>, index: usize) -> ShapeHandle {
    ed.session().shapes()[index].handle
}

fn active_features(ed: &Editor<RecordingSurface>) -> &[Feature] {
    &ed.store().active_layer().unwrap().features.features
}

fn toasts(actions: &[Action]) -> Vec<&str> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::Toast(msg) => Some(msg.as_str()),
            _ => None,
        })
        .collect()
}

fn origin() -> ScreenPoint {
    ScreenPoint::new(0.0, 0.0)
}

fn assert_congruent(ed: &Editor<RecordingSurface>) {
    assert_eq!(ed.session().collection().features, active_features(ed));
    assert!(ed.selection().iter().all(|i| i < ed.session().len()));
}

// =============================================================================
// Project load and layers
// =============================================================================

#[test]
fn empty_project_gets_default_layer() {
    let mut ed = editor();
    let actions = ed.load_project(Vec::new());
    assert_eq!(actions[0], Action::LayersChanged);
    let active = ed.store().active_layer().unwrap();
    assert_eq!(active.id, DEFAULT_LAYER_ID);
    assert_eq!(active.name, DEFAULT_LAYER_NAME);
    assert!(active.features.is_empty());
}

#[test]
fn load_project_activates_first_layer_and_projects_it() {
    let ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 1.0), square(5.0, 5.0, 1.0)]), layer("b", vec![])]);
    assert_eq!(ed.store().active_layer_id(), Some("a"));
    assert_eq!(ed.session().len(), 2);
    assert_eq!(ed.surface().shapes.len(), 2);
    assert_congruent(&ed);
}

#[test]
fn add_layer_becomes_active_and_empty() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 1.0)])]);
    ed.toggle_selection(0, false);
    let actions = ed.add_layer("  Roads ");
    assert!(actions.contains(&Action::LayersChanged));
    let active = ed.store().active_layer().unwrap();
    assert_eq!(active.name, "Roads");
    assert!(ed.session().is_empty());
    assert!(ed.selection().is_empty());
    assert!(ed.surface().shapes.is_empty());
}

#[test]
fn blank_layer_name_is_ignored() {
    let mut ed = editor_with(vec![]);
    assert!(ed.add_layer("   ").is_empty());
    assert_eq!(ed.store().len(), 1);
}

#[test]
fn removing_active_layer_activates_first_remaining() {
    let mut ed = editor_with(vec![layer("a", vec![]), layer("b", vec![square(0.0, 0.0, 1.0)]), layer("c", vec![])]);
    ed.set_active_layer(Some("c"));
    ed.remove_layer("c");
    assert_eq!(ed.store().active_layer_id(), Some("a"));
    ed.remove_layer("a");
    assert_eq!(ed.store().active_layer_id(), Some("b"));
    assert_eq!(ed.session().len(), 1);
    ed.remove_layer("b");
    assert_eq!(ed.store().active_layer_id(), None);
    assert!(ed.surface().shapes.is_empty());
}

#[test]
fn removing_inactive_layer_keeps_selection() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 1.0)]), layer("b", vec![])]);
    ed.toggle_selection(0, false);
    ed.remove_layer("b");
    assert_eq!(ed.selection().to_vec(), vec![0]);
}

#[test]
fn rename_layer_updates_name() {
    let mut ed = editor_with(vec![layer("a", vec![])]);
    assert_eq!(ed.rename_layer("a", "Parcels"), vec![Action::LayersChanged]);
    assert_eq!(ed.store().layer("a").unwrap().name, "Parcels");
    assert!(ed.rename_layer("a", " ").is_empty());
    assert!(ed.rename_layer("zzz", "x").is_empty());
}

#[test]
fn switching_layer_clears_selection_and_rebuilds_shapes() {
    let mut ed = editor_with(vec![
        layer("a", vec![square(0.0, 0.0, 1.0), square(2.0, 0.0, 1.0)]),
        layer("b", vec![square(0.0, 0.0, 3.0), square(4.0, 0.0, 1.0), square(8.0, 0.0, 1.0)]),
    ]);
    ed.toggle_selection(0, true);
    ed.toggle_selection(1, true);
    let old_handles = ed.surface().handles();

    let actions = ed.set_active_layer(Some("b"));

    assert!(actions.contains(&Action::SelectionChanged(Vec::new())));
    assert!(ed.selection().is_empty());
    assert_eq!(ed.session().len(), 3);
    assert_eq!(ed.surface().shapes.len(), 3);
    assert!(old_handles.iter().all(|h| !ed.surface().shapes.contains_key(h)));
    assert_congruent(&ed);
}

#[test]
fn set_active_to_unknown_or_same_is_noop() {
    let mut ed = editor_with(vec![layer("a", vec![])]);
    assert!(ed.set_active_layer(Some("nope")).is_empty());
    assert!(ed.set_active_layer(Some("a")).is_empty());
    assert_eq!(ed.store().active_layer_id(), Some("a"));
}

#[test]
fn hiding_active_layer_suspends_session() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 1.0)])]);
    ed.toggle_selection(0, false);
    ed.toggle_layer_visibility("a");
    assert!(ed.session().is_empty());
    assert!(ed.selection().is_empty());
    assert!(ed.surface().shapes.is_empty());
    assert_eq!(ed.begin_draw(DrawKind::Polygon), vec![Action::Toast(MSG_NO_ACTIVE_LAYER.into())]);

    ed.toggle_layer_visibility("a");
    assert_eq!(ed.session().len(), 1);
}

#[test]
fn passive_layers_exclude_active_and_hidden() {
    let mut ed = editor_with(vec![layer("a", vec![]), layer("b", vec![]), layer("c", vec![])]);
    ed.set_layer_visible("c", false);
    let ids: Vec<&str> = ed.passive_layers().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["b"]);
}

// =============================================================================
// Drawing and surface events
// =============================================================================

#[test]
fn draw_then_delete_via_menu() {
    let mut ed = editor_with(vec![]);
    let (handle, actions) = draw(&mut ed, square(0.0, 0.0, 1.0));
    assert!(matches!(&actions[0], Action::LayerUpdated { layer_id, features } if layer_id == DEFAULT_LAYER_ID && features.len() == 1));
    assert_eq!(active_features(&ed).len(), 1);

    ed.open_context_menu(handle, origin());
    assert_eq!(ed.menu_items(), vec![MenuItem::CopyAsText, MenuItem::StartEdit, MenuItem::Delete]);
    let actions = ed.menu_delete();

    assert_eq!(active_features(&ed).len(), 0);
    assert!(matches!(&actions[0], Action::LayerUpdated { features, .. } if features.is_empty()));
    assert!(!ed.menu().is_open());
    assert!(ed.surface().shapes.is_empty());
}

#[test]
fn drawn_shape_gets_generated_color() {
    let mut ed = editor_with(vec![]);
    draw(&mut ed, square(0.0, 0.0, 1.0));
    let color = active_features(&ed)[0].props().color().unwrap();
    assert!(crate::color::parse_hex_rgb(color).is_some());
}

#[test]
fn duplicate_creation_event_is_ignored() {
    let mut ed = editor_with(vec![]);
    let (handle, _) = draw(&mut ed, square(0.0, 0.0, 1.0));
    assert!(ed.shape_created(handle, square(0.0, 0.0, 1.0)).is_empty());
    assert_eq!(active_features(&ed).len(), 1);
}

#[test]
fn session_write_back_keeps_live_shapes() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 1.0)])]);
    let before = ed.surface().handles();
    draw(&mut ed, square(5.0, 5.0, 1.0));
    assert!(before.iter().all(|h| ed.surface().shapes.contains_key(h)));
    assert!(ed.surface().removed.is_empty());
    assert_congruent(&ed);
}

#[test]
fn vertex_edit_writes_back_new_geometry() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 1.0)])]);
    let moved = square(1.0, 1.0, 2.0);
    let actions = ed.shape_edited(handle_at(&ed, 0), moved.clone());
    assert_eq!(actions.len(), 1);
    assert_eq!(active_features(&ed)[0].geometry, moved);
    assert_eq!(active_features(&ed)[0].props().color(), Some("#00aa00"));
}

#[test]
fn toolbar_delete_clears_selection_and_persists() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 1.0), square(2.0, 0.0, 1.0)])]);
    ed.toggle_selection(1, false);
    let doomed = handle_at(&ed, 0);
    ed.surface_mut().remove_shape(doomed);
    let actions = ed.shapes_deleted(&[doomed]);
    assert!(actions.contains(&Action::SelectionChanged(Vec::new())));
    assert_eq!(active_features(&ed).len(), 1);
    assert_congruent(&ed);
}

#[test]
fn requested_draw_dedupes_ids() {
    let mut ed = editor_with(vec![]);
    ed.request_draw(DrawRequest { kind: DrawKind::Point, id: 7 });
    ed.request_draw(DrawRequest { kind: DrawKind::Point, id: 7 });
    ed.request_draw(DrawRequest { kind: DrawKind::Point, id: 8 });
    assert_eq!(ed.surface().draws, vec![DrawKind::Point, DrawKind::Point]);
}

// =============================================================================
// Selection
// =============================================================================

#[test]
fn click_shape_toggles_and_highlights() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 1.0), square(2.0, 0.0, 1.0)])]);
    let second = handle_at(&ed, 1);
    let actions = ed.click_shape(second, false);
    assert_eq!(actions[0], Action::SelectionChanged(vec![1]));
    assert_eq!(ed.surface().style_of(second).color, HIGHLIGHT_COLOR);
    assert_eq!(ed.surface().style_of(handle_at(&ed, 0)).color, "#00aa00");

    ed.click_shape(second, false);
    assert!(ed.selection().is_empty());
    assert_eq!(ed.surface().style_of(second).color, "#00aa00");
}

#[test]
fn out_of_range_selection_is_ignored() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 1.0)])]);
    assert!(ed.toggle_selection(3, false).is_empty());
    assert!(ed.selection().is_empty());
}

#[test]
fn background_click_clears_selection_and_closes_menu() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 1.0)])]);
    ed.toggle_selection(0, false);
    ed.open_context_menu(handle_at(&ed, 0), origin());
    ed.click_background();
    assert!(ed.selection().is_empty());
    assert_eq!(ed.menu().state(), MenuState::Closed);
}

#[test]
fn background_click_keeps_selection_while_editing() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 1.0)])]);
    ed.toggle_selection(0, false);
    ed.open_context_menu(handle_at(&ed, 0), origin());
    ed.menu_toggle_edit();
    ed.click_background();
    assert_eq!(ed.selection().to_vec(), vec![0]);
}

// =============================================================================
// Context menu actions
// =============================================================================

#[test]
fn copy_as_text_writes_wkt_and_toasts() {
    let mut ed = editor_with(vec![layer("a", vec![Geometry::Point(Point::new(1.5, 2.0))])]);
    let mut clipboard = RecordingClipboard::default();
    ed.open_context_menu(handle_at(&ed, 0), ScreenPoint::new(40.0, 60.0));
    let actions = ed.menu_copy_as_text(&mut clipboard);
    assert_eq!(clipboard.writes, vec!["POINT(1.5 2)".to_string()]);
    assert_eq!(toasts(&actions), vec![MSG_COPIED]);
    assert!(!ed.menu().is_open());
}

#[test]
fn copy_failure_is_reported_not_raised() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 1.0)])]);
    let mut clipboard = RecordingClipboard { fail: true, ..RecordingClipboard::default() };
    ed.open_context_menu(handle_at(&ed, 0), origin());
    assert_eq!(toasts(&ed.menu_copy_as_text(&mut clipboard)), vec![MSG_COPY_FAILED]);
}

#[test]
fn copy_of_unserializable_geometry_is_reported() {
    let empty = Geometry::LineString(LineString::<f64>::new(vec![]));
    let mut ed = editor_with(vec![layer("a", vec![empty])]);
    let mut clipboard = RecordingClipboard::default();
    ed.open_context_menu(handle_at(&ed, 0), origin());
    assert_eq!(toasts(&ed.menu_copy_as_text(&mut clipboard)), vec![MSG_COPY_FAILED]);
    assert!(clipboard.writes.is_empty());
}

#[test]
fn edit_toggle_round_trip_persists() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 1.0)])]);
    let handle = handle_at(&ed, 0);
    ed.open_context_menu(handle, origin());
    ed.menu_toggle_edit();
    assert!(ed.surface().editing.contains(&handle));
    assert!(!ed.menu().is_open());

    ed.shape_edited(handle, square(0.0, 0.0, 2.0));
    ed.open_context_menu(handle, origin());
    assert!(ed.menu_items().contains(&MenuItem::StopEdit));
    let actions = ed.menu_toggle_edit();
    assert!(ed.surface().editing.is_empty());
    assert!(matches!(&actions[0], Action::LayerUpdated { .. }));
    assert_eq!(active_features(&ed)[0].geometry, square(0.0, 0.0, 2.0));
}

#[test]
fn escape_stops_edit_before_clearing_selection() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 1.0)])]);
    ed.toggle_selection(0, false);
    ed.open_context_menu(handle_at(&ed, 0), origin());
    ed.menu_toggle_edit();

    let actions = ed.key_escape();
    assert!(matches!(&actions[0], Action::LayerUpdated { .. }));
    assert!(ed.surface().editing.is_empty());
    assert_eq!(ed.selection().to_vec(), vec![0]);

    ed.key_escape();
    assert!(ed.selection().is_empty());
}

#[test]
fn subtract_overlapping_squares_leaves_l_shape() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 2.0), square(1.0, 1.0, 2.0)])]);
    ed.toggle_selection(0, true);
    ed.toggle_selection(1, true);
    ed.open_context_menu(handle_at(&ed, 0), origin());
    assert!(ed.menu_items().contains(&MenuItem::Subtract));

    let actions = ed.menu_subtract();

    assert_eq!(toasts(&actions), vec![MSG_SUBTRACT_DONE]);
    let features = active_features(&ed);
    assert_eq!(features.len(), 2);
    // Untouched clip first, remainder appended last.
    assert_eq!(features[0].geometry, square(1.0, 1.0, 2.0));
    assert!((features[1].geometry.unsigned_area() - 3.0).abs() < 1e-9);
    assert_eq!(features[1].props().color(), Some("#00aa00"));
    assert!(ed.selection().is_empty());
    assert_congruent(&ed);
}

#[test]
fn subtract_with_clip_removed_leaves_single_l_shape() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 2.0), square(1.0, 1.0, 2.0)])]);
    ed.toggle_selection(0, true);
    ed.toggle_selection(1, true);
    ed.open_context_menu(handle_at(&ed, 0), origin());
    ed.menu_subtract();
    ed.delete_feature(0);

    let features = active_features(&ed);
    assert_eq!(features.len(), 1);
    assert!((features[0].geometry.unsigned_area() - 3.0).abs() < 1e-9);
}

#[test]
fn subtract_fully_covered_subject_removes_it() {
    let mut ed = editor_with(vec![layer("a", vec![square(1.0, 1.0, 1.0), square(0.0, 0.0, 5.0)])]);
    ed.toggle_selection(0, true);
    ed.toggle_selection(1, true);
    ed.open_context_menu(handle_at(&ed, 0), origin());
    let actions = ed.menu_subtract();
    assert_eq!(toasts(&actions), vec![MSG_FULLY_REMOVED]);
    assert_eq!(active_features(&ed).len(), 1);
    assert_eq!(active_features(&ed)[0].geometry, square(0.0, 0.0, 5.0));
    assert!(ed.selection().is_empty());
}

#[test]
fn subtract_rejects_non_polygons_without_mutation() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 2.0), Geometry::Point(Point::new(1.0, 1.0))])]);
    ed.toggle_selection(0, true);
    ed.toggle_selection(1, true);
    let before = active_features(&ed).to_vec();
    ed.open_context_menu(handle_at(&ed, 0), origin());
    let actions = ed.menu_subtract();
    assert_eq!(toasts(&actions), vec![MSG_ONLY_POLYGONS]);
    assert_eq!(active_features(&ed), before.as_slice());
    assert_eq!(ed.selection().len(), 2);
}

#[test]
fn subtract_requires_target_in_pair() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 2.0), square(1.0, 1.0, 2.0), square(9.0, 9.0, 1.0)])]);
    ed.toggle_selection(0, true);
    ed.toggle_selection(1, true);
    ed.open_context_menu(handle_at(&ed, 2), origin());
    assert!(!ed.menu_items().contains(&MenuItem::Subtract));
    ed.menu_subtract();
    assert_eq!(active_features(&ed).len(), 3);
}

#[test]
fn menu_actions_without_open_menu_are_noops() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 1.0)])]);
    let mut clipboard = RecordingClipboard::default();
    assert!(ed.menu_delete().is_empty());
    assert!(ed.menu_subtract().is_empty());
    assert!(ed.menu_toggle_edit().is_empty());
    assert!(ed.menu_copy_as_text(&mut clipboard).is_empty());
    assert_eq!(active_features(&ed).len(), 1);
}

// =============================================================================
// Feature list, paste, import, export
// =============================================================================

#[test]
fn focus_feature_emits_and_flies() {
    let mut ed = editor_with(vec![layer("a", vec![square(2.0, 3.0, 1.0)])]);
    let actions = ed.focus_feature(0);
    assert!(matches!(&actions[0], Action::FocusFeature(f) if f.geometry == square(2.0, 3.0, 1.0)));
    let (bounds, options) = ed.surface().flights[0];
    assert_eq!(bounds.min().x, 2.0);
    assert_eq!(options, ed.config().fly_options());
    assert!(ed.focus_feature(9).is_empty());
}

#[test]
fn fly_to_ignores_empty_geometry() {
    let mut ed = editor();
    assert!(!ed.fly_to_geometry(&Geometry::LineString(LineString::<f64>::new(vec![]))));
    assert!(ed.fly_to_geometry(&Geometry::Point(Point::new(1.0, 1.0))));
    assert_eq!(ed.surface().flights.len(), 1);
}

#[test]
fn recolor_and_rename_rebuild_shapes() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 1.0)])]);
    ed.recolor_feature(0, "#FF0000");
    ed.rename_feature(0, "Lot 1");
    let feature = &active_features(&ed)[0];
    assert_eq!(feature.props().color(), Some("#ff0000"));
    assert_eq!(feature.display_name(0), "Lot 1");
    assert_eq!(ed.surface().style_of(handle_at(&ed, 0)).color, "#ff0000");
    assert_congruent(&ed);

    ed.rename_feature(0, "  ");
    assert_eq!(active_features(&ed)[0].display_name(0), "Object 1");
    assert_eq!(toasts(&ed.recolor_feature(0, "red")), vec![MSG_INVALID_COLOR]);
}

#[test]
fn recolor_keeps_selection_highlight() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 1.0)])]);
    ed.toggle_selection(0, false);
    ed.recolor_feature(0, "#00ff00");
    assert_eq!(ed.selection().to_vec(), vec![0]);
    assert_eq!(ed.surface().style_of(handle_at(&ed, 0)).color, HIGHLIGHT_COLOR);
}

#[test]
fn delete_feature_clears_selection() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 1.0), square(2.0, 0.0, 1.0)])]);
    ed.toggle_selection(1, false);
    ed.delete_feature(0);
    assert!(ed.selection().is_empty());
    assert_eq!(active_features(&ed).len(), 1);
    assert_congruent(&ed);
}

#[test]
fn paste_wkt_appends_and_flies() {
    let mut ed = editor_with(vec![]);
    let actions = ed.paste_wkt("  point (3 4) ");
    assert!(matches!(&actions[0], Action::LayerUpdated { features, .. } if features.len() == 1));
    assert_eq!(active_features(&ed)[0].geometry, Geometry::Point(Point::new(3.0, 4.0)));
    assert_eq!(ed.surface().flights.len(), 1);
    assert_eq!(toasts(&ed.paste_wkt("POINT (oops)")), vec![MSG_INVALID_WKT]);
    assert_eq!(active_features(&ed).len(), 1);
}

#[test]
fn paste_wkt_rejects_trailing_text_and_empty_geometry() {
    let mut ed = editor_with(vec![]);
    assert_eq!(toasts(&ed.paste_wkt("POINT(1 2) this is not wkt")), vec![MSG_INVALID_WKT]);
    assert_eq!(toasts(&ed.paste_wkt("POINT EMPTY")), vec![MSG_INVALID_WKT]);
    assert!(active_features(&ed).is_empty());
    assert!(ed.surface().flights.is_empty());
}

#[test]
fn import_creates_active_layer() {
    let mut ed = editor_with(vec![]);
    let text = "name,wkt\nA,\"POLYGON((0 0, 1 0, 1 1, 0 0))\"\nB,\"POLYGON((2 2, 3 2, 3 3, 2 2))\"\nC,\"POLYGON((\"\n";
    let (report, actions) = ed.import_text("lots.csv", text);
    assert_eq!((report.imported, report.skipped), (2, 1));
    assert!(actions.contains(&Action::LayersChanged));
    assert_eq!(ed.store().len(), 2);
    let active = ed.store().active_layer().unwrap();
    assert_eq!(active.name, "lots");
    assert_eq!(ed.session().len(), 2);
    assert_congruent(&ed);
}

#[test]
fn import_without_geometry_reports_and_keeps_state() {
    let mut ed = editor_with(vec![]);
    let (report, actions) = ed.import_text("empty.csv", "name\nfoo\n");
    assert_eq!(report.imported, 0);
    assert_eq!(toasts(&actions), vec![MSG_NO_GEOMETRIES]);
    assert_eq!(ed.store().len(), 1);
}

#[test]
fn export_layer_is_geojson() {
    let ed = editor_with(vec![layer("a", vec![Geometry::Point(Point::new(1.0, 2.0))])]);
    let text = ed.export_layer("a").unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["type"], "FeatureCollection");
    assert_eq!(value["features"][0]["geometry"]["type"], "Point");
    assert!(ed.export_layer("missing").is_none());
}

#[test]
fn stats_cover_visible_layers() {
    let mut ed = editor_with(vec![layer("a", vec![square(0.0, 0.0, 0.001)]), layer("b", vec![Geometry::Point(Point::new(0.0, 0.0))])]);
    assert_eq!(ed.stats().count, 2);
    ed.set_layer_visible("b", false);
    assert_eq!(ed.stats().count, 1);
    assert!(ed.stats().area_m2 > 0.0);
}
