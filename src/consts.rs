//! Shared constants for the editing engine.

// ── Styling ─────────────────────────────────────────────────────

/// Stroke/fill color for features that carry no `color` property.
pub const DEFAULT_FEATURE_COLOR: &str = "#3388ff";

/// Stroke color applied to selected live shapes.
pub const HIGHLIGHT_COLOR: &str = "#f59e0b";

/// Stroke weight of an unselected live shape, in pixels.
pub const NORMAL_WEIGHT: f64 = 2.0;

/// Stroke weight of a selected live shape, in pixels.
pub const SELECTED_WEIGHT: f64 = 4.0;

/// Dash pattern of a selected live shape.
pub const SELECTED_DASH: &str = "10, 10";

/// Fill opacity shared by every live shape.
pub const FILL_OPACITY: f64 = 0.2;

// ── Viewport ────────────────────────────────────────────────────

/// Padding around fly-to bounds, in screen pixels.
pub const FLY_PADDING_PX: f64 = 50.0;

/// Duration of the fly-to animation, in seconds.
pub const FLY_DURATION_SECS: f64 = 1.5;

// ── Layers ──────────────────────────────────────────────────────

/// Name of the layer created when a project loads with no layers.
pub const DEFAULT_LAYER_NAME: &str = "Base";

/// Id of the layer created when a project loads with no layers.
pub const DEFAULT_LAYER_ID: &str = "l1";

// ── Notifications ───────────────────────────────────────────────

pub const MSG_COPIED: &str = "WKT copied to clipboard";
pub const MSG_COPY_FAILED: &str = "Could not copy WKT";
pub const MSG_ONLY_POLYGONS: &str = "Only polygons can be subtracted";
pub const MSG_SUBTRACT_FAILED: &str = "Subtract failed";
pub const MSG_SUBTRACT_DONE: &str = "Subtract completed";
pub const MSG_FULLY_REMOVED: &str = "The shape was fully removed";
pub const MSG_INVALID_WKT: &str = "Invalid WKT";
pub const MSG_NO_GEOMETRIES: &str = "No valid WKT geometries found in the file";
pub const MSG_NO_ACTIVE_LAYER: &str = "Select a visible layer first";
pub const MSG_INVALID_COLOR: &str = "Invalid color";
