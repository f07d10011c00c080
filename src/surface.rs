//! Rendering-surface capability.
//!
//! The map toolkit that owns imperative shape objects is abstracted behind
//! [`Surface`], so the editing logic never depends on a concrete renderer.
//! The host forwards toolkit events (shape created, vertices edited, shapes
//! deleted) to the [`crate::engine::Editor`] by [`ShapeHandle`].

#[cfg(test)]
#[path = "surface_test.rs"]
pub(crate) mod surface_test;

use geo::{BoundingRect, CoordsIter, Geometry, Rect};

use crate::color::feature_color_or;
use crate::consts::{FILL_OPACITY, NORMAL_WEIGHT, SELECTED_DASH, SELECTED_WEIGHT};

/// Opaque id of a live shape, assigned by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeHandle(pub u64);

/// Client-space position of a pointer gesture, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Kind of interactive drawing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    Polygon,
    Point,
    Line,
    Rectangle,
}

/// A request to enter drawing mode. Each request carries a distinct id so
/// repeated requests of the same kind still trigger a new draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRequest {
    pub kind: DrawKind,
    pub id: u64,
}

/// Stroke and fill of a live shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    pub color: String,
    pub fill_color: String,
    pub weight: f64,
    pub dash: Option<String>,
    pub fill_opacity: f64,
}

impl ShapeStyle {
    /// Style of an unselected shape: its own color (or `fallback`) at normal weight.
    #[must_use]
    pub fn normal(color: Option<&str>, fallback: &str) -> Self {
        let color = feature_color_or(color, fallback).to_string();
        Self { fill_color: color.clone(), color, weight: NORMAL_WEIGHT, dash: None, fill_opacity: FILL_OPACITY }
    }

    /// Style of a selected shape: heavier dashed stroke in the highlight color.
    #[must_use]
    pub fn selected(color: Option<&str>, fallback: &str, highlight: &str) -> Self {
        Self {
            color: highlight.to_string(),
            fill_color: feature_color_or(color, fallback).to_string(),
            weight: SELECTED_WEIGHT,
            dash: Some(SELECTED_DASH.to_string()),
            fill_opacity: FILL_OPACITY,
        }
    }
}

/// Animation options for [`Surface::fly_to`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyOptions {
    pub padding_px: f64,
    pub duration_secs: f64,
}

/// The imperative map surface holding the live shapes of the active layer.
pub trait Surface {
    /// Create a live shape for `geometry` and return its handle.
    fn add_shape(&mut self, geometry: &Geometry<f64>, style: &ShapeStyle) -> ShapeHandle;

    /// Destroy a live shape. Unknown handles are ignored.
    fn remove_shape(&mut self, handle: ShapeHandle);

    /// Restyle a live shape.
    fn set_style(&mut self, handle: ShapeHandle, style: &ShapeStyle);

    /// Turn vertex editing on or off for one shape.
    fn set_editing(&mut self, handle: ShapeHandle, enabled: bool);

    /// Enter an interactive drawing mode.
    fn begin_draw(&mut self, kind: DrawKind);

    /// Smoothly center and zoom the view on `bounds`.
    fn fly_to(&mut self, bounds: Rect<f64>, options: FlyOptions);
}

/// Bounding box of a geometry, when it has one with finite extent.
///
/// A single point yields a zero-size box, which is still flyable.
#[must_use]
pub fn geometry_bounds(geometry: &Geometry<f64>) -> Option<Rect<f64>> {
    if geometry.coords_iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return None;
    }
    geometry.bounding_rect()
}
