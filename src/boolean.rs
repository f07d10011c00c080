//! Polygon difference.
//!
//! Both operands are re-oriented to the library's default winding (exterior
//! counter-clockwise, holes clockwise) before the boolean call. Only
//! `Polygon` and `MultiPolygon` are accepted. A subject entirely covered by
//! the clip yields [`Difference::Empty`], which callers treat as a successful
//! full removal rather than an error.

#[cfg(test)]
#[path = "boolean_test.rs"]
mod boolean_test;

use std::panic::{AssertUnwindSafe, catch_unwind};

use geo::orient::{Direction, Orient};
use geo::{Area, BooleanOps, CoordsIter, Geometry, MultiPolygon};
use tracing::{debug, warn};

use crate::codec::type_name;
use crate::doc::Feature;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubtractError {
    #[error("only polygons can be subtracted (got {0})")]
    NotPolygon(&'static str),
    #[error("boolean difference failed: {0}")]
    Failed(String),
}

/// Outcome of a successful subtract.
#[derive(Debug, Clone, PartialEq)]
pub enum Difference {
    /// The clip covers the whole subject.
    Empty,
    /// What is left of the subject. A single part is a `Polygon`; several
    /// parts are a `MultiPolygon`.
    Remainder(Geometry<f64>),
}

/// Compute `subject - clip`.
///
/// # Errors
///
/// `NotPolygon` when either operand is not a polygonal geometry, and
/// `Failed` when the coordinates are non-finite or the geometry library
/// panics on degenerate input.
pub fn subtract(subject: &Geometry<f64>, clip: &Geometry<f64>) -> Result<Difference, SubtractError> {
    let subject = as_oriented_multi(subject)?;
    let clip = as_oriented_multi(clip)?;

    let result = catch_unwind(AssertUnwindSafe(|| subject.difference(&clip)))
        .map_err(|payload| SubtractError::Failed(panic_message(payload.as_ref())))?;

    let mut parts: Vec<_> = result.into_iter().filter(|p| p.unsigned_area() > 0.0).collect();
    debug!(parts = parts.len(), "subtract: difference computed");
    if parts.len() > 1 {
        return Ok(Difference::Remainder(Geometry::MultiPolygon(MultiPolygon::new(parts))));
    }
    Ok(match parts.pop() {
        Some(polygon) => Difference::Remainder(Geometry::Polygon(polygon)),
        None => Difference::Empty,
    })
}

/// Subtract `clip` from `subject`, producing the replacement feature.
///
/// The replacement keeps all of the subject's properties. `Ok(None)` means
/// the subject was fully removed.
///
/// # Errors
///
/// See [`subtract`].
pub fn subtract_feature(subject: &Feature, clip: &Feature) -> Result<Option<Feature>, SubtractError> {
    match subtract(&subject.geometry, &clip.geometry)? {
        Difference::Empty => Ok(None),
        Difference::Remainder(geometry) => Ok(Some(Feature { geometry, properties: subject.properties.clone() })),
    }
}

fn as_oriented_multi(geometry: &Geometry<f64>) -> Result<MultiPolygon<f64>, SubtractError> {
    let multi = match geometry {
        Geometry::Polygon(p) => MultiPolygon::new(vec![p.clone()]),
        Geometry::MultiPolygon(mp) => mp.clone(),
        Geometry::Rect(r) => MultiPolygon::new(vec![r.to_polygon()]),
        other => {
            warn!(kind = type_name(other), "subtract: non-polygon operand");
            return Err(SubtractError::NotPolygon(type_name(other)));
        }
    };
    if multi.coords_iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(SubtractError::Failed("non-finite coordinate".into()));
    }
    Ok(multi.orient(Direction::Default))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "geometry library panicked".to_string()
    }
}
