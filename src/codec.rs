//! Well-known-text codec.
//!
//! Converts between WKT text (`POINT`, `LINESTRING`, `POLYGON`, `MULTIPOINT`,
//! `MULTILINESTRING`, `MULTIPOLYGON`, coordinates as `lng lat`) and
//! [`geo::Geometry`]. Parsing is lenient about keyword case and surrounding
//! whitespace and never fails loudly: bad input yields `None` and a log line.
//! Serialization is strict and returns a tagged [`CodecError`].

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use geo::{CoordsIter, Geometry, LineString, Polygon};
use tracing::warn;
use wkt::{ToWkt, Wkt};

use crate::doc::Feature;
use crate::import::find_geometry_literal;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("unsupported geometry type: {0}")]
    Unsupported(&'static str),
    #[error("empty {0} cannot be written as WKT")]
    Empty(&'static str),
    #[error("non-finite coordinate in {0}")]
    NonFinite(&'static str),
}

/// Parse a WKT string into a geometry.
///
/// Returns `None` for malformed text, text trailing the geometry, `EMPTY`
/// geometries, and WKT types outside the supported six (e.g.
/// `GEOMETRYCOLLECTION`).
#[must_use]
pub fn parse(text: &str) -> Option<Geometry<f64>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        warn!("wkt parse: empty input");
        return None;
    }
    if find_geometry_literal(trimmed) != Some(trimmed) {
        warn!(text = trimmed, "wkt parse: not a single geometry literal");
        return None;
    }
    let normalized = uppercase_keyword(trimmed);
    let wkt: Wkt<f64> = match normalized.parse() {
        Ok(wkt) => wkt,
        Err(e) => {
            warn!(error = %e, "wkt parse: malformed text");
            return None;
        }
    };
    let geometry = match Geometry::<f64>::try_from(wkt) {
        Ok(geometry) => geometry,
        Err(e) => {
            warn!(error = ?e, "wkt parse: conversion failed");
            return None;
        }
    };
    if geometry.coords_count() == 0 {
        warn!(kind = type_name(&geometry), "wkt parse: empty geometry");
        return None;
    }
    match geometry {
        Geometry::Point(_)
        | Geometry::LineString(_)
        | Geometry::Polygon(_)
        | Geometry::MultiPoint(_)
        | Geometry::MultiLineString(_)
        | Geometry::MultiPolygon(_) => Some(geometry),
        other => {
            warn!(kind = type_name(&other), "wkt parse: unsupported geometry type");
            None
        }
    }
}

/// Serialize a geometry as WKT.
///
/// `Line`, `Rect`, and `Triangle` are written as their `LINESTRING`/`POLYGON`
/// equivalents.
///
/// # Errors
///
/// Returns `Unsupported` for geometry collections, `Empty` for geometries
/// with no coordinates, and `NonFinite` for NaN or infinite coordinates.
pub fn serialize(geometry: &Geometry<f64>) -> Result<String, CodecError> {
    let kind = type_name(geometry);
    let geometry = match geometry {
        Geometry::GeometryCollection(_) => return Err(CodecError::Unsupported(kind)),
        Geometry::Line(line) => Geometry::LineString(LineString::from(*line)),
        Geometry::Rect(rect) => Geometry::Polygon(rect.to_polygon()),
        Geometry::Triangle(triangle) => Geometry::Polygon(Polygon::from(*triangle)),
        other => other.clone(),
    };
    if geometry.coords_count() == 0 {
        return Err(CodecError::Empty(kind));
    }
    if geometry.coords_iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(CodecError::NonFinite(kind));
    }
    Ok(geometry.wkt_string())
}

/// Serialize a feature's geometry as WKT. Properties have no WKT form and are dropped.
///
/// # Errors
///
/// See [`serialize`].
pub fn serialize_feature(feature: &Feature) -> Result<String, CodecError> {
    serialize(&feature.geometry)
}

/// WKT type keyword for a geometry variant.
#[must_use]
pub fn type_name(geometry: &Geometry<f64>) -> &'static str {
    if geometry.coords_count() == 0 {
        warn!(kind = type_name(&geometry), "wkt parse: empty geometry");
        return None;
    }
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// Uppercase the leading type keyword so `polygon((...))` parses like `POLYGON((...))`.
fn uppercase_keyword(text: &str) -> String {
    let split = text.find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(text.len());
    let (keyword, rest) = text.split_at(split);
    format!("{}{rest}", keyword.to_ascii_uppercase())
}
