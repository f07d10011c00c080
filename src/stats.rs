//! Project statistics: feature count and geodesic area.

#[cfg(test)]
#[path = "stats_test.rs"]
mod stats_test;

use geo::{ChamberlainDuquetteArea, Geometry};

use crate::doc::Layer;

const SQUARE_METRES_PER_HECTARE: f64 = 10_000.0;

/// Totals over the visible layers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stats {
    /// Single-part features; multi-geometries count once per part.
    pub count: usize,
    /// Summed geodesic area of polygonal parts, in square metres.
    pub area_m2: f64,
}

impl Stats {
    /// Area for display: hectares above one hectare, square metres otherwise.
    #[must_use]
    pub fn area_label(&self) -> String {
        if self.area_m2 > SQUARE_METRES_PER_HECTARE {
            format!("{:.2} ha", self.area_m2 / SQUARE_METRES_PER_HECTARE)
        } else {
            format!("{:.0} m²", self.area_m2)
        }
    }
}

/// Count parts and sum area across every visible layer. Hidden layers are ignored.
#[must_use]
pub fn stats(layers: &[Layer]) -> Stats {
    layers
        .iter()
        .filter(|l| l.visible)
        .flat_map(|l| l.features.features.iter())
        .fold(Stats::default(), |acc, feature| Stats {
            count: acc.count + part_count(&feature.geometry),
            area_m2: acc.area_m2 + geodesic_area(&feature.geometry),
        })
}

fn part_count(geometry: &Geometry<f64>) -> usize {
    match geometry {
        Geometry::MultiPoint(mp) => mp.0.len(),
        Geometry::MultiLineString(ml) => ml.0.len(),
        Geometry::MultiPolygon(mp) => mp.0.len(),
        Geometry::GeometryCollection(gc) => gc.0.iter().map(part_count).sum(),
        _ => 1,
    }
}

fn geodesic_area(geometry: &Geometry<f64>) -> f64 {
    match geometry {
        Geometry::Polygon(p) => p.chamberlain_duquette_unsigned_area(),
        Geometry::MultiPolygon(mp) => mp.chamberlain_duquette_unsigned_area(),
        Geometry::Rect(r) => r.to_polygon().chamberlain_duquette_unsigned_area(),
        Geometry::Triangle(t) => t.to_polygon().chamberlain_duquette_unsigned_area(),
        Geometry::GeometryCollection(gc) => gc.0.iter().map(geodesic_area).sum(),
        _ => 0.0,
    }
}
