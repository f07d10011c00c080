//! Bulk import of geometries embedded in delimited text.
//!
//! Each non-blank line is scanned for the first geometry literal (a WKT
//! keyword followed by a balanced parenthesized coordinate body), which is
//! decoded with [`crate::codec::parse`]. Lines without a literal, or whose
//! literal fails to decode, are skipped and counted; one bad line never
//! aborts the file.
//!
//! An optional header line is recognized by column keywords. When it names
//! a label column, that column supplies feature names; otherwise features
//! are named `Imported N`.

#[cfg(test)]
#[path = "import_test.rs"]
mod import_test;

use std::path::Path;

use tracing::{debug, info};

use crate::codec;
use crate::color::generate_color;
use crate::doc::{Feature, FeatureCollection, Layer};

/// WKT keywords, longest first so `MULTIPOINT` wins over `POINT`.
const GEOMETRY_KEYWORDS: [&str; 6] = ["MULTIPOLYGON", "MULTILINESTRING", "MULTIPOINT", "POLYGON", "LINESTRING", "POINT"];

/// Header fragments marking a label column, in priority order.
const NAME_COLUMN_KEYWORDS: [&str; 6] = ["name", "nombre", "label", "etiqueta", "title", "titulo"];

/// Header fragments marking a geometry column.
const GEOMETRY_COLUMN_KEYWORDS: [&str; 3] = ["wkt", "geom", "shape"];

/// Counts from one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Lines decoded into features.
    pub imported: usize,
    /// Data lines with no decodable geometry.
    pub skipped: usize,
    /// Non-blank data lines seen (header excluded).
    pub total: usize,
}

/// Result of [`import_delimited`]. `layer` is `None` when nothing decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub layer: Option<Layer>,
    pub report: ImportReport,
}

/// Scan `text` and build a new layer named after `filename`.
#[must_use]
pub fn import_delimited(filename: &str, text: &str) -> Import {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty()).peekable();

    let name_column = match lines.peek() {
        Some(first) if is_header(first) => {
            let column = name_column(&split_fields(first));
            debug!(?column, "import: header detected");
            lines.next();
            column
        }
        _ => None,
    };

    let mut report = ImportReport::default();
    let mut features = Vec::new();
    for (line_no, line) in lines.enumerate() {
        report.total += 1;
        let Some((start, end)) = literal_span(line) else {
            debug!(line_no, "import: no geometry literal, skipping");
            report.skipped += 1;
            continue;
        };
        let Some(geometry) = line.get(start..end).and_then(codec::parse) else {
            debug!(line_no, "import: undecodable geometry, skipping");
            report.skipped += 1;
            continue;
        };
        let label = name_column.and_then(|i| label_field(line, (start, end), i));
        let name = label.unwrap_or_else(|| format!("Imported {}", features.len() + 1));
        features.push(Feature::with_style(geometry, Some(&name), &generate_color()));
    }
    report.imported = features.len();

    info!(filename, imported = report.imported, skipped = report.skipped, total = report.total, "import: finished");
    let layer = (!features.is_empty()).then(|| Layer::new(&layer_name_from_filename(filename)).with_features(FeatureCollection::new(features)));
    Import { layer, report }
}

/// Split one delimited line into trimmed fields.
///
/// Commas and semicolons both delimit outside double quotes. A doubled
/// quote (`""`) is a literal quote character.
#[must_use]
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' | ';' if !quoted => fields.push(std::mem::take(&mut field).trim().to_string()),
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}

/// First geometry literal in `line`, if any.
///
/// A literal is a WKT keyword (any case), optional whitespace, then a
/// balanced parenthesized body holding only digits, whitespace, and
/// `. , ( ) - + e E`.
#[must_use]
pub fn find_geometry_literal(line: &str) -> Option<&str> {
    let (start, end) = literal_span(line)?;
    line.get(start..end)
}

/// Byte range of the first geometry literal in `line`.
fn literal_span(line: &str) -> Option<(usize, usize)> {
    line.char_indices().find_map(|(start, _)| literal_end(line, start).map(|end| (start, end)))
}

fn literal_end(line: &str, start: usize) -> Option<usize> {
    let rest = line.get(start..)?;
    let keyword = GEOMETRY_KEYWORDS.iter().find(|kw| rest.get(..kw.len()).is_some_and(|head| head.eq_ignore_ascii_case(kw)))?;
    let body = rest.get(keyword.len()..)?;
    let coords = body.trim_start();
    if !coords.starts_with('(') {
        return None;
    }
    let open = body.len() - coords.len();

    let mut depth = 0usize;
    for (offset, c) in coords.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + keyword.len() + open + offset + 1);
                }
            }
            c if c.is_ascii_digit() || c.is_whitespace() || matches!(c, '.' | ',' | '-' | '+' | 'e' | 'E') => {}
            _ => return None,
        }
    }
    None
}

/// Field `column` of `line` with the geometry literal at `span` blanked out,
/// so commas inside unquoted coordinates do not shift the columns.
fn label_field(line: &str, span: (usize, usize), column: usize) -> Option<String> {
    let masked = format!("{} {}", line.get(..span.0)?, line.get(span.1..)?);
    split_fields(&masked).into_iter().nth(column).filter(|field| !field.is_empty())
}

fn is_header(line: &str) -> bool {
    if find_geometry_literal(line).is_some() {
        return false;
    }
    split_fields(line).iter().any(|field| {
        let field = field.to_lowercase();
        field == "id" || NAME_COLUMN_KEYWORDS.iter().chain(GEOMETRY_COLUMN_KEYWORDS.iter()).any(|kw| field.contains(kw))
    })
}

/// Index of the label column: the first name-like column, else a column named `id`.
fn name_column(headers: &[String]) -> Option<usize> {
    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    NAME_COLUMN_KEYWORDS
        .iter()
        .find_map(|kw| lowered.iter().position(|h| h.contains(kw)))
        .or_else(|| lowered.iter().position(|h| h == "id"))
}

/// Layer name for an imported file: the file stem, or `Imported` when empty.
#[must_use]
pub fn layer_name_from_filename(filename: &str) -> String {
    Path::new(filename.trim())
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.trim().is_empty())
        .map_or_else(|| "Imported".to_string(), str::to_string)
}
