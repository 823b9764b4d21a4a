//! Zone catalog ingestion.
//!
//! Converts raw [`ZoneRecord`]s into [`Zone`]s. POT/CUT values arrive as
//! numbers or as locale-formatted strings (`"65%"`, `"2,5"`) and are
//! normalized here, once, so nothing downstream has to re-parse them.
//! Arc segments are expanded into boundary vertices.

use parcel_map_zoning_models::{BoundarySegment, GeoPoint, NumericField, ZoneRecord};

use crate::polygon::{GeoPolygon, arc_vertices};
use crate::registry::{RegistrationMode, ZoneRegistry};
use crate::{Zone, ZoningError};

/// Embedded seed catalog of central Bucharest zones.
const SEED_CATALOG: &str = include_str!("../catalog/bucharest.json");

/// Number of zones in the embedded seed catalog. Enforced by a test.
#[cfg(test)]
const EXPECTED_SEED_ZONES: usize = 13;

/// Builds the registry from the embedded seed catalog.
///
/// # Panics
///
/// Panics if the embedded catalog fails to parse or normalize. It is a
/// compile-time constant, so a failure is a development error caught by
/// the tests.
#[must_use]
pub fn seed_registry() -> ZoneRegistry {
    load_catalog_json(SEED_CATALOG)
        .unwrap_or_else(|e| panic!("Failed to load embedded zone catalog: {e}"))
}

/// Parses a catalog JSON array and registers every zone in file order.
///
/// Later records with a name already seen replace the earlier ones.
///
/// # Errors
///
/// Returns [`ZoningError`] if the JSON is malformed or any record fails
/// normalization.
pub fn load_catalog_json(json: &str) -> Result<ZoneRegistry, ZoningError> {
    let records: Vec<ZoneRecord> = serde_json::from_str(json)?;
    registry_from_records(records)
}

/// Normalizes and registers the given records in order.
///
/// # Errors
///
/// Returns [`ZoningError`] if any record fails normalization.
pub fn registry_from_records(
    records: impl IntoIterator<Item = ZoneRecord>,
) -> Result<ZoneRegistry, ZoningError> {
    let mut registry = ZoneRegistry::new();

    for record in records {
        let zone = zone_from_record(record)?;
        registry.register(zone, RegistrationMode::Replace)?;
    }

    log::info!("Loaded {} zones into registry", registry.len());

    Ok(registry)
}

/// Normalizes a single catalog record into a [`Zone`].
///
/// # Errors
///
/// * [`ZoningError::InvalidNumber`] if POT is not a percentage in
///   `0..=100` or CUT is not a positive number
/// * [`ZoningError::InvalidBoundary`] if the boundary has fewer than three
///   vertices
pub fn zone_from_record(record: ZoneRecord) -> Result<Zone, ZoningError> {
    let name = record.zone.trim().to_string();

    let pot = normalize_field(&name, "pot", record.pot.as_ref())?;
    if let Some(value) = pot.filter(|v| !(0.0..=100.0).contains(v)) {
        return Err(invalid_number(&name, "pot", value.to_string()));
    }

    let cut = normalize_field(&name, "cut", record.cut.as_ref())?;
    if let Some(value) = cut.filter(|v| *v <= 0.0) {
        return Err(invalid_number(&name, "cut", value.to_string()));
    }

    let vertices = expand_boundary(&record.delimitare);
    if vertices.len() < 3 {
        return Err(ZoningError::InvalidBoundary {
            zone: name,
            vertices: vertices.len(),
        });
    }

    let boundary = GeoPolygon::new(vertices);
    if !boundary.encloses_area() {
        log::warn!("Zone '{name}' boundary encloses no area; it will never match a point");
    }

    Ok(Zone {
        name,
        boundary,
        pot,
        cut,
        restrictions: non_empty(record.obiectii),
        document_ref: non_empty(record.pdf),
    })
}

/// Parses a locale-formatted number.
///
/// Accepts an optional trailing `%`, a comma or dot decimal separator, and
/// dot thousands separators when a comma decimal is also present
/// (`"1.234,5"`). Returns `None` for anything else.
#[must_use]
pub fn parse_locale_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn normalize_field(
    zone: &str,
    field: &'static str,
    value: Option<&NumericField>,
) -> Result<Option<f64>, ZoningError> {
    match value {
        None => Ok(None),
        Some(NumericField::Number(n)) if n.is_finite() => Ok(Some(*n)),
        Some(NumericField::Number(n)) => Err(invalid_number(zone, field, n.to_string())),
        Some(NumericField::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(NumericField::Text(text)) => parse_locale_number(text)
            .map(Some)
            .ok_or_else(|| invalid_number(zone, field, text.clone())),
    }
}

fn expand_boundary(segments: &[BoundarySegment]) -> Vec<GeoPoint> {
    let mut vertices = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            BoundarySegment::Vertex(point) => vertices.push(*point),
            BoundarySegment::Arc { arc } => vertices.extend(arc_vertices(arc)),
        }
    }
    vertices
}

fn invalid_number(zone: &str, field: &'static str, value: String) -> ZoningError {
    ZoningError::InvalidNumber {
        zone: zone.to_string(),
        field,
        value,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
