#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Urban-planning zone registry and geospatial resolver.
//!
//! Zones are loaded once from a catalog (the embedded Bucharest seed file or
//! an uploaded-document extraction), normalized into [`Zone`] values and
//! kept in a [`registry::ZoneRegistry`]. The [`resolver::ZoneResolver`]
//! answers "which zone governs this parcel?" by point-in-polygon lookup,
//! falling back to an exact zone-name match.

pub mod catalog;
pub mod geojson_export;
pub mod polygon;
pub mod registry;
pub mod resolver;

pub use parcel_map_zoning_models::GeoPoint;
pub use polygon::GeoPolygon;

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while building or loading the zone catalog.
#[derive(Debug, Error)]
pub enum ZoningError {
    /// A zone with this name is already registered and strict registration
    /// was requested.
    #[error("Zone already registered: {name}")]
    DuplicateZone {
        /// The conflicting zone name.
        name: String,
    },

    /// A POT/CUT field could not be normalized into a usable number.
    #[error("Invalid {field} value for zone {zone}: {value:?}")]
    InvalidNumber {
        /// Zone the value belongs to.
        zone: String,
        /// Field name (`pot` or `cut`).
        field: &'static str,
        /// The raw value as it appeared in the catalog.
        value: String,
    },

    /// A zone boundary has too few vertices to form a polygon.
    #[error("Zone {zone} has {vertices} boundary vertices (at least 3 required)")]
    InvalidBoundary {
        /// Zone name.
        zone: String,
        /// Number of vertices found.
        vertices: usize,
    },

    /// The catalog JSON could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A municipal urban-planning zone.
///
/// Immutable once constructed. Registries never mutate a zone in place;
/// updating a zone means registering a replacement under the same name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    /// Unique zone name.
    pub name: String,
    /// Zone boundary.
    pub boundary: GeoPolygon,
    /// Land-use ratio as a percentage (0-100).
    pub pot: Option<f64>,
    /// Floor-area ratio.
    pub cut: Option<f64>,
    /// Free-text restriction notes.
    pub restrictions: Option<String>,
    /// Supporting document identifier (e.g. a PDF file name).
    pub document_ref: Option<String>,
}

impl Zone {
    /// Creates a zone with no regulations attached.
    #[must_use]
    pub fn new(name: impl Into<String>, boundary: GeoPolygon) -> Self {
        Self {
            name: name.into(),
            boundary,
            pot: None,
            cut: None,
            restrictions: None,
            document_ref: None,
        }
    }

    /// Sets the POT percentage.
    #[must_use]
    pub const fn with_pot(mut self, pot: f64) -> Self {
        self.pot = Some(pot);
        self
    }

    /// Sets the CUT ratio.
    #[must_use]
    pub const fn with_cut(mut self, cut: f64) -> Self {
        self.cut = Some(cut);
        self
    }

    /// Sets the restriction notes.
    #[must_use]
    pub fn with_restrictions(mut self, restrictions: impl Into<String>) -> Self {
        self.restrictions = Some(restrictions.into());
        self
    }

    /// Sets the supporting document reference.
    #[must_use]
    pub fn with_document_ref(mut self, document_ref: impl Into<String>) -> Self {
        self.document_ref = Some(document_ref.into());
        self
    }

    /// Whether the zone's boundary strictly contains `point`.
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        self.boundary.contains(point)
    }
}
