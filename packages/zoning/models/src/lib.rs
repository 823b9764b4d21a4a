#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Zone catalog record and coordinate types.
//!
//! Defines the JSON schema of the urban-planning zone catalog (as produced
//! by the static seed file or by an uploaded-document extraction) and the
//! plain coordinate type shared by polygons and property locations.

use serde::{Deserialize, Serialize};

/// A geographic coordinate.
///
/// Serialized as a `[lat, lon]` pair, the same shape the catalog uses for
/// polygon vertices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([latitude, longitude]: [f64; 2]) -> Self {
        Self::new(latitude, longitude)
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(point: GeoPoint) -> Self {
        [point.latitude, point.longitude]
    }
}

/// A numeric catalog field that may arrive as a number or as a
/// locale-formatted string (`"65%"`, `"2,5"`, `"1.8"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    /// Already numeric.
    Number(f64),
    /// Free-form text, normalized during catalog ingestion.
    Text(String),
}

/// A circular arc expanded into boundary vertices at ingestion time.
///
/// Angles are in radians; the arc is sampled `steps + 1` times from
/// `start_angle` to `end_angle` inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcSpec {
    /// Arc center.
    pub center: GeoPoint,
    /// Radius in decimal degrees.
    pub radius: f64,
    /// Starting angle in radians.
    pub start_angle: f64,
    /// Ending angle in radians.
    pub end_angle: f64,
    /// Number of sampling steps.
    pub steps: u32,
}

/// One element of a zone's `delimitare` boundary list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoundarySegment {
    /// A single `[lat, lon]` vertex.
    Vertex(GeoPoint),
    /// An arc that expands into several vertices.
    Arc {
        /// Arc parameters.
        arc: ArcSpec,
    },
}

/// A raw zone record as it appears in the catalog JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    /// Zone name (unique key).
    pub zone: String,
    /// Land-use ratio (POT) as a percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pot: Option<NumericField>,
    /// Floor-area ratio (CUT).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cut: Option<NumericField>,
    /// Free-text restriction notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obiectii: Option<String>,
    /// Boundary vertices, in order.
    pub delimitare: Vec<BoundarySegment>,
    /// Supporting document file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
}

/// Exact-match filter on a zone's regulations.
///
/// `None` fields match every zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneFilter {
    /// Required POT percentage.
    pub pot: Option<f64>,
    /// Required CUT ratio.
    pub cut: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_catalog_record() {
        let json = r#"{
            "zone": "Amzei",
            "pot": "65%",
            "cut": 2.5,
            "obiectii": "Suprafata ramasa libera trebuie sa fie de cel putin 50 mp.",
            "delimitare": [[44.1, 26.1], [44.2, 26.2], [44.3, 26.1]],
            "pdf": "amzei.pdf"
        }"#;

        let record: ZoneRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.zone, "Amzei");
        assert_eq!(record.pot, Some(NumericField::Text("65%".to_string())));
        assert_eq!(record.cut, Some(NumericField::Number(2.5)));
        assert_eq!(record.delimitare.len(), 3);
        assert_eq!(
            record.delimitare[0],
            BoundarySegment::Vertex(GeoPoint::new(44.1, 26.1))
        );
        assert_eq!(record.pdf.as_deref(), Some("amzei.pdf"));
    }

    #[test]
    fn optional_fields_default_to_none() {
        let json = r#"{"zone": "UCB", "delimitare": []}"#;
        let record: ZoneRecord = serde_json::from_str(json).unwrap();
        assert!(record.pot.is_none());
        assert!(record.cut.is_none());
        assert!(record.obiectii.is_none());
        assert!(record.pdf.is_none());
    }

    #[test]
    fn deserializes_arc_segment() {
        let json = r#"{"arc": {"center": [44.0, 26.0], "radius": 0.0001,
            "startAngle": 3.14, "endAngle": 6.28, "steps": 50}}"#;
        let segment: BoundarySegment = serde_json::from_str(json).unwrap();
        let BoundarySegment::Arc { arc } = segment else {
            panic!("expected arc segment");
        };
        assert_eq!(arc.center, GeoPoint::new(44.0, 26.0));
        assert_eq!(arc.steps, 50);
    }

    #[test]
    fn geo_point_serializes_as_pair() {
        let json = serde_json::to_string(&GeoPoint::new(44.5, 26.25)).unwrap();
        assert_eq!(json, "[44.5,26.25]");
    }
}
