//! `GeoJSON` export of zone boundaries for map front ends.
//!
//! Each zone becomes a `Polygon` feature (x = longitude, y = latitude, per
//! RFC 7946) carrying its regulations as properties, which is what
//! the map popups display.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use crate::Zone;

/// Builds a `FeatureCollection` with one feature per zone, in iteration
/// order.
#[must_use]
pub fn to_feature_collection<'a>(zones: impl IntoIterator<Item = &'a Zone>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: zones.into_iter().map(zone_feature).collect(),
        foreign_members: None,
    }
}

fn zone_feature(zone: &Zone) -> Feature {
    let geometry = Geometry::new(Value::from(zone.boundary.as_geo()));

    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), zone.name.clone().into());
    properties.insert("pot".to_string(), zone.pot.into());
    properties.insert("cut".to_string(), zone.cut.into());
    properties.insert("restrictions".to_string(), zone.restrictions.clone().into());
    properties.insert("document".to_string(), zone.document_ref.clone().into());

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
