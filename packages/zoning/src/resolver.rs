//! Resolves a parcel to the zone that governs it.
//!
//! Point queries go through an R-tree of zone bounding boxes, then an exact
//! polygon test. Zones in the source catalog are not supposed to overlap,
//! but nothing enforces it, so when several polygons contain the point the
//! zone registered first wins.

use rstar::{AABB, RTree, RTreeObject};

use crate::registry::ZoneRegistry;
use crate::{GeoPoint, Zone};

/// What to resolve: a location, or a zone name typed by the operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneQuery<'a> {
    /// Resolve by polygon containment.
    Point(GeoPoint),
    /// Resolve by exact, case-sensitive zone name.
    Name(&'a str),
}

impl From<GeoPoint> for ZoneQuery<'_> {
    fn from(point: GeoPoint) -> Self {
        Self::Point(point)
    }
}

impl<'a> From<&'a str> for ZoneQuery<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

/// A zone's bounding box in the R-tree, pointing back at its registration
/// slot.
struct ZoneEnvelope {
    slot: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for ZoneEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Read-only resolver over a frozen [`ZoneRegistry`].
///
/// Built once after the catalog is loaded and shared across callers.
pub struct ZoneResolver {
    registry: ZoneRegistry,
    index: RTree<ZoneEnvelope>,
}

impl ZoneResolver {
    /// Freezes `registry` and builds the spatial index over its zones.
    #[must_use]
    pub fn new(registry: ZoneRegistry) -> Self {
        let entries: Vec<ZoneEnvelope> = registry
            .all()
            .enumerate()
            .filter_map(|(slot, zone)| {
                zone.boundary
                    .bounding_box()
                    .map(|(south_west, north_east)| ZoneEnvelope {
                        slot,
                        envelope: AABB::from_corners(
                            [south_west.longitude, south_west.latitude],
                            [north_east.longitude, north_east.latitude],
                        ),
                    })
            })
            .collect();

        log::info!("Built zone spatial index over {} zones", entries.len());

        Self {
            registry,
            index: RTree::bulk_load(entries),
        }
    }

    /// The underlying registry.
    #[must_use]
    pub const fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    /// Resolves a query to at most one zone.
    ///
    /// `None` means no zone governs the parcel, which callers handle by
    /// keeping their own POT/CUT defaults.
    #[must_use]
    pub fn resolve<'q>(&self, query: impl Into<ZoneQuery<'q>>) -> Option<&Zone> {
        match query.into() {
            ZoneQuery::Point(point) => self.resolve_point(point),
            ZoneQuery::Name(name) => self.registry.by_name(name),
        }
    }

    /// Resolves by location, falling back to the caller's zone-name hint
    /// when no polygon contains the point.
    #[must_use]
    pub fn resolve_with_hint(&self, point: GeoPoint, hint: Option<&str>) -> Option<&Zone> {
        self.resolve_point(point).or_else(|| {
            let hint = hint?;
            log::debug!(
                "No zone contains ({}, {}); trying name hint '{hint}'",
                point.latitude,
                point.longitude
            );
            self.registry.by_name(hint)
        })
    }

    fn resolve_point(&self, point: GeoPoint) -> Option<&Zone> {
        let query_env = AABB::from_point([point.longitude, point.latitude]);

        let slot = self
            .index
            .locate_in_envelope_intersecting(&query_env)
            .filter(|entry| {
                self.registry
                    .at(entry.slot)
                    .is_some_and(|zone| zone.contains(point))
            })
            .map(|entry| entry.slot)
            .min()?;

        self.registry.at(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeoPolygon;
    use crate::catalog::seed_registry;
    use crate::registry::RegistrationMode;

    fn square(name: &str, lat: f64, lon: f64, size: f64) -> Zone {
        Zone::new(
            name,
            GeoPolygon::new(vec![
                GeoPoint::new(lat, lon),
                GeoPoint::new(lat, lon + size),
                GeoPoint::new(lat + size, lon + size),
                GeoPoint::new(lat + size, lon),
            ]),
        )
    }

    #[test]
    fn resolves_amzei_by_location() {
        let resolver = ZoneResolver::new(seed_registry());
        let zone = resolver.resolve(GeoPoint::new(44.4432, 26.0959)).unwrap();
        assert_eq!(zone.name, "Amzei");
        assert_eq!(zone.pot, Some(65.0));
        assert_eq!(zone.cut, Some(2.5));
    }

    #[test]
    fn resolves_other_seed_zones_by_location() {
        let resolver = ZoneResolver::new(seed_registry());
        let cases = [
            ((44.4545, 26.0954), "Tesatoria"),
            ((44.4570, 26.0875), "Filipescu"),
            ((44.4700, 26.0890), "UCB"),
            ((44.4540, 26.0880), "Blanc"),
        ];
        for ((lat, lon), expected) in cases {
            let zone = resolver.resolve(GeoPoint::new(lat, lon)).unwrap();
            assert_eq!(zone.name, expected);
        }
    }

    #[test]
    fn point_outside_every_zone_resolves_to_none() {
        let resolver = ZoneResolver::new(seed_registry());
        assert!(resolver.resolve(GeoPoint::new(44.40, 26.00)).is_none());
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        let resolver = ZoneResolver::new(seed_registry());
        assert!(resolver.resolve("Herastrau").is_none());
        assert_eq!(resolver.resolve("Monnet").unwrap().name, "Monnet");
    }

    #[test]
    fn overlapping_zones_resolve_to_first_registered() {
        let mut registry = ZoneRegistry::new();
        registry
            .register(square("Outer", 0.0, 0.0, 10.0), RegistrationMode::Strict)
            .unwrap();
        registry
            .register(square("Inner", 2.0, 2.0, 2.0), RegistrationMode::Strict)
            .unwrap();
        let resolver = ZoneResolver::new(registry);

        assert_eq!(resolver.resolve(GeoPoint::new(3.0, 3.0)).unwrap().name, "Outer");
        assert_eq!(resolver.resolve(GeoPoint::new(8.0, 8.0)).unwrap().name, "Outer");
    }

    #[test]
    fn replaced_zone_keeps_priority() {
        let mut registry = ZoneRegistry::new();
        registry
            .register(square("A", 0.0, 0.0, 10.0), RegistrationMode::Strict)
            .unwrap();
        registry
            .register(square("B", 0.0, 0.0, 10.0), RegistrationMode::Strict)
            .unwrap();
        registry
            .register(
                square("A", 0.0, 0.0, 10.0).with_pot(30.0),
                RegistrationMode::Replace,
            )
            .unwrap();
        let resolver = ZoneResolver::new(registry);

        let zone = resolver.resolve(GeoPoint::new(5.0, 5.0)).unwrap();
        assert_eq!(zone.name, "A");
        assert_eq!(zone.pot, Some(30.0));
    }

    #[test]
    fn resolution_is_deterministic() {
        let resolver = ZoneResolver::new(seed_registry());
        let point = GeoPoint::new(44.4545, 26.0954);
        let first = resolver.resolve(point).map(|z| z.name.clone());
        for _ in 0..10 {
            assert_eq!(resolver.resolve(point).map(|z| z.name.clone()), first);
        }
    }

    #[test]
    fn hint_is_used_only_when_no_polygon_matches() {
        let resolver = ZoneResolver::new(seed_registry());

        let zone = resolver
            .resolve_with_hint(GeoPoint::new(44.4432, 26.0959), Some("Monnet"))
            .unwrap();
        assert_eq!(zone.name, "Amzei");

        let zone = resolver
            .resolve_with_hint(GeoPoint::new(44.40, 26.00), Some("Monnet"))
            .unwrap();
        assert_eq!(zone.name, "Monnet");

        assert!(
            resolver
                .resolve_with_hint(GeoPoint::new(44.40, 26.00), None)
                .is_none()
        );
        assert!(
            resolver
                .resolve_with_hint(GeoPoint::new(44.40, 26.00), Some("Nowhere"))
                .is_none()
        );
    }
}
