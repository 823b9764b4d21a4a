//! Planar polygon containment for zone boundaries.
//!
//! Zone boundaries are a few hundred meters across, so latitude/longitude
//! are treated as planar coordinates (x = longitude, y = latitude) without
//! projection.

use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::{BoundingRect, Coord, LineString, Polygon, Rect};
use parcel_map_zoning_models::{ArcSpec, GeoPoint};
use serde::Serialize;

/// An immutable, implicitly closed polygon of geographic vertices.
///
/// Containment follows the even-odd rule. Points lying exactly on an edge
/// or vertex are never contained, and polygons whose vertices are all
/// coincident or collinear never contain anything.
#[derive(Debug, Clone, Serialize)]
#[serde(into = "Vec<GeoPoint>")]
pub struct GeoPolygon {
    vertices: Vec<GeoPoint>,
    polygon: Polygon<f64>,
    bounds: Option<Rect<f64>>,
    encloses_area: bool,
}

impl GeoPolygon {
    /// Builds a polygon from its vertices in traversal order.
    ///
    /// The ring is closed implicitly; a repeated first vertex at the end is
    /// accepted but not required.
    #[must_use]
    pub fn new(vertices: Vec<GeoPoint>) -> Self {
        let ring: LineString<f64> = vertices.iter().copied().map(to_coord).collect();
        let polygon = Polygon::new(ring, vec![]);
        let bounds = polygon.bounding_rect();
        let encloses_area = spans_plane(&vertices);

        Self {
            vertices,
            polygon,
            bounds,
            encloses_area,
        }
    }

    /// The vertices as supplied, in traversal order.
    #[must_use]
    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    /// The boundary as a [`geo::Polygon`] (x = longitude, y = latitude).
    #[must_use]
    pub const fn as_geo(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// Bounding box as `(south_west, north_east)` corners, or `None` for an
    /// empty polygon.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(GeoPoint, GeoPoint)> {
        self.bounds.map(|rect| {
            (
                GeoPoint::new(rect.min().y, rect.min().x),
                GeoPoint::new(rect.max().y, rect.max().x),
            )
        })
    }

    /// Whether the polygon encloses any area, i.e. its vertices are not all
    /// collinear.
    #[must_use]
    pub const fn encloses_area(&self) -> bool {
        self.encloses_area
    }

    /// Tests whether `point` lies strictly inside the polygon.
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        if !self.encloses_area {
            return false;
        }

        let coord = to_coord(point);

        let Some(bounds) = self.bounds else {
            return false;
        };
        if coord.x < bounds.min().x
            || coord.x > bounds.max().x
            || coord.y < bounds.min().y
            || coord.y > bounds.max().y
        {
            return false;
        }

        if self.polygon.coordinate_position(&coord) == CoordPos::OnBoundary {
            return false;
        }

        crosses_odd_times(self.polygon.exterior(), coord)
    }
}

impl From<GeoPolygon> for Vec<GeoPoint> {
    fn from(polygon: GeoPolygon) -> Self {
        polygon.vertices
    }
}

impl PartialEq for GeoPolygon {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
    }
}

/// Samples a circular arc into `steps + 1` vertices, start and end
/// inclusive.
///
/// Latitude advances with the cosine of the angle and longitude with the
/// sine, matching how the zone catalog describes rounded edges.
#[must_use]
pub fn arc_vertices(arc: &ArcSpec) -> Vec<GeoPoint> {
    if arc.steps == 0 {
        return vec![arc_point(arc, arc.start_angle)];
    }

    let step = (arc.end_angle - arc.start_angle) / f64::from(arc.steps);
    (0..=arc.steps)
        .map(|i| arc_point(arc, f64::from(i).mul_add(step, arc.start_angle)))
        .collect()
}

fn arc_point(arc: &ArcSpec, angle: f64) -> GeoPoint {
    GeoPoint::new(
        arc.radius.mul_add(angle.cos(), arc.center.latitude),
        arc.radius.mul_add(angle.sin(), arc.center.longitude),
    )
}

const fn to_coord(point: GeoPoint) -> Coord<f64> {
    Coord {
        x: point.longitude,
        y: point.latitude,
    }
}

/// Whether the vertices are not all coincident or collinear. Self-crossing
/// rings whose signed lobes cancel out still span the plane.
fn spans_plane(vertices: &[GeoPoint]) -> bool {
    let Some(&origin) = vertices.first() else {
        return false;
    };
    let Some(&direction) = vertices.iter().find(|v| **v != origin) else {
        return false;
    };

    let (dx, dy) = (
        direction.longitude - origin.longitude,
        direction.latitude - origin.latitude,
    );
    vertices.iter().any(|v| {
        let cross = dx.mul_add(
            v.latitude - origin.latitude,
            -(dy * (v.longitude - origin.longitude)),
        );
        cross != 0.0
    })
}

/// Even-odd crossing test: casts a ray from `coord` towards +x and counts
/// the ring edges it crosses. Edges are treated as half-open in y so a ray
/// through a vertex is counted exactly once.
fn crosses_odd_times(ring: &LineString<f64>, coord: Coord<f64>) -> bool {
    let mut inside = false;

    for line in ring.lines() {
        let (a, b) = (line.start, line.end);
        if (a.y > coord.y) != (b.y > coord.y) {
            let x_at_y = (b.x - a.x) * (coord.y - a.y) / (b.y - a.y) + a.x;
            if coord.x < x_at_y {
                inside = !inside;
            }
        }
    }

    inside
}
