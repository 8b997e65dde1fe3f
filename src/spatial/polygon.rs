use std::fmt;

use crate::spatial::GeoPoint;
use crate::GeoFilterError;

/// Minimum number of vertices of a polygon ring.
pub const MIN_NUM_VERTICES: usize = 3;

/// A simple polygon, described by a single ring of vertices.
///
/// The ring is implicitly closed: the last vertex is connected back to the first one.
/// Neither the winding direction nor the simplicity of the ring are checked.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoPolygon {
    vertices: Box<[GeoPoint]>,
}

impl GeoPolygon {
    /// Creates a polygon from its ring of vertices.
    ///
    /// Returns an error if the ring has less than 3 vertices.
    pub fn new(vertices: Vec<GeoPoint>) -> crate::Result<GeoPolygon> {
        if vertices.len() < MIN_NUM_VERTICES {
            return Err(GeoFilterError::InvalidArgument(format!(
                "A polygon requires at least {MIN_NUM_VERTICES} vertices, got {}",
                vertices.len()
            )));
        }
        Ok(GeoPolygon {
            vertices: vertices.into_boxed_slice(),
        })
    }

    /// Returns the vertices of the ring.
    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    /// Returns the number of vertices of the ring.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if `(lat, lon)` is inside the polygon.
    ///
    /// See [`point_in_polygon`] for the handling of points located on the boundary.
    #[inline]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        point_in_polygon(&self.vertices, lat, lon)
    }

    /// Returns true if `point` is inside the polygon.
    #[inline]
    pub fn contains_point(&self, point: &GeoPoint) -> bool {
        self.contains(point.lat, point.lon)
    }
}

impl fmt::Display for GeoPolygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (ord, vertex) in self.vertices.iter().enumerate() {
            if ord > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{vertex}")?;
        }
        write!(f, "]")
    }
}

/// Even-odd point-in-polygon test.
///
/// A ray is cast from `(lat, lon)` along the line of constant longitude `lon`, towards
/// decreasing latitudes. Each edge of the ring crossed by that ray toggles the result.
///
/// An edge is considered only if exactly one of its endpoints has a longitude strictly lower
/// than `lon`, the other one being greater or equal. The two longitudes of such an edge always
/// differ, so edges of constant longitude are never counted as crossing and the interpolation
/// never divides by zero. No epsilon is involved, which yields the following deterministic
/// policy for points on the boundary:
/// - points on an edge or vertex bounding the polygon on its low latitude (resp. low longitude)
///   side are outside,
/// - points on an edge or vertex bounding the polygon on its high latitude (resp. high
///   longitude) side are inside.
///
/// `NaN` coordinates never cross any edge, and are therefore outside.
///
/// The cost is linear in the number of vertices. An empty ring contains nothing.
pub fn point_in_polygon(vertices: &[GeoPoint], lat: f64, lon: f64) -> bool {
    let Some(mut prev) = vertices.last() else {
        return false;
    };
    let mut inside = false;
    for vertex in vertices {
        if (vertex.lon < lon && prev.lon >= lon) || (prev.lon < lon && vertex.lon >= lon) {
            let crossing_lat =
                vertex.lat + (lon - vertex.lon) / (prev.lon - vertex.lon) * (prev.lat - vertex.lat);
            if crossing_lat < lat {
                inside = !inside;
            }
        }
        prev = vertex;
    }
    inside
}
