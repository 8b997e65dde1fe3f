//! Geographic points and polygon containment.

mod point;
mod polygon;

pub use self::point::GeoPoint;
pub use self::polygon::{point_in_polygon, GeoPolygon, MIN_NUM_VERTICES};
