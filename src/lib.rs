#![warn(missing_docs)]
#![allow(clippy::len_without_is_empty)]

//! Geo polygon filtering over the documents of a segment.
//!
//! Given a polygon and the name of a geo point field, a [`GeoPolygonQuery`] binds to a
//! [`SegmentReader`] and produces a [`GeoPolygonMatchSet`]: a lazily evaluated function
//! telling, for every `DocId` of the segment, whether one of the document's geo points falls
//! inside the polygon.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use geo_polygon_filter::fastfield::{GeoFieldReaders, GeoPointColumnWriter};
//! use geo_polygon_filter::index::SegmentReader;
//! use geo_polygon_filter::query::MatchSet;
//! use geo_polygon_filter::{GeoPoint, GeoPolygonQuery};
//!
//! # fn main() -> geo_polygon_filter::Result<()> {
//! let mut writer = GeoPointColumnWriter::default();
//! writer.record(0, GeoPoint::new(5.0, 5.0));
//! writer.record(1, GeoPoint::new(15.0, 15.0));
//! let column = writer.finish(2)?;
//!
//! let mut geo_fields = GeoFieldReaders::default();
//! geo_fields.add_field("location", Arc::new(column));
//! let segment_reader = SegmentReader::new(2, geo_fields);
//!
//! let query = GeoPolygonQuery::new(
//!     "location",
//!     vec![
//!         GeoPoint::new(0.0, 0.0),
//!         GeoPoint::new(0.0, 10.0),
//!         GeoPoint::new(10.0, 10.0),
//!         GeoPoint::new(10.0, 0.0),
//!     ],
//! )?;
//! let match_set = query.match_set(&segment_reader)?;
//! assert!(match_set.matches(0)?);
//! assert!(!match_set.matches(1)?);
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;

pub mod common;
mod docset;
pub mod error;
pub mod fastfield;
pub mod index;
pub mod query;
pub mod spatial;

pub use crate::docset::{DocSet, TERMINATED};
pub use crate::error::GeoFilterError;
pub use crate::query::{GeoPolygonMatchSet, GeoPolygonQuery, MatchSet};
pub use crate::spatial::{GeoPoint, GeoPolygon};

/// Index of a document within a segment.
///
/// Valid ids for a segment range over `[0, max_doc)`.
pub type DocId = u32;

/// Result for the geo polygon filter.
pub type Result<T> = std::result::Result<T, GeoFilterError>;
