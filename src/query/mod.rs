//! Filters over the documents of a segment.
//!
//! A query is bound to a segment to produce a [`MatchSet`]: a lazily evaluated
//! function telling whether a given `DocId` matches. The hosting engine drives the
//! traversal, either by calling [`MatchSet::matches`] directly, by iterating
//! with a [`MatchDocSet`], or by materializing the set with [`MatchSet::to_bitset`]
//! and iterating with a [`BitSetDocSet`].

mod bitset;
mod geo_polygon_query;
mod match_set;

pub use self::bitset::BitSetDocSet;
pub use self::geo_polygon_query::{GeoPolygonMatchSet, GeoPolygonQuery};
pub use self::match_set::{MatchDocSet, MatchSet};
