use std::fmt;
use std::sync::Arc;

use crate::common::BitSet;
use crate::error::DataCorruption;
use crate::fastfield::{AliveBitSet, GeoPointValues};
use crate::index::SegmentReader;
use crate::query::MatchSet;
use crate::spatial::{GeoPoint, GeoPolygon};
use crate::{DocId, GeoFilterError};

/// Matches documents having at least one geo point, in the given field, located
/// inside a polygon.
///
/// The polygon is a single ring of at least 3 vertices, implicitly closed.
/// Its winding direction does not matter. See [`point_in_polygon`](crate::spatial::point_in_polygon)
/// for the handling of points located exactly on the polygon's boundary.
///
/// The query itself is just a configuration. It is bound to a segment with
/// [`GeoPolygonQuery::match_set`].
#[derive(Clone, Debug)]
pub struct GeoPolygonQuery {
    field_name: String,
    polygon: Arc<GeoPolygon>,
}

impl GeoPolygonQuery {
    /// Creates a new `GeoPolygonQuery` over the geo points of `field_name`.
    ///
    /// Returns an error if the field name is empty, or if the polygon has less than 3 vertices.
    pub fn new(
        field_name: impl Into<String>,
        points: Vec<GeoPoint>,
    ) -> crate::Result<GeoPolygonQuery> {
        let field_name = field_name.into();
        check_field_name(&field_name)?;
        let polygon = GeoPolygon::new(points)?;
        Ok(GeoPolygonQuery {
            field_name,
            polygon: Arc::new(polygon),
        })
    }

    /// Name of the geo field the query applies to.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Vertices of the polygon.
    pub fn points(&self) -> &[GeoPoint] {
        self.polygon.vertices()
    }

    /// The polygon documents are matched against.
    pub fn polygon(&self) -> &GeoPolygon {
        &self.polygon
    }

    /// Binds the query to a segment.
    ///
    /// The resulting match set reads the geo points of the query's field, and
    /// excludes the documents deleted in the segment.
    pub fn match_set(&self, segment_reader: &SegmentReader) -> crate::Result<GeoPolygonMatchSet> {
        let max_doc = segment_reader.max_doc();
        let geo_points = segment_reader.geo_fields().geo_points(&self.field_name)?;
        let alive_bitset_opt = segment_reader.alive_bitset().cloned();
        debug!(
            "binding geo polygon on `{}` ({} vertices) to segment (max_doc={}, has_deletes={})",
            self.field_name,
            self.polygon.num_vertices(),
            max_doc,
            alive_bitset_opt.is_some()
        );
        GeoPolygonMatchSet::new(
            self.polygon.clone(),
            self.field_name.clone(),
            geo_points,
            max_doc,
            alive_bitset_opt,
        )
    }
}

impl fmt::Display for GeoPolygonQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeoPolygonQuery({}, {})", self.field_name, self.polygon)
    }
}

fn check_field_name(field_name: &str) -> crate::Result<()> {
    if field_name.is_empty() {
        return Err(GeoFilterError::InvalidArgument(
            "The field name of a geo polygon query cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Checks that the geo points cover every document of `[0, max_doc)`.
fn check_geo_points_cover(
    field_name: &str,
    geo_points: &dyn GeoPointValues,
    max_doc: DocId,
) -> crate::Result<()> {
    let num_docs = geo_points.num_docs();
    if num_docs < max_doc {
        warn!("geo field `{field_name}` covers {num_docs} docs, while the segment has {max_doc} docs");
        return Err(GeoFilterError::SchemaError(format!(
            "Geo field `{field_name}` covers {num_docs} documents, expected {max_doc}"
        )));
    }
    Ok(())
}

/// Documents of a segment having a geo point inside a polygon.
///
/// A document matches iff:
/// - it is alive (if the segment has an alive bitset),
/// - it has at least one geo point in the field,
/// - and one of its geo points is inside the polygon.
///
/// The match set only depends on the polygon and on the segment's immutable geo points,
/// and is therefore cacheable.
pub struct GeoPolygonMatchSet {
    field_name: String,
    polygon: Arc<GeoPolygon>,
    geo_points: Arc<dyn GeoPointValues>,
    max_doc: DocId,
    alive_bitset_opt: Option<AliveBitSet>,
}

impl GeoPolygonMatchSet {
    /// Creates a match set for the documents `[0, max_doc)`.
    ///
    /// Documents that are not alive in `alive_bitset_opt` never match. If no alive bitset
    /// is given, all documents are considered.
    ///
    /// Returns an error if the field name is empty, or if `geo_points` covers less than
    /// `max_doc` documents.
    pub fn new(
        polygon: Arc<GeoPolygon>,
        field_name: impl Into<String>,
        geo_points: Arc<dyn GeoPointValues>,
        max_doc: DocId,
        alive_bitset_opt: Option<AliveBitSet>,
    ) -> crate::Result<GeoPolygonMatchSet> {
        let field_name = field_name.into();
        check_field_name(&field_name)?;
        check_geo_points_cover(&field_name, geo_points.as_ref(), max_doc)?;
        Ok(GeoPolygonMatchSet {
            field_name,
            polygon,
            geo_points,
            max_doc,
            alive_bitset_opt,
        })
    }

    /// Name of the geo field.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// The polygon documents are matched against.
    pub fn polygon(&self) -> &GeoPolygon {
        &self.polygon
    }

    /// Same as [`MatchSet::matches`], using `buffer` to read the values of
    /// multivalued documents.
    pub fn matches_with_buffer(
        &self,
        doc: DocId,
        buffer: &mut Vec<GeoPoint>,
    ) -> crate::Result<bool> {
        if doc >= self.max_doc {
            return Err(GeoFilterError::InvalidArgument(format!(
                "Doc {doc} is out of range, max_doc is {}",
                self.max_doc
            )));
        }
        if let Some(alive_bitset) = &self.alive_bitset_opt {
            if alive_bitset.is_deleted(doc) {
                return Ok(false);
            }
        }
        self.match_doc(doc, buffer)
            .map_err(|err| self.attach_field(err))
    }

    fn match_doc(&self, doc: DocId, buffer: &mut Vec<GeoPoint>) -> crate::Result<bool> {
        if !self.geo_points.has_value(doc) {
            return Ok(false);
        }
        if self.geo_points.is_multivalued() {
            self.geo_points.values_for_doc(doc, buffer)?;
            if buffer.is_empty() {
                return Err(DataCorruption::missing_value(doc).into());
            }
            Ok(buffer
                .iter()
                .any(|point| self.polygon.contains_point(point)))
        } else {
            let point = self.geo_points.first_value(doc)?;
            Ok(self.polygon.contains_point(&point))
        }
    }

    fn attach_field(&self, err: GeoFilterError) -> GeoFilterError {
        match err {
            GeoFilterError::DataCorruption(data_corruption) => {
                GeoFilterError::DataCorruption(data_corruption.with_field(&self.field_name))
            }
            other => other,
        }
    }
}

impl MatchSet for GeoPolygonMatchSet {
    fn max_doc(&self) -> DocId {
        self.max_doc
    }

    fn matches(&self, doc: DocId) -> crate::Result<bool> {
        self.matches_with_buffer(doc, &mut Vec::new())
    }

    fn is_cacheable(&self) -> bool {
        true
    }

    fn count(&self) -> crate::Result<u32> {
        Ok(self.to_bitset()?.len() as u32)
    }

    fn to_bitset(&self) -> crate::Result<BitSet> {
        let mut bitset = BitSet::with_max_value(self.max_doc);
        let mut buffer = Vec::new();
        let mut evaluate = |doc: DocId| -> crate::Result<()> {
            if self
                .match_doc(doc, &mut buffer)
                .map_err(|err| self.attach_field(err))?
            {
                bitset.insert(doc);
            }
            Ok(())
        };
        if let Some(alive_bitset) = &self.alive_bitset_opt {
            for doc in alive_bitset.iter_alive() {
                if doc >= self.max_doc {
                    break;
                }
                evaluate(doc)?;
            }
        } else {
            for doc in 0..self.max_doc {
                evaluate(doc)?;
            }
        }
        debug!(
            "geo polygon on `{}` matched {} docs out of {}",
            self.field_name,
            bitset.len(),
            self.max_doc
        );
        Ok(bitset)
    }
}

impl fmt::Display for GeoPolygonMatchSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeoPolygonQuery({}, {})", self.field_name, self.polygon)
    }
}

impl fmt::Debug for GeoPolygonMatchSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoPolygonMatchSet")
            .field("field_name", &self.field_name)
            .field("polygon", &self.polygon)
            .field("max_doc", &self.max_doc)
            .field("alive_bitset", &self.alive_bitset_opt)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::{GeoPolygonMatchSet, GeoPolygonQuery};
    use crate::error::DataCorruption;
    use crate::fastfield::{AliveBitSet, GeoFieldReaders, GeoPointColumnWriter, GeoPointValues};
    use crate::index::SegmentReader;
    use crate::query::MatchSet;
    use crate::spatial::GeoPoint;
    use crate::{DocId, GeoFilterError};

    fn square_query() -> GeoPolygonQuery {
        GeoPolygonQuery::new(
            "location",
            vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.0, 10.0),
                GeoPoint::new(10.0, 10.0),
                GeoPoint::new(10.0, 0.0),
            ],
        )
        .unwrap()
    }

    fn triangle_query() -> GeoPolygonQuery {
        GeoPolygonQuery::new(
            "location",
            vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.0, 4.0),
                GeoPoint::new(4.0, 0.0),
            ],
        )
        .unwrap()
    }

    fn segment(docs: &[&[(f64, f64)]]) -> SegmentReader {
        let mut writer = GeoPointColumnWriter::default();
        for (doc, points) in docs.iter().enumerate() {
            writer.record_all(doc as DocId, points.iter().copied().map(GeoPoint::from));
        }
        let num_docs = docs.len() as DocId;
        let mut geo_fields = GeoFieldReaders::default();
        geo_fields.add_field("location", Arc::new(writer.finish(num_docs).unwrap()));
        SegmentReader::new(num_docs, geo_fields)
    }

    fn matching_docs(match_set: &dyn MatchSet) -> Vec<DocId> {
        (0..match_set.max_doc())
            .filter(|&doc| match_set.matches(doc).unwrap())
            .collect()
    }

    #[test]
    fn test_query_requires_field_name() {
        let err = GeoPolygonQuery::new("", vec![GeoPoint::new(0.0, 0.0); 3]).unwrap_err();
        assert!(matches!(err, GeoFilterError::InvalidArgument(_)));
    }

    #[test]
    fn test_query_requires_three_points() {
        let err = GeoPolygonQuery::new("location", vec![GeoPoint::new(0.0, 0.0); 2]).unwrap_err();
        assert!(matches!(err, GeoFilterError::InvalidArgument(_)));
    }

    #[test]
    fn test_query_accessors_and_display() {
        let query = triangle_query();
        assert_eq!(query.field_name(), "location");
        assert_eq!(query.points().len(), 3);
        assert_eq!(query.points()[1], GeoPoint::new(0.0, 4.0));
        assert_eq!(
            query.to_string(),
            "GeoPolygonQuery(location, [(0, 0), (0, 4), (4, 0)])"
        );
        let match_set = query.match_set(&segment(&[&[(1.0, 1.0)]])).unwrap();
        assert_eq!(match_set.to_string(), query.to_string());
        assert_eq!(match_set.field_name(), "location");
    }

    #[test]
    fn test_single_valued() {
        let segment_reader = segment(&[&[(5.0, 5.0)], &[(15.0, 15.0)], &[], &[(0.0, 5.0)]]);
        let match_set = square_query().match_set(&segment_reader).unwrap();
        assert!(match_set.is_cacheable());
        assert!(match_set.matches(0).unwrap());
        assert!(!match_set.matches(1).unwrap());
        // no value
        assert!(!match_set.matches(2).unwrap());
        // low latitude edge
        assert!(!match_set.matches(3).unwrap());
        assert_eq!(match_set.count().unwrap(), 1);
    }

    #[test]
    fn test_multivalued_any_point_matches() {
        let segment_reader = segment(&[
            &[(10.0, 10.0), (1.0, 1.0)],
            &[(10.0, 10.0), (20.0, 20.0)],
            &[(1.0, 1.0)],
            &[],
        ]);
        let match_set = triangle_query().match_set(&segment_reader).unwrap();
        assert_eq!(matching_docs(&match_set), vec![0, 2]);
    }

    #[test]
    fn test_deleted_doc_never_matches() {
        let inside: &[(f64, f64)] = &[(5.0, 5.0)];
        let segment_reader = segment(&[inside; 5])
            .with_alive_bitset(AliveBitSet::from_deleted_docs(&[2], 5));
        let match_set = square_query().match_set(&segment_reader).unwrap();
        assert!(!match_set.matches(2).unwrap());
        assert_eq!(matching_docs(&match_set), vec![0, 1, 3, 4]);
        assert_eq!(match_set.count().unwrap(), 4);
        assert_eq!(
            match_set.to_bitset().unwrap().iter().collect::<Vec<_>>(),
            vec![0, 1, 3, 4]
        );
    }

    #[test]
    fn test_out_of_range_doc() {
        let match_set = square_query()
            .match_set(&segment(&[&[(5.0, 5.0)]]))
            .unwrap();
        assert!(matches!(
            match_set.matches(1),
            Err(GeoFilterError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_missing_field() {
        let query = GeoPolygonQuery::new("elsewhere", square_query().points().to_vec()).unwrap();
        let err = query.match_set(&segment(&[&[(5.0, 5.0)]])).unwrap_err();
        assert!(matches!(err, GeoFilterError::FieldNotFound(_)));
    }

    #[test]
    fn test_geo_field_too_short_for_segment() {
        let mut writer = GeoPointColumnWriter::default();
        writer.record(0, GeoPoint::new(5.0, 5.0));
        let mut geo_fields = GeoFieldReaders::default();
        geo_fields.add_field("location", Arc::new(writer.finish(1).unwrap()));
        let segment_reader = SegmentReader::new(3, geo_fields);
        let err = square_query().match_set(&segment_reader).unwrap_err();
        assert!(matches!(err, GeoFilterError::SchemaError(_)));
    }

    /// Geo values claiming every doc has a value, while failing to return any.
    /// Also counts how many times it got queried.
    #[derive(Default)]
    struct InconsistentGeoPoints {
        multivalued: bool,
        num_queries: AtomicUsize,
    }

    impl GeoPointValues for InconsistentGeoPoints {
        fn num_docs(&self) -> DocId {
            10
        }

        fn has_value(&self, _doc: DocId) -> bool {
            self.num_queries.fetch_add(1, Ordering::SeqCst);
            true
        }

        fn is_multivalued(&self) -> bool {
            self.multivalued
        }

        fn first_value(&self, doc: DocId) -> crate::Result<GeoPoint> {
            Err(DataCorruption::missing_value(doc).into())
        }

        fn values_for_doc(&self, _doc: DocId, output: &mut Vec<GeoPoint>) -> crate::Result<()> {
            output.clear();
            Ok(())
        }
    }

    fn inconsistent_match_set(
        multivalued: bool,
        alive_bitset_opt: Option<AliveBitSet>,
    ) -> (Arc<InconsistentGeoPoints>, GeoPolygonMatchSet) {
        let geo_points = Arc::new(InconsistentGeoPoints {
            multivalued,
            ..Default::default()
        });
        let match_set = GeoPolygonMatchSet::new(
            square_query().polygon.clone(),
            "location",
            geo_points.clone(),
            10,
            alive_bitset_opt,
        )
        .unwrap();
        (geo_points, match_set)
    }

    #[test]
    fn test_provider_inconsistency_is_an_error() {
        for multivalued in [false, true] {
            let (_, match_set) = inconsistent_match_set(multivalued, None);
            let err = match_set.matches(3).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Data corruption (in field `location`): doc 3 is reported as having a geo \
                 value, but none could be read."
            );
            assert!(match_set.count().is_err());
            assert!(match_set.to_bitset().is_err());
        }
    }

    #[test]
    fn test_deleted_doc_is_not_evaluated() {
        let alive_bitset = AliveBitSet::from_deleted_docs(&[3], 10);
        let (geo_points, match_set) = inconsistent_match_set(false, Some(alive_bitset));
        assert!(!match_set.matches(3).unwrap());
        assert_eq!(geo_points.num_queries.load(Ordering::SeqCst), 0);
        assert!(match_set.matches(4).is_err());
        assert_eq!(geo_points.num_queries.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_match_set_new_requires_field_name() {
        let geo_points: Arc<dyn GeoPointValues> = Arc::new(InconsistentGeoPoints::default());
        let err = GeoPolygonMatchSet::new(square_query().polygon.clone(), "", geo_points, 10, None)
            .unwrap_err();
        assert!(matches!(err, GeoFilterError::InvalidArgument(_)));
    }

    #[test]
    fn test_match_set_new_rejects_short_geo_points() {
        let geo_points: Arc<dyn GeoPointValues> = Arc::new(InconsistentGeoPoints::default());
        let err = GeoPolygonMatchSet::new(
            square_query().polygon.clone(),
            "location",
            geo_points.clone(),
            11,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, GeoFilterError::SchemaError(_)));
        // a provider covering more documents than the segment is fine.
        assert!(GeoPolygonMatchSet::new(
            square_query().polygon.clone(),
            "location",
            geo_points,
            5,
            None
        )
        .is_ok());
    }
}
