use std::fmt;
use std::ops::Range;

use crate::error::DataCorruption;
use crate::spatial::GeoPoint;
use crate::{DocId, GeoFilterError};

/// Per-document access to the geo points of a field.
///
/// Implementations are expected to read from an immutable snapshot, and to be
/// safe to share between threads.
pub trait GeoPointValues: Send + Sync {
    /// Number of documents covered by the values. Valid doc ids are `[0, num_docs)`.
    fn num_docs(&self) -> DocId;

    /// Returns true if the document has at least one geo point.
    fn has_value(&self, doc: DocId) -> bool;

    /// Returns true if documents may have more than one geo point.
    fn is_multivalued(&self) -> bool;

    /// Returns the first geo point of the document.
    ///
    /// Must succeed for any document for which `has_value` returned true.
    fn first_value(&self, doc: DocId) -> crate::Result<GeoPoint>;

    /// Replaces the content of `output` with all the geo points of the document,
    /// in insertion order.
    fn values_for_doc(&self, doc: DocId, output: &mut Vec<GeoPoint>) -> crate::Result<()>;
}

/// Number of values a document may have in a column.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cardinality {
    /// All documents contain exactly one value.
    Full,
    /// All documents contain at most one value.
    Optional,
    /// All documents may contain any number of values.
    Multivalued,
}

#[derive(Clone)]
enum ColumnIndex {
    Full,
    /// Sorted doc ids having a value. The rank of a doc is the position of its value.
    Optional { non_null_docs: Vec<DocId> },
    /// `start_index[doc]..start_index[doc + 1]` is the range of the values of `doc`.
    Multivalued { start_index: Vec<u32> },
}

/// In-memory geo point column.
///
/// Built with a [`GeoPointColumnWriter`].
#[derive(Clone)]
pub struct GeoPointColumn {
    index: ColumnIndex,
    values: Vec<GeoPoint>,
    num_docs: DocId,
}

impl fmt::Debug for GeoPointColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoPointColumn")
            .field("cardinality", &self.cardinality())
            .field("num_docs", &self.num_docs)
            .field("num_vals", &self.values.len())
            .finish()
    }
}

impl GeoPointColumn {
    /// Returns the cardinality of the column.
    pub fn cardinality(&self) -> Cardinality {
        match self.index {
            ColumnIndex::Full => Cardinality::Full,
            ColumnIndex::Optional { .. } => Cardinality::Optional,
            ColumnIndex::Multivalued { .. } => Cardinality::Multivalued,
        }
    }

    /// Overall number of values in the column.
    pub fn num_vals(&self) -> u32 {
        self.values.len() as u32
    }

    /// Returns `[start, end)`, such that the values associated with
    /// the given document are `start..end`.
    fn value_range(&self, doc: DocId) -> Range<u32> {
        if doc >= self.num_docs {
            return 0..0;
        }
        match &self.index {
            ColumnIndex::Full => doc..doc + 1,
            ColumnIndex::Optional { non_null_docs } => match non_null_docs.binary_search(&doc) {
                Ok(rank) => rank as u32..rank as u32 + 1,
                Err(_) => 0..0,
            },
            ColumnIndex::Multivalued { start_index } => {
                start_index[doc as usize]..start_index[doc as usize + 1]
            }
        }
    }
}

impl GeoPointValues for GeoPointColumn {
    fn num_docs(&self) -> DocId {
        self.num_docs
    }

    #[inline]
    fn has_value(&self, doc: DocId) -> bool {
        !self.value_range(doc).is_empty()
    }

    fn is_multivalued(&self) -> bool {
        self.cardinality() == Cardinality::Multivalued
    }

    fn first_value(&self, doc: DocId) -> crate::Result<GeoPoint> {
        let range = self.value_range(doc);
        if range.is_empty() {
            return Err(DataCorruption::missing_value(doc).into());
        }
        self.values
            .get(range.start as usize)
            .copied()
            .ok_or_else(|| DataCorruption::missing_value(doc).into())
    }

    fn values_for_doc(&self, doc: DocId, output: &mut Vec<GeoPoint>) -> crate::Result<()> {
        output.clear();
        let range = self.value_range(doc);
        let vals = self
            .values
            .get(range.start as usize..range.end as usize)
            .ok_or_else(|| DataCorruption::missing_value(doc))?;
        output.extend_from_slice(vals);
        Ok(())
    }
}

/// Accumulates the geo points of a field, then builds a [`GeoPointColumn`].
///
/// Documents may be recorded in any order. The values of a given document keep
/// the order in which they were recorded.
#[derive(Default)]
pub struct GeoPointColumnWriter {
    doc_values: Vec<(DocId, GeoPoint)>,
}

impl GeoPointColumnWriter {
    /// Records a geo point for `doc`.
    pub fn record(&mut self, doc: DocId, point: GeoPoint) {
        self.doc_values.push((doc, point));
    }

    /// Records all of the geo points of `doc`.
    pub fn record_all(&mut self, doc: DocId, points: impl IntoIterator<Item = GeoPoint>) {
        for point in points {
            self.record(doc, point);
        }
    }

    /// Builds the column for a segment containing `num_docs` documents.
    ///
    /// The most compact cardinality is picked given the recorded values.
    pub fn finish(mut self, num_docs: DocId) -> crate::Result<GeoPointColumn> {
        if let Some(&(doc, _)) = self.doc_values.iter().find(|(doc, _)| *doc >= num_docs) {
            return Err(GeoFilterError::InvalidArgument(format!(
                "Geo point recorded for doc {doc}, but the segment only has {num_docs} documents"
            )));
        }
        // stable sort, to preserve the order of the values of a document.
        self.doc_values.sort_by_key(|(doc, _)| *doc);

        let mut start_index: Vec<u32> = Vec::with_capacity(num_docs as usize + 1);
        let mut non_null_docs: Vec<DocId> = Vec::new();
        let mut max_vals_per_doc = 0u32;
        let mut cursor = 0usize;
        for doc in 0..num_docs {
            start_index.push(cursor as u32);
            let doc_start = cursor;
            while cursor < self.doc_values.len() && self.doc_values[cursor].0 == doc {
                cursor += 1;
            }
            let num_vals = (cursor - doc_start) as u32;
            if num_vals > 0 {
                non_null_docs.push(doc);
            }
            max_vals_per_doc = max_vals_per_doc.max(num_vals);
        }
        start_index.push(cursor as u32);

        let values: Vec<GeoPoint> = self.doc_values.into_iter().map(|(_, point)| point).collect();
        let index = if max_vals_per_doc > 1 {
            ColumnIndex::Multivalued { start_index }
        } else if non_null_docs.len() == num_docs as usize {
            ColumnIndex::Full
        } else {
            ColumnIndex::Optional { non_null_docs }
        };
        let column = GeoPointColumn {
            index,
            values,
            num_docs,
        };
        debug!("built geo point column {column:?}");
        Ok(column)
    }
}
