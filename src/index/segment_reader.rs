use crate::fastfield::{AliveBitSet, GeoFieldReaders};
use crate::DocId;

/// Entry point to access the datastructures of a segment the geo filter relies on.
///
/// - the number of documents of the segment
/// - the alive bitset, if some documents have been deleted
/// - the geo point readers of the segment's fields
///
/// A `SegmentReader` is a snapshot: none of the above change during its lifetime.
#[derive(Clone, Debug)]
pub struct SegmentReader {
    max_doc: DocId,
    num_docs: DocId,
    geo_fields: GeoFieldReaders,
    alive_bitset_opt: Option<AliveBitSet>,
}

impl SegmentReader {
    /// Creates a segment reader in which all documents are alive.
    pub fn new(max_doc: DocId, geo_fields: GeoFieldReaders) -> SegmentReader {
        SegmentReader {
            max_doc,
            num_docs: max_doc,
            geo_fields,
            alive_bitset_opt: None,
        }
    }

    /// Restricts the segment to the documents alive in `alive_bitset`.
    ///
    /// Documents beyond the bitset's own `max_doc` are considered deleted.
    pub fn with_alive_bitset(mut self, alive_bitset: AliveBitSet) -> SegmentReader {
        self.num_docs = alive_bitset
            .iter_alive()
            .take_while(|&doc| doc < self.max_doc)
            .count() as DocId;
        self.alive_bitset_opt = Some(alive_bitset);
        self
    }

    /// Returns the highest document id ever attributed in
    /// this segment + 1.
    pub fn max_doc(&self) -> DocId {
        self.max_doc
    }

    /// Returns the number of alive documents.
    /// Deleted documents are not counted.
    pub fn num_docs(&self) -> DocId {
        self.num_docs
    }

    /// Return the number of documents that have been
    /// deleted in the segment.
    pub fn num_deleted_docs(&self) -> DocId {
        self.max_doc - self.num_docs
    }

    /// Returns true if some of the documents of the segment have been deleted.
    pub fn has_deletes(&self) -> bool {
        self.num_deleted_docs() > 0
    }

    /// Returns the bitset representing the alive `DocId`s.
    pub fn alive_bitset(&self) -> Option<&AliveBitSet> {
        self.alive_bitset_opt.as_ref()
    }

    /// Returns true if the `doc` is marked as deleted.
    pub fn is_deleted(&self, doc: DocId) -> bool {
        self.alive_bitset()
            .map(|alive_bitset| alive_bitset.is_deleted(doc))
            .unwrap_or(false)
    }

    /// Accessor to the segment's geo point readers.
    pub fn geo_fields(&self) -> &GeoFieldReaders {
        &self.geo_fields
    }
}
