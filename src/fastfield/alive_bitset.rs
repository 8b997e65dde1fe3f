use std::fmt;
use std::sync::Arc;

use crate::common::BitSet;
use crate::DocId;

/// Set of alive `DocId`s.
///
/// This is the accepted-docs mask of a segment: documents that are not alive
/// are never evaluated, and never match.
#[derive(Clone)]
pub struct AliveBitSet {
    bitset: Arc<BitSet>,
    num_deleted: usize,
}

impl fmt::Debug for AliveBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AliveBitSet")
            .field("max_doc", &self.max_doc())
            .field("num_deleted", &self.num_deleted)
            .finish()
    }
}

impl AliveBitSet {
    /// Creates an `AliveBitSet` for `max_doc` documents, in which
    /// all of the `deleted_docs` are marked as deleted.
    pub fn from_deleted_docs(deleted_docs: &[DocId], max_doc: DocId) -> AliveBitSet {
        let mut bitset = BitSet::with_max_value_and_full(max_doc);
        for &doc in deleted_docs {
            if doc < max_doc {
                bitset.remove(doc);
            }
        }
        AliveBitSet::from_bitset(bitset)
    }

    /// Creates an `AliveBitSet` from the set of alive docs.
    pub fn from_bitset(bitset: BitSet) -> AliveBitSet {
        let num_deleted = bitset.max_value() as usize - bitset.len();
        AliveBitSet {
            bitset: Arc::new(bitset),
            num_deleted,
        }
    }

    /// Returns true iff the document is still "alive". In other words, if it has not been deleted.
    #[inline]
    pub fn is_alive(&self, doc: DocId) -> bool {
        self.bitset.contains(doc)
    }

    /// Returns true iff the document has been marked as deleted.
    #[inline]
    pub fn is_deleted(&self, doc: DocId) -> bool {
        !self.is_alive(doc)
    }

    /// Iterate over the alive docids.
    #[inline]
    pub fn iter_alive(&self) -> impl Iterator<Item = DocId> + '_ {
        self.bitset.iter()
    }

    /// Get underlying bitset
    #[inline]
    pub fn bitset(&self) -> &BitSet {
        &self.bitset
    }

    /// Number of documents covered by the mask.
    pub fn max_doc(&self) -> DocId {
        self.bitset.max_value()
    }

    /// The number of deleted docs
    pub fn num_deleted(&self) -> usize {
        self.num_deleted
    }

    /// The number of alive docs
    pub fn num_alive(&self) -> usize {
        self.bitset.len()
    }
}
