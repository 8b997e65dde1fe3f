use crate::common::BitSet;
use crate::docset::{DocSet, TERMINATED};
use crate::{DocId, GeoFilterError};

/// A lazily evaluated set of matching documents of a segment.
///
/// Logically, a `MatchSet` is a function from the `DocId`s `[0, max_doc)` to a boolean.
/// Nothing is computed upfront: every call to [`MatchSet::matches`] evaluates the document.
///
/// A `MatchSet` holds no mutable state, and `matches` may be called concurrently, in any
/// order, any number of times.
pub trait MatchSet: Send + Sync {
    /// Upper bound (excluded) of the `DocId`s of the set.
    ///
    /// A [`MatchDocSet`] never yields docs greater or equal to [`TERMINATED`].
    fn max_doc(&self) -> DocId;

    /// Returns true if the document matches.
    ///
    /// Returns an error if `doc >= max_doc`, or if the underlying data could not be read.
    fn matches(&self, doc: DocId) -> crate::Result<bool>;

    /// Returns true if the match set only depends on immutable data, in which case
    /// the caller may compute it once (e.g. with [`MatchSet::to_bitset`]) and reuse the result
    /// for identical queries on the same segment.
    fn is_cacheable(&self) -> bool {
        false
    }

    /// Returns the number of matching documents.
    fn count(&self) -> crate::Result<u32> {
        let mut count = 0u32;
        for doc in 0..self.max_doc() {
            if self.matches(doc)? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Evaluates all of the documents, and returns the set of matching documents.
    fn to_bitset(&self) -> crate::Result<BitSet> {
        let mut bitset = BitSet::with_max_value(self.max_doc());
        for doc in 0..self.max_doc() {
            if self.matches(doc)? {
                bitset.insert(doc);
            }
        }
        Ok(bitset)
    }

    /// Returns a lazy `DocSet` over the matching documents.
    fn doc_set(&self) -> MatchDocSet<'_>
    where Self: Sized {
        MatchDocSet::new(self)
    }
}

/// Lazily iterates over the matching documents of a [`MatchSet`], as a [`DocSet`].
///
/// `DocSet` offers no way to report errors: if evaluating a document fails, the
/// `MatchDocSet` terminates and keeps the error. Callers are expected to check
/// [`MatchDocSet::take_error`] once the docset is terminated.
pub struct MatchDocSet<'a> {
    match_set: &'a dyn MatchSet,
    doc: DocId,
    error: Option<GeoFilterError>,
}

impl<'a> MatchDocSet<'a> {
    /// Creates a `DocSet` positioned on the first matching document.
    pub fn new(match_set: &'a dyn MatchSet) -> MatchDocSet<'a> {
        let mut docset = MatchDocSet {
            match_set,
            doc: 0u32,
            error: None,
        };
        docset.find_next();
        docset
    }

    /// Returns the error that terminated the iteration, if any.
    pub fn take_error(&mut self) -> Option<GeoFilterError> {
        self.error.take()
    }

    /// Moves `self.doc` to the first matching document greater or equal to it.
    fn find_next(&mut self) -> DocId {
        let max_doc = self.match_set.max_doc().min(TERMINATED);
        while self.doc < max_doc {
            match self.match_set.matches(self.doc) {
                Ok(true) => return self.doc,
                Ok(false) => self.doc += 1,
                Err(err) => {
                    self.error = Some(err);
                    break;
                }
            }
        }
        self.doc = TERMINATED;
        TERMINATED
    }
}

impl<'a> DocSet for MatchDocSet<'a> {
    fn advance(&mut self) -> DocId {
        if self.doc == TERMINATED {
            return TERMINATED;
        }
        self.doc += 1;
        self.find_next()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        if self.doc >= target {
            return self.doc;
        }
        self.doc = target;
        self.find_next()
    }

    fn doc(&self) -> DocId {
        self.doc
    }

    fn size_hint(&self) -> u32 {
        self.match_set.max_doc()
    }
}
