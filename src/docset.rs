use crate::fastfield::AliveBitSet;
use crate::DocId;

/// Sentinel value returned when a [`DocSet`] has been entirely consumed.
///
/// Doc ids yielded by a `DocSet` are always strictly lower than this value.
pub const TERMINATED: DocId = i32::MAX as u32;

/// Forward-only cursor over a sorted set of doc ids.
///
/// The hosting engine drives the traversal of a segment through this trait: it decides
/// when to advance, when to skip ahead, and when to stop.
///
/// Right after creation, a `DocSet` is positioned on its first doc, or on [`TERMINATED`]
/// if it is empty.
pub trait DocSet: Send {
    /// Moves to the next doc and returns it, or [`TERMINATED`] once the set is exhausted.
    ///
    /// Advancing a terminated `DocSet` is legal and returns [`TERMINATED`] again.
    fn advance(&mut self) -> DocId;

    /// Moves to the first doc greater or equal to `target` and returns it.
    ///
    /// A `DocSet` never moves backward: if the current doc is already past `target`, it is
    /// returned unchanged. `seek(TERMINATED)` consumes the set.
    fn seek(&mut self, target: DocId) -> DocId {
        let mut doc = self.doc();
        while doc < target {
            doc = self.advance();
        }
        doc
    }

    /// Copies the next doc ids into `buffer`, advancing past them.
    ///
    /// Returns the number of doc ids written, lower than the buffer length only if the set got
    /// exhausted.
    fn fill_buffer(&mut self, buffer: &mut [DocId]) -> usize {
        let mut num_docs = 0;
        for buffer_val in buffer.iter_mut() {
            let doc = self.doc();
            if doc == TERMINATED {
                break;
            }
            *buffer_val = doc;
            num_docs += 1;
            self.advance();
        }
        num_docs
    }

    /// Returns the current doc.
    fn doc(&self) -> DocId;

    /// Upper bound of the number of docs in the set.
    fn size_hint(&self) -> u32;

    /// Consumes the set, counting the docs that are alive in `alive_bitset`.
    fn count(&mut self, alive_bitset: &AliveBitSet) -> u32 {
        let mut count = 0u32;
        let mut doc = self.doc();
        while doc != TERMINATED {
            if alive_bitset.is_alive(doc) {
                count += 1;
            }
            doc = self.advance();
        }
        count
    }

    /// Consumes the set, counting all of its docs.
    fn count_including_deleted(&mut self) -> u32 {
        let mut count = 0u32;
        let mut doc = self.doc();
        while doc != TERMINATED {
            count += 1;
            doc = self.advance();
        }
        count
    }
}
