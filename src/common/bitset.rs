use std::fmt;

use crate::DocId;

/// Bucket of 64 doc ids, one bit each.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct TinySet(u64);

impl fmt::Debug for TinySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(*self).finish()
    }
}

/// Yields the elements of a [`TinySet`] from the lowest to the highest.
pub struct TinySetIterator(TinySet);

impl Iterator for TinySetIterator {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        self.0.pop_lowest()
    }
}

impl IntoIterator for TinySet {
    type Item = u32;
    type IntoIter = TinySetIterator;

    fn into_iter(self) -> TinySetIterator {
        TinySetIterator(self)
    }
}

impl TinySet {
    /// Bucket without any element.
    #[inline]
    pub fn empty() -> TinySet {
        TinySet(0u64)
    }

    #[inline]
    fn bit(el: u32) -> u64 {
        1u64 << el
    }

    /// Keeps the elements present in both buckets.
    #[inline]
    #[must_use]
    pub fn intersect(self, other: TinySet) -> TinySet {
        TinySet(self.0 & other.0)
    }

    /// Returns true if the bucket holds no element.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0u64
    }

    /// Removes and returns the lowest element, if any.
    #[inline]
    pub fn pop_lowest(&mut self) -> Option<u32> {
        if self.is_empty() {
            return None;
        }
        let lowest = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        Some(lowest)
    }

    /// Bucket holding `[0, upper_bound)`. `upper_bound` must be lower than 64.
    pub fn range_lower(upper_bound: u32) -> TinySet {
        TinySet(TinySet::bit(upper_bound) - 1u64)
    }

    /// Bucket holding `[from_included % 64, 64)`.
    ///
    /// Used when seeking, to drop the part of a bucket lying before the target doc.
    pub fn range_greater_or_equal(from_included: u32) -> TinySet {
        TinySet(!TinySet::range_lower(from_included % 64u32).0)
    }
}

/// A dense set of `DocId`s within `[0, max_value)`.
///
/// Used both as the accepted-docs mask of a segment and as the
/// materialized form of a match set.
#[derive(Clone)]
pub struct BitSet {
    buckets: Box<[TinySet]>,
    len: u64,
    max_value: u32,
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitSet")
            .field("len", &self.len)
            .field("max_value", &self.max_value)
            .finish()
    }
}

fn num_buckets(max_value: u32) -> usize {
    (max_value as usize + 63) / 64
}

impl BitSet {
    /// Creates an empty set accepting the values `[0, max_value)`.
    pub fn with_max_value(max_value: u32) -> BitSet {
        BitSet {
            buckets: vec![TinySet::empty(); num_buckets(max_value)].into_boxed_slice(),
            len: 0,
            max_value,
        }
    }

    /// Creates a set containing all of the values `[0, max_value)`.
    pub fn with_max_value_and_full(max_value: u32) -> BitSet {
        let mut buckets = vec![TinySet(u64::MAX); num_buckets(max_value)].into_boxed_slice();
        // values past max_value must stay unset in the last bucket.
        let remainder = max_value % 64u32;
        if remainder != 0 {
            if let Some(last) = buckets.last_mut() {
                *last = TinySet::range_lower(remainder);
            }
        }
        BitSet {
            buckets,
            len: u64::from(max_value),
            max_value,
        }
    }

    /// Number of values in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Adds `el` to the set. `el` must be lower than `max_value`.
    #[inline]
    pub fn insert(&mut self, el: u32) {
        let bucket = &mut self.buckets[(el / 64u32) as usize];
        let bit = TinySet::bit(el % 64u32);
        if bucket.0 & bit == 0 {
            bucket.0 |= bit;
            self.len += 1;
        }
    }

    /// Removes `el` from the set. `el` must be lower than `max_value`.
    #[inline]
    pub fn remove(&mut self, el: u32) {
        let bucket = &mut self.buckets[(el / 64u32) as usize];
        let bit = TinySet::bit(el % 64u32);
        if bucket.0 & bit != 0 {
            bucket.0 &= !bit;
            self.len -= 1;
        }
    }

    /// Returns true if `el` is in the set. Values past `max_value` never are.
    #[inline]
    pub fn contains(&self, el: u32) -> bool {
        el < self.max_value
            && self.buckets[(el / 64u32) as usize].0 & TinySet::bit(el % 64u32) != 0
    }

    /// Returns the first bucket, starting from `bucket` included, holding at least one value.
    pub fn first_non_empty_bucket(&self, bucket: u32) -> Option<u32> {
        self.buckets
            .get(bucket as usize..)?
            .iter()
            .position(|tinyset| !tinyset.is_empty())
            .map(|offset| bucket + offset as u32)
    }

    /// Upper bound (excluded) of the values the set accepts.
    #[inline]
    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    /// Number of buckets of 64 values.
    #[inline]
    pub fn num_buckets(&self) -> u32 {
        self.buckets.len() as u32
    }

    /// Values of the set within `[bucket * 64, (bucket + 1) * 64)`.
    #[inline]
    pub fn tinyset(&self, bucket: u32) -> TinySet {
        self.buckets[bucket as usize]
    }

    /// Iterates over the values of the set, in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .flat_map(|(bucket, tinyset)| {
                let base = bucket as u32 * 64u32;
                tinyset.into_iter().map(move |el| base | el)
            })
    }
}
