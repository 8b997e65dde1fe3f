//! Shared datastructures.

mod bitset;

pub use self::bitset::{BitSet, TinySet, TinySetIterator};
