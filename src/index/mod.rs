//! Read access to a segment: its document count, its alive documents and its geo fields.

mod segment_reader;

pub use self::segment_reader::SegmentReader;
