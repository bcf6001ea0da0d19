//! Segment encoding: titles in, canonical URL segments out.

mod segment;
mod transliterate;

pub use segment::SegmentEncoder;
pub use transliterate::to_ascii;
