//! Error taxonomy for the codec core.
//!
//! Every fallible operation in this crate returns a `Result` carrying one of
//! the two enums below. Neither carries a source error from another crate -
//! everything that can go wrong here is either a caller mistake
//! ([`EncodeError`]) or a malformed byte stream ([`DecodeError`]).
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Errors that can occur while encoding a raster into a byte stream.
#[allow(clippy::module_name_repetitions)]
pub enum EncodeError {
    /// `quality` was outside `[1, 100]`.
    InvalidQuality(u8),
}

impl Debug for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidQuality(q) => {
                write!(f, "quality {q} is out of range, expected a value in [1, 100]")
            }
        }
    }
}

impl Error for EncodeError {}

/// Errors that can occur while decoding a byte stream into a raster.
///
/// Every variant carries the byte offset (into the input slice) or block
/// index at which the inconsistency was detected, so a caller can report a
/// useful diagnostic without the core needing to know about file names or
/// CLI presentation.
#[allow(clippy::module_name_repetitions)]
pub enum DecodeError {
    /// Ran out of input bytes before a symbol, segment, or EOI was fully read.
    TruncatedStream { offset: usize },
    /// Expected a marker byte pair at a segment boundary and did not find one.
    BadMarker { offset: usize, found: u16 },
    /// BITS/HUFFVAL counts disagree, or SOS referenced a table slot that was
    /// never defined by a DHT segment.
    TableInconsistency(String),
    /// No Huffman code of length <= 16 matched the next bits in the stream.
    HuffmanMiss { offset: usize },
    /// A VLI category outside `[0, 16]` was requested.
    VliOutOfRange { category: u8 },
    /// The AC coefficient cursor advanced past index 64 within one block.
    BlockOverflow { block_index: usize },
    /// SOF0 dimensions are inconsistent with the number of blocks actually
    /// present in the entropy-coded scan.
    DimensionMismatch { expected: usize, found: usize },
}

impl Debug for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TruncatedStream { offset } => {
                write!(f, "truncated stream: ran out of bytes at offset {offset}")
            }
            Self::BadMarker { offset, found } => {
                write!(f, "expected a marker at offset {offset}, found 0x{found:04x}")
            }
            Self::TableInconsistency(reason) => {
                write!(f, "inconsistent table: {reason}")
            }
            Self::HuffmanMiss { offset } => {
                write!(f, "no huffman code matched the bitstream at offset {offset}")
            }
            Self::VliOutOfRange { category } => {
                write!(f, "VLI category {category} exceeds the allowed precision (0..=16)")
            }
            Self::BlockOverflow { block_index } => {
                write!(f, "AC cursor advanced past coefficient 64 in block {block_index}")
            }
            Self::DimensionMismatch { expected, found } => {
                write!(
                    f,
                    "SOF0 declared {expected} blocks but the scan produced {found}"
                )
            }
        }
    }
}

impl Error for DecodeError {}
