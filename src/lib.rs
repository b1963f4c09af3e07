//! A baseline sequential-DCT JPEG-like still image codec core.
//!
//! This crate implements the hard, numerically sensitive parts of a
//! baseline JPEG-shaped codec - canonical Huffman entropy coding, the 8x8
//! block DCT/quantization pipeline, and segment-marker container framing -
//! behind two pure functions, [`encode::encode`] and [`decode::decode`].
//! Multi-scan progressive coding, restart markers, subsampled (non-4:4:4)
//! scans and arithmetic coding are out of scope.
#![warn(missing_docs)]

mod bitstream;
mod block;
mod color;
mod component;
mod dct;
mod entropy;
mod headers;
mod huffman;
mod marker;
mod quant;
mod threads;
mod vli;
mod zigzag;

pub use quant::QuantTable;

pub mod decoder;
pub mod encoder;
pub mod errors;
pub mod image;

pub use decoder::decode;
pub use encoder::{encode, EncodeOptions};
pub use errors::{DecodeError, EncodeError};
pub use image::{ColorSpace, Image};
