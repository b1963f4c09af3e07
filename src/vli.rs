//! Variable-length integer (VLI) amplitude coding, JPEG-style.
//!
//! The source used arbitrary-precision integers for this; a category tops
//! out at 16, so a `i32` carries every intermediate value here, including
//! DC predictor accumulation, with room to spare (spec.md design notes).
use crate::errors::DecodeError;

/// Minimal bit length of `|v|`; `0` iff `v == 0`.
pub(crate) fn categorize(v: i32) -> u8 {
    if v == 0 {
        return 0;
    }
    32 - v.unsigned_abs().leading_zeros() as u8
}

/// Magnitude bits for `v` given its category: `v` itself if positive,
/// otherwise `v + (2^k - 1)` (the one's-complement-style negative encoding).
pub(crate) fn magnitude_bits(v: i32, category: u8) -> u32 {
    if category == 0 {
        return 0;
    }
    if v > 0 {
        v as u32
    } else {
        (v + ((1i32 << category) - 1)) as u32
    }
}

/// Inverse of [`categorize`] + [`magnitude_bits`]: given a category and its
/// magnitude bits, recover the signed value.
pub(crate) fn decode(category: u8, bits: u32) -> Result<i32, DecodeError> {
    if category > 16 {
        return Err(DecodeError::VliOutOfRange { category });
    }
    if category == 0 {
        return Ok(0);
    }
    let top_bit = (bits >> (category - 1)) & 1;
    if top_bit == 1 {
        Ok(bits as i32)
    } else {
        Ok(bits as i32 - ((1i32 << category) - 1))
    }
}
