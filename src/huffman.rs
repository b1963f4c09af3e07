//! Canonical Huffman table construction (spec.md §4.4), encode and decode.
//!
//! The decode side is the teacher's `maxcode`/`delta` acceleration idea
//! (see `zune-jpeg`'s `huffman.rs`) reduced to its non-SIMD essentials: a
//! length-indexed `mincode`/`maxcode`/`valptr` triple plus a flat
//! `HUFFVAL` array, exactly as T.81 Annex C/F describe it. No string keys,
//! no per-bit allocation.
use crate::bitstream::BitStreamReader;
use crate::errors::DecodeError;

const NO_CODE: i32 = -1;

/// An immutable canonical Huffman table: BITS/HUFFVAL plus the derived
/// forward (symbol -> code, length) and decode (mincode/maxcode/valptr)
/// structures.
#[derive(Clone, Debug)]
pub(crate) struct HuffmanTable {
    /// `code[symbol]`, valid only where `present[symbol]` is true.
    code: [u16; 256],
    /// `length[symbol]` in bits, valid only where `present[symbol]` is true.
    length: [u8; 256],
    present: [bool; 256],

    huffval: Vec<u8>,
    mincode: [i32; 17],
    maxcode: [i32; 17],
    valptr: [i32; 17],
}

impl HuffmanTable {
    /// Build a table from a BITS histogram (16 counts, index 0 = codes of
    /// length 1) and the HUFFVAL symbol list in canonical order.
    ///
    /// Returns `TableInconsistency` if `sum(bits) != huffval.len()` or the
    /// table would need codes longer than 16 bits.
    pub(crate) fn build(bits: &[u8; 16], huffval: Vec<u8>) -> Result<Self, DecodeError> {
        let total: usize = bits.iter().map(|&b| b as usize).sum();
        if total != huffval.len() {
            return Err(DecodeError::TableInconsistency(format!(
                "BITS sums to {total} codes but HUFFVAL has {} symbols",
                huffval.len()
            )));
        }

        let mut code = [0u16; 256];
        let mut length = [0u8; 256];
        let mut present = [false; 256];

        let mut mincode = [NO_CODE; 17];
        let mut maxcode = [NO_CODE; 17];
        let mut valptr = [0i32; 17];

        let mut running_code: u32 = 0;
        let mut p: usize = 0;
        for len in 1..=16usize {
            let count = bits[len - 1] as usize;
            if count == 0 {
                maxcode[len] = NO_CODE;
                running_code <<= 1;
                continue;
            }
            valptr[len] = p as i32;
            mincode[len] = running_code as i32;
            for _ in 0..count {
                let symbol = huffval[p];
                code[symbol as usize] = running_code as u16;
                length[symbol as usize] = len as u8;
                present[symbol as usize] = true;
                running_code += 1;
                p += 1;
            }
            maxcode[len] = (running_code - 1) as i32;
            running_code <<= 1;
        }

        Ok(HuffmanTable {
            code,
            length,
            present,
            huffval,
            mincode,
            maxcode,
            valptr,
        })
    }

    /// `(code, length)` for `symbol`, MSB-first, ready to feed to
    /// [`crate::bitstream::BitStreamWriter::write_bits`]. Panics if the
    /// symbol has no code - callers only ever look up symbols they
    /// themselves derived from this table's own HUFFVAL (DC categories
    /// 0..=11, AC run/category bytes), so this is a programmer error, not
    /// a malformed-input condition.
    pub(crate) fn code_for(&self, symbol: u8) -> (u32, u8) {
        debug_assert!(
            self.present[symbol as usize],
            "no code for symbol {symbol} in this table"
        );
        (u32::from(self.code[symbol as usize]), self.length[symbol as usize])
    }

    /// Decode the next symbol from `reader`. Fatal [`DecodeError::HuffmanMiss`]
    /// if no code of length <= 16 matches.
    pub(crate) fn decode_symbol(&self, reader: &mut BitStreamReader) -> Result<u8, DecodeError> {
        let mut code: i32 = 0;
        for len in 1..=16usize {
            let bit = reader.read_bit().ok_or(DecodeError::TruncatedStream {
                offset: reader.byte_offset(),
            })?;
            code = (code << 1) | i32::from(bit);
            if self.maxcode[len] != NO_CODE && code <= self.maxcode[len] {
                let idx = (self.valptr[len] + code - self.mincode[len]) as usize;
                return Ok(self.huffval[idx]);
            }
        }
        Err(DecodeError::HuffmanMiss {
            offset: reader.byte_offset(),
        })
    }
}

// ---- Standard Annex-K default tables ----
// Sourced from the JPEG standard and cross-checked against
// examples/original_source/algs/huffman.py's DEFAULT_* constants.

pub(crate) const DC_LUMINANCE_BITS: [u8; 16] = [0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0];
pub(crate) const DC_LUMINANCE_VALUES: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

pub(crate) const DC_CHROMINANCE_BITS: [u8; 16] = [0, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0];
pub(crate) const DC_CHROMINANCE_VALUES: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

pub(crate) const AC_LUMINANCE_BITS: [u8; 16] = [0, 2, 1, 3, 3, 2, 4, 3, 5, 5, 4, 4, 0, 0, 1, 125];
#[rustfmt::skip]
pub(crate) const AC_LUMINANCE_VALUES: [u8; 162] = [
    0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12, 0x21, 0x31, 0x41, 0x06,
    0x13, 0x51, 0x61, 0x07, 0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xA1, 0x08,
    0x23, 0x42, 0xB1, 0xC1, 0x15, 0x52, 0xD1, 0xF0, 0x24, 0x33, 0x62, 0x72,
    0x82, 0x09, 0x0A, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x25, 0x26, 0x27, 0x28,
    0x29, 0x2A, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3A, 0x43, 0x44, 0x45,
    0x46, 0x47, 0x48, 0x49, 0x4A, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59,
    0x5A, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0x6A, 0x73, 0x74, 0x75,
    0x76, 0x77, 0x78, 0x79, 0x7A, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89,
    0x8A, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9A, 0xA2, 0xA3,
    0xA4, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9, 0xAA, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6,
    0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7, 0xC8, 0xC9,
    0xCA, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA, 0xE1, 0xE2,
    0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xEA, 0xF1, 0xF2, 0xF3, 0xF4,
    0xF5, 0xF6, 0xF7, 0xF8, 0xF9, 0xFA,
];

pub(crate) const AC_CHROMINANCE_BITS: [u8; 16] = [0, 2, 1, 2, 4, 4, 3, 4, 7, 5, 4, 4, 0, 1, 2, 119];
#[rustfmt::skip]
pub(crate) const AC_CHROMINANCE_VALUES: [u8; 162] = [
    0x00, 0x01, 0x02, 0x03, 0x11, 0x04, 0x05, 0x21, 0x31, 0x06, 0x12, 0x41,
    0x51, 0x07, 0x61, 0x71, 0x13, 0x22, 0x32, 0x81, 0x08, 0x14, 0x42, 0x91,
    0xA1, 0xB1, 0xC1, 0x09, 0x23, 0x33, 0x52, 0xF0, 0x15, 0x62, 0x72, 0xD1,
    0x0A, 0x16, 0x24, 0x34, 0xE1, 0x25, 0xF1, 0x17, 0x18, 0x19, 0x1A, 0x26,
    0x27, 0x28, 0x29, 0x2A, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3A, 0x43, 0x44,
    0x45, 0x46, 0x47, 0x48, 0x49, 0x4A, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58,
    0x59, 0x5A, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0x6A, 0x73, 0x74,
    0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87,
    0x88, 0x89, 0x8A, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9A,
    0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9, 0xAA, 0xB2, 0xB3, 0xB4,
    0xB5, 0xB6, 0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7,
    0xC8, 0xC9, 0xCA, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA,
    0xE2, 0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xEA, 0xF2, 0xF3, 0xF4,
    0xF5, 0xF6, 0xF7, 0xF8, 0xF9, 0xFA,
];

/// AC run-length/EOB special symbols (spec.md §4.6).
pub(crate) const EOB: u8 = 0x00;
pub(crate) const ZRL: u8 = 0xF0;

pub(crate) fn default_dc_luminance() -> HuffmanTable {
    HuffmanTable::build(&DC_LUMINANCE_BITS, DC_LUMINANCE_VALUES.to_vec()).expect("built-in table")
}

pub(crate) fn default_dc_chrominance() -> HuffmanTable {
    HuffmanTable::build(&DC_CHROMINANCE_BITS, DC_CHROMINANCE_VALUES.to_vec()).expect("built-in table")
}

pub(crate) fn default_ac_luminance() -> HuffmanTable {
    HuffmanTable::build(&AC_LUMINANCE_BITS, AC_LUMINANCE_VALUES.to_vec()).expect("built-in table")
}

pub(crate) fn default_ac_chrominance() -> HuffmanTable {
    HuffmanTable::build(&AC_CHROMINANCE_BITS, AC_CHROMINANCE_VALUES.to_vec()).expect("built-in table")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstream::BitStreamWriter;

    #[test]
    fn every_default_table_round_trips_every_symbol() {
        // P3
        for (bits, values) in [
            (DC_LUMINANCE_BITS, DC_LUMINANCE_VALUES.to_vec()),
            (DC_CHROMINANCE_BITS, DC_CHROMINANCE_VALUES.to_vec()),
            (AC_LUMINANCE_BITS, AC_LUMINANCE_VALUES.to_vec()),
            (AC_CHROMINANCE_BITS, AC_CHROMINANCE_VALUES.to_vec()),
        ] {
            let table = HuffmanTable::build(&bits, values.clone()).unwrap();
            for &symbol in &values {
                let mut w = BitStreamWriter::new();
                let (code, len) = table.code_for(symbol);
                w.write_bits(code, len);
                let bytes = w.finish();
                let mut r = BitStreamReader::new(&bytes);
                let decoded = table.decode_symbol(&mut r).unwrap();
                assert_eq!(decoded, symbol);
            }
        }
    }

    #[test]
    fn mismatched_bits_and_huffval_is_an_error() {
        let bits = [1u8; 16];
        let err = HuffmanTable::build(&bits, vec![0, 1]).unwrap_err();
        assert!(matches!(err, DecodeError::TableInconsistency(_)));
    }

    #[test]
    fn corrupt_stream_misses_after_max_len_bits() {
        let table = default_dc_luminance();
        // 16 one-bits (written through the writer so any FF gets stuffed
        // correctly) is not a prefix of any code this table defines.
        let mut w = BitStreamWriter::new();
        w.write_bits(0xFFFF, 16);
        let bytes = w.finish();
        let mut r = BitStreamReader::new(&bytes);
        let err = table.decode_symbol(&mut r).unwrap_err();
        assert!(matches!(err, DecodeError::HuffmanMiss { .. }));
    }
}
