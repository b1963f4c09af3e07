//! The entropy coder: DC differential + AC run-length coding of a single
//! zig-zag-ordered quantized block, serialized through a Huffman table pair
//! and a [`BitStreamWriter`]/[`BitStreamReader`] (spec.md §4.6, §4.7).
use crate::bitstream::{BitStreamReader, BitStreamWriter};
use crate::errors::DecodeError;
use crate::huffman::{HuffmanTable, EOB, ZRL};
use crate::vli;

/// The triple spec.md §3 calls a "data unit": a DC category/magnitude pair
/// plus the AC run-length token stream (including its `(0,0)`/`(15,0)`
/// terminators).
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct DataUnit {
    pub(crate) dc_category: u8,
    pub(crate) dc_magnitude_bits: u32,
    /// `(run_length, value)` pairs; `(0, 0)` is EOB, `(15, 0)` is ZRL.
    pub(crate) ac_tokens: Vec<(u8, i32)>,
}

impl DataUnit {
    /// Build a data unit from a zig-zag-ordered quantized block and the
    /// component's running DC predictor (not yet updated).
    pub(crate) fn build(zigzag: &[i32; 64], prev_dc: i32) -> Self {
        let dc_diff = zigzag[0] - prev_dc;
        let dc_category = vli::categorize(dc_diff);
        let dc_magnitude_bits = vli::magnitude_bits(dc_diff, dc_category);

        let ac_tokens = encode_ac_tokens(zigzag);

        DataUnit {
            dc_category,
            dc_magnitude_bits,
            ac_tokens,
        }
    }
}

/// spec.md §4.6 AC run-length algorithm: scan indices 1..63, run ZRL every
/// 16 zeros, terminate with EOB unless index 63 is the last nonzero.
fn encode_ac_tokens(zigzag: &[i32; 64]) -> Vec<(u8, i32)> {
    let last_nonzero = (1..64).rev().find(|&i| zigzag[i] != 0);
    let Some(last) = last_nonzero else {
        return vec![(0, 0)];
    };

    let mut tokens = Vec::new();
    let mut run = 0u8;
    for v in zigzag.iter().take(last + 1).skip(1) {
        if *v == 0 {
            run += 1;
            if run == 16 {
                tokens.push((15, 0));
                run = 0;
            }
        } else {
            tokens.push((run, *v));
            run = 0;
        }
    }
    if last < 63 {
        tokens.push((0, 0));
    }
    tokens
}

/// Encode one block: update `dc_predictor`, write the data unit's bits to
/// `writer` using `dc_table`/`ac_table`.
pub(crate) fn encode_block(
    writer: &mut BitStreamWriter,
    zigzag: &[i32; 64],
    dc_table: &HuffmanTable,
    ac_table: &HuffmanTable,
    dc_predictor: &mut i32,
) {
    let unit = DataUnit::build(zigzag, *dc_predictor);
    *dc_predictor = zigzag[0];

    let (code, len) = dc_table.code_for(unit.dc_category);
    writer.write_bits(code, len);
    if unit.dc_category > 0 {
        writer.write_bits(unit.dc_magnitude_bits, unit.dc_category);
    }

    for (run, value) in unit.ac_tokens {
        if (run, value) == (0, 0) {
            let (code, len) = ac_table.code_for(EOB);
            writer.write_bits(code, len);
        } else if (run, value) == (15, 0) {
            let (code, len) = ac_table.code_for(ZRL);
            writer.write_bits(code, len);
        } else {
            let category = vli::categorize(value);
            let symbol = (run << 4) | category;
            let (code, len) = ac_table.code_for(symbol);
            writer.write_bits(code, len);
            writer.write_bits(vli::magnitude_bits(value, category), category);
        }
    }
}

/// Decode one block from `reader`, updating `dc_predictor`, returning the
/// reconstructed zig-zag-ordered block. `block_index` is only used to
/// annotate a [`DecodeError::BlockOverflow`].
pub(crate) fn decode_block(
    reader: &mut BitStreamReader,
    dc_table: &HuffmanTable,
    ac_table: &HuffmanTable,
    dc_predictor: &mut i32,
    block_index: usize,
) -> Result<[i32; 64], DecodeError> {
    let mut block = [0i32; 64];

    let dc_category = dc_table.decode_symbol(reader)?;
    let dc_bits = reader.read_bits(dc_category)?;
    let dc_diff = vli::decode(dc_category, dc_bits)?;
    let dc = *dc_predictor + dc_diff;
    block[0] = dc;
    *dc_predictor = dc;

    let mut cursor = 1usize;
    while cursor < 64 {
        let symbol = ac_table.decode_symbol(reader)?;
        if symbol == EOB {
            break;
        }
        if symbol == ZRL {
            cursor += 16;
            if cursor > 64 {
                return Err(DecodeError::BlockOverflow { block_index });
            }
            continue;
        }
        let run = (symbol >> 4) & 0x0F;
        let category = symbol & 0x0F;
        cursor += usize::from(run);
        if cursor > 63 {
            return Err(DecodeError::BlockOverflow { block_index });
        }
        let bits = reader.read_bits(category)?;
        let value = vli::decode(category, bits)?;
        block[cursor] = value;
        cursor += 1;
    }

    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huffman::{default_ac_luminance, default_dc_luminance};

    fn round_trip(zigzag: &[i32; 64], prev_dc: i32) -> [i32; 64] {
        let dc_table = default_dc_luminance();
        let ac_table = default_ac_luminance();
        let mut writer = BitStreamWriter::new();
        let mut pred = prev_dc;
        encode_block(&mut writer, zigzag, &dc_table, &ac_table, &mut pred);
        let bytes = writer.finish();
        let mut reader = BitStreamReader::new(&bytes);
        let mut pred2 = prev_dc;
        decode_block(&mut reader, &dc_table, &ac_table, &mut pred2, 0).unwrap()
    }

    #[test]
    fn all_zero_block_round_trips() {
        // P6 / S1
        let block = [0i32; 64];
        assert_eq!(round_trip(&block, 0), block);
    }

    #[test]
    fn sparse_block_round_trips() {
        let mut block = [0i32; 64];
        block[0] = 5;
        block[3] = -2;
        block[10] = 1;
        block[63] = 4; // nonzero at index 63: no EOB emitted, still decodes.
        assert_eq!(round_trip(&block, 0), block);
    }

    #[test]
    fn sixteen_leading_zeros_then_value_emits_one_zrl() {
        // S4
        let mut block = [0i32; 64];
        block[16] = 1;
        let unit = DataUnit::build(&block, 0);
        assert_eq!(unit.ac_tokens[0], (15, 0));
        assert_eq!(unit.ac_tokens[1], (0, 1));
        assert_eq!(round_trip(&block, 0), block);
    }

    #[test]
    fn dc_predictor_chains_across_blocks() {
        let dc_table = default_dc_luminance();
        let ac_table = default_ac_luminance();
        let mut writer = BitStreamWriter::new();
        let mut pred = 0i32;
        let mut block_a = [0i32; 64];
        block_a[0] = 100;
        let mut block_b = [0i32; 64];
        block_b[0] = 80;
        encode_block(&mut writer, &block_a, &dc_table, &ac_table, &mut pred);
        encode_block(&mut writer, &block_b, &dc_table, &ac_table, &mut pred);
        let bytes = writer.finish();

        let mut reader = BitStreamReader::new(&bytes);
        let mut pred2 = 0i32;
        let decoded_a = decode_block(&mut reader, &dc_table, &ac_table, &mut pred2, 0).unwrap();
        let decoded_b = decode_block(&mut reader, &dc_table, &ac_table, &mut pred2, 1).unwrap();
        assert_eq!(decoded_a[0], 100);
        assert_eq!(decoded_b[0], 80);
    }

    #[test]
    fn truncated_stream_is_fatal() {
        let dc_table = default_dc_luminance();
        let ac_table = default_ac_luminance();
        let mut reader = BitStreamReader::new(&[]);
        let mut pred = 0i32;
        let err = decode_block(&mut reader, &dc_table, &ac_table, &mut pred, 0).unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedStream { .. } | DecodeError::HuffmanMiss { .. }));
    }
}
