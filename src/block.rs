//! Spatial decomposition and quantization glue between a sample plane and
//! the zig-zag quantized blocks the entropy coder consumes (spec.md §3, §4.5,
//! §4.6).
use crate::dct::{forward_dct, inverse_dct};
use crate::quant::QuantTable;
use crate::zigzag::{from_zigzag, to_zigzag, UNZIGZAG};

/// Round `width`/`height` up to the next multiple of 8.
pub(crate) fn padded_dims(width: usize, height: usize) -> (usize, usize) {
    let pad = |v: usize| (v + 7) / 8 * 8;
    (pad(width), pad(height))
}

/// Pad a row-major plane to a whole number of 8x8 blocks, filling new rows
/// and columns with 0 (matching the reference implementation's
/// `np.pad(..., constant_values=0)`).
pub(crate) fn pad_plane(plane: &[u8], width: usize, height: usize) -> (Vec<u8>, usize, usize) {
    let (pw, ph) = padded_dims(width, height);
    let mut out = vec![0u8; pw * ph];
    for row in 0..height {
        out[row * pw..row * pw + width].copy_from_slice(&plane[row * width..row * width + width]);
    }
    (out, pw, ph)
}

/// Extract the 8x8 block at `(block_x, block_y)` (in block units) from a
/// padded plane, level-shifted by subtracting 128, in natural row-major
/// order.
pub(crate) fn extract_block(padded: &[u8], padded_width: usize, block_x: usize, block_y: usize) -> [i32; 64] {
    let mut out = [0i32; 64];
    let base_row = block_y * 8;
    let base_col = block_x * 8;
    for r in 0..8 {
        for c in 0..8 {
            let sample = padded[(base_row + r) * padded_width + base_col + c];
            out[r * 8 + c] = i32::from(sample) - 128;
        }
    }
    out
}

/// Write a decoded 8x8 block (already level-shifted back, `[0, 255]`) into
/// a padded plane at `(block_x, block_y)`.
pub(crate) fn store_block(padded: &mut [u8], padded_width: usize, block_x: usize, block_y: usize, samples: &[u8; 64]) {
    let base_row = block_y * 8;
    let base_col = block_x * 8;
    for r in 0..8 {
        for c in 0..8 {
            padded[(base_row + r) * padded_width + base_col + c] = samples[r * 8 + c];
        }
    }
}

/// Forward DCT + quantize a level-shifted spatial block, returning the
/// quantized coefficients in zig-zag order (index 0 = DC).
pub(crate) fn forward_block(spatial: &[i32; 64], quant_zigzag: &QuantTable) -> [i32; 64] {
    let freq = forward_dct(spatial);
    let mut natural = [0i32; 64];
    for n in 0..64 {
        let q = f32::from(quant_zigzag[UNZIGZAG[n]]);
        natural[n] = (freq[n] / q).round() as i32;
    }
    to_zigzag(&natural)
}

/// Dequantize + inverse DCT a zig-zag-ordered quantized block back into
/// `[0, 255]` samples, in natural row-major order.
pub(crate) fn inverse_block(zigzag_coeffs: &[i32; 64], quant_zigzag: &QuantTable) -> [u8; 64] {
    let natural_coeffs = from_zigzag(zigzag_coeffs);
    let mut freq = [0f32; 64];
    for n in 0..64 {
        let q = f32::from(quant_zigzag[UNZIGZAG[n]]);
        freq[n] = natural_coeffs[n] as f32 * q;
    }
    inverse_dct(&freq)
}
