//! Forward and inverse 2-D DCT-II on 8x8 blocks.
//!
//! This is the direct separable formulation (two 1-D transforms, rows then
//! columns) rather than the teacher's AAN butterfly network in its
//! `idct.rs` - the butterfly form only exists for the inverse direction and
//! this crate needs both directions to agree bit-for-bit in the tests that
//! round-trip through it, so a single symmetric implementation is used for
//! both and precision is preferred to speed.
const N: usize = 8;

/// `COS[x][u] = cos((2x + 1) * u * PI / 16)`, shared by the forward and
/// inverse transforms.
fn cos_table() -> [[f32; N]; N] {
    let mut table = [[0f32; N]; N];
    for (x, row) in table.iter_mut().enumerate() {
        for (u, cell) in row.iter_mut().enumerate() {
            *cell = (((2 * x + 1) as f32) * (u as f32) * std::f32::consts::PI / 16.0).cos();
        }
    }
    table
}

fn c(u: usize) -> f32 {
    if u == 0 {
        std::f32::consts::FRAC_1_SQRT_2
    } else {
        1.0
    }
}

/// One 1-D DCT-II of length 8 on `input`, writing into `output`.
fn dct_1d(input: &[f32; N], output: &mut [f32; N], cos: &[[f32; N]; N]) {
    for (u, out) in output.iter_mut().enumerate() {
        let mut sum = 0.0f32;
        for (x, &v) in input.iter().enumerate() {
            sum += v * cos[x][u];
        }
        *out = 0.5 * c(u) * sum;
    }
}

/// One 1-D inverse DCT-II (DCT-III) of length 8.
fn idct_1d(input: &[f32; N], output: &mut [f32; N], cos: &[[f32; N]; N]) {
    for (x, out) in output.iter_mut().enumerate() {
        let mut sum = 0.0f32;
        for (u, &v) in input.iter().enumerate() {
            sum += c(u) * v * cos[x][u];
        }
        *out = 0.5 * sum;
    }
}

/// Forward 2-D DCT-II of an 8x8, level-shifted (`s - 128`) block of
/// samples, in row-major order. Returns unrounded frequency-domain
/// coefficients; the caller divides by the quantization table and rounds.
pub(crate) fn forward_dct(samples: &[i32; 64]) -> [f32; 64] {
    let cos = cos_table();
    let mut centered = [0f32; 64];
    for (c, &s) in centered.iter_mut().zip(samples.iter()) {
        *c = s as f32;
    }

    // Rows.
    let mut rows_out = [0f32; 64];
    for r in 0..N {
        let mut row_in = [0f32; N];
        row_in.copy_from_slice(&centered[r * N..r * N + N]);
        let mut row_out = [0f32; N];
        dct_1d(&row_in, &mut row_out, &cos);
        rows_out[r * N..r * N + N].copy_from_slice(&row_out);
    }

    // Columns.
    let mut out = [0f32; 64];
    for col in 0..N {
        let mut col_in = [0f32; N];
        for r in 0..N {
            col_in[r] = rows_out[r * N + col];
        }
        let mut col_out = [0f32; N];
        dct_1d(&col_in, &mut col_out, &cos);
        for r in 0..N {
            out[r * N + col] = col_out[r];
        }
    }
    out
}

/// Inverse 2-D DCT of an 8x8 block of (dequantized) coefficients, in
/// row-major order. Adds back the level shift and clamps to `[0, 255]`.
pub(crate) fn inverse_dct(coeffs: &[f32; 64]) -> [u8; 64] {
    let cos = cos_table();

    let mut cols_out = [0f32; 64];
    for col in 0..N {
        let mut col_in = [0f32; N];
        for r in 0..N {
            col_in[r] = coeffs[r * N + col];
        }
        let mut col_out = [0f32; N];
        idct_1d(&col_in, &mut col_out, &cos);
        for r in 0..N {
            cols_out[r * N + col] = col_out[r];
        }
    }

    let mut out = [0u8; 64];
    for r in 0..N {
        let mut row_in = [0f32; N];
        row_in.copy_from_slice(&cols_out[r * N..r * N + N]);
        let mut row_out = [0f32; N];
        idct_1d(&row_in, &mut row_out, &cos);
        for (i, &v) in row_out.iter().enumerate() {
            let sample = (v + 128.0).round();
            out[r * N + i] = sample.clamp(0.0, 255.0) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_block_round_trips_exactly() {
        // Raw pixel value 128, already level-shifted by the caller (as
        // `block::extract_block` does) to 0 before reaching the DCT.
        let samples = [0i32; 64];
        let freq = forward_dct(&samples);
        // a flat block should carry all of its energy in the DC term.
        assert!(freq[1..].iter().all(|&v| v.abs() < 1e-3));
        let back = inverse_dct(&freq);
        assert_eq!(back, [128u8; 64]);
    }

    #[test]
    fn ramp_round_trips_within_rounding_error() {
        let mut samples = [0i32; 64];
        for (i, s) in samples.iter_mut().enumerate() {
            *s = ((i % 8) * 16) as i32 - 128;
        }
        let freq = forward_dct(&samples);
        let back = inverse_dct(&freq);
        for (i, &b) in back.iter().enumerate() {
            let expected = (samples[i] + 128).clamp(0, 255) as i32;
            assert!((i32::from(b) - expected).abs() <= 1, "index {i}: {b} vs {expected}");
        }
    }
}
