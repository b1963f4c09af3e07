//! Quality-scaled quantization tables (Annex-K base matrices).
use crate::zigzag::to_zigzag;

/// Standard luminance base matrix, natural (row-major) order.
#[rustfmt::skip]
const BASE_LUMINANCE: [i32; 64] = [
    16, 11, 10, 16,  24,  40,  51,  61,
    12, 12, 14, 19,  26,  58,  60,  55,
    14, 13, 16, 24,  40,  57,  69,  56,
    14, 17, 22, 29,  51,  87,  80,  62,
    18, 22, 37, 56,  68, 109, 103,  77,
    24, 35, 55, 64,  81, 104, 113,  92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103,  99,
];

/// Standard chrominance base matrix, natural (row-major) order.
#[rustfmt::skip]
const BASE_CHROMINANCE: [i32; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];

/// An 8x8 quantization matrix, stored in zig-zag order (as it is written
/// into a DQT segment and as the block pipeline consumes it).
pub type QuantTable = [u16; 64];

/// Scale a base matrix by `quality` (clamped to `[1, 100]` by the caller)
/// per spec.md §3: `S = 5000/Q` for `Q<50`, else `200 - 2Q`;
/// `q' = clamp(floor((S*q + 50)/100), 1, 255)`.
fn scale_base(base: &[i32; 64], quality: u8) -> QuantTable {
    let q = i64::from(quality.clamp(1, 100));
    let s = if q < 50 { 5000 / q } else { 200 - 2 * q };
    let mut natural = [0i32; 64];
    for (i, &b) in base.iter().enumerate() {
        let scaled = (s * i64::from(b) + 50) / 100;
        natural[i] = scaled.clamp(1, 255) as i32;
    }
    let zz = to_zigzag(&natural);
    let mut out: QuantTable = [0u16; 64];
    for (o, v) in out.iter_mut().zip(zz.iter()) {
        *o = *v as u16;
    }
    out
}

pub(crate) fn luminance_table(quality: u8) -> QuantTable {
    scale_base(&BASE_LUMINANCE, quality)
}

pub(crate) fn chrominance_table(quality: u8) -> QuantTable {
    scale_base(&BASE_CHROMINANCE, quality)
}

/// A quantization matrix of all ones, in zig-zag order. Used by the
/// degenerate lossless check in P1 (quality=100 with this table produces
/// zero reconstruction error).
#[cfg(test)]
pub(crate) fn all_ones_table() -> QuantTable {
    [1u16; 64]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_100_is_gentle() {
        let t = luminance_table(100);
        // at Q=100, S = 0, so every entry clamps to the floor of 1.
        assert!(t.iter().all(|&v| v == 1));
    }

    #[test]
    fn low_quality_scales_up() {
        let lo = luminance_table(1);
        let hi = luminance_table(90);
        assert!(lo.iter().sum::<u16>() > hi.iter().sum::<u16>());
    }

    #[test]
    fn values_are_always_in_range() {
        for q in 1..=100u8 {
            for v in luminance_table(q) {
                assert!((1..=255).contains(&v));
            }
            for v in chrominance_table(q) {
                assert!((1..=255).contains(&v));
            }
        }
    }
}
