//! The fixed 64-entry zig-zag traversal of an 8x8 matrix.
//!
//! `ZIGZAG[i]` is the natural (row-major) index visited at zig-zag position
//! `i`; `UNZIGZAG[i]` is its inverse (natural index `i`'s zig-zag position).
#[rustfmt::skip]
pub(crate) const ZIGZAG: [usize; 64] = [
     0,  1,  8, 16,  9,  2,  3, 10,
    17, 24, 32, 25, 18, 11,  4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13,  6,  7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

#[rustfmt::skip]
pub(crate) const UNZIGZAG: [usize; 64] = [
     0,  1,  5,  6, 14, 15, 27, 28,
     2,  4,  7, 13, 16, 26, 29, 42,
     3,  8, 12, 17, 25, 30, 41, 43,
     9, 11, 18, 24, 31, 40, 44, 53,
    10, 19, 23, 32, 39, 45, 52, 54,
    20, 22, 33, 38, 46, 51, 55, 60,
    21, 34, 37, 47, 50, 56, 59, 61,
    35, 36, 48, 49, 57, 58, 62, 63,
];

/// Reorder a natural-order (row-major) 8x8 block into zig-zag order.
pub(crate) fn to_zigzag(natural: &[i32; 64]) -> [i32; 64] {
    let mut out = [0i32; 64];
    for (zz, &nat) in ZIGZAG.iter().enumerate() {
        out[zz] = natural[nat];
    }
    out
}

/// Reorder a zig-zag-order 8x8 block back into natural (row-major) order.
pub(crate) fn from_zigzag(zigzag: &[i32; 64]) -> [i32; 64] {
    let mut out = [0i32; 64];
    for (zz, &nat) in ZIGZAG.iter().enumerate() {
        out[nat] = zigzag[zz];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_and_unzigzag_agree() {
        for i in 0..64 {
            assert_eq!(UNZIGZAG[ZIGZAG[i]], i);
        }
    }

    #[test]
    fn round_trip_is_identity() {
        // P5
        let mut block = [0i32; 64];
        for (i, v) in block.iter_mut().enumerate() {
            *v = i as i32 * 3 - 17;
        }
        let zz = to_zigzag(&block);
        let back = from_zigzag(&zz);
        assert_eq!(block, back);
    }

    #[test]
    fn dc_is_top_left() {
        let mut block = [0i32; 64];
        block[0] = 42;
        let zz = to_zigzag(&block);
        assert_eq!(zz[0], 42);
    }
}
