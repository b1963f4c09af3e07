//! The raster data model: [`Image`] and [`ColorSpace`] (spec.md §3, §6).
use crate::color::{rgb_to_ycbcr, ycbcr_to_rgb};

/// Colorspace of an [`Image`]'s sample planes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ColorSpace {
    /// A single luminance plane.
    Gray,
    /// Three planes: Y, Cb, Cr.
    Ycbcr,
}

/// A decoded or to-be-encoded raster: width, height, and one 8-bit sample
/// plane per channel, each `width * height` samples in row-major order.
#[derive(Debug, Clone)]
pub struct Image {
    width: u16,
    height: u16,
    colorspace: ColorSpace,
    planes: Vec<Vec<u8>>,
}

impl Image {
    /// Build a grayscale image from a single 8-bit plane.
    ///
    /// # Panics
    /// If `plane.len() != width as usize * height as usize`.
    pub fn new_gray(width: u16, height: u16, plane: Vec<u8>) -> Self {
        assert_eq!(plane.len(), usize::from(width) * usize::from(height));
        Image {
            width,
            height,
            colorspace: ColorSpace::Gray,
            planes: vec![plane],
        }
    }

    /// Build a YCbCr image directly from its three planes (already
    /// converted). Prefer [`Image::from_rgb`] when starting from RGB.
    ///
    /// # Panics
    /// If any plane's length does not match `width * height`.
    pub fn new_ycbcr(width: u16, height: u16, y: Vec<u8>, cb: Vec<u8>, cr: Vec<u8>) -> Self {
        let expected = usize::from(width) * usize::from(height);
        assert_eq!(y.len(), expected);
        assert_eq!(cb.len(), expected);
        assert_eq!(cr.len(), expected);
        Image {
            width,
            height,
            colorspace: ColorSpace::Ycbcr,
            planes: vec![y, cb, cr],
        }
    }

    /// Convert an interleaved 8-bit RGB buffer (`r0 g0 b0 r1 g1 b1 ...`)
    /// into a YCbCr [`Image`].
    ///
    /// # Panics
    /// If `rgb.len() != 3 * width as usize * height as usize`.
    pub fn from_rgb(width: u16, height: u16, rgb: &[u8]) -> Self {
        let count = usize::from(width) * usize::from(height);
        assert_eq!(rgb.len(), count * 3);
        let mut y = Vec::with_capacity(count);
        let mut cb = Vec::with_capacity(count);
        let mut cr = Vec::with_capacity(count);
        for px in rgb.chunks_exact(3) {
            let (yy, ccb, ccr) = rgb_to_ycbcr(px[0], px[1], px[2]);
            y.push(yy);
            cb.push(ccb);
            cr.push(ccr);
        }
        Image::new_ycbcr(width, height, y, cb, cr)
    }

    /// Convert this image back to an interleaved 8-bit RGB buffer.
    /// Replicates the gray plane across all three channels for grayscale
    /// images.
    pub fn to_rgb(&self) -> Vec<u8> {
        let count = usize::from(self.width) * usize::from(self.height);
        let mut out = Vec::with_capacity(count * 3);
        match self.colorspace {
            ColorSpace::Gray => {
                for &g in &self.planes[0] {
                    out.extend_from_slice(&[g, g, g]);
                }
            }
            ColorSpace::Ycbcr => {
                for i in 0..count {
                    let (r, g, b) =
                        ycbcr_to_rgb(self.planes[0][i], self.planes[1][i], self.planes[2][i]);
                    out.extend_from_slice(&[r, g, b]);
                }
            }
        }
        out
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn colorspace(&self) -> ColorSpace {
        self.colorspace
    }

    pub(crate) fn plane(&self, index: usize) -> &[u8] {
        &self.planes[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_round_trips_through_rgb() {
        let img = Image::new_gray(2, 2, vec![10, 20, 30, 40]);
        let rgb = img.to_rgb();
        assert_eq!(rgb, vec![10, 10, 10, 20, 20, 20, 30, 30, 30, 40, 40, 40]);
    }

    #[test]
    fn rgb_round_trips_through_ycbcr() {
        let rgb_in = vec![255u8, 0, 0, 0, 255, 0, 0, 0, 255, 128, 128, 128];
        let img = Image::from_rgb(2, 2, &rgb_in);
        assert_eq!(img.colorspace(), ColorSpace::Ycbcr);
        let rgb_out = img.to_rgb();
        for (a, b) in rgb_in.iter().zip(rgb_out.iter()) {
            assert!((i16::from(*a) - i16::from(*b)).abs() <= 2);
        }
    }
}
