//! Full encode/decode round trips through the public API only.
use baseline_jpeg_core::{decode, encode, ColorSpace, EncodeOptions, Image};

fn ramp_plane(width: u16, height: u16) -> Vec<u8> {
    let (w, h) = (usize::from(width), usize::from(height));
    (0..w * h).map(|i| ((i * 37) % 256) as u8).collect()
}

#[test]
fn quality_sweep_error_shrinks_as_quality_rises() {
    // P1: reconstruction error should not grow as quality increases.
    let image = Image::new_gray(32, 32, ramp_plane(32, 32));
    let mut last_mae = f64::MAX;
    for quality in [10u8, 40, 70, 95] {
        let bytes = encode(&image, &EncodeOptions::new(quality)).unwrap();
        let decoded = decode(&bytes).unwrap();
        let mae = mean_abs_error(&image.to_rgb(), &decoded.to_rgb());
        assert!(
            mae <= last_mae + 1.0,
            "quality {quality} regressed: mae={mae} previous={last_mae}"
        );
        last_mae = mae;
    }
}

#[test]
fn high_quality_gray_round_trip_is_visually_lossless() {
    let image = Image::new_gray(64, 48, ramp_plane(64, 48));
    let bytes = encode(&image, &EncodeOptions::new(100)).unwrap();
    let decoded = decode(&bytes).unwrap();
    let mae = mean_abs_error(&image.to_rgb(), &decoded.to_rgb());
    assert!(mae < 3.0, "mae too high at quality 100: {mae}");
}

#[test]
fn color_image_keeps_its_colorspace_through_the_round_trip() {
    let mut rgb = Vec::new();
    for y in 0..16u32 {
        for x in 0..16u32 {
            rgb.extend_from_slice(&[(x * 16) as u8, (y * 16) as u8, 200]);
        }
    }
    let image = Image::from_rgb(16, 16, &rgb);
    let bytes = encode(&image, &EncodeOptions::new(85)).unwrap();
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.colorspace(), ColorSpace::Ycbcr);
    let mae = mean_abs_error(&rgb, &decoded.to_rgb());
    assert!(mae < 15.0, "color round trip mae too high: {mae}");
}

#[test]
fn dimensions_that_are_not_multiples_of_eight_survive_padding_and_cropping() {
    // S3
    for (w, h) in [(10u16, 13u16), (1, 1), (9, 8), (8, 9), (17, 3)] {
        let image = Image::new_gray(w, h, ramp_plane(w, h));
        let bytes = encode(&image, &EncodeOptions::new(60)).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.width(), w);
        assert_eq!(decoded.height(), h);
    }
}

#[test]
fn truncated_stream_returns_an_error_never_panics() {
    // S6
    let image = Image::new_gray(16, 16, ramp_plane(16, 16));
    let bytes = encode(&image, &EncodeOptions::new(50)).unwrap();
    for cut in [2usize, bytes.len() / 2, bytes.len() - 1] {
        let result = std::panic::catch_unwind(|| decode(&bytes[..cut]));
        assert!(result.is_ok(), "decode panicked on a {cut}-byte prefix");
        assert!(result.unwrap().is_err());
    }
}

#[test]
fn garbage_input_is_rejected_without_panicking() {
    let result = std::panic::catch_unwind(|| decode(&[0u8; 32]));
    assert!(result.is_ok());
    assert!(result.unwrap().is_err());
}

#[test]
fn out_of_range_quality_is_rejected() {
    let image = Image::new_gray(8, 8, vec![128u8; 64]);
    assert!(encode(&image, &EncodeOptions::new(0)).is_err());
    assert!(encode(&image, &EncodeOptions::new(255)).is_err());
}

fn mean_abs_error(a: &[u8], b: &[u8]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (i32::from(x) - i32::from(y)).unsigned_abs() as f64)
        .sum::<f64>()
        / a.len() as f64
}
