//! Top-level encode pipeline: raster -> framed byte stream (spec.md §6).
use log::debug;

use crate::bitstream::BitStreamWriter;
use crate::block::{forward_block, pad_plane, padded_dims};
use crate::component::{Component, ComponentId};
use crate::entropy::encode_block;
use crate::errors::EncodeError;
use crate::headers::{write_dht, write_dqt, write_eoi, write_sof0, write_soi, write_sos_header};
use crate::huffman::{
    default_ac_chrominance, default_ac_luminance, default_dc_chrominance, default_dc_luminance,
    AC_CHROMINANCE_BITS, AC_CHROMINANCE_VALUES, AC_LUMINANCE_BITS, AC_LUMINANCE_VALUES,
    DC_CHROMINANCE_BITS, DC_CHROMINANCE_VALUES, DC_LUMINANCE_BITS, DC_LUMINANCE_VALUES,
};
use crate::image::{ColorSpace, Image};
use crate::quant::{chrominance_table, luminance_table, QuantTable};
use crate::threads::parallel_fill;

/// Encoder configuration. Quality is the only required knob; the
/// quantization tables default to the standard Annex-K matrices scaled by
/// it, but a caller that already has its own tables (e.g. matching another
/// encoder bit-for-bit) can supply them instead, mirroring the teacher's
/// `Decoder` builder methods (`set_output_colorspace`, etc.).
#[derive(Clone)]
pub struct EncodeOptions {
    quality: u8,
    luminance_table: Option<QuantTable>,
    chrominance_table: Option<QuantTable>,
}

impl EncodeOptions {
    /// `quality` must be in `[1, 100]`; out-of-range values are only
    /// rejected when [`encode`] actually runs, so this constructor never
    /// fails.
    pub fn new(quality: u8) -> Self {
        EncodeOptions {
            quality,
            luminance_table: None,
            chrominance_table: None,
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Override the default quality-scaled luminance quantization table
    /// with a caller-supplied one, in zig-zag storage order.
    pub fn with_luminance_table(mut self, table: QuantTable) -> Self {
        self.luminance_table = Some(table);
        self
    }

    /// Override the default quality-scaled chrominance quantization table
    /// with a caller-supplied one, in zig-zag storage order.
    pub fn with_chrominance_table(mut self, table: QuantTable) -> Self {
        self.chrominance_table = Some(table);
        self
    }
}

/// Encode `image` into a self-contained baseline-JPEG-shaped byte stream.
pub fn encode(image: &Image, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    let quality = options.quality;
    if quality == 0 || quality > 100 {
        return Err(EncodeError::InvalidQuality(quality));
    }

    let width = image.width();
    let height = image.height();
    let (padded_width, padded_height) = padded_dims(usize::from(width), usize::from(height));
    let blocks_wide = padded_width / 8;
    let blocks_high = padded_height / 8;

    let luma_quant = options.luminance_table.unwrap_or_else(|| luminance_table(quality));
    debug!("derived luminance quant table at quality {quality}");

    let mut components = Vec::new();
    match image.colorspace() {
        ColorSpace::Gray => {
            components.push(Component::new(ComponentId::Gray, 0, 0, 0));
        }
        ColorSpace::Ycbcr => {
            components.push(Component::new(ComponentId::Y, 0, 0, 0));
            components.push(Component::new(ComponentId::Cb, 1, 1, 1));
            components.push(Component::new(ComponentId::Cr, 1, 1, 1));
        }
    }
    let needs_chroma_tables = components.iter().any(|c| c.quant_table_selector == 1);
    let chroma_quant = needs_chroma_tables.then(|| {
        options
            .chrominance_table
            .unwrap_or_else(|| chrominance_table(quality))
    });

    // Forward DCT + quantize every component's blocks; this is the one
    // pass spec.md §5 allows off the main thread, one threadpool scope
    // per component.
    let mut per_component_blocks: Vec<Vec<[i32; 64]>> = Vec::with_capacity(components.len());
    for comp in &components {
        let plane = image.plane(component_plane_index(comp.id));
        let (padded, pw, _ph) = pad_plane(plane, usize::from(width), usize::from(height));
        let quant = if comp.quant_table_selector == 0 {
            &luma_quant
        } else {
            chroma_quant.as_ref().expect("chroma table computed above")
        };
        let mut blocks = vec![[0i32; 64]; blocks_wide * blocks_high];
        parallel_fill(&mut blocks, |i| {
            let bx = i % blocks_wide;
            let by = i / blocks_wide;
            let spatial = crate::block::extract_block(&padded, pw, bx, by);
            forward_block(&spatial, quant)
        });
        per_component_blocks.push(blocks);
    }

    // Entropy coding is strictly sequential: the DC predictor chain and
    // bit concatenation forbid splitting this across threads.
    let mut predictors = vec![0i32; components.len()];
    let dc_luma = default_dc_luminance();
    let ac_luma = default_ac_luminance();
    let dc_chroma = needs_chroma_tables.then(default_dc_chrominance);
    let ac_chroma = needs_chroma_tables.then(default_ac_chrominance);

    let mut writer = BitStreamWriter::new();
    for by in 0..blocks_high {
        for bx in 0..blocks_wide {
            let block_index = by * blocks_wide + bx;
            for (comp_index, comp) in components.iter().enumerate() {
                let zigzag = &per_component_blocks[comp_index][block_index];
                let (dc_table, ac_table) = if comp.dc_table_selector == 0 {
                    (&dc_luma, &ac_luma)
                } else {
                    (
                        dc_chroma.as_ref().expect("chroma huffman computed above"),
                        ac_chroma.as_ref().expect("chroma huffman computed above"),
                    )
                };
                encode_block(&mut writer, zigzag, dc_table, ac_table, &mut predictors[comp_index]);
            }
        }
    }
    let entropy_bytes = writer.finish();

    let mut out = Vec::new();
    write_soi(&mut out);
    write_dqt(&mut out, 0, &luma_quant);
    if let Some(chroma) = &chroma_quant {
        write_dqt(&mut out, 1, chroma);
    }
    write_dht(&mut out, false, 0, &DC_LUMINANCE_BITS, &DC_LUMINANCE_VALUES);
    write_dht(&mut out, true, 0, &AC_LUMINANCE_BITS, &AC_LUMINANCE_VALUES);
    if needs_chroma_tables {
        write_dht(&mut out, false, 1, &DC_CHROMINANCE_BITS, &DC_CHROMINANCE_VALUES);
        write_dht(&mut out, true, 1, &AC_CHROMINANCE_BITS, &AC_CHROMINANCE_VALUES);
    }
    write_sof0(&mut out, width, height, &components);
    write_sos_header(&mut out, &components);
    out.extend_from_slice(&entropy_bytes);
    write_eoi(&mut out);

    Ok(out)
}

fn component_plane_index(id: ComponentId) -> usize {
    match id {
        ComponentId::Gray | ComponentId::Y => 0,
        ComponentId::Cb => 1,
        ComponentId::Cr => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode;

    #[test]
    fn all_ones_quant_table_is_near_lossless_regardless_of_quality() {
        // P1 degenerate case: an all-ones quantization table only rounds
        // DCT coefficients to the nearest integer, so quality (which would
        // otherwise pick the table) stops mattering.
        let plane: Vec<u8> = (0..64u32).map(|v| (v * 3 % 256) as u8).collect();
        let image = Image::new_gray(8, 8, plane.clone());
        let options = EncodeOptions::new(1).with_luminance_table([1u16; 64]);
        let bytes = encode(&image, &options).unwrap();
        let decoded = decode(&bytes).unwrap();
        for (&a, &b) in plane.iter().zip(decoded.plane(0)) {
            assert!((i16::from(a) - i16::from(b)).abs() <= 1);
        }
    }
}
