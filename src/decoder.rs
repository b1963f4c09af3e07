//! Top-level decode pipeline: framed byte stream -> raster (spec.md §6).
use log::debug;

use crate::bitstream::BitStreamReader;
use crate::block::{inverse_block, padded_dims, store_block};
use crate::component::{select_quant_table, Component, ComponentId};
use crate::entropy::decode_block;
use crate::errors::DecodeError;
use crate::headers::{expect_marker, parse_dht, parse_dqt, parse_sof0, parse_sos_header, read_marker};
use crate::huffman::HuffmanTable;
use crate::image::Image;
use crate::marker::Marker;
use crate::quant::QuantTable;
use crate::threads::parallel_fill;

/// Decode a byte stream produced by [`crate::encoder::encode`] (or any
/// well-formed baseline JPEG restricted to this crate's subset) back into
/// a raster.
pub fn decode(bytes: &[u8]) -> Result<Image, DecodeError> {
    let mut pos = 0usize;
    expect_marker(bytes, &mut pos, Marker::Soi)?;

    let mut quant_tables: [Option<QuantTable>; 4] = Default::default();
    let mut dc_tables: [Option<HuffmanTable>; 4] = Default::default();
    let mut ac_tables: [Option<HuffmanTable>; 4] = Default::default();

    let mut width = 0u16;
    let mut height = 0u16;
    let mut components: Vec<Component> = Vec::new();
    let mut planes: Vec<Vec<u8>> = Vec::new();

    loop {
        let marker = read_marker(bytes, &mut pos)?;
        match marker {
            Marker::Soi => {
                return Err(DecodeError::BadMarker {
                    offset: pos - 2,
                    found: marker.code(),
                });
            }
            Marker::Dqt => {
                let (id, table) = parse_dqt(bytes, &mut pos)?;
                quant_tables[id as usize] = Some(table);
            }
            Marker::Dht => {
                let (is_ac, id, table) = parse_dht(bytes, &mut pos)?;
                if is_ac {
                    ac_tables[id as usize] = Some(table);
                } else {
                    dc_tables[id as usize] = Some(table);
                }
            }
            Marker::Sof0 => {
                let info = parse_sof0(bytes, &mut pos)?;
                width = info.width;
                height = info.height;
                components = info.components;
                debug!("SOF0: {width}x{height}, {} component(s)", components.len());
            }
            Marker::Sos => {
                let selectors = parse_sos_header(bytes, &mut pos)?;
                for (id, dc_sel, ac_sel) in selectors {
                    let comp = components
                        .iter_mut()
                        .find(|c| c.id.marker_id() == id)
                        .ok_or_else(|| {
                            DecodeError::TableInconsistency(format!(
                                "SOS referenced component id {id} not present in SOF0"
                            ))
                        })?;
                    comp.dc_table_selector = dc_sel;
                    comp.ac_table_selector = ac_sel;
                }

                planes = decode_scan(bytes, &mut pos, width, height, &components, &dc_tables, &ac_tables, &quant_tables)?;
            }
            Marker::Eoi => break,
        }
    }

    build_image(width, height, &components, planes)
}

#[allow(clippy::too_many_arguments)]
fn decode_scan(
    bytes: &[u8],
    pos: &mut usize,
    width: u16,
    height: u16,
    components: &[Component],
    dc_tables: &[Option<HuffmanTable>; 4],
    ac_tables: &[Option<HuffmanTable>; 4],
    quant_tables: &[Option<QuantTable>; 4],
) -> Result<Vec<Vec<u8>>, DecodeError> {
    let (padded_width, padded_height) = padded_dims(usize::from(width), usize::from(height));
    let blocks_wide = padded_width / 8;
    let blocks_high = padded_height / 8;
    let expected_blocks = blocks_wide * blocks_high;

    let mut quantized: Vec<Vec<[i32; 64]>> = components
        .iter()
        .map(|_| vec![[0i32; 64]; expected_blocks])
        .collect();
    let mut predictors = vec![0i32; components.len()];

    let mut reader = BitStreamReader::new(&bytes[*pos..]);
    for by in 0..blocks_high {
        for bx in 0..blocks_wide {
            let block_index = by * blocks_wide + bx;
            for (ci, comp) in components.iter().enumerate() {
                let dc_table = dc_tables[comp.dc_table_selector as usize]
                    .as_ref()
                    .ok_or_else(|| {
                        DecodeError::TableInconsistency(format!(
                            "component referenced DC table {} which was never defined",
                            comp.dc_table_selector
                        ))
                    })?;
                let ac_table = ac_tables[comp.ac_table_selector as usize]
                    .as_ref()
                    .ok_or_else(|| {
                        DecodeError::TableInconsistency(format!(
                            "component referenced AC table {} which was never defined",
                            comp.ac_table_selector
                        ))
                    })?;
                let block = decode_block(&mut reader, dc_table, ac_table, &mut predictors[ci], block_index)?;
                quantized[ci][block_index] = block;
            }
        }
    }
    *pos += reader.byte_offset();

    // Dequantize + inverse DCT every block; safe to parallelize, each
    // block only writes its own region of the output plane.
    let mut planes = Vec::with_capacity(components.len());
    for (ci, comp) in components.iter().enumerate() {
        let quant = select_quant_table(quant_tables, comp.quant_table_selector).ok_or_else(|| {
            DecodeError::TableInconsistency(format!(
                "component referenced quant table {} which was never defined",
                comp.quant_table_selector
            ))
        })?;
        let mut samples = vec![[0u8; 64]; expected_blocks];
        parallel_fill(&mut samples, |i| inverse_block(&quantized[ci][i], &quant));

        let mut padded = vec![0u8; padded_width * padded_height];
        for by in 0..blocks_high {
            for bx in 0..blocks_wide {
                store_block(&mut padded, padded_width, bx, by, &samples[by * blocks_wide + bx]);
            }
        }
        let mut plane = vec![0u8; usize::from(width) * usize::from(height)];
        for row in 0..usize::from(height) {
            let src = &padded[row * padded_width..row * padded_width + usize::from(width)];
            plane[row * usize::from(width)..row * usize::from(width) + usize::from(width)]
                .copy_from_slice(src);
        }
        planes.push(plane);
    }
    Ok(planes)
}

fn build_image(width: u16, height: u16, components: &[Component], planes: Vec<Vec<u8>>) -> Result<Image, DecodeError> {
    match components.len() {
        1 => Ok(Image::new_gray(width, height, planes[0].clone())),
        3 => {
            let y_idx = components.iter().position(|c| c.id == ComponentId::Y);
            let cb_idx = components.iter().position(|c| c.id == ComponentId::Cb);
            let cr_idx = components.iter().position(|c| c.id == ComponentId::Cr);
            match (y_idx, cb_idx, cr_idx) {
                (Some(y), Some(cb), Some(cr)) => Ok(Image::new_ycbcr(
                    width,
                    height,
                    planes[y].clone(),
                    planes[cb].clone(),
                    planes[cr].clone(),
                )),
                _ => Err(DecodeError::TableInconsistency(
                    "3-component frame did not contain Y, Cb and Cr".to_string(),
                )),
            }
        }
        n => Err(DecodeError::TableInconsistency(format!(
            "unsupported component count {n}, expected 1 or 3"
        ))),
    }
}
