//! The container framer: segment-marker framing that binds headers,
//! quantization tables, Huffman tables and the entropy-coded scan into a
//! self-describing byte stream (spec.md §4.7).
use crate::component::{Component, ComponentId};
use crate::errors::DecodeError;
use crate::huffman::HuffmanTable;
use crate::marker::Marker;
use crate::quant::QuantTable;

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_marker(out: &mut Vec<u8>, marker: Marker) {
    push_u16(out, marker.code());
}

pub(crate) fn write_soi(out: &mut Vec<u8>) {
    push_marker(out, Marker::Soi);
}

pub(crate) fn write_eoi(out: &mut Vec<u8>) {
    push_marker(out, Marker::Eoi);
}

/// Write one DQT segment carrying a single 8-bit-precision table.
pub(crate) fn write_dqt(out: &mut Vec<u8>, id: u8, table: &QuantTable) {
    push_marker(out, Marker::Dqt);
    push_u16(out, 2 + 1 + 64);
    out.push(id & 0x0F); // high nibble 0 => 8-bit precision
    for &v in table {
        debug_assert!(v <= 255, "baseline precision quant values must fit a byte");
        out.push(v as u8);
    }
}

/// Write one DHT segment carrying a single table.
pub(crate) fn write_dht(out: &mut Vec<u8>, is_ac: bool, id: u8, bits: &[u8; 16], values: &[u8]) {
    push_marker(out, Marker::Dht);
    push_u16(out, (2 + 1 + 16 + values.len()) as u16);
    let class = if is_ac { 0x10 } else { 0x00 };
    out.push(class | (id & 0x0F));
    out.extend_from_slice(bits);
    out.extend_from_slice(values);
}

pub(crate) fn write_sof0(out: &mut Vec<u8>, width: u16, height: u16, components: &[Component]) {
    push_marker(out, Marker::Sof0);
    push_u16(out, 8 + 3 * components.len() as u16);
    out.push(8); // precision
    push_u16(out, height);
    push_u16(out, width);
    out.push(components.len() as u8);
    for comp in components {
        out.push(comp.id.marker_id());
        out.push(0x11); // 1x1 sampling, the only layout in scope
        out.push(comp.quant_table_selector);
    }
}

pub(crate) fn write_sos_header(out: &mut Vec<u8>, components: &[Component]) {
    push_marker(out, Marker::Sos);
    push_u16(out, (6 + 2 * components.len()) as u16);
    out.push(components.len() as u8);
    for comp in components {
        out.push(comp.id.marker_id());
        out.push((comp.dc_table_selector << 4) | comp.ac_table_selector);
    }
    out.push(0); // spectral selection start
    out.push(63); // spectral selection end
    out.push(0); // successive approximation (unused, baseline)
}

fn read_u16(bytes: &[u8], pos: &mut usize) -> Result<u16, DecodeError> {
    if *pos + 2 > bytes.len() {
        return Err(DecodeError::TruncatedStream { offset: *pos });
    }
    let v = u16::from_be_bytes([bytes[*pos], bytes[*pos + 1]]);
    *pos += 2;
    Ok(v)
}

fn read_u8(bytes: &[u8], pos: &mut usize) -> Result<u8, DecodeError> {
    if *pos >= bytes.len() {
        return Err(DecodeError::TruncatedStream { offset: *pos });
    }
    let v = bytes[*pos];
    *pos += 1;
    Ok(v)
}

pub(crate) fn read_marker(bytes: &[u8], pos: &mut usize) -> Result<Marker, DecodeError> {
    let code = read_u16(bytes, pos)?;
    Marker::from_code(code).ok_or(DecodeError::BadMarker {
        offset: *pos - 2,
        found: code,
    })
}

pub(crate) fn expect_marker(bytes: &[u8], pos: &mut usize, expected: Marker) -> Result<(), DecodeError> {
    let offset = *pos;
    let found = read_marker(bytes, pos)?;
    if found != expected {
        return Err(DecodeError::BadMarker {
            offset,
            found: found.code(),
        });
    }
    Ok(())
}

/// Parse a DQT segment, returning `(table_id, table)`. Only single-table
/// 8-bit segments are supported, matching what this crate's encoder writes;
/// spec.md's subset does not require decoding multi-table DQT segments
/// emitted by other encoders.
pub(crate) fn parse_dqt(bytes: &[u8], pos: &mut usize) -> Result<(u8, QuantTable), DecodeError> {
    let _length = read_u16(bytes, pos)?;
    let info = read_u8(bytes, pos)?;
    let precision = info >> 4;
    let id = info & 0x0F;
    if precision != 0 {
        return Err(DecodeError::TableInconsistency(format!(
            "16-bit precision DQT tables are not supported (id {id})"
        )));
    }
    if *pos + 64 > bytes.len() {
        return Err(DecodeError::TruncatedStream { offset: *pos });
    }
    let mut table: QuantTable = [0u16; 64];
    for (t, &b) in table.iter_mut().zip(&bytes[*pos..*pos + 64]) {
        *t = u16::from(b);
    }
    *pos += 64;
    Ok((id, table))
}

/// Parse a DHT segment, returning `(is_ac, table_id, table)`.
pub(crate) fn parse_dht(bytes: &[u8], pos: &mut usize) -> Result<(bool, u8, HuffmanTable), DecodeError> {
    let _length = read_u16(bytes, pos)?;
    let info = read_u8(bytes, pos)?;
    let is_ac = (info >> 4) & 1 == 1;
    let id = info & 0x0F;

    if *pos + 16 > bytes.len() {
        return Err(DecodeError::TruncatedStream { offset: *pos });
    }
    let mut bits = [0u8; 16];
    bits.copy_from_slice(&bytes[*pos..*pos + 16]);
    *pos += 16;

    let total: usize = bits.iter().map(|&b| b as usize).sum();
    if *pos + total > bytes.len() {
        return Err(DecodeError::TruncatedStream { offset: *pos });
    }
    let values = bytes[*pos..*pos + total].to_vec();
    *pos += total;

    let table = HuffmanTable::build(&bits, values)?;
    Ok((is_ac, id, table))
}

pub(crate) struct Sof0Info {
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) components: Vec<Component>,
}

pub(crate) fn parse_sof0(bytes: &[u8], pos: &mut usize) -> Result<Sof0Info, DecodeError> {
    let length = read_u16(bytes, pos)?;
    let precision = read_u8(bytes, pos)?;
    if precision != 8 {
        return Err(DecodeError::TableInconsistency(format!(
            "unsupported sample precision {precision}, only 8-bit baseline is supported"
        )));
    }
    let height = read_u16(bytes, pos)?;
    let width = read_u16(bytes, pos)?;
    if width == 0 || height == 0 {
        return Err(DecodeError::DimensionMismatch {
            expected: 0,
            found: 0,
        });
    }
    let nf = read_u8(bytes, pos)? as u16;
    if length != 8 + 3 * nf {
        return Err(DecodeError::TableInconsistency(format!(
            "SOF0 length {length} inconsistent with {nf} components"
        )));
    }
    let mut components = Vec::with_capacity(nf as usize);
    for _ in 0..nf {
        let id_byte = read_u8(bytes, pos)?;
        let sampling = read_u8(bytes, pos)?;
        let qt_sel = read_u8(bytes, pos)?;
        if sampling != 0x11 {
            return Err(DecodeError::TableInconsistency(format!(
                "component {id_byte} has subsampled factors 0x{sampling:02x}, only 1x1 is supported"
            )));
        }
        let id = if nf == 1 {
            ComponentId::Gray
        } else {
            ComponentId::from_marker_id(id_byte).ok_or_else(|| {
                DecodeError::TableInconsistency(format!("unknown component id {id_byte}"))
            })?
        };
        components.push(Component::new(id, qt_sel, 0, 0));
    }
    Ok(Sof0Info {
        width,
        height,
        components,
    })
}

/// Parse an SOS header, returning `(component_id, dc_selector, ac_selector)`
/// triples in scan order.
pub(crate) fn parse_sos_header(bytes: &[u8], pos: &mut usize) -> Result<Vec<(u8, u8, u8)>, DecodeError> {
    let _length = read_u16(bytes, pos)?;
    let ns = read_u8(bytes, pos)?;
    let mut out = Vec::with_capacity(ns as usize);
    for _ in 0..ns {
        let id = read_u8(bytes, pos)?;
        let sel = read_u8(bytes, pos)?;
        out.push((id, sel >> 4, sel & 0x0F));
    }
    let _spec_start = read_u8(bytes, pos)?;
    let _spec_end = read_u8(bytes, pos)?;
    let _approx = read_u8(bytes, pos)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quant::luminance_table;

    #[test]
    fn dqt_round_trips() {
        let table = luminance_table(50);
        let mut out = Vec::new();
        write_dqt(&mut out, 0, &table);
        let mut pos = 2; // skip marker
        assert_eq!(read_marker(&out, &mut 0).unwrap(), Marker::Dqt);
        let (id, parsed) = parse_dqt(&out, &mut pos).unwrap();
        assert_eq!(id, 0);
        assert_eq!(parsed, table);
    }

    #[test]
    fn sof0_round_trips() {
        let comps = vec![Component::new(ComponentId::Gray, 0, 0, 0)];
        let mut out = Vec::new();
        write_sof0(&mut out, 16, 9, &comps);
        let mut pos = 2;
        let info = parse_sof0(&out, &mut pos).unwrap();
        assert_eq!(info.width, 16);
        assert_eq!(info.height, 9);
        assert_eq!(info.components.len(), 1);
    }

    #[test]
    fn bad_marker_is_reported_with_offset() {
        let bytes = [0x12, 0x34];
        let err = read_marker(&bytes, &mut 0).unwrap_err();
        match err {
            DecodeError::BadMarker { offset, found } => {
                assert_eq!(offset, 0);
                assert_eq!(found, 0x1234);
            }
            _ => panic!("expected BadMarker"),
        }
    }
}
