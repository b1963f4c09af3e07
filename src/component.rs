//! Per-component metadata carried from SOF0 through a scan (spec.md §3, §4.8).
use crate::quant::QuantTable;

/// Which channel a [`Component`] carries.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum ComponentId {
    Gray,
    Y,
    Cb,
    Cr,
}

impl ComponentId {
    pub(crate) fn marker_id(self) -> u8 {
        match self {
            ComponentId::Gray | ComponentId::Y => 1,
            ComponentId::Cb => 2,
            ComponentId::Cr => 3,
        }
    }

    pub(crate) fn from_marker_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(ComponentId::Y),
            2 => Some(ComponentId::Cb),
            3 => Some(ComponentId::Cr),
            _ => None,
        }
    }
}

/// One component's SOF0/SOS metadata.
///
/// Sampling factors are always 1x1: only the non-interleaved / 4:4:4 scan
/// layout is in scope (spec.md Non-goals), so there is no subsampling to
/// track. The scan-lifetime DC predictor itself lives alongside the
/// pipeline's per-component block loop (`encoder::encode`,
/// `decoder::decode_scan`), reset to 0 at scan `Init` by construction.
#[derive(Clone)]
pub(crate) struct Component {
    pub(crate) id: ComponentId,
    pub(crate) quant_table_selector: u8,
    pub(crate) dc_table_selector: u8,
    pub(crate) ac_table_selector: u8,
}

impl Component {
    pub(crate) fn new(
        id: ComponentId,
        quant_table_selector: u8,
        dc_table_selector: u8,
        ac_table_selector: u8,
    ) -> Self {
        Component {
            id,
            quant_table_selector,
            dc_table_selector,
            ac_table_selector,
        }
    }
}

/// Resolve a component's quantization table selector to the table itself.
pub(crate) fn select_quant_table(tables: &[Option<QuantTable>; 4], selector: u8) -> Option<QuantTable> {
    tables.get(selector as usize).copied().flatten()
}
