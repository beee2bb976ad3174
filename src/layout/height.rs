use crate::foundation::geom::Fit;
use crate::template::adapter::GridSpec;
use crate::template::fields::{DrawStrategy, FieldKey};
use crate::template::model::TitlePlacement;

// Band heights as fractions of the board's pixel width. Chosen so a
// three-field single-column board at 80% width stays within a 20% height on
// a square fit.
pub(crate) const TITLE_BAND_RATIO: f64 = 0.085;
pub(crate) const ROW_BAND_RATIO: f64 = 0.062;
pub(crate) const REMARKS_BAND_RATIO: f64 = 0.20;

/// What the field list contributes to the vertical band stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldCensus {
    pub(crate) title: bool,
    pub(crate) cells: usize,
    pub(crate) remarks: bool,
}

/// Count bands from the ordered field labels.
///
/// Mirrors the renderer's dispatch: the first title label owns the title
/// band unless the placement is inline, the first remarks label owns the
/// remarks band, everything else (including duplicates) is a grid cell.
pub(crate) fn census(labels: &[String], placement: TitlePlacement) -> FieldCensus {
    let mut out = FieldCensus {
        title: false,
        cells: 0,
        remarks: false,
    };
    for label in labels {
        let strategy = FieldKey::from_label(label).map(FieldKey::draw_strategy);
        match strategy {
            Some(DrawStrategy::Title) if !out.title && placement != TitlePlacement::Inline => {
                out.title = true;
            }
            Some(DrawStrategy::Remarks) if !out.remarks => out.remarks = true,
            _ => out.cells += 1,
        }
    }
    out
}

/// Band kinds in top-to-bottom stack order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BandKind {
    Title,
    Row,
    Remarks,
}

fn band_heights(census: FieldCensus, columns: u32, box_w_px: f64) -> Vec<(BandKind, f64)> {
    let columns = columns.max(1) as usize;
    let mut bands = Vec::new();
    if census.title {
        bands.push((BandKind::Title, TITLE_BAND_RATIO * box_w_px));
    }
    let rows = census.cells.div_ceil(columns);
    for _ in 0..rows {
        bands.push((BandKind::Row, ROW_BAND_RATIO * box_w_px));
    }
    if census.remarks {
        bands.push((BandKind::Remarks, REMARKS_BAND_RATIO * box_w_px));
    }
    bands
}

fn natural_height_px(census: FieldCensus, columns: u32, box_w_px: f64, gap_frac: f64) -> f64 {
    let bands = band_heights(census, columns, box_w_px);
    if bands.is_empty() {
        return 0.0;
    }
    let sum: f64 = bands.iter().map(|(_, h)| h).sum();
    sum + gap_frac * box_w_px * (bands.len() - 1) as f64
}

/// Minimum content height for a field list, normalized by the fit's draw
/// height.
///
/// Bands are sized against the board's pixel width (`norm_width *
/// fit.draw_w`): a title band when a title field is present, one row per
/// `ceil(cells / columns)`, and a remarks band when a remarks field is
/// present, with the grid gap between consecutive bands. Safe-area padding
/// is layered on later by the rect resolver, not here.
pub fn min_content_height(fields: &[String], grid: GridSpec, norm_width: f64, fit: Fit) -> f64 {
    let census = census(fields, grid.title_placement);
    let box_w_px = norm_width * fit.draw_w;
    natural_height_px(census, grid.columns, box_w_px, grid.gap) / fit.draw_h
}

/// One band placed inside the inner rectangle, in pixels from its top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PlacedBand {
    pub(crate) kind: BandKind,
    pub(crate) y: f64,
    pub(crate) h: f64,
}

/// Place the band stack into an inner rectangle of the given height.
///
/// When the rectangle is taller than the natural stack the remarks band
/// absorbs the remainder (content stays top-aligned without one); when it
/// is shorter, every band and gap squeezes by the same factor so the stack
/// never overflows.
pub(crate) fn place_bands(
    census: FieldCensus,
    grid: GridSpec,
    box_w_px: f64,
    inner_h_px: f64,
) -> Vec<PlacedBand> {
    let bands = band_heights(census, grid.columns, box_w_px);
    if bands.is_empty() || inner_h_px <= 0.0 {
        return Vec::new();
    }

    let natural = natural_height_px(census, grid.columns, box_w_px, grid.gap);
    let scale = if natural > inner_h_px {
        inner_h_px / natural
    } else {
        1.0
    };
    let slack = (inner_h_px - natural).max(0.0);
    let gap = grid.gap * box_w_px * scale;

    let mut placed = Vec::with_capacity(bands.len());
    let mut y = 0.0;
    for (kind, h) in bands {
        let mut h = h * scale;
        if kind == BandKind::Remarks {
            h += slack;
        }
        placed.push(PlacedBand { kind, y, h });
        y += h + gap;
    }
    placed
}

#[cfg(test)]
#[path = "../../tests/unit/layout/height.rs"]
mod tests;
