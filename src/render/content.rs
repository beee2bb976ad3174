use crate::foundation::error::KokubanResult;
use crate::foundation::geom::PxRect;
use crate::layout::height::{BandKind, FieldCensus, PlacedBand, place_bands};
use crate::layout::rect::BoardRects;
use crate::render::surface::BoardSurface;
use crate::render::text::{
    LINE_FACTOR, TextBrush, TextEngine, shrink_to_lines, truncate_to_lines, truncate_to_width,
};
use crate::template::adapter::LayoutConfig;
use crate::template::color::ColorDef;
use crate::template::fields::{DrawStrategy, ResolvedField};
use crate::template::model::TitlePlacement;

// Border thickness as a fraction of the inner rectangle height.
const BORDER_RATIO: f64 = 0.012;
// Horizontal inset between band edges and text, in ems of the base size.
const SIDE_PAD_EM: f64 = 0.45;
// Vertical inset above the remarks block, in ems.
const TOP_PAD_EM: f64 = 0.25;
// Gap between a cell label and its value, in ems.
const LABEL_GAP_EM: f64 = 0.5;
// Margin kept free to the right of a cell value, in ems.
const VALUE_MARGIN_EM: f64 = 0.3;

const WATERMARK_TEXT: &str = "kokuban";
const WATERMARK_SCALE: f64 = 0.55;
const WATERMARK_ALPHA: f64 = 0.35;

/// Draw the board content into the resolved rectangles.
///
/// The caller fills the outer background first. This draws a border around
/// the inner rectangle, then the title band, the field grid, the remarks
/// block and finally the watermark. The inner background is never filled
/// here, so the outer fill stays visible as a frame around the content.
pub(crate) fn draw_content(
    surface: &mut BoardSurface,
    engine: &mut TextEngine,
    fields: &[ResolvedField<'_>],
    cfg: &LayoutConfig,
    rects: BoardRects,
) -> KokubanResult<()> {
    let inner = rects.inner;
    if inner.w <= 0 || inner.h <= 0 {
        return Ok(());
    }

    draw_border(surface, inner, cfg.style.fg);

    let mut title = None;
    let mut remarks = None;
    let mut cells = Vec::new();
    for field in fields {
        match field.strategy {
            DrawStrategy::Title if cfg.grid.title_placement != TitlePlacement::Inline => {
                title = Some(field);
            }
            DrawStrategy::Remarks => remarks = Some(field),
            _ => cells.push(field),
        }
    }

    let census = FieldCensus {
        title: title.is_some(),
        cells: cells.len(),
        remarks: remarks.is_some(),
    };
    let bands = place_bands(census, cfg.grid, f64::from(rects.outer.w), f64::from(inner.h));

    let font = engine.font().clone();
    let mut painter = Painter {
        surface,
        engine,
        cfg,
        inner,
        box_w: f64::from(rects.outer.w),
        base_px: cfg.typography.base * f64::from(inner.w),
        brush: brush_from(cfg.style.fg),
        font,
    };

    let columns = cfg.grid.columns.max(1) as usize;
    let mut next_cell = 0usize;
    for band in bands {
        match band.kind {
            BandKind::Title => {
                if let Some(field) = title {
                    painter.draw_title(field, band)?;
                }
            }
            BandKind::Row => {
                let end = cells.len().min(next_cell + columns);
                painter.draw_row(&cells[next_cell..end], band)?;
                next_cell = end;
            }
            BandKind::Remarks => {
                if let Some(field) = remarks
                    && !field.value.is_empty()
                {
                    painter.draw_remarks(field, band)?;
                }
            }
        }
    }

    painter.draw_watermark()?;
    Ok(())
}

fn draw_border(surface: &mut BoardSurface, inner: PxRect, fg: ColorDef) {
    let t = ((f64::from(inner.h) * BORDER_RATIO).round() as i32).max(1);
    let x = inner.x;
    let y = inner.y;
    let w = inner.w;
    let h = inner.h;
    surface.fill_rect(PxRect { x, y, w, h: t }, fg);
    surface.fill_rect(
        PxRect {
            x,
            y: inner.bottom() - t,
            w,
            h: t,
        },
        fg,
    );
    let side_h = (h - 2 * t).max(0);
    surface.fill_rect(
        PxRect {
            x,
            y: y + t,
            w: t,
            h: side_h,
        },
        fg,
    );
    surface.fill_rect(
        PxRect {
            x: inner.right() - t,
            y: y + t,
            w: t,
            h: side_h,
        },
        fg,
    );
}

struct Painter<'a> {
    surface: &'a mut BoardSurface,
    engine: &'a mut TextEngine,
    cfg: &'a LayoutConfig,
    inner: PxRect,
    box_w: f64,
    base_px: f64,
    brush: TextBrush,
    font: vello_cpu::peniko::FontData,
}

impl Painter<'_> {
    /// Cap a wanted size against the band height so squeezed bands never
    /// overflow vertically.
    fn fit_size(&self, want: f64, band_h: f64) -> f32 {
        want.min(band_h * 0.8).max(1.0) as f32
    }

    fn band_top(&self, band: PlacedBand) -> f64 {
        f64::from(self.inner.y) + band.y
    }

    fn centered_y(&self, band: PlacedBand, layout_h: f32) -> f64 {
        self.band_top(band) + (band.h - f64::from(layout_h)).max(0.0) / 2.0
    }

    fn draw_title(&mut self, field: &ResolvedField<'_>, band: PlacedBand) -> KokubanResult<()> {
        let size = self.fit_size(self.base_px * self.cfg.typography.title_scale, band.h);
        let pad = self.base_px * SIDE_PAD_EM;
        let avail = f64::from(self.inner.w) - 2.0 * pad;
        if avail <= 0.0 {
            return Ok(());
        }

        match self.cfg.grid.title_placement {
            TitlePlacement::Center => {
                if field.value.is_empty() {
                    return Ok(());
                }
                let text = truncate_to_width(&field.value, avail as f32, |t| {
                    self.engine.measure_width(t, size, true)
                });
                let layout = self.engine.layout(&text, size, true, self.brush, None)?;
                let x = f64::from(self.inner.x)
                    + (f64::from(self.inner.w) - f64::from(layout.width())).max(0.0) / 2.0;
                let y = self.centered_y(band, layout.height());
                self.surface.draw_text_layout(&layout, &self.font, x, y, None);
            }
            TitlePlacement::Left | TitlePlacement::Inline => {
                self.draw_label_value(field, f64::from(self.inner.x) + pad, avail, size, band)?;
            }
        }
        Ok(())
    }

    fn draw_row(&mut self, row: &[&ResolvedField<'_>], band: PlacedBand) -> KokubanResult<()> {
        let columns = self.cfg.grid.columns.max(1) as usize;
        let gap = self.cfg.grid.gap * self.box_w;
        let cell_w =
            (f64::from(self.inner.w) - gap * (columns as f64 - 1.0)) / columns as f64;
        if cell_w <= 0.0 {
            return Ok(());
        }

        for (i, field) in row.iter().enumerate() {
            let pad = self.base_px * SIDE_PAD_EM;
            let x = f64::from(self.inner.x) + (cell_w + gap) * i as f64 + pad;
            let avail = cell_w - 2.0 * pad;
            if avail <= 0.0 {
                continue;
            }
            let size = self.fit_size(self.base_px, band.h);
            self.draw_label_value(field, x, avail, size, band)?;
        }
        Ok(())
    }

    /// Bold label, then the value truncated to what is left of the width.
    fn draw_label_value(
        &mut self,
        field: &ResolvedField<'_>,
        x: f64,
        avail: f64,
        size: f32,
        band: PlacedBand,
    ) -> KokubanResult<()> {
        let label = truncate_to_width(field.label, avail as f32, |t| {
            self.engine.measure_width(t, size, true)
        });
        let label_layout = self.engine.layout(&label, size, true, self.brush, None)?;
        let label_w = f64::from(label_layout.width());
        let y = self.centered_y(band, label_layout.height());
        self.surface
            .draw_text_layout(&label_layout, &self.font, x, y, None);

        if field.value.is_empty() {
            return Ok(());
        }
        let gap = self.base_px * LABEL_GAP_EM;
        let budget = avail - label_w - gap - self.base_px * VALUE_MARGIN_EM;
        if budget <= 0.0 {
            return Ok(());
        }
        let value = truncate_to_width(&field.value, budget as f32, |t| {
            self.engine.measure_width(t, size, false)
        });
        let value_layout = self.engine.layout(&value, size, false, self.brush, None)?;
        let y = self.centered_y(band, value_layout.height());
        self.surface
            .draw_text_layout(&value_layout, &self.font, x + label_w + gap, y, None);
        Ok(())
    }

    /// Wrapped remarks text: shrink step-wise while it overflows the band,
    /// and cut to the line budget with an ellipsis at the floor size.
    fn draw_remarks(&mut self, field: &ResolvedField<'_>, band: PlacedBand) -> KokubanResult<()> {
        let pad = self.base_px * SIDE_PAD_EM;
        let pad_top = self.base_px * TOP_PAD_EM;
        let avail_w = f64::from(self.inner.w) - 2.0 * pad;
        let avail_h = band.h - 2.0 * pad_top;
        if avail_w <= 0.0 || avail_h <= 0.0 {
            return Ok(());
        }

        let base_size = self.fit_size(self.base_px, band.h);
        let line_h = f64::from(base_size) * f64::from(LINE_FACTOR);
        let budget = ((avail_h / line_h).floor() as usize).max(1);

        let plan = shrink_to_lines(base_size, budget, |s| {
            self.engine.line_count(&field.value, s, avail_w as f32)
        });
        let text = match plan.clip_lines {
            None => field.value.clone(),
            Some(lines) => truncate_to_lines(&field.value, lines, |t| {
                self.engine.line_count(t, plan.size, avail_w as f32)
            }),
        };

        let layout = self
            .engine
            .layout(&text, plan.size, false, self.brush, Some(avail_w as f32))?;
        self.surface.draw_text_layout(
            &layout,
            &self.font,
            f64::from(self.inner.x) + pad,
            self.band_top(band) + pad_top,
            plan.clip_lines,
        );
        Ok(())
    }

    fn draw_watermark(&mut self) -> KokubanResult<()> {
        let size = (self.base_px * WATERMARK_SCALE).max(1.0) as f32;
        let brush = brush_from(self.cfg.style.fg.with_opacity(WATERMARK_ALPHA));
        let layout = self.engine.layout(WATERMARK_TEXT, size, false, brush, None)?;
        let margin = self.base_px * TOP_PAD_EM + f64::from(self.inner.h) * BORDER_RATIO;
        let x = f64::from(self.inner.right()) - margin - f64::from(layout.width());
        let y = f64::from(self.inner.bottom()) - margin - f64::from(layout.height());
        self.surface.draw_text_layout(&layout, &self.font, x, y, None);
        Ok(())
    }
}

fn brush_from(c: ColorDef) -> TextBrush {
    let [r, g, b, a] = c.to_rgba8();
    TextBrush { r, g, b, a }
}

#[cfg(test)]
#[path = "../../tests/unit/render/content.rs"]
mod tests;
