use crate::foundation::geom::{Fit, NormRect, PxRect};
use crate::template::adapter::{LayoutConfig, LayoutSource};

/// Resolved board rectangles in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct BoardRects {
    /// Background-filled rectangle.
    pub outer: PxRect,
    /// Content rectangle after safe-area insets; always inside `outer`.
    pub inner: PxRect,
}

/// Resolve the configured board into concrete outer and inner pixel
/// rectangles.
///
/// `content_min_h` is the content-only minimum from the height resolver;
/// the safe-area padding is layered back on top of it here. The height is
/// the larger of the configured height (when the format stores one) and
/// that padded minimum, never less than either. Legacy boards keep their
/// stored top edge; modern boards that would run past the bottom of the
/// drawn photo are moved up rather than shrunk. Both end clamped fully
/// on-surface, then each pixel dimension is rounded exactly once.
pub fn resolve_rects(
    cfg: &LayoutConfig,
    source: LayoutSource,
    content_min_h: f64,
    fit: Fit,
) -> BoardRects {
    let board = cfg.board;
    let sa = cfg.safe_area;

    // Adapter validation keeps top + bottom below 1.
    let min_outer_h = content_min_h / (1.0 - sa.top - sa.bottom);
    let h = board.h.unwrap_or(0.0).max(min_outer_h);

    let mut rect = board.anchor.to_top_left(NormRect {
        x: board.x,
        y: board.y,
        w: board.w,
        h,
    });

    if source == LayoutSource::Modern && rect.bottom() > 1.0 {
        rect.y = 1.0 - rect.h;
    }
    let rect = rect.clamp_unit();

    let outer = fit.norm_to_px(rect);

    let left = (f64::from(outer.w) * sa.left).round() as i32;
    let right = (f64::from(outer.w) * sa.right).round() as i32;
    let top = (f64::from(outer.h) * sa.top).round() as i32;
    let bottom = (f64::from(outer.h) * sa.bottom).round() as i32;
    let inner = outer.inset(left, top, right, bottom);

    BoardRects { outer, inner }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/rect.rs"]
mod tests;
