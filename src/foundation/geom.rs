use crate::foundation::error::{KokubanError, KokubanResult};

pub use kurbo::{Affine, Point, Rect};

/// Axis-aligned rectangle in photo-normalized space.
///
/// All components live in `[0, 1]`, measured against the drawn photo area
/// (not the surface): `(0, 0)` is the photo's top-left corner, `(1, 1)` its
/// bottom-right. This is the unit the persisted template format stores board
/// geometry in, after percent conversion.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NormRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl NormRect {
    /// Create a validated rectangle with finite components and `w, h >= 0`.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> KokubanResult<Self> {
        if !(x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite()) {
            return Err(KokubanError::validation("NormRect components must be finite"));
        }
        if w < 0.0 || h < 0.0 {
            return Err(KokubanError::validation("NormRect size must be >= 0"));
        }
        Ok(Self { x, y, w, h })
    }

    /// Create from percent components (`0..=100`), the persisted unit.
    pub fn from_percent(x: f64, y: f64, w: f64, h: f64) -> KokubanResult<Self> {
        Self::new(x / 100.0, y / 100.0, w / 100.0, h / 100.0)
    }

    /// Convert back to percent components `(x, y, w, h)`.
    pub fn to_percent(self) -> (f64, f64, f64, f64) {
        (self.x * 100.0, self.y * 100.0, self.w * 100.0, self.h * 100.0)
    }

    /// Right edge (`x + w`).
    pub fn right(self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge (`y + h`).
    pub fn bottom(self) -> f64 {
        self.y + self.h
    }

    /// Return `true` when the point is inside the rectangle.
    pub fn contains(self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Clamp the rectangle into the unit square, preserving size when it fits.
    ///
    /// Oversized rectangles are shrunk to the unit square first, then the
    /// origin is clamped so `x + w <= 1` and `y + h <= 1`.
    pub fn clamp_unit(self) -> Self {
        let w = self.w.min(1.0);
        let h = self.h.min(1.0);
        Self {
            x: self.x.clamp(0.0, 1.0 - w),
            y: self.y.clamp(0.0, 1.0 - h),
            w,
            h,
        }
    }
}

/// Axis-aligned rectangle in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PxRect {
    /// Left edge in pixels.
    pub x: i32,
    /// Top edge in pixels.
    pub y: i32,
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl PxRect {
    /// Right edge (`x + w`).
    pub fn right(self) -> i32 {
        self.x + self.w
    }

    /// Bottom edge (`y + h`).
    pub fn bottom(self) -> i32 {
        self.y + self.h
    }

    /// Shrink by per-edge insets, clamping the size at zero.
    pub fn inset(self, left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            x: self.x + left,
            y: self.y + top,
            w: (self.w - left - right).max(0),
            h: (self.h - top - bottom).max(0),
        }
    }

    /// Return `true` when the surface point is inside the rectangle.
    pub fn contains(self, px: f64, py: f64) -> bool {
        px >= f64::from(self.x)
            && px < f64::from(self.right())
            && py >= f64::from(self.y)
            && py < f64::from(self.bottom())
    }

    /// Return `true` when `other` lies fully inside `self`.
    pub fn contains_rect(self, other: PxRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Convert to a kurbo rectangle for drawing.
    pub fn to_kurbo(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }
}

/// Placement of a contain-fitted photo inside a surface.
///
/// `dx`/`dy` are the letterbox offsets of the drawn photo's top-left corner,
/// `draw_w`/`draw_h` its on-surface size. Every normalized board coordinate
/// is projected through one of these.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Fit {
    /// Horizontal offset of the drawn photo inside the surface.
    pub dx: f64,
    /// Vertical offset of the drawn photo inside the surface.
    pub dy: f64,
    /// Drawn photo width in surface pixels.
    pub draw_w: f64,
    /// Drawn photo height in surface pixels.
    pub draw_h: f64,
}

impl Fit {
    /// Contain-fit a source image into a target surface.
    ///
    /// The scale is `min(dst_w / src_w, dst_h / src_h)`; the drawn area is
    /// centered on both axes. All inputs must be finite and positive.
    pub fn contain(src_w: f64, src_h: f64, dst_w: f64, dst_h: f64) -> KokubanResult<Self> {
        for v in [src_w, src_h, dst_w, dst_h] {
            if !v.is_finite() || v <= 0.0 {
                return Err(KokubanError::validation(
                    "Fit::contain dimensions must be finite and > 0",
                ));
            }
        }
        let scale = (dst_w / src_w).min(dst_h / src_h);
        let draw_w = src_w * scale;
        let draw_h = src_h * scale;
        Ok(Self {
            dx: (dst_w - draw_w) / 2.0,
            dy: (dst_h - draw_h) / 2.0,
            draw_w,
            draw_h,
        })
    }

    /// Fit covering an entire `w x h` surface with no letterboxing.
    pub fn identity(w: f64, h: f64) -> KokubanResult<Self> {
        Self::contain(w, h, w, h)
    }

    /// Uniformly scale the placement, for supersampled render targets.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            dx: self.dx * factor,
            dy: self.dy * factor,
            draw_w: self.draw_w * factor,
            draw_h: self.draw_h * factor,
        }
    }

    /// Project a normalized rectangle to surface pixels.
    ///
    /// Position and size are computed in floating point and rounded exactly
    /// once, at the end, so the width never jitters as the origin moves.
    pub fn norm_to_px(self, r: NormRect) -> PxRect {
        PxRect {
            x: (self.dx + r.x * self.draw_w).round() as i32,
            y: (self.dy + r.y * self.draw_h).round() as i32,
            w: (r.w * self.draw_w).round() as i32,
            h: (r.h * self.draw_h).round() as i32,
        }
    }

    /// Project a pixel rectangle back into normalized space.
    pub fn px_to_norm(self, r: PxRect) -> NormRect {
        NormRect {
            x: (f64::from(r.x) - self.dx) / self.draw_w,
            y: (f64::from(r.y) - self.dy) / self.draw_h,
            w: f64::from(r.w) / self.draw_w,
            h: f64::from(r.h) / self.draw_h,
        }
    }

    /// Map a surface point (e.g. a pointer position) into normalized space.
    pub fn point_to_norm(self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.dx) / self.draw_w, (y - self.dy) / self.draw_h)
    }
}

/// Reference corner or edge midpoint a configured board position names.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Position names the top-left corner.
    #[default]
    TopLeft,
    /// Position names the top edge midpoint.
    TopCenter,
    /// Position names the top-right corner.
    TopRight,
    /// Position names the left edge midpoint.
    CenterLeft,
    /// Position names the rectangle center.
    Center,
    /// Position names the right edge midpoint.
    CenterRight,
    /// Position names the bottom-left corner.
    BottomLeft,
    /// Position names the bottom edge midpoint.
    BottomCenter,
    /// Position names the bottom-right corner.
    BottomRight,
}

impl Anchor {
    /// Fractions of the size subtracted from the anchor point, per axis.
    fn offset_factors(self) -> (f64, f64) {
        match self {
            Anchor::TopLeft => (0.0, 0.0),
            Anchor::TopCenter => (0.5, 0.0),
            Anchor::TopRight => (1.0, 0.0),
            Anchor::CenterLeft => (0.0, 0.5),
            Anchor::Center => (0.5, 0.5),
            Anchor::CenterRight => (1.0, 0.5),
            Anchor::BottomLeft => (0.0, 1.0),
            Anchor::BottomCenter => (0.5, 1.0),
            Anchor::BottomRight => (1.0, 1.0),
        }
    }

    /// Reinterpret a rectangle whose `x`/`y` name this anchor point so that
    /// `x`/`y` name the top-left corner instead.
    pub fn to_top_left(self, r: NormRect) -> NormRect {
        let (fx, fy) = self.offset_factors();
        NormRect {
            x: r.x - fx * r.w,
            y: r.y - fy * r.h,
            ..r
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geom.rs"]
mod tests;
