use crate::foundation::error::{KokubanError, KokubanResult};
use crate::foundation::geom::{Anchor, NormRect};
use crate::template::color::ColorDef;
use crate::template::model::{
    BoardVariant, DesignSettingsDef, LayoutConfigDef, LegacyDesignDef, Template, TitlePlacement,
};
use serde::Serialize;

/// Default column count for modern grids.
pub const DEFAULT_COLUMNS: u32 = 2;
/// Default gap between bands and grid rows, as a fraction of board width.
pub const DEFAULT_GAP: f64 = 0.012;
/// Default text size as a fraction of the inner content width.
pub const DEFAULT_FONT_BASE: f64 = 0.045;
/// Default title size multiplier over the base size.
pub const DEFAULT_TITLE_SCALE: f64 = 1.3;
/// Default opacity of the background fill.
pub const DEFAULT_OPACITY: f64 = 0.92;

// Box width, in pixels, the legacy editor sized absolute font values against.
const LEGACY_FONT_REF_BOX_PX: f64 = 960.0;

/// Board placement in photo-normalized units.
///
/// `x`/`y` are interpreted through `anchor`; `h` is absent when the height
/// comes entirely from the content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoardSpec {
    /// Anchor point x.
    pub x: f64,
    /// Anchor point y.
    pub y: f64,
    /// Board width.
    pub w: f64,
    /// Configured board height, when the format stores one.
    pub h: Option<f64>,
    /// How `x`/`y` are interpreted.
    pub anchor: Anchor,
}

/// Field grid shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridSpec {
    /// Grid column count, `1..=4`.
    pub columns: u32,
    /// Gap between bands and rows, fraction of board width.
    pub gap: f64,
    /// Title placement relative to the grid.
    pub title_placement: TitlePlacement,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            gap: DEFAULT_GAP,
            title_placement: TitlePlacement::default(),
        }
    }
}

/// Text sizing, all relative to the inner content width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TypographySpec {
    /// Base text size as a fraction of inner width.
    pub base: f64,
    /// Title size multiplier over `base`.
    pub title_scale: f64,
}

/// Non-content padding between the outer and inner rectangles, as fractions
/// of the outer pixel rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SafeArea {
    /// Top inset fraction.
    pub top: f64,
    /// Bottom inset fraction.
    pub bottom: f64,
    /// Left inset fraction.
    pub left: f64,
    /// Right inset fraction.
    pub right: f64,
}

/// Resolved theme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StyleSpec {
    /// Board variant the colors default from.
    pub variant: BoardVariant,
    /// Background fill opacity, `0..=1`.
    pub opacity: f64,
    /// Background color (straight alpha, before opacity).
    pub bg: ColorDef,
    /// Text and border color.
    pub fg: ColorDef,
}

/// Fully-resolved layout configuration; nothing downstream re-reads the
/// template's design settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutConfig {
    /// Board placement.
    pub board: BoardSpec,
    /// Grid shape.
    pub grid: GridSpec,
    /// Text sizing.
    pub typography: TypographySpec,
    /// Outer-to-inner padding.
    pub safe_area: SafeArea,
    /// Theme colors and opacity.
    pub style: StyleSpec,
}

/// Which configuration format the layout was adapted from.
///
/// The only consumers are the height/position policy in the rect resolver
/// and the drag controller's attachment check; everything else runs one
/// shared path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutSource {
    /// Percent-based design written by the original board editor.
    Legacy,
    /// Grouped anchor/grid configuration.
    Modern,
}

impl LayoutSource {
    /// Return `true` for the legacy percent format.
    pub fn is_legacy(self) -> bool {
        matches!(self, LayoutSource::Legacy)
    }
}

/// Adapter output: one canonical config plus its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedLayout {
    /// The canonical layout configuration.
    pub cfg: LayoutConfig,
    /// Which format it came from.
    pub source: LayoutSource,
}

/// Normalize a template's design settings into one canonical layout.
///
/// Legacy settings are synthesized into the grouped shape (percent to
/// normalized, single-column grid, zero safe area). Modern settings merge
/// over built-in defaults key by key; the `board` and `grid` groups are
/// required and their absence aborts before any drawing.
#[tracing::instrument(skip(template), fields(template_id = template.id()))]
pub fn adapt(template: &Template) -> KokubanResult<ResolvedLayout> {
    let def = template.def();
    match &def.design_settings {
        DesignSettingsDef::Legacy(legacy) => {
            if def.layout_id.is_some() {
                tracing::debug!("layout_id present on a legacy-shaped template, using legacy path");
            }
            adapt_legacy(legacy)
        }
        DesignSettingsDef::Modern(modern) => adapt_modern(modern),
    }
}

fn adapt_legacy(d: &LegacyDesignDef) -> KokubanResult<ResolvedLayout> {
    let rect = NormRect::from_percent(d.position.x, d.position.y, d.width, d.height)
        .map_err(|e| KokubanError::layout(format!("legacy design geometry: {e}")))?;
    if rect.w <= 0.0 || rect.h <= 0.0 {
        return Err(KokubanError::layout(
            "legacy design width/height must be > 0 percent",
        ));
    }

    let base = match d.font_size {
        None => DEFAULT_FONT_BASE,
        Some(s) if !(s.is_finite() && s > 0.0) => {
            return Err(KokubanError::layout("legacy fontSize must be > 0"));
        }
        // Values above 1 are pixel sizes from the old editor canvas.
        Some(s) if s > 1.0 => s / LEGACY_FONT_REF_BOX_PX,
        Some(s) => s,
    };

    let variant = BoardVariant::from_legacy_style(&d.style);
    let style = resolve_style(variant, d.opacity, d.bg_color, d.text_color)?;

    Ok(ResolvedLayout {
        cfg: LayoutConfig {
            board: BoardSpec {
                x: rect.x,
                y: rect.y,
                w: rect.w,
                h: Some(rect.h),
                anchor: Anchor::TopLeft,
            },
            grid: GridSpec {
                columns: 1,
                gap: DEFAULT_GAP,
                title_placement: TitlePlacement::Left,
            },
            typography: TypographySpec {
                base,
                title_scale: DEFAULT_TITLE_SCALE,
            },
            safe_area: SafeArea::default(),
            style,
        },
        source: LayoutSource::Legacy,
    })
}

fn adapt_modern(d: &LayoutConfigDef) -> KokubanResult<ResolvedLayout> {
    let Some(board) = d.board else {
        return Err(KokubanError::layout("modern layout is missing the board group"));
    };
    let Some(grid) = d.grid else {
        return Err(KokubanError::layout("modern layout is missing the grid group"));
    };

    let (Some(x), Some(y), Some(w)) = (board.x, board.y, board.w) else {
        return Err(KokubanError::layout("modern board group must set x, y and w"));
    };
    if !(x.is_finite() && y.is_finite()) {
        return Err(KokubanError::layout("modern board x/y must be finite"));
    }
    if !(w.is_finite() && w > 0.0 && w <= 1.0) {
        return Err(KokubanError::layout("modern board w must be in (0, 1]"));
    }
    if let Some(h) = board.h
        && !(h.is_finite() && h > 0.0 && h <= 1.0)
    {
        return Err(KokubanError::layout("modern board h must be in (0, 1]"));
    }

    let columns = grid.columns.unwrap_or(DEFAULT_COLUMNS);
    if !(1..=4).contains(&columns) {
        return Err(KokubanError::layout("grid columns must be in 1..=4"));
    }
    let gap = grid.gap.unwrap_or(DEFAULT_GAP);
    if !(gap.is_finite() && (0.0..0.25).contains(&gap)) {
        return Err(KokubanError::layout("grid gap must be in [0, 0.25)"));
    }

    let typography = d.typography.unwrap_or_default();
    let font_base = typography.base.unwrap_or(DEFAULT_FONT_BASE);
    if !(font_base.is_finite() && font_base > 0.0 && font_base <= 0.5) {
        return Err(KokubanError::layout("typography base must be in (0, 0.5]"));
    }
    let title_scale = typography.scale_title.unwrap_or(DEFAULT_TITLE_SCALE);
    if !(title_scale.is_finite() && title_scale > 0.0 && title_scale <= 5.0) {
        return Err(KokubanError::layout("typography scaleTitle must be in (0, 5]"));
    }

    let sa = d.safe_area.unwrap_or_default();
    let safe_area = SafeArea {
        top: sa.top.unwrap_or(0.0),
        bottom: sa.bottom.unwrap_or(0.0),
        left: sa.left.unwrap_or(0.0),
        right: sa.right.unwrap_or(0.0),
    };
    for (name, v) in [
        ("top", safe_area.top),
        ("bottom", safe_area.bottom),
        ("left", safe_area.left),
        ("right", safe_area.right),
    ] {
        if !(v.is_finite() && (0.0..0.5).contains(&v)) {
            return Err(KokubanError::layout(format!(
                "safeArea.{name} must be in [0, 0.5)"
            )));
        }
    }
    if safe_area.top + safe_area.bottom >= 1.0 || safe_area.left + safe_area.right >= 1.0 {
        return Err(KokubanError::layout(
            "opposing safeArea fractions must sum below 1",
        ));
    }

    let s = d.style.unwrap_or_default();
    let variant = s.variant.unwrap_or_default();
    let style = resolve_style(variant, s.opacity, s.bg_color, s.text_color)?;

    Ok(ResolvedLayout {
        cfg: LayoutConfig {
            board: BoardSpec {
                x,
                y,
                w,
                h: board.h,
                anchor: board.anchor.unwrap_or_default(),
            },
            grid: GridSpec {
                columns,
                gap,
                title_placement: grid.title_placement.unwrap_or_default(),
            },
            typography: TypographySpec {
                base: font_base,
                title_scale,
            },
            safe_area,
            style,
        },
        source: LayoutSource::Modern,
    })
}

fn resolve_style(
    variant: BoardVariant,
    opacity: Option<f64>,
    bg: Option<ColorDef>,
    fg: Option<ColorDef>,
) -> KokubanResult<StyleSpec> {
    let opacity = opacity.unwrap_or(DEFAULT_OPACITY);
    if !(opacity.is_finite() && (0.0..=1.0).contains(&opacity)) {
        return Err(KokubanError::layout("style opacity must be in [0, 1]"));
    }
    Ok(StyleSpec {
        variant,
        opacity,
        bg: bg.unwrap_or_else(|| variant.bg_color()),
        fg: fg.unwrap_or_else(|| variant.text_color()),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/template/adapter.rs"]
mod tests;
