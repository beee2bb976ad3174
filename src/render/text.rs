use crate::foundation::error::{KokubanError, KokubanResult};

/// RGBA8 brush color carried through Parley text layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrush {
    /// Red channel.
    pub(crate) r: u8,
    /// Green channel.
    pub(crate) g: u8,
    /// Blue channel.
    pub(crate) b: u8,
    /// Alpha channel.
    pub(crate) a: u8,
}

/// Line advance as a multiple of the font size, used when budgeting how
/// many wrapped lines fit a band before the real layout exists.
pub(crate) const LINE_FACTOR: f32 = 1.3;

/// Ellipsis appended wherever text is cut to fit.
pub(crate) const ELLIPSIS: char = '\u{2026}';

/// Stateful helper for shaping and laying out text with one registered font.
///
/// The font handed to [`TextEngine::new`] is the only family ever used;
/// registering it once up front keeps the per-draw path down to shaping.
pub(crate) struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl TextEngine {
    /// Register the given font bytes and construct fresh Parley contexts.
    pub(crate) fn new(font_bytes: Vec<u8>) -> KokubanResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| KokubanError::render("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| KokubanError::render("registered font family has no name"))?
            .to_string();
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    /// Font data for glyph drawing, matching the registered family.
    pub(crate) fn font(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }

    /// Shape and lay out plain text in the registered family.
    pub(crate) fn layout(
        &mut self,
        text: &str,
        size_px: f32,
        bold: bool,
        brush: TextBrush,
        max_width_px: Option<f32>,
    ) -> KokubanResult<parley::Layout<TextBrush>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(KokubanError::render("text size_px must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        if bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        if let Some(w) = max_width_px {
            layout.break_all_lines(Some(w));
            layout.align(
                Some(w),
                parley::Alignment::Start,
                parley::AlignmentOptions::default(),
            );
        } else {
            layout.break_all_lines(None);
        }

        Ok(layout)
    }

    /// Advance width of single-line text at the given size.
    pub(crate) fn measure_width(&mut self, text: &str, size_px: f32, bold: bool) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        match self.layout(text, size_px, bold, TextBrush::default(), None) {
            Ok(layout) => layout.width(),
            Err(_) => 0.0,
        }
    }

    /// Wrapped line count of text at the given size and width.
    pub(crate) fn line_count(&mut self, text: &str, size_px: f32, max_width_px: f32) -> usize {
        if text.is_empty() {
            return 0;
        }
        match self.layout(text, size_px, false, TextBrush::default(), Some(max_width_px)) {
            Ok(layout) => layout.lines().count(),
            Err(_) => 0,
        }
    }
}

/// Cut single-line text so that `measure(candidate) <= max_width`,
/// appending an ellipsis when anything was dropped.
///
/// Characters are dropped one at a time from the end; when nothing fits,
/// the ellipsis alone is returned.
pub(crate) fn truncate_to_width<F>(text: &str, max_width: f32, mut measure: F) -> String
where
    F: FnMut(&str) -> f32,
{
    if measure(text) <= max_width {
        return text.to_string();
    }
    let mut kept: Vec<char> = text.chars().collect();
    while kept.pop().is_some() && !kept.is_empty() {
        let mut candidate: String = kept.iter().collect();
        candidate.push(ELLIPSIS);
        if measure(&candidate) <= max_width {
            return candidate;
        }
    }
    ELLIPSIS.to_string()
}

/// Cut wrapping text so that `lines_at(candidate) <= budget`, appending an
/// ellipsis to the surviving tail when anything was dropped.
pub(crate) fn truncate_to_lines<F>(text: &str, budget: usize, mut lines_at: F) -> String
where
    F: FnMut(&str) -> usize,
{
    if lines_at(text) <= budget {
        return text.to_string();
    }
    if budget == 0 {
        return String::new();
    }
    let mut kept: Vec<char> = text.chars().collect();
    while kept.pop().is_some() && !kept.is_empty() {
        let mut candidate: String = kept.iter().collect();
        candidate.push(ELLIPSIS);
        if lines_at(&candidate) <= budget {
            return candidate;
        }
    }
    ELLIPSIS.to_string()
}

/// Scale steps tried for a wrapped block before lines are dropped, largest
/// first.
pub(crate) const SHRINK_STEPS: &[f32] = &[1.0, 0.9, 0.8, 0.7];

/// How a wrapped block fits its line budget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ShrinkPlan {
    /// Font size the block renders at.
    pub(crate) size: f32,
    /// Set when the block still overflows at the smallest step; the text
    /// must then be cut to this many lines.
    pub(crate) clip_lines: Option<usize>,
}

/// Pick the largest shrink step whose wrapped line count fits `budget`.
///
/// `lines_at` reports the wrapped line count at a candidate size. When
/// even the smallest step overflows, the plan keeps the floor size and
/// asks for a clip instead of shrinking further.
pub(crate) fn shrink_to_lines<F>(base_size: f32, budget: usize, mut lines_at: F) -> ShrinkPlan
where
    F: FnMut(f32) -> usize,
{
    let mut size = base_size;
    for &step in SHRINK_STEPS {
        size = base_size * step;
        if lines_at(size) <= budget {
            return ShrinkPlan {
                size,
                clip_lines: None,
            };
        }
    }
    ShrinkPlan {
        size,
        clip_lines: Some(budget),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
