use crate::foundation::error::{KokubanError, KokubanResult};
use crate::foundation::geom::Fit;
use crate::layout::height::min_content_height;
use crate::layout::rect::resolve_rects;
use crate::render::content::draw_content;
use crate::render::sprite::{SpriteCache, SpriteKey};
use crate::render::surface::{BoardImage, BoardSurface, OversampleOpts, Photo};
use crate::render::text::TextEngine;
use crate::template::adapter::{ResolvedLayout, adapt};
use crate::template::fields::resolve_fields;
use crate::template::model::{BlackboardInfo, Template};

/// Options shared by every facade entry point.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Pattern recognized timestamps are reformatted with, in `strftime`
    /// syntax.
    pub date_format: String,
    /// Preview supersampling policy.
    pub oversample: OversampleOpts,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            date_format: "%Y/%m/%d".to_string(),
            oversample: OversampleOpts::default(),
        }
    }
}

/// Native geometry of a preview surface and the photo behind it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewTarget {
    /// Photo pixel width.
    pub photo_w: u32,
    /// Photo pixel height.
    pub photo_h: u32,
    /// Surface width in logical pixels.
    pub target_w: u32,
    /// Surface height in logical pixels.
    pub target_h: u32,
    /// Device pixel ratio of the surface.
    pub pixel_ratio: f64,
}

/// Draws blackboard overlays over photographs.
///
/// One renderer owns the text engine and with it the single registered
/// font. Every drawing entry point funnels through [`BoardRenderer::render`],
/// so legacy-format and modern-format templates that describe the same
/// geometry produce identical pixels.
pub struct BoardRenderer {
    engine: TextEngine,
    opts: RenderOptions,
}

impl BoardRenderer {
    /// Create a renderer from raw font bytes with default options.
    pub fn new(font_bytes: Vec<u8>) -> KokubanResult<Self> {
        Self::with_options(font_bytes, RenderOptions::default())
    }

    /// Create a renderer with explicit options.
    pub fn with_options(font_bytes: Vec<u8>, opts: RenderOptions) -> KokubanResult<Self> {
        Ok(Self {
            engine: TextEngine::new(font_bytes)?,
            opts,
        })
    }

    /// Draw the board for `template` and `info` onto a surface.
    ///
    /// The one drawing path: adapt the template, resolve fields and
    /// rectangles, fill the outer background, draw the content. `fit`
    /// positions the photo on the surface; the board is placed relative to
    /// the drawn photo area, not the surface.
    #[tracing::instrument(skip_all, fields(template_id = template.id()))]
    pub fn render(
        &mut self,
        surface: &mut BoardSurface,
        info: &BlackboardInfo,
        template: &Template,
        fit: Fit,
    ) -> KokubanResult<()> {
        let ResolvedLayout { cfg, source } = adapt(template)?;
        let fields = resolve_fields(template, info, &self.opts.date_format);
        let min_h = min_content_height(template.fields(), cfg.grid, cfg.board.w, fit);
        let rects = resolve_rects(&cfg, source, min_h, fit);
        tracing::debug!(?rects, "board rectangles resolved");

        surface.fill_rect(rects.outer, cfg.style.bg.with_opacity(cfg.style.opacity));
        draw_content(surface, &mut self.engine, &fields, &cfg, rects)
    }

    /// Composite the board over the photo at the photo's native size.
    #[tracing::instrument(skip_all, fields(template_id = template.id()))]
    pub fn compose(
        &mut self,
        photo: &Photo,
        info: &BlackboardInfo,
        template: &Template,
    ) -> KokubanResult<BoardImage> {
        let (w, h) = (photo.width(), photo.height());
        let fit = Fit::identity(f64::from(w), f64::from(h))?;
        let mut surface = BoardSurface::new(w, h)?;
        surface.draw_photo(photo, fit);
        self.render(&mut surface, info, template, fit)?;
        Ok(surface.finish())
    }

    /// Render, or fetch from `cache`, the preview sprite for a target
    /// surface.
    ///
    /// The sprite spans the whole surface at an oversampled pixel size and
    /// is transparent outside the board, so the host can paint it over its
    /// own photo view and scale it down for crisp text. The returned
    /// reference is valid until the next insertion into `cache`.
    pub fn render_preview<'c>(
        &mut self,
        cache: &'c mut SpriteCache,
        target: PreviewTarget,
        info: &BlackboardInfo,
        template: &Template,
    ) -> KokubanResult<&'c BoardImage> {
        if !target.pixel_ratio.is_finite() || target.pixel_ratio <= 0.0 {
            return Err(KokubanError::render("pixel ratio must be finite and > 0"));
        }
        let native_w = (f64::from(target.target_w) * target.pixel_ratio).round() as u32;
        let native_h = (f64::from(target.target_h) * target.pixel_ratio).round() as u32;
        let scale = self.opts.oversample.effective_scale(native_w, native_h);
        let key = SpriteKey::new(
            template.id(),
            info.canonical_json()?,
            target.target_w,
            target.target_h,
            target.pixel_ratio,
            scale,
        );

        if cache.get(&key).is_none() {
            let px_w = (f64::from(native_w) * scale).round() as u32;
            let px_h = (f64::from(native_h) * scale).round() as u32;
            let fit = Fit::contain(
                f64::from(target.photo_w),
                f64::from(target.photo_h),
                f64::from(px_w),
                f64::from(px_h),
            )?;
            let mut surface = BoardSurface::new(px_w, px_h)?;
            self.render(&mut surface, info, template, fit)?;
            cache.put(key.clone(), surface.finish());
            tracing::debug!(px_w, px_h, scale, "preview sprite rendered");
        }

        cache
            .get(&key)
            .ok_or_else(|| KokubanError::render("preview sprite evicted before use"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/facade.rs"]
mod tests;
