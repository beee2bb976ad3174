use std::sync::Arc;

use crate::foundation::error::{KokubanError, KokubanResult};
use crate::foundation::geom::{Fit, PxRect};
use crate::render::text::TextBrush;
use crate::template::color::ColorDef;

/// Supersampling policy for preview sprites.
///
/// Previews render at `multiplier` times the surface's native pixel size so
/// text stays crisp when the host scales the sprite down. The multiplier is
/// reduced automatically once the oversampled surface would exceed
/// `max_pixels`, and never drops below 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OversampleOpts {
    /// Scale applied on top of the native pixel size.
    pub multiplier: f64,
    /// Pixel budget the oversampled surface must stay under.
    pub max_pixels: u64,
}

impl Default for OversampleOpts {
    fn default() -> Self {
        Self {
            multiplier: 1.5,
            max_pixels: 12_000_000,
        }
    }
}

impl OversampleOpts {
    /// Effective scale for a `width x height` native surface.
    pub fn effective_scale(&self, width: u32, height: u32) -> f64 {
        let base = u64::from(width) * u64::from(height);
        if base == 0 {
            return 1.0;
        }
        let budget = (self.max_pixels as f64 / base as f64).sqrt();
        self.multiplier.max(1.0).min(budget).max(1.0)
    }
}

/// A decoded photograph prepared for compositing.
pub struct Photo {
    width: u32,
    height: u32,
    paint: vello_cpu::Image,
}

impl Photo {
    /// Decode an encoded image (PNG, JPEG, ...) into a drawable photo.
    pub fn decode(bytes: &[u8]) -> KokubanResult<Self> {
        let dyn_img = image::load_from_memory(bytes)
            .map_err(|e| KokubanError::render(format!("decode photo: {e}")))?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba8(rgba.into_raw(), width, height)
    }

    /// Wrap straight-alpha RGBA8 pixels as a drawable photo.
    pub fn from_rgba8(mut data: Vec<u8>, width: u32, height: u32) -> KokubanResult<Self> {
        premultiply_rgba8_in_place(&mut data);
        let pixmap = premul_bytes_to_pixmap(&data, width, height)?;
        Ok(Self {
            width,
            height,
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
        })
    }

    /// Pixel width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height.
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Rendered RGBA8 pixels handed back to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardImage {
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Row-major RGBA8 bytes, `width * height * 4` long.
    pub data: Vec<u8>,
    /// Whether `data` carries premultiplied alpha.
    pub premultiplied: bool,
}

impl BoardImage {
    /// Convert the buffer to straight (non-premultiplied) alpha in place.
    ///
    /// PNG and most image viewers expect straight alpha; the rasterizer
    /// works in premultiplied alpha throughout.
    pub fn unpremultiply(&mut self) {
        if !self.premultiplied {
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        self.premultiplied = false;
    }
}

/// One CPU render target: a `vello_cpu` context plus its pixel size.
///
/// Drawing is queued on the context; [`BoardSurface::finish`] rasterizes
/// everything into a fresh pixmap and reads the bytes back.
pub struct BoardSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl BoardSurface {
    /// Create a surface, rejecting zero sizes and dimensions beyond the
    /// rasterizer's `u16` limit.
    pub fn new(width: u32, height: u32) -> KokubanResult<Self> {
        if width == 0 || height == 0 {
            return Err(KokubanError::render("surface dimensions must be > 0"));
        }
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| KokubanError::render("surface width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| KokubanError::render("surface height exceeds u16"))?;
        Ok(Self {
            width: width_u16,
            height: height_u16,
            ctx: vello_cpu::RenderContext::new(width_u16, height_u16),
        })
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Draw a photo at the placement a fit computed for it.
    pub fn draw_photo(&mut self, photo: &Photo, fit: Fit) {
        let sx = fit.draw_w / f64::from(photo.width);
        let sy = fit.draw_h / f64::from(photo.height);
        self.ctx.set_transform(
            vello_cpu::kurbo::Affine::translate((fit.dx, fit.dy))
                * vello_cpu::kurbo::Affine::scale_non_uniform(sx, sy),
        );
        self.ctx.set_paint(photo.paint.clone());
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(photo.width),
            f64::from(photo.height),
        ));
    }

    /// Fill a pixel rectangle with a straight-alpha color.
    pub fn fill_rect(&mut self, rect: PxRect, color: ColorDef) {
        let [r, g, b, a] = color.to_rgba8();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        self.ctx.fill_rect(&to_cpu_rect(rect));
    }

    /// Draw a laid-out text block with its top-left corner at `origin`.
    ///
    /// `max_lines` limits how many wrapped lines are drawn; the brushes
    /// recorded in the layout pick the glyph colors.
    pub(crate) fn draw_text_layout(
        &mut self,
        layout: &parley::Layout<TextBrush>,
        font: &vello_cpu::peniko::FontData,
        origin_x: f64,
        origin_y: f64,
        max_lines: Option<usize>,
    ) {
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((origin_x, origin_y)));
        for (index, line) in layout.lines().enumerate() {
            if let Some(max) = max_lines
                && index >= max
            {
                break;
            }
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Rasterize all queued drawing and read the pixels back.
    pub fn finish(mut self) -> BoardImage {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        BoardImage {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

fn to_cpu_rect(r: PxRect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(
        f64::from(r.x),
        f64::from(r.y),
        f64::from(r.right()),
        f64::from(r.bottom()),
    )
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> KokubanResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| KokubanError::render("photo width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| KokubanError::render("photo height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(KokubanError::render("photo byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
