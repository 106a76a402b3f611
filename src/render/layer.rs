//! Per-layer rasterisation for images, full-bleed art and text.

use crate::assets::decode::PreparedImage;
use crate::assets::fonts::{FontBook, ShapedText};
use crate::foundation::core::{Affine, Rgba8Premul, Vec2};
use crate::foundation::error::TokenResult;
use crate::render::geometry::{affine_to_cpu, full_bleed_transform, image_transform, text_transform};
use crate::render::pixels::{
    brightness_in_place, dilate_alpha, gaussian_blur, over_in_place, shift, tint_coverage,
};
use crate::render::surface::{Surface, image_paint, surface_dims_u16};
use crate::scene::color::ColorDef;
use crate::scene::model::{ImageLayer, LayerKind, TextAlign, TextLayer};

/// Draws individual layers onto a surface.
///
/// Each layer is rasterised by `vello_cpu` into a scratch surface at full opacity, adjusted
/// in pixel space (brightness, stroke, shadow) and then composited source-over with the layer's
/// opacity. The render size is the destination surface's width.
pub struct LayerRenderer {
    fonts: FontBook,
    ctx: Option<vello_cpu::RenderContext>,
}

impl std::fmt::Debug for LayerRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerRenderer")
            .field("fonts", &self.fonts)
            .finish_non_exhaustive()
    }
}

impl Default for LayerRenderer {
    fn default() -> Self {
        Self::new(FontBook::new())
    }
}

impl LayerRenderer {
    pub fn new(fonts: FontBook) -> Self {
        Self { fonts, ctx: None }
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// Draw an image layer.
    ///
    /// With an image, it is centered on the layer origin at `natural·scale·k`. Without one, a
    /// background layer with a fill color covers the whole surface regardless of its transform.
    /// Brightness applies to the character only.
    pub fn render_image_layer(
        &mut self,
        dst: &mut Surface,
        layer: &ImageLayer,
        image: Option<&PreparedImage>,
    ) -> TokenResult<()> {
        if !layer.visible {
            return Ok(());
        }
        let opacity = layer.effective_opacity();

        let mut scratch = match image {
            Some(img) => {
                let tr = image_transform(&layer.transform, img.dimensions(), dst.width);
                self.rasterize_image(dst.width, dst.height, img, tr)?
            }
            None => {
                let fill = match (&layer.kind, &layer.background_color) {
                    (LayerKind::Background, Some(c)) if !c.trim().is_empty() => c,
                    _ => return Ok(()),
                };
                let Some(color) = resolve_color(fill, &layer.id) else {
                    return Ok(());
                };
                let mut s = Surface::new(dst.width, dst.height)?;
                s.fill(color);
                s
            }
        };

        if layer.kind == LayerKind::Character
            && let Some(b) = layer.brightness
        {
            brightness_in_place(&mut scratch.data, b);
        }

        over_in_place(&mut dst.data, &scratch.data, opacity)
    }

    /// Draw `image` stretched over the whole surface.
    pub fn draw_full_bleed(&mut self, dst: &mut Surface, image: &PreparedImage) -> TokenResult<()> {
        let scratch = self.rasterize_full_bleed(image, dst.width, dst.height)?;
        over_in_place(&mut dst.data, &scratch.data, 1.0)
    }

    pub(crate) fn rasterize_full_bleed(
        &mut self,
        image: &PreparedImage,
        width: u32,
        height: u32,
    ) -> TokenResult<Surface> {
        let tr = full_bleed_transform(image.dimensions(), width, height);
        self.rasterize_image(width, height, image, tr)
    }

    /// Draw a text layer: shadow, then stroke, then fill.
    ///
    /// The font size is in render pixels and only `transform.scale` enlarges it. Text is
    /// horizontally aligned on the origin per `align` and vertically centered.
    pub fn render_text_layer(&mut self, dst: &mut Surface, layer: &TextLayer) -> TokenResult<()> {
        if !layer.visible || layer.text.is_empty() {
            return Ok(());
        }
        let Some(shaped) = self.fonts.shape(
            &layer.text,
            &layer.font_family,
            layer.font_weight,
            layer.font_size as f32,
        )?
        else {
            tracing::warn!(layer = %layer.id, "no fonts registered; text layer skipped");
            return Ok(());
        };
        if !shaped.family.eq_ignore_ascii_case(layer.font_family.trim()) {
            tracing::debug!(
                requested = %layer.font_family,
                used = %shaped.family,
                "font family fallback"
            );
        }

        let (w, h) = (dst.width, dst.height);
        let lw = f64::from(shaped.layout.width());
        let lh = f64::from(shaped.layout.height());
        let dx = match layer.align {
            TextAlign::Left => 0.0,
            TextAlign::Center => -lw / 2.0,
            TextAlign::Right => -lw,
        };
        let tr = text_transform(&layer.transform, w) * Affine::translate(Vec2::new(dx, -lh / 2.0));
        let coverage = self.rasterize_glyphs(w, h, &shaped, tr)?;

        let mut ink = vec![0u8; coverage.data.len()];
        let mut tinted = vec![0u8; coverage.data.len()];

        if let Some(stroke) = &layer.stroke
            && stroke.width > 0.0
            && let Some(color) = resolve_color(&stroke.color, &layer.id)
        {
            // Half the line lies outside the glyph outline.
            let radius = (stroke.width * layer.transform.scale).abs() as f32 / 2.0;
            let grown = dilate_alpha(&coverage.data, w, h, radius);
            tint_coverage(&grown, color, &mut tinted)?;
            over_in_place(&mut ink, &tinted, 1.0)?;
        }

        let fill = resolve_color(&layer.color, &layer.id)
            .unwrap_or_else(|| Rgba8Premul::from_straight_rgba(0, 0, 0, 255));
        tint_coverage(&coverage.data, fill, &mut tinted)?;
        over_in_place(&mut ink, &tinted, 1.0)?;

        if let Some(shadow) = &layer.shadow
            && let Some(color) = resolve_color(&shadow.color, &layer.id)
            && color.a > 0
        {
            // Offsets and blur are in device pixels, unaffected by the layer transform.
            let moved = shift(
                &ink,
                w,
                h,
                shadow.offset_x.round() as i32,
                shadow.offset_y.round() as i32,
            );
            let blurred = gaussian_blur(&moved, w, h, (shadow.blur / 2.0) as f32)?;
            let mut under = vec![0u8; ink.len()];
            tint_coverage(&blurred, color, &mut under)?;
            over_in_place(&mut under, &ink, 1.0)?;
            ink = under;
        }

        over_in_place(&mut dst.data, &ink, 1.0)
    }

    fn rasterize_image(
        &mut self,
        width: u32,
        height: u32,
        image: &PreparedImage,
        transform: Affine,
    ) -> TokenResult<Surface> {
        let paint = image_paint(image)?;
        let (iw, ih) = (f64::from(image.width), f64::from(image.height));
        self.rasterize(width, height, |ctx| {
            ctx.set_transform(affine_to_cpu(transform));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        })
    }

    // White glyph coverage; color is applied afterwards.
    fn rasterize_glyphs(
        &mut self,
        width: u32,
        height: u32,
        shaped: &ShapedText,
        transform: Affine,
    ) -> TokenResult<Surface> {
        self.rasterize(width, height, |ctx| {
            ctx.set_transform(affine_to_cpu(transform));
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
            for line in shaped.layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    // Positioned glyphs carry the run offset, advances and baseline.
                    let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&shaped.font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        })
    }

    fn rasterize(
        &mut self,
        width: u32,
        height: u32,
        draw: impl FnOnce(&mut vello_cpu::RenderContext),
    ) -> TokenResult<Surface> {
        let mut out = Surface::new(width, height)?;
        let (w, h) = surface_dims_u16(&out)?;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        draw(&mut ctx);
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        out.data.copy_from_slice(pixmap.data_as_u8_slice());
        self.ctx = Some(ctx);
        Ok(out)
    }
}

fn resolve_color(css: &str, layer_id: &str) -> Option<Rgba8Premul> {
    match ColorDef::parse(css) {
        Ok(c) => Some(c.to_rgba8_premul()),
        Err(e) => {
            tracing::warn!(layer = %layer_id, error = %e, "unparseable color ignored");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/layer.rs"]
mod tests;
