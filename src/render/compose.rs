//! The fixed token pipeline: clipped background and character, frame, overlays, title.

use crate::assets::cache::ResolvedImages;
use crate::assets::decode::PreparedImage;
use crate::assets::fonts::FontBook;
use crate::foundation::core::RENDER_SIZE;
use crate::foundation::error::TokenResult;
use crate::render::layer::LayerRenderer;
use crate::render::mask::{apply_stencil, to_alpha_stencil};
use crate::render::surface::Surface;
use crate::scene::model::CanvasDoc;

/// Options for [`Compositor::compose`].
#[derive(Clone, Copy, Debug)]
pub struct ComposeOpts {
    /// Draw the background layer. Disable to export a token over transparency.
    pub include_background: bool,
}

impl Default for ComposeOpts {
    fn default() -> Self {
        Self {
            include_background: true,
        }
    }
}

/// Builds token surfaces from document snapshots.
///
/// The compositor only reads the document and the resolved images; it never loads assets
/// itself, so a render with layers still missing simply leaves them out.
#[derive(Debug, Default)]
pub struct Compositor {
    renderer: LayerRenderer,
    opts: ComposeOpts,
}

impl Compositor {
    pub fn new(fonts: FontBook) -> Self {
        Self::with_opts(fonts, ComposeOpts::default())
    }

    pub fn with_opts(fonts: FontBook, opts: ComposeOpts) -> Self {
        Self {
            renderer: LayerRenderer::new(fonts),
            opts,
        }
    }

    pub fn opts(&self) -> ComposeOpts {
        self.opts
    }

    pub fn set_opts(&mut self, opts: ComposeOpts) {
        self.opts = opts;
    }

    pub fn fonts_mut(&mut self) -> &mut FontBook {
        self.renderer.fonts_mut()
    }

    /// Compose `doc` at the fixed internal size of 1024, whatever `doc.width` says.
    pub fn compose(
        &mut self,
        doc: &CanvasDoc,
        images: &ResolvedImages,
        frame: Option<&PreparedImage>,
        mask: Option<&PreparedImage>,
    ) -> TokenResult<Surface> {
        self.compose_at(doc, images, frame, mask, RENDER_SIZE)
    }

    /// Compose at an explicit square size. Offsets still map from 512-unit display space.
    #[tracing::instrument(skip(self, doc, images, frame, mask), fields(overlays = doc.overlays.len()))]
    pub fn compose_at(
        &mut self,
        doc: &CanvasDoc,
        images: &ResolvedImages,
        frame: Option<&PreparedImage>,
        mask: Option<&PreparedImage>,
        size: u32,
    ) -> TokenResult<Surface> {
        let mut main = Surface::square(size)?;
        let mut temp = Surface::square(size)?;

        // Background and character share the mask.
        if self.opts.include_background
            && let Some(bg) = &doc.background
        {
            self.renderer
                .render_image_layer(&mut temp, bg, images.get(&bg.id))?;
        }
        if let Some(character) = &doc.character
            && let Some(img) = images.get(&character.id)
        {
            self.renderer
                .render_image_layer(&mut temp, character, Some(img))?;
        }

        if let Some(mask) = mask
            && let Err(e) = self.clip_to_mask(&mut temp, mask)
        {
            tracing::warn!(error = %e, "mask application failed; composing unmasked");
        }

        main.data.copy_from_slice(&temp.data);

        if let Some(frame_img) = frame
            && frame_enabled(doc)
        {
            self.renderer.draw_full_bleed(&mut main, frame_img)?;
        }

        for overlay in &doc.overlays {
            if let Some(img) = images.get(&overlay.id) {
                self.renderer
                    .render_image_layer(&mut main, overlay, Some(img))?;
            }
        }

        if let Some(text) = &doc.text {
            self.renderer.render_text_layer(&mut main, text)?;
        }

        Ok(main)
    }

    fn clip_to_mask(&mut self, temp: &mut Surface, mask: &PreparedImage) -> TokenResult<()> {
        let drawn = self
            .renderer
            .rasterize_full_bleed(mask, temp.width, temp.height)?;
        let stencil = to_alpha_stencil(&drawn);
        apply_stencil(temp, &stencil)
    }
}

// A library frame draws when its slot is visible; a custom frame artwork always draws.
fn frame_enabled(doc: &CanvasDoc) -> bool {
    let custom = doc
        .custom_frame
        .as_ref()
        .is_some_and(|c| !c.frame_url.trim().is_empty());
    custom || doc.frame.as_ref().is_some_and(|f| f.visible)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
