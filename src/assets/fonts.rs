use std::path::Path;

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{TokenError, TokenResult};

#[derive(Clone)]
struct FontFace {
    family: String,
    weight: f32,
    font: vello_cpu::peniko::FontData,
}

/// Text shaped by Parley, paired with the face its glyph ids refer to.
pub(crate) struct ShapedText {
    pub(crate) layout: parley::Layout<Rgba8Premul>,
    pub(crate) font: vello_cpu::peniko::FontData,
    /// Family actually used, after fallback.
    pub(crate) family: String,
}

/// Registry of caller-supplied fonts plus the Parley contexts that shape text with them.
///
/// Only registered fonts are visible; no system font discovery takes place, so output is the
/// same on every machine given the same font files.
pub struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8Premul>,
    faces: Vec<FontFace>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("families", &self.families())
            .finish_non_exhaustive()
    }
}

impl FontBook {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: Vec::new(),
        }
    }

    /// Register a TTF/OTF face and return its family name.
    pub fn register(&mut self, bytes: Vec<u8>) -> TokenResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let (family_id, infos) = families
            .into_iter()
            .next()
            .ok_or_else(|| TokenError::validation("no font families registered from font bytes"))?;

        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| TokenError::validation("registered font family has no name"))?
            .to_string();
        let weight = infos.first().map(|i| i.weight().value()).unwrap_or(400.0);

        tracing::debug!(family = %family, weight, "registered font");
        self.faces.push(FontFace {
            family: family.clone(),
            weight,
            font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0),
        });
        Ok(family)
    }

    /// Read and register a font file.
    pub fn register_file(&mut self, path: impl AsRef<Path>) -> TokenResult<String> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            TokenError::decode(format!("failed to read font '{}': {e}", path.display()))
        })?;
        self.register(bytes)
    }

    /// Registered family names, in registration order, without duplicates.
    pub fn families(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for f in &self.faces {
            if !out.iter().any(|x| x.eq_ignore_ascii_case(&f.family)) {
                out.push(&f.family);
            }
        }
        out
    }

    /// Whether any font has been registered.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Whether `family` is registered (case-insensitive).
    pub fn has_family(&self, family: &str) -> bool {
        self.faces
            .iter()
            .any(|f| f.family.eq_ignore_ascii_case(family.trim()))
    }

    // Closest weight within the requested family, else within the first registered family.
    fn select_face(&self, family: &str, weight: u16) -> Option<&FontFace> {
        let family = if self.has_family(family) {
            family.trim()
        } else {
            self.faces.first()?.family.as_str()
        };
        let want = f32::from(weight);
        self.faces
            .iter()
            .filter(|f| f.family.eq_ignore_ascii_case(family))
            .min_by(|a, b| (a.weight - want).abs().total_cmp(&(b.weight - want).abs()))
    }

    /// Shape a single unwrapped line. Returns `Ok(None)` when no font is registered.
    pub(crate) fn shape(
        &mut self,
        text: &str,
        family: &str,
        weight: u16,
        size_px: f32,
    ) -> TokenResult<Option<ShapedText>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(TokenError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let Some(face) = self.select_face(family, weight).cloned() else {
            return Ok(None);
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(face.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(face.weight),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<Rgba8Premul> = builder.build(text);
        layout.break_all_lines(None);

        Ok(Some(ShapedText {
            layout,
            font: face.font,
            family: face.family,
        }))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
