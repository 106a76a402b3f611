use std::io::Cursor;

use image::ImageEncoder as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{TokenError, TokenResult};
use crate::render::surface::Surface;

/// Output container for exported tokens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Lossless PNG.
    #[default]
    Png,
    /// WebP at maximum fidelity (lossless).
    WebP,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    /// MIME type of the encoded bytes.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = TokenError;

    fn from_str(s: &str) -> TokenResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::WebP),
            other => Err(TokenError::validation(format!(
                "unsupported export format '{other}' (expected png or webp)"
            ))),
        }
    }
}

/// Serialize `surface` into `format`. Failures are never swallowed.
pub fn encode(surface: &Surface, format: ExportFormat) -> TokenResult<Vec<u8>> {
    if surface.width == 0 || surface.height == 0 {
        return Err(TokenError::encode("cannot encode an empty surface"));
    }
    let expected = (surface.width as usize) * (surface.height as usize) * 4;
    if surface.data.len() != expected {
        return Err(TokenError::encode(format!(
            "surface buffer holds {} bytes, expected {expected}",
            surface.data.len()
        )));
    }

    let straight = surface.to_straight_rgba8();
    let mut out = Vec::new();
    let res = match format {
        ExportFormat::Png => image::codecs::png::PngEncoder::new(Cursor::new(&mut out))
            .write_image(
                &straight,
                surface.width,
                surface.height,
                image::ExtendedColorType::Rgba8,
            ),
        ExportFormat::WebP => image::codecs::webp::WebPEncoder::new_lossless(Cursor::new(&mut out))
            .write_image(
                &straight,
                surface.width,
                surface.height,
                image::ExtendedColorType::Rgba8,
            ),
    };
    res.map_err(|e| TokenError::encode(format!("{} encode failed: {e}", format.extension())))?;
    if out.is_empty() {
        return Err(TokenError::encode("encoder produced no output"));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/export/encode.rs"]
mod tests;
