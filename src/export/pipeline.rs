use crate::export::encode::{ExportFormat, encode};
use crate::export::resize::resize;
use crate::foundation::core::{RENDER_SIZE, TokenSize};
use crate::foundation::error::TokenResult;
use crate::render::surface::Surface;

/// Options for [`export`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportOpts {
    /// Output edge length in pixels.
    pub size: u32,
    /// Output container.
    pub format: ExportFormat,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            size: RENDER_SIZE,
            format: ExportFormat::Png,
        }
    }
}

impl ExportOpts {
    /// Options for one of the canonical token sizes.
    pub fn new(size: TokenSize, format: ExportFormat) -> Self {
        Self {
            size: size.px(),
            format,
        }
    }
}

/// Resize a composed token and encode it.
#[tracing::instrument(skip(surface), fields(from = surface.width))]
pub fn export(surface: Surface, opts: ExportOpts) -> TokenResult<Vec<u8>> {
    let sized = resize(surface, opts.size)?;
    let bytes = encode(&sized, opts.format)?;
    tracing::debug!(bytes = bytes.len(), "token encoded");
    Ok(bytes)
}

/// Download name for an exported token: `{frame_id}_{size}.{ext}`, or `token_{size}.{ext}`
/// when no library frame is selected.
pub fn export_file_name(frame_id: Option<&str>, size: u32, format: ExportFormat) -> String {
    let stem = frame_id
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("token");
    format!("{stem}_{size}.{}", format.extension())
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
