use crate::assets::decode::resample_premul;
use crate::foundation::error::{TokenError, TokenResult};
use crate::render::surface::Surface;

/// Resample `surface` to `size x size`.
///
/// A surface already at the target size is returned untouched. Otherwise the image is filtered
/// with Catmull-Rom, which keeps 1024 -> 512/256 downscales free of aliasing.
pub fn resize(surface: Surface, size: u32) -> TokenResult<Surface> {
    if size == 0 {
        return Err(TokenError::validation("export size must be > 0"));
    }
    if surface.width == size && surface.height == size {
        return Ok(surface);
    }
    tracing::debug!(from = surface.width, to = size, "resizing token");
    let data = resample_premul(&surface.data, surface.width, surface.height, size, size)?;
    Surface::from_premul(size, size, data)
}

#[cfg(test)]
#[path = "../../tests/unit/export/resize.rs"]
mod tests;
