use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::{MAX_SURFACE_DIMENSION, MAX_UPLOAD_DIMENSION};
use crate::foundation::error::{TokenError, TokenResult};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Wrap premultiplied bytes, checking their length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> TokenResult<Self> {
        check_dims(width, height)?;
        if rgba8_premul.len() != byte_len(width, height) {
            return Err(TokenError::validation(format!(
                "image byte length {} does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Build an image from straight-alpha RGBA8 bytes.
    pub fn from_straight(width: u32, height: u32, mut rgba8: Vec<u8>) -> TokenResult<Self> {
        premultiply_rgba8_in_place(&mut rgba8);
        Self::from_premul(width, height, rgba8)
    }

    /// A uniformly colored image; `rgba` is straight alpha.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> TokenResult<Self> {
        check_dims(width, height)?;
        Self::from_straight(width, height, rgba.repeat((width as usize) * (height as usize)))
    }

    /// Dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Decode any format supported by `image` into a premultiplied bitmap.
///
/// Sources whose longest side exceeds [`MAX_UPLOAD_DIMENSION`] are downscaled while still raw,
/// so oversized uploads never hit the surface size limit.
pub fn decode_image(bytes: &[u8]) -> TokenResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut data = rgba.into_raw();
    premultiply_rgba8_in_place(&mut data);

    let Some((new_w, new_h)) = fit_within(width, height, MAX_UPLOAD_DIMENSION) else {
        return PreparedImage::from_premul(width, height, data);
    };
    tracing::debug!(
        from_w = width,
        from_h = height,
        to_w = new_w,
        to_h = new_h,
        "downscaling decoded source"
    );
    let data = resample_premul(&data, width, height, new_w, new_h)?;
    PreparedImage::from_premul(new_w, new_h, data)
}

/// Constrain an uploaded bitmap so its longest side is at most `max_dimension`, preserving
/// aspect ratio. Images already within bounds are returned unchanged.
pub fn resize_image_if_needed(
    img: PreparedImage,
    max_dimension: u32,
) -> TokenResult<PreparedImage> {
    if max_dimension == 0 {
        return Err(TokenError::validation("max_dimension must be > 0"));
    }
    let Some((new_w, new_h)) = fit_within(img.width, img.height, max_dimension) else {
        return Ok(img);
    };
    tracing::debug!(
        from_w = img.width,
        from_h = img.height,
        to_w = new_w,
        to_h = new_h,
        "downscaling oversized source"
    );

    let data = resample_premul(&img.rgba8_premul, img.width, img.height, new_w, new_h)?;
    PreparedImage::from_premul(new_w, new_h, data)
}

// Target size with the longest side at `max_dimension`, or `None` when already within bounds.
fn fit_within(width: u32, height: u32, max_dimension: u32) -> Option<(u32, u32)> {
    if width <= max_dimension && height <= max_dimension {
        return None;
    }
    let longest = width.max(height);
    let scale = f64::from(max_dimension) / f64::from(longest);
    let new_w = ((f64::from(width) * scale).round() as u32).max(1);
    let new_h = ((f64::from(height) * scale).round() as u32).max(1);
    Some((new_w, new_h))
}

/// High-quality resample of premultiplied RGBA8 pixels.
pub(crate) fn resample_premul(
    src: &[u8],
    width: u32,
    height: u32,
    new_w: u32,
    new_h: u32,
) -> TokenResult<Vec<u8>> {
    check_dims(new_w, new_h)?;
    let buf = image::RgbaImage::from_raw(width, height, src.to_vec())
        .ok_or_else(|| TokenError::validation("resample source length mismatch"))?;
    // Filtering premultiplied values keeps transparent edges free of dark fringes.
    let out = image::imageops::resize(
        &buf,
        new_w,
        new_h,
        image::imageops::FilterType::CatmullRom,
    );
    let mut data = out.into_raw();
    clamp_premul_in_place(&mut data);
    Ok(data)
}

pub(crate) fn check_dims(width: u32, height: u32) -> TokenResult<()> {
    if width == 0 || height == 0 {
        return Err(TokenError::validation(format!(
            "image dimensions must be non-zero (got {width}x{height})"
        )));
    }
    if width > MAX_SURFACE_DIMENSION || height > MAX_SURFACE_DIMENSION {
        return Err(TokenError::validation(format!(
            "image dimensions exceed {MAX_SURFACE_DIMENSION} (got {width}x{height})"
        )));
    }
    Ok(())
}

pub(crate) fn byte_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

// Bicubic overshoot can push a color channel above its alpha.
fn clamp_premul_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        px[0] = px[0].min(a);
        px[1] = px[1].min(a);
        px[2] = px[2].min(a);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
