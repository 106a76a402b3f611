use crate::assets::decode::{PreparedImage, byte_len, check_dims};
use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{TokenError, TokenResult};
use crate::foundation::math::unpremul_u8;

/// A rendered token or intermediate layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl Surface {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32) -> TokenResult<Self> {
        check_dims(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; byte_len(width, height)],
        })
    }

    /// A square transparent surface of `size x size`.
    pub fn square(size: u32) -> TokenResult<Self> {
        Self::new(size, size)
    }

    /// Wrap premultiplied bytes, checking their length.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> TokenResult<Self> {
        check_dims(width, height)?;
        if data.len() != byte_len(width, height) {
            return Err(TokenError::validation(format!(
                "surface byte length {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Premultiplied pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some(Rgba8Premul {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
    }

    /// Straight-alpha copy of the pixel data, as encoders expect it.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = px[3];
            px[0] = unpremul_u8(px[0], a);
            px[1] = unpremul_u8(px[1], a);
            px[2] = unpremul_u8(px[2], a);
        }
        out
    }

    /// Whether every pixel has zero alpha.
    pub fn is_transparent(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub(crate) fn fill(&mut self, rgba: Rgba8Premul) {
        let px = rgba.to_array();
        for d in self.data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }
}

impl From<PreparedImage> for Surface {
    fn from(img: PreparedImage) -> Self {
        let data = std::sync::Arc::try_unwrap(img.rgba8_premul).unwrap_or_else(|a| (*a).clone());
        Self {
            width: img.width,
            height: img.height,
            data,
        }
    }
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> TokenResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| TokenError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| TokenError::render("pixmap height exceeds u16"))?;
    if bytes.len() != byte_len(width, height) {
        return Err(TokenError::render("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

pub(crate) fn image_paint(img: &PreparedImage) -> TokenResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

pub(crate) fn surface_dims_u16(s: &Surface) -> TokenResult<(u16, u16)> {
    let w: u16 = s
        .width
        .try_into()
        .map_err(|_| TokenError::render("surface width exceeds u16"))?;
    let h: u16 = s
        .height
        .try_into()
        .map_err(|_| TokenError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
