use crate::foundation::error::{TokenError, TokenResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Side length of the square surface every composition is rendered at.
pub const RENDER_SIZE: u32 = 1024;

/// Side length of the display space all stored transforms are authored in.
pub const DISPLAY_SIZE: f64 = 512.0;

/// Longest side an uploaded source bitmap is allowed to keep.
pub const MAX_UPLOAD_DIMENSION: u32 = 1024;

/// Largest surface side accepted anywhere in the pipeline.
pub const MAX_SURFACE_DIMENSION: u32 = 8192;

/// Canonical square token sizes offered for export.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum TokenSize {
    /// 256 x 256.
    S256,
    /// 512 x 512.
    S512,
    /// 1024 x 1024.
    #[default]
    S1024,
}

impl TokenSize {
    /// All canonical sizes, largest first.
    pub const ALL: [TokenSize; 3] = [TokenSize::S1024, TokenSize::S512, TokenSize::S256];

    /// Side length in pixels.
    pub fn px(self) -> u32 {
        match self {
            Self::S256 => 256,
            Self::S512 => 512,
            Self::S1024 => 1024,
        }
    }
}

impl TryFrom<u32> for TokenSize {
    type Error = TokenError;

    fn try_from(v: u32) -> TokenResult<Self> {
        match v {
            256 => Ok(Self::S256),
            512 => Ok(Self::S512),
            1024 => Ok(Self::S1024),
            other => Err(TokenError::validation(format!(
                "token size must be one of 1024, 512 or 256 (got {other})"
            ))),
        }
    }
}

impl From<TokenSize> for u32 {
    fn from(s: TokenSize) -> Self {
        s.px()
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self::default()
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        let a16 = u16::from(a);
        let premul = |c: u8| crate::foundation::math::mul_div255_u8(u16::from(c), a16);
        Self {
            r: premul(r),
            g: premul(g),
            b: premul(b),
            a,
        }
    }

    /// Pixel bytes in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
