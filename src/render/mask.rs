//! Frame masks: grayscale art where white keeps and black removes.

use crate::foundation::error::{TokenError, TokenResult};
use crate::foundation::math::unpremul_u8;
use crate::render::pixels::destination_in_place;
use crate::render::surface::Surface;

/// Convert mask art into an alpha stencil of the same size.
///
/// Every pixel becomes white with alpha equal to the source's red channel. Only red is read;
/// masks are expected to be achromatic. Transparent source pixels carry no red and stencil out.
pub fn to_alpha_stencil(mask: &Surface) -> Surface {
    let mut data = mask.data.clone();
    for px in data.chunks_exact_mut(4) {
        let a = unpremul_u8(px[0], px[3]);
        // White premultiplied by the new alpha.
        px.copy_from_slice(&[a, a, a, a]);
    }
    Surface {
        width: mask.width,
        height: mask.height,
        data,
    }
}

/// Keep `dst` only where `stencil` is opaque.
pub fn apply_stencil(dst: &mut Surface, stencil: &Surface) -> TokenResult<()> {
    if dst.width != stencil.width || dst.height != stencil.height {
        return Err(TokenError::render(format!(
            "stencil {}x{} does not match surface {}x{}",
            stencil.width, stencil.height, dst.width, dst.height
        )));
    }
    destination_in_place(&mut dst.data, &stencil.data)
}

#[cfg(test)]
#[path = "../../tests/unit/render/mask.rs"]
mod tests;
