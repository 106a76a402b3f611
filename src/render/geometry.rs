//! Mapping from 512-unit display space to render space.
//!
//! Offsets are authored against a 512px preview; at render size `R` every offset and image scale
//! is multiplied by `k = R / 512` so a layout tuned in the preview reproduces at any size.

use crate::foundation::core::{Affine, DISPLAY_SIZE, Vec2};
use crate::scene::model::Transform;

/// `k = render_size / 512`.
pub fn scale_factor(render_size: u32) -> f64 {
    f64::from(render_size) / DISPLAY_SIZE
}

/// Local origin of a layer in render space: `(R/2 + x·k, R/2 + y·k)`.
pub fn layer_origin(t: &Transform, render_size: u32) -> Vec2 {
    let k = scale_factor(render_size);
    let half = f64::from(render_size) / 2.0;
    Vec2::new(half + t.x * k, half + t.y * k)
}

/// Translate to the layer origin, then rotate. Rotation is in degrees and independent of `k`.
pub fn layer_frame(t: &Transform, render_size: u32) -> Affine {
    Affine::translate(layer_origin(t, render_size)) * Affine::rotate(t.rotation.to_radians())
}

/// Size an image of natural dimensions `(w, h)` is drawn at: `(w·scale·k, h·scale·k)`.
pub fn image_draw_size(t: &Transform, natural: (u32, u32), render_size: u32) -> (f64, f64) {
    let s = t.scale * scale_factor(render_size);
    (f64::from(natural.0) * s, f64::from(natural.1) * s)
}

/// Maps image pixel space to render space, centering the scaled image on the layer origin.
pub fn image_transform(t: &Transform, natural: (u32, u32), render_size: u32) -> Affine {
    let s = t.scale * scale_factor(render_size);
    layer_frame(t, render_size)
        * Affine::scale(s)
        * Affine::translate(Vec2::new(
            -f64::from(natural.0) / 2.0,
            -f64::from(natural.1) / 2.0,
        ))
}

/// Text frame: the image frame followed by a uniform `transform.scale`. Text sizes are not
/// multiplied by `k`.
pub fn text_transform(t: &Transform, render_size: u32) -> Affine {
    layer_frame(t, render_size) * Affine::scale(t.scale)
}

/// Stretch an image of natural size `(w, h)` over a `width x height` canvas.
pub fn full_bleed_transform(natural: (u32, u32), width: u32, height: u32) -> Affine {
    let sx = f64::from(width) / f64::from(natural.0.max(1));
    let sy = f64::from(height) / f64::from(natural.1.max(1));
    Affine::scale_non_uniform(sx, sy)
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;
