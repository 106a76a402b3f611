//! CPU composition: display-space geometry, layer rasterisation, masking and the compositor.

pub(crate) mod compose;
pub(crate) mod geometry;
pub(crate) mod layer;
pub(crate) mod mask;
pub(crate) mod pixels;
pub(crate) mod surface;
