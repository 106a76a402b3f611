//! Declarative scene model: the [`model::CanvasDoc`] snapshot, CSS colors, and pure editor
//! transitions producing new snapshots.

pub(crate) mod color;
pub(crate) mod edit;
pub(crate) mod model;
