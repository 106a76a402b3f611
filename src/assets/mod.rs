//! Asset plumbing: manifest metadata, decoding, loading, the per-layer image cache and fonts.

pub(crate) mod cache;
pub(crate) mod decode;
pub(crate) mod fonts;
pub(crate) mod loader;
pub(crate) mod manifest;
