use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::decode::{PreparedImage, resize_image_if_needed};
use crate::assets::loader::ImageLoader;
use crate::assets::manifest::FrameSources;
use crate::foundation::core::MAX_UPLOAD_DIMENSION;
use crate::foundation::error::TokenResult;
use crate::scene::model::{CanvasDoc, ImageLayer};

#[derive(Clone, Debug)]
struct CacheEntry {
    locator: String,
    image: Arc<PreparedImage>,
}

/// Decoded images for the layers of one document, keyed by layer id.
///
/// An entry is only replaced when the locator recorded for its layer changes, so repeated syncs
/// against an unchanged document never touch the loader.
#[derive(Clone, Debug, Default)]
pub struct ImageCache {
    entries: HashMap<String, CacheEntry>,
}

/// Read-only view of resolved layer images handed to the compositor.
#[derive(Clone, Debug, Default)]
pub struct ResolvedImages {
    images: HashMap<String, Arc<PreparedImage>>,
}

impl ResolvedImages {
    /// Image resolved for `layer_id`, if any.
    pub fn get(&self, layer_id: &str) -> Option<&PreparedImage> {
        self.images.get(layer_id).map(Arc::as_ref)
    }

    /// Insert an image directly, bypassing the loader.
    pub fn insert(&mut self, layer_id: impl Into<String>, image: PreparedImage) {
        self.images.insert(layer_id.into(), Arc::new(image));
    }

    /// Builder-style [`ResolvedImages::insert`].
    pub fn with(mut self, layer_id: impl Into<String>, image: PreparedImage) -> Self {
        self.insert(layer_id, image);
        self
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the cache in line with `doc`.
    ///
    /// Layers without a source (including color-only backgrounds) and layers no longer in the
    /// document are evicted. A failed load leaves the layer absent for this pass.
    pub fn sync(&mut self, doc: &CanvasDoc, loader: &dyn ImageLoader) {
        let layers: Vec<&ImageLayer> = doc
            .background
            .iter()
            .chain(doc.character.iter())
            .chain(doc.overlays.iter())
            .collect();

        self.entries.retain(|id, _| {
            layers
                .iter()
                .any(|l| l.id == *id && l.has_source())
        });

        for layer in layers {
            if !layer.has_source() {
                continue;
            }
            let locator = layer.src.trim();
            if self
                .entries
                .get(&layer.id)
                .is_some_and(|e| e.locator == locator)
            {
                tracing::debug!(layer = %layer.id, "image cache hit");
                continue;
            }

            tracing::debug!(layer = %layer.id, "image cache miss");
            match load_bounded(loader, locator) {
                Ok(image) => {
                    self.entries.insert(
                        layer.id.clone(),
                        CacheEntry {
                            locator: locator.to_owned(),
                            image: Arc::new(image),
                        },
                    );
                }
                Err(e) => {
                    tracing::warn!(layer = %layer.id, error = %e, "layer image failed to load");
                    self.entries.remove(&layer.id);
                }
            }
        }
    }

    /// Locator the cached image for `layer_id` was loaded from.
    pub fn locator(&self, layer_id: &str) -> Option<&str> {
        self.entries.get(layer_id).map(|e| e.locator.as_str())
    }

    pub fn contains(&self, layer_id: &str) -> bool {
        self.entries.contains_key(layer_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Immutable snapshot for one composition pass.
    pub fn snapshot(&self) -> ResolvedImages {
        ResolvedImages {
            images: self
                .entries
                .iter()
                .map(|(id, e)| (id.clone(), Arc::clone(&e.image)))
                .collect(),
        }
    }
}

/// Frame artwork and mask loaded for one composition.
#[derive(Clone, Debug, Default)]
pub struct FrameAssets {
    pub frame: Option<PreparedImage>,
    pub mask: Option<PreparedImage>,
}

/// Load the frame and mask named by `sources`. Each failure is logged and yields `None`
/// without affecting the other.
pub fn load_frame_assets(sources: &FrameSources, loader: &dyn ImageLoader) -> FrameAssets {
    let load = |what: &str, locator: Option<&String>| {
        let locator = locator?;
        match load_bounded(loader, locator) {
            Ok(img) => Some(img),
            Err(e) => {
                tracing::warn!(
                    asset = what,
                    locator = %locator,
                    error = %e,
                    "frame asset failed to load"
                );
                None
            }
        }
    };
    FrameAssets {
        frame: load("frame", sources.frame.as_ref()),
        mask: load("mask", sources.mask.as_ref()),
    }
}

fn load_bounded(loader: &dyn ImageLoader, locator: &str) -> TokenResult<PreparedImage> {
    let img = loader.load(locator)?;
    resize_image_if_needed(img, MAX_UPLOAD_DIMENSION)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
